//! Configuration of the verified-fetch pipeline.
//!
//! ```rust
//! use fetchurl::pipeline::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! assert!(config.http.system_proxy);
//! assert!(config.temp_dir.is_none());
//! ```

use crate::fetch::HttpClientConfig;
use crate::progress::ProgressBarOpts;

use std::path::PathBuf;

/// Settings shared by every run of a [`Pipeline`](super::Pipeline).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// HTTP client settings.
    pub http: HttpClientConfig,
    /// Transfer progress bar.
    pub progress: ProgressBarOpts,
    /// Directory for temporary artifacts. The system temporary directory is
    /// used when unset.
    pub temp_dir: Option<PathBuf>,
}
