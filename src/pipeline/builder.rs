//! Builder for [`Pipeline`] instances.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::pipeline::PipelineBuilder;
//! use reqwest::header::{self, HeaderValue};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineBuilder::hidden()
//!     .header(header::USER_AGENT, HeaderValue::from_static("builder/1.0"))
//!     .temp_dir("/var/tmp")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::config::PipelineConfig;
use super::pipeline::Pipeline;
use crate::materialize::{Materializer, Unpacker};
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest::Proxy;
use std::path::PathBuf;

/// A builder used to create a [`Pipeline`].
///
/// ```rust
/// use fetchurl::pipeline::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::new().system_proxy(false).build();
/// assert!(pipeline.is_ok());
/// ```
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    materializer: Option<Materializer>,
}

impl PipelineBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        PipelineBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        PipelineBuilder::default().progress(ProgressBarOpts::hidden())
    }

    /// Starts from an existing configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            materializer: None,
        }
    }

    /// Sets the transfer progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Sets the directory in which temporary artifacts are allocated.
    pub fn temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(temp_dir.into());
        self
    }

    /// Sends every request through `proxy`.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.http.proxy = Some(proxy);
        self
    }

    /// Set to `false` to ignore the proxy environment variables.
    pub fn system_proxy(mut self, enabled: bool) -> Self {
        self.config.http.system_proxy = enabled;
        self
    }

    /// Extracts archives with `unpacker` instead of the bundled one.
    pub fn unpacker(mut self, unpacker: impl Unpacker + 'static) -> Self {
        self.materializer = Some(Materializer::new(unpacker));
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.http.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Adds the http headers.
    ///
    /// Calling `.headers()` several times merges all maps into one. Later
    /// values replace earlier ones, including the default `User-Agent`.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.http.headers = Some(new);
        self
    }

    /// Adds a single http header.
    ///
    /// See also [`headers()`](PipelineBuilder::headers).
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.http.headers = Some(new);
        self
    }

    /// Creates the [`Pipeline`] with the specified options.
    ///
    /// Fails only if the HTTP client cannot be initialised.
    pub fn build(self) -> Result<Pipeline, reqwest::Error> {
        Pipeline::with_materializer(self.config, self.materializer.unwrap_or_default())
    }
}
