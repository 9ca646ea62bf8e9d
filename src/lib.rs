//! fetchurl downloads a file over HTTP(S), checks its SHA-256 against an
//! expected digest and only then stores it or unpacks it.
//!
//! Without an expected digest it runs in report-only mode: the file is
//! downloaded and hashed, and the digest is handed back so it can be pinned in
//! a build script.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetchurl::{FetchOutcome, FetchRequest, PipelineBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = FetchRequest::unpack(
//!     "https://example.com/tool.tar.gz",
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
//!     "/opt/tool",
//! )?;
//! let pipeline = PipelineBuilder::new().build()?;
//! if let FetchOutcome::Unpacked(dir) = pipeline.run(&request).await? {
//!     println!("Unpacked to {}", dir.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`request`] - The validated [`FetchRequest`] and its [`FetchOutcome`]
//! - [`pipeline`] - The verified-fetch [`Pipeline`] and its builder
//! - [`fetch`] - HTTP client and the streaming [`HttpFetcher`](fetch::HttpFetcher)
//! - [`artifact`] - Temporary storage of downloaded bytes
//! - [`digest`] - SHA-256 computation and comparison
//! - [`materialize`] - Storing and unpacking verified content
//! - [`report`] - Snippets printed in report-only mode
//! - [`error`] - Error types for every stage
//! - [`progress`] - Transfer progress bar
//! - [`cli`] and [`logging`] - Support for the `fetchurl` binary

pub mod artifact;
pub mod cli;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod materialize;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod request;

pub use artifact::TemporaryArtifact;
pub use error::{ConfigError, Error, FetchError, Result, UnpackError};
pub use fetch::{create_http_client, HttpClientConfig, HttpFetcher};
pub use materialize::{ArchiveFormat, ArchiveUnpacker, Materializer, Unpacker};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, Stage};
pub use progress::ProgressBarOpts;
pub use report::{Report, ReportStyle};
pub use request::{FetchOutcome, FetchRequest, Mode};
