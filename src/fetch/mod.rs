//! Transfer of a remote resource into temporary storage.
//!
//! The fetch module is organized into two components:
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`fetcher`] - The [`HttpFetcher`] that streams a response body into a
//!   [`TemporaryArtifact`](crate::artifact::TemporaryArtifact)
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchurl::fetch::{HttpClientConfig, HttpFetcher};
//! use fetchurl::progress::ProgressBarOpts;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new(HttpClientConfig::default(), ProgressBarOpts::hidden())?;
//! let url = Url::parse("https://example.com/file.tar.gz")?;
//! let artifact = fetcher.fetch(&url).await?;
//! println!("downloaded {} bytes", artifact.len()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod fetcher;

pub use client::{create_http_client, HttpClientConfig};
pub use fetcher::HttpFetcher;
