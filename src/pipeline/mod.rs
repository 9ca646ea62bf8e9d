//! The verified-fetch pipeline.
//!
//! The pipeline module is organized into four components:
//!
//! - `pipeline` - The [`Pipeline`] that runs one [`FetchRequest`](crate::request::FetchRequest)
//! - `builder` - [`PipelineBuilder`] for configuring a pipeline step by step
//! - `config` - [`PipelineConfig`], the settings shared by every run
//! - `stage` - The [`Stage`] a run is in or failed in
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchurl::pipeline::PipelineBuilder;
//! use fetchurl::request::{FetchOutcome, FetchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineBuilder::hidden().build()?;
//!
//! let request = FetchRequest::report("https://example.com/archive.tar.gz")?;
//! if let FetchOutcome::Reported { digest, .. } = pipeline.run(&request).await? {
//!     println!("sha256: {digest}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod pipeline;
pub mod stage;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use pipeline::Pipeline;
pub use stage::Stage;
