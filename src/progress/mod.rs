//! Progress reporting for the transfer stage.
//!
//! A single progress bar follows the body of the response while it is written
//! to temporary storage. It draws on stderr so that it never mixes with the
//! report printed on stdout.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::progress::ProgressBarOpts;
//!
//! // Pip-like bar, cleared once the transfer is done.
//! let opts = ProgressBarOpts::with_pip_style();
//! let pb = opts.clone().to_progress_bar(1024);
//! pb.inc(512);
//! opts.finish(pb);
//!
//! // No output at all.
//! let hidden = ProgressBarOpts::hidden();
//! assert!(hidden.clone().to_progress_bar(1024).is_hidden());
//! ```

pub(crate) mod style;

pub use style::ProgressBarOpts;
