//! Error handling for fetchurl.
//!
//! Every stage of the verified-fetch pipeline has its own failure variant so a
//! caller can tell a broken transfer apart from a digest mismatch or a corrupt
//! archive. None of these errors are recovered from internally: the pipeline
//! stops at the first one and hands it back, after releasing its temporary file.

use crate::materialize::ArchiveFormat;
use crate::pipeline::Stage;

use reqwest::{StatusCode, Url};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while fetching, verifying and materializing a file.
#[derive(Error, Debug)]
pub enum Error {
    /// The request is missing an option required by its mode.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The file could not be downloaded.
    #[error("could not download '{url}': {source}")]
    Fetch {
        url: Url,
        #[source]
        source: FetchError,
    },

    /// The downloaded bytes could not be read back for hashing.
    #[error("could not compute the sha256 of the downloaded file: {source}")]
    Digest {
        #[source]
        source: io::Error,
    },

    /// The computed digest differs from the expected one.
    ///
    /// Nothing has been written to the destination when this is returned.
    #[error("expected a sha256 of '{expected}' for '{url}', but computed '{actual}'")]
    DigestMismatch {
        url: Url,
        expected: String,
        actual: String,
    },

    /// The verified file could not be unpacked.
    #[error("could not unpack the downloaded file into {}: {source}", destination.display())]
    Unpack {
        destination: PathBuf,
        #[source]
        source: UnpackError,
    },

    /// The verified file could not be written to its destination.
    #[error("could not write the downloaded file to {}: {source}", destination.display())]
    Io {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The pipeline stage in which this error stopped the fetch.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Config(_) => Stage::Idle,
            Error::Fetch { .. } => Stage::Fetching,
            Error::Digest { .. } => Stage::Hashing,
            Error::DigestMismatch { .. } => Stage::Comparing,
            Error::Unpack { .. } | Error::Io { .. } => Stage::Materializing,
        }
    }
}

/// A required option is missing or malformed for the selected mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No URL provided; add --url <URL> to your invocation of fetchurl")]
    MissingUrl,

    #[error("URL is invalid; {0}")]
    InvalidUrl(String),

    #[error("No target location is specified; add --to or --template to your invocation of fetchurl")]
    MissingDestination,

    #[error(
        "I can't download unverified files. Please add --sha256 to your invocation of fetchurl.\n\
         Note: you can find the sha256 by running fetchurl --url $MY_URL --template"
    )]
    MissingDigest,
}

/// Failures of the transfer stage.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The temporary file could not be created or written.
    #[error("temporary storage error: {0}")]
    Storage(#[from] io::Error),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("download unsuccessful; status code {code}")]
    BadStatus { code: StatusCode },

    /// The connection broke while streaming the body.
    #[error("failed to read the response body: {0}")]
    Body(#[from] reqwest::Error),
}

impl FetchError {
    /// The HTTP status code for [`FetchError::BadStatus`], `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::BadStatus { code } => Some(*code),
            _ => None,
        }
    }
}

/// Failures of the unpack step.
#[derive(Error, Debug)]
pub enum UnpackError {
    /// No supported archive format matches the file name.
    #[error("'{name}' is not a supported archive")]
    UnsupportedFormat { name: String },

    /// The archive content is malformed or unreadable.
    #[error("failed to extract {format} archive: {source}")]
    ExtractionFailed {
        format: ArchiveFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The destination directory could not be prepared.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for fetchurl operations.
pub type Result<T> = std::result::Result<T, Error>;
