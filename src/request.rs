//! Fetch requests and their outcomes.
//!
//! A [`FetchRequest`] is the validated configuration handed to the pipeline.
//! Its constructors enforce that store and unpack requests always carry both an
//! expected digest and a destination, so the pipeline never has to re-check.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::request::{FetchRequest, Mode};
//!
//! let request = FetchRequest::store(
//!     "https://example.com/file.txt",
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
//!     "/tmp/out",
//! )?;
//! assert_eq!(request.mode(), Mode::Store);
//! assert_eq!(request.file_name(), "file.txt");
//! # Ok::<(), fetchurl::ConfigError>(())
//! ```

use crate::error::ConfigError;

use reqwest::Url;
use std::path::{Path, PathBuf};

/// What to do with the content once it has been downloaded and hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copy the verified bytes to the destination file.
    Store,
    /// Extract the verified archive into the destination directory.
    Unpack,
    /// Only report the URL and its digest; nothing is verified or written.
    ReportOnly,
}

/// A validated request for the verified-fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
    expected_digest: Option<String>,
    destination: Option<PathBuf>,
    mode: Mode,
}

impl FetchRequest {
    /// Creates a request, checking the options required by `mode`.
    ///
    /// In [`Mode::ReportOnly`] the digest and destination are optional and
    /// ignored; every other mode requires both.
    pub fn new(
        url: Url,
        expected_digest: Option<String>,
        destination: Option<PathBuf>,
        mode: Mode,
    ) -> Result<Self, ConfigError> {
        if mode != Mode::ReportOnly {
            if destination.is_none() {
                return Err(ConfigError::MissingDestination);
            }
            if expected_digest.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingDigest);
            }
        }

        Ok(Self {
            url,
            expected_digest,
            destination,
            mode,
        })
    }

    /// Request to download `url`, verify it and copy it to `destination`.
    pub fn store(
        url: &str,
        expected_digest: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            parse_url(url)?,
            Some(expected_digest.to_string()),
            Some(destination.into()),
            Mode::Store,
        )
    }

    /// Request to download `url`, verify it and extract it into `destination`.
    pub fn unpack(
        url: &str,
        expected_digest: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            parse_url(url)?,
            Some(expected_digest.to_string()),
            Some(destination.into()),
            Mode::Unpack,
        )
    }

    /// Request to download `url` and only report its digest.
    pub fn report(url: &str) -> Result<Self, ConfigError> {
        Self::new(parse_url(url)?, None, None, Mode::ReportOnly)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn expected_digest(&self) -> Option<&str> {
        self.expected_digest.as_deref()
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// File name hint derived from the URL.
    ///
    /// This is the percent-decoded last path segment, or the host name when the
    /// URL has no path. It is used to detect the archive format when unpacking.
    pub fn file_name(&self) -> String {
        file_name_hint(&self.url)
    }
}

/// Parses an absolute URL, reporting failures as [`ConfigError`].
pub fn parse_url(value: &str) -> Result<Url, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingUrl);
    }
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("\"{value}\": {e}")))
}

/// Derives a file name from the last path segment of `url`, falling back to the host.
pub fn file_name_hint(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            form_urlencoded::parse(segment.as_bytes())
                .map(|(key, val)| [key, val].concat())
                .collect::<String>()
        });

    match segment {
        Some(name) => name,
        None => url.host_str().unwrap_or_default().to_string(),
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The verified bytes were copied to this file.
    Stored(PathBuf),
    /// The verified archive was extracted into this directory.
    Unpacked(PathBuf),
    /// Report-only mode: the URL and the digest of its content.
    Reported { url: Url, digest: String },
}
