//! Command line surface of the `fetchurl` binary.
//!
//! Flags are parsed with clap and then validated into a
//! [`FetchRequest`]. Validation errors use the [`ConfigError`] messages, which
//! tell the user which flag to add.

use crate::digest::is_sha256_hex;
use crate::error::ConfigError;
use crate::report::ReportStyle;
use crate::request::{parse_url, FetchRequest, Mode};

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::warn;

/// Download a file, verify its SHA-256 and store or unpack it.
#[derive(Debug, Parser)]
#[command(name = "fetchurl", version)]
#[command(about = "Download a file and verify its sha256 before storing or unpacking it", long_about = None)]
pub struct Cli {
    /// URL to download.
    #[arg(long)]
    pub url: Option<String>,

    /// The sha256 of the to-download file, in lowercase hex.
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    /// Where to store the end result.
    #[arg(long, value_name = "PATH")]
    pub to: Option<PathBuf>,

    /// Unpack the archive into the --to directory.
    #[arg(long)]
    pub unpack: bool,

    /// Download, compute sha256 and print a Dockerfile snippet.
    #[arg(long, conflicts_with = "test")]
    pub template: bool,

    /// Download, compute sha256 and print the matching fetchurl invocation.
    #[arg(long)]
    pub test: bool,

    /// User-Agent header sent with the request.
    #[arg(long, env = "FETCHURL_USER_AGENT", value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Directory for the temporary download.
    #[arg(long = "tmp-dir", env = "FETCHURL_TMPDIR", value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Do not draw a progress bar.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Selected mode: report-only with `--template` or `--test`, otherwise
    /// unpack or store.
    pub fn mode(&self) -> Mode {
        if self.template || self.test {
            Mode::ReportOnly
        } else if self.unpack {
            Mode::Unpack
        } else {
            Mode::Store
        }
    }

    /// How the report is printed in report-only mode.
    pub fn report_style(&self) -> ReportStyle {
        if self.test {
            ReportStyle::Invocation
        } else {
            ReportStyle::Dockerfile
        }
    }

    /// Validates the flags into a request.
    pub fn to_request(&self) -> Result<FetchRequest, ConfigError> {
        let url = parse_url(self.url.as_deref().unwrap_or_default())?;
        let mode = self.mode();

        if mode != Mode::ReportOnly {
            if let Some(digest) = self.sha256.as_deref().filter(|d| !d.is_empty()) {
                if !is_sha256_hex(digest) {
                    warn!(
                        "--sha256 {:?} is not 64 lowercase hex characters and will not match",
                        digest
                    );
                }
            }
        }

        FetchRequest::new(url, self.sha256.clone(), self.to.clone(), mode)
    }
}
