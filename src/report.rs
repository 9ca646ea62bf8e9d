//! Usage snippets for report-only runs.
//!
//! When fetchurl is run without an expected digest it downloads the file,
//! computes its digest and prints how to embed the verified invocation in a
//! build. A [`Report`] renders that either as a Dockerfile multi-stage snippet
//! ([`Report::dockerfile`]) or as a single command line ([`Report::invocation`]).
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::report::Report;
//! use reqwest::Url;
//!
//! let url = Url::parse("https://example.com/archive.tar.gz").unwrap();
//! let report = Report::new(url, "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824");
//! assert_eq!(report.name(), "archive_tar_gz");
//! assert_eq!(report.target(), "/archive.tar.gz");
//! assert!(report.unpack_recommended());
//! ```

use crate::request::file_name_hint;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

/// Image providing the fetchurl binary in the Dockerfile snippet.
pub const DEFAULT_FETCHER_IMAGE: &str = "moretea/docker-fetchurl";

/// File name suffixes for which unpacking is suggested.
pub const ARCHIVE_SUFFIXES: &[&str] = &[
    ".zip", ".tar", ".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".tar.xz", ".txz", ".tar.lz4",
    ".tlz4", ".tar.sz", ".tsz", ".rar",
];

/// Suffixes in [`ARCHIVE_SUFFIXES`] the bundled unpacker cannot extract.
pub const UNPACK_UNSUPPORTED: &[&str] = &[".rar"];

/// Used when nothing of the target name survives normalization.
const FALLBACK_NAME: &str = "download";

static LEADING_NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new("^[^a-z]+").unwrap());
static NON_LETTER_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-z]+").unwrap());

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Dockerfile snippet with a dedicated fetcher stage.
    #[default]
    Dockerfile,
    /// One-line `fetchurl` invocation.
    Invocation,
}

/// The URL and digest of a fetched file, plus everything derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    url: Url,
    digest: String,
    target: String,
    name: String,
    unpack: bool,
    image: String,
}

impl Report {
    /// Builds a report for `url` whose content hashes to `digest`.
    pub fn new(url: Url, digest: impl Into<String>) -> Self {
        let target = target_path(&url);
        let name = derive_name(&target);
        let unpack = recommends_unpack(&target);

        Self {
            url,
            digest: digest.into(),
            target,
            name,
            unpack,
            image: DEFAULT_FETCHER_IMAGE.to_string(),
        }
    }

    /// Uses another image for the fetcher stage.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Identifier used to name the fetcher stage.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suggested target path: `/` followed by the last path segment or the host.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the target looks like an archive worth unpacking.
    pub fn unpack_recommended(&self) -> bool {
        self.unpack
    }

    /// Renders the report in the given style.
    pub fn render(&self, style: ReportStyle) -> String {
        match style {
            ReportStyle::Dockerfile => self.dockerfile(),
            ReportStyle::Invocation => self.invocation(),
        }
    }

    /// One-line invocation that downloads and verifies this URL.
    pub fn invocation(&self) -> String {
        format!("fetchurl --url \"{}\" --sha256 {}", self.url, self.digest)
    }

    /// Dockerfile snippet that fetches the file in its own stage and copies
    /// the result into a later one.
    pub fn dockerfile(&self) -> String {
        let unpack = if self.unpack { "    \"--unpack\", \\\n" } else { "" };
        format!(
            concat!(
                "\n",
                "# Add the following snippet to your Dockerfile:\n",
                "FROM {image} AS {name}_fetcher\n",
                "RUN [\"fetchurl\", \\\n",
                "    \"--url\", \"{url}\", \\\n",
                "    \"--sha256\", \"{digest}\", \\\n",
                "{unpack}",
                "    \"--to\", \"{target}\"]\n",
                "\n",
                "# And use in another layer like:\n",
                "FROM ...\n",
                "...\n",
                "COPY --from={name}_fetcher {target} {target}\n",
            ),
            image = self.image,
            name = self.name,
            url = self.url,
            digest = self.digest,
            unpack = unpack,
            target = self.target,
        )
    }
}

/// `/` followed by the decoded last path segment of `url`, or by its host
/// when the path has no final segment.
pub fn target_path(url: &Url) -> String {
    format!("/{}", file_name_hint(url))
}

/// Normalizes a target path into an identifier.
///
/// The path is lowercased, its leading run of characters outside `a-z` is
/// dropped and every other such run becomes a single `_`.
pub fn derive_name(target: &str) -> String {
    let lower = target.to_lowercase();
    let trimmed = LEADING_NON_LETTERS.replace(&lower, "");
    let name = NON_LETTER_RUNS.replace_all(&trimmed, "_");

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.into_owned()
    }
}

/// Returns `true` if `target` ends with one of [`ARCHIVE_SUFFIXES`].
pub fn recommends_unpack(target: &str) -> bool {
    ARCHIVE_SUFFIXES
        .iter()
        .any(|suffix| target.ends_with(suffix))
}
