//! Execution of a single verified fetch.

use super::config::PipelineConfig;
use super::stage::Stage;
use crate::artifact::TemporaryArtifact;
use crate::digest;
use crate::error::{ConfigError, Error, FetchError, Result};
use crate::fetch::HttpFetcher;
use crate::materialize::Materializer;
use crate::request::{FetchOutcome, FetchRequest, Mode};

use std::path::Path;
use tracing::{debug, info, warn};

/// Runs fetch requests: download, hash, verify, then store or unpack.
///
/// Content is only written to its destination after its SHA-256 matched the
/// expected digest exactly. The temporary artifact of a run is deleted before
/// [`run`](Pipeline::run) returns, whatever the outcome.
///
/// ```rust,no_run
/// use fetchurl::pipeline::PipelineBuilder;
/// use fetchurl::request::{FetchOutcome, FetchRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = PipelineBuilder::new().build()?;
/// let request = FetchRequest::store(
///     "https://example.com/hello.txt",
///     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
///     "hello.txt",
/// )?;
///
/// match pipeline.run(&request).await? {
///     FetchOutcome::Stored(path) => println!("Downloaded to {}", path.display()),
///     outcome => println!("{:?}", outcome),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: HttpFetcher,
    materializer: Materializer,
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline using the bundled archive support.
    pub fn new(config: PipelineConfig) -> std::result::Result<Self, reqwest::Error> {
        Self::with_materializer(config, Materializer::default())
    }

    /// Creates a pipeline materializing through `materializer`.
    pub fn with_materializer(
        config: PipelineConfig,
        materializer: Materializer,
    ) -> std::result::Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(config.http.clone(), config.progress.clone())?
            .temp_dir(config.temp_dir.clone());

        Ok(Self {
            fetcher,
            materializer,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Executes `request`.
    ///
    /// The first failing stage stops the run. Failing to delete the temporary
    /// artifact afterwards is logged but never replaces the run's result.
    pub async fn run(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let url = request.url();
        enter(Stage::Idle, url.as_str());

        let mut artifact = TemporaryArtifact::allocate_in(
            self.config.temp_dir.as_deref(),
            request.file_name(),
        )
        .map_err(|e| Error::Fetch {
            url: url.clone(),
            source: FetchError::Storage(e),
        })?;

        let result = self.process(request, &mut artifact).await;

        let path = artifact.path().to_path_buf();
        if let Err(e) = artifact.release() {
            warn!("Could not remove temporary file {:?}: {}", path, e);
        }

        match &result {
            Ok(_) => enter(Stage::Done, url.as_str()),
            Err(e) => debug!("Fetch of {} failed while {}: {}", url, e.stage(), e),
        }
        result
    }

    async fn process(
        &self,
        request: &FetchRequest,
        artifact: &mut TemporaryArtifact,
    ) -> Result<FetchOutcome> {
        let url = request.url();

        enter(Stage::Fetching, url.as_str());
        let size = self
            .fetcher
            .fetch_into(url, artifact)
            .await
            .map_err(|source| Error::Fetch {
                url: url.clone(),
                source,
            })?;
        info!("Downloaded {} bytes from {}", size, url);

        enter(Stage::Hashing, url.as_str());
        let actual = artifact
            .rewind()
            .and_then(|_| digest::sha256_hex(artifact))
            .map_err(|source| Error::Digest { source })?;
        info!("Computed sha256 {} for {}", actual, url);

        let destination = match (request.mode(), request.expected_digest(), request.destination()) {
            (Mode::ReportOnly, _, _) => {
                enter(Stage::Reporting, url.as_str());
                return Ok(FetchOutcome::Reported {
                    url: url.clone(),
                    digest: actual,
                });
            }
            (_, Some(expected), Some(destination)) => {
                enter(Stage::Comparing, url.as_str());
                if !digest::verify(expected, &actual) {
                    return Err(Error::DigestMismatch {
                        url: url.clone(),
                        expected: expected.to_string(),
                        actual,
                    });
                }
                destination
            }
            // Store and unpack requests are built with both a digest and a
            // destination, see `FetchRequest::new`.
            (_, None, _) => return Err(ConfigError::MissingDigest.into()),
            (_, _, None) => return Err(ConfigError::MissingDestination.into()),
        };

        enter(Stage::Materializing, url.as_str());
        self.materialize(request.mode(), artifact, destination)
    }

    fn materialize(
        &self,
        mode: Mode,
        artifact: &mut TemporaryArtifact,
        destination: &Path,
    ) -> Result<FetchOutcome> {
        if mode == Mode::Unpack {
            let name = artifact.name().to_string();
            let format = self
                .materializer
                .unpack(artifact, &name, destination)
                .map_err(|source| Error::Unpack {
                    destination: destination.to_path_buf(),
                    source,
                })?;
            info!("Unpacked {} archive into {:?}", format, destination);
            Ok(FetchOutcome::Unpacked(destination.to_path_buf()))
        } else {
            let written = self
                .materializer
                .store(artifact, destination)
                .map_err(|source| Error::Io {
                    destination: destination.to_path_buf(),
                    source,
                })?;
            info!("Stored {} bytes at {:?}", written, destination);
            Ok(FetchOutcome::Stored(destination.to_path_buf()))
        }
    }
}

fn enter(stage: Stage, url: &str) {
    debug!(%stage, "Pipeline stage for {}", url);
}
