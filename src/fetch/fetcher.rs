//! Streaming HTTP transfer into a temporary artifact.

use super::client::{create_http_client, HttpClientConfig};
use crate::artifact::TemporaryArtifact;
use crate::error::FetchError;
use crate::progress::ProgressBarOpts;
use crate::request::file_name_hint;

use futures::stream::StreamExt;
use reqwest::{StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Downloads a URL with a single GET request.
///
/// Only `200 OK` counts as success. The body is written chunk by chunk, so the
/// payload is never held in memory as a whole.
#[derive(Clone)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
    progress: ProgressBarOpts,
    temp_dir: Option<PathBuf>,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("progress", &self.progress)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

impl HttpFetcher {
    /// Creates a fetcher with its own HTTP client.
    pub fn new(config: HttpClientConfig, progress: ProgressBarOpts) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(create_http_client(config)?, progress))
    }

    /// Creates a fetcher around an existing client.
    pub fn with_client(client: ClientWithMiddleware, progress: ProgressBarOpts) -> Self {
        Self {
            client,
            progress,
            temp_dir: None,
        }
    }

    /// Sets the directory in which [`HttpFetcher::fetch`] allocates artifacts.
    pub fn temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Gets the directory used for temporary artifacts, if one was configured.
    pub fn temp_dir_path(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Allocates a new artifact, then downloads `url` into it.
    ///
    /// On failure the partially written artifact is dropped, which deletes it.
    pub async fn fetch(&self, url: &Url) -> Result<TemporaryArtifact, FetchError> {
        let mut artifact =
            TemporaryArtifact::allocate_in(self.temp_dir.as_deref(), file_name_hint(url))?;
        self.fetch_into(url, &mut artifact).await?;
        Ok(artifact)
    }

    /// Downloads `url` into an already allocated artifact.
    ///
    /// Returns the number of bytes written. The artifact's read position is
    /// left untouched.
    pub async fn fetch_into(
        &self,
        url: &Url,
        artifact: &mut TemporaryArtifact,
    ) -> Result<u64, FetchError> {
        debug!("Fetching {}", url);
        let res = self.client.get(url.clone()).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            debug!("{} answered with {}", url, status);
            return Err(FetchError::BadStatus { code: status });
        }

        let pb = self
            .progress
            .clone()
            .to_progress_bar(res.content_length().unwrap_or(0));

        let mut size: u64 = 0;
        let streamed: Result<(), FetchError> = async {
            let mut file = tokio::fs::File::from_std(artifact.writer()?);

            debug!("Retrieving chunks into {:?}", artifact.path());
            let mut stream = res.bytes_stream();
            while let Some(item) = stream.next().await {
                let mut chunk = item?;
                let chunk_size = chunk.len() as u64;
                size += chunk_size;
                pb.inc(chunk_size);
                file.write_all_buf(&mut chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = streamed {
            pb.finish_and_clear();
            debug!("Transfer of {} stopped after {} bytes: {}", url, size, e);
            return Err(e);
        }

        self.progress.finish(pb);
        debug!("Fetched {} bytes from {}", size, url);

        Ok(size)
    }
}
