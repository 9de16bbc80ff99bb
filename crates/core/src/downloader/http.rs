//! Streaming HTTP downloader implementation.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::config::DownloadConfig;
use super::types::{DownloadError, Downloader};

/// HTTP downloader that streams the body to disk in chunks.
pub struct HttpDownloader {
    client: Client,
    config: DownloadConfig,
}

impl HttpDownloader {
    /// Create a new downloader with the given configuration.
    pub fn new(config: DownloadConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// One attempt: request, validate the declared content type, then
    /// stream chunks to `dest`. The file is only created after validation
    /// passes, so a rejected resource never touches the disk.
    async fn fetch_once(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type != self.config.expected_content_type {
            return Err(DownloadError::InvalidContentType {
                expected: self.config.expected_content_type.clone(),
                actual: content_type,
            });
        }

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut total_bytes = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_transport_error)?;
            file.write_all(&chunk).await?;
            total_bytes += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url = url, bytes = total_bytes, "Document streamed to disk");
        Ok(())
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        for attempt in 1..=self.config.max_attempts {
            match self.fetch_once(url, dest).await {
                Ok(()) => {
                    debug!(url = url, attempt, "Download succeeded");
                    return Ok(());
                }
                Err(e) => {
                    warn!(url = url, attempt, error = %e, "Download attempt failed");
                    discard_partial(dest).await;
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_pause_ms))
                            .await;
                    }
                }
            }
        }

        Err(DownloadError::Exhausted {
            url: url.to_string(),
            attempts: self.config.max_attempts,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> DownloadError {
    if e.is_timeout() {
        DownloadError::Timeout
    } else {
        DownloadError::ConnectionFailed(e.to_string())
    }
}

/// Remove whatever a failed attempt left at `dest`.
async fn discard_partial(dest: &Path) {
    if let Err(e) = fs::remove_file(dest).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %dest.display(), error = %e, "Failed to discard partial download");
        }
    }
}
