//! Types for the receipt download system.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download connection failed: {0}")]
    ConnectionFailed(String),

    #[error("download request timed out")]
    Timeout,

    #[error("download failed with HTTP status {0}")]
    HttpStatus(u16),

    /// The resource declared a content type other than the expected one.
    /// Distinct from transport failures, but retried all the same.
    #[error("resource is not {expected}: got {actual}")]
    InvalidContentType { expected: String, actual: String },

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    /// The retry budget is spent; the caller decides how to proceed.
    #[error("download exhausted after {attempts} attempts: {url}")]
    Exhausted { url: String, attempts: u32 },
}

/// Trait for receipt download backends.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Stream the resource at `url` to `dest`, validating it on the way.
    /// On error, no file is left at `dest`.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}
