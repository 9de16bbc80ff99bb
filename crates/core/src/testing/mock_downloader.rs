//! Mock downloader for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::downloader::{DownloadError, Downloader};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The receipt URL that was requested.
    pub url: String,
    /// Where the orchestrator asked for the document.
    pub dest: PathBuf,
}

/// Mock implementation of the Downloader trait.
///
/// Outcomes are scripted in FIFO order; once the script runs dry every
/// fetch succeeds. A successful fetch writes a tiny document to `dest` so
/// the success path leaves a real file behind, like the HTTP implementation
/// would.
pub struct MockDownloader {
    outcomes: Arc<RwLock<VecDeque<Result<(), DownloadError>>>>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl std::fmt::Debug for MockDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDownloader")
            .field("outcomes", &"<outcomes>")
            .field("fetches", &"<fetches>")
            .finish()
    }
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDownloader {
    /// Create a new mock downloader where every fetch succeeds.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(VecDeque::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue the next scripted outcome.
    pub async fn push_outcome(&self, outcome: Result<(), DownloadError>) {
        self.outcomes.write().await.push_back(outcome);
    }

    /// Queue an exhausted-budget failure, the error the HTTP downloader
    /// surfaces after its own retries.
    pub async fn push_exhausted(&self, url: &str) {
        self.push_outcome(Err(DownloadError::Exhausted {
            url: url.to_string(),
            attempts: 3,
        }))
        .await;
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl Downloader for MockDownloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.fetches.write().await.push(RecordedFetch {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        });

        match self.outcomes.write().await.pop_front() {
            Some(Err(e)) => Err(e),
            Some(Ok(())) | None => {
                tokio::fs::write(dest, b"%PDF-1.4\n%mock receipt\n").await?;
                Ok(())
            }
        }
    }
}
