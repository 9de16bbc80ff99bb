//! Receipt download abstraction.
//!
//! This module provides a `Downloader` trait for fetching certificate
//! receipts, plus the streaming HTTP implementation. Validation (declared
//! content type) happens before any byte reaches the disk, and a failed
//! attempt never leaves a partial file behind.

mod config;
mod http;
mod types;

pub use config::DownloadConfig;
pub use http::HttpDownloader;
pub use types::{DownloadError, Downloader};
