//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits so
//! the orchestrator can be exercised end to end without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use cnd_core::testing::{fixtures, MockDownloader, MockIssuer};
//!
//! let issuer = MockIssuer::new();
//! issuer
//!     .push_response(Ok(fixtures::success_with_receipt(
//!         "07608821000154",
//!         "https://example.test/receipt.pdf",
//!     )))
//!     .await;
//!
//! let downloader = MockDownloader::new();
//! // ... wire both into a RetrievalOrchestrator
//! ```

mod mock_downloader;
mod mock_issuer;

pub use mock_downloader::{MockDownloader, RecordedFetch};
pub use mock_issuer::{MockIssuer, RecordedIssue};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::issuer::{CertificateRecord, IssueResponse};

    /// A certificate record carrying a receipt link.
    pub fn receipt_record(cnpj: &str, link: &str) -> CertificateRecord {
        CertificateRecord {
            site_receipt: Some(link.to_string()),
            cnpj: Some(cnpj.to_string()),
            ..Default::default()
        }
    }

    /// A success-band response with a single downloadable record.
    pub fn success_with_receipt(cnpj: &str, link: &str) -> IssueResponse {
        IssueResponse::Success {
            code: 200,
            code_message: "ok".to_string(),
            records: vec![receipt_record(cnpj, link)],
        }
    }

    /// A success-band response whose records carry no receipt link.
    pub fn success_without_receipt(cnpj: &str) -> IssueResponse {
        IssueResponse::Success {
            code: 200,
            code_message: "ok".to_string(),
            records: vec![CertificateRecord {
                cnpj: Some(cnpj.to_string()),
                ..Default::default()
            }],
        }
    }

    /// A known-error band response.
    pub fn known_error(code: i64) -> IssueResponse {
        IssueResponse::KnownError {
            code,
            message: format!("erro {}", code),
        }
    }
}
