//! Certificate issuance API abstraction.
//!
//! This module provides a `CertificateIssuer` trait for querying remote
//! certificate-issuance backends, plus the Infosimples PGFN implementation.
//! Response bodies are classified into [`IssueResponse`] values instead of
//! being raised as errors; only transport-level failures surface as
//! [`IssuerError`].

mod infosimples;
mod types;

pub use infosimples::InfosimplesClient;
pub use types::*;
