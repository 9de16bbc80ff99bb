//! Types for the certificate issuance system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Issuance preference sent to the remote API.
///
/// Alternates by attempt parity: even attempts ask for a new issuance,
/// odd attempts ask for a second copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Strategy {
    /// New issuance ("nova").
    #[serde(rename = "nova")]
    Nova,
    /// Second copy of an existing certificate ("2via").
    #[serde(rename = "2via")]
    SecondCopy,
}

impl Strategy {
    /// Strategy for a given zero-based attempt index. Pure function of the
    /// index, independent of any response content.
    pub fn for_attempt(attempt: u32) -> Self {
        if attempt % 2 == 0 {
            Strategy::Nova
        } else {
            Strategy::SecondCopy
        }
    }

    /// The `preferencia_emissao` form value.
    pub fn as_param(&self) -> &'static str {
        match self {
            Strategy::Nova => "nova",
            Strategy::SecondCopy => "2via",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// One certificate entry from the API payload.
///
/// Only the fields the engine acts on are modeled; everything else the API
/// returns is kept in `extra` so heterogeneous payloads survive the trip to
/// the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// URL of the PDF receipt, when the certificate was emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_receipt: Option<String>,
    /// Identifier as formatted by the issuing authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    /// Registered company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    /// Certificate control code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certidao_codigo: Option<String>,
    /// Validity date as reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validade_data: Option<String>,
    /// Extended validity date, if granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validade_prorrogada: Option<String>,
    /// Any other field the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Classification of a parsed API response.
///
/// Disjoint bands: success (200), known-error (600-799), unexpected
/// (anything else). A body that does not parse as the envelope is
/// `Malformed` - a value, not an error, since it is retried like the rest.
#[derive(Debug, Clone)]
pub enum IssueResponse {
    /// Success band: the certificate query completed.
    Success {
        code: i64,
        code_message: String,
        records: Vec<CertificateRecord>,
    },
    /// Known-error band (600-799): the authority reported a handled condition.
    KnownError { code: i64, message: String },
    /// Any other code; carries the raw body (truncated) for diagnosis.
    Unexpected { code: i64, body: String },
    /// Body was not parseable as the expected envelope.
    Malformed { detail: String },
}

impl IssueResponse {
    /// Short classification tag for logging.
    pub fn classification(&self) -> &'static str {
        match self {
            IssueResponse::Success { .. } => "success",
            IssueResponse::KnownError { .. } => "known_error",
            IssueResponse::Unexpected { .. } => "unexpected",
            IssueResponse::Malformed { .. } => "malformed",
        }
    }
}

/// Transport-level failures talking to the issuance API.
#[derive(Debug, Error)]
pub enum IssuerError {
    #[error("issuer connection failed: {0}")]
    ConnectionFailed(String),

    #[error("issuer request timed out")]
    Timeout,

    #[error("issuer transport error: {0}")]
    Transport(String),
}

/// Trait for certificate issuance backends.
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Query the certificate for a digits-only identifier with the given
    /// strategy. Response-body conditions come back as [`IssueResponse`]
    /// values; only transport failures are errors.
    async fn issue(&self, cnpj: &str, strategy: Strategy) -> Result<IssueResponse, IssuerError>;
}
