//! Infosimples PGFN backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;

use super::{CertificateIssuer, CertificateRecord, IssueResponse, IssuerError, Strategy};

/// How much of an unexpected body is kept for diagnosis.
const BODY_SNIPPET_LEN: usize = 200;

/// Infosimples certificate issuance backend.
pub struct InfosimplesClient {
    client: Client,
    config: ApiConfig,
}

impl InfosimplesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl CertificateIssuer for InfosimplesClient {
    fn name(&self) -> &str {
        "infosimples"
    }

    async fn issue(&self, cnpj: &str, strategy: Strategy) -> Result<IssueResponse, IssuerError> {
        let timeout = self.config.timeout_secs.to_string();
        let form = [
            ("token", self.config.token.as_str()),
            ("cnpj", cnpj),
            ("preferencia_emissao", strategy.as_param()),
            ("timeout", timeout.as_str()),
        ];

        debug!(cnpj = cnpj, strategy = %strategy, "Querying issuance API");

        let response = self
            .client
            .post(&self.config.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IssuerError::Timeout
                } else if e.is_connect() {
                    IssuerError::ConnectionFailed(e.to_string())
                } else {
                    IssuerError::Transport(e.to_string())
                }
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| IssuerError::Transport(e.to_string()))?;

        Ok(classify_body(&body))
    }
}

/// Classify a response body into the three bands, or `Malformed` when it
/// does not parse as the envelope.
fn classify_body(body: &str) -> IssueResponse {
    let envelope: ApiEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return IssueResponse::Malformed {
                detail: e.to_string(),
            }
        }
    };

    match envelope.code {
        200 => IssueResponse::Success {
            code: envelope.code,
            code_message: envelope.code_message,
            records: envelope.data.into_records(),
        },
        600..=799 => IssueResponse::KnownError {
            code: envelope.code,
            message: envelope.code_message,
        },
        code => IssueResponse::Unexpected {
            code,
            body: body.chars().take(BODY_SNIPPET_LEN).collect(),
        },
    }
}

// Infosimples API response types
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    code_message: String,
    #[serde(default)]
    data: DataSection,
}

/// The `data` field arrives as a list of records, a single record, or
/// occasionally something else entirely (null on some error codes).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataSection {
    Many(Vec<CertificateRecord>),
    One(Box<CertificateRecord>),
    Other(serde_json::Value),
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection::Many(Vec::new())
    }
}

impl DataSection {
    fn into_records(self) -> Vec<CertificateRecord> {
        match self {
            DataSection::Many(records) => records,
            DataSection::One(record) => vec![*record],
            DataSection::Other(_) => Vec::new(),
        }
    }
}
