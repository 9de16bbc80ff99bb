//! Mock certificate issuer for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::issuer::{CertificateIssuer, IssueResponse, IssuerError, Strategy};

/// A recorded issuance call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedIssue {
    /// The identifier that was queried.
    pub cnpj: String,
    /// The strategy the orchestrator chose for this call.
    pub strategy: Strategy,
}

/// Mock implementation of the CertificateIssuer trait.
///
/// Responses are scripted: they are served in FIFO order, and once the
/// script runs dry the mock answers with a known-error band response so a
/// test never hangs on an empty queue.
pub struct MockIssuer {
    responses: Arc<RwLock<VecDeque<Result<IssueResponse, IssuerError>>>>,
    calls: Arc<RwLock<Vec<RecordedIssue>>>,
}

impl std::fmt::Debug for MockIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockIssuer")
            .field("responses", &"<responses>")
            .field("calls", &"<calls>")
            .finish()
    }
}

impl Default for MockIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIssuer {
    /// Create a new mock issuer with an empty script.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(VecDeque::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue the next scripted response.
    pub async fn push_response(&self, response: Result<IssueResponse, IssuerError>) {
        self.responses.write().await.push_back(response);
    }

    /// Get recorded issuance calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedIssue> {
        self.calls.read().await.clone()
    }

    /// Get the number of issuance calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl CertificateIssuer for MockIssuer {
    fn name(&self) -> &str {
        "mock-issuer"
    }

    async fn issue(&self, cnpj: &str, strategy: Strategy) -> Result<IssueResponse, IssuerError> {
        self.calls.write().await.push(RecordedIssue {
            cnpj: cnpj.to_string(),
            strategy,
        });

        self.responses.write().await.pop_front().unwrap_or_else(|| {
            Ok(IssueResponse::KnownError {
                code: 600,
                message: "mock script exhausted".to_string(),
            })
        })
    }
}
