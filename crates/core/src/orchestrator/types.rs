//! Types for the retrieval orchestrator.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::issuer::{CertificateRecord, Strategy};

/// Characters Windows and network shares reject in path components.
static INVALID_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));

/// Cap on destination subfolder names (shared drives choke well before
/// the 255-byte filesystem limit once the full path is counted).
const MAX_FOLDER_NAME_CHARS: usize = 150;

/// One identifier's certificate request.
#[derive(Debug, Clone)]
pub struct RetrievalTask {
    /// Task id for log correlation.
    pub id: Uuid,
    /// Identifier normalized to digits only.
    pub cnpj: String,
    /// Display name, used for the destination subfolder.
    pub company: String,
    /// Attempts consumed so far.
    pub attempts: u32,
    /// Where the task is in its lifecycle.
    pub state: TaskState,
}

impl RetrievalTask {
    /// Create a pending task. The identifier is normalized here, once.
    pub fn new(cnpj: &str, company: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            cnpj: normalize_cnpj(cnpj),
            company: company.trim().to_string(),
            attempts: 0,
            state: TaskState::Pending,
        }
    }
}

/// Lifecycle states for a retrieval task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// Created, no attempt made yet.
    Pending,
    /// An API request is in flight.
    Requesting { attempt: u32, strategy: Strategy },
    /// Waiting out the pause before the next attempt.
    Retrying { attempt: u32 },
    /// Receipt downloaded and saved; terminal.
    Succeeded,
    /// Attempt budget spent without a saved receipt; terminal.
    Failed,
}

impl TaskState {
    /// State name for logging.
    pub fn state_type(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Requesting { .. } => "requesting",
            TaskState::Retrying { .. } => "retrying",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        }
    }
}

/// Terminal value for one task.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    Succeeded(SuccessRecord),
    Failed(FailureRecord),
}

/// Success payload handed to the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessRecord {
    pub cnpj: String,
    pub company: String,
    /// Strategy of the attempt that produced the saved document.
    pub strategy: Strategy,
    pub code: i64,
    pub code_message: String,
    /// Payload records exactly as the API returned them.
    pub records: Vec<CertificateRecord>,
    /// Where the receipt landed on disk.
    pub document_path: PathBuf,
    /// When the winning query ran.
    pub consulted_at: DateTime<Local>,
}

/// Failure entry handed to the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub cnpj: String,
    pub company: String,
    pub attempts: u32,
    pub reason: String,
}

/// Strip everything but digits from an identifier.
pub fn normalize_cnpj(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Strip characters invalid in filesystem names, trim, and cap the length.
pub fn sanitize_folder_name(name: &str) -> String {
    let cleaned = INVALID_PATH_CHARS.replace_all(name.trim(), "");
    cleaned.trim().chars().take(MAX_FOLDER_NAME_CHARS).collect()
}

/// File name for a saved receipt: `<cnpj>_<strategy>_<timestamp>.pdf`.
pub fn document_file_name(cnpj: &str, strategy: Strategy, at: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.pdf",
        cnpj,
        strategy.as_param(),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}
