//! Per-identifier retrieval state machine.
//!
//! The orchestrator drives each identifier through the attempt loop:
//! - **Request**: one API call per attempt, strategy chosen by attempt parity
//! - **Classify**: success / known-error / unexpected / malformed / transport
//! - **Download**: on a qualifying success, the receipt is fetched and saved
//!
//! Every outcome becomes a value; nothing raises past `process()`.

mod config;
mod runner;
mod types;

pub use config::RetrievalConfig;
pub use runner::RetrievalOrchestrator;
pub use types::{
    document_file_name, normalize_cnpj, sanitize_folder_name, FailureRecord, RetrievalTask,
    SuccessRecord, TaskOutcome, TaskState,
};
