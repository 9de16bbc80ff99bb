//! Retrieval orchestrator implementation.
//!
//! Drives identifiers strictly one at a time; within a task, attempts are
//! sequential and strategy alternation is a pure function of the attempt
//! index.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::downloader::Downloader;
use crate::issuer::{CertificateIssuer, IssueResponse, Strategy};
use crate::report::{OutcomeAggregator, RunReport};

use super::config::RetrievalConfig;
use super::types::{
    document_file_name, sanitize_folder_name, FailureRecord, RetrievalTask, SuccessRecord,
    TaskOutcome, TaskState,
};

/// The retrieval orchestrator - drives identifiers through the attempt loop.
pub struct RetrievalOrchestrator {
    config: RetrievalConfig,
    issuer: Arc<dyn CertificateIssuer>,
    downloader: Arc<dyn Downloader>,
    dest_root: PathBuf,
}

impl RetrievalOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: RetrievalConfig,
        issuer: Arc<dyn CertificateIssuer>,
        downloader: Arc<dyn Downloader>,
        dest_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            issuer,
            downloader,
            dest_root: dest_root.into(),
        }
    }

    /// Drive every task to a terminal outcome, in the order supplied, and
    /// hand back the consolidated report. One task's failure never blocks
    /// the next.
    pub async fn process_all(&self, tasks: Vec<RetrievalTask>) -> RunReport {
        let mut aggregator = OutcomeAggregator::new();
        let total = tasks.len();

        for (idx, task) in tasks.into_iter().enumerate() {
            debug!(
                position = idx + 1,
                total,
                cnpj = %task.cnpj,
                "Processing identifier"
            );
            let outcome = self.process(task).await;
            aggregator.record(outcome);
        }

        aggregator.into_report()
    }

    /// Drive a single task to a terminal outcome.
    ///
    /// Never returns an error: every failure, including the destination
    /// side effect, is absorbed into the outcome value.
    pub async fn process(&self, mut task: RetrievalTask) -> TaskOutcome {
        let subfolder = self.dest_root.join(sanitize_folder_name(&task.company));
        if let Err(e) = tokio::fs::create_dir_all(&subfolder).await {
            warn!(
                cnpj = %task.cnpj,
                path = %subfolder.display(),
                error = %e,
                "Failed to create destination folder"
            );
            task.state = TaskState::Failed;
            return TaskOutcome::Failed(FailureRecord {
                cnpj: task.cnpj,
                company: task.company,
                attempts: 0,
                reason: format!("destination folder creation failed: {}", e),
            });
        }

        let mut last_error = String::new();

        while task.attempts < self.config.max_attempts {
            let attempt = task.attempts;
            let strategy = Strategy::for_attempt(attempt);
            task.state = TaskState::Requesting { attempt, strategy };
            debug!(
                cnpj = %task.cnpj,
                attempt,
                strategy = %strategy,
                "Issuing certificate request"
            );

            let result = self.issuer.issue(&task.cnpj, strategy).await;
            task.attempts += 1;

            match result {
                Ok(IssueResponse::Success {
                    code,
                    code_message,
                    records,
                }) => match records.iter().find_map(|r| r.site_receipt.clone()) {
                    Some(link) => {
                        let consulted_at = Local::now();
                        let dest =
                            subfolder.join(document_file_name(&task.cnpj, strategy, consulted_at));

                        match self.downloader.fetch(&link, &dest).await {
                            Ok(()) => {
                                info!(
                                    cnpj = %task.cnpj,
                                    attempt,
                                    path = %dest.display(),
                                    "Receipt saved"
                                );
                                task.state = TaskState::Succeeded;
                                return TaskOutcome::Succeeded(SuccessRecord {
                                    cnpj: task.cnpj,
                                    company: task.company,
                                    strategy,
                                    code,
                                    code_message,
                                    records,
                                    document_path: dest,
                                    consulted_at,
                                });
                            }
                            Err(e) => {
                                // The attempt is consumed; parity still picks
                                // the next strategy.
                                warn!(
                                    cnpj = %task.cnpj,
                                    attempt,
                                    error = %e,
                                    "Receipt download failed"
                                );
                                last_error = e.to_string();
                            }
                        }
                    }
                    None => {
                        warn!(
                            cnpj = %task.cnpj,
                            attempt,
                            "Success response carried no receipt link"
                        );
                        last_error = "success response without receipt link".to_string();
                    }
                },
                Ok(IssueResponse::KnownError { code, message }) => {
                    warn!(
                        cnpj = %task.cnpj,
                        attempt,
                        code,
                        message = %message,
                        "API reported a known error"
                    );
                    last_error = format!("API error {}: {}", code, message);
                }
                Ok(IssueResponse::Unexpected { code, body }) => {
                    warn!(
                        cnpj = %task.cnpj,
                        attempt,
                        code,
                        body = %body,
                        "Unexpected API response"
                    );
                    last_error = format!("unexpected response code {}", code);
                }
                Ok(IssueResponse::Malformed { detail }) => {
                    warn!(
                        cnpj = %task.cnpj,
                        attempt,
                        detail = %detail,
                        "Response body was not parseable"
                    );
                    last_error = format!("malformed response: {}", detail);
                }
                Err(e) => {
                    warn!(cnpj = %task.cnpj, attempt, error = %e, "Request failed");
                    last_error = e.to_string();
                }
            }

            if task.attempts < self.config.max_attempts {
                task.state = TaskState::Retrying {
                    attempt: task.attempts,
                };
                tokio::time::sleep(Duration::from_millis(self.config.attempt_pause_ms)).await;
            }
        }

        info!(
            cnpj = %task.cnpj,
            attempts = task.attempts,
            "All attempts exhausted"
        );
        task.state = TaskState::Failed;
        TaskOutcome::Failed(FailureRecord {
            cnpj: task.cnpj,
            company: task.company,
            attempts: task.attempts,
            reason: if last_error.is_empty() {
                "all attempts exhausted".to_string()
            } else {
                format!("all attempts exhausted, last error: {}", last_error)
            },
        })
    }
}
