//! Consolidated run reporting.
//!
//! The aggregator absorbs terminal outcomes one by one and flattens
//! heterogeneous success payloads into one row per underlying certificate
//! record, preserving the owning identifier's key fields. The resulting
//! [`RunReport`] is the sole handoff to the persistence and export
//! collaborators.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::issuer::Strategy;
use crate::orchestrator::{normalize_cnpj, FailureRecord, TaskOutcome};

/// One flattened certificate row.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Normalized identifier the task was created for.
    pub cnpj: String,
    /// Display name of the owning task.
    pub company: String,
    /// Strategy of the winning attempt.
    pub strategy: Strategy,
    pub code: i64,
    pub code_message: String,
    /// Record identifier reduced to digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_cnpj: Option<String>,
    /// Certificate code with separator dots removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_certidao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validade_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validade_prorrogada: Option<String>,
    /// Where the receipt landed on disk.
    pub document_path: PathBuf,
    /// When the winning query ran.
    pub consulted_at: DateTime<Local>,
    /// Fields the API returned beyond the modeled set.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Accumulates terminal outcomes into a consolidated report.
#[derive(Debug, Default)]
pub struct OutcomeAggregator {
    rows: Vec<ReportRow>,
    failures: Vec<FailureRecord>,
}

impl OutcomeAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one terminal outcome.
    pub fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Succeeded(success) => {
                for record in &success.records {
                    self.rows.push(ReportRow {
                        cnpj: success.cnpj.clone(),
                        company: success.company.clone(),
                        strategy: success.strategy,
                        code: success.code,
                        code_message: success.code_message.clone(),
                        cod_cnpj: record.cnpj.as_deref().map(normalize_cnpj),
                        cod_certidao: record
                            .certidao_codigo
                            .as_deref()
                            .map(|c| c.replace('.', "")),
                        razao_social: record.razao_social.clone(),
                        site_receipt: record.site_receipt.clone(),
                        validade_data: record.validade_data.clone(),
                        validade_prorrogada: record.validade_prorrogada.clone(),
                        document_path: success.document_path.clone(),
                        consulted_at: success.consulted_at,
                        extra: record.extra.clone(),
                    });
                }
            }
            TaskOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Identifiers recorded as failed so far.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Flattened rows accumulated so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Finish accumulation and hand over the consolidated structure.
    pub fn into_report(self) -> RunReport {
        RunReport {
            rows: self.rows,
            failures: self.failures,
        }
    }
}

/// Consolidated handoff structure for persistence/export collaborators.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    /// True when the run produced neither rows nor failures.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::CertificateRecord;
    use crate::orchestrator::SuccessRecord;

    fn success_with_records(records: Vec<CertificateRecord>) -> TaskOutcome {
        TaskOutcome::Succeeded(SuccessRecord {
            cnpj: "07608821000154".to_string(),
            company: "ACME LTDA".to_string(),
            strategy: Strategy::Nova,
            code: 200,
            code_message: "ok".to_string(),
            records,
            document_path: PathBuf::from("/out/ACME LTDA/doc.pdf"),
            consulted_at: Local::now(),
        })
    }

    #[test]
    fn test_single_record_becomes_one_row() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record(success_with_records(vec![CertificateRecord {
            cnpj: Some("07.608.821/0001-54".to_string()),
            certidao_codigo: Some("A1B2.C3D4".to_string()),
            ..Default::default()
        }]));

        let report = aggregator.into_report();
        assert_eq!(report.rows.len(), 1);
        assert!(report.failures.is_empty());

        let row = &report.rows[0];
        assert_eq!(row.cnpj, "07608821000154");
        assert_eq!(row.company, "ACME LTDA");
        assert_eq!(row.cod_cnpj.as_deref(), Some("07608821000154"));
        assert_eq!(row.cod_certidao.as_deref(), Some("A1B2C3D4"));
    }

    #[test]
    fn test_multi_record_payload_is_flattened_per_record() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record(success_with_records(vec![
            CertificateRecord {
                razao_social: Some("ACME MATRIZ".to_string()),
                ..Default::default()
            },
            CertificateRecord {
                razao_social: Some("ACME FILIAL".to_string()),
                ..Default::default()
            },
        ]));

        let report = aggregator.into_report();
        assert_eq!(report.rows.len(), 2);
        // Owning identifier's key fields are preserved on every row
        assert!(report.rows.iter().all(|r| r.cnpj == "07608821000154"));
        assert!(report.rows.iter().all(|r| r.company == "ACME LTDA"));
        assert_eq!(report.rows[0].razao_social.as_deref(), Some("ACME MATRIZ"));
        assert_eq!(report.rows[1].razao_social.as_deref(), Some("ACME FILIAL"));
    }

    #[test]
    fn test_failures_accumulate_separately() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record(TaskOutcome::Failed(FailureRecord {
            cnpj: "26414755000126".to_string(),
            company: "OUTRA SA".to_string(),
            attempts: 3,
            reason: "all attempts exhausted".to_string(),
        }));

        assert_eq!(aggregator.failure_count(), 1);
        assert_eq!(aggregator.row_count(), 0);

        let report = aggregator.into_report();
        assert!(report.rows.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].cnpj, "26414755000126");
    }

    #[test]
    fn test_report_serialization_skips_empty_fields() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record(success_with_records(vec![CertificateRecord::default()]));
        let report = aggregator.into_report();

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("failures"));
        assert!(!json.contains("razao_social"));
        assert!(!json.contains("extra"));
    }
}
