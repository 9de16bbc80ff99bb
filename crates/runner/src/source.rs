//! Identifier list input.
//!
//! Stands in for the out-of-scope spreadsheet reader: the runner takes a
//! JSON array of `{"cnpj": "...", "company": "..."}` objects, already
//! extracted from the control file by the external collaborator.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use cnd_core::RetrievalTask;

/// CNPJs are exactly 14 digits once normalized.
const CNPJ_LEN: usize = 14;

#[derive(Debug, Deserialize)]
struct TaskEntry {
    cnpj: String,
    company: String,
}

/// Load the identifier list, dropping entries that do not normalize to a
/// valid identifier.
pub async fn load_tasks(path: &Path) -> Result<Vec<RetrievalTask>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    let entries: Vec<TaskEntry> =
        serde_json::from_str(&raw).context("Task list is not valid JSON")?;

    let mut tasks = Vec::with_capacity(entries.len());
    for entry in entries {
        let task = RetrievalTask::new(&entry.cnpj, &entry.company);
        if task.cnpj.len() != CNPJ_LEN {
            warn!(
                cnpj = %entry.cnpj,
                company = %entry.company,
                "Skipping entry with invalid identifier"
            );
            continue;
        }
        tasks.push(task);
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_tasks(content: &str) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        tokio::fs::write(&path, content).await.unwrap();
        (temp, path)
    }

    #[tokio::test]
    async fn test_load_tasks_normalizes_identifiers() {
        let (_temp, path) = write_tasks(
            r#"[
                {"cnpj": "07.608.821/0001-54", "company": "ACME LTDA"},
                {"cnpj": "26414755000126", "company": "OUTRA SA"}
            ]"#,
        )
        .await;

        let tasks = load_tasks(&path).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].cnpj, "07608821000154");
        assert_eq!(tasks[1].cnpj, "26414755000126");
    }

    #[tokio::test]
    async fn test_load_tasks_drops_invalid_identifiers() {
        let (_temp, path) = write_tasks(
            r#"[
                {"cnpj": "1234", "company": "CURTO"},
                {"cnpj": "not a cnpj", "company": "SEM DIGITOS"},
                {"cnpj": "07608821000154", "company": "ACME LTDA"}
            ]"#,
        )
        .await;

        let tasks = load_tasks(&path).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].company, "ACME LTDA");
    }

    #[tokio::test]
    async fn test_load_tasks_rejects_invalid_json() {
        let (_temp, path) = write_tasks("{ not json").await;
        assert!(load_tasks(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_tasks_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");
        assert!(load_tasks(&path).await.is_err());
    }
}
