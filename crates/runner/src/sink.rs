//! Report output.
//!
//! Stands in for the out-of-scope spreadsheet exporter and database
//! writer: the consolidated report is handed off as pretty-printed JSON.

use anyhow::{Context, Result};
use std::path::Path;

use cnd_core::RunReport;

/// Write the consolidated report to `path`, creating parent directories as
/// needed.
pub async fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_report_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports").join("run.json");

        write_report(&RunReport::default(), &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"rows\""));
    }
}
