use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::downloader::DownloadConfig;
use crate::orchestrator::RetrievalConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub resolver: ResolverConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Certificate issuance API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Endpoint URL for the PGFN certificate query
    #[serde(default = "default_api_url")]
    pub url: String,
    /// API token sent with every request
    pub token: String,
    /// Request timeout in seconds, also sent as a form field (default: 300)
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.infosimples.com/api/v2/consultas/receita-federal/pgfn".to_string()
}

fn default_api_timeout() -> u64 {
    300
}

/// Control spreadsheet resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Base directory holding the `<YYYY>/<YYYY>-<MM>` period tree
    pub base_dir: PathBuf,
    /// Substring a control file name must contain
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Extension a control file must have, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_marker() -> String {
    "PLANILHA DE CONTROLE".to_string()
}

fn default_extension() -> String {
    "xlsx".to_string()
}

/// Destination tree configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Root directory for per-company receipt subfolders
    pub root: PathBuf,
}

/// Identifier list input configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// JSON file with the extracted `{cnpj, company}` pairs
    #[serde(default = "default_tasks_path")]
    pub tasks_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tasks_path: default_tasks_path(),
        }
    }
}

fn default_tasks_path() -> PathBuf {
    PathBuf::from("tasks.json")
}

/// Consolidated report output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Where the run report is written as JSON
    #[serde(default = "default_report_path")]
    pub output_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_report_path(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("report.json")
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub resolver: ResolverConfig,
    pub destination: DestinationConfig,
    pub retrieval: RetrievalConfig,
    pub download: DownloadConfig,
    pub input: InputConfig,
    pub report: ReportConfig,
}

/// Sanitized API config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub url: String,
    pub token_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                url: config.api.url.clone(),
                token_configured: !config.api.token.is_empty(),
                timeout_secs: config.api.timeout_secs,
            },
            resolver: config.resolver.clone(),
            destination: config.destination.clone(),
            retrieval: config.retrieval.clone(),
            download: config.download.clone(),
            input: config.input.clone(),
            report: config.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
[api]
token = "test-token"

[resolver]
base_dir = "/controls/CND"

[destination]
root = "/controls/CND/2025"
"#
    }

    #[test]
    fn test_deserialize_minimal_config_applies_defaults() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(
            config.api.url,
            "https://api.infosimples.com/api/v2/consultas/receita-federal/pgfn"
        );
        assert_eq!(config.api.timeout_secs, 300);
        assert_eq!(config.resolver.marker, "PLANILHA DE CONTROLE");
        assert_eq!(config.resolver.extension, "xlsx");
        assert_eq!(config.retrieval.max_attempts, 3);
        assert_eq!(config.download.max_attempts, 3);
        assert_eq!(config.input.tasks_path.to_str().unwrap(), "tasks.json");
        assert_eq!(config.report.output_path.to_str().unwrap(), "report.json");
    }

    #[test]
    fn test_deserialize_missing_token_fails() {
        let toml = r#"
[api]

[resolver]
base_dir = "/controls/CND"

[destination]
root = "/controls/CND/2025"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[api]
url = "http://localhost:9000/pgfn"
token = "abc"
timeout_secs = 60

[resolver]
base_dir = "/data/cnd"
marker = "CONTROLE SEMANAL"
extension = "xlsm"

[destination]
root = "/data/cnd/out"

[retrieval]
max_attempts = 5
attempt_pause_ms = 100

[download]
max_attempts = 2
retry_pause_ms = 50
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.url, "http://localhost:9000/pgfn");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.resolver.marker, "CONTROLE SEMANAL");
        assert_eq!(config.resolver.extension, "xlsm");
        assert_eq!(config.retrieval.max_attempts, 5);
        assert_eq!(config.retrieval.attempt_pause_ms, 100);
        assert_eq!(config.download.max_attempts, 2);
        assert_eq!(config.download.retry_pause_ms, 50);
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.api.token_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("test-token"));
        assert!(json.contains("token_configured"));
    }
}
