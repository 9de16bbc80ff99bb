//! Downloader configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the receipt downloader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum attempts per receipt link.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds).
    #[serde(default = "default_retry_pause")]
    pub retry_pause_ms: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Content type the resource must declare, compared exactly.
    #[serde(default = "default_content_type")]
    pub expected_content_type: String,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_pause() -> u64 {
    2000 // 2 seconds
}

fn default_timeout() -> u64 {
    300
}

fn default_content_type() -> String {
    "application/pdf".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_pause_ms: default_retry_pause(),
            timeout_secs: default_timeout(),
            expected_content_type: default_content_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DownloadConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_pause_ms, 2000);
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.expected_content_type, "application/pdf");
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            max_attempts = 5
        "#;
        let config: DownloadConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_pause_ms, 2000);
        assert_eq!(config.expected_content_type, "application/pdf");
    }
}
