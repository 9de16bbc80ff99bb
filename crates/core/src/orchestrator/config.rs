//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the retrieval orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum API attempts per identifier.
    /// Strategy alternates by attempt parity across this budget.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds).
    /// Keeps the run from hammering the remote service.
    #[serde(default = "default_attempt_pause")]
    pub attempt_pause_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_pause() -> u64 {
    2000 // 2 seconds
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_pause_ms: default_attempt_pause(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetrievalConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.attempt_pause_ms, 2000);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            max_attempts = 4
        "#;
        let config: RetrievalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.attempt_pause_ms, 2000);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            max_attempts = 5
            attempt_pause_ms = 500
        "#;
        let config: RetrievalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.attempt_pause_ms, 500);
    }
}
