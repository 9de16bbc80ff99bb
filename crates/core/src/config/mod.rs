mod types;

pub use types::*;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file, with `CND_*` environment overrides
/// (e.g. `CND_API__TOKEN` overrides `api.token`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("CND_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML string (tests, embedded defaults).
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    Figment::new()
        .merge(Toml::string(content))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Check cross-field constraints that serde defaults cannot express.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.token.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.token must not be empty".to_string(),
        ));
    }
    if config.resolver.base_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "resolver.base_dir must not be empty".to_string(),
        ));
    }
    if config.destination.root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "destination.root must not be empty".to_string(),
        ));
    }
    if config.retrieval.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retrieval.max_attempts must be at least 1".to_string(),
        ));
    }
    if config.download.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "download.max_attempts must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[api]
token = "secret"

[resolver]
base_dir = "/controls/CND"

[destination]
root = "/controls/CND/2025"
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID).unwrap();
        assert_eq!(config.api.token, "secret");
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let mut config = load_config_from_str(VALID).unwrap();
        config.api.token.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("api.token"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = load_config_from_str(VALID).unwrap();
        config.retrieval.max_attempts = 0;
        assert!(validate_config(&config).is_err());

        let mut config = load_config_from_str(VALID).unwrap();
        config.download.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }
}
