//! Configuration management for tradelog
//!
//! This module handles loading, validation, and management of
//! tradelog configuration from YAML files and the environment.

pub mod error;
pub mod paths;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigErrorSeverity};

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "TRADELOG_API_BASE_URL";

/// Environment variable that overrides `logging.level`
pub const LOG_LEVEL_ENV: &str = "TRADELOG_LOG_LEVEL";

// ==================== Configuration Types ====================

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the trading backend (e.g., "https://api.example.com")
    #[serde(default)]
    pub base_url: String,
    /// Path of the transactions history resource
    #[serde(default = "default_transactions_history_path")]
    pub transactions_history_path: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            transactions_history_path: default_transactions_history_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_transactions_history_path() -> String {
    paths::TRANSACTIONS_HISTORY.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    /// Full URL of the transactions history endpoint
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.transactions_history_path
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Build a configuration from defaults and environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML content without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base_url.trim().to_string();
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_lowercase();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url".to_string(),
            });
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if !self.api.transactions_history_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "api.transactions_history_path".to_string(),
                reason: "Path must start with '/'".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.transactions_history_path, "/transactions-history");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let api = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.endpoint_url(), "http://localhost:8000/transactions-history");
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml("api:\n  base_url: https://trade.example.com\n").unwrap();
        assert_eq!(config.api.base_url, "https://trade.example.com");
        assert_eq!(config.api.transactions_history_path, paths::TRANSACTIONS_HISTORY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = Config::from_yaml("api: [unclosed");
        assert!(matches!(result, Err(ConfigError::InvalidYaml { .. })));
    }

    #[test]
    fn test_default_template_parses() {
        let mut config = Config::from_yaml(Config::generate_default()).unwrap();
        config.apply_env_from(no_env);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_from(|key| match key {
            BASE_URL_ENV => Some(" http://10.0.0.2:9000 ".to_string()),
            LOG_LEVEL_ENV => Some("DEBUG".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_env_value_ignored() {
        let mut config = Config::from_yaml("api:\n  base_url: http://a.example\n").unwrap();
        config.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://a.example");
    }

    #[test]
    fn test_validate_missing_base_url() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_validate_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        config.api.base_url = "http://example.com".to_string();
        config.api.transactions_history_path = "transactions".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        config.api.transactions_history_path = "/transactions".to_string();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        config.api.timeout_secs = 5;
        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(PathBuf::from("/nonexistent/tradelog.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
