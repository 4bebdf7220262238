//! Error types for tradelog-config

use thiserror::Error;

/// How a caller can react to a configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorSeverity {
    /// The file is absent; defaults plus environment may still be enough
    Recoverable,
    /// The configuration that was found cannot be used
    Fatal,
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("IO error occurred")]
    IoError,
}

impl ConfigError {
    pub fn severity(&self) -> ConfigErrorSeverity {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorSeverity::Recoverable,
            _ => ConfigErrorSeverity::Fatal,
        }
    }

    /// Hints for fixing the configuration
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::FileNotFound { .. } => vec![
                "Use --config to point at an existing config file.".to_string(),
                format!("Or set {} to run without a config file.", crate::BASE_URL_ENV),
                "Run `tradelog init-config` to print a starting file.".to_string(),
            ],
            ConfigError::MissingField { field } if field == "api.base_url" => vec![
                "Add 'api.base_url' to your config file.".to_string(),
                format!("Or export {}.", crate::BASE_URL_ENV),
            ],
            ConfigError::MissingField { field } => {
                vec![format!("Add the '{}' field to your config file.", field)]
            }
            ConfigError::InvalidValue { field, .. } => {
                vec![format!("Fix '{}' in your config file.", field)]
            }
            ConfigError::InvalidYaml { .. } => {
                vec!["Compare your file with `tradelog init-config` output.".to_string()]
            }
            ConfigError::IoError => vec![],
        }
    }

    /// Message followed by the suggestions, one per line
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        for suggestion in self.suggestions() {
            report.push_str("\n  - ");
            report.push_str(&suggestion);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_file_is_recoverable() {
        let error = ConfigError::FileNotFound { path: "tradelog.yaml".to_string() };
        assert_eq!(error.severity(), ConfigErrorSeverity::Recoverable);
        assert_eq!(ConfigError::IoError.severity(), ConfigErrorSeverity::Fatal);
        let error = ConfigError::MissingField { field: "api.base_url".to_string() };
        assert_eq!(error.severity(), ConfigErrorSeverity::Fatal);
    }

    #[test]
    fn test_invalid_value_report_names_field() {
        let error = ConfigError::InvalidValue {
            field: "api.timeout_secs".to_string(),
            reason: "Timeout must be greater than 0".to_string(),
        };
        assert_eq!(
            error.report(),
            "Invalid field value: api.timeout_secs - Timeout must be greater than 0\n  - Fix 'api.timeout_secs' in your config file."
        );
    }

    #[test]
    fn test_missing_base_url_report_mentions_env() {
        let report = ConfigError::MissingField { field: "api.base_url".to_string() }.report();
        assert!(report.starts_with("Missing required field: api.base_url"));
        assert!(report.contains(crate::BASE_URL_ENV));
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_io_error_report_is_message_only() {
        assert_eq!(ConfigError::IoError.report(), "IO error occurred");
    }
}
