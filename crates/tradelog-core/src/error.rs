//! Error types for tradelog-core
//!
//! Errors raised by the HTTP layer and the store, with error codes,
//! severities and suggestions for diagnostics.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Non-2xx HTTP response
    HttpError,
    /// Response body is not the expected JSON
    ParseError,
    /// Request could not complete
    NetworkError,
    /// Request payload could not be encoded
    SerializeError,
    /// Client configuration is unusable
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::HttpError => write!(f, "HTTP_ERROR"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::NetworkError => write!(f, "NETWORK_ERROR"),
            ErrorCode::SerializeError => write!(f, "SERIALIZE_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation may be retried by the caller
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - the client cannot work as configured
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for tradelog-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: Option<String> },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Serialize error: {message}")]
    Serialize { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Http { .. } => ErrorCode::HttpError,
            CoreError::Parse { .. } => ErrorCode::ParseError,
            CoreError::Network { .. } => ErrorCode::NetworkError,
            CoreError::Serialize { .. } => ErrorCode::SerializeError,
            CoreError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Http { status, .. } if *status < 500 => ErrorSeverity::Error,
            CoreError::Http { .. } => ErrorSeverity::Warning,
            CoreError::Network { .. } => ErrorSeverity::Warning,
            CoreError::Parse { .. } => ErrorSeverity::Error,
            CoreError::Serialize { .. } => ErrorSeverity::Error,
            CoreError::Config { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Http { status, body } => {
                details = details.with_detail(serde_json::json!({
                    "status": status,
                    "body": body,
                }));
                if *status >= 500 {
                    details = details.with_suggestion(
                        "The backend failed to handle the request; try again later.".to_string()
                    );
                } else {
                    details = details.with_suggestion(
                        "Check api.base_url and api.transactions_history_path.".to_string()
                    );
                }
            }
            CoreError::Parse { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "The backend returned a body that is not the expected JSON.".to_string()
                );
            }
            CoreError::Network { .. } => {
                details = details.with_suggestion(
                    "Check that the backend is reachable from this host.".to_string()
                );
            }
            CoreError::Config { message } => {
                details = details.with_suggestion(message.clone());
            }
            CoreError::Serialize { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CoreError::Parse { message: error.to_string() }
        } else if error.is_builder() {
            CoreError::Config { message: error.to_string() }
        } else {
            CoreError::Network { message: error.to_string() }
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Fetch request sequence number, if any
    pub request_id: Option<u64>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            request_id: None,
        }
    }

    /// Add request ID
    pub fn with_request_id(mut self, request_id: u64) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let level = match error.severity() {
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: "tradelog::error",
            level,
            "{} [{}] {} - Operation: {} - Request: {:?}",
            error.severity(),
            error.code(),
            error.to_details(),
            context.operation,
            context.request_id
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "tradelog::error",
            "DEBUG: {} - Operation: {} - Request: {:?}",
            message,
            context.operation,
            context.request_id
        );
    }
}

// ==================== Tests ====================
