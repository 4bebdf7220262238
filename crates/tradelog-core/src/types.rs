//! Status enumerations shared by the store and the models

use serde::{Deserialize, Serialize};

/// Lifecycle of the most recent transactions fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Request in flight (also the initial state)
    Loading,
    /// Last request completed and was applied
    Success,
    /// Last request failed
    Failed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Loading
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Loading => write!(f, "LOADING"),
            Status::Success => write!(f, "SUCCESS"),
            Status::Failed => write!(f, "FAILED"),
        }
    }
}

/// Known transaction status tags
///
/// The backend vocabulary is not closed, so `Transaction::status` stays a
/// plain string and is compared against these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Order placed, not yet matched
    Open,
    /// Matched, awaiting settlement
    Pending,
    /// Settled
    Passed,
    /// Rejected by the exchange
    Failed,
    /// Withdrawn by the user
    Cancelled,
}

impl TransactionStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Open => "OPEN",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Passed => "PASSED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(TransactionStatus::Open),
            "PENDING" => Ok(TransactionStatus::Pending),
            "PASSED" => Ok(TransactionStatus::Passed),
            "FAILED" => Ok(TransactionStatus::Failed),
            "CANCELLED" => Ok(TransactionStatus::Cancelled),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
