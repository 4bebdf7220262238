//! Data models for the transactions history

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Status, TransactionStatus};

/// Stock quantity as sent by the backend, either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Quantity {
    /// Numeric value, if the quantity is a number or a numeric string
    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => n.as_f64(),
            Quantity::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::Number(n.into())
    }
}

/// A single buy/sell record from the transactions history
///
/// Only `stock_id` and `status` are required; the store keys on them.
/// Everything else tolerates being absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stock identifier
    pub stock_id: String,
    /// Display name of the stock
    #[serde(default)]
    pub stock_name: String,
    /// Number of stocks traded
    #[serde(default)]
    pub stocks_quantity: Option<Quantity>,
    /// When the transaction happened, as sent by the backend
    #[serde(default)]
    pub timestamp: String,
    /// Price per stock
    #[serde(default)]
    pub transaction_price: Option<f64>,
    /// Transaction type (e.g., "buy", "sell")
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Transaction status tag (see `TransactionStatus`)
    pub status: String,
}

impl Transaction {
    /// Exact, case-sensitive match on the status tag
    pub fn has_status(&self, status: TransactionStatus) -> bool {
        self.status == status.as_str()
    }

    /// Check if the transaction has settled
    pub fn is_passed(&self) -> bool {
        self.has_status(TransactionStatus::Passed)
    }

    /// Numeric stock quantity
    pub fn quantity_value(&self) -> Option<f64> {
        self.stocks_quantity.as_ref().and_then(Quantity::value)
    }

    /// Total value of the transaction (quantity * price)
    pub fn total_value(&self) -> Option<f64> {
        Some(self.quantity_value()? * self.transaction_price?)
    }

    /// Parse the timestamp as RFC 3339, falling back to a naive
    /// "YYYY-MM-DD HH:MM:SS" / "YYYY-MM-DDTHH:MM:SS" form taken as UTC
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Get a summary string; missing quantity or price show as "?"
    pub fn summary(&self) -> String {
        let quantity = self
            .stocks_quantity
            .as_ref()
            .map_or_else(|| "?".to_string(), Quantity::to_string);
        let price = self
            .transaction_price
            .map_or_else(|| "?".to_string(), |p| p.to_string());
        format!(
            "{} {} {} x {} @ {} [{}]",
            self.timestamp, self.kind, self.stock_name, quantity, price, self.status
        )
    }
}

/// Sort oldest first by parsed timestamp; unparseable timestamps go last
///
/// The sort is stable, so equal or unparseable timestamps keep their order.
pub fn sort_by_timestamp(transactions: &mut [Transaction]) {
    transactions.sort_by_cached_key(|t| match t.timestamp_utc() {
        Some(dt) => (false, Some(dt)),
        None => (true, None),
    });
}

/// State owned by the transactions history store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsHistoryState {
    /// Every transaction from the last successful fetch
    pub transactions: Vec<Transaction>,
    /// Settled transactions, filtered on fetch and appendable afterwards
    pub passed_transactions: Vec<Transaction>,
    /// Lifecycle of the most recent fetch
    pub status: Status,
    /// Message of the last failed fetch; cleared when a later fetch succeeds
    pub error: Option<String>,
}

impl TransactionsHistoryState {
    /// Replace the transactions and recompute the passed sublist
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.passed_transactions = transactions
            .iter()
            .filter(|t| t.is_passed())
            .cloned()
            .collect();
        self.transactions = transactions;
    }

    /// Check if a passed transaction for the stock is already recorded
    pub fn has_passed(&self, stock_id: &str) -> bool {
        self.passed_transactions.iter().any(|t| t.stock_id == stock_id)
    }
}
