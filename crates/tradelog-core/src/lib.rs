//! Transactions history store and HTTP client
//!
//! `TransactionsHistoryStore` keeps the transactions fetched from the
//! trading backend, the subset that has settled, and the status of the
//! last fetch. Network access goes through the `TransactionsApi` trait;
//! `HttpTransactionsApi` is the reqwest implementation.

pub mod api;
pub mod error;
pub mod models;
pub mod store;
pub mod types;

pub use api::{ApiRef, HttpTransactionsApi, TransactionsApi};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{sort_by_timestamp, Quantity, Transaction, TransactionsHistoryState};
pub use store::{RequestId, TransactionsHistoryStore};
pub use tradelog_config::paths;
pub use types::{Status, TransactionStatus};
