//! Transactions history store
//!
//! Owns the fetched transactions, the settled ("passed") sublist and the
//! lifecycle of the most recent fetch. All mutation goes through the
//! store's methods; readers get clones.
//!
//! Fetches are sequenced: every fetch is issued a `RequestId` and only the
//! outcome of the most recently issued request is applied. A slower,
//! superseded response is handed back to its caller but never overwrites
//! newer state.

use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::ApiRef;
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{Transaction, TransactionsHistoryState};
use crate::types::Status;

/// Sequence number of a fetch request
pub type RequestId = u64;

#[derive(Debug, Default)]
struct Inner {
    state: TransactionsHistoryState,
    latest_request: RequestId,
}

/// Store for the transactions history
pub struct TransactionsHistoryStore {
    api: ApiRef,
    inner: RwLock<Inner>,
    logger: Box<dyn ErrorLogger>,
}

impl TransactionsHistoryStore {
    /// Create a store in the initial `LOADING` state with empty lists
    pub fn new(api: ApiRef) -> Self {
        Self::with_logger(api, Box::new(DefaultErrorLogger))
    }

    /// Create a store that reports failures to `logger`
    pub fn with_logger(api: ApiRef, logger: Box<dyn ErrorLogger>) -> Self {
        Self {
            api,
            inner: RwLock::new(Inner::default()),
            logger,
        }
    }

    // ==================== Operations ====================

    /// Fetch the full history and apply it if no newer fetch was issued
    ///
    /// On failure the error is logged, recorded in the state (status
    /// `FAILED`, message in `error`) and returned. Existing lists are kept.
    pub async fn fetch_all(&self) -> CoreResult<Vec<Transaction>> {
        let request_id = self.fetch_pending();
        log::debug!("Fetching transactions history (request {})", request_id);

        match self.api.fetch_transactions().await {
            Ok(transactions) => {
                if self.fetch_fulfilled(request_id, transactions.clone()) {
                    log::info!(
                        "Loaded {} transactions (request {})",
                        transactions.len(),
                        request_id
                    );
                }
                Ok(transactions)
            }
            Err(error) => {
                self.fetch_rejected(request_id, &error);
                Err(error)
            }
        }
    }

    /// POST an arbitrary payload to the transactions history
    ///
    /// The store state is left untouched; acting on the response is up to
    /// the caller.
    pub async fn submit_one<P>(&self, payload: &P) -> CoreResult<serde_json::Value>
    where
        P: Serialize + ?Sized,
    {
        let context = ErrorContext::new("submit_one");
        let payload = serde_json::to_value(payload).map_err(|e| {
            let error = CoreError::Serialize { message: e.to_string() };
            self.logger.log_error(&error, &context);
            error
        })?;

        self.api.post_transaction(payload).await.map_err(|error| {
            self.logger.log_error(&error, &context);
            error
        })
    }

    /// Append a settled transaction unless one for the same stock is present
    ///
    /// Returns `true` if the transaction was appended. Non-`PASSED`
    /// transactions are ignored. `transactions` is never touched.
    pub fn append_if_passed(&self, transaction: Transaction) -> bool {
        if !transaction.is_passed() {
            return false;
        }

        let mut inner = self.write_inner();
        if inner.state.has_passed(&transaction.stock_id) {
            return false;
        }
        inner.state.passed_transactions.push(transaction);
        true
    }

    // ==================== Fetch lifecycle ====================

    /// Start a fetch: issue a new request id and enter `LOADING`
    pub fn fetch_pending(&self) -> RequestId {
        let mut inner = self.write_inner();
        inner.latest_request += 1;
        inner.state.status = Status::Loading;
        inner.latest_request
    }

    /// Apply a successful response; returns `false` if the request was superseded
    pub fn fetch_fulfilled(&self, request_id: RequestId, transactions: Vec<Transaction>) -> bool {
        let mut inner = self.write_inner();
        if request_id != inner.latest_request {
            drop(inner);
            self.log_superseded(request_id, "fetch_fulfilled");
            return false;
        }

        inner.state.status = Status::Success;
        inner.state.error = None;
        inner.state.replace_transactions(transactions);
        true
    }

    /// Record a failed response; returns `false` if the request was superseded
    ///
    /// The error is logged either way.
    pub fn fetch_rejected(&self, request_id: RequestId, error: &CoreError) -> bool {
        let context = ErrorContext::new("fetch_all").with_request_id(request_id);
        self.logger.log_error(error, &context);

        let mut inner = self.write_inner();
        if request_id != inner.latest_request {
            drop(inner);
            self.log_superseded(request_id, "fetch_rejected");
            return false;
        }

        inner.state.status = Status::Failed;
        inner.state.error = Some(error.to_string());
        true
    }

    // ==================== Accessors ====================

    /// Clone of the whole state
    pub fn snapshot(&self) -> TransactionsHistoryState {
        self.read_inner().state.clone()
    }

    pub fn status(&self) -> Status {
        self.read_inner().state.status
    }

    pub fn error(&self) -> Option<String> {
        self.read_inner().state.error.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.read_inner().state.transactions.clone()
    }

    pub fn passed_transactions(&self) -> Vec<Transaction> {
        self.read_inner().state.passed_transactions.clone()
    }

    // ==================== Internals ====================

    fn log_superseded(&self, request_id: RequestId, operation: &str) {
        let context = ErrorContext::new(operation).with_request_id(request_id);
        self.logger.log_debug("response superseded by a newer fetch, discarded", &context);
    }

    // Poisoning is ignored; no mutation above spans more than one step
    // that could panic.
    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ==================== Tests ====================
