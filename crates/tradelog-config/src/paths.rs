//! Resource paths on the trading backend

/// Transactions history collection (GET lists, POST records)
pub const TRANSACTIONS_HISTORY: &str = "/transactions-history";
