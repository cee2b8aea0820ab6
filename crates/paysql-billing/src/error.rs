//! Error types for paysql-billing

use thiserror::Error;

/// Ledger faults. An insufficient balance is not an error; it is a
/// [`LedgerReceipt`](crate::LedgerReceipt) with `charged = false`.
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Ledger storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Balance overflow for user {0}")]
    Overflow(String),

    #[error("Balance out of range for user {0}")]
    OutOfRange(String),

    #[error("Ledger task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for BillingError {
    fn from(err: tokio::task::JoinError) -> Self {
        BillingError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
