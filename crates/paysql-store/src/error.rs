//! Error types for paysql-store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Parameter count mismatch: statement expects {expected}, got {actual}")]
    ParameterMismatch { expected: usize, actual: usize },

    #[error("Unsupported parameter at position {index}: {reason}")]
    UnsupportedParameter { index: usize, reason: String },

    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    #[error("Connection pool closed")]
    PoolClosed,

    #[error("Query task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
