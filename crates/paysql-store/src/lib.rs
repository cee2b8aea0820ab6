//! paysql-store - shared dataset access
//!
//! The [`SharedStore`] trait is the storage collaborator. [`SqliteStore`] is
//! the production implementation: a bounded pool of read-only SQLite
//! connections driven on tokio's blocking pool. [`QueryExecutor`] is the thin
//! façade the request pipeline calls.

pub mod error;
pub mod executor;
pub mod models;
pub mod seed;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use executor::QueryExecutor;
pub use models::{BindValue, QueryResult};
pub use seed::seed_sample_dataset;
pub use sqlite::{SqliteStore, SqliteStoreOptions};

use async_trait::async_trait;

/// Storage collaborator.
///
/// Callers only pass text that already passed the read-only validator; the
/// store still refuses writes on its own.
#[async_trait]
pub trait SharedStore: Send + Sync {
    async fn exec(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult>;
}
