//! Query executor façade used by the request pipeline.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::models::{BindValue, QueryResult};
use crate::SharedStore;

/// Runs validated statements against the shared store.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn SharedStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        Self { store }
    }

    /// Execute one statement that already passed validation.
    pub async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult> {
        let started = Instant::now();
        let result = self.store.exec(sql, params).await;
        let took_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(rows) => log::debug!(
                "Query returned {} rows (read={}, written={}) in {:.3}ms",
                rows.rows.len(),
                rows.rows_read,
                rows.rows_written,
                took_ms
            ),
            Err(e) => log::warn!("Query failed after {:.3}ms: {}", took_ms, e),
        }
        result
    }
}
