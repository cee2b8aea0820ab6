use paysql_commons::Credits;
use paysql_store::QueryResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /query/shared`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedQueryRequest {
    #[serde(default)]
    pub sql: Option<String>,
    /// Positional parameters for `?` placeholders
    #[serde(default)]
    pub params: Option<Vec<JsonValue>>,
}

impl SharedQueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: Some(sql.into()),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Vec<JsonValue>) -> Self {
        self.params = Some(params);
        self
    }
}

/// Billing and engine counters returned with every successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub rows_read: u64,
    pub rows_written: u64,
    pub charge_applied: Credits,
    pub remaining_balance: Credits,
}

/// Uniform tabular result. Serialized under a top-level `result` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
    pub meta: ResponseMeta,
}

impl ResponseEnvelope {
    pub fn new(result: QueryResult, charge_applied: Credits, remaining_balance: Credits) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
            meta: ResponseMeta {
                rows_read: result.rows_read,
                rows_written: result.rows_written,
                charge_applied,
                remaining_balance,
            },
        }
    }
}
