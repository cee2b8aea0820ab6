//! Values crossing the store boundary.

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{Result, StoreError};

/// A positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl BindValue {
    /// Convert one JSON parameter. `index` is only used in the error.
    ///
    /// Booleans become 0/1 like SQLite stores them. Arrays and objects have
    /// no scalar form and are rejected.
    pub fn from_json(index: usize, value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(BindValue::Null),
            JsonValue::Bool(b) => Ok(BindValue::Integer(i64::from(*b))),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(BindValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(BindValue::Real(f))
                } else {
                    Err(StoreError::UnsupportedParameter {
                        index,
                        reason: format!("number {} is out of range", n),
                    })
                }
            },
            JsonValue::String(s) => Ok(BindValue::Text(s.clone())),
            JsonValue::Array(_) => Err(StoreError::UnsupportedParameter {
                index,
                reason: "arrays cannot be bound".to_string(),
            }),
            JsonValue::Object(_) => Err(StoreError::UnsupportedParameter {
                index,
                reason: "objects cannot be bound".to_string(),
            }),
        }
    }

    pub fn from_json_params(values: &[JsonValue]) -> Result<Vec<Self>> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| Self::from_json(index, value))
            .collect()
    }

    pub(crate) fn to_sql_value(&self) -> SqlValue {
        match self {
            BindValue::Null => SqlValue::Null,
            BindValue::Integer(i) => SqlValue::Integer(*i),
            BindValue::Real(f) => SqlValue::Real(*f),
            BindValue::Text(s) => SqlValue::Text(s.clone()),
        }
    }
}

/// Rows and counters from one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
    /// Full-scan steps the engine reported, or the number of returned rows
    /// when that is larger. Aggregates SQLite answers from b-tree metadata
    /// (a bare `COUNT(*)`) scan nothing, so they report only their result row.
    pub rows_read: u64,
    pub rows_written: u64,
}

/// Raw column value as JSON. Blobs become arrays of byte values.
pub(crate) fn json_from_sql(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(text) => JsonValue::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
    }
}
