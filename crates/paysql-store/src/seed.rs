//! Sample dataset for local development and tests.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};

use crate::error::Result;

const SAMPLE_ROWS: [(i64, &str, &str, f64); 5] = [
    (1, "Laptop", "electronics", 999.99),
    (2, "Headphones", "electronics", 79.5),
    (3, "The Rust Programming Language", "books", 39.99),
    (4, "SQL Cookbook", "books", 24.95),
    (5, "T-Shirt", "clothing", 15.0),
];

/// Create `sample_data` in the database at `path` and fill it when empty.
///
/// Opens its own read-write connection; the query path never writes.
/// Returns the number of rows inserted (0 if the table already had data).
pub fn seed_sample_dataset(path: impl AsRef<Path>) -> Result<usize> {
    let mut conn = Connection::open_with_flags(
        path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sample_data (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL
        )",
    )?;

    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM sample_data", [], |row| row.get(0))?;
    if existing > 0 {
        log::debug!("sample_data already has {} rows, skipping seed", existing);
        return Ok(0);
    }

    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO sample_data (id, name, category, price) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (id, name, category, price) in SAMPLE_ROWS {
            insert.execute(params![id, name, category, price])?;
        }
    }
    tx.commit()?;

    log::info!("Seeded sample_data with {} rows at {}", SAMPLE_ROWS.len(), path.as_ref().display());
    Ok(SAMPLE_ROWS.len())
}
