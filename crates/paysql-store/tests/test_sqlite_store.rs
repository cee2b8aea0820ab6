//! SqliteStore against a seeded on-disk dataset.

use std::sync::Arc;
use std::time::{Duration, Instant};

use paysql_store::{
    seed_sample_dataset, BindValue, QueryExecutor, SharedStore, SqliteStore, SqliteStoreOptions,
    StoreError,
};
use serde_json::json;
use tempfile::TempDir;

const RUNAWAY_SQL: &str =
    "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT COUNT(*) FROM c";

fn seeded_store(timeout: Duration) -> (TempDir, SqliteStore) {
    seeded_store_with_pool(timeout, 2)
}

fn seeded_store_with_pool(timeout: Duration, pool_size: usize) -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    seed_sample_dataset(&path).unwrap();
    let store = SqliteStore::open(
        &path,
        SqliteStoreOptions {
            pool_size,
            query_timeout: timeout,
        },
    )
    .unwrap();
    (dir, store)
}

#[tokio::test]
async fn test_count_query() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let result = store.exec("SELECT COUNT(*) AS total FROM sample_data", &[]).await.unwrap();

    assert_eq!(result.columns, vec!["total".to_string()]);
    assert_eq!(result.rows, vec![vec![json!(5)]]);
    // Answered from the b-tree row count, not a scan.
    assert_eq!(result.rows_read, 1);
    assert_eq!(result.rows_written, 0);
}

#[tokio::test]
async fn test_columns_keep_declared_order_and_types() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let result = store
        .exec("SELECT price, name, id, NULL AS nothing FROM sample_data WHERE id = ?", &[
            BindValue::Integer(5),
        ])
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["price", "name", "id", "nothing"]);
    assert_eq!(result.rows, vec![vec![json!(15.0), json!("T-Shirt"), json!(5), json!(null)]]);
}

#[tokio::test]
async fn test_full_scan_counts_rows_read() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let result = store
        .exec("SELECT name FROM sample_data WHERE category = ?", &[BindValue::Text(
            "books".to_string(),
        )])
        .await
        .unwrap();

    assert_eq!(result.rows.len(), 2);
    assert!(result.rows_read >= 2);
}

#[tokio::test]
async fn test_parameter_mismatch() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let err = store.exec("SELECT * FROM sample_data WHERE id = ?", &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::ParameterMismatch { expected: 1, actual: 0 }));
}

#[tokio::test]
async fn test_writes_are_refused_by_engine() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let err = store.exec("DELETE FROM sample_data", &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Sqlite(_)));

    let count = store.exec("SELECT COUNT(*) FROM sample_data", &[]).await.unwrap();
    assert_eq!(count.rows, vec![vec![json!(5)]]);
}

#[tokio::test]
async fn test_unknown_table_is_an_error() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let err = store.exec("SELECT * FROM missing_table", &[]).await.unwrap_err();
    assert!(err.to_string().contains("missing_table"));
}

#[tokio::test]
async fn test_runaway_query_times_out_and_connection_is_reusable() {
    let (_dir, store) = seeded_store(Duration::from_millis(50));
    let err = store.exec(RUNAWAY_SQL, &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout(50)));

    let result = store.exec("SELECT COUNT(*) FROM sample_data", &[]).await.unwrap();
    assert_eq!(result.rows, vec![vec![json!(5)]]);
}

#[tokio::test]
async fn test_abandoned_runaway_query_still_stops_at_deadline() {
    let (_dir, store) = seeded_store_with_pool(Duration::from_millis(300), 1);

    // Caller gives up long before the store deadline.
    let abandoned = tokio::time::timeout(Duration::from_millis(10), store.exec(RUNAWAY_SQL, &[])).await;
    assert!(abandoned.is_err());

    // The only connection slot stays taken until the runaway statement is
    // stopped by its own deadline, then frees up for the next caller.
    let started = Instant::now();
    let next = tokio::time::timeout(
        Duration::from_secs(10),
        store.exec("SELECT COUNT(*) FROM sample_data", &[]),
    )
    .await
    .expect("runaway statement was never interrupted")
    .unwrap();

    assert_eq!(next.rows, vec![vec![json!(5)]]);
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_open_missing_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = SqliteStore::open(dir.path().join("absent.db"), SqliteStoreOptions::default());
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_executor_runs_concurrent_queries_through_small_pool() {
    let (_dir, store) = seeded_store(Duration::from_secs(5));
    let executor = QueryExecutor::new(Arc::new(store));

    let mut handles = Vec::new();
    for id in 1..=5 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move {
            executor
                .execute("SELECT name FROM sample_data WHERE id = ?", &[BindValue::Integer(id)])
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().rows.len(), 1);
    }
}
