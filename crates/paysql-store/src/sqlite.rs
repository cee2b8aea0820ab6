//! Pooled read-only SQLite store.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params_from_iter, Connection, OpenFlags, StatementStatus};
use tokio::sync::Semaphore;

use crate::error::{Result, StoreError};
use crate::models::{json_from_sql, BindValue, QueryResult};
use crate::SharedStore;

const BUSY_TIMEOUT_MS: u64 = 100;

/// VM instructions between deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1000;

#[derive(Debug, Clone)]
pub struct SqliteStoreOptions {
    /// Maximum concurrently checked-out connections
    pub pool_size: usize,
    /// Per-statement wall-clock limit
    pub query_timeout: Duration,
}

impl Default for SqliteStoreOptions {
    fn default() -> Self {
        Self {
            pool_size: 4,
            query_timeout: Duration::from_secs(5),
        }
    }
}

/// Shared dataset opened read-only.
///
/// Every connection is opened with `SQLITE_OPEN_READ_ONLY` and has
/// `PRAGMA query_only` set, so the engine refuses writes even if a mutating
/// statement got past validation.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    options: SqliteStoreOptions,
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
}

impl SqliteStore {
    /// Open the dataset. Fails immediately if the file is missing or not a
    /// database.
    pub fn open(path: impl AsRef<Path>, options: SqliteStoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let first = open_read_only(&path)?;
        let pool_size = options.pool_size.max(1);

        log::info!(
            "Opened shared dataset {} (pool={}, timeout={}ms)",
            path.display(),
            pool_size,
            options.query_timeout.as_millis()
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                path,
                options: SqliteStoreOptions {
                    pool_size,
                    ..options
                },
                idle: Mutex::new(vec![first]),
                permits: Arc::new(Semaphore::new(pool_size)),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    fn checkout(&self) -> Result<Connection> {
        if let Some(conn) = self.inner.idle.lock().pop() {
            return Ok(conn);
        }
        open_read_only(&self.inner.path)
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.inner.idle.lock();
        if idle.len() < self.inner.options.pool_size {
            idle.push(conn);
        }
    }
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    conn.pragma_update(None, "query_only", 1)?;
    Ok(conn)
}

fn total_changes(conn: &Connection) -> Result<u64> {
    let changes: i64 = conn.query_row("SELECT total_changes()", [], |row| row.get(0))?;
    Ok(u64::try_from(changes).unwrap_or(0))
}

/// Prepare, bind, step to completion and collect rows plus counters.
fn run_statement(conn: &Connection, sql: &str, params: &[BindValue]) -> Result<QueryResult> {
    let changes_before = total_changes(conn)?;

    let mut stmt = conn.prepare(sql)?;
    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(StoreError::ParameterMismatch {
            expected,
            actual: params.len(),
        });
    }

    let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
    let values: Vec<_> = params.iter().map(BindValue::to_sql_value).collect();

    let mut rows = Vec::new();
    {
        let mut cursor = stmt.query(params_from_iter(values.iter()))?;
        while let Some(row) = cursor.next()? {
            let mut record = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                record.push(json_from_sql(row.get_ref(index)?));
            }
            rows.push(record);
        }
    }

    let scanned = u64::try_from(stmt.get_status(StatementStatus::FullscanStep)).unwrap_or(0);
    drop(stmt);
    let changes_after = total_changes(conn)?;

    Ok(QueryResult {
        columns,
        rows_read: scanned.max(rows.len() as u64),
        rows_written: changes_after.saturating_sub(changes_before),
        rows,
    })
}

/// Run one statement with the deadline enforced by SQLite itself.
///
/// The progress handler aborts the VM once the deadline passes, so the
/// statement stops even when nobody is awaiting the result anymore.
fn run_with_deadline(
    conn: &Connection,
    sql: &str,
    params: &[BindValue],
    timeout: Duration,
) -> Result<QueryResult> {
    let deadline = Instant::now() + timeout;
    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    conn.progress_handler(
        PROGRESS_CHECK_OPS,
        Some(move || {
            if Instant::now() >= deadline {
                flag.store(true, Ordering::Relaxed);
                return true;
            }
            false
        }),
    )?;

    let result = run_statement(conn, sql, params);
    conn.progress_handler(0, None::<fn() -> bool>)?;

    match result {
        Err(_) if expired.load(Ordering::Relaxed) => {
            let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            log::warn!("Query interrupted after {} ms", millis);
            Err(StoreError::Timeout(millis))
        },
        other => other,
    }
}

#[async_trait]
impl SharedStore for SqliteStore {
    async fn exec(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult> {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| StoreError::PoolClosed)?;

        let store = self.clone();
        let timeout = self.inner.options.query_timeout;
        let sql = sql.to_string();
        let params = params.to_vec();

        // The permit and connection live on the blocking thread, so a dropped
        // caller still counts against the pool until the statement ends.
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let conn = store.checkout()?;
            let result = run_with_deadline(&conn, &sql, &params, timeout);
            store.checkin(conn);
            result
        })
        .await?
    }
}
