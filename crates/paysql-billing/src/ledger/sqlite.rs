use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use paysql_commons::{BillingConstants, Credits, UserId};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::{Ledger, LedgerReceipt};
use crate::error::{BillingError, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS accounts (
    user_id TEXT PRIMARY KEY NOT NULL,
    balance INTEGER NOT NULL CHECK (balance >= 0)
)";

/// Balances persisted in a SQLite file.
///
/// A debit is a single conditional `UPDATE ... WHERE balance >= ?fee`, so the
/// check and the decrement are one atomic statement even if another process
/// shares the file.
#[derive(Clone)]
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedger {
    /// Open (creating if needed) the ledger file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut *guard)
        })
        .await?
    }
}

fn read_balance(conn: &Connection, user_id: &str) -> Result<Credits> {
    let raw: Option<i64> = conn
        .query_row("SELECT balance FROM accounts WHERE user_id = ?1", params![user_id], |row| {
            row.get(0)
        })
        .optional()?;
    match raw {
        None => Ok(0),
        Some(value) => {
            Credits::try_from(value).map_err(|_| BillingError::OutOfRange(user_id.to_string()))
        },
    }
}

fn to_sql_amount(user_id: &str, amount: Credits) -> Result<i64> {
    i64::try_from(amount).map_err(|_| BillingError::OutOfRange(user_id.to_string()))
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn balance(&self, user_id: &UserId) -> Result<Credits> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| read_balance(conn, &user_id)).await
    }

    async fn charge(&self, user_id: &UserId, amount: Credits) -> Result<LedgerReceipt> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let fee = to_sql_amount(&user_id, amount)?;
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE accounts SET balance = balance - ?1 WHERE user_id = ?2 AND balance >= ?1",
                params![fee, user_id],
            )?;
            let balance = read_balance(&tx, &user_id)?;
            tx.commit()?;

            if updated == 1 {
                Ok(LedgerReceipt::charged(balance))
            } else {
                log::debug!("Declined charge of {} for user {}", amount, user_id);
                Ok(LedgerReceipt::declined(balance, BillingConstants::INSUFFICIENT_BALANCE))
            }
        })
        .await
    }

    async fn credit(&self, user_id: &UserId, amount: Credits) -> Result<Credits> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let current = read_balance(&tx, &user_id)?;
            let next = current
                .checked_add(amount)
                .ok_or_else(|| BillingError::Overflow(user_id.clone()))?;
            let stored = to_sql_amount(&user_id, next)?;
            tx.execute(
                "INSERT INTO accounts (user_id, balance) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET balance = excluded.balance",
                params![user_id, stored],
            )?;
            tx.commit()?;
            Ok(next)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_charge_and_decline() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let alice = UserId::new("alice");
        ledger.credit(&alice, 5).await.unwrap();

        let receipt = ledger.charge(&alice, 2).await.unwrap();
        assert_eq!(receipt, LedgerReceipt::charged(3));

        let receipt = ledger.charge(&alice, 4).await.unwrap();
        assert!(!receipt.charged);
        assert_eq!(receipt.balance, 3);
        assert_eq!(ledger.balance(&alice).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_account_has_zero_balance() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let ghost = UserId::new("ghost");
        assert_eq!(ledger.balance(&ghost).await.unwrap(), 0);
        assert!(!ledger.charge(&ghost, 1).await.unwrap().charged);
        assert_eq!(ledger.balance(&ghost).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_balances_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let alice = UserId::new("alice");
        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.credit(&alice, 10).await.unwrap();
            ledger.charge(&alice, 4).await.unwrap();
        }
        let ledger = SqliteLedger::open(&path).unwrap();
        assert_eq!(ledger.balance(&alice).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_amount_beyond_i64_is_rejected() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let err = ledger.credit(&UserId::new("alice"), Credits::MAX).await.unwrap_err();
        assert!(matches!(err, BillingError::OutOfRange(_)));
    }
}
