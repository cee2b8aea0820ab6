//! Ledger collaborator: the authoritative owner of balances.

mod memory;
mod sqlite;

pub use memory::InMemoryLedger;
pub use sqlite::SqliteLedger;

use async_trait::async_trait;
use paysql_commons::{Credits, UserId};
use serde::Serialize;

use crate::error::Result;

/// Result of a single debit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerReceipt {
    pub charged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Balance after the attempt; unchanged when `charged` is false
    pub balance: Credits,
}

impl LedgerReceipt {
    pub fn charged(balance: Credits) -> Self {
        Self {
            charged: true,
            message: None,
            balance,
        }
    }

    pub fn declined(balance: Credits, message: impl Into<String>) -> Self {
        Self {
            charged: false,
            message: Some(message.into()),
            balance,
        }
    }
}

/// Balance store.
///
/// `charge` must be atomic per account: the balance check and the decrement
/// happen as one step, so two concurrent charges can never both pass a check
/// that only one of them can afford. Unknown accounts have a zero balance and
/// are never created by `charge`.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn balance(&self, user_id: &UserId) -> Result<Credits>;

    async fn charge(&self, user_id: &UserId, amount: Credits) -> Result<LedgerReceipt>;

    /// Add `amount`, creating the account if needed. Returns the new balance.
    async fn credit(&self, user_id: &UserId, amount: Credits) -> Result<Credits>;
}
