use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use paysql_commons::{BillingConstants, Credits, UserId};

use super::{Ledger, LedgerReceipt};
use crate::error::{BillingError, Result};

/// Process-local ledger.
///
/// Each account owns its own mutex, so charges against one account are
/// serialized while different accounts proceed in parallel. The DashMap shard
/// lock is only held long enough to clone the account's `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: DashMap<UserId, Arc<Mutex<Credits>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger with preset balances.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (UserId, Credits)>,
    {
        let ledger = Self::new();
        for (user_id, balance) in balances {
            ledger.accounts.insert(user_id, Arc::new(Mutex::new(balance)));
        }
        ledger
    }

    fn account(&self, user_id: &UserId) -> Option<Arc<Mutex<Credits>>> {
        self.accounts.get(user_id).map(|entry| Arc::clone(entry.value()))
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance(&self, user_id: &UserId) -> Result<Credits> {
        Ok(self.account(user_id).map(|slot| *slot.lock()).unwrap_or(0))
    }

    async fn charge(&self, user_id: &UserId, amount: Credits) -> Result<LedgerReceipt> {
        let Some(slot) = self.account(user_id) else {
            return Ok(LedgerReceipt::declined(0, BillingConstants::INSUFFICIENT_BALANCE));
        };

        let mut balance = slot.lock();
        match balance.checked_sub(amount) {
            Some(remaining) => {
                *balance = remaining;
                Ok(LedgerReceipt::charged(remaining))
            },
            None => Ok(LedgerReceipt::declined(*balance, BillingConstants::INSUFFICIENT_BALANCE)),
        }
    }

    async fn credit(&self, user_id: &UserId, amount: Credits) -> Result<Credits> {
        let slot = Arc::clone(
            self.accounts.entry(user_id.clone()).or_insert_with(|| Arc::new(Mutex::new(0))).value(),
        );

        let mut balance = slot.lock();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| BillingError::Overflow(user_id.to_string()))?;
        Ok(*balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    #[tokio::test]
    async fn test_charge_decrements() {
        let ledger = InMemoryLedger::with_balances([(user("alice"), 10)]);
        let receipt = ledger.charge(&user("alice"), 3).await.unwrap();
        assert_eq!(receipt, LedgerReceipt::charged(7));
        assert_eq!(ledger.balance(&user("alice")).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_exact_balance_can_be_spent() {
        let ledger = InMemoryLedger::with_balances([(user("alice"), 3)]);
        assert!(ledger.charge(&user("alice"), 3).await.unwrap().charged);
        assert_eq!(ledger.balance(&user("alice")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_balance_leaves_balance() {
        let ledger = InMemoryLedger::with_balances([(user("alice"), 2)]);
        let receipt = ledger.charge(&user("alice"), 3).await.unwrap();
        assert!(!receipt.charged);
        assert_eq!(receipt.message.as_deref(), Some("insufficient balance"));
        assert_eq!(receipt.balance, 2);
        assert_eq!(ledger.balance(&user("alice")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_created_by_charge() {
        let ledger = InMemoryLedger::new();
        let receipt = ledger.charge(&user("ghost"), 1).await.unwrap();
        assert!(!receipt.charged);
        assert_eq!(receipt.balance, 0);
        assert!(ledger.account(&user("ghost")).is_none());
    }

    #[tokio::test]
    async fn test_credit_creates_and_overflow_is_rejected() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.credit(&user("bob"), 5).await.unwrap(), 5);
        assert_eq!(ledger.credit(&user("bob"), 5).await.unwrap(), 10);
        let err = ledger.credit(&user("bob"), Credits::MAX).await.unwrap_err();
        assert!(matches!(err, BillingError::Overflow(_)));
        assert_eq!(ledger.balance(&user("bob")).await.unwrap(), 10);
    }
}
