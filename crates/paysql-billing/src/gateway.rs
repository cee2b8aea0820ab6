//! Charge gateway.

use std::sync::Arc;

use paysql_commons::{Credits, UserAccount};
use serde::Serialize;

use crate::error::Result;
use crate::ledger::Ledger;

/// Outcome of charging one query fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeOutcome {
    pub charged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub balance_after: Credits,
}

/// Debits flat query fees through a [`Ledger`].
///
/// Holds no balance state itself; atomicity comes from the ledger's `charge`.
#[derive(Clone)]
pub struct ChargeGateway {
    ledger: Arc<dyn Ledger>,
}

impl ChargeGateway {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Debit `fee` from `account`.
    ///
    /// `charged = false` with the ledger's message when the balance cannot
    /// cover the fee; the balance is left untouched in that case. `Err` means
    /// the ledger itself failed and nothing was debited.
    pub async fn charge(&self, account: &UserAccount, fee: Credits) -> Result<ChargeOutcome> {
        let receipt = self.ledger.charge(&account.user_id, fee).await?;

        if receipt.charged {
            log::debug!(
                "Charged {} to user {}, balance now {}",
                fee,
                account.user_id,
                receipt.balance
            );
        } else {
            log::info!(
                "Declined charge of {} to user {}: balance {}",
                fee,
                account.user_id,
                receipt.balance
            );
        }

        Ok(ChargeOutcome {
            charged: receipt.charged,
            message: receipt.message,
            balance_after: receipt.balance,
        })
    }
}
