//! paysql-billing - flat-fee charging
//!
//! [`ChargeGateway`] turns "this user wants to run one query" into an atomic
//! debit against a [`Ledger`]. The gateway never sees SQL; it only knows the
//! account and the fee.

pub mod error;
pub mod gateway;
pub mod ledger;

pub use error::{BillingError, Result};
pub use gateway::{ChargeGateway, ChargeOutcome};
pub use ledger::{InMemoryLedger, Ledger, LedgerReceipt, SqliteLedger};
