//! paysql-commons
//!
//! Identifiers, account models and constants shared by every PaySQL crate.
//! This crate deliberately has no dependencies beyond `serde` so that the
//! validator, ledger and store crates can all depend on it without cycles.

pub mod constants;
pub mod models;

pub use constants::{AuthConstants, BillingConstants};
pub use models::{Credits, UserAccount, UserId, UserIdValidationError};
