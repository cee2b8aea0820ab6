//! Shared models.

mod user_account;
mod user_id;

pub use user_account::{Credits, UserAccount};
pub use user_id::{UserId, UserIdValidationError};
