//! Authenticated account snapshot handed to the billing pipeline.

use super::UserId;
use serde::{Deserialize, Serialize};

/// Balance unit: the ledger's smallest currency subunit.
///
/// Unsigned so that a negative balance is unrepresentable.
pub type Credits = u64;

/// A caller as seen by one request.
///
/// Built from the authenticated identity alone. The balance is not copied
/// here: it lives in the ledger and is observed through the charge receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: UserId,
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub access_token: String,
}

impl UserAccount {
    pub fn new(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            username: None,
            access_token: access_token.into(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// True when the request carried a non-empty access credential.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }
}
