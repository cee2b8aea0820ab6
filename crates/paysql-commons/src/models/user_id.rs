//! Type-safe wrapper for user identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for user identifiers.
///
/// The same identifier keys the ledger account and appears as the `sub`
/// claim of access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Error type for UserId validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdValidationError(pub String);

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UserIdValidationError {}

impl UserId {
    /// Maximum accepted identifier length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Creates a new UserId from a string.
    ///
    /// # Panics
    /// Panics if the ID is invalid. Use `try_new()` for fallible creation.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self::try_new(id).expect("UserId contains invalid characters")
    }

    /// Creates a new UserId, returning an error if validation fails.
    ///
    /// Rejects empty identifiers, identifiers longer than [`UserId::MAX_LEN`],
    /// and identifiers containing whitespace or control characters.
    pub fn try_new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        Self::validate_id(&id)?;
        Ok(Self(id))
    }

    fn validate_id(id: &str) -> Result<(), UserIdValidationError> {
        if id.is_empty() {
            return Err(UserIdValidationError("User ID cannot be empty".to_string()));
        }
        if id.len() > Self::MAX_LEN {
            return Err(UserIdValidationError(format!(
                "User ID cannot be longer than {} bytes",
                Self::MAX_LEN
            )));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UserIdValidationError(
                "User ID cannot contain whitespace or control characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the user ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_id() {
        let user = UserId::try_new("alice123").unwrap();
        assert_eq!(user.as_str(), "alice123");
        assert_eq!(user.to_string(), "alice123");
    }

    #[test]
    fn test_empty_user_id_rejected() {
        assert!(UserId::try_new("").is_err());
    }

    #[test]
    fn test_whitespace_user_id_rejected() {
        assert!(UserId::try_new("alice bob").is_err());
        assert!(UserId::try_new("alice\n").is_err());
    }

    #[test]
    fn test_overlong_user_id_rejected() {
        let id = "a".repeat(UserId::MAX_LEN + 1);
        assert!(UserId::try_new(id).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let id: UserId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(id.as_str(), "alice");
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }
}
