//! Authentication errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization: {0}")]
    MissingAuthorization(String),

    #[error("Malformed authorization: {0}")]
    MalformedAuthorization(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Untrusted issuer: {0}")]
    UntrustedIssuer(String),

    #[error("Missing claim: {0}")]
    MissingClaim(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Authentication not configured: {0}")]
    Configuration(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
