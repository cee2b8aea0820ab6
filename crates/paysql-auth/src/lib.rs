//! paysql-auth - bearer token authentication
//!
//! Tokens are HS256 JWTs whose `sub` is the user id. The
//! [`AuthenticatedUser`] extractor rejects a request with 401 before the
//! handler reads its body.

pub mod error;
pub mod extractor;
pub mod jwt_auth;

pub use error::{AuthError, AuthResult};
pub use extractor::{AuthExtractError, AuthenticatedUser};
pub use jwt_auth::{create_and_sign_token, validate_jwt_token, JwtClaims, JwtSettings};
