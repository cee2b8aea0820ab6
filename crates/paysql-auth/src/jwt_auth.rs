// JWT issuance and validation

use crate::error::{AuthError, AuthResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use paysql_commons::{AuthConstants, UserId};
use paysql_configs::AuthSettings;
use serde::{Deserialize, Serialize};

/// Claims carried by PaySQL access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl JwtClaims {
    pub fn new(user_id: &UserId, username: Option<&str>, expiry_hours: i64, issuer: &str) -> Self {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(expiry_hours);

        Self {
            sub: user_id.to_string(),
            iss: issuer.to_string(),
            exp: exp.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
            username: username.map(str::to_string),
        }
    }
}

/// Verification settings shared with the extractor through app data.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub trusted_issuers: Vec<String>,
    pub expiry_hours: i64,
}

impl From<&AuthSettings> for JwtSettings {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            secret: settings.jwt_secret.clone(),
            trusted_issuers: settings.jwt_trusted_issuers.clone(),
            expiry_hours: settings.jwt_expiry_hours,
        }
    }
}

impl JwtSettings {
    /// Issuer used when minting: the first trusted issuer, so minted tokens
    /// always verify against the same settings.
    pub fn issuer(&self) -> &str {
        self.trusted_issuers
            .first()
            .map(String::as_str)
            .unwrap_or(AuthConstants::DEFAULT_ISSUER)
    }
}

/// Mint a signed access token for `user_id`.
pub fn create_and_sign_token(
    user_id: &UserId,
    username: Option<&str>,
    settings: &JwtSettings,
) -> AuthResult<(String, JwtClaims)> {
    let claims = JwtClaims::new(user_id, username, settings.expiry_hours, settings.issuer());
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok((token, claims))
}

/// Validate a token and return its claims.
///
/// Checks the HS256 signature, expiry, that the issuer is trusted and that
/// `sub` is present. An empty trusted-issuer list rejects every token.
pub fn validate_jwt_token(
    token: &str,
    secret: &str,
    trusted_issuers: &[String],
) -> AuthResult<JwtClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_nbf = false;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data =
        decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedAuthorization(format!("JWT decode error: {}", e)),
        })?;

    let claims = token_data.claims;
    verify_issuer(&claims.iss, trusted_issuers)?;

    if claims.sub.is_empty() {
        return Err(AuthError::MissingClaim("sub".to_string()));
    }

    Ok(claims)
}

fn verify_issuer(issuer: &str, trusted_issuers: &[String]) -> AuthResult<()> {
    if trusted_issuers.iter().any(|i| i == issuer) {
        Ok(())
    } else {
        Err(AuthError::UntrustedIssuer(issuer.to_string()))
    }
}
