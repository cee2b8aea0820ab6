//! Actix-web extractor for bearer authentication.
//!
//! `web::Data<JwtSettings>` must be registered as app data:
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::new(JwtSettings::from(&config.auth)))
//!     .service(handler)
//! ```

use std::fmt;
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::StatusCode, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use paysql_commons::{AuthConstants, UserAccount, UserId};

use crate::error::AuthError;
use crate::jwt_auth::{validate_jwt_token, JwtSettings};

/// Identity proven by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Option<String>,
    pub access_token: String,
}

impl AuthenticatedUser {
    /// Validate the `Authorization` header of `req` against `settings`.
    pub fn from_request_headers(req: &HttpRequest, settings: &JwtSettings) -> Result<Self, AuthError> {
        let header = req
            .headers()
            .get(AuthConstants::AUTHORIZATION_HEADER)
            .ok_or_else(|| {
                AuthError::MissingAuthorization(
                    "Authorization header is required. Use 'Authorization: Bearer <token>'"
                        .to_string(),
                )
            })?
            .to_str()
            .map_err(|_| {
                AuthError::MalformedAuthorization(
                    "Authorization header contains invalid characters".to_string(),
                )
            })?;

        let token = header
            .strip_prefix(AuthConstants::BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AuthError::MalformedAuthorization(
                    "Authorization header must be 'Bearer <token>'".to_string(),
                )
            })?;

        let claims = validate_jwt_token(token, &settings.secret, &settings.trusted_issuers)?;
        let user_id =
            UserId::try_new(claims.sub).map_err(|e| AuthError::InvalidUserId(e.to_string()))?;

        Ok(Self {
            user_id,
            username: claims.username,
            access_token: token.to_string(),
        })
    }
}

impl From<AuthenticatedUser> for UserAccount {
    fn from(user: AuthenticatedUser) -> Self {
        let account = UserAccount::new(user.user_id, user.access_token);
        match user.username {
            Some(name) => account.with_username(name),
            None => account,
        }
    }
}

/// Extraction failure rendered as a JSON error response.
#[derive(Debug)]
pub struct AuthExtractError {
    inner: AuthError,
}

impl From<AuthError> for AuthExtractError {
    fn from(inner: AuthError) -> Self {
        Self { inner }
    }
}

impl fmt::Display for AuthExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl ResponseError for AuthExtractError {
    fn status_code(&self) -> StatusCode {
        match &self.inner {
            AuthError::Configuration(_) | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MissingAuthorization(_)
            | AuthError::MalformedAuthorization(_)
            | AuthError::TokenExpired
            | AuthError::InvalidSignature
            | AuthError::UntrustedIssuer(_)
            | AuthError::MissingClaim(_)
            | AuthError::InvalidUserId(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = if self.status_code() == StatusCode::UNAUTHORIZED {
            "Authentication required"
        } else {
            "Authentication unavailable"
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": error,
            "details": self.inner.to_string(),
        }))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthExtractError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(settings) = req.app_data::<web::Data<JwtSettings>>() else {
            log::error!("JwtSettings not registered as app data");
            return ready(Err(AuthError::Configuration(
                "JWT settings not registered".to_string(),
            )
            .into()));
        };

        let result = Self::from_request_headers(req, settings.get_ref()).map_err(|e| {
            log::debug!("Rejected request to {}: {}", req.path(), e);
            AuthExtractError::from(e)
        });
        ready(result)
    }
}
