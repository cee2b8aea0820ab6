//! Pipeline errors as HTTP responses.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use paysql_core::PipelineError;

use crate::models::ErrorResponse;

/// Wraps [`PipelineError`] so it can be returned from handlers.
#[derive(Debug)]
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if let PipelineError::Billing(e) = &self.0 {
            log::error!("Ledger failure: {}", e);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let payment = ApiError::from(PipelineError::Payment {
            message: "insufficient balance".to_string(),
            balance: 0,
        });
        assert_eq!(payment.status_code(), StatusCode::PAYMENT_REQUIRED);

        let bad = ApiError::from(PipelineError::BadRequest { details: None });
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }
}
