use paysql_commons::Credits;
use paysql_core::PipelineError;
use serde::{Deserialize, Serialize};

/// Failure body shared by every non-200 response of the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Credits>,
    /// Present when the fee was debited even though the request failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_applied: Option<Credits>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            message: None,
            balance: None,
            charge_applied: None,
        }
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        let mut body = ErrorResponse::new(err.error_message());
        body.details = err.details().map(str::to_string);

        match err {
            PipelineError::Payment { message, balance } => {
                body.message = Some(message.clone());
                body.balance = Some(*balance);
            },
            PipelineError::Execution {
                charge_applied,
                balance,
                ..
            } => {
                body.charge_applied = Some(*charge_applied);
                body.balance = Some(*balance);
            },
            PipelineError::Unauthenticated
            | PipelineError::BadRequest { .. }
            | PipelineError::Validation { .. }
            | PipelineError::Billing(_) => {},
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_body() {
        let err = PipelineError::Payment {
            message: "insufficient balance".to_string(),
            balance: 2,
        };
        assert_eq!(
            serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
            json!({
                "error": "Insufficient balance",
                "message": "insufficient balance",
                "balance": 2
            })
        );
    }

    #[test]
    fn test_validation_body() {
        let err = PipelineError::Validation {
            reason: "DELETE statements are not allowed".to_string(),
        };
        assert_eq!(
            serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
            json!({
                "error": "Invalid query",
                "details": "DELETE statements are not allowed"
            })
        );
    }
}
