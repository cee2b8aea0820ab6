//! Pipeline failures and their HTTP mapping.

use paysql_billing::BillingError;
use paysql_commons::Credits;
use thiserror::Error;

use super::PipelineStage;

/// One failed request. Each variant belongs to exactly one stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("SQL query is required")]
    BadRequest { details: Option<String> },

    #[error("Invalid query: {reason}")]
    Validation { reason: String },

    #[error("Insufficient balance: {message}")]
    Payment { message: String, balance: Credits },

    #[error("Billing unavailable: {0}")]
    Billing(#[from] BillingError),

    /// The fee was already debited when this happened; there is no refund.
    #[error("Query execution failed: {details}")]
    Execution {
        details: String,
        charge_applied: Credits,
        balance: Credits,
    },
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Unauthenticated => PipelineStage::AuthCheck,
            PipelineError::BadRequest { .. } => PipelineStage::BodyParse,
            PipelineError::Validation { .. } => PipelineStage::Validate,
            PipelineError::Payment { .. } | PipelineError::Billing(_) => PipelineStage::Charge,
            PipelineError::Execution { .. } => PipelineStage::Execute,
        }
    }

    /// HTTP status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Unauthenticated => 401,
            PipelineError::BadRequest { .. } | PipelineError::Validation { .. } => 400,
            PipelineError::Payment { .. } => 402,
            PipelineError::Billing(_) | PipelineError::Execution { .. } => 500,
        }
    }

    /// Short, stable `error` string of the response body.
    pub fn error_message(&self) -> &'static str {
        match self {
            PipelineError::Unauthenticated => "Authentication required",
            PipelineError::BadRequest { .. } => "SQL query is required",
            PipelineError::Validation { .. } => "Invalid query",
            PipelineError::Payment { .. } => "Insufficient balance",
            PipelineError::Billing(_) => "Billing unavailable",
            PipelineError::Execution { .. } => "Query execution failed",
        }
    }

    /// Optional `details` of the response body. Ledger faults are not exposed.
    pub fn details(&self) -> Option<&str> {
        match self {
            PipelineError::BadRequest { details } => details.as_deref(),
            PipelineError::Validation { reason } => Some(reason),
            PipelineError::Execution { details, .. } => Some(details),
            PipelineError::Unauthenticated
            | PipelineError::Payment { .. }
            | PipelineError::Billing(_) => None,
        }
    }

    pub fn bad_request(details: impl Into<String>) -> Self {
        PipelineError::BadRequest {
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_stage_mapping() {
        let err = PipelineError::Validation {
            reason: "DROP TABLE statements are not allowed".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.stage(), PipelineStage::Validate);
        assert_eq!(err.error_message(), "Invalid query");
        assert_eq!(err.details(), Some("DROP TABLE statements are not allowed"));

        let err = PipelineError::Payment {
            message: "insufficient balance".to_string(),
            balance: 0,
        };
        assert_eq!(err.status_code(), 402);
        assert_eq!(err.details(), None);

        let err = PipelineError::Execution {
            details: "no such table: t".to_string(),
            charge_applied: 1,
            balance: 9,
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.stage(), PipelineStage::Execute);
    }
}
