//! Shared query pipeline.
//!
//! AuthCheck → BodyParse → Validate → Charge → Execute → Respond. Every
//! request walks the stages in order and leaves with exactly one outcome.
//! Nothing is charged unless validation passed, and nothing is executed
//! unless the charge went through.

mod envelope;
mod error;
mod stage;

pub use envelope::{ResponseEnvelope, ResponseMeta, SharedQueryRequest};
pub use error::PipelineError;
pub use stage::PipelineStage;

use paysql_billing::ChargeGateway;
use paysql_commons::{Credits, UserAccount};
use paysql_store::{BindValue, QueryExecutor};
use tracing::Instrument;

/// Fixed message returned instead of engine diagnostics when those are hidden.
const GENERIC_EXECUTION_ERROR: &str = "The query could not be executed";

#[derive(Clone)]
pub struct SharedQueryPipeline {
    gateway: ChargeGateway,
    executor: QueryExecutor,
    fee: Credits,
    expose_engine_errors: bool,
}

impl SharedQueryPipeline {
    pub fn new(gateway: ChargeGateway, executor: QueryExecutor, fee: Credits) -> Self {
        Self {
            gateway,
            executor,
            fee,
            expose_engine_errors: true,
        }
    }

    pub fn with_engine_errors(mut self, expose: bool) -> Self {
        self.expose_engine_errors = expose;
        self
    }

    /// Run one request for an authenticated account.
    pub async fn run(
        &self,
        account: &UserAccount,
        request: SharedQueryRequest,
    ) -> Result<ResponseEnvelope, PipelineError> {
        let span = tracing::info_span!("shared_query", user_id = %account.user_id);
        self.run_stages(account, request).instrument(span).await
    }

    async fn run_stages(
        &self,
        account: &UserAccount,
        request: SharedQueryRequest,
    ) -> Result<ResponseEnvelope, PipelineError> {
        // AuthCheck
        if !account.is_authenticated() {
            return Err(PipelineError::Unauthenticated);
        }

        // BodyParse
        let sql = request
            .sql
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(PipelineError::BadRequest { details: None })?;
        let params = BindValue::from_json_params(request.params.as_deref().unwrap_or_default())
            .map_err(|e| PipelineError::bad_request(e.to_string()))?;
        log::debug!("Shared query: {}", sql);

        // Validate
        let verdict = paysql_sql::validate(sql);
        if !verdict.allowed {
            let reason = verdict.reason.unwrap_or_else(|| "Query is not read-only".to_string());
            log::info!("Rejected query from {}: {}", account.user_id, reason);
            return Err(PipelineError::Validation { reason });
        }

        // Charge
        let outcome = self.gateway.charge(account, self.fee).await?;
        if !outcome.charged {
            return Err(PipelineError::Payment {
                message: outcome.message.unwrap_or_else(|| {
                    paysql_commons::BillingConstants::INSUFFICIENT_BALANCE.to_string()
                }),
                balance: outcome.balance_after,
            });
        }

        // Execute
        let result = self.executor.execute(sql, &params).await.map_err(|e| {
            log::warn!(
                "Query failed for {} after charging {}: {}",
                account.user_id,
                self.fee,
                e
            );
            PipelineError::Execution {
                details: if self.expose_engine_errors {
                    e.to_string()
                } else {
                    GENERIC_EXECUTION_ERROR.to_string()
                },
                charge_applied: self.fee,
                balance: outcome.balance_after,
            }
        })?;

        // Respond
        Ok(ResponseEnvelope::new(result, self.fee, outcome.balance_after))
    }
}
