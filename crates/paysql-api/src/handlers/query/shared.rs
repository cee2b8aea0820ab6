//! Handler for `POST /query/shared`

use std::sync::Arc;
use std::time::Instant;

use actix_web::{post, web, HttpResponse};
use paysql_auth::AuthenticatedUser;
use paysql_commons::UserAccount;
use paysql_core::{AppContext, PipelineError, SharedQueryRequest};

use crate::error::ApiError;
use crate::models::SharedQueryResponse;

/// Run one billed read-only query.
///
/// The `AuthenticatedUser` extractor runs before the body is read, so an
/// unauthenticated caller never gets as far as JSON parsing. The ledger is
/// first touched by the pipeline's Charge stage.
#[post("/query/shared")]
pub async fn query_shared(
    user: AuthenticatedUser,
    body: web::Bytes,
    app_context: web::Data<Arc<AppContext>>,
) -> Result<HttpResponse, ApiError> {
    let start_time = Instant::now();

    let request: SharedQueryRequest = serde_json::from_slice(&body)
        .map_err(|e| PipelineError::bad_request(format!("Invalid JSON body: {}", e)))?;

    let account = UserAccount::from(user);

    let result = app_context.pipeline().run(&account, request).await;
    let took_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(envelope) => {
            log::info!(
                "Shared query by {} returned {} rows in {:.3}ms",
                account.user_id,
                envelope.rows.len(),
                took_ms
            );
            Ok(HttpResponse::Ok().json(SharedQueryResponse { result: envelope }))
        },
        Err(err) => {
            log::info!(
                "Shared query by {} failed at {} ({}) in {:.3}ms",
                account.user_id,
                err.stage(),
                err.status_code(),
                took_ms
            );
            Err(err.into())
        },
    }
}
