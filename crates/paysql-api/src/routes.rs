//! API routes configuration

use crate::handlers;
use actix_web::web;

/// Configure API routes
///
/// - POST /query/shared - run one read-only query against the shared dataset
///   (Bearer auth, billed per query)
/// - GET /healthcheck - liveness
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::query_shared)
        .route("/healthcheck", web::get().to(handlers::healthcheck_handler));
}
