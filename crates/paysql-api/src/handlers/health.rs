use actix_web::HttpResponse;
use serde_json::json;

/// Health check endpoint handler
pub async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
