// PaySQL API Library
//
// HTTP handlers, routes, and request/response models for the shared query
// endpoint.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use routes::configure_routes;
