//! Request/response models

mod error_response;
mod query_response;

pub use error_response::ErrorResponse;
pub use query_response::SharedQueryResponse;
pub use paysql_core::SharedQueryRequest;
