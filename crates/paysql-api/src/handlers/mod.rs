//! HTTP request handlers

pub mod health;
pub mod query;

pub use health::healthcheck_handler;
pub use query::query_shared;
