//! paysql-configs
//!
//! Server configuration types and loader for PaySQL.

pub mod config;

pub use config::defaults;
pub use config::*;
