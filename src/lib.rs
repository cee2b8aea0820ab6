//! PaySQL Server Library
//!
//! Exposes the server modules so integration tests can build the same
//! application the binary runs.

pub mod commands;
pub mod lifecycle;
pub mod logging;
pub mod middleware;
