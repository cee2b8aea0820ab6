//! Operator commands run instead of the server.

pub mod issue_token;

pub use issue_token::issue_token;
