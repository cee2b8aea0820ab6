//! paysql-sql - read-only statement gate
//!
//! Parses SQL text under the SQLite dialect, lowers the sqlparser AST into a
//! small closed [`SyntaxNode`] tree, and walks that tree to decide whether the
//! statement is provably read-only.
//!
//! ```
//! use paysql_sql::validate;
//!
//! assert!(validate("SELECT COUNT(*) AS total FROM sample_data").allowed);
//!
//! let verdict = validate("DROP TABLE sample_data");
//! assert!(!verdict.allowed);
//! assert_eq!(verdict.reason.as_deref(), Some("DROP TABLE statements are not allowed"));
//! ```

pub mod parser;
pub mod syntax;
pub mod validator;

pub use parser::ParseError;
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
pub use validator::denylist::{
    NodePolicy, FORBIDDEN_FUNCTIONS, FORBIDDEN_FUNCTION_PREFIXES, FORBIDDEN_STATEMENT_KINDS,
};
pub use validator::{validate, ValidationVerdict, Violation};
