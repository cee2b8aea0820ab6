//! SQLite-dialect parsing.
//!
//! The gate accepts exactly one dialect. Falling back to a more permissive
//! dialect on failure would let text through that the storage engine reads
//! differently from the validator.

use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::{Parser, ParserOptions};
use thiserror::Error;

use crate::syntax::{lower, SyntaxTree};

/// Nesting bound for the recursive-descent parser. Also bounds the depth of
/// the lowered tree.
///
/// Parsing runs on actix worker threads with the default 2 MiB stack. A
/// scalar subquery costs two units and a derived table one, so input nested
/// past this limit is refused long before the parser's frames exhaust that
/// stack.
const SQL_RECURSION_LIMIT: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("SQL parse error: {0}")]
    Syntax(String),

    #[error("SQL statement is empty")]
    Empty,

    #[error("Only a single SQL statement is allowed, found {0}")]
    MultipleStatements(usize),
}

/// Parse SQL text into sqlparser statements using the fixed dialect.
pub fn parse_statements(sql: &str) -> Result<Vec<Statement>, ParseError> {
    let dialect = SQLiteDialect {};
    Parser::new(&dialect)
        .with_options(ParserOptions::new())
        .with_recursion_limit(SQL_RECURSION_LIMIT)
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_statements())
        .map_err(|e| ParseError::Syntax(e.to_string()))
}

/// Parse exactly one statement and lower it into a [`SyntaxTree`].
pub fn parse_syntax_tree(sql: &str) -> Result<SyntaxTree, ParseError> {
    if sql.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let statements = parse_statements(sql)?;
    match statements.len() {
        0 => Err(ParseError::Empty),
        1 => Ok(lower(&statements)),
        n => Err(ParseError::MultipleStatements(n)),
    }
}
