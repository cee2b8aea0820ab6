//! Read-only verdicts.

pub mod denylist;

use std::fmt;

use serde::Serialize;

use crate::parser::{parse_syntax_tree, ParseError};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use denylist::{is_forbidden_function, NodePolicy};

/// Outcome of validating one SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn reject(violation: Violation) -> Self {
        Self {
            allowed: false,
            reason: Some(violation.to_string()),
        }
    }
}

/// First reason a statement was not proven read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Parse(ParseError),
    ForbiddenStatement(SyntaxKind),
    ForbiddenFunction(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Parse(err) => write!(f, "{}", err),
            Violation::ForbiddenStatement(kind) => {
                write!(f, "{} statements are not allowed", kind.label())
            },
            Violation::ForbiddenFunction(name) => write!(f, "Function '{}' is not allowed", name),
        }
    }
}

/// Decide whether `sql` is a single provably read-only statement.
///
/// Never panics and never touches storage. Anything that does not parse under
/// the SQLite dialect is rejected.
pub fn validate(sql: &str) -> ValidationVerdict {
    let verdict = match parse_syntax_tree(sql) {
        Ok(tree) => match find_violation(&tree) {
            Some(violation) => ValidationVerdict::reject(violation),
            None => ValidationVerdict::allow(),
        },
        Err(err) => ValidationVerdict::reject(Violation::Parse(err)),
    };

    if let Some(reason) = &verdict.reason {
        log::debug!("Rejected statement: {}", reason);
    }
    verdict
}

/// Depth-first walk over every node; returns the first violation found.
pub fn find_violation(tree: &SyntaxTree) -> Option<Violation> {
    tree.nodes().find_map(check_node)
}

fn check_node(node: &SyntaxNode) -> Option<Violation> {
    match node.kind().policy() {
        NodePolicy::Permitted => None,
        NodePolicy::Forbidden => Some(Violation::ForbiddenStatement(node.kind())),
        NodePolicy::CheckName => node
            .value()
            .filter(|name| is_forbidden_function(name))
            .map(|name| Violation::ForbiddenFunction(name.to_string())),
    }
}
