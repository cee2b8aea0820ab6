//! Denylists and the per-kind policy table.

use crate::syntax::SyntaxKind;

/// Write and DDL statement kinds. Any occurrence anywhere in the tree rejects.
pub const FORBIDDEN_STATEMENT_KINDS: [SyntaxKind; 8] = [
    SyntaxKind::Insert,
    SyntaxKind::Update,
    SyntaxKind::Delete,
    SyntaxKind::CreateTable,
    SyntaxKind::DropTable,
    SyntaxKind::AlterTable,
    SyntaxKind::CreateIndex,
    SyntaxKind::DropIndex,
];

/// Callees rejected by exact (lowercased) name.
pub const FORBIDDEN_FUNCTIONS: [&str; 4] = [
    "load_extension",
    "sqlite_compileoption_get",
    "sqlite_compileoption_used",
    "pragma",
];

/// Callee prefixes rejected regardless of suffix (`pragma_table_info`, ...).
pub const FORBIDDEN_FUNCTION_PREFIXES: [&str; 1] = ["pragma_"];

/// What the walker does on meeting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePolicy {
    /// Node is read-only; descend into children.
    Permitted,
    /// Node rejects the statement outright.
    Forbidden,
    /// Node carries a callee/relation name that must be checked against the
    /// function denylists.
    CheckName,
}

impl SyntaxKind {
    /// Policy for this kind. No wildcard arm: a new kind does not compile
    /// until it is classified here.
    pub fn policy(self) -> NodePolicy {
        match self {
            SyntaxKind::Select | SyntaxKind::Query | SyntaxKind::Explain => NodePolicy::Permitted,

            SyntaxKind::Insert
            | SyntaxKind::Update
            | SyntaxKind::Delete
            | SyntaxKind::CreateTable
            | SyntaxKind::DropTable
            | SyntaxKind::AlterTable
            | SyntaxKind::CreateIndex
            | SyntaxKind::DropIndex => NodePolicy::Forbidden,

            SyntaxKind::Pragma
            | SyntaxKind::Attach
            | SyntaxKind::Transaction
            | SyntaxKind::OtherStatement => NodePolicy::Forbidden,

            SyntaxKind::FunctionCall | SyntaxKind::TableFunction | SyntaxKind::Relation => {
                NodePolicy::CheckName
            },
        }
    }
}

/// True when `name` (already lowercased) hits either function denylist.
pub fn is_forbidden_function(name: &str) -> bool {
    FORBIDDEN_FUNCTIONS.contains(&name)
        || FORBIDDEN_FUNCTION_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}
