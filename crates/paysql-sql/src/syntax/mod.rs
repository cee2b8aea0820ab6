//! Closed syntax tree the validator walks.
//!
//! sqlparser's AST has hundreds of node types and grows with every release.
//! The gate only cares about a handful of them, so the AST is lowered into
//! [`SyntaxNode`]s whose [`SyntaxKind`] is a closed enum. Statement kinds the
//! lowering does not recognise become [`SyntaxKind::OtherStatement`].

mod lower;

pub(crate) use lower::lower;

use serde::Serialize;
use std::fmt;

/// Node discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    // ===== Read-only statements =====
    /// Top-level query statement (SELECT, VALUES, WITH ... SELECT)
    Select,
    /// EXPLAIN [QUERY PLAN] <statement>
    Explain,

    // ===== Write / DDL statements =====
    Insert,
    Update,
    Delete,
    CreateTable,
    DropTable,
    AlterTable,
    CreateIndex,
    DropIndex,

    // ===== Engine control statements =====
    /// PRAGMA name [= value]
    Pragma,
    /// ATTACH / DETACH DATABASE
    Attach,
    /// BEGIN / COMMIT / ROLLBACK / SAVEPOINT / RELEASE
    Transaction,
    /// Any statement the lowering has no dedicated kind for; `value` holds its
    /// leading keywords
    OtherStatement,

    // ===== Sub-statement nodes =====
    /// A query body, including subqueries and CTE bodies
    Query,
    /// Scalar or aggregate function call; `value` holds the callee
    FunctionCall,
    /// Table-valued function in a FROM clause; `value` holds the callee
    TableFunction,
    /// Table or view reference; `value` holds the name
    Relation,
}

impl SyntaxKind {
    /// Human-readable label used in rejection reasons.
    pub fn label(self) -> &'static str {
        match self {
            SyntaxKind::Select => "SELECT",
            SyntaxKind::Explain => "EXPLAIN",
            SyntaxKind::Insert => "INSERT",
            SyntaxKind::Update => "UPDATE",
            SyntaxKind::Delete => "DELETE",
            SyntaxKind::CreateTable => "CREATE TABLE",
            SyntaxKind::DropTable => "DROP TABLE",
            SyntaxKind::AlterTable => "ALTER TABLE",
            SyntaxKind::CreateIndex => "CREATE INDEX",
            SyntaxKind::DropIndex => "DROP INDEX",
            SyntaxKind::Pragma => "PRAGMA",
            SyntaxKind::Attach => "ATTACH",
            SyntaxKind::Transaction => "transaction control",
            SyntaxKind::OtherStatement => "statement",
            SyntaxKind::Query => "query",
            SyntaxKind::FunctionCall => "function call",
            SyntaxKind::TableFunction => "table-valued function",
            SyntaxKind::Relation => "relation",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One node of the lowered tree. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub(crate) fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            value: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_value(kind: SyntaxKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub(crate) fn push_child(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[inline]
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Pre-order depth-first iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order traversal without recursion.
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited next.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Lowered parse result: one root node per statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    statements: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub(crate) fn new(statements: Vec<SyntaxNode>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[SyntaxNode] {
        &self.statements
    }

    /// Pre-order traversal over every node of every statement.
    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.statements.iter().flat_map(SyntaxNode::descendants)
    }
}
