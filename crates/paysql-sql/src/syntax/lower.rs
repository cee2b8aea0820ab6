//! sqlparser AST → [`SyntaxNode`] lowering.
//!
//! Driven by sqlparser's `Visitor`, which reaches every statement, query,
//! expression, table factor and relation in the AST, including statements
//! nested inside `EXPLAIN` and DML bodies of set expressions.

use std::ops::ControlFlow;

use sqlparser::ast::{Expr, ObjectName, ObjectType, Query, Statement, TableFactor, Visit, Visitor};

use super::{SyntaxKind, SyntaxNode, SyntaxTree};

/// Lower parsed statements into a [`SyntaxTree`].
pub(crate) fn lower(statements: &[Statement]) -> SyntaxTree {
    let mut builder = TreeBuilder::default();
    for statement in statements {
        // TreeBuilder never breaks.
        let _ = statement.visit(&mut builder);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<SyntaxNode>,
    roots: Vec<SyntaxNode>,
}

impl TreeBuilder {
    fn enter(&mut self, node: SyntaxNode) {
        self.open.push(node);
    }

    fn exit(&mut self) {
        if let Some(node) = self.open.pop() {
            self.attach(node);
        }
    }

    fn attach(&mut self, node: SyntaxNode) {
        match self.open.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> SyntaxTree {
        while !self.open.is_empty() {
            self.exit();
        }
        SyntaxTree::new(self.roots)
    }
}

impl Visitor for TreeBuilder {
    type Break = ();

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<Self::Break> {
        self.enter(statement_node(statement));
        ControlFlow::Continue(())
    }

    fn post_visit_statement(&mut self, _statement: &Statement) -> ControlFlow<Self::Break> {
        self.exit();
        ControlFlow::Continue(())
    }

    fn pre_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.enter(SyntaxNode::new(SyntaxKind::Query));
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.exit();
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if let Expr::Function(function) = expr {
            self.enter(SyntaxNode::with_value(
                SyntaxKind::FunctionCall,
                callee_name(&function.name),
            ));
        }
        ControlFlow::Continue(())
    }

    fn post_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if matches!(expr, Expr::Function(_)) {
            self.exit();
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, table_factor: &TableFactor) -> ControlFlow<Self::Break> {
        match table_factor {
            TableFactor::Function { name, .. }
            | TableFactor::Table {
                name,
                args: Some(_),
                ..
            } => {
                self.attach(SyntaxNode::with_value(
                    SyntaxKind::TableFunction,
                    callee_name(name),
                ));
            },
            _ => {},
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        self.attach(SyntaxNode::with_value(SyntaxKind::Relation, callee_name(relation)));
        ControlFlow::Continue(())
    }
}

fn statement_node(statement: &Statement) -> SyntaxNode {
    let kind = match statement {
        Statement::Query(_) => SyntaxKind::Select,
        Statement::Explain { .. } => SyntaxKind::Explain,
        Statement::Insert { .. } => SyntaxKind::Insert,
        Statement::Update { .. } => SyntaxKind::Update,
        Statement::Delete { .. } => SyntaxKind::Delete,
        Statement::CreateTable { .. } => SyntaxKind::CreateTable,
        Statement::AlterTable { .. } => SyntaxKind::AlterTable,
        Statement::CreateIndex { .. } => SyntaxKind::CreateIndex,
        Statement::Drop {
            object_type: ObjectType::Table,
            ..
        } => SyntaxKind::DropTable,
        Statement::Drop {
            object_type: ObjectType::Index,
            ..
        } => SyntaxKind::DropIndex,
        Statement::Pragma { .. } => SyntaxKind::Pragma,
        Statement::AttachDatabase { .. } => SyntaxKind::Attach,
        Statement::StartTransaction { .. }
        | Statement::Commit { .. }
        | Statement::Rollback { .. }
        | Statement::Savepoint { .. }
        | Statement::ReleaseSavepoint { .. } => SyntaxKind::Transaction,
        other => {
            return SyntaxNode::with_value(SyntaxKind::OtherStatement, leading_keywords(other))
        },
    };
    SyntaxNode::new(kind)
}

/// Last path segment of an object name, unquoted and lowercased.
///
/// `main."Load_Extension"` → `load_extension`.
fn callee_name(name: &ObjectName) -> String {
    let rendered = name.to_string();
    let last = rendered.rsplit('.').next().unwrap_or(rendered.as_str());
    last.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']' | '\''))
        .to_ascii_lowercase()
}

fn leading_keywords(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}
