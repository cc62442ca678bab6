use crate::Span;

use super::{
    ast::Ident,
    expressions::{BinaryOperator, CallExpr, Expr},
    types::TypeRef,
};

/// A `{ ... }` body. Every block parsed from one source unit gets its own id,
/// assigned in source order starting at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
    pub id: u32,
    pub span: Span,
}

impl Block {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// `const`/`var` declaration, global or local.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub identifier: Ident,
    pub is_constant: bool,
    pub explicit_type: Option<TypeRef>,
    pub assigned_value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable { name: Ident, span: Span },
    /// `_ = expr;`
    Discard { span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: AssignTarget,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub call: CallExpr,
    pub span: Span,
}

/// The `<op> <expr>` part of a head like `if (a < b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: BinaryOperator,
    pub right: Expr,
}

/// `|name|` after an `if`/`while` head.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Ident,
    pub span: Span,
}

/// Parenthesized head shared by `if` and `while`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionHead {
    pub condition: Expr,
    pub comparison: Option<Comparison>,
    pub binding: Option<Binding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub head: ConditionHead,
    pub then_body: Block,
    pub else_body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub head: ConditionHead,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assignment(AssignStmt),
    Call(CallStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    /// A statement region skipped during recovery.
    Invalid { span: Span },
}

impl Stmt {
    pub fn get_span(&self) -> Span {
        match self {
            Stmt::VarDecl(stmt) => stmt.span,
            Stmt::Assignment(stmt) => stmt.span,
            Stmt::Call(stmt) => stmt.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Invalid { span } => *span,
        }
    }
}
