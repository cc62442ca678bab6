use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::ast::Ident;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let operator = match kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Dash => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Equals => BinaryOperator::Equal,
            TokenKind::NotEquals => BinaryOperator::NotEqual,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::LessEquals => BinaryOperator::LessEqual,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::GreaterEquals => BinaryOperator::GreaterEqual,
            _ => return None,
        };
        Some(operator)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parentheses are not kept: a grouped expression is its inner expression
/// with a span widened over the parentheses.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer {
        value: i64,
        span: Span,
    },
    Float {
        value: f64,
        span: Span,
    },
    /// The bytes the literal denotes, escapes already applied.
    String {
        value: Vec<u8>,
        span: Span,
    },
    Null {
        span: Span,
    },
    Identifier {
        name: Ident,
        span: Span,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Call(CallExpr),
    /// Stands in for an expression that failed to parse. A diagnostic has
    /// always been recorded for it.
    Missing {
        span: Span,
    },
}

impl Expr {
    pub fn get_span(&self) -> Span {
        match self {
            Expr::Integer { span, .. }
            | Expr::Float { span, .. }
            | Expr::String { span, .. }
            | Expr::Null { span }
            | Expr::Identifier { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Missing { span } => *span,
            Expr::Call(call) => call.span,
        }
    }

    pub(crate) fn set_span(&mut self, new_span: Span) {
        match self {
            Expr::Integer { span, .. }
            | Expr::Float { span, .. }
            | Expr::String { span, .. }
            | Expr::Null { span }
            | Expr::Identifier { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Missing { span } => *span = new_span,
            Expr::Call(call) => call.span = new_span,
        }
    }

    /// Whether this expression or any sub-expression is a placeholder.
    pub fn contains_placeholder(&self) -> bool {
        match self {
            Expr::Missing { .. } => true,
            Expr::Binary { left, right, .. } => {
                left.contains_placeholder() || right.contains_placeholder()
            }
            Expr::Call(call) => call.arguments.iter().any(Expr::contains_placeholder),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Callee,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    User { name: Ident, span: Span },
    Builtin(BuiltinRef),
}

impl Callee {
    pub fn name(&self) -> &str {
        match self {
            Callee::User { name, .. } => &**name,
            Callee::Builtin(builtin) => &*builtin.name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Callee::Builtin(_))
    }
}

/// A dotted `namespace.name` callee. `arity` is taken from the built-in
/// manifest and is `None` when the name is not in it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinRef {
    pub namespace: Ident,
    pub name: Ident,
    pub arity: Option<usize>,
    pub span: Span,
}

impl BuiltinRef {
    pub fn is_recognized(&self) -> bool {
        self.arity.is_some()
    }
}
