use std::sync::Arc;

use crate::Span;

use super::{
    statements::{Block, VarDecl},
    types::TypeRef,
};

/// Interned identifier text. Equal names parsed from one source unit share a
/// single allocation.
pub type Ident = Arc<str>;

/// Root of the tree for one source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub prolog: Option<Prolog>,
    pub declarations: Vec<Decl>,
    pub span: Span,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FnDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Decl::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &VarDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Decl::Variable(variable) => Some(variable),
            _ => None,
        })
    }

    pub fn find_function(&self, name: &str) -> Option<&FnDecl> {
        self.functions().find(|function| &*function.name == name)
    }
}

/// `const <binding> = @import("<path>");`
#[derive(Debug, Clone, PartialEq)]
pub struct Prolog {
    pub binding: Ident,
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function(FnDecl),
    Variable(VarDecl),
    /// A top-level region that could not be parsed into a declaration.
    Invalid { span: Span },
}

impl Decl {
    pub fn get_span(&self) -> Span {
        match self {
            Decl::Function(function) => function.span,
            Decl::Variable(variable) => variable.span,
            Decl::Invalid { span } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Ident,
    /// `false` only for a function written without `pub`, which has already
    /// been reported.
    pub is_public: bool,
    pub parameters: Vec<Param>,
    pub return_type: TypeRef,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeRef,
    pub span: Span,
}
