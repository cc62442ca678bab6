//! Type references as written in declarations.
//!
//! A type reference is a base type with an optional leading `?` that makes it
//! nullable. The parser only validates the shape (`void` placement); whether a
//! named type exists is decided later.

use std::fmt::Display;

use crate::Span;

use super::ast::Ident;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeBase {
    Void,
    U8,
    I32,
    F64,
    /// `[]u8`
    ByteSlice,
    Named(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub nullable: bool,
    pub base: TypeBase,
    pub span: Span,
}

impl TypeRef {
    pub fn new(nullable: bool, base: TypeBase) -> Self {
        TypeRef {
            nullable,
            base,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_void(&self) -> bool {
        self.base == TypeBase::Void
    }

    /// Variables, constants and parameters cannot hold `void`.
    pub fn is_valid_value_type(&self) -> bool {
        !self.is_void()
    }

    /// Functions may return `void`, but not `?void`.
    pub fn is_valid_return_type(&self) -> bool {
        !(self.is_void() && self.nullable)
    }
}

impl Display for TypeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeBase::Void => write!(f, "void"),
            TypeBase::U8 => write!(f, "u8"),
            TypeBase::I32 => write!(f, "i32"),
            TypeBase::F64 => write!(f, "f64"),
            TypeBase::ByteSlice => write!(f, "[]u8"),
            TypeBase::Named(name) => write!(f, "{}", name),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            write!(f, "?")?;
        }
        write!(f, "{}", self.base)
    }
}
