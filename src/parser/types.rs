//! Type parsing implementation.
//!
//! A type reference is an optional `?` followed by one base type:
//!
//! - The primitive keywords `i32`, `f64`, `u8` and `void`
//! - The byte slice `[]u8`
//! - A user type name, when the configuration allows them
//!
//! Like expressions, base types are dispatched through a NUD table.

use std::collections::HashMap;

use crate::{
    ast::types::{TypeBase, TypeRef},
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeBase, Diagnostic>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::I32, parse_primitive_type);
    parser.type_nud(TokenKind::F64, parse_primitive_type);
    parser.type_nud(TokenKind::U8, parse_primitive_type);
    parser.type_nud(TokenKind::Void, parse_primitive_type);
    parser.type_nud(TokenKind::Slice, parse_slice_type);
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
}

/// `?` is checked explicitly, one token, no backtracking.
pub fn parse_type(parser: &mut Parser) -> Result<TypeRef, Diagnostic> {
    let start = parser.current_token().span.start;

    let nullable = parser.current_token_kind() == TokenKind::Question;
    if nullable {
        parser.advance();
    }

    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("type"));
    };

    let base = nud(parser)?;
    Ok(TypeRef::new(nullable, base).with_span(parser.span_from(start)))
}

/// Type of a variable, constant or parameter, where `void` is not allowed.
pub fn parse_value_type(parser: &mut Parser) -> Result<TypeRef, Diagnostic> {
    let ty = parse_type(parser)?;
    if !ty.is_valid_value_type() {
        parser.report_at(DiagnosticKind::InvalidVoidUsage, ty.span);
    }
    Ok(ty)
}

/// Function return type, where `void` is allowed but `?void` is not.
pub fn parse_return_type(parser: &mut Parser) -> Result<TypeRef, Diagnostic> {
    let ty = parse_type(parser)?;
    if !ty.is_valid_return_type() {
        parser.report_at(DiagnosticKind::InvalidVoidUsage, ty.span);
    }
    Ok(ty)
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<TypeBase, Diagnostic> {
    let token = parser.advance();
    match token.kind {
        TokenKind::I32 => Ok(TypeBase::I32),
        TokenKind::F64 => Ok(TypeBase::F64),
        TokenKind::U8 => Ok(TypeBase::U8),
        TokenKind::Void => Ok(TypeBase::Void),
        _ => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("type"),
                found: token.value,
            },
            token.span,
        )),
    }
}

/// `[]u8`, the only slice type.
pub fn parse_slice_type(parser: &mut Parser) -> Result<TypeBase, Diagnostic> {
    parser.advance();
    parser.expect(TokenKind::U8)?;
    Ok(TypeBase::ByteSlice)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeBase, Diagnostic> {
    let token = parser.expect(TokenKind::Identifier)?;
    if !parser.config().user_defined_types {
        parser.report_at(
            DiagnosticKind::UserTypeNotAllowed {
                name: token.value.clone(),
            },
            token.span,
        );
    }
    Ok(TypeBase::Named(parser.intern(&token.value)))
}
