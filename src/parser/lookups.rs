use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first. Relational operators only take part in
/// ordinary expressions when the configuration enables them, and then bind
/// looser than `+` and `-`.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Relational,
    Additive,
    Multiplicative,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Diagnostic>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Diagnostic>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Diagnostic>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Relational
    if parser.config().relational_in_expressions {
        parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
        parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
        parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
        parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
        parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
        parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);
    }

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_integer_expr);
    parser.nud(TokenKind::Float, parse_float_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Null, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_symbol_or_call_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Invalid, parse_invalid_expr);

    // Statements
    parser.stmt(TokenKind::Const, parse_var_decl_stmt);
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::Underscore, parse_discard_stmt);
    parser.stmt(TokenKind::Invalid, parse_invalid_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
