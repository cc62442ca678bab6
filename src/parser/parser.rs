//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry points.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! Errors never stop the parse. They are recorded in the parser's diagnostic
//! list and the parser skips ahead to a point where it can resume.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::{
    ast::ast::{Ident, Program},
    config::ParserConfig,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    cursor::TokenCursor,
    interner::Interner,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_program,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Where panic-mode recovery is allowed to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryScope {
    TopLevel,
    Block,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    cursor: TokenCursor,
    config: ParserConfig,
    diagnostics: Vec<Diagnostic>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    interner: Interner,
    /// Counter for block ids
    current_id: u32,
    depth: usize,
    /// Running out of input is reported once, by whichever construct notices
    /// it first.
    eof_reported: bool,
}

impl Parser {
    pub fn new(lexer: Lexer, config: ParserConfig) -> Self {
        Parser {
            cursor: TokenCursor::new(lexer),
            config,
            diagnostics: vec![],
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            interner: Interner::new(),
            current_id: 1,
            depth: 0,
            eof_reported: false,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.cursor.current()
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.cursor.current().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_next_kind(&mut self) -> TokenKind {
        self.cursor.peek_next().kind
    }

    /// Advances to the next token and returns the consumed one.
    pub fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    pub fn consumed(&self) -> usize {
        self.cursor.consumed()
    }

    /// End of the last consumed token.
    pub fn previous_end(&self) -> Position {
        self.cursor.previous_end()
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous_end())
    }

    /// Consumes the current token if it is of `expected_kind`, otherwise
    /// fails without consuming anything.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.current_token_kind() == expected_kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected_kind.describe()))
        }
    }

    /// Like [`Parser::expect`], but a missing token is only recorded and
    /// parsing carries on as if it had been there. At the end of input the
    /// diagnostic is an `UnexpectedEof` on the end marker.
    pub fn expect_or_recover(&mut self, expected_kind: TokenKind) -> Option<Token> {
        match self.current_token_kind() {
            kind if kind == expected_kind => return Some(self.advance()),
            TokenKind::EOF => {
                let diagnostic = self.unexpected(expected_kind.describe());
                self.report(diagnostic);
                return None;
            }
            _ => {}
        }

        let found = self.current_token().to_string();
        let at = Span::point(self.previous_end());
        self.report(Diagnostic::new(
            DiagnosticKind::MissingDelimiter {
                delimiter: expected_kind.describe().to_string(),
                found,
            },
            at,
        ));
        None
    }

    /// Diagnostic for the current token not being `expected`.
    pub fn unexpected(&self, expected: &str) -> Diagnostic {
        let token = self.current_token();
        let kind = match token.kind {
            TokenKind::EOF => DiagnosticKind::UnexpectedEof {
                expected: expected.to_string(),
            },
            _ => DiagnosticKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.value.clone(),
            },
        };
        Diagnostic::new(kind, token.span)
    }

    /// Records a diagnostic. Lexical problems found while scanning up to the
    /// current token are recorded first.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.drain_lexer();
        if matches!(diagnostic.kind(), DiagnosticKind::UnexpectedEof { .. }) {
            if self.eof_reported {
                debug!(error = %diagnostic.kind(), "end of input already reported");
                return;
            }
            self.eof_reported = true;
        }
        debug!(
            error = %diagnostic.kind(),
            at = %diagnostic.get_position(),
            severity = ?diagnostic.severity(),
            "diagnostic recorded"
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn report_at(&mut self, kind: DiagnosticKind, span: Span) {
        self.report(Diagnostic::new(kind, span));
    }

    fn drain_lexer(&mut self) {
        let lexical = self.cursor.take_lexer_diagnostics();
        self.diagnostics.extend(lexical);
    }

    /// Panic-mode recovery: discards tokens until the next `;` (consumed), a
    /// balanced `{ ... }` group (consumed), or a token that starts a new
    /// declaration or statement in `scope` (not consumed).
    pub fn synchronize(&mut self, scope: RecoveryScope) {
        let mut depth = 0usize;
        let start = self.consumed();

        loop {
            let kind = self.current_token_kind();
            match kind {
                TokenKind::EOF => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::OpenCurly => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::CloseCurly if depth == 0 => {
                    if scope == RecoveryScope::Block {
                        break;
                    }
                    self.advance();
                }
                TokenKind::CloseCurly => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                _ if depth == 0 && starts_construct(kind, scope) && self.consumed() > start => {
                    break
                }
                _ => {
                    self.advance();
                }
            }
        }

        debug!(skipped = self.consumed() - start, ?scope, "recovered");
    }

    /// Entering a nested expression or block.
    pub fn enter(&mut self) -> Result<(), Diagnostic> {
        if self.depth >= self.config.max_depth {
            return Err(Diagnostic::new(
                DiagnosticKind::NestingTooDeep {
                    limit: self.config.max_depth,
                },
                self.current_token().span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn intern(&mut self, name: &str) -> Ident {
        self.interner.intern(name)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Advances the block id counter and returns the previous value.
    pub fn advance_id(&mut self) -> u32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Collects every diagnostic in source order.
    fn finish(mut self) -> Vec<Diagnostic> {
        self.drain_lexer();
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|diagnostic| diagnostic.get_position().offset);
        diagnostics
    }
}

fn starts_construct(kind: TokenKind, scope: RecoveryScope) -> bool {
    match scope {
        RecoveryScope::TopLevel => matches!(
            kind,
            TokenKind::Pub | TokenKind::Fn | TokenKind::Const | TokenKind::Var
        ),
        RecoveryScope::Block => matches!(
            kind,
            TokenKind::Const
                | TokenKind::Var
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
        ),
    }
}

/// Result of parsing one source unit. A tree is always produced; it is only
/// trustworthy when [`ParseOutput::is_success`] holds.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| !diagnostic.is_error())
    }

    /// Exit status for a driver: 0 on success, otherwise the code of the
    /// first error's category.
    pub fn exit_code(&self) -> i32 {
        self.errors()
            .next()
            .map_or(0, |error| error.category().exit_code())
    }
}

/// Parses `source` with the default configuration.
pub fn parse(source: &str) -> ParseOutput {
    parse_with(source, &ParserConfig::default())
}

/// Parses one source unit into a [`Program`] and the diagnostics found along
/// the way.
#[instrument(skip_all, fields(len = source.len()))]
pub fn parse_with(source: &str, config: &ParserConfig) -> ParseOutput {
    let lexer = Lexer::new(source).with_string_bytes(config.string_bytes);
    let mut parser = Parser::new(lexer, config.clone());
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let program = parse_program(&mut parser);
    let diagnostics = parser.finish();

    debug!(diagnostics = diagnostics.len(), "parse finished");
    ParseOutput {
        program,
        diagnostics,
    }
}
