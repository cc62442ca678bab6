use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use crate::{
    ast::{
        ast::{Decl, FnDecl, Param, Program, Prolog},
        statements::{
            AssignStmt, AssignTarget, Binding, Block, CallStmt, Comparison, ConditionHead, IfStmt,
            ReturnStmt, Stmt, VarDecl, WhileStmt,
        },
        expressions::BinaryOperator,
    },
    config::BindingPolicy,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::decode_string,
        tokens::{Token, TokenKind},
    },
    parser::{expr::parse_expr, lookups::BindingPower},
    Position, Span,
};

use super::{
    expr::parse_call,
    parser::{Parser, RecoveryScope},
    types::{parse_return_type, parse_value_type},
};

/// Module path the prolog is expected to import.
pub const PROLOG_PATH: &str = "ifj24.zig";

/// Top level: the prolog and any number of function, constant and variable
/// declarations, up to the end of input.
#[instrument(skip_all)]
pub fn parse_program(parser: &mut Parser) -> Program {
    let mut prolog: Option<Prolog> = None;
    let mut declarations = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => break,
            // Already reported by the scanner
            TokenKind::Invalid => {
                parser.advance();
                continue;
            }
            _ => {}
        }

        let start = parser.current_token().span.start;
        let before = parser.consumed();

        match parse_decl(parser, &mut prolog) {
            Ok(Some(decl)) => declarations.push(decl),
            Ok(None) => {}
            Err(diagnostic) => {
                parser.report(diagnostic);
                parser.synchronize(RecoveryScope::TopLevel);
                if parser.consumed() == before {
                    parser.advance();
                }
                declarations.push(Decl::Invalid {
                    span: parser.span_from(start),
                });
            }
        }
    }

    if prolog.is_none() && parser.config().require_prolog {
        parser.report_at(DiagnosticKind::MissingImport, Span::point(Position::start()));
    }

    let end = parser.current_token().span.end;
    Program {
        prolog,
        declarations,
        span: Span::new(Position::start(), end),
    }
}

fn parse_decl(parser: &mut Parser, prolog: &mut Option<Prolog>) -> Result<Option<Decl>, Diagnostic> {
    match parser.current_token_kind() {
        TokenKind::Pub | TokenKind::Fn => Ok(Some(Decl::Function(parse_fn_decl(parser)?))),
        TokenKind::Const => parse_const_or_prolog(parser, prolog),
        TokenKind::Var => Ok(Some(Decl::Variable(parse_var_decl(parser)?))),
        _ => Err(parser.unexpected("declaration")),
    }
}

/// `const <name>` starts a constant, or the prolog when `= @` follows.
fn parse_const_or_prolog(
    parser: &mut Parser,
    prolog: &mut Option<Prolog>,
) -> Result<Option<Decl>, Diagnostic> {
    let keyword = parser.advance();
    let identifier = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() == TokenKind::Assignment
        && parser.peek_next_kind() == TokenKind::At
    {
        let parsed = parse_prolog_rest(parser, keyword.span.start, identifier)?;
        if prolog.is_some() {
            parser.report_at(DiagnosticKind::DuplicateImport, parsed.span);
        } else {
            *prolog = Some(parsed);
        }
        return Ok(None);
    }

    let decl = parse_var_decl_rest(parser, keyword, identifier)?;
    Ok(Some(Decl::Variable(decl)))
}

/// `= @import("ifj24.zig");` after `const <binding>`.
fn parse_prolog_rest(
    parser: &mut Parser,
    start: Position,
    binding: Token,
) -> Result<Prolog, Diagnostic> {
    parser.expect(TokenKind::Assignment)?;
    parser.expect(TokenKind::At)?;

    if parser.current_token().value != "import" {
        return Err(parser.unexpected("`import`"));
    }
    parser.advance();

    parser.expect(TokenKind::OpenParen)?;
    let path_token = parser.expect(TokenKind::String)?;
    parser.expect_or_recover(TokenKind::CloseParen);
    parser.expect_or_recover(TokenKind::Semicolon);

    let (bytes, _) = decode_string(&path_token.value);
    let path = String::from_utf8_lossy(&bytes).into_owned();
    if path != PROLOG_PATH {
        parser.report(Diagnostic::warning(
            DiagnosticKind::UnexpectedImportPath { path: path.clone() },
            path_token.span,
        ));
    }

    Ok(Prolog {
        binding: parser.intern(&binding.value),
        path,
        span: parser.span_from(start),
    })
}

/// `pub fn name(params) type { ... }`. A missing `pub` is reported and the
/// function is parsed anyway.
#[instrument(skip_all)]
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FnDecl, Diagnostic> {
    let start = parser.current_token().span.start;

    let is_public = parser.current_token_kind() == TokenKind::Pub;
    if is_public {
        parser.advance();
    }

    let fn_token = parser.expect(TokenKind::Fn)?;
    let name = parser.expect(TokenKind::Identifier)?;
    debug!(name = %name.value, "function");

    if !is_public {
        parser.report_at(
            DiagnosticKind::MissingVisibility {
                function: name.value.clone(),
            },
            fn_token.span,
        );
    }

    let parameters = parse_parameters(parser)?;
    let return_type = parse_return_type(parser)?;
    let body = parse_block(parser)?;

    Ok(FnDecl {
        name: parser.intern(&name.value),
        is_public,
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    })
}

/// `( name: type, ... )`, trailing comma allowed. A repeated name is reported
/// and only its first declaration is kept.
fn parse_parameters(parser: &mut Parser) -> Result<Vec<Param>, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    let mut seen = HashSet::new();

    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseParen | TokenKind::EOF
    ) {
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_value_type(parser)?;

        if seen.insert(name.value.clone()) {
            parameters.push(Param {
                name: parser.intern(&name.value),
                ty,
                span: parser.span_from(name.span.start),
            });
        } else {
            parser.report_at(
                DiagnosticKind::DuplicateParameter { name: name.value },
                name.span,
            );
        }

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

/// `{ statements }`. A statement that fails is recorded, skipped, and
/// replaced by [`Stmt::Invalid`]; the block itself only fails when it cannot
/// be opened.
#[instrument(skip_all)]
pub fn parse_block(parser: &mut Parser) -> Result<Block, Diagnostic> {
    parser.enter()?;
    let start = match parser.expect(TokenKind::OpenCurly) {
        Ok(open) => open.span.start,
        Err(diagnostic) => {
            parser.leave();
            return Err(diagnostic);
        }
    };
    let id = parser.advance_id();
    trace!(id, "block");

    let mut body = vec![];
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => {
                parser.advance();
                break;
            }
            TokenKind::EOF => {
                let diagnostic = parser.unexpected(TokenKind::CloseCurly.describe());
                parser.report(diagnostic);
                break;
            }
            _ => {}
        }

        let stmt_start = parser.current_token().span.start;
        let before = parser.consumed();

        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(diagnostic) => {
                parser.report(diagnostic);
                parser.synchronize(RecoveryScope::Block);
                if parser.consumed() == before {
                    parser.advance();
                }
                body.push(Stmt::Invalid {
                    span: parser.span_from(stmt_start),
                });
            }
        }
    }

    parser.leave();
    Ok(Block {
        body,
        id,
        span: parser.span_from(start),
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token_kind = parser.current_token_kind();
    match parser.get_stmt_lookup().get(&token_kind).copied() {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected("statement")),
    }
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    Ok(Stmt::VarDecl(parse_var_decl(parser)?))
}

/// `const`/`var` name [`:` type] `=` expr `;`
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Diagnostic> {
    let keyword = parser.advance();
    let identifier = parser.expect(TokenKind::Identifier)?;
    parse_var_decl_rest(parser, keyword, identifier)
}

fn parse_var_decl_rest(
    parser: &mut Parser,
    keyword: Token,
    identifier: Token,
) -> Result<VarDecl, Diagnostic> {
    let is_constant = keyword.kind == TokenKind::Const;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_value_type(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assignment)?;
    let assigned_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_or_recover(TokenKind::Semicolon);

    Ok(VarDecl {
        identifier: parser.intern(&identifier.value),
        is_constant,
        explicit_type,
        assigned_value,
        span: parser.span_from(keyword.span.start),
    })
}

/// Statements led by an identifier: `x = expr;`, `f(args);` and
/// `ifj.write(args);`, told apart by the token after the identifier.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    match parser.peek_next_kind() {
        TokenKind::Assignment => {
            let name = parser.advance();
            let target = AssignTarget::Variable {
                name: parser.intern(&name.value),
                span: name.span,
            };
            parse_assignment_rest(parser, target, name.span.start)
        }
        TokenKind::OpenParen | TokenKind::Dot => {
            let first = parser.advance();
            let start = first.span.start;
            let call = parse_call(parser, first)?;
            parser.expect_or_recover(TokenKind::Semicolon);

            Ok(Stmt::Call(CallStmt {
                call,
                span: parser.span_from(start),
            }))
        }
        _ => {
            parser.advance();
            Err(parser.unexpected("`=` or `(`"))
        }
    }
}

/// `_ = expr;`
pub fn parse_discard_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let underscore = parser.advance();
    let target = AssignTarget::Discard {
        span: underscore.span,
    };
    parse_assignment_rest(parser, target, underscore.span.start)
}

fn parse_assignment_rest(
    parser: &mut Parser,
    target: AssignTarget,
    start: Position,
) -> Result<Stmt, Diagnostic> {
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_or_recover(TokenKind::Semicolon);

    Ok(Stmt::Assignment(AssignStmt {
        target,
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let head = parse_condition_head(parser)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        head,
        then_body,
        else_body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let head = parse_condition_head(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        head,
        body,
        span: parser.span_from(start),
    }))
}

/// `( expr [relop expr] ) [|name|]`
fn parse_condition_head(parser: &mut Parser) -> Result<ConditionHead, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;

    let comparison = if parser.config().relational_tail
        && parser.current_token_kind().is_relational()
    {
        let operator_token = parser.advance();
        let right = parse_expr(parser, BindingPower::Default)?;
        BinaryOperator::from_token(operator_token.kind).map(|operator| Comparison { operator, right })
    } else {
        None
    };

    parser.expect_or_recover(TokenKind::CloseParen);

    let binding = if parser.current_token_kind() == TokenKind::Pipe {
        let start = parser.advance().span.start;
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Pipe)?;
        let span = parser.span_from(start);

        if parser.config().binding == BindingPolicy::Forbidden {
            parser.report_at(DiagnosticKind::BindingNotAllowed, span);
            None
        } else {
            Some(Binding {
                name: parser.intern(&name.value),
                span,
            })
        }
    } else {
        if parser.config().binding == BindingPolicy::Required {
            let at = Span::point(parser.previous_end());
            parser.report_at(DiagnosticKind::MissingBinding, at);
        }
        None
    };

    Ok(ConditionHead {
        condition,
        comparison,
        binding,
    })
}

/// `return [expr];`
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let value = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly => None,
        _ => Some(parse_expr(parser, BindingPower::Default)?),
    };
    parser.expect_or_recover(TokenKind::Semicolon);

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}

/// The scanner has already reported the token.
pub fn parse_invalid_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.advance();
    Ok(Stmt::Invalid { span: token.span })
}
