use tracing::trace;

use crate::{
    ast::expressions::{BinaryOperator, BuiltinRef, CallExpr, Callee, Expr},
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::decode_string,
        tokens::{Token, TokenKind},
    },
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Precedence climbing over the NUD/LED tables. Only operators binding
/// tighter than `bp` are folded into the result.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.enter()?;
    let result = parse_expr_inner(parser, bp);
    parser.leave();
    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Ok(missing_expr(parser));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

/// Records that an expression was required here and stands in a placeholder.
/// Nothing is consumed, the caller's delimiters still line up.
fn missing_expr(parser: &mut Parser) -> Expr {
    let token = parser.current_token();
    let span = token.span;
    let kind = match token.kind {
        TokenKind::EOF => DiagnosticKind::UnexpectedEof {
            expected: String::from("expression"),
        },
        _ => DiagnosticKind::ExpectedExpression {
            found: token.value.clone(),
        },
    };

    parser.report_at(kind, span);
    Expr::Missing {
        span: Span::point(span.start),
    }
}

pub fn parse_integer_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance();
    match token.value.parse::<i64>() {
        Ok(value) => Ok(Expr::Integer {
            value,
            span: token.span,
        }),
        Err(_) => Ok(malformed_number(parser, token)),
    }
}

pub fn parse_float_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance();
    match token.value.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Expr::Float {
            value,
            span: token.span,
        }),
        _ => Ok(malformed_number(parser, token)),
    }
}

/// A literal the scanner accepted but that has no value in range.
fn malformed_number(parser: &mut Parser, token: Token) -> Expr {
    parser.report_at(
        DiagnosticKind::MalformedNumber {
            token: token.value.clone(),
        },
        token.span,
    );
    Expr::Missing { span: token.span }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    match parser.current_token_kind() {
        TokenKind::String => {
            let token = parser.advance();
            // Bad escapes were reported while scanning
            let (value, _) = decode_string(&token.value);
            Ok(Expr::String {
                value,
                span: token.span,
            })
        }
        TokenKind::Null => Ok(Expr::Null {
            span: parser.advance().span,
        }),
        _ => Err(parser.unexpected("literal")),
    }
}

/// `name`, `name(args)` or `namespace.name(args)`.
pub fn parse_symbol_or_call_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance();

    match parser.current_token_kind() {
        TokenKind::OpenParen | TokenKind::Dot => Ok(Expr::Call(parse_call(parser, token)?)),
        _ => Ok(Expr::Identifier {
            name: parser.intern(&token.value),
            span: token.span,
        }),
    }
}

/// Parses the rest of a call whose first identifier has been consumed.
pub fn parse_call(parser: &mut Parser, first: Token) -> Result<CallExpr, Diagnostic> {
    let callee = if parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        let name = parser.expect(TokenKind::Identifier)?;
        Callee::Builtin(resolve_builtin(parser, &first, &name))
    } else {
        Callee::User {
            name: parser.intern(&first.value),
            span: first.span,
        }
    };

    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseParen | TokenKind::EOF
    ) {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect_or_recover(TokenKind::CloseParen);
    trace!(callee = callee.name(), arguments = arguments.len(), "call");

    Ok(CallExpr {
        callee,
        arguments,
        span: parser.span_from(first.span.start),
    })
}

/// Looks a dotted callee up in the built-in manifest. Unknown names are
/// reported but still produce a callee so the call keeps its arguments.
fn resolve_builtin(parser: &mut Parser, namespace: &Token, name: &Token) -> BuiltinRef {
    let span = namespace.span.to(name.span);
    let builtins = &parser.config().builtins;
    let known_namespace = builtins.is_namespace(&namespace.value);
    let mut arity = builtins.get(&name.value).map(|signature| signature.arity());

    if !known_namespace {
        arity = None;
        parser.report_at(
            DiagnosticKind::UnknownNamespace {
                name: namespace.value.clone(),
            },
            namespace.span,
        );
    } else if arity.is_none() {
        parser.report_at(
            DiagnosticKind::UnknownBuiltin {
                namespace: namespace.value.clone(),
                name: name.value.clone(),
            },
            span,
        );
    }

    BuiltinRef {
        namespace: parser.intern(&namespace.value),
        name: parser.intern(&name.value),
        arity,
        span,
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Diagnostic> {
    let operator_token = parser.advance();
    let Some(operator) = BinaryOperator::from_token(operator_token.kind) else {
        return Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected: String::from("binary operator"),
                found: operator_token.value,
            },
            operator_token.span,
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary {
        span: left.get_span().to(right.get_span()),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Parentheses only group. The inner expression is returned with its span
/// widened over them.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let open = parser.advance();
    let mut expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect_or_recover(TokenKind::CloseParen);

    expr.set_span(parser.span_from(open.span.start));
    Ok(expr)
}

/// The scanner has already reported the token.
pub fn parse_invalid_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance();
    Ok(Expr::Missing { span: token.span })
}
