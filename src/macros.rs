//! Shorthands used by the scanner's pattern table.

/// Builds a [`Token`](crate::lexer::tokens::Token) from its three fields.
///
/// ```ignore
/// let eof = MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::point(position));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Handler for a pattern that always yields one fixed token kind: the whole
/// match becomes the token.
///
/// ```ignore
/// RegexPattern { regex: Regex::new(r"\A\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe) }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut Lexer, len: usize| Some(lexer.emit($kind, len))
    };
}
