use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    config::StringBytes,
    errors::errors::{Diagnostic, DiagnosticKind},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Called with the length of the match at the current position. Returns
/// `None` for input that produces no token (whitespace, comments).
pub type RegexHandler = fn(&mut Lexer, usize) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    /// Tried in order, first match wins. Every regex is anchored at the
    /// current position.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"\A\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"\A//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"\A[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"\A[a-zA-Z][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"\A_[a-zA-Z0-9_]*").unwrap(), handler: underscore_handler },
        RegexPattern { regex: Regex::new(r#"\A"(?:[^"\\\n]|\\[^\n])*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r#"\A"[^\n]*"#).unwrap(), handler: unterminated_string_handler },
        RegexPattern { regex: Regex::new(r"\A\[\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slice) },
        RegexPattern { regex: Regex::new(r"\A==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals) },
        RegexPattern { regex: Regex::new(r"\A!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals) },
        RegexPattern { regex: Regex::new(r"\A<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals) },
        RegexPattern { regex: Regex::new(r"\A>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals) },
        RegexPattern { regex: Regex::new(r"\A=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment) },
        RegexPattern { regex: Regex::new(r"\A<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less) },
        RegexPattern { regex: Regex::new(r"\A>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater) },
        RegexPattern { regex: Regex::new(r"\A\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus) },
        RegexPattern { regex: Regex::new(r"\A-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash) },
        RegexPattern { regex: Regex::new(r"\A\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star) },
        RegexPattern { regex: Regex::new(r"\A/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash) },
        RegexPattern { regex: Regex::new(r"\A\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen) },
        RegexPattern { regex: Regex::new(r"\A\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen) },
        RegexPattern { regex: Regex::new(r"\A\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly) },
        RegexPattern { regex: Regex::new(r"\A\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly) },
        RegexPattern { regex: Regex::new(r"\A\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot) },
        RegexPattern { regex: Regex::new(r"\A,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma) },
        RegexPattern { regex: Regex::new(r"\A:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon) },
        RegexPattern { regex: Regex::new(r"\A;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon) },
        RegexPattern { regex: Regex::new(r"\A\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe) },
        RegexPattern { regex: Regex::new(r"\A\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question) },
        RegexPattern { regex: Regex::new(r"\A@").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::At) },
    ];

    static ref INTEGER_LITERAL: Regex = Regex::new(r"\A(0|[1-9][0-9]*)\z").unwrap();
    static ref FLOAT_LITERAL: Regex =
        Regex::new(r"\A(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?\z").unwrap();
}

/// On-demand scanner. Tokens are produced one at a time by
/// [`Lexer::next_token`]; problems are collected as diagnostics and the
/// offending input comes out as an [`TokenKind::Invalid`] token.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    string_bytes: StringBytes,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 1,
            string_bytes: StringBytes::default(),
            diagnostics: vec![],
        }
    }

    pub fn with_string_bytes(mut self, string_bytes: StringBytes) -> Self {
        self.string_bytes = string_bytes;
        self
    }

    /// Scans the next token. Once the input is exhausted every call returns
    /// an `EOF` token at the end position.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.at_eof() {
                return MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::point(self.position()));
            }

            let remainder = self.remainder();
            let matched = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|found| (pattern.handler, found.end()))
            });

            let token = match matched {
                Some((handler, len)) => handler(self, len),
                None => Some(self.unrecognised()),
            };

            if let Some(token) = token {
                trace!(kind = ?token.kind, value = %token.value, at = %token.span.start, "token");
                return token;
            }
        }
    }

    /// Emits a token of `kind` covering the next `len` bytes and moves past it.
    pub fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.position();
        let value = self.remainder()[..len].to_string();
        self.advance_n(len);
        MK_TOKEN!(kind, value, Span::new(start, self.position()))
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column)
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Hands over the diagnostics collected since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    fn report(&mut self, kind: DiagnosticKind, span: Span) {
        debug!(error = %kind, at = %span.start, "lexical error");
        self.diagnostics.push(Diagnostic::new(kind, span));
    }

    fn unrecognised(&mut self) -> Token {
        let len = self.remainder().chars().next().map_or(1, char::len_utf8);
        let token = self.emit(TokenKind::Invalid, len);
        self.report(
            DiagnosticKind::UnrecognisedToken {
                token: token.value.clone(),
            },
            token.span,
        );
        token
    }
}

fn skip_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    lexer.advance_n(len);
    None
}

/// Matches permissively, then checks the lexeme against the exact literal
/// forms so `1.`, `1e` and `007` come out as one malformed token.
fn number_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    let kind = classify_number(&lexer.remainder()[..len]);
    match kind {
        Some(kind) => Some(lexer.emit(kind, len)),
        None => {
            let token = lexer.emit(TokenKind::Invalid, len);
            lexer.report(
                DiagnosticKind::MalformedNumber {
                    token: token.value.clone(),
                },
                token.span,
            );
            Some(token)
        }
    }
}

fn classify_number(lexeme: &str) -> Option<TokenKind> {
    if INTEGER_LITERAL.is_match(lexeme) {
        Some(TokenKind::Integer)
    } else if FLOAT_LITERAL.is_match(lexeme) {
        Some(TokenKind::Float)
    } else {
        None
    }
}

fn symbol_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    let kind = RESERVED_LOOKUP
        .get(&lexer.remainder()[..len])
        .copied()
        .unwrap_or(TokenKind::Identifier);
    Some(lexer.emit(kind, len))
}

/// A lone `_` is the discard target. Identifiers cannot start with `_`.
fn underscore_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    if len == 1 {
        return Some(lexer.emit(TokenKind::Underscore, len));
    }

    let token = lexer.emit(TokenKind::Invalid, len);
    lexer.report(
        DiagnosticKind::UnrecognisedToken {
            token: token.value.clone(),
        },
        token.span,
    );
    Some(token)
}

/// The token keeps the literal text between the quotes. Its bytes come from
/// [`decode_string`].
fn string_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    let mut token = lexer.emit(TokenKind::String, len);
    let body = token.value[1..len - 1].to_string();

    let (_, mut problems) = decode_string(&body);
    if lexer.string_bytes == StringBytes::Printable {
        problems.extend(
            body.bytes()
                .filter(|byte| *byte < 0x20 || *byte == 0x7f)
                .map(|byte| DiagnosticKind::InvalidStringByte { byte }),
        );
    }

    for problem in problems {
        lexer.report(problem, token.span);
    }

    token.value = body;
    Some(token)
}

/// Decodes the text between the quotes of a string literal into the bytes it
/// denotes. `\xHH` yields the single byte `HH`. Escapes that cannot be
/// decoded are returned as problems and contribute no bytes.
pub fn decode_string(body: &str) -> (Vec<u8>, Vec<DiagnosticKind>) {
    let mut bytes = Vec::with_capacity(body.len());
    let mut problems = vec![];
    let mut chars = body.chars().peekable();
    let mut utf8 = [0u8; 4];

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            bytes.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            continue;
        }

        // The pattern guarantees a character after every backslash
        let Some(escaped) = chars.next() else {
            break;
        };

        match escaped {
            'n' => bytes.push(b'\n'),
            't' => bytes.push(b'\t'),
            'r' => bytes.push(b'\r'),
            '\\' => bytes.push(b'\\'),
            '"' => bytes.push(b'"'),
            'x' => {
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => bytes.push(byte),
                    _ => problems.push(DiagnosticKind::InvalidEscape {
                        sequence: format!("x{}", hex),
                    }),
                }
            }
            other => problems.push(DiagnosticKind::InvalidEscape {
                sequence: other.to_string(),
            }),
        }
    }

    (bytes, problems)
}

/// An opening quote with no closing quote before the end of the line.
fn unterminated_string_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    let token = lexer.emit(TokenKind::Invalid, len);
    lexer.report(DiagnosticKind::UnterminatedString, token.span);
    Some(token)
}

/// Scans the whole input, `EOF` token included.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    tokenize_with(source, StringBytes::default())
}

pub fn tokenize_with(source: &str, string_bytes: StringBytes) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source).with_string_bytes(string_bytes);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token();
        let done = token.is(TokenKind::EOF);
        tokens.push(token);
        if done {
            break;
        }
    }

    (tokens, lexer.take_diagnostics())
}
