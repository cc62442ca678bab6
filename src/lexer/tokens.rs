use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("const", TokenKind::Const);
        map.insert("else", TokenKind::Else);
        map.insert("fn", TokenKind::Fn);
        map.insert("if", TokenKind::If);
        map.insert("i32", TokenKind::I32);
        map.insert("f64", TokenKind::F64);
        map.insert("u8", TokenKind::U8);
        map.insert("null", TokenKind::Null);
        map.insert("pub", TokenKind::Pub);
        map.insert("return", TokenKind::Return);
        map.insert("var", TokenKind::Var);
        map.insert("void", TokenKind::Void);
        map.insert("while", TokenKind::While);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// Placeholder for input the scanner could not classify. The scanner has
    /// already reported it.
    Invalid,

    Identifier,
    Integer,
    Float,
    String,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Slice, // []

    Dot,
    Comma,
    Colon,
    Semicolon,
    Pipe,
    Question,
    At,
    Underscore,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Plus,
    Dash,
    Star,
    Slash,

    // Reserved
    Const,
    Else,
    Fn,
    If,
    I32,
    F64,
    U8,
    Null,
    Pub,
    Return,
    Var,
    Void,
    While,
}

impl TokenKind {
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals
        )
    }

    /// How the token kind is named in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::EOF => "end of input",
            TokenKind::Invalid => "invalid token",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::String => "string literal",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::OpenCurly => "`{`",
            TokenKind::CloseCurly => "`}`",
            TokenKind::Slice => "`[]`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Pipe => "`|`",
            TokenKind::Question => "`?`",
            TokenKind::At => "`@`",
            TokenKind::Underscore => "`_`",
            TokenKind::Assignment => "`=`",
            TokenKind::Equals => "`==`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::Less => "`<`",
            TokenKind::LessEquals => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEquals => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Dash => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Const => "`const`",
            TokenKind::Else => "`else`",
            TokenKind::Fn => "`fn`",
            TokenKind::If => "`if`",
            TokenKind::I32 => "`i32`",
            TokenKind::F64 => "`f64`",
            TokenKind::U8 => "`u8`",
            TokenKind::Null => "`null`",
            TokenKind::Pub => "`pub`",
            TokenKind::Return => "`return`",
            TokenKind::Var => "`var`",
            TokenKind::Void => "`void`",
            TokenKind::While => "`while`",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A scanned token. `value` is the lexeme, except for string literals where it
/// holds the decoded contents; the raw text is always recoverable through
/// [`Token::lexeme`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of input"),
            TokenKind::String => write!(f, "\"{}\"", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
