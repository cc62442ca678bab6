//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, numeric and string literals, operators,
//! comments, position tracking, and the lexical error cases.

use crate::{config::StringBytes, errors::errors::DiagnosticKind, Position};

use super::{
    lexer::{decode_string, tokenize, tokenize_with, Lexer},
    tokens::{Token, TokenKind},
};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let (tokens, diagnostics) =
        tokenize("const else fn if i32 f64 u8 null pub return var void while");

    assert!(diagnostics.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Const,
            TokenKind::Else,
            TokenKind::Fn,
            TokenKind::If,
            TokenKind::I32,
            TokenKind::F64,
            TokenKind::U8,
            TokenKind::Null,
            TokenKind::Pub,
            TokenKind::Return,
            TokenKind::Var,
            TokenKind::Void,
            TokenKind::While,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let (tokens, diagnostics) = tokenize("foo baz_123 CamelCase constant whiles");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "CamelCase");
    // longest match first, then the keyword check
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "constant");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_underscore() {
    let (tokens, diagnostics) = tokenize("_ = x;");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Underscore);
    assert_eq!(tokens[1].kind, TokenKind::Assignment);
}

#[test]
fn test_leading_underscore_identifier_is_rejected() {
    let (tokens, diagnostics) = tokenize("_hidden");

    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::UnrecognisedToken {
            token: String::from("_hidden")
        }
    );
}

#[test]
fn test_tokenize_numbers() {
    let (tokens, diagnostics) = tokenize("42 3.14 0 100.5 1e5 2E-3 1.5e+10");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[4].kind, TokenKind::Float);
    assert_eq!(tokens[5].kind, TokenKind::Float);
    assert_eq!(tokens[6].kind, TokenKind::Float);
    assert_eq!(tokens[6].value, "1.5e+10");
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_malformed_numbers() {
    for source in ["1.", "1e", "3.e4", "2e+", "007"] {
        let (tokens, diagnostics) = tokenize(source);

        assert_eq!(tokens.len(), 2, "{source}");
        assert_eq!(tokens[0].kind, TokenKind::Invalid, "{source}");
        assert_eq!(diagnostics.len(), 1, "{source}");
        assert_eq!(
            diagnostics[0].kind(),
            &DiagnosticKind::MalformedNumber {
                token: source.to_string()
            }
        );
    }
}

#[test]
fn test_number_followed_by_dot_call() {
    let (tokens, diagnostics) = tokenize("12.5.x");

    assert!(diagnostics.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Float, TokenKind::Dot, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_strings() {
    let (tokens, diagnostics) = tokenize(r#""hello" "" "with space""#);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "");
    assert_eq!(tokens[2].value, "with space");
}

#[test]
fn test_string_escapes() {
    let (tokens, diagnostics) = tokenize(r#""a\nb\t\"q\"\\\x41\x7a""#);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, r#"a\nb\t\"q\"\\\x41\x7a"#);
    assert_eq!(tokens[0].span.end.offset, 23);

    let (bytes, problems) = decode_string(&tokens[0].value);
    assert!(problems.is_empty());
    assert_eq!(bytes, b"a\nb\t\"q\"\\Az".to_vec());
}

#[test]
fn test_hex_escapes_are_single_bytes() {
    let (tokens, diagnostics) = tokenize(r#""\xff" "\x80\x00""#);
    assert!(diagnostics.is_empty());

    assert_eq!(decode_string(&tokens[0].value).0, vec![0xff]);
    assert_eq!(decode_string(&tokens[1].value).0, vec![0x80, 0x00]);
}

#[test]
fn test_utf8_text_keeps_its_bytes() {
    let (bytes, problems) = decode_string("é");

    assert!(problems.is_empty());
    assert_eq!(bytes, vec![0xc3, 0xa9]);
}

#[test]
fn test_invalid_escape_keeps_token() {
    let (tokens, diagnostics) = tokenize(r#""bad \q" x"#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::InvalidEscape {
            sequence: String::from("q")
        }
    );
}

#[test]
fn test_short_hex_escape() {
    let (_, diagnostics) = tokenize(r#""\x4""#);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::InvalidEscape {
            sequence: String::from("x4")
        }
    );
}

#[test]
fn test_unterminated_string() {
    let (tokens, diagnostics) = tokenize("\"never closed\nvar");

    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Invalid, TokenKind::Var, TokenKind::EOF]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), &DiagnosticKind::UnterminatedString);
}

#[test]
fn test_unterminated_string_at_end_of_input() {
    let (tokens, diagnostics) = tokenize("\"abc");

    assert_eq!(kinds(&tokens), vec![TokenKind::Invalid, TokenKind::EOF]);
    assert_eq!(diagnostics[0].kind(), &DiagnosticKind::UnterminatedString);
}

#[test]
fn test_raw_control_byte_in_string() {
    let source = "\"tab\there\"";

    let (_, diagnostics) = tokenize(source);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::InvalidStringByte { byte: 0x09 }
    );

    let (tokens, diagnostics) = tokenize_with(source, StringBytes::Any);
    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, "tab\there");
}

#[test]
fn test_tokenize_operators() {
    let (tokens, diagnostics) = tokenize("= == != < <= > >= + - * /");

    assert!(diagnostics.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_greedy_operators_without_spaces() {
    let (tokens, _) = tokenize("a<=b==c");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Identifier,
            TokenKind::Equals,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let (tokens, diagnostics) = tokenize("( ) { } [] . , : ; | ? @");

    assert!(diagnostics.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Slice,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Pipe,
            TokenKind::Question,
            TokenKind::At,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let (tokens, diagnostics) = tokenize("var x = 1; // comment ; ( \"\nx");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].span.start.line, 2);
}

#[test]
fn test_division_is_not_a_comment() {
    let (tokens, _) = tokenize("a / b");
    assert_eq!(tokens[1].kind, TokenKind::Slash);
}

#[test]
fn test_unrecognised_character() {
    let (tokens, diagnostics) = tokenize("var # x");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Var,
            TokenKind::Invalid,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_position(), &Position::new(4, 1, 5));
}

#[test]
fn test_unrecognised_multibyte_character() {
    let (tokens, diagnostics) = tokenize("é x");

    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(tokens[0].value, "é");
    assert_eq!(tokens[1].span.start, Position::new(3, 1, 3));
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_positions() {
    let (tokens, _) = tokenize("pub fn\n  main");

    assert_eq!(tokens[0].span.start, Position::new(0, 1, 1));
    assert_eq!(tokens[0].span.end, Position::new(3, 1, 4));
    assert_eq!(tokens[1].span.start, Position::new(4, 1, 5));
    assert_eq!(tokens[2].span.start, Position::new(9, 2, 3));
    assert_eq!(tokens[3].span.start, Position::new(13, 2, 7));
}

#[test]
fn test_next_token_after_end() {
    let mut lexer = Lexer::new("x");

    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    assert!(lexer.take_diagnostics().is_empty());
}

#[test]
fn test_empty_source() {
    let (tokens, diagnostics) = tokenize("");

    assert_eq!(kinds(&tokens), vec![TokenKind::EOF]);
    assert!(diagnostics.is_empty());
}
