//! Unit tests for diagnostics.

use crate::errors::errors::{Diagnostic, DiagnosticKind, ErrorCategory, ErrorTip, Severity};
use crate::{Position, Span};

fn span_at(offset: u32) -> Span {
    Span::point(Position::new(offset, 1, offset + 1))
}

#[test]
fn test_diagnostic_creation() {
    let error = Diagnostic::new(
        DiagnosticKind::UnrecognisedToken {
            token: "#".to_string(),
        },
        span_at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.severity(), Severity::Error);
    assert!(error.is_error());
}

#[test]
fn test_diagnostic_position() {
    let error = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            expected: "`;`".to_string(),
            found: "var".to_string(),
        },
        span_at(42),
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().column, 43);
}

#[test]
fn test_lexical_category() {
    for kind in [
        DiagnosticKind::UnterminatedString,
        DiagnosticKind::MalformedNumber {
            token: "1.".to_string(),
        },
        DiagnosticKind::InvalidEscape {
            sequence: "q".to_string(),
        },
    ] {
        let error = Diagnostic::new(kind, span_at(0));
        assert_eq!(error.category(), ErrorCategory::Lexical);
        assert_eq!(error.category().exit_code(), 1);
    }
}

#[test]
fn test_syntax_category() {
    let error = Diagnostic::new(
        DiagnosticKind::DuplicateParameter {
            name: "a".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.category(), ErrorCategory::Syntax);
    assert_eq!(error.category().exit_code(), 2);
}

#[test]
fn test_expected_found() {
    let error = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            expected: "`)`".to_string(),
            found: ";".to_string(),
        },
        span_at(0),
    );
    assert_eq!(error.expected_found(), Some(("`)`", ";")));

    let error = Diagnostic::new(
        DiagnosticKind::UnexpectedEof {
            expected: "`}`".to_string(),
        },
        span_at(0),
    );
    assert_eq!(error.expected_found(), Some(("`}`", "end of input")));

    let error = Diagnostic::new(DiagnosticKind::InvalidVoidUsage, span_at(0));
    assert_eq!(error.expected_found(), None);
}

#[test]
fn test_warning_is_not_error() {
    let warning = Diagnostic::warning(
        DiagnosticKind::UnexpectedImportPath {
            path: "std.zig".to_string(),
        },
        span_at(0),
    );

    assert_eq!(warning.severity(), Severity::Warning);
    assert!(!warning.is_error());
}

#[test]
fn test_error_tip_none() {
    let error = Diagnostic::new(
        DiagnosticKind::UnrecognisedToken {
            token: "#".to_string(),
        },
        span_at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Diagnostic::new(
        DiagnosticKind::UnknownBuiltin {
            namespace: "ifj".to_string(),
            name: "bogus".to_string(),
        },
        span_at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("ifj.bogus")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostic_display() {
    let error = Diagnostic::new(
        DiagnosticKind::NestingTooDeep { limit: 8 },
        Span::point(Position::new(7, 2, 3)),
    );

    assert_eq!(error.to_string(), "2:3: nesting too deep (limit 8)");
}
