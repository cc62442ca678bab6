use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

/// Exit status for failures that are not caused by the input program.
pub const EXIT_INTERNAL: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// Compilation phase a diagnostic belongs to. Later phases reserve their own
/// exit codes, so only the front-end ones live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

impl ErrorCategory {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::Lexical => 1,
            ErrorCategory::Syntax => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    severity: Severity,
    span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Error,
            span,
        }
    }

    pub fn warning(kind: DiagnosticKind, span: Span) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Warning,
            span,
        }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.kind {
            DiagnosticKind::UnrecognisedToken { .. }
            | DiagnosticKind::UnterminatedString
            | DiagnosticKind::InvalidEscape { .. }
            | DiagnosticKind::InvalidStringByte { .. }
            | DiagnosticKind::MalformedNumber { .. } => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }

    /// The `(expected, found)` pair for diagnostics that have one.
    pub fn expected_found(&self) -> Option<(&str, &str)> {
        match &self.kind {
            DiagnosticKind::UnexpectedToken { expected, found }
            | DiagnosticKind::MissingDelimiter {
                delimiter: expected,
                found,
            } => Some((expected.as_str(), found.as_str())),
            DiagnosticKind::UnexpectedEof { expected } => Some((expected.as_str(), "end of input")),
            DiagnosticKind::ExpectedExpression { found } => Some(("expression", found.as_str())),
            _ => None,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::UnrecognisedToken { .. } => "UnrecognisedToken",
            DiagnosticKind::UnterminatedString => "UnterminatedString",
            DiagnosticKind::InvalidEscape { .. } => "InvalidEscape",
            DiagnosticKind::InvalidStringByte { .. } => "InvalidStringByte",
            DiagnosticKind::MalformedNumber { .. } => "MalformedNumber",
            DiagnosticKind::UnexpectedToken { .. } => "UnexpectedToken",
            DiagnosticKind::UnexpectedEof { .. } => "UnexpectedEof",
            DiagnosticKind::ExpectedExpression { .. } => "ExpectedExpression",
            DiagnosticKind::MissingDelimiter { .. } => "MissingDelimiter",
            DiagnosticKind::DuplicateParameter { .. } => "DuplicateParameter",
            DiagnosticKind::UnknownBuiltin { .. } => "UnknownBuiltin",
            DiagnosticKind::UnknownNamespace { .. } => "UnknownNamespace",
            DiagnosticKind::MissingVisibility { .. } => "MissingVisibility",
            DiagnosticKind::InvalidVoidUsage => "InvalidVoidUsage",
            DiagnosticKind::UserTypeNotAllowed { .. } => "UserTypeNotAllowed",
            DiagnosticKind::MissingBinding => "MissingBinding",
            DiagnosticKind::BindingNotAllowed => "BindingNotAllowed",
            DiagnosticKind::DuplicateImport => "DuplicateImport",
            DiagnosticKind::MissingImport => "MissingImport",
            DiagnosticKind::UnexpectedImportPath { .. } => "UnexpectedImportPath",
            DiagnosticKind::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::UnrecognisedToken { .. } => ErrorTip::None,
            DiagnosticKind::UnterminatedString => ErrorTip::Suggestion(String::from(
                "string literals must be closed with `\"` on the same line",
            )),
            DiagnosticKind::InvalidEscape { sequence } => ErrorTip::Suggestion(format!(
                "`\\{}` is not an escape, use one of \\n \\r \\t \\\\ \\\" \\xHH",
                sequence
            )),
            DiagnosticKind::InvalidStringByte { byte } => ErrorTip::Suggestion(format!(
                "byte 0x{:02x} must be written as an escape sequence",
                byte
            )),
            DiagnosticKind::MalformedNumber { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, a fraction or exponent needs at least one digit",
                token
            )),
            DiagnosticKind::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "expected {}, found `{}`",
                expected, found
            )),
            DiagnosticKind::UnexpectedEof { expected } => {
                ErrorTip::Suggestion(format!("input ended while expecting {}", expected))
            }
            DiagnosticKind::ExpectedExpression { found } => {
                ErrorTip::Suggestion(format!("expected an expression, found `{}`", found))
            }
            DiagnosticKind::MissingDelimiter { delimiter, found } => ErrorTip::Suggestion(
                format!("expected {}, found `{}`, did you miss it?", delimiter, found),
            ),
            DiagnosticKind::DuplicateParameter { name } => {
                ErrorTip::Suggestion(format!("parameter `{}` is declared twice", name))
            }
            DiagnosticKind::UnknownBuiltin { namespace, name } => ErrorTip::Suggestion(format!(
                "`{}.{}` is not a built-in function",
                namespace, name
            )),
            DiagnosticKind::UnknownNamespace { name } => ErrorTip::Suggestion(format!(
                "`{}` is not the built-in namespace, only built-in calls may be dotted",
                name
            )),
            DiagnosticKind::MissingVisibility { function } => ErrorTip::Suggestion(format!(
                "function `{}` must be declared with `pub fn`",
                function
            )),
            DiagnosticKind::InvalidVoidUsage => ErrorTip::Suggestion(String::from(
                "`void` is only allowed as a non-nullable function return type",
            )),
            DiagnosticKind::UserTypeNotAllowed { name } => {
                ErrorTip::Suggestion(format!("unknown type `{}`", name))
            }
            DiagnosticKind::MissingBinding => ErrorTip::Suggestion(String::from(
                "a `|name|` binding is required after the condition",
            )),
            DiagnosticKind::BindingNotAllowed => {
                ErrorTip::Suggestion(String::from("`|name|` bindings are disabled"))
            }
            DiagnosticKind::DuplicateImport => {
                ErrorTip::Suggestion(String::from("the built-in module is already imported"))
            }
            DiagnosticKind::MissingImport => ErrorTip::Suggestion(String::from(
                "add `const ifj = @import(\"ifj24.zig\");` at the top of the file",
            )),
            DiagnosticKind::UnexpectedImportPath { path } => {
                ErrorTip::Suggestion(format!("importing `{}` instead of `ifj24.zig`", path))
            }
            DiagnosticKind::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "nesting exceeds the limit of {} levels",
                limit
            )),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.span.start, self.kind)
    }
}

impl std::error::Error for Diagnostic {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    // lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid escape sequence: \\{sequence}")]
    InvalidEscape { sequence: String },
    #[error("invalid byte in string literal: 0x{byte:02x}")]
    InvalidStringByte { byte: u8 },
    #[error("malformed numeric literal: {token:?}")]
    MalformedNumber { token: String },

    // syntax
    #[error("unexpected token: expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("expected expression, found {found:?}")]
    ExpectedExpression { found: String },
    #[error("missing {delimiter}, found {found:?}")]
    MissingDelimiter { delimiter: String, found: String },
    #[error("duplicate parameter {name:?}")]
    DuplicateParameter { name: String },
    #[error("unknown built-in function {namespace}.{name}")]
    UnknownBuiltin { namespace: String, name: String },
    #[error("unknown namespace {name:?}")]
    UnknownNamespace { name: String },
    #[error("function {function:?} is missing `pub`")]
    MissingVisibility { function: String },
    #[error("`void` used outside of a function return type")]
    InvalidVoidUsage,
    #[error("user-defined type {name:?} is not allowed")]
    UserTypeNotAllowed { name: String },
    #[error("missing null-unwrap binding")]
    MissingBinding,
    #[error("null-unwrap binding is not allowed")]
    BindingNotAllowed,
    #[error("built-in module imported more than once")]
    DuplicateImport,
    #[error("missing built-in module import")]
    MissingImport,
    #[error("unexpected import path {path:?}")]
    UnexpectedImportPath { path: String },

    // exhaustion
    #[error("nesting too deep (limit {limit})")]
    NestingTooDeep { limit: usize },
}
