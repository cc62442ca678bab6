#![allow(clippy::module_inception)]

use std::fmt::{self, Display};

use crate::errors::errors::{Diagnostic, ErrorTip, Severity};

pub mod ast;
pub mod builtins;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use config::{BindingPolicy, ParserConfig, StringBytes};
pub use parser::parser::{parse, parse_with, ParseOutput};

/// A location in the source unit. Lines and columns are 1-based, the offset
/// is a byte offset from the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Position { offset, line, column }
    }

    pub fn start() -> Self {
        Position::new(0, 1, 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn point(position: Position) -> Self {
        Span { start: position, end: position }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        Span { start: self.start, end: other.end }
    }
}

/// Finds the line containing the byte `offset`.
///
/// Returns the 1-based line number, the text of that line and the byte
/// position of `offset` within it. Offsets past the end map onto the last
/// line so end-of-input diagnostics still have something to point at.
pub fn get_line_at_position(source: &str, offset: u32) -> (usize, String, usize) {
    let pos = (offset as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    // `pos` is at the very end of the input
    match source.split_inclusive('\n').last() {
        Some(last) if !last.ends_with('\n') => (line_number - 1, last.to_string(), last.len()),
        _ => (line_number, String::new(), 0),
    }
}

/// Renders a diagnostic the way the driver prints it:
///
/// ```text
/// Error: UnexpectedToken (expected `;`, found `var`)
/// -> main.zig
///    |
///  3 | const a = 1 var b = 2;
///    | ------------^
/// ```
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) -> String {
    let position = diagnostic.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.offset);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    let label = match diagnostic.severity() {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };

    let mut out = String::new();
    if let ErrorTip::None = diagnostic.get_tip() {
        out.push_str(&format!("{}: {}\n", label, diagnostic.get_error_name()));
    } else {
        out.push_str(&format!(
            "{}: {} ({})\n",
            label,
            diagnostic.get_error_name(),
            diagnostic.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", file, position));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    // Columns on screen are characters, not bytes
    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |before| before.chars().count());
    let arrows = column.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
