//! Integration tests for the public front-end API.
//!
//! These run whole programs through `parse`/`parse_with` and check the tree,
//! the diagnostics and the process exit code the driver would use.

use ifjc::{
    ast::{ast::Decl, statements::Stmt, types::TypeBase},
    builtins::{BuiltinParam, BuiltinTable},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parse, parse_with, render_diagnostic, ParserConfig,
};
use pretty_assertions::assert_eq;

const FACTORIAL: &str = r#"
const ifj = @import("ifj24.zig");

// Iterative factorial
pub fn main() void {
    ifj.write("Zadejte cislo pro vypocet faktorialu\n");
    const a = ifj.readi32();
    if (a) |val| {
        if (val < 0) {
            ifj.write("Faktorial ");
            ifj.write(val);
            ifj.write(" nelze spocitat\n");
        } else {
            var d: f64 = ifj.i2f(val);
            var vysl: f64 = 1.0;
            while (d > 0) {
                vysl = vysl * d;
                d = d - 1.0;
            }
            ifj.write("Vysledek: ");
            ifj.write(vysl);
            ifj.write("\n");
        }
    } else {
        ifj.write("Faktorial pro null nelze spocitat\n");
    }
}
"#;

const RECURSIVE: &str = r#"
const ifj = @import("ifj24.zig");

pub fn factorial(n: i32) i32 {
    var result: i32 = 0 - 1;
    if (n < 2) {
        result = 1;
    } else {
        const decremented_n = n - 1;
        const temp_result = factorial(decremented_n);
        result = n * temp_result;
    }
    return result;
}

pub fn main() void {
    const inp = ifj.readi32();
    if (inp) |n| {
        const r = factorial(n);
        const s = ifj.string(r);
        _ = ifj.length(s);
    } else {}
}
"#;

#[test]
fn test_parse_factorial_program() {
    let output = parse(FACTORIAL);

    assert!(output.is_success(), "{:?}", output.diagnostics);
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.exit_code(), 0);

    let program = &output.program;
    assert!(program.prolog.is_some());
    assert_eq!(program.functions().count(), 1);

    let main = program.find_function("main").expect("main");
    assert!(main.is_public);
    assert_eq!(main.return_type.base, TypeBase::Void);
    assert_eq!(main.body.len(), 3);
    assert!(matches!(main.body.body[2], Stmt::If(_)));
}

#[test]
fn test_parse_recursive_program() {
    let output = parse(RECURSIVE);
    assert!(output.is_success(), "{:?}", output.diagnostics);

    let names: Vec<&str> = output
        .program
        .functions()
        .map(|function| &*function.name)
        .collect();
    assert_eq!(names, vec!["factorial", "main"]);

    let factorial = output.program.find_function("factorial").expect("factorial");
    assert_eq!(factorial.parameters.len(), 1);
    assert_eq!(factorial.return_type.to_string(), "i32");
    assert!(matches!(factorial.body.body.last(), Some(Stmt::Return(_))));
}

#[test]
fn test_strict_profile_accepts_assignment_programs() {
    let config = ParserConfig::strict();

    assert!(parse_with(FACTORIAL, &config).is_success());
    assert!(parse_with(RECURSIVE, &config).is_success());
}

#[test]
fn test_printed_program_parses_back() {
    let printed = parse(RECURSIVE).program.to_string();
    let reparsed = parse(&printed);

    assert!(reparsed.is_success(), "{:?}", reparsed.diagnostics);
    assert_eq!(reparsed.program.to_string(), printed);
}

#[test]
fn test_errors_are_reported_in_source_order() {
    let source = "const a = 1\npub fn main() void {\n    x + 1;\n}\nconst b = #;\n";
    let output = parse(source);

    let lines: Vec<u32> = output
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.get_position().line)
        .collect();
    assert_eq!(lines, vec![1, 3, 5]);

    // the first error decides the exit code, here a syntax error
    assert_eq!(output.exit_code(), 2);
    assert_eq!(output.program.declarations.len(), 3);
}

#[test]
fn test_lexical_error_decides_exit_code() {
    let output = parse("const s = \"open;\npub fn main() void {}\n");

    assert_eq!(output.diagnostics[0].get_error_name(), "UnterminatedString");
    assert_eq!(output.exit_code(), 1);
    assert!(output.program.find_function("main").is_some());
}

#[test]
fn test_render_diagnostic() {
    let source = "const a = 1\nconst b = 2;\n";
    let output = parse(source);
    assert_eq!(output.diagnostics.len(), 1);

    let rendered = render_diagnostic(&output.diagnostics[0], source, "test.zig");
    assert!(rendered.starts_with("Error: MissingDelimiter"));
    assert!(rendered.contains("-> test.zig:1:12\n"));
    assert!(rendered.contains("1 | const a = 1\n"));
}

#[test]
fn test_render_warning() {
    let source = "const ifj = @import(\"ifj23.zig\");\n";
    let output = parse(source);

    let rendered = render_diagnostic(&output.diagnostics[0], source, "test.zig");
    assert!(rendered.starts_with("Warning: UnexpectedImportPath"));
    assert_eq!(output.exit_code(), 0);
}

#[test]
fn test_custom_builtin_table() {
    let mut table = BuiltinTable::new("sys", "test");
    table.insert(
        "exit",
        vec![BuiltinParam::Any],
        ifjc::ast::types::TypeRef::new(false, TypeBase::Void),
    );
    let config = ParserConfig::default().with_builtins(table);

    let output = parse_with("pub fn main() void { sys.exit(0); }", &config);
    assert!(output.is_success(), "{:?}", output.diagnostics);

    let output = parse_with("pub fn main() void { ifj.write(0); }", &config);
    assert_eq!(output.diagnostics[0].get_error_name(), "UnknownNamespace");
}

#[test]
fn test_tokenize_prolog() {
    let (tokens, diagnostics) = tokenize("const ifj = @import(\"ifj24.zig\");");
    assert!(diagnostics.is_empty());

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Const,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::At,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::String,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_recovered_declarations_are_kept() {
    let output = parse("var = 1;\npub fn main() void {}\nvar ok = 2;");

    assert_eq!(output.errors().count(), 1);
    assert!(matches!(output.program.declarations[0], Decl::Invalid { .. }));
    assert_eq!(output.program.functions().count(), 1);
    assert_eq!(output.program.globals().count(), 1);
}
