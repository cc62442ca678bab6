//! Canonical source rendering of the tree.
//!
//! Binary expressions are always wrapped in parentheses so the printed text
//! does not depend on precedence. Parsing the output of a valid program gives
//! back the same tree, modulo spans and block ids.

use std::fmt::{self, Display, Write};

use super::{
    ast::{Decl, FnDecl, Program},
    expressions::{Callee, CallExpr, Expr},
    statements::{AssignTarget, Block, ConditionHead, Stmt, VarDecl},
};

const INDENT: &str = "    ";

pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Printer {
            out: String::new(),
            indent: 0,
        }
    }

    pub fn print_program(program: &Program) -> String {
        let mut printer = Printer::new();
        printer.program(program);
        printer.out
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        let mut printer = Printer::new();
        printer.stmt(stmt);
        printer.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn program(&mut self, program: &Program) {
        if let Some(prolog) = &program.prolog {
            self.line(&format!(
                "const {} = @import(\"{}\");",
                prolog.binding,
                escape_bytes(prolog.path.as_bytes())
            ));
        }

        for decl in &program.declarations {
            match decl {
                Decl::Function(function) => self.function(function),
                Decl::Variable(variable) => self.line(&var_decl(variable)),
                Decl::Invalid { .. } => self.line("<invalid>"),
            }
        }
    }

    fn function(&mut self, function: &FnDecl) {
        let parameters = function
            .parameters
            .iter()
            .map(|param| format!("{}: {}", param.name, param.ty))
            .collect::<Vec<_>>()
            .join(", ");

        let visibility = if function.is_public { "pub " } else { "" };
        self.block(
            &format!(
                "{}fn {}({}) {}",
                visibility, function.name, parameters, function.return_type
            ),
            &function.body,
        );
    }

    /// Prints `<header> {`, the body, and the closing brace.
    fn block(&mut self, header: &str, block: &Block) {
        self.line(&format!("{} {{", header));
        self.body(block);
        self.line("}");
    }

    fn body(&mut self, block: &Block) {
        self.indent += 1;
        for stmt in block.iter() {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.line(&var_decl(decl)),
            Stmt::Assignment(assign) => {
                let target = match &assign.target {
                    AssignTarget::Variable { name, .. } => name.to_string(),
                    AssignTarget::Discard { .. } => String::from("_"),
                };
                self.line(&format!("{} = {};", target, assign.value));
            }
            Stmt::Call(call) => self.line(&format!("{};", call.call)),
            Stmt::If(stmt) => {
                let header = format!("if {}", head(&stmt.head));
                match &stmt.else_body {
                    Some(else_body) => {
                        self.line(&format!("{} {{", header));
                        self.body(&stmt.then_body);
                        self.line("} else {");
                        self.body(else_body);
                        self.line("}");
                    }
                    None => self.block(&header, &stmt.then_body),
                }
            }
            Stmt::While(stmt) => self.block(&format!("while {}", head(&stmt.head)), &stmt.body),
            Stmt::Return(stmt) => match &stmt.value {
                Some(value) => self.line(&format!("return {};", value)),
                None => self.line("return;"),
            },
            Stmt::Invalid { .. } => self.line("<invalid>;"),
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new()
    }
}

fn var_decl(decl: &VarDecl) -> String {
    let keyword = if decl.is_constant { "const" } else { "var" };
    match &decl.explicit_type {
        Some(ty) => format!(
            "{} {}: {} = {};",
            keyword, decl.identifier, ty, decl.assigned_value
        ),
        None => format!("{} {} = {};", keyword, decl.identifier, decl.assigned_value),
    }
}

fn head(head: &ConditionHead) -> String {
    let mut text = format!("({}", head.condition);
    if let Some(comparison) = &head.comparison {
        let _ = write!(text, " {} {}", comparison.operator, comparison.right);
    }
    text.push(')');
    if let Some(binding) = &head.binding {
        let _ = write!(text, " |{}|", binding.name);
    }
    text
}

/// Writes `bytes` back as the body of a string literal. Anything outside
/// printable ASCII comes out as `\xHH`, one escape per byte.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'"' => escaped.push_str("\\\""),
            b'\\' => escaped.push_str("\\\\"),
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            0x20..=0x7e => escaped.push(byte as char),
            _ => {
                let _ = write!(escaped, "\\x{:02x}", byte);
            }
        }
    }
    escaped
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Integer { value, .. } => write!(f, "{}", value),
            // Debug keeps a `.0` or an exponent, so the text re-scans as a float
            Expr::Float { value, .. } => write!(f, "{:?}", value),
            Expr::String { value, .. } => write!(f, "\"{}\"", escape_bytes(value)),
            Expr::Null { .. } => write!(f, "null"),
            Expr::Identifier { name, .. } => write!(f, "{}", name),
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::Missing { .. } => write!(f, "<missing>"),
        }
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.callee {
            Callee::User { name, .. } => write!(f, "{}(", name)?,
            Callee::Builtin(builtin) => write!(f, "{}.{}(", builtin.namespace, builtin.name)?,
        }
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument)?;
        }
        write!(f, ")")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Printer::print_stmt(self).trim_end())
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer::print_program(self))
    }
}
