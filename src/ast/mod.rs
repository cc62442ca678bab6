/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program root, declarations and the identifier type
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: Type references written in declarations
/// - printer: Canonical source rendering
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;
