//! Diagnostics produced by the front end.
//!
//! This module defines the diagnostic types shared by the scanner and the
//! parser. It includes:
//!
//! - Diagnostic structures with source span and severity
//! - Specific variants for lexical and syntax errors
//! - Error names, tips and exit-code categories used by the driver

pub mod errors;

#[cfg(test)]
mod tests;
