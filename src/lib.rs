pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod interp;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod smt;
pub mod span;
pub mod sym;
pub mod undef;

use diagnostic::{render_diagnostics, Diagnostic};

/// Parse a W source file, rendering diagnostics to stderr on failure.
pub fn parse_source(source: &str, filename: &str) -> Result<ast::Program, Vec<Diagnostic>> {
    match parser::parse_source(source, 0) {
        Ok(program) => Ok(program),
        Err(errors) => {
            render_diagnostics(&errors, filename, source);
            Err(errors)
        }
    }
}

/// Parse a W source file without rendering — for callers (tests, library
/// consumers) that want to handle diagnostics themselves.
pub fn parse_source_silent(source: &str) -> Result<ast::Program, Vec<Diagnostic>> {
    parser::parse_source(source, 0)
}
