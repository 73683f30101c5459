pub mod exec;
pub mod run;
pub mod undef;

use std::path::Path;
use std::process;

use wexec::ast::Program;
use wexec::diagnostic::render_diagnostics;

/// Read and parse a W source file, printing diagnostics and exiting the
/// process on any parse failure. Shared by all three subcommands.
pub fn load_program(path: &Path) -> Program {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            process::exit(1);
        }
    };

    match wexec::parser::parse_source(&source, 0) {
        Ok(program) => program,
        Err(diagnostics) => {
            let filename = path.display().to_string();
            render_diagnostics(&diagnostics, &filename, &source);
            process::exit(1);
        }
    }
}
