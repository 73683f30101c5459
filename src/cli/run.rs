use std::path::PathBuf;
use std::process;

use clap::Args;

use wexec::interp::{self, InterpError, Outcome};

#[derive(Args)]
pub struct RunArgs {
    /// W source file to interpret concretely
    pub input: PathBuf,
}

pub fn cmd_run(args: RunArgs) {
    let program = super::load_program(&args.input);

    match interp::run(&program.node) {
        Ok(Outcome::Completed(state)) => {
            println!("{}", state);
        }
        Ok(Outcome::Halted) => {
            println!("halted (assume failed)");
        }
        Err(InterpError::AssertionViolation) => {
            eprintln!("error: assertion violated");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
