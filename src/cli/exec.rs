use std::path::PathBuf;

use clap::Args;
use z3::{Config as Z3Config, Context};

use wexec::config::Config;
use wexec::sym::executor::SymExecutor;
use wexec::sym::SymState;

#[derive(Args)]
pub struct ExecArgs {
    /// W source file to symbolically execute
    pub input: PathBuf,
    /// Iteration cap for non-invariant while loops
    #[arg(long, default_value_t = wexec::config::DEFAULT_UNROLL_LIMIT)]
    pub unroll_limit: u32,
    /// Write every reached state's path condition, as SMT-LIB2, to this file
    #[arg(long, value_name = "PATH")]
    pub smt2: Option<PathBuf>,
}

/// Exit code is always 0 (spec.md §6): an assertion that might be violated
/// is a diagnostic on standard output, not a process failure — the whole
/// point of symbolic execution is to enumerate every reachable state,
/// including the ones that found a bug.
pub fn cmd_exec(args: ExecArgs) {
    let program = super::load_program(&args.input);

    let z3_cfg = Z3Config::new();
    let ctx = Context::new(&z3_cfg);
    let config = Config {
        unroll_limit: args.unroll_limit,
    };
    let mut executor = SymExecutor::new(&ctx, &config);

    let states = match executor.run(&program.node, SymState::new(&ctx)) {
        Ok(states) => states,
        Err(e) => {
            eprintln!("error: {}", e);
            return;
        }
    };

    for (i, state) in states.iter().enumerate() {
        println!("=== state {} ===", i);
        println!("{}", state);
    }

    for diag in executor.diagnostics() {
        println!("{}", diag);
    }

    println!("{} reachable state(s)", states.len());

    if let Some(path) = &args.smt2 {
        let combined = states
            .iter()
            .enumerate()
            .map(|(i, s)| format!("; === state {} ===\n{}", i, s.to_smt2()))
            .collect::<Vec<_>>()
            .join("\n");
        if let Err(e) = std::fs::write(path, combined) {
            eprintln!("error: could not write '{}': {}", path.display(), e);
        }
    }
}
