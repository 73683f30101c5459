use std::path::PathBuf;

use clap::Args;

use wexec::undef::UndefAnalyzer;

#[derive(Args)]
pub struct UndefArgs {
    /// W source file to run used-before-defined analysis on
    pub input: PathBuf,
}

pub fn cmd_undef(args: UndefArgs) {
    let program = super::load_program(&args.input);
    let (undef, defined) = UndefAnalyzer::analyze(&program.node);

    if undef.is_empty() {
        println!("no possibly-undefined variables");
    } else {
        print!("possibly undefined:");
        for name in &undef {
            print!(" {}", name);
        }
        println!();
    }

    print!("defined at exit:");
    for name in &defined {
        print!(" {}", name);
    }
    println!();
}
