mod cli;

use clap::{Parser, Subcommand};

use cli::exec::ExecArgs;
use cli::run::RunArgs;
use cli::undef::UndefArgs;

#[derive(Parser)]
#[command(
    name = "wexec",
    version,
    about = "A symbolic execution engine for the W while-language"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interpret a W program concretely, from an empty initial state
    Run(RunArgs),
    /// Symbolically execute a W program, exploring every feasible path
    Exec(ExecArgs),
    /// Run used-before-defined analysis on a W program
    Undef(UndefArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => cli::run::cmd_run(args),
        Command::Exec(args) => cli::exec::cmd_exec(args),
        Command::Undef(args) => cli::undef::cmd_undef(args),
    }
}
