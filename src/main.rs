// File: src/main.rs
//
// Main entry point for the minipy interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run or repl).

use clap::{Parser as ClapParser, Subcommand};
use minipy::errors::MiniPyError;
use minipy::interpreter::Interpreter;
use minipy::repl::Repl;
use minipy::{lexer, parser};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "minipy",
    about = "minipy: a tree-walk interpreter for a small subset of Python",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a script file
    Run {
        /// Path to the .py file
        file: PathBuf,
    },

    /// Launch the interactive REPL
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => {
            let source = match fs::read_to_string(&file) {
                Ok(source) => source,
                Err(err) => {
                    eprintln!("error: cannot read {}: {}", file.display(), err);
                    return ExitCode::FAILURE;
                }
            };
            match run_source(&source) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Repl => {
            let mut repl = match Repl::new() {
                Ok(repl) => repl,
                Err(err) => {
                    eprintln!("error: failed to start REPL: {}", err);
                    return ExitCode::FAILURE;
                }
            };
            match repl.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("error: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Full batch pipeline: source text -> tokens -> AST -> execution
fn run_source(source: &str) -> Result<(), MiniPyError> {
    let tokens = lexer::tokenize(source)?;
    let stmts = parser::Parser::new(tokens).parse()?;
    Interpreter::new().run(&stmts)
}
