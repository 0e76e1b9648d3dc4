//! Ariadne CLI - cross-reference navigation from the command line.
//!
//! Every subcommand runs one query against a C# solution and prints the
//! result record as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Ariadne: cross-reference navigation for C# solutions.
#[derive(Parser)]
#[command(name = "ariadne")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Solution file, project file or directory (defaults to current directory)
    #[arg(short, long, global = true)]
    solution: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Bind every document instead of skipping ones that never mention the target
    #[arg(long, global = true)]
    no_prefilter: bool,

    #[command(subcommand)]
    command: cli::Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine solution path
    let solution = match cli.solution {
        Some(s) => s,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let options = cli::Options {
        solution,
        no_prefilter: cli.no_prefilter,
    };

    match cli::run(cli.command, &options) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", cli::output::failure(&e));
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
