// scour/src/main.rs
//! Scour entry point.
//!
//! Parses arguments, wires up logging, and dispatches to the scan or clean
//! command. Exit codes: 0 no findings, 1 findings reported, 2 internal
//! error (including per-unit scan failures).

use clap::Parser;
use log::LevelFilter;

use scour::cli::{Cli, Commands};
use scour::commands::{self, EXIT_ERROR};
use scour::logger;

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        Some(LevelFilter::Debug)
    } else if cli.quiet {
        Some(LevelFilter::Off)
    } else {
        None
    };
    logger::init_logger(level);

    let outcome = match &cli.command {
        Commands::Scan(cmd) => commands::scan::run_scan(cmd),
        Commands::Clean(cmd) => commands::clean::run_clean(cmd),
    };

    let code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("scour: {:#}", e);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}
