// scour/src/cli.rs
//! This file defines the command-line interface (CLI) for the scour
//! application, including all available commands and their arguments.
//!
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "scour",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find secrets in git history and rewrite the history to remove them",
    long_about = "Scour scans every commit message and every historical file blob of a git \
repository for committed credentials (API keys, tokens, passwords, credentialed URLs, env-file \
assignments). The clean command then rewrites the entire history: matched spans become \
***REMOVED***, sensitive files (.env, *.pem, ...) are deleted from every historical tree, and a \
verified backup bundle is written before anything is touched.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for the 'scour' crates to DEBUG)
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `scour` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scans the full history for sensitive data without touching anything.
    #[command(about = "Scans the full history for sensitive data without touching anything.")]
    Scan(ScanCommand),

    /// Rewrites the history so matched data is permanently removed.
    #[command(about = "Backs up the repository, then rewrites the history so matched data is permanently removed.")]
    Clean(CleanCommand),
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to the repository to scan.
    #[arg(value_name = "PATH", default_value = ".", help = "Path to the repository to scan.")]
    pub repo: PathBuf,

    /// Path to a custom catalog file (YAML), merged over the built-in rules.
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom catalog file (YAML), merged over the built-in rules.")]
    pub config: Option<PathBuf>,

    /// Explicitly enable only these rule ids (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Explicitly enable only these rule ids (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule ids (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Explicitly disable these rule ids (comma-separated).")]
    pub disable: Vec<String>,

    /// Number of scan worker threads (defaults to the CPU count).
    #[arg(long, short = 'j', value_name = "N", help = "Number of scan worker threads (defaults to the CPU count).")]
    pub jobs: Option<usize>,

    /// Print the scan report as JSON to stdout.
    #[arg(long = "json", help = "Print the scan report as JSON to stdout.")]
    pub json: bool,
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanCommand {
    /// Path to the repository to clean.
    #[arg(value_name = "PATH", default_value = ".", help = "Path to the repository to clean.")]
    pub repo: PathBuf,

    /// Path to a custom catalog file (YAML), merged over the built-in rules.
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom catalog file (YAML), merged over the built-in rules.")]
    pub config: Option<PathBuf>,

    /// Explicitly enable only these rule ids (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Explicitly enable only these rule ids (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule ids (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Explicitly disable these rule ids (comma-separated).")]
    pub disable: Vec<String>,

    /// Number of scan worker threads (defaults to the CPU count).
    #[arg(long, short = 'j', value_name = "N", help = "Number of scan worker threads (defaults to the CPU count).")]
    pub jobs: Option<usize>,

    /// Directory for the pre-rewrite backup bundle.
    #[arg(long = "backup-dir", value_name = "DIR", help = "Directory for the pre-rewrite backup bundle (defaults to scour-backups next to the repository).")]
    pub backup_dir: Option<PathBuf>,

    /// Provide the confirmation token non-interactively.
    #[arg(long = "confirm", value_name = "TOKEN", help = "Provide the confirmation token non-interactively (the literal string 'DELETE HISTORY').")]
    pub confirm: Option<String>,
}
