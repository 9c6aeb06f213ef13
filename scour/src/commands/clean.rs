// scour/src/commands/clean.rs
//! Clean command implementation: scan, confirm, backup, rewrite.
//!
//! The destructive step sits behind the literal confirmation token. Every
//! pre-mutation failure (catalog, backup, verification) aborts before the
//! history is touched; an engine failure mid-rewrite points the user at the
//! backup bundle instead of pretending anything was rolled back.

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;

use scour_core::{ScourError, ScrubSession, SessionOptions, CONFIRMATION_TOKEN};

use crate::cli::CleanCommand;
use crate::commands::{load_catalog, EXIT_NO_FINDINGS};
use crate::report;

pub fn run_clean(cmd: &CleanCommand) -> Result<i32> {
    let config = load_catalog(&cmd.config, &cmd.enable, &cmd.disable)?;
    let options = SessionOptions {
        jobs: cmd.jobs,
        backup_dir: cmd.backup_dir.clone(),
    };
    let session = ScrubSession::new(&cmd.repo, &config, options)
        .with_context(|| format!("Could not prepare a clean of {}", cmd.repo.display()))?;

    info!("Scanning git history before cleaning...");
    let cancel = AtomicBool::new(false);
    let scan = session
        .plan(&cancel)
        .with_context(|| format!("Scan of {} failed", cmd.repo.display()))?;

    for failure in &scan.failures {
        warn!("Could not scan {}: {}", failure.origin, failure.reason);
    }

    if !scan.has_findings() {
        eprintln!("No sensitive data found in git history. Nothing to clean.");
        return Ok(EXIT_NO_FINDINGS);
    }

    report::print_findings(&mut io::stdout().lock(), &scan)?;
    report::print_scan_summary(&scan);

    let token = match &cmd.confirm {
        Some(token) => token.clone(),
        None => prompt_for_token()?,
    };

    match session.apply(&token) {
        Ok(applied) => {
            report::print_clean_summary(&applied);
            Ok(EXIT_NO_FINDINGS)
        }
        Err(ScourError::Aborted) => {
            eprintln!("Confirmation token did not match. Nothing was touched.");
            Ok(EXIT_NO_FINDINGS)
        }
        Err(err @ ScourError::Backup(_)) => {
            Err(err).context("Backup failed; the clean was refused before any mutation")
        }
        Err(err @ ScourError::RewriteEngine(_)) => {
            eprintln!(
                "The history rewrite failed partway. Restore from the backup bundle in {} \
(git clone <bundle>).",
                session.backup_dir().display()
            );
            Err(err).context("History rewrite failed")
        }
        Err(err) => Err(err).context("Clean failed"),
    }
}

/// Interactive gate: the rewrite is irreversible without the backup, so the
/// token must be typed in full.
fn prompt_for_token() -> Result<String> {
    eprintln!();
    eprintln!("This will REWRITE the repository's entire history.");
    eprint!("Type '{}' to proceed: ", CONFIRMATION_TOKEN);
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Could not read the confirmation token")?;
    Ok(line.trim_end().to_string())
}
