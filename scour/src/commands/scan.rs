// scour/src/commands/scan.rs
//! Scan command implementation: read-only walk over the full history.

use anyhow::{Context, Result};
use log::info;
use std::io;
use std::sync::atomic::AtomicBool;

use scour_core::{ScrubSession, SessionOptions};

use crate::cli::ScanCommand;
use crate::commands::{load_catalog, EXIT_ERROR, EXIT_FINDINGS, EXIT_NO_FINDINGS};
use crate::report;

pub fn run_scan(cmd: &ScanCommand) -> Result<i32> {
    let config = load_catalog(&cmd.config, &cmd.enable, &cmd.disable)?;
    let options = SessionOptions {
        jobs: cmd.jobs,
        backup_dir: None,
    };
    let session = ScrubSession::new(&cmd.repo, &config, options)
        .with_context(|| format!("Could not prepare a scan of {}", cmd.repo.display()))?;

    info!("Scanning git history for sensitive data...");
    let cancel = AtomicBool::new(false);
    let report = session
        .plan(&cancel)
        .with_context(|| format!("Scan of {} failed", cmd.repo.display()))?;

    if cmd.json {
        serde_json::to_writer_pretty(io::stdout().lock(), &report)
            .context("Could not serialize the scan report")?;
        println!();
    } else {
        report::print_findings(&mut io::stdout().lock(), &report)?;
        report::print_scan_summary(&report);
    }

    if !report.failures.is_empty() {
        return Ok(EXIT_ERROR);
    }
    Ok(if report.has_findings() {
        EXIT_FINDINGS
    } else {
        EXIT_NO_FINDINGS
    })
}
