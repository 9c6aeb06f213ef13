// scour/src/report.rs
//! Console rendering of scan reports and clean summaries.
//!
//! Findings go to stdout, one line per finding, in a stable
//! machine-greppable shape: `[<commit>] rule=<id> category=<category>`.
//! Summaries and guidance go to stderr so piped output stays clean.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use scour_core::{AppliedClean, ScanReport};

pub fn print_findings<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    for finding in &report.findings {
        match finding.origin.path() {
            Some(path) => writeln!(
                out,
                "[{}] rule={} category={} path={}",
                finding.origin.short_commit(),
                finding.rule_id,
                finding.category,
                path
            )?,
            None => writeln!(
                out,
                "[{}] rule={} category={}",
                finding.origin.short_commit(),
                finding.rule_id,
                finding.category
            )?,
        }
    }
    Ok(())
}

pub fn print_scan_summary(report: &ScanReport) {
    let color = io::stderr().is_terminal();
    let line = format!(
        "Scanned {} commits: {} finding(s), {} unreadable unit(s).",
        report.commits_visited,
        report.findings.len(),
        report.failures.len()
    );
    if color && report.has_findings() {
        eprintln!("{}", line.yellow());
    } else {
        eprintln!("{}", line);
    }

    for failure in &report.failures {
        eprintln!("warning: could not scan {}: {}", failure.origin, failure.reason);
    }
}

pub fn print_clean_summary(applied: &AppliedClean) {
    let result = &applied.result;
    eprintln!(
        "History rewritten: {} commits visited, {} blobs redacted, {} file versions removed, {} bytes replaced.",
        result.commits_visited, result.blobs_rewritten, result.files_removed, result.bytes_redacted
    );
    eprintln!("Backup bundle: {}", applied.backup.bundle_path.display());
    eprintln!();
    eprintln!("Next steps:");
    eprintln!("  1. Review the rewritten history (git log --stat).");
    eprintln!("  2. Refresh your working tree: git reset --hard HEAD");
    eprintln!("  3. Drop the old objects: git reflog expire --expire=now --all && git gc --prune=now");
    eprintln!("  4. Force-push every branch: git push origin --force --all");
    eprintln!("  5. Rotate every credential that was exposed. Rewriting history does not un-leak them.");
}
