// scour-core/src/session.rs
//! One-shot, non-interactive orchestration of scan and clean runs.
//!
//! The session exposes the two-call shape the CLI (and any automation)
//! builds on: `plan()` walks and scans the whole history read-only,
//! `apply()` demands the literal confirmation token and then performs
//! backup, verification, and the destructive rewrite. No prompting happens
//! here; interaction belongs to the caller.

use git2::Repository;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use crate::backup::{BackupHandle, BackupManager};
use crate::catalog::CompiledCatalog;
use crate::config::CatalogConfig;
use crate::errors::ScourError;
use crate::finding::{Finding, ScanFailure};
use crate::rewrite::{RedactionRewriter, RewriteResult};
use crate::scanner::scan_unit;
use crate::walker::{CommitStep, HistoryWalker};
use crate::engines::GitHistoryEngine;

/// The literal token `apply` requires before mutating anything.
pub const CONFIRMATION_TOKEN: &str = "DELETE HISTORY";

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Scan worker count; defaults to the number of CPUs.
    pub jobs: Option<usize>,
    /// Where the backup bundle lands; defaults to `scour-backups` next to
    /// the repository.
    pub backup_dir: Option<PathBuf>,
}

/// Everything `plan` learned about the history, read-only.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub commits_visited: usize,
    pub findings: Vec<Finding>,
    /// Per-unit failures; these never abort the walk, but they do mean the
    /// scan cannot vouch for the affected commits.
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Outcome of one completed `apply`.
#[derive(Debug)]
pub struct AppliedClean {
    pub backup: BackupHandle,
    pub result: RewriteResult,
}

pub struct ScrubSession {
    repo_path: PathBuf,
    catalog: CompiledCatalog,
    options: SessionOptions,
}

impl ScrubSession {
    /// Compiles the catalog up front so every invalid rule is rejected
    /// before any repository access.
    pub fn new<P: AsRef<Path>>(
        repo_path: P,
        config: &CatalogConfig,
        options: SessionOptions,
    ) -> Result<Self, ScourError> {
        let catalog = CompiledCatalog::compile(config)?;
        Ok(Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            catalog,
            options,
        })
    }

    pub fn catalog(&self) -> &CompiledCatalog {
        &self.catalog
    }

    /// Where `apply` will write (or has written) its backup bundle.
    pub fn backup_dir(&self) -> PathBuf {
        self.options.backup_dir.clone().unwrap_or_else(|| {
            self.repo_path
                .parent()
                .map(|p| p.join("scour-backups"))
                .unwrap_or_else(|| self.repo_path.join("scour-backups"))
        })
    }

    /// Walks the full history and scans every content unit. Read-only.
    ///
    /// Units belonging to one commit are scanned in parallel on a bounded
    /// worker pool; findings merge into one report. The cancellation flag
    /// stops scheduling new commits while in-flight units finish.
    pub fn plan(&self, cancel: &AtomicBool) -> Result<ScanReport, ScourError> {
        let repo = Repository::open(&self.repo_path)?;
        let walker = HistoryWalker::new(&repo);

        let jobs = self.options.jobs.unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| ScourError::Fatal(format!("could not build scan pool: {}", e)))?;

        info!(
            "Scanning history of {} with {} workers...",
            self.repo_path.display(),
            jobs
        );

        let mut findings = Vec::new();
        let mut failures = Vec::new();

        let commits_visited = walker.for_each_commit(cancel, |step| match step {
            CommitStep::Units { units, .. } => {
                let mut unit_findings: Vec<Finding> = pool.install(|| {
                    units
                        .par_iter()
                        .flat_map_iter(|unit| scan_unit(unit, &self.catalog))
                        .collect()
                });
                findings.append(&mut unit_findings);
            }
            CommitStep::Failed(failure) => {
                warn!("Could not scan {}: {}", failure.origin, failure.reason);
                failures.push(failure);
            }
        })?;

        info!(
            "Scan complete: {} commits, {} findings, {} failures.",
            commits_visited,
            findings.len(),
            failures.len()
        );

        Ok(ScanReport {
            commits_visited,
            findings,
            failures,
        })
    }

    /// Performs the destructive clean: snapshot, verify, rewrite.
    ///
    /// Refuses to do anything unless `confirmation` is exactly
    /// [`CONFIRMATION_TOKEN`]. Backup failures abort before any mutation.
    /// Once the rewrite engine starts, cancellation is no longer honored:
    /// the run completes or fails with the backup as the recovery path.
    pub fn apply(&self, confirmation: &str) -> Result<AppliedClean, ScourError> {
        if confirmation.trim() != CONFIRMATION_TOKEN {
            return Err(ScourError::Aborted);
        }

        let manager = BackupManager::new(&self.repo_path, self.backup_dir());
        let backup = manager.snapshot()?;
        manager.verify(&backup)?;

        let mut engine = GitHistoryEngine::open(&self.repo_path)?;
        let rewriter = RedactionRewriter::new(&self.catalog);
        let result = rewriter.run(&mut engine)?;

        info!(
            "History rewrite complete: {} commits visited, {} blobs rewritten, {} files removed, {} bytes redacted.",
            result.commits_visited, result.blobs_rewritten, result.files_removed, result.bytes_redacted
        );

        Ok(AppliedClean { backup, result })
    }
}
