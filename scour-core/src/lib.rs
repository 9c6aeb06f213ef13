// scour-core/src/lib.rs
//! # Scour Core Library
//!
//! `scour-core` provides the logic for finding credentials committed to a
//! git history and rewriting that history so the matched content is gone
//! for good. It defines the detection-rule catalog, a byte-level content
//! scanner, a full-history walker, a pre-rewrite backup manager, and the
//! redaction rewriter that drives a pluggable history-rewrite engine.
//!
//! The library is non-interactive by design: confirmation prompts and
//! progress display belong to the caller. The two-call session API keeps
//! the destructive step explicit.
//!
//! ## Modules
//!
//! * `config`: Defines `DetectionRule`s and `CatalogConfig` for specifying sensitive patterns.
//! * `catalog`: Compiles a catalog into the immutable matcher form passed to scanner and rewriter.
//! * `scanner`: Pure, byte-safe application of the catalog to one content unit.
//! * `finding`: Content units, findings, and per-unit failure records.
//! * `walker`: Newest-first enumeration of every commit message and changed blob.
//! * `backup`: Full `git bundle` snapshots, verified before any rewrite.
//! * `engine`: The history-rewrite engine contract (transform callbacks + path predicate).
//! * `engines`: Concrete engine implementations (the git object-database engine).
//! * `rewrite`: The redaction transformation and the audit summary it produces.
//! * `session`: `plan()` / `apply(confirmation)` orchestration for callers.
//!
//! ## Usage Example
//!
//! ```no_run
//! use scour_core::{CatalogConfig, ScrubSession, SessionOptions, CONFIRMATION_TOKEN};
//! use std::sync::atomic::AtomicBool;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = CatalogConfig::load_default()?;
//!     let session = ScrubSession::new("/path/to/repo", &config, SessionOptions::default())?;
//!
//!     // Read-only pass: walk the whole history and report findings.
//!     let cancel = AtomicBool::new(false);
//!     let report = session.plan(&cancel)?;
//!     for finding in &report.findings {
//!         println!("[{}] rule={}", finding.origin.short_commit(), finding.rule_id);
//!     }
//!
//!     // Destructive pass: backup, verify, rewrite. Requires the literal token.
//!     if report.has_findings() {
//!         let applied = session.apply(CONFIRMATION_TOKEN)?;
//!         println!("redacted {} bytes", applied.result.bytes_redacted);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations surface [`ScourError`]. Load-time rule problems
//! are fatal before any repository access; per-unit scan failures are
//! collected into the report instead of aborting the walk; backup and
//! engine failures refuse or halt the destructive path.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod backup;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod finding;
pub mod rewrite;
pub mod scanner;
pub mod session;
pub mod walker;

/// Re-exports the public configuration types and functions for managing the
/// detection catalog.
pub use config::{
    merge_catalogs,
    CatalogConfig,
    DetectionRule,
    RuleCategory,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ScourError;

/// Re-exports the compiled catalog and the redaction marker constant.
pub use catalog::{CompiledCatalog, CompiledRule, REDACTION_MARKER};

/// Re-exports content-unit and finding types.
pub use finding::{ContentUnit, Finding, ScanFailure, UnitOrigin};

/// Re-exports the scanner entry point.
pub use scanner::scan_unit;

/// Re-exports the walker types.
pub use walker::{CommitStep, HistoryWalker};

/// Re-exports backup management.
pub use backup::{BackupHandle, BackupManager};

/// Re-exports the rewrite-engine contract and the git-backed engine.
pub use engine::{HistoryFilter, HistoryRewriteEngine};
pub use engines::GitHistoryEngine;

/// Re-exports the redaction transformation and its audit summary.
pub use rewrite::{redact_bytes, RedactionRewriter, RewriteResult};

/// Re-exports the session API for one-shot, non-interactive use.
pub use session::{
    AppliedClean,
    ScanReport,
    ScrubSession,
    SessionOptions,
    CONFIRMATION_TOKEN,
};
