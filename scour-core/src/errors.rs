//! errors.rs - Custom error types for the scour-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `scour-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScourError {
    /// A detection rule failed structural validation at load time.
    #[error("Invalid rule '{0}': {1}")]
    InvalidRule(String, String),

    #[error("Failed to compile detection rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to compile {0} rule(s):\n{1}")]
    CatalogCompilation(usize, String),

    /// Snapshot creation or verification failed. A clean run must be refused.
    #[error("Backup failed: {0}")]
    Backup(String),

    /// The history rewrite engine reported a structural failure mid-rewrite.
    /// There is no automatic rollback; the pre-rewrite backup is the sole
    /// recovery path.
    #[error("History rewrite engine failed: {0}")]
    RewriteEngine(String),

    /// The operation was cancelled before any destructive step.
    #[error("Operation aborted before any history mutation")]
    Aborted,

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
