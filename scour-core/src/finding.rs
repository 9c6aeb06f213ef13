// scour-core/src/finding.rs
//! Provides core data structures for content units, scan findings, and
//! per-unit scan failures within the `scour-core` library.

use serde::Serialize;
use std::fmt;

use crate::config::RuleCategory;

/// Where a piece of historical content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UnitOrigin {
    /// The full message of one commit.
    CommitMessage { commit: String },
    /// One file blob as recorded by one commit.
    Blob { commit: String, path: String },
}

impl UnitOrigin {
    /// The full hex id of the commit this unit belongs to.
    pub fn commit(&self) -> &str {
        match self {
            UnitOrigin::CommitMessage { commit } => commit,
            UnitOrigin::Blob { commit, .. } => commit,
        }
    }

    /// Abbreviated commit id for display.
    pub fn short_commit(&self) -> &str {
        let commit = self.commit();
        &commit[..commit.len().min(7)]
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            UnitOrigin::CommitMessage { .. } => None,
            UnitOrigin::Blob { path, .. } => Some(path),
        }
    }
}

impl fmt::Display for UnitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnitOrigin::CommitMessage { commit } => write!(f, "{} (message)", commit),
            UnitOrigin::Blob { commit, path } => write!(f, "{} {}", commit, path),
        }
    }
}

/// The atomic thing scanned or rewritten: one commit message or one blob.
///
/// Bytes are owned here because the underlying git object handle does not
/// outlive the walk step that produced it. Blob content may be binary; no
/// consumer may assume valid UTF-8.
#[derive(Debug, Clone)]
pub struct ContentUnit {
    pub origin: UnitOrigin,
    pub bytes: Vec<u8>,
}

/// A reported match of one detection rule against one content unit.
///
/// Findings are ephemeral: produced by the scanner, consumed for reporting
/// and for the proceed/abort decision, never persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: RuleCategory,
    pub origin: UnitOrigin,
    /// Byte offsets of the matched span within the unit.
    pub start: usize,
    pub end: usize,
    /// Safe-to-print stand-in for the matched bytes.
    pub preview: String,
}

/// A per-unit scan failure, collected into the report instead of aborting
/// the walk.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub origin: String,
    pub reason: String,
}

/// Builds a display preview that never leaks the matched bytes themselves.
pub fn redacted_preview(matched: &[u8]) -> String {
    const MAX_LEN: usize = 8;
    if matched.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} bytes]", matched.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_preview_short_match() {
        assert_eq!(redacted_preview(b"abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redacted_preview_long_match() {
        assert_eq!(redacted_preview(b"123456789"), "[REDACTED: 9 bytes]".to_string());
    }

    #[test]
    fn test_origin_short_commit() {
        let origin = UnitOrigin::Blob {
            commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            path: ".env".to_string(),
        };
        assert_eq!(origin.short_commit(), "0123456");
        assert_eq!(origin.path(), Some(".env"));
    }
}
