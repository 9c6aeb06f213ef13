// scour-core/src/engine.rs
//! Defines the history-rewrite engine contract.
//!
//! The engine is the collaborator that owns the mechanics of rewriting the
//! object graph: recomputing object identities, rewiring parent links, and
//! moving refs. The core drives it through the narrow `HistoryFilter`
//! callback contract and never depends on how a particular engine does its
//! work, so the correctness of redaction is independent of any one rewrite
//! tool.
//!
//! License: MIT OR APACHE 2.0

use crate::errors::ScourError;

/// The callback contract an engine honors exactly once per relevant
/// historical object.
///
/// Implementations must be pure given their input bytes: an engine is free
/// to invoke these concurrently for independent objects, so no mutable
/// state may be shared between invocations beyond atomics.
pub trait HistoryFilter: Sync {
    /// Transforms one commit (or tag) message.
    fn transform_message(&self, raw: &[u8]) -> Vec<u8>;

    /// Transforms one blob's content.
    fn transform_blob(&self, raw: &[u8]) -> Vec<u8>;

    /// True when the repository-relative path must be excluded from every
    /// rewritten tree.
    fn drop_path(&self, path: &str) -> bool;
}

/// A subsystem that rewrites an entire history under a `HistoryFilter`.
///
/// The rewrite is single-writer: engines mutate a shared object graph and
/// must not be invoked concurrently. A structural failure is fatal; the
/// engine makes no attempt to roll back, leaving the pre-rewrite backup as
/// the sole path to recovery.
pub trait HistoryRewriteEngine {
    /// Rewrites every reachable commit, tree, and blob, then moves refs to
    /// the rewritten graph. Returns the number of commits visited.
    fn rewrite(&mut self, filter: &dyn HistoryFilter) -> Result<usize, ScourError>;
}
