//! walker.rs - Enumerates scannable content units across a full history.
//!
//! The walker yields one commit-message unit per commit plus one blob unit
//! per (commit, changed path) pair, commits in newest-first log order. A
//! corrupt or unreadable commit is surfaced as a recoverable failure record
//! and the traversal continues; only repository-level errors (the revwalk
//! itself failing to start) abort the walk.
//!
//! License: MIT OR Apache-2.0

use git2::{Oid, Repository, Sort};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::ScourError;
use crate::finding::{ContentUnit, ScanFailure, UnitOrigin};

/// One step of the walk: either the units of one commit, or the reason that
/// commit could not be read.
pub enum CommitStep {
    Units { commit: Oid, units: Vec<ContentUnit> },
    Failed(ScanFailure),
}

pub struct HistoryWalker<'repo> {
    repo: &'repo Repository,
}

impl<'repo> HistoryWalker<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self { repo }
    }

    /// Drives one full traversal, invoking `visit` once per commit.
    ///
    /// Returns the number of commits visited. The sequence is lazy, finite,
    /// and non-restartable; the cancellation flag is checked between commits
    /// and stops scheduling new ones while letting the in-flight step
    /// finish.
    pub fn for_each_commit<F>(
        &self,
        cancel: &AtomicBool,
        mut visit: F,
    ) -> Result<usize, ScourError>
    where
        F: FnMut(CommitStep),
    {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        // Every ref, so nothing reachable escapes the scan. The revwalk
        // deduplicates commits reachable from several refs.
        walk.push_glob("refs/*")?;
        if self.repo.head().is_ok() {
            walk.push_head()?;
        }

        let mut visited = 0usize;
        for oid_result in walk {
            if cancel.load(Ordering::Relaxed) {
                info!("Cancellation requested; stopping history walk after {} commits.", visited);
                break;
            }

            let oid = match oid_result {
                Ok(oid) => oid,
                Err(e) => {
                    visit(CommitStep::Failed(ScanFailure {
                        origin: "history traversal".to_string(),
                        reason: e.to_string(),
                    }));
                    continue;
                }
            };

            match self.collect_units(oid) {
                Ok(units) => visit(CommitStep::Units { commit: oid, units }),
                Err(e) => visit(CommitStep::Failed(ScanFailure {
                    origin: oid.to_string(),
                    reason: e.to_string(),
                })),
            }
            visited += 1;

            if visited % 500 == 0 {
                info!("Scanned {} commits so far...", visited);
            }
        }

        debug!("History walk finished. Commits visited: {}.", visited);
        Ok(visited)
    }

    /// The message unit plus one blob unit per path the commit changed
    /// relative to its first parent (the full tree for a root commit).
    fn collect_units(&self, oid: Oid) -> Result<Vec<ContentUnit>, git2::Error> {
        let commit = self.repo.find_commit(oid)?;
        let sha = oid.to_string();

        let mut units = vec![ContentUnit {
            origin: UnitOrigin::CommitMessage { commit: sha.clone() },
            bytes: commit.message_raw_bytes().to_vec(),
        }];

        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        for delta in diff.deltas() {
            let new_file = delta.new_file();
            if new_file.id().is_zero() {
                continue; // deletion: nothing on the new side to scan
            }
            let Some(path) = new_file.path() else { continue };

            let blob = match self.repo.find_blob(new_file.id()) {
                Ok(blob) => blob,
                Err(e) => {
                    // Submodule entries and such carry non-blob ids.
                    debug!("Skipping non-blob entry {}: {}", path.display(), e);
                    continue;
                }
            };

            units.push(ContentUnit {
                origin: UnitOrigin::Blob {
                    commit: sha.clone(),
                    path: path.to_string_lossy().into_owned(),
                },
                bytes: blob.content().to_vec(),
            });
        }

        Ok(units)
    }
}
