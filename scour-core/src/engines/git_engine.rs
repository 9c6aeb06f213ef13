// scour-core/src/engines/git_engine.rs
//! A `HistoryRewriteEngine` implementation working directly on the git
//! object database.
//!
//! Commits are rebuilt by splicing their raw object bytes: the tree and
//! parent headers are remapped onto the rewritten graph, GPG signature
//! headers are dropped (they could not survive a rewrite), and the message
//! body is passed through the filter byte-for-byte. Author, committer, and
//! encoding headers survive untouched, so a commit whose content matches
//! nothing keeps its identity bit-for-bit except for remapped ancestry.
//!
//! License: MIT OR APACHE 2.0

use git2::{ObjectType, Oid, Repository, Sort};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

use crate::engine::{HistoryFilter, HistoryRewriteEngine};
use crate::errors::ScourError;

pub struct GitHistoryEngine {
    repo: Repository,
}

struct RewriteState {
    commit_map: HashMap<Oid, Oid>,
    blob_map: HashMap<Oid, Oid>,
    tree_map: HashMap<(Oid, String), Oid>,
}

impl GitHistoryEngine {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScourError> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    fn rewrite_inner(&self, filter: &dyn HistoryFilter) -> Result<usize, git2::Error> {
        let mut state = RewriteState {
            commit_map: HashMap::new(),
            blob_map: HashMap::new(),
            tree_map: HashMap::new(),
        };

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        walk.push_glob("refs/*")?;
        if self.repo.head().is_ok() {
            walk.push_head()?;
        }

        // Oldest-first, so every parent is rewritten before its children.
        for oid_result in walk {
            let oid = oid_result?;
            let new_oid = self.rewrite_commit(oid, filter, &mut state)?;
            state.commit_map.insert(oid, new_oid);
        }

        let commits = state.commit_map.len();
        info!("Rewrote {} commits; moving refs onto the new graph.", commits);

        self.retarget_refs(filter, &state)?;
        Ok(commits)
    }

    fn rewrite_commit(
        &self,
        oid: Oid,
        filter: &dyn HistoryFilter,
        state: &mut RewriteState,
    ) -> Result<Oid, git2::Error> {
        let commit = self.repo.find_commit(oid)?;
        let new_tree = self.rewrite_tree(commit.tree_id(), "", filter, state)?;

        let new_parents: Vec<Oid> = commit
            .parent_ids()
            .map(|p| state.commit_map.get(&p).copied().unwrap_or(p))
            .collect();

        let odb = self.repo.odb()?;
        let raw = odb.read(oid)?;
        let spliced = splice_commit(raw.data(), new_tree, &new_parents, filter);
        let new_oid = odb.write(ObjectType::Commit, &spliced)?;

        if new_oid != oid {
            debug!("Commit {} rewritten as {}", oid, new_oid);
        }
        Ok(new_oid)
    }

    /// Rebuilds one tree, recursing into subtrees. The path prefix travels
    /// with the recursion because sensitive-file globs match full
    /// repository-relative paths, so an identical subtree can rewrite
    /// differently under different prefixes.
    fn rewrite_tree(
        &self,
        tree_oid: Oid,
        prefix: &str,
        filter: &dyn HistoryFilter,
        state: &mut RewriteState,
    ) -> Result<Oid, git2::Error> {
        let cache_key = (tree_oid, prefix.to_string());
        if let Some(cached) = state.tree_map.get(&cache_key) {
            return Ok(*cached);
        }

        let tree = self.repo.find_tree(tree_oid)?;
        let mut builder = self.repo.treebuilder(None)?;

        for entry in tree.iter() {
            let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
            let path = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };

            match entry.kind() {
                Some(ObjectType::Tree) => {
                    let sub = self.rewrite_tree(entry.id(), &path, filter, state)?;
                    // A subtree can empty out when every file under it was
                    // sensitive; git has no use for an empty tree entry.
                    if self.repo.find_tree(sub)?.len() == 0 {
                        debug!("Dropping emptied subtree {}/", path);
                        continue;
                    }
                    builder.insert(entry.name_bytes(), sub, entry.filemode())?;
                }
                Some(ObjectType::Blob) => {
                    if filter.drop_path(&path) {
                        continue;
                    }
                    let new_blob = match state.blob_map.get(&entry.id()) {
                        Some(mapped) => *mapped,
                        None => {
                            let blob = self.repo.find_blob(entry.id())?;
                            let transformed = filter.transform_blob(blob.content());
                            let mapped = if transformed.as_slice() == blob.content() {
                                entry.id()
                            } else {
                                self.repo.blob(&transformed)?
                            };
                            state.blob_map.insert(entry.id(), mapped);
                            mapped
                        }
                    };
                    builder.insert(entry.name_bytes(), new_blob, entry.filemode())?;
                }
                // Submodule (commit) entries and anything exotic pass
                // through unchanged.
                _ => {
                    builder.insert(entry.name_bytes(), entry.id(), entry.filemode())?;
                }
            }
        }

        let new_oid = builder.write()?;
        state.tree_map.insert(cache_key, new_oid);
        Ok(new_oid)
    }

    fn retarget_refs(
        &self,
        filter: &dyn HistoryFilter,
        state: &RewriteState,
    ) -> Result<(), git2::Error> {
        let names: Vec<String> = self
            .repo
            .references()?
            .filter_map(|r| r.ok())
            .filter_map(|r| r.name().map(String::from))
            .filter(|n| n.starts_with("refs/heads/") || n.starts_with("refs/tags/"))
            .collect();

        for name in names {
            let reference = self.repo.find_reference(&name)?;
            let Some(target) = reference.target() else {
                continue; // symbolic refs follow their targets
            };

            if let Ok(tag) = self.repo.find_tag(target) {
                let Some(new_commit) = state.commit_map.get(&tag.target_id()) else {
                    continue;
                };
                let odb = self.repo.odb()?;
                let raw = odb.read(target)?;
                let spliced = splice_tag(raw.data(), *new_commit, filter);
                let new_tag = odb.write(ObjectType::Tag, &spliced)?;
                self.repo
                    .reference(&name, new_tag, true, "scour: history rewrite")?;
                debug!("Annotated tag {} respliced as {}", name, new_tag);
            } else if let Some(new_target) = state.commit_map.get(&target) {
                self.repo
                    .reference(&name, *new_target, true, "scour: history rewrite")?;
                debug!("Ref {} moved to {}", name, new_target);
            }
        }

        if self.repo.head_detached().unwrap_or(false) {
            if let Ok(head) = self.repo.head() {
                if let Some(target) = head.target() {
                    if let Some(new_target) = state.commit_map.get(&target) {
                        self.repo.set_head_detached(*new_target)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl HistoryRewriteEngine for GitHistoryEngine {
    fn rewrite(&mut self, filter: &dyn HistoryFilter) -> Result<usize, ScourError> {
        self.rewrite_inner(filter)
            .map_err(|e| ScourError::RewriteEngine(e.to_string()))
    }
}

/// Splits a raw commit or tag object into its header block and message.
fn split_at_blank_line(raw: &[u8]) -> (&[u8], &[u8]) {
    raw.windows(2)
        .position(|w| w == b"\n\n")
        .map(|i| (&raw[..i], &raw[i + 2..]))
        .unwrap_or((raw, &b""[..]))
}

/// Rebuilds a raw commit object: remapped tree and parents, signature
/// headers stripped, message passed through the filter. All other headers
/// are copied byte-for-byte.
fn splice_commit(
    raw: &[u8],
    new_tree: Oid,
    new_parents: &[Oid],
    filter: &dyn HistoryFilter,
) -> Vec<u8> {
    let (headers, message) = split_at_blank_line(raw);
    let mut out = Vec::with_capacity(raw.len() + 64);

    out.extend_from_slice(format!("tree {}\n", new_tree).as_bytes());
    for parent in new_parents {
        out.extend_from_slice(format!("parent {}\n", parent).as_bytes());
    }

    let mut skipping_continuation = false;
    for line in headers.split(|&b| b == b'\n') {
        if line.first() == Some(&b' ') {
            // Continuation of a multi-line header.
            if !skipping_continuation {
                out.extend_from_slice(line);
                out.push(b'\n');
            }
            continue;
        }
        skipping_continuation = false;
        if line.starts_with(b"tree ") || line.starts_with(b"parent ") {
            continue;
        }
        if line.starts_with(b"gpgsig") {
            skipping_continuation = true;
            continue;
        }
        out.extend_from_slice(line);
        out.push(b'\n');
    }

    out.push(b'\n');
    out.extend_from_slice(&filter.transform_message(message));
    out
}

/// Rebuilds a raw annotated-tag object onto its rewritten target.
fn splice_tag(raw: &[u8], new_target: Oid, filter: &dyn HistoryFilter) -> Vec<u8> {
    let (headers, message) = split_at_blank_line(raw);
    let mut out = Vec::with_capacity(raw.len() + 16);

    for line in headers.split(|&b| b == b'\n') {
        if line.starts_with(b"object ") {
            out.extend_from_slice(format!("object {}\n", new_target).as_bytes());
        } else {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
    }

    out.push(b'\n');
    out.extend_from_slice(&filter.transform_message(message));
    out
}
