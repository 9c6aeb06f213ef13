//! Shared fixture helpers: scratch repositories with planted history.
#![allow(dead_code)]

use git2::{Oid, Repository};
use std::fs;
use std::path::Path;

/// Initializes a repository with a committer identity configured.
pub fn init_repo(dir: &Path) -> Repository {
    let repo = Repository::init(dir).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Fixture").unwrap();
    config.set_str("user.email", "fixture@example.com").unwrap();
    repo
}

/// Writes the given files, stages them (and any removals), and commits on
/// HEAD. Returns the new commit id.
pub fn commit(
    repo: &Repository,
    files: &[(&str, &[u8])],
    remove: &[&str],
    message: &str,
) -> Oid {
    let sig = repo.signature().unwrap();
    let workdir = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();

    for (path, bytes) in files {
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, bytes).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }
    for path in remove {
        index.remove_path(Path::new(path)).unwrap();
        let _ = fs::remove_file(workdir.join(path));
    }
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|t| repo.find_commit(t).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Every commit reachable from the repository's refs, newest first.
pub fn all_commits(repo: &Repository) -> Vec<Oid> {
    let mut walk = repo.revwalk().unwrap();
    walk.set_sorting(git2::Sort::TIME).unwrap();
    walk.push_glob("refs/*").unwrap();
    walk.map(|o| o.unwrap()).collect()
}

/// The blob bytes for `path` in the tree of `commit`, if present.
pub fn blob_at(repo: &Repository, commit: Oid, path: &str) -> Option<Vec<u8>> {
    let tree = repo.find_commit(commit).unwrap().tree().unwrap();
    let entry = tree.get_path(Path::new(path)).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    Some(blob.content().to_vec())
}
