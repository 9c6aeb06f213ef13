// scour/tests/cli_clean_tests.rs
//! CLI integration tests for `scour clean`: the confirmation gate, the
//! backup bundle, and the rewritten history. Requires a `git` binary on
//! PATH for the backup step.

use assert_cmd::Command;
use git2::Repository;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_repo(dir: &Path) -> Repository {
    let repo = Repository::init(dir).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Fixture").unwrap();
    config.set_str("user.email", "fixture@example.com").unwrap();
    repo
}

fn commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) {
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
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|t| repo.find_commit(t).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

fn planted_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    commit(&repo, &[("README.md", b"docs\n")], "initial import");
    commit(
        &repo,
        &[(".env", b"API_TOKEN=abcdefghijklmnop\n")],
        "configure service\n\napi_key: abcdef0123456789\n",
    );
    dir
}

fn head_message(path: &Path) -> Vec<u8> {
    let repo = Repository::open(path).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    head.message_raw_bytes().to_vec()
}

fn scour() -> Command {
    let mut cmd = Command::cargo_bin("scour").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn clean_with_wrong_token_touches_nothing() {
    let dir = planted_repo();
    let backups = TempDir::new().unwrap();
    let before = head_message(dir.path());

    scour()
        .arg("clean")
        .arg(dir.path())
        .args(["--backup-dir", backups.path().to_str().unwrap()])
        .args(["--confirm", "yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing was touched"));

    assert_eq!(head_message(dir.path()), before);
    assert!(fs::read_dir(backups.path()).unwrap().next().is_none());
}

#[test]
fn clean_rewrites_history_and_leaves_a_backup() {
    let dir = planted_repo();
    let backups = TempDir::new().unwrap();

    scour()
        .arg("clean")
        .arg(dir.path())
        .args(["--backup-dir", backups.path().to_str().unwrap()])
        .args(["--confirm", "DELETE HISTORY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rule=api_key_assignment"))
        .stderr(predicate::str::contains("History rewritten"))
        .stderr(predicate::str::contains("Rotate every credential"));

    assert_eq!(
        head_message(dir.path()),
        b"configure service\n\n***REMOVED***\n".to_vec()
    );

    // The sensitive file is gone from the rewritten tree.
    let repo = Repository::open(dir.path()).unwrap();
    let tree = repo.head().unwrap().peel_to_commit().unwrap().tree().unwrap();
    assert!(tree.get_path(Path::new(".env")).is_err());

    // Exactly one bundle landed in the backup directory.
    let bundles: Vec<_> = fs::read_dir(backups.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(bundles.len(), 1);
    assert!(bundles[0].starts_with("scour-backup-") && bundles[0].ends_with(".bundle"));
}

#[test]
fn clean_accepts_the_token_on_stdin() {
    let dir = planted_repo();
    let backups = TempDir::new().unwrap();

    scour()
        .arg("clean")
        .arg(dir.path())
        .args(["--backup-dir", backups.path().to_str().unwrap()])
        .write_stdin("DELETE HISTORY\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("History rewritten"));

    assert_eq!(
        head_message(dir.path()),
        b"configure service\n\n***REMOVED***\n".to_vec()
    );
}

#[test]
fn clean_of_a_clean_repo_does_nothing() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    commit(&repo, &[("README.md", b"docs\n")], "initial import");
    let before = head_message(dir.path());

    scour()
        .arg("clean")
        .arg(dir.path())
        .args(["--confirm", "DELETE HISTORY"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing to clean"));

    assert_eq!(head_message(dir.path()), before);
}
