//! Snapshot and verification behavior of the backup manager, including
//! restorability with stock git. Requires a `git` binary on PATH.

mod common;

use git2::Repository;
use std::fs;
use std::process::Command;

use scour_core::BackupManager;
use tempfile::TempDir;

#[test]
fn snapshot_writes_bundle_and_verify_accepts_it() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, &[("README.md", b"docs\n")], &[], "initial import");
    drop(repo);

    let backups = TempDir::new().unwrap();
    let manager = BackupManager::new(dir.path(), backups.path());

    let handle = manager.snapshot().unwrap();
    assert!(handle.bundle_path.exists());
    assert!(handle
        .bundle_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("scour-backup-"));
    assert_eq!(handle.checksum.len(), 64);

    manager.verify(&handle).unwrap();
}

#[test]
fn verify_rejects_a_tampered_bundle() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, &[("README.md", b"docs\n")], &[], "initial import");
    drop(repo);

    let backups = TempDir::new().unwrap();
    let manager = BackupManager::new(dir.path(), backups.path());
    let handle = manager.snapshot().unwrap();

    let mut bytes = fs::read(&handle.bundle_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&handle.bundle_path, &bytes).unwrap();

    let err = manager.verify(&handle).unwrap_err();
    assert!(err.to_string().contains("checksum mismatch"));
}

#[test]
fn bundle_restores_the_pre_snapshot_state_with_stock_git() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, &[("README.md", b"docs\n")], &[], "initial import");
    let head = common::commit(&repo, &[("src/lib.rs", b"pub fn f() {}\n")], &[], "add lib");
    drop(repo);

    let backups = TempDir::new().unwrap();
    let manager = BackupManager::new(dir.path(), backups.path());
    let handle = manager.snapshot().unwrap();
    manager.verify(&handle).unwrap();

    let restore = TempDir::new().unwrap();
    let restore_path = restore.path().join("restored");
    let status = Command::new("git")
        .arg("clone")
        .arg(&handle.bundle_path)
        .arg(&restore_path)
        .output()
        .unwrap();
    assert!(status.status.success(), "git clone from bundle failed");

    let restored = Repository::open(&restore_path).unwrap();
    assert_eq!(restored.head().unwrap().peel_to_commit().unwrap().id(), head);
    assert_eq!(
        common::blob_at(&restored, head, "README.md").unwrap(),
        b"docs\n".to_vec()
    );
}
