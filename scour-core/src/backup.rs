//! backup.rs - Full-repository snapshots taken before any history rewrite.
//!
//! A snapshot is a `git bundle` of every ref and every reachable object:
//! one portable file that stock git can clone from, with no dependency on
//! this tool. Verification re-hashes the file and asks git to verify the
//! bundle without mutating the live repository. The rewrite is irreversible
//! without a verified snapshot, so the session refuses to proceed past a
//! verification failure.
//!
//! License: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::ScourError;

/// Handle to one completed snapshot.
#[derive(Debug, Clone)]
pub struct BackupHandle {
    pub bundle_path: PathBuf,
    pub created_at: DateTime<Utc>,
    /// SHA-256 of the bundle file, recorded at snapshot time.
    pub checksum: String,
}

pub struct BackupManager {
    repo_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(repo_path: P, backup_dir: Q) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            backup_dir: backup_dir.as_ref().to_path_buf(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Captures all refs and all reachable objects into a timestamped
    /// bundle file.
    pub fn snapshot(&self) -> Result<BackupHandle, ScourError> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            ScourError::Backup(format!(
                "could not create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        let created_at = Utc::now();
        let file_name = format!("scour-backup-{}.bundle", created_at.format("%Y%m%d-%H%M%S"));
        let bundle_path = self.backup_dir.join(file_name);

        info!("Creating backup bundle at {}...", bundle_path.display());
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .arg("bundle")
            .arg("create")
            .arg(&bundle_path)
            .arg("--all")
            .output()
            .map_err(|e| ScourError::Backup(format!("failed to run git bundle: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScourError::Backup(format!(
                "git bundle create failed: {}",
                stderr.trim()
            )));
        }

        let checksum = hash_file(&bundle_path)?;
        debug!("Backup bundle checksum: {}", checksum);

        Ok(BackupHandle {
            bundle_path,
            created_at,
            checksum,
        })
    }

    /// Confirms the snapshot is intact and restorable.
    ///
    /// Read-only with respect to the live repository: the bundle file is
    /// re-hashed against the recorded checksum, then `git bundle verify`
    /// test-lists its contents.
    pub fn verify(&self, handle: &BackupHandle) -> Result<(), ScourError> {
        let current = hash_file(&handle.bundle_path)?;
        if current != handle.checksum {
            return Err(ScourError::Backup(format!(
                "bundle checksum mismatch for {} (expected {}, found {})",
                handle.bundle_path.display(),
                handle.checksum,
                current
            )));
        }

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .arg("bundle")
            .arg("verify")
            .arg(&handle.bundle_path)
            .output()
            .map_err(|e| ScourError::Backup(format!("failed to run git bundle verify: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScourError::Backup(format!(
                "git bundle verify failed for {}: {}",
                handle.bundle_path.display(),
                stderr.trim()
            )));
        }

        info!("Backup verified: {}", handle.bundle_path.display());
        Ok(())
    }
}

fn hash_file(path: &Path) -> Result<String, ScourError> {
    let bytes = fs::read(path)
        .map_err(|e| ScourError::Backup(format!("could not read {}: {}", path.display(), e)))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
