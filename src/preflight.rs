// src/preflight.rs

//! Synchronous precondition checks run before a step launches anything.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{BackupError, Result};
use crate::fs::FileSystem;

/// Fail unless `path` is an existing directory.
pub fn require_dir(fs: &dyn FileSystem, path: &Path, what: &str) -> Result<()> {
    if !fs.is_dir(path) {
        return Err(BackupError::precondition(format!(
            "{what} {} does not exist",
            path.display()
        )));
    }
    Ok(())
}

/// Fail unless `path` is an existing file.
pub fn require_file(fs: &dyn FileSystem, path: &Path, what: &str) -> Result<()> {
    if !fs.is_file(path) {
        return Err(BackupError::precondition(format!(
            "{what} {} does not exist",
            path.display()
        )));
    }
    Ok(())
}

/// Resolve a user-supplied directory against the project root.
///
/// Absolute paths are returned unchanged.
pub fn resolve_under(root: &Path, dir: &Path) -> PathBuf {
    root.join(dir)
}

/// Make sure `dir` exists, creating it when missing.
///
/// Returns `true` if the directory had to be created. With `create == false`
/// (dry runs) nothing is touched and the would-be creation is only logged.
pub fn ensure_dir(fs: &dyn FileSystem, dir: &Path, create: bool) -> Result<bool> {
    if fs.is_dir(dir) {
        return Ok(false);
    }
    if fs.exists(dir) {
        return Err(BackupError::precondition(format!(
            "{} exists but is not a directory",
            dir.display()
        )));
    }
    if !create {
        info!(dir = %dir.display(), "directory is missing and would be created");
        return Ok(true);
    }

    fs.create_dir_all(dir).map_err(|e| {
        BackupError::precondition(format!("could not create directory {}: {e:#}", dir.display()))
    })?;
    info!(dir = %dir.display(), "directory was missing, created it");
    Ok(true)
}
