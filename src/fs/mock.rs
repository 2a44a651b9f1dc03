// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for orchestrator tests.
///
/// Paths are stored as given; no normalisation is performed, so tests should
/// use the same absolute paths they pass to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    created: Arc<Mutex<Vec<PathBuf>>>,
    /// Paths for which `create_dir_all` fails.
    read_only: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.lock_entries().insert(path.to_path_buf(), MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert_dirs(path.as_ref());
    }

    /// Make `create_dir_all` fail for this path.
    pub fn deny_create(&self, path: impl AsRef<Path>) {
        self.read_only
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.as_ref().to_path_buf());
    }

    /// Directories created through [`FileSystem::create_dir_all`], in order.
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn insert_dirs(&self, path: &Path) {
        let mut entries = self.lock_entries();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock_entries().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock_entries().get(path), Some(MockEntry::File))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock_entries().get(path), Some(MockEntry::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let denied = self
            .read_only
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|p| p == path);
        if denied {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if self.is_file(path) {
            return Err(anyhow!("File exists: {:?}", path));
        }
        self.insert_dirs(path);
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_path_buf());
        Ok(())
    }
}
