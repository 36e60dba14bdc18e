use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    DomainError,
    entities::common::{RelativePath, is_under},
};

/// In-memory project layout: files with content plus directories that must
/// exist even when empty.
///
/// Invariants: every ancestor directory of every file (and of every directory)
/// is present in `directories`; no path is both a file and a directory, and
/// nothing is staged underneath a file. Backed by ordered containers so
/// iteration and serialization order never depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTree {
    files: BTreeMap<String, String>,
    directories: BTreeSet<String>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file. A later write to the same path replaces the earlier one.
    ///
    /// Fails when `path` is already a directory or lies under a file.
    pub fn add_file(
        &mut self,
        path: &RelativePath,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        if self.directories.contains(path.as_str()) {
            return Err(conflict(path, "already staged as a directory"));
        }
        self.add_ancestors(path)?;
        if self
            .files
            .insert(path.as_str().to_string(), content.into())
            .is_some()
        {
            debug!(path = %path, "File overwritten by later stage");
        }
        Ok(())
    }

    /// Stage a directory and its ancestors.
    ///
    /// Fails when `path` is already a file or lies under a file.
    pub fn add_dir(&mut self, path: &RelativePath) -> Result<(), DomainError> {
        if self.files.contains_key(path.as_str()) {
            return Err(conflict(path, "already staged as a file"));
        }
        self.add_ancestors(path)?;
        self.directories.insert(path.as_str().to_string());
        Ok(())
    }

    fn add_ancestors(&mut self, path: &RelativePath) -> Result<(), DomainError> {
        if let Some(file) = path.ancestors().find(|a| self.files.contains_key(*a)) {
            return Err(conflict(path, &format!("'{file}' is a file")));
        }
        for ancestor in path.ancestors() {
            if !self.directories.contains(ancestor) {
                self.directories.insert(ancestor.to_string());
            }
        }
        Ok(())
    }

    /// Remove a single file. Returns whether it existed.
    pub fn remove_file(&mut self, path: &RelativePath) -> bool {
        self.files.remove(path.as_str()).is_some()
    }

    /// Remove a directory and everything staged under it.
    ///
    /// Returns the number of entries removed.
    pub fn remove_prefix(&mut self, prefix: &RelativePath) -> usize {
        let prefix = prefix.as_str();
        let before = self.files.len() + self.directories.len();
        self.files.retain(|path, _| !is_under(path, prefix));
        self.directories.retain(|path| !is_under(path, prefix));
        before - (self.files.len() + self.directories.len())
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn directories(&self) -> &BTreeSet<String> {
        &self.directories
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn contains_dir(&self, path: &str) -> bool {
        self.directories.contains(path)
    }

    /// Sorted file paths.
    pub fn file_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

fn conflict(path: &RelativePath, reason: &str) -> DomainError {
    DomainError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
