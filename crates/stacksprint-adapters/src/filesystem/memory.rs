//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stacksprint_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StackSprintResult,
};

/// In-memory filesystem for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StackSprintResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self.inner.read().map_err(|_| ApplicationError::LockPoisoned)?)
    }

    fn write(&self) -> StackSprintResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self.inner.write().map_err(|_| ApplicationError::LockPoisoned)?)
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read().ok()?.files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    /// Sorted file paths.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StackSprintResult<()> {
        let mut inner = self.write()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StackSprintResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> StackSprintResult<()> {
        let mut inner = self.write()?;
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> StackSprintResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("out/a.txt"), "x").is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.write_file(Path::new("out/a.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("out/a.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_all_prunes_subtree() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out/src")).unwrap();
        fs.write_file(Path::new("out/src/a.js"), "").unwrap();
        fs.create_dir_all(Path::new("other")).unwrap();

        fs.remove_dir_all(Path::new("out")).unwrap();
        assert!(!fs.exists(Path::new("out/src/a.js")));
        assert!(!fs.exists(Path::new("out")));
        assert!(fs.exists(Path::new("other")));
    }
}
