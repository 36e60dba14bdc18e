//! Materializer - writes generation output through the `Filesystem` port.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::entities::{FileTree, GenerationResult},
    error::{StackSprintError, StackSprintResult},
};

pub const POSIX_SCRIPT: &str = "scaffold.sh";
pub const POWERSHELL_SCRIPT: &str = "scaffold.ps1";
pub const RESULT_JSON: &str = "stacksprint.json";

pub struct Materializer {
    filesystem: Box<dyn Filesystem>,
}

impl Materializer {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write the tree under `root`.
    ///
    /// Fails with `ProjectExists` when `root` exists and `force` is off. If
    /// writing fails and this call created `root`, it is removed again.
    #[instrument(skip(self, tree), fields(root = %root.display(), files = tree.file_count()))]
    pub fn apply(&self, tree: &FileTree, root: &Path, force: bool) -> StackSprintResult<()> {
        let existed = self.filesystem.exists(root);
        if existed && !force {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }

        match self.write_tree(tree, root) {
            Ok(()) => {
                info!("Tree written");
                Ok(())
            }
            Err(e) if !existed => {
                warn!("Write failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Write `scaffold.sh`, `scaffold.ps1` and `stacksprint.json` into
    /// `out_dir`. Returns the written paths.
    #[instrument(skip(self, result), fields(out_dir = %out_dir.display()))]
    pub fn write_bundle(
        &self,
        result: &GenerationResult,
        out_dir: &Path,
    ) -> StackSprintResult<Vec<PathBuf>> {
        let json = result.to_json().map_err(|e| StackSprintError::Internal {
            message: format!("result serialization failed: {e}"),
        })?;

        self.filesystem.create_dir_all(out_dir)?;

        let posix = out_dir.join(POSIX_SCRIPT);
        self.filesystem.write_file(&posix, &result.bash_script)?;
        self.filesystem.set_permissions(&posix, true)?;

        let powershell = out_dir.join(POWERSHELL_SCRIPT);
        self.filesystem
            .write_file(&powershell, &result.powershell_script)?;

        let manifest = out_dir.join(RESULT_JSON);
        self.filesystem.write_file(&manifest, &json)?;

        Ok(vec![posix, powershell, manifest])
    }

    fn write_tree(&self, tree: &FileTree, root: &Path) -> StackSprintResult<()> {
        self.filesystem.create_dir_all(root)?;

        // Directory set is ancestor-closed, so every parent exists before its files.
        for dir in tree.directories() {
            self.filesystem.create_dir_all(&root.join(dir))?;
        }
        for (path, content) in tree.files() {
            self.filesystem.write_file(&root.join(path), content)?;
        }
        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RelativePath;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// Records writes; fails any write whose path contains `fail_on`.
    #[derive(Clone, Default)]
    struct Recording {
        state: Arc<Mutex<State>>,
        fail_on: Option<&'static str>,
    }

    #[derive(Default)]
    struct State {
        dirs: Vec<PathBuf>,
        files: BTreeMap<PathBuf, String>,
        executables: Vec<PathBuf>,
        removed: Vec<PathBuf>,
        existing: Vec<PathBuf>,
    }

    impl Filesystem for Recording {
        fn create_dir_all(&self, path: &Path) -> StackSprintResult<()> {
            self.state.lock().unwrap().dirs.push(path.to_path_buf());
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> StackSprintResult<()> {
            if self.fail_on.is_some_and(|f| path.to_string_lossy().contains(f)) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into());
            }
            self.state
                .lock()
                .unwrap()
                .files
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn set_permissions(&self, path: &Path, executable: bool) -> StackSprintResult<()> {
            if executable {
                self.state.lock().unwrap().executables.push(path.to_path_buf());
            }
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.state.lock().unwrap().existing.iter().any(|p| p == path)
        }

        fn remove_dir_all(&self, path: &Path) -> StackSprintResult<()> {
            self.state.lock().unwrap().removed.push(path.to_path_buf());
            Ok(())
        }
    }

    fn tree() -> FileTree {
        let mut tree = FileTree::new();
        tree.add_file(&RelativePath::parse("src/index.js").unwrap(), "x").unwrap();
        tree.add_file(&RelativePath::parse("README.md").unwrap(), "y").unwrap();
        tree
    }

    #[test]
    fn writes_directories_then_files() {
        let fs = Recording::default();
        Materializer::new(Box::new(fs.clone()))
            .apply(&tree(), Path::new("/out/app"), false)
            .unwrap();

        let state = fs.state.lock().unwrap();
        assert!(state.dirs.contains(&PathBuf::from("/out/app/src")));
        assert_eq!(state.files[&PathBuf::from("/out/app/README.md")], "y");
    }

    #[test]
    fn refuses_existing_root_without_force() {
        let fs = Recording::default();
        fs.state.lock().unwrap().existing.push(PathBuf::from("/out/app"));
        let materializer = Materializer::new(Box::new(fs.clone()));

        let err = materializer.apply(&tree(), Path::new("/out/app"), false).unwrap_err();
        assert!(matches!(
            err,
            StackSprintError::Application(ApplicationError::ProjectExists { .. })
        ));
        assert!(materializer.apply(&tree(), Path::new("/out/app"), true).is_ok());
    }

    #[test]
    fn rolls_back_a_root_it_created() {
        let fs = Recording {
            fail_on: Some("index.js"),
            ..Recording::default()
        };
        let result = Materializer::new(Box::new(fs.clone())).apply(&tree(), Path::new("/out/app"), false);

        assert!(result.is_err());
        assert_eq!(fs.state.lock().unwrap().removed, vec![PathBuf::from("/out/app")]);
    }

    #[test]
    fn never_removes_a_pre_existing_root() {
        let fs = Recording {
            fail_on: Some("index.js"),
            ..Recording::default()
        };
        fs.state.lock().unwrap().existing.push(PathBuf::from("/srv"));
        let result = Materializer::new(Box::new(fs.clone())).apply(&tree(), Path::new("/srv"), true);

        assert!(result.is_err());
        assert!(fs.state.lock().unwrap().removed.is_empty());
    }

    #[test]
    fn bundle_marks_posix_script_executable() {
        let fs = Recording::default();
        let result = GenerationResult {
            file_paths: vec![],
            tree: FileTree::new(),
            bash_script: "#!/usr/bin/env sh\n".into(),
            powershell_script: "$ErrorActionPreference = 'Stop'\n".into(),
            warnings: vec![],
            decisions: vec![],
        };
        let written = Materializer::new(Box::new(fs.clone()))
            .write_bundle(&result, Path::new("out"))
            .unwrap();

        assert_eq!(written.len(), 3);
        let state = fs.state.lock().unwrap();
        assert_eq!(state.executables, vec![PathBuf::from("out/scaffold.sh")]);
        assert!(state.files[&PathBuf::from("out/stacksprint.json")].ends_with('\n'));
    }
}
