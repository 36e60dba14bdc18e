//! Filesystem-backed template provider.
//!
//! Logical paths map onto files under a root directory:
//!
//! ```text
//! templates/
//! ├── common/README.md.tmpl
//! ├── go/
//! │   ├── gin/main.go.tmpl
//! │   └── Dockerfile.tmpl
//! └── python/
//!     └── fastapi/main.py.tmpl
//! ```

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use stacksprint_core::{
    application::{ApplicationError, TemplateFailure, ports::TemplateProvider},
    domain::stack::TemplateContext,
    error::StackSprintResult,
};

use crate::renderer::render_source;

#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    /// Fails when `root` is not an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> StackSprintResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ApplicationError::TemplateRoot {
                path: root,
                reason: "not an existing directory".into(),
            }
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path under the root; escaping paths count as not found.
    fn resolve(&self, logical_path: &str) -> StackSprintResult<PathBuf> {
        let relative = Path::new(logical_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if logical_path.is_empty() || escapes {
            return Err(ApplicationError::template(
                logical_path,
                TemplateFailure::NotFound,
                "logical paths must stay inside the template root",
            )
            .into());
        }
        Ok(self.root.join(relative))
    }
}

impl TemplateProvider for DirectoryTemplates {
    #[instrument(skip(self, context), fields(root = %self.root.display()))]
    fn render(&self, logical_path: &str, context: &TemplateContext) -> StackSprintResult<String> {
        let path = self.resolve(logical_path)?;
        let source = fs::read_to_string(&path).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => format!("no file at {}", path.display()),
                _ => format!("failed to read {}: {e}", path.display()),
            };
            ApplicationError::template(logical_path, TemplateFailure::NotFound, reason)
        })?;
        debug!(bytes = source.len(), "template loaded");
        render_source(logical_path, &source, context)
    }

    fn list(&self) -> StackSprintResult<Vec<String>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|e| ApplicationError::TemplateRoot {
                path: self.root.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                paths.push(normalize_path(&relative.to_string_lossy()));
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Forward slashes on every platform.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacksprint_core::error::StackSprintError;
    use tempfile::TempDir;

    fn root_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let full = temp.path().join(rel);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        temp
    }

    fn kind(err: StackSprintError) -> TemplateFailure {
        match err {
            StackSprintError::Application(ApplicationError::Template { kind, .. }) => kind,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(DirectoryTemplates::new("/absolutely/does/not/exist").is_err());
    }

    #[test]
    fn renders_nested_templates() {
        let temp = root_with(&[("go/gin/main.go.tmpl", "port {{ port }}\n")]);
        let templates = DirectoryTemplates::new(temp.path()).unwrap();
        let ctx = TemplateContext::new().with("port", "8080");
        assert_eq!(templates.render("go/gin/main.go.tmpl", &ctx).unwrap(), "port 8080\n");
    }

    #[test]
    fn failure_kinds_are_distinct() {
        let temp = root_with(&[("broken.tmpl", "{{ oops"), ("needs.tmpl", "{{ key }}")]);
        let templates = DirectoryTemplates::new(temp.path()).unwrap();
        let ctx = TemplateContext::new();

        assert_eq!(kind(templates.render("absent.tmpl", &ctx).unwrap_err()), TemplateFailure::NotFound);
        assert_eq!(kind(templates.render("broken.tmpl", &ctx).unwrap_err()), TemplateFailure::Parse);
        assert_eq!(kind(templates.render("needs.tmpl", &ctx).unwrap_err()), TemplateFailure::Render);
    }

    #[test]
    fn escaping_paths_are_not_found() {
        let temp = root_with(&[("a.tmpl", "x")]);
        let templates = DirectoryTemplates::new(temp.path().join("")).unwrap();
        let ctx = TemplateContext::new();
        assert_eq!(kind(templates.render("../a.tmpl", &ctx).unwrap_err()), TemplateFailure::NotFound);
        assert_eq!(kind(templates.render("/etc/passwd", &ctx).unwrap_err()), TemplateFailure::NotFound);
    }

    #[test]
    fn lists_files_with_forward_slashes() {
        let temp = root_with(&[("node/package.json.tmpl", ""), ("common/README.md.tmpl", "")]);
        let templates = DirectoryTemplates::new(temp.path()).unwrap();
        assert_eq!(
            templates.list().unwrap(),
            vec!["common/README.md.tmpl", "node/package.json.tmpl"]
        );
    }
}
