//! Template root discovery.
//!
//! # Resolution order
//!
//! 1. An explicit root (`--templates`, or `templates.root` in the config
//!    file). A missing explicit root is an error, never a silent fallback.
//! 2. **`$STACKSPRINT_TEMPLATES_DIR`**
//! 3. **`./templates`** relative to the working directory
//! 4. **`<executable-dir>/templates`**
//! 5. **`../templates`** (running from `target/debug/` during development)
//! 6. The embedded set compiled into the binary.
//!
//! A candidate directory is used only if it holds at least one file.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use stacksprint_core::{application::ports::TemplateProvider, error::StackSprintResult};

use super::{DirectoryTemplates, EmbeddedTemplates};

/// Environment variable naming a template root.
pub const TEMPLATES_DIR_ENV: &str = "STACKSPRINT_TEMPLATES_DIR";

/// Where the chosen provider reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Directory(PathBuf),
    Embedded,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => write!(f, "{}", path.display()),
            Self::Embedded => f.write_str("built-in"),
        }
    }
}

/// Pick a template provider following the documented order.
#[instrument]
pub fn discover(
    explicit: Option<&Path>,
) -> StackSprintResult<(Box<dyn TemplateProvider>, TemplateOrigin)> {
    if let Some(root) = explicit {
        let templates = DirectoryTemplates::new(root)?;
        info!(path = %root.display(), "using explicit template root");
        return Ok((
            Box::new(templates),
            TemplateOrigin::Directory(root.to_path_buf()),
        ));
    }

    for candidate in candidate_paths() {
        debug!(path = %candidate.display(), "checking candidate template root");
        if !has_files(&candidate) {
            continue;
        }
        let templates = DirectoryTemplates::new(&candidate)?;
        info!(path = %candidate.display(), "template root discovered");
        return Ok((Box::new(templates), TemplateOrigin::Directory(candidate)));
    }

    debug!("no template root on disk; using built-in templates");
    Ok((Box::new(EmbeddedTemplates::new()), TemplateOrigin::Embedded))
}

/// Ordered candidate roots; an unset variable or unknown exe path is skipped.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Some(dir) = std::env::var_os(TEMPLATES_DIR_ENV).filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(dir));
    }
    paths.push(PathBuf::from("templates"));
    if let Some(exe_sibling) = exe_sibling_templates() {
        paths.push(exe_sibling);
    }
    paths.push(PathBuf::from("../templates"));

    paths
}

fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

fn has_files(dir: &Path) -> bool {
    dir.is_dir()
        && walkdir::WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .any(|entry| entry.file_type().is_file())
}
