//! Driven ports: what the application needs from the outside world.
//!
//! Adapters in `stacksprint-adapters` implement these.
//!
//! - `TemplateProvider`: resolves and renders logical template paths
//! - `Filesystem`: writes a generated tree to disk

use std::path::Path;

use crate::domain::stack::TemplateContext;
use crate::error::StackSprintResult;

/// Read-only template source.
///
/// Implemented by:
/// - `stacksprint_adapters::templates::DirectoryTemplates` (a template root on disk)
/// - `stacksprint_adapters::templates::EmbeddedTemplates` (compiled into the binary)
///
/// Implementations are immutable after construction and must tolerate
/// concurrent reads.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait TemplateProvider: Send + Sync {
    /// Render the template at `logical_path` (e.g. `go/gin/main.go.tmpl`).
    ///
    /// Fails with `TemplateFailure::NotFound`, `Parse` or `Render`.
    fn render(&self, logical_path: &str, context: &TemplateContext) -> StackSprintResult<String>;

    /// Every logical path this provider can resolve, sorted.
    fn list(&self) -> StackSprintResult<Vec<String>>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stacksprint_adapters::filesystem::LocalFilesystem` (production)
/// - `stacksprint_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StackSprintResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StackSprintResult<()>;

    /// Mark a file executable (no-op where the platform has no such bit).
    fn set_permissions(&self, path: &Path, executable: bool) -> StackSprintResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StackSprintResult<()>;
}
