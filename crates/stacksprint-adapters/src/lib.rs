//! Infrastructure adapters for StackSprint.
//!
//! This crate implements the ports defined in `stacksprint-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod templates;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::CompiledTemplate;
pub use templates::{DirectoryTemplates, EmbeddedTemplates, TemplateOrigin, discover};
