//! Template providers.
//!
//! - [`DirectoryTemplates`]: a template root on disk
//! - [`EmbeddedTemplates`]: the shipped `templates/` tree compiled in
//! - [`discover`]: picks one of the two following the documented order

mod directory;
mod discovery;
mod embedded;

pub use directory::DirectoryTemplates;
pub use discovery::{TEMPLATES_DIR_ENV, TemplateOrigin, discover};
pub use embedded::EmbeddedTemplates;
