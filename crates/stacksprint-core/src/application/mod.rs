//! Application layer for StackSprint.
//!
//! This layer contains:
//! - **Services**: use case orchestration (Generator, TreeBuilder, Materializer)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{Generator, Materializer, TreeBuilder};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateProvider};

#[cfg(any(test, feature = "mocks"))]
pub use ports::MockTemplateProvider;

pub use error::{ApplicationError, TemplateFailure};
