//! StackSprint Core - scaffold generation engine.
//!
//! Turns a declarative project specification into an in-memory file tree,
//! two provisioning scripts (POSIX sh and PowerShell) that recreate it, and
//! a decision trace explaining what was generated and why.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        stacksprint-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Generator, TreeBuilder, Materializer) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (TemplateProvider, Filesystem)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   stacksprint-adapters (Infrastructure) │
//! │ (DirectoryTemplates, EmbeddedTemplates, │
//! │   LocalFilesystem, MemoryFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (rules, stack, autopilot, scripts,      │
//! │  explain)                               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stacksprint_core::prelude::*;
//! # fn provider() -> Box<dyn TemplateProvider> { unimplemented!() }
//!
//! let spec = ProjectSpec::new(Language::Go).with_database(Database::Postgresql);
//! let generator = Generator::new(provider());
//! let result = generator.generate(spec).unwrap();
//! println!("{}", result.bash_script);
//! ```

// Domain layer (pure generation logic)
pub mod domain;

// Application layer (orchestration and ports)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Generator, Materializer, TreeBuilder,
        ports::{Filesystem, TemplateProvider},
    };
    pub use crate::domain::{
        Architecture, Database, DecisionEntry, FileTree, Framework, GenerationResult, Language,
        ProjectSpec, Toggle, stack::TemplateContext,
    };
    pub use crate::error::{StackSprintError, StackSprintResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
