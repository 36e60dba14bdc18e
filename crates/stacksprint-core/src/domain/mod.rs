// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for StackSprint.
//!
//! Pure generation logic. Nothing here touches the filesystem, the network
//! or the environment; template rendering is reached through the
//! `TemplateProvider` port defined in the application layer.
//!
//! ## Pipeline
//!
//! - `rules`: raw spec → normalized spec + warnings
//! - `stack`: normalized spec → planned artifacts (per framework strategy)
//! - `autopilot`: fixed boilerplate per framework
//! - `scripts`: file tree → POSIX and PowerShell provisioning scripts
//! - `explain`: spec + tree + warnings → decision trace
//!
// Public API - what the world sees
pub mod autopilot;
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod explain;
pub mod naming;
pub mod rules;
pub mod scripts;
pub mod stack;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    CustomFile, CustomOptions, DataField, DataModel, DecisionCategory, DecisionEntry,
    FeatureOptions, FileToggles, FileTree, GenerationResult, InfraOptions, ProjectSpec,
    RelativePath, RootOptions, ServiceConfig,
};

pub use error::{DomainError, ErrorCategory};

pub use rules::{Normalized, NormalizedSpec, normalize};

pub use scripts::{Placement, Scripts, synthesize};

pub use value_objects::{
    Architecture, Database, FieldType, Framework, Language, RootMode, ServiceCommunication,
    Toggle,
};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn language_parses_aliases() {
        assert_eq!(Language::from_str("golang").unwrap(), Language::Go);
        assert_eq!(Language::from_str("JS").unwrap(), Language::Node);
        assert_eq!(Language::from_str("py").unwrap(), Language::Python);
        assert!(Language::from_str("java").is_err());
    }

    #[test]
    fn every_framework_belongs_to_a_language() {
        for fw in Framework::ALL {
            assert!(Language::ALL.contains(&fw.language()));
        }
    }

    #[test]
    fn toggle_resolves_unset_to_default() {
        assert!(Toggle::Unset.resolve(true));
        assert!(!Toggle::Unset.resolve(false));
        assert!(!Toggle::Off.resolve(true));
        assert!(Toggle::On.resolve(false));
    }

    // ========================================================================
    // Pipeline Tests
    // ========================================================================

    #[test]
    fn planned_artifacts_stay_inside_the_root() {
        for fw in Framework::ALL {
            let spec = ProjectSpec::new(fw.language())
                .with_framework(fw)
                .with_architecture(Architecture::Microservices)
                .with_service("users", 9001);
            let normalized = normalize(spec).unwrap();
            for planned in stack::plan(&normalized.spec).unwrap() {
                assert!(
                    planned.path.as_str().starts_with("services/users/")
                        || !planned.path.as_str().starts_with("services/"),
                    "{fw}: {} escaped its service",
                    planned.path
                );
            }
        }
    }

    #[test]
    fn autopilot_and_stack_agree_on_source_roots() {
        for fw in Framework::ALL {
            let root = capabilities::source_root(fw);
            for path in autopilot::paths_for(fw) {
                assert!(path.starts_with(root), "{fw}: {path} outside {root}");
            }
        }
    }
}
