//! Framework capability registry.
//!
//! Each framework is described exactly once by its [`FrameworkDef`]. The
//! rule engine, the stack strategies and the CLI `list` command all read
//! from here instead of matching on framework variants.
//!
//! # Adding a New Framework
//!
//! 1. Add a variant to `Framework` in `value_objects.rs`
//! 2. Add one [`FrameworkDef`] entry to [`FRAMEWORK_REGISTRY`]
//! 3. Register a stack strategy and an autopilot cell for it

use crate::domain::value_objects::{Database, Framework, Language};

// ── Framework definitions ────────────────────────────────────────────────────

/// Everything the domain needs to know about one framework.
#[derive(Debug, Clone, Copy)]
pub struct FrameworkDef {
    /// The framework variant this entry describes.
    pub framework: Framework,

    /// Picked when the specification names a language but no framework.
    ///
    /// Exactly one entry per language must be `true`.
    pub is_default: bool,

    /// Framework ships its own ORM; `use_orm` is meaningless here.
    pub bundles_orm: bool,

    /// Databases the framework's data layer cannot target at all.
    pub unsupported_databases: &'static [Database],

    /// Directory that holds application code (`internal`, `src`, `app`, `api`).
    pub source_root: &'static str,

    /// Main entry point, relative to the project (or service) root.
    pub entry_file: &'static str,

    /// One-line description for `stacksprint list`.
    pub summary: &'static str,
}

/// Single source of truth for all framework capabilities.
pub static FRAMEWORK_REGISTRY: &[FrameworkDef] = &[
    // ── Go ───────────────────────────────────────────────────────────────────
    FrameworkDef {
        framework: Framework::Gin,
        is_default: true,
        bundles_orm: false,
        unsupported_databases: &[],
        source_root: "internal",
        entry_file: "cmd/server/main.go",
        summary: "Gin HTTP router with GORM for SQL",
    },
    FrameworkDef {
        framework: Framework::Fiber,
        is_default: false,
        bundles_orm: false,
        unsupported_databases: &[],
        source_root: "internal",
        entry_file: "cmd/server/main.go",
        summary: "Fiber (fasthttp) router with GORM for SQL",
    },
    // ── Node ─────────────────────────────────────────────────────────────────
    FrameworkDef {
        framework: Framework::Express,
        is_default: true,
        bundles_orm: false,
        unsupported_databases: &[],
        source_root: "src",
        entry_file: "src/index.js",
        summary: "Express with Sequelize for SQL",
    },
    FrameworkDef {
        framework: Framework::Fastify,
        is_default: false,
        bundles_orm: false,
        unsupported_databases: &[],
        source_root: "src",
        entry_file: "src/index.js",
        summary: "Fastify with Sequelize for SQL",
    },
    // ── Python ───────────────────────────────────────────────────────────────
    FrameworkDef {
        framework: Framework::FastApi,
        is_default: true,
        bundles_orm: false,
        unsupported_databases: &[],
        source_root: "app",
        entry_file: "app/main.py",
        summary: "FastAPI with SQLAlchemy for SQL",
    },
    FrameworkDef {
        framework: Framework::Django,
        is_default: false,
        bundles_orm: true,
        unsupported_databases: &[Database::Mongodb],
        source_root: "api",
        entry_file: "manage.py",
        summary: "Django with its built-in ORM",
    },
];

// ── Registry lookup API ──────────────────────────────────────────────────────

/// Find the capability definition for a specific framework.
///
/// Returns `None` only if the framework is not registered, which the
/// integrity test rules out.
pub fn find_framework(framework: Framework) -> Option<&'static FrameworkDef> {
    FRAMEWORK_REGISTRY
        .iter()
        .find(|def| def.framework == framework)
}

/// All registered frameworks for a language, in registry order.
pub fn frameworks_for(language: Language) -> impl Iterator<Item = &'static FrameworkDef> {
    FRAMEWORK_REGISTRY
        .iter()
        .filter(move |def| def.framework.language() == language)
}

/// The framework used when a specification omits one.
pub fn default_framework(language: Language) -> Option<Framework> {
    frameworks_for(language)
        .find(|def| def.is_default)
        .map(|def| def.framework)
}

pub fn bundles_orm(framework: Framework) -> bool {
    find_framework(framework).is_some_and(|def| def.bundles_orm)
}

/// Check that a framework can target a database at all.
///
/// Returns a human-readable reason on failure.
pub fn validate_database(framework: Framework, database: Database) -> Result<(), String> {
    match find_framework(framework) {
        Some(def) if def.unsupported_databases.contains(&database) => Err(format!(
            "{framework}'s data layer cannot target {database}"
        )),
        _ => Ok(()),
    }
}

pub fn source_root(framework: Framework) -> &'static str {
    find_framework(framework).map_or("src", |def| def.source_root)
}

// ── Registry integrity (checked in tests) ────────────────────────────────────

/// Assert that the registry is internally consistent.
///
/// Call this in a test; it panics with a clear message on any violation.
#[doc(hidden)]
pub fn assert_registry_integrity() {
    for fw in Framework::ALL {
        assert!(
            find_framework(fw).is_some(),
            "Framework {fw:?} is not registered"
        );
    }

    for language in Language::ALL {
        let defaults: Vec<_> = frameworks_for(language)
            .filter(|def| def.is_default)
            .map(|def| def.framework)
            .collect();
        assert_eq!(
            defaults.len(),
            1,
            "{language:?} must have exactly one default framework, found {defaults:?}"
        );
    }

    for def in FRAMEWORK_REGISTRY {
        assert!(
            !def.unsupported_databases.contains(&Database::None),
            "{:?}: 'none' is always supported",
            def.framework
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_internally_consistent() {
        assert_registry_integrity();
    }

    #[test]
    fn default_frameworks() {
        assert_eq!(default_framework(Language::Go), Some(Framework::Gin));
        assert_eq!(default_framework(Language::Node), Some(Framework::Express));
        assert_eq!(default_framework(Language::Python), Some(Framework::FastApi));
    }

    #[test]
    fn django_bundles_orm_and_rejects_mongodb() {
        assert!(bundles_orm(Framework::Django));
        assert!(!bundles_orm(Framework::FastApi));
        assert!(validate_database(Framework::Django, Database::Mongodb).is_err());
        assert!(validate_database(Framework::Django, Database::Mysql).is_ok());
        assert!(validate_database(Framework::FastApi, Database::Mongodb).is_ok());
    }

    #[test]
    fn source_roots_follow_language_idiom() {
        assert_eq!(source_root(Framework::Gin), "internal");
        assert_eq!(source_root(Framework::Fastify), "src");
        assert_eq!(source_root(Framework::FastApi), "app");
        assert_eq!(source_root(Framework::Django), "api");
    }

    #[test]
    fn frameworks_for_filters_by_language() {
        let node: Vec<_> = frameworks_for(Language::Node).map(|d| d.framework).collect();
        assert_eq!(node, vec![Framework::Express, Framework::Fastify]);
    }
}
