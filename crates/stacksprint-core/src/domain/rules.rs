//! Rule engine: turns a raw [`ProjectSpec`] into a [`NormalizedSpec`].
//!
//! Rules run in a fixed order. Each either corrects a field and records a
//! warning, or rejects the specification with a [`DomainError`]. Applying the
//! engine to its own output changes nothing and produces no warnings.

use std::collections::HashSet;
use std::ops::Deref;

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    DomainError, capabilities,
    entities::{ProjectSpec, ServiceConfig},
    validation::DomainValidator,
    value_objects::{Framework, RootMode, ServiceCommunication},
};

/// First port handed out to services created by the engine.
pub const FIRST_SERVICE_PORT: u16 = 8081;

/// Name of the service created when a microservices spec declares none.
pub const DEFAULT_SERVICE_NAME: &str = "api";

/// A specification whose cross-field invariants hold:
///
/// - a framework is always selected and belongs to the language
/// - services are non-empty exactly when the topology is microservices
/// - `use_orm` is false for absent/schema-less databases and ORM-bundling frameworks
/// - communication mode is set for microservices
/// - `git_init` is false for existing roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSpec(ProjectSpec);

impl NormalizedSpec {
    /// The resolved framework (always present after normalization).
    pub fn framework(&self) -> Framework {
        match self.0.framework {
            Some(fw) => fw,
            // Unreachable through `normalize`; fall back to the registry default.
            None => capabilities::default_framework(self.0.language).unwrap_or(Framework::Gin),
        }
    }

    pub fn as_spec(&self) -> &ProjectSpec {
        &self.0
    }

    pub fn into_spec(self) -> ProjectSpec {
        self.0
    }
}

impl Deref for NormalizedSpec {
    type Target = ProjectSpec;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub spec: NormalizedSpec,
    pub warnings: Vec<String>,
}

/// Apply every rule in order.
pub fn normalize(mut spec: ProjectSpec) -> Result<Normalized, DomainError> {
    let mut warnings = Vec::new();

    infer_framework(&mut spec, &mut warnings)?;
    clear_services_outside_microservices(&mut spec, &mut warnings);
    dedupe_custom_paths(&mut spec);
    disable_git_init_for_existing_root(&mut spec, &mut warnings);
    correct_orm(&mut spec, &mut warnings);
    check_framework_database(&spec)?;
    default_service_communication(&mut spec, &mut warnings);
    materialize_services(&mut spec, &mut warnings);
    validate_structure(&spec)?;

    debug!(warnings = warnings.len(), "Specification normalized");
    Ok(Normalized {
        spec: NormalizedSpec(spec),
        warnings,
    })
}

// ── Rules ────────────────────────────────────────────────────────────────────

fn infer_framework(spec: &mut ProjectSpec, warnings: &mut Vec<String>) -> Result<(), DomainError> {
    match spec.framework {
        Some(fw) if fw.language() != spec.language => Err(DomainError::FrameworkNotAvailable {
            framework: fw.to_string(),
            language: spec.language.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            let fw = capabilities::default_framework(spec.language).ok_or_else(|| {
                DomainError::InvalidSpec(format!("no framework registered for {}", spec.language))
            })?;
            spec.framework = Some(fw);
            warnings.push(format!(
                "framework defaulted to {fw} for {}.",
                spec.language
            ));
            Ok(())
        }
    }
}

fn clear_services_outside_microservices(spec: &mut ProjectSpec, warnings: &mut Vec<String>) {
    if spec.architecture.is_microservices() {
        return;
    }
    if !spec.services.is_empty() {
        spec.services.clear();
        warnings.push("Services list was ignored because architecture is not microservices.".into());
    }
    if !spec.custom.add_service_names.is_empty() {
        spec.custom.add_service_names.clear();
        warnings.push(
            "Custom service names were ignored because architecture is not microservices.".into(),
        );
    }
}

fn dedupe_custom_paths(spec: &mut ProjectSpec) {
    let custom = &mut spec.custom;
    custom.add_folders = dedupe(&custom.add_folders);
    custom.remove_folders = dedupe(&custom.remove_folders);
    custom.remove_files = dedupe(&custom.remove_files);
}

fn disable_git_init_for_existing_root(spec: &mut ProjectSpec, warnings: &mut Vec<String>) {
    if spec.root.mode == RootMode::Existing && spec.root.git_init {
        spec.root.git_init = false;
        warnings.push("root.git_init was disabled because root.mode is existing.".into());
    }
}

fn correct_orm(spec: &mut ProjectSpec, warnings: &mut Vec<String>) {
    if spec.use_orm && (spec.db.is_none() || spec.db.is_schemaless()) {
        spec.use_orm = false;
        warnings.push(
            "use_orm was disabled because the selected database does not use SQL ORM in this generator."
                .into(),
        );
    }

    if let Some(fw) = spec.framework {
        if spec.use_orm && capabilities::bundles_orm(fw) {
            spec.use_orm = false;
            warnings.push(format!(
                "use_orm was disabled because {} already uses its built-in ORM.",
                display_name(fw)
            ));
        }
    }
}

fn check_framework_database(spec: &ProjectSpec) -> Result<(), DomainError> {
    let Some(fw) = spec.framework else {
        return Ok(());
    };
    capabilities::validate_database(fw, spec.db).map_err(|reason| {
        DomainError::IncompatibleDatabase {
            framework: fw.to_string(),
            database: spec.db.to_string(),
            reason,
        }
    })
}

fn default_service_communication(spec: &mut ProjectSpec, warnings: &mut Vec<String>) {
    if spec.architecture.is_microservices() && spec.service_communication.is_none() {
        spec.service_communication = Some(ServiceCommunication::Http);
        warnings.push("service_communication defaulted to http for microservices.".into());
    }
}

/// Merge `custom.add_service_names` into `services` and guarantee at least
/// one service for the microservices topology.
fn materialize_services(spec: &mut ProjectSpec, warnings: &mut Vec<String>) {
    if !spec.architecture.is_microservices() {
        return;
    }

    let mut known: HashSet<String> = spec
        .services
        .iter()
        .map(|s| s.name.to_ascii_lowercase())
        .collect();
    let mut used_ports: HashSet<u16> = spec.services.iter().map(|s| s.port).collect();

    let requested: Vec<String> = spec
        .custom
        .add_service_names
        .iter()
        .map(|n| n.trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    for name in requested {
        if !known.insert(name.clone()) {
            continue;
        }
        let port = next_free_port(&used_ports);
        used_ports.insert(port);
        warnings.push(format!("Service '{name}' was added on port {port}."));
        spec.services.push(ServiceConfig { name, port });
    }

    if spec.services.is_empty() {
        let port = next_free_port(&used_ports);
        warnings.push(format!(
            "No services were declared; a single '{DEFAULT_SERVICE_NAME}' service was added on port {port}."
        ));
        spec.services.push(ServiceConfig {
            name: DEFAULT_SERVICE_NAME.into(),
            port,
        });
    }
}

fn validate_structure(spec: &ProjectSpec) -> Result<(), DomainError> {
    DomainValidator::validate_services(&spec.services)?;
    DomainValidator::validate_models(&spec.custom.models)?;
    DomainValidator::validate_custom_paths(&spec.custom)
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Trim, drop blanks, and drop case-insensitive repeats keeping the first.
fn dedupe(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn next_free_port(used: &HashSet<u16>) -> u16 {
    (FIRST_SERVICE_PORT..=u16::MAX)
        .find(|port| !used.contains(port))
        .unwrap_or(FIRST_SERVICE_PORT)
}

fn display_name(fw: Framework) -> &'static str {
    match fw {
        Framework::Gin => "Gin",
        Framework::Fiber => "Fiber",
        Framework::Express => "Express",
        Framework::Fastify => "Fastify",
        Framework::FastApi => "FastAPI",
        Framework::Django => "Django",
    }
}
