//! Stack strategies: per-(language, framework) content producers.
//!
//! A [`StackProfile`] turns a [`Unit`] (the project root of a monolith, or
//! one microservice) into [`Artifact`]s. Artifacts are either literal files
//! or references to logical templates that the template provider renders.
//! [`plan`] walks every unit and every toggle in assembly order; the tree
//! builder only has to render and stage the result.

mod common;
mod go;
mod node;
mod python;
pub mod sql;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    DomainError, capabilities,
    entities::{DataModel, RelativePath},
    naming,
    rules::NormalizedSpec,
    value_objects::{Architecture, Framework, RootMode},
};

pub use common::{compose_file, env_file, openapi_document};

/// Port a monolith listens on.
pub const MONOLITH_PORT: u16 = 8080;

/// Project name used when the specification leaves it blank.
pub const DEFAULT_PROJECT_NAME: &str = "stacksprint-app";

// ── Template context ─────────────────────────────────────────────────────────

/// Flat string map handed to the template provider.
///
/// Ordered so that debug output and error messages are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext(BTreeMap<String, String>);

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// ── Artifacts ────────────────────────────────────────────────────────────────

/// One thing to stage into the file tree. Paths are relative to the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Dir(String),
    File {
        path: String,
        content: String,
    },
    Template {
        path: String,
        template: String,
        context: TemplateContext,
    },
}

impl Artifact {
    pub fn dir(path: impl Into<String>) -> Self {
        Self::Dir(path.into())
    }

    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn template(
        path: impl Into<String>,
        template: impl Into<String>,
        context: TemplateContext,
    ) -> Self {
        Self::Template {
            path: path.into(),
            template: template.into(),
            context,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Dir(path) | Self::File { path, .. } | Self::Template { path, .. } => path,
        }
    }
}

/// An artifact with its final, project-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    pub stage: Stage,
    pub path: RelativePath,
    pub artifact: Artifact,
}

/// Assembly stage, in order. Later stages win path collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Skeleton,
    Entry,
    Crud,
    Database,
    Infra,
    Features,
    Outputs,
}

// ── Units ────────────────────────────────────────────────────────────────────

/// Role a layer directory plays; mapped to a path per architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    pub models: &'static str,
    pub handlers: &'static str,
    pub all: &'static [&'static str],
}

impl Layers {
    pub const fn for_architecture(arch: Architecture) -> Self {
        match arch {
            Architecture::Mvp | Architecture::Microservices => Self {
                models: "models",
                handlers: "handlers",
                all: &["handlers", "models", "services"],
            },
            Architecture::Clean => Self {
                models: "domain",
                handlers: "delivery/http",
                all: &["domain", "usecase", "repository", "delivery/http"],
            },
            Architecture::Hexagonal => Self {
                models: "core/domain",
                handlers: "adapters/primary/http",
                all: &[
                    "core/domain",
                    "core/ports",
                    "core/services",
                    "adapters/primary/http",
                    "adapters/secondary/repository",
                ],
            },
        }
    }
}

/// A deployable slice of the scaffold: the whole project for monoliths,
/// one service for microservices.
#[derive(Debug, Clone)]
pub struct Unit<'a> {
    pub spec: &'a NormalizedSpec,
    /// `None` for the project root.
    pub mount: Option<RelativePath>,
    pub name: String,
    pub port: u16,
    /// Skeleton style; services always use the mvp layout.
    pub layout: Architecture,
}

impl<'a> Unit<'a> {
    /// The project root for monoliths, otherwise one unit per service.
    pub fn all(spec: &'a NormalizedSpec) -> Result<Vec<Self>, DomainError> {
        if !spec.architecture.is_microservices() {
            return Ok(vec![Self {
                spec,
                mount: None,
                name: project_name(spec),
                port: MONOLITH_PORT,
                layout: spec.architecture,
            }]);
        }

        spec.services
            .iter()
            .map(|service| {
                Ok(Self {
                    spec,
                    mount: Some(RelativePath::parse(&format!("services/{}", service.name))?),
                    name: service.name.clone(),
                    port: service.port,
                    layout: Architecture::Mvp,
                })
            })
            .collect()
    }

    pub fn framework(&self) -> Framework {
        self.spec.framework()
    }

    pub fn is_service(&self) -> bool {
        self.mount.is_some()
    }

    pub fn layers(&self) -> Layers {
        Layers::for_architecture(self.layout)
    }

    pub fn source_root(&self) -> &'static str {
        capabilities::source_root(self.framework())
    }

    /// `<source root>/<layer>` for the model layer.
    pub fn model_dir(&self) -> String {
        format!("{}/{}", self.source_root(), self.layers().models)
    }

    /// `<source root>/<layer>` for the HTTP layer.
    pub fn handler_dir(&self) -> String {
        format!("{}/{}", self.source_root(), self.layers().handlers)
    }

    /// Models that get CRUD scaffolding; empty when example CRUD is off.
    pub fn crud_models(&self) -> Vec<DataModel> {
        if !self.spec.file_toggles.example_crud.resolve(true) {
            return Vec::new();
        }
        if self.spec.custom.models.is_empty() {
            vec![DataModel::sample()]
        } else {
            self.spec.custom.models.clone()
        }
    }

    /// Go module path for this unit.
    pub fn go_module(&self) -> String {
        let base = match self.spec.root.module.trim() {
            "" => format!("github.com/example/{}", naming::slug(&project_name(self.spec))),
            module => module.to_string(),
        };
        match &self.mount {
            Some(_) => format!("{base}/{}", self.name),
            None => base,
        }
    }

    pub fn has_database(&self) -> bool {
        !self.spec.db.is_none()
    }

    /// Base template context shared by every template of this unit.
    pub fn context(&self) -> TemplateContext {
        TemplateContext::new()
            .with("project_name", project_name(self.spec))
            .with("service_name", self.name.clone())
            .with("port", self.port.to_string())
            .with("language", self.spec.language.as_str())
            .with("framework", self.framework().as_str())
            .with("database", self.spec.db.as_str())
    }
}

/// Project name from `root.name`, else the last segment of an existing
/// `root.path`, else [`DEFAULT_PROJECT_NAME`].
pub fn project_name(spec: &NormalizedSpec) -> String {
    let name = spec.root.name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    if spec.root.mode == RootMode::Existing {
        let last = spec
            .root
            .path
            .trim()
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        if !last.is_empty() && last != "." && last != ".." {
            return last.to_string();
        }
    }
    DEFAULT_PROJECT_NAME.to_string()
}

/// Substitute `__TOKEN__` markers in an embedded source snippet.
fn fill(src: &str, pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .fold(src.to_string(), |acc, (token, value)| acc.replace(token, value))
}

// ── Strategy trait ───────────────────────────────────────────────────────────

/// Service-scoped feature files a profile knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    JwtAuth,
    Logger,
    GlobalErrorHandler,
    HealthEndpoint,
    SampleTest,
}

/// Infrastructure add-ons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addon {
    Redis,
    Kafka,
    Nats,
}

/// Content producer for one framework. Every method returns artifacts with
/// paths relative to the unit.
pub trait StackProfile: Send + Sync {
    fn framework(&self) -> Framework;

    /// Layer directories and language package markers.
    fn skeleton(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let root = unit.source_root();
        let mut out = vec![Artifact::dir(root)];
        out.extend(
            unit.layers()
                .all
                .iter()
                .map(|layer| Artifact::dir(format!("{root}/{layer}"))),
        );
        out
    }

    /// Entry point and dependency manifest.
    fn entry(&self, unit: &Unit<'_>) -> Vec<Artifact>;

    fn crud(&self, unit: &Unit<'_>, models: &[DataModel]) -> Vec<Artifact>;

    /// Language-side database connection code.
    fn database(&self, unit: &Unit<'_>) -> Vec<Artifact>;

    fn addon(&self, unit: &Unit<'_>, addon: Addon) -> Vec<Artifact>;

    fn feature(&self, unit: &Unit<'_>, feature: Feature) -> Vec<Artifact>;

    /// Logical template directory (`go`, `node`, `python`).
    fn template_dir(&self) -> &'static str {
        self.framework().language().as_str()
    }

    /// Extra keys for the Dockerfile template.
    fn container_context(&self, unit: &Unit<'_>) -> TemplateContext {
        unit.context()
    }
}

static PROFILES: &[&dyn StackProfile] = &[
    &go::GoStack::GIN,
    &go::GoStack::FIBER,
    &node::NodeStack::EXPRESS,
    &node::NodeStack::FASTIFY,
    &python::FastApiStack,
    &python::DjangoStack,
];

/// Strategy registered for a framework.
pub fn profile_for(framework: Framework) -> Option<&'static dyn StackProfile> {
    PROFILES.iter().copied().find(|p| p.framework() == framework)
}

// ── Planning ─────────────────────────────────────────────────────────────────

/// Every artifact of the scaffold except autopilot and customizations, in
/// assembly order.
pub fn plan(spec: &NormalizedSpec) -> Result<Vec<PlannedArtifact>, DomainError> {
    let framework = spec.framework();
    let profile = profile_for(framework).ok_or_else(|| DomainError::FrameworkNotAvailable {
        framework: framework.to_string(),
        language: spec.language.to_string(),
    })?;

    let units = Unit::all(spec)?;
    let mut planner = Planner::default();

    for unit in &units {
        planner.stage(unit, Stage::Skeleton, profile.skeleton(unit))?;
        planner.stage(unit, Stage::Entry, profile.entry(unit))?;
        planner.stage(unit, Stage::Crud, profile.crud(unit, &unit.crud_models()))?;

        if unit.has_database() {
            let mut db = common::database_bootstrap(unit);
            db.extend(profile.database(unit));
            planner.stage(unit, Stage::Database, db)?;
        }

        let infra = &spec.infra;
        for (enabled, addon) in [
            (infra.redis, Addon::Redis),
            (infra.kafka, Addon::Kafka),
            (infra.nats, Addon::Nats),
        ] {
            if enabled {
                planner.stage(unit, Stage::Infra, profile.addon(unit, addon))?;
            }
        }

        let features = &spec.features;
        for (enabled, feature) in [
            (features.jwt_auth, Feature::JwtAuth),
            (features.logger, Feature::Logger),
            (features.global_error_handler, Feature::GlobalErrorHandler),
            (features.health_endpoint, Feature::HealthEndpoint),
            (features.sample_test, Feature::SampleTest),
        ] {
            if enabled {
                planner.stage(unit, Stage::Features, profile.feature(unit, feature))?;
            }
        }
        if features.swagger {
            planner.stage(
                unit,
                Stage::Features,
                vec![Artifact::file("docs/openapi.yaml", openapi_document(unit))],
            )?;
        }

        let toggles = &spec.file_toggles;
        if toggles.dockerfile.resolve(true) {
            planner.stage(
                unit,
                Stage::Outputs,
                vec![Artifact::template(
                    "Dockerfile",
                    format!("{}/Dockerfile.tmpl", profile.template_dir()),
                    profile.container_context(unit),
                )],
            )?;
        }
        if toggles.env.resolve(true) {
            planner.stage(unit, Stage::Outputs, vec![Artifact::file(".env", env_file(unit))])?;
        }
    }

    planner.root(Stage::Features, common::root_features(spec, &units, profile))?;
    planner.root(Stage::Outputs, common::root_outputs(spec, &units, profile))?;

    Ok(planner.into_inner())
}

#[derive(Default)]
struct Planner {
    planned: Vec<PlannedArtifact>,
}

impl Planner {
    fn stage(
        &mut self,
        unit: &Unit<'_>,
        stage: Stage,
        artifacts: Vec<Artifact>,
    ) -> Result<(), DomainError> {
        for artifact in artifacts {
            let path = match &unit.mount {
                Some(mount) => mount.join(artifact.path())?,
                None => RelativePath::parse(artifact.path())?,
            };
            self.planned.push(PlannedArtifact {
                stage,
                path,
                artifact,
            });
        }
        Ok(())
    }

    fn root(&mut self, stage: Stage, artifacts: Vec<Artifact>) -> Result<(), DomainError> {
        for artifact in artifacts {
            let path = RelativePath::parse(artifact.path())?;
            self.planned.push(PlannedArtifact {
                stage,
                path,
                artifact,
            });
        }
        Ok(())
    }

    /// Stable sort: within a stage, units keep their declaration order.
    fn into_inner(mut self) -> Vec<PlannedArtifact> {
        self.planned.sort_by_key(|planned| planned.stage);
        self.planned
    }
}
