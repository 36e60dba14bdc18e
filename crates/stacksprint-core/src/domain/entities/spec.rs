//! The declarative project specification.
//!
//! A `ProjectSpec` is deserialized straight from the caller's JSON/TOML. It
//! may be internally inconsistent; `rules::normalize` turns it into a
//! `NormalizedSpec` whose invariants the rest of the engine relies on.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Architecture, Database, FieldType, Framework, Language, RootMode, ServiceCommunication,
    Toggle,
};

/// Raw specification as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default, alias = "database")]
    pub db: Database,
    #[serde(default)]
    pub use_orm: bool,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_communication: Option<ServiceCommunication>,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub infra: InfraOptions,
    #[serde(default)]
    pub features: FeatureOptions,
    #[serde(default)]
    pub file_toggles: FileToggles,
    #[serde(default)]
    pub custom: CustomOptions,
    #[serde(default)]
    pub root: RootOptions,
}

impl ProjectSpec {
    /// Minimal specification for a language; everything else defaulted.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            framework: None,
            architecture: Architecture::default(),
            db: Database::default(),
            use_orm: false,
            service_communication: None,
            services: Vec::new(),
            infra: InfraOptions::default(),
            features: FeatureOptions::default(),
            file_toggles: FileToggles::default(),
            custom: CustomOptions::default(),
            root: RootOptions::default(),
        }
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_database(mut self, db: Database) -> Self {
        self.db = db;
        self
    }

    pub fn with_service(mut self, name: impl Into<String>, port: u16) -> Self {
        self.services.push(ServiceConfig {
            name: name.into(),
            port,
        });
        self
    }
}

/// Treats `""` (what a cleared form field sends) like an absent value.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<ServiceCommunication>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<ServiceCommunication>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfraOptions {
    #[serde(alias = "cache")]
    pub redis: bool,
    #[serde(alias = "queue")]
    pub kafka: bool,
    #[serde(alias = "pubsub")]
    pub nats: bool,
}

impl InfraOptions {
    /// Enabled add-ons by name, sorted.
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = [
            (self.redis, "redis"),
            (self.kafka, "kafka"),
            (self.nats, "nats"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOptions {
    pub jwt_auth: bool,
    pub swagger: bool,
    pub github_actions_ci: bool,
    pub makefile: bool,
    pub logger: bool,
    pub global_error_handler: bool,
    pub health_endpoint: bool,
    pub sample_test: bool,
}

impl FeatureOptions {
    /// Enabled feature names, sorted.
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = [
            (self.jwt_auth, "jwt_auth"),
            (self.swagger, "swagger"),
            (self.github_actions_ci, "github_actions_ci"),
            (self.makefile, "makefile"),
            (self.logger, "logger"),
            (self.global_error_handler, "global_error_handler"),
            (self.health_endpoint, "health_endpoint"),
            (self.sample_test, "sample_test"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        names.sort_unstable();
        names
    }
}

/// Tri-state output toggles. `Unset` resolves to "included" at project level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToggles {
    pub env: Toggle,
    pub gitignore: Toggle,
    pub dockerfile: Toggle,
    #[serde(alias = "compose")]
    pub docker_compose: Toggle,
    pub readme: Toggle,
    pub example_crud: Toggle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomOptions {
    pub models: Vec<DataModel>,
    pub add_folders: Vec<String>,
    pub add_files: Vec<CustomFile>,
    pub add_service_names: Vec<String>,
    pub remove_folders: Vec<String>,
    pub remove_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModel {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<DataField>,
}

impl DataModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(DataField {
            name: name.into(),
            ty,
        });
        self
    }

    /// The sample model used when CRUD is enabled but none are declared.
    pub fn sample() -> Self {
        Self::new("Item")
            .field("id", FieldType::Int)
            .field("name", FieldType::String)
    }

    /// Fields other than `id`, which every generated table provides itself.
    pub fn data_fields(&self) -> impl Iterator<Item = &DataField> {
        self.fields
            .iter()
            .filter(|f| !f.name.eq_ignore_ascii_case("id"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: FieldType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootOptions {
    pub mode: RootMode,
    pub name: String,
    pub path: String,
    pub module: String,
    pub git_init: bool,
}
