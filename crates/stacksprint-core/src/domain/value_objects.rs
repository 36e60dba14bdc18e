//! Domain value objects: Language, Framework, Architecture, Database and the
//! small enums that make up a specification.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Capability knowledge (which framework bundles an ORM, which database a
//! framework cannot target, default frameworks) lives in `capabilities.rs`.
//! This file only defines the types, their string forms and their parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Language ─────────────────────────────────────────────────────────────────

/// A supported target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "golang")]
    Go,
    #[serde(alias = "javascript", alias = "js")]
    Node,
    #[serde(alias = "py")]
    Python,
}

impl Language {
    pub const ALL: [Language; 3] = [Self::Go, Self::Node, Self::Python];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Node => "node",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Self::Go),
            "node" | "javascript" | "js" => Ok(Self::Node),
            "python" | "py" => Ok(Self::Python),
            other => Err(DomainError::UnknownValue {
                field: "language",
                value: other.to_string(),
            }),
        }
    }
}

// ── Framework ────────────────────────────────────────────────────────────────

/// A web framework. Each framework belongs to exactly one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Gin,
    Fiber,
    Express,
    Fastify,
    #[serde(rename = "fastapi")]
    FastApi,
    Django,
}

impl Framework {
    pub const ALL: [Framework; 6] = [
        Self::Gin,
        Self::Fiber,
        Self::Express,
        Self::Fastify,
        Self::FastApi,
        Self::Django,
    ];

    /// The language this framework belongs to.
    ///
    /// Intrinsic to the type (gin is always Go), so it lives here rather than
    /// in the capability registry.
    pub const fn language(&self) -> Language {
        match self {
            Self::Gin | Self::Fiber => Language::Go,
            Self::Express | Self::Fastify => Language::Node,
            Self::FastApi | Self::Django => Language::Python,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gin => "gin",
            Self::Fiber => "fiber",
            Self::Express => "express",
            Self::Fastify => "fastify",
            Self::FastApi => "fastapi",
            Self::Django => "django",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gin" => Ok(Self::Gin),
            "fiber" => Ok(Self::Fiber),
            "express" => Ok(Self::Express),
            "fastify" => Ok(Self::Fastify),
            "fastapi" => Ok(Self::FastApi),
            "django" => Ok(Self::Django),
            other => Err(DomainError::UnknownValue {
                field: "framework",
                value: other.to_string(),
            }),
        }
    }
}

// ── Architecture ─────────────────────────────────────────────────────────────

/// Project topology and layering style.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// Minimal handlers/models/services layout.
    #[default]
    Mvp,
    /// Domain → use case → repository → delivery layering.
    Clean,
    /// Ports-and-adapters around a core.
    Hexagonal,
    /// One mvp-shaped service per declared service, plus orchestration.
    Microservices,
}

impl Architecture {
    pub const ALL: [Architecture; 4] = [
        Self::Mvp,
        Self::Clean,
        Self::Hexagonal,
        Self::Microservices,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mvp => "mvp",
            Self::Clean => "clean",
            Self::Hexagonal => "hexagonal",
            Self::Microservices => "microservices",
        }
    }

    pub const fn is_microservices(&self) -> bool {
        matches!(self, Self::Microservices)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mvp" | "minimal" => Ok(Self::Mvp),
            "clean" => Ok(Self::Clean),
            "hexagonal" | "ports-and-adapters" => Ok(Self::Hexagonal),
            "microservices" => Ok(Self::Microservices),
            other => Err(DomainError::UnknownValue {
                field: "architecture",
                value: other.to_string(),
            }),
        }
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

/// Database engine the scaffold bootstraps.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    None,
    #[serde(alias = "postgres")]
    Postgresql,
    Mysql,
    #[serde(alias = "mongo")]
    Mongodb,
}

impl Database {
    pub const ALL: [Database; 4] = [Self::None, Self::Postgresql, Self::Mysql, Self::Mongodb];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Mongodb => "mongodb",
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// SQL engines get migrations and an ORM option.
    pub const fn is_sql(&self) -> bool {
        matches!(self, Self::Postgresql | Self::Mysql)
    }

    pub const fn is_schemaless(&self) -> bool {
        matches!(self, Self::Mongodb)
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            other => Err(DomainError::UnknownValue {
                field: "database",
                value: other.to_string(),
            }),
        }
    }
}

// ── ServiceCommunication ─────────────────────────────────────────────────────

/// How microservices talk to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCommunication {
    /// Services do not call each other.
    None,
    /// Synchronous request/response over HTTP.
    Http,
    /// gRPC with shared proto definitions.
    Grpc,
}

impl ServiceCommunication {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Http => "http",
            Self::Grpc => "grpc",
        }
    }
}

impl fmt::Display for ServiceCommunication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCommunication {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "http" | "rest" => Ok(Self::Http),
            "grpc" => Ok(Self::Grpc),
            other => Err(DomainError::UnknownValue {
                field: "service_communication",
                value: other.to_string(),
            }),
        }
    }
}

// ── RootMode ─────────────────────────────────────────────────────────────────

/// Whether the scripts create a fresh project directory or fill an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootMode {
    #[default]
    New,
    Existing,
}

impl RootMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
        }
    }
}

impl fmt::Display for RootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Toggle ───────────────────────────────────────────────────────────────────

/// Tri-state inclusion flag.
///
/// Deserializes from `true`, `false`, `null` or an absent field; `Unset` means
/// "use the default for this context", which only [`Toggle::resolve`] knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Toggle {
    #[default]
    Unset,
    On,
    Off,
}

impl Toggle {
    /// Resolve against the context-specific default.
    pub const fn resolve(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::On => true,
            Self::Off => false,
        }
    }

    /// Explicitly switched off (distinct from `Unset`).
    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::On,
            Some(false) => Self::Off,
        }
    }
}

impl From<Toggle> for Option<bool> {
    fn from(value: Toggle) -> Self {
        match value {
            Toggle::Unset => None,
            Toggle::On => Some(true),
            Toggle::Off => Some(false),
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

// ── FieldType ────────────────────────────────────────────────────────────────

/// Type of a custom data-model field.
///
/// Unknown type names deserialize to [`FieldType::String`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Datetime,
    Uuid,
}

impl FieldType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Datetime => "datetime",
            Self::Uuid => "uuid",
        }
    }

    /// Parse leniently: aliases are accepted, anything else is a string.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "int64" | "number" => Self::Int,
            "float" | "float64" | "double" | "decimal" => Self::Float,
            "bool" | "boolean" => Self::Bool,
            "datetime" | "timestamp" | "time" | "date" => Self::Datetime,
            "uuid" => Self::Uuid,
            _ => Self::String,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
