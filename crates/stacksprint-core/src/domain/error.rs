// ============================================================================
// domain/error.rs - specification validation errors
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is fatal to a generation call. Recoverable inconsistencies
/// are auto-corrected by the rule engine and reported as warnings instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid specification: {0}")]
    InvalidSpec(String),

    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid service '{name}': {reason}")]
    InvalidService { name: String, reason: String },

    #[error("invalid model '{name}': {reason}")]
    InvalidModel { name: String, reason: String },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("{framework} framework is not compatible with {database} in this generator")]
    IncompatibleDatabase {
        framework: String,
        database: String,
        reason: String,
    },

    #[error("framework '{framework}' is not available for language '{language}'")]
    FrameworkNotAvailable { framework: String, language: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSpec(msg) => vec![
                "Check your specification file".into(),
                format!("Details: {msg}"),
            ],
            Self::UnknownValue { field, .. } => vec![
                format!("Check the value of '{field}'"),
                "Try: stacksprint list".into(),
            ],
            Self::InvalidPath { .. } => vec![
                "Customization paths must be relative to the project root".into(),
                "Remove leading '/', drive letters and '..' segments".into(),
                "A path cannot be both a file and a folder".into(),
            ],
            Self::InvalidService { .. } => vec![
                "Service names must be lowercase letters, digits, '-' or '_'".into(),
                "Each service needs a unique, non-zero port".into(),
            ],
            Self::InvalidModel { .. } => vec![
                "Model and field names must start with a letter".into(),
                "Use letters, digits and '_' only".into(),
            ],
            Self::IncompatibleDatabase { reason, .. } => vec![
                reason.clone(),
                "Pick a SQL database (postgresql or mysql) or another framework".into(),
            ],
            Self::FrameworkNotAvailable { language, .. } => vec![
                format!("Pick a framework that targets {language}"),
                "Omit 'framework' to use the language default".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSpec(_)
            | Self::InvalidPath { .. }
            | Self::InvalidService { .. }
            | Self::InvalidModel { .. } => ErrorCategory::Validation,
            Self::IncompatibleDatabase { .. } | Self::FrameworkNotAvailable { .. } => {
                ErrorCategory::Compatibility
            }
            Self::UnknownValue { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
}
