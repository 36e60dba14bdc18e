//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Why a template could not be turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFailure {
    /// The logical path does not resolve to a template.
    NotFound,
    /// The template text is malformed.
    Parse,
    /// Substitution failed, e.g. a referenced key is absent from the context.
    Render,
}

impl fmt::Display for TemplateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::Parse => "parse error",
            Self::Render => "render error",
        })
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The template provider failed; generation aborts with no partial tree.
    #[error("Template '{path}' {kind}: {reason}")]
    Template {
        path: String,
        kind: TemplateFailure,
        reason: String,
    },

    /// Template root is missing or unreadable.
    #[error("Template root {path} is unavailable: {reason}")]
    TemplateRoot { path: PathBuf, reason: String },

    /// Autopilot boilerplate could not be placed.
    #[error("Autopilot failed: {reason}")]
    Autopilot { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Adapter state is unusable (lock poisoned).
    #[error("Adapter state is unavailable")]
    LockPoisoned,

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn template(path: impl Into<String>, kind: TemplateFailure, reason: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Template {
                kind: TemplateFailure::NotFound,
                path,
                ..
            } => vec![
                format!("No template at logical path '{path}'"),
                "Try: stacksprint list --templates".into(),
                "Or point --templates / STACKSPRINT_TEMPLATES_DIR at a complete template root".into(),
            ],
            Self::Template { path, .. } => vec![
                format!("Fix the template file '{path}'"),
                "Placeholders look like {{ key }}; write \\{{ for a literal {{".into(),
            ],
            Self::TemplateRoot { path, .. } => vec![
                format!("Check that {} exists and is a directory", path.display()),
                "Omit --templates to use the built-in templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it".into(),
                "Choose a different project name".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Template {
                kind: TemplateFailure::NotFound,
                ..
            }
            | Self::TemplateRoot { .. } => ErrorCategory::NotFound,
            Self::Template { .. } | Self::Autopilot { .. } => ErrorCategory::Internal,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } | Self::LockPoisoned => {
                ErrorCategory::Internal
            }
            Self::ProjectExists { .. } => ErrorCategory::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_failures_are_categorized_by_kind() {
        let missing = ApplicationError::template("go/x.tmpl", TemplateFailure::NotFound, "no such file");
        assert_eq!(missing.category(), ErrorCategory::NotFound);
        assert!(missing.to_string().contains("go/x.tmpl"));

        let broken = ApplicationError::template("go/x.tmpl", TemplateFailure::Parse, "unterminated");
        assert_eq!(broken.category(), ErrorCategory::Internal);
        assert!(broken.to_string().contains("parse error"));
    }
}
