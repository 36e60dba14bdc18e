//! Unified error handling for StackSprint Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for StackSprint Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackSprintError {
    /// Errors from the domain layer (specification violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (templates, filesystem).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StackSprintError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in StackSprint".into(),
                "Please report it with the specification that triggered it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Rejected specification, as opposed to an engine or I/O failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StackSprintResult<T> = Result<T, StackSprintError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::TemplateFailure;

    #[test]
    fn domain_errors_keep_their_category() {
        let err: StackSprintError = DomainError::IncompatibleDatabase {
            framework: "django".into(),
            database: "mongodb".into(),
            reason: "no".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Compatibility);
        assert!(err.is_validation());
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn template_errors_are_not_validation() {
        let err: StackSprintError =
            ApplicationError::template("x.tmpl", TemplateFailure::Render, "missing key").into();
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Template 'x.tmpl' render error: missing key");
    }
}
