//! Unified error handling for Layer Core.
//!
//! Wraps domain and application errors behind one type with
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Layer Core operations.
#[derive(Debug, Error, Clone)]
pub enum LayerError {
    /// Business rule violations (names, duplicates, unknown values).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Rendering, filesystem and orchestration failures.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl LayerError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `layer config path` to locate the active config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Layer".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether another attempt may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::LockError))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type LayerResult<T> = Result<T, LayerError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> LayerResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> LayerResult<T> {
        self.map_err(|e| LayerError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_categories_carry_through() {
        let err = LayerError::from(DomainError::DuplicateService {
            name: "auth".into(),
        });
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let res: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let err = res.context("formatting").unwrap_err();
        assert!(err.to_string().contains("formatting"));
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
