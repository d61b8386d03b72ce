//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Where and why one service failed to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub service: String,
    pub bucket: Option<String>,
    pub file: Option<String>,
    pub reason: String,
}

impl ServiceFailure {
    pub fn new(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            bucket: None,
            file: None,
            reason: reason.into(),
        }
    }

    pub fn at(mut self, bucket: impl Into<String>, file: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service)?;
        if let Some(bucket) = &self.bucket {
            write!(f, "/{bucket}")?;
        }
        if let Some(file) = &self.file {
            write!(f, "/{file}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

fn list(failures: &[ServiceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A syntax tree could not be printed.
    #[error("Rendering '{file}' failed: {reason}")]
    RenderingFailed { file: String, reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A lock guarding shared state was poisoned.
    #[error("Shared state is unavailable")]
    LockError,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Output directory already exists and overwriting is off.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// One or more services could not be generated.
    #[error("{} service(s) failed: {}", failures.len(), list(failures))]
    GenerationFailed { failures: Vec<ServiceFailure> },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RenderingFailed { file, .. } => vec![
                format!("The generator for '{file}' built an invalid syntax tree"),
                "Check custom generators registered for this bucket".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::LockError => vec!["Try again in a moment".into()],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different output directory".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Remove {} by hand before retrying",
                path.display()
            )],
            Self::GenerationFailed { failures } => failures
                .iter()
                .map(|f| format!("Fix service '{}' and run `layer generate` again", f.service))
                .collect(),
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::LockError => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ProjectExists { .. } => ErrorCategory::Conflict,
            Self::RenderingFailed { .. } | Self::GenerationFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failed_lists_every_failure() {
        let err = ApplicationError::GenerationFailed {
            failures: vec![
                ServiceFailure::new("a", "disk full").at("routes", "routes.go"),
                ServiceFailure::new("b", "bad tree"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 service(s) failed"));
        assert!(msg.contains("a/routes/routes.go: disk full"));
        assert!(msg.contains("b: bad tree"));
        assert_eq!(err.suggestions().len(), 2);
    }
}
