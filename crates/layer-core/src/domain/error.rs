// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (collected into per-service failure reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Service name is empty")]
    EmptyServiceName,

    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: String },

    #[error("Service '{name}' is declared more than once")]
    DuplicateService { name: String },

    #[error("Services '{first}' and '{second}' both publish port {port}")]
    DuplicatePort {
        port: u16,
        first: String,
        second: String,
    },

    #[error("Service '{service}' generates '{file}' twice in bucket '{bucket}'")]
    DuplicateFile {
        service: String,
        bucket: String,
        file: String,
    },

    #[error("Duplicate path in project structure: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Project structure for '{root}' is empty")]
    EmptyStructure { root: String },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("Unknown service variant '{0}'")]
    UnknownVariant(String),

    #[error("Unknown HTTP method '{0}'")]
    UnknownHttpMethod(String),

    #[error("Unknown bucket '{0}'")]
    UnknownBucket(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("No service template named '{0}'")]
    UnknownTemplate(String),

    #[error("No service named '{0}' in project")]
    ServiceNotFound(String),

    #[error("No layer project found in '{start}' or any parent directory")]
    ProjectNotFound { start: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyServiceName => vec![
                "Give the service a name, e.g. --name auth-service".into(),
                "Templates provide a default name when none is set".into(),
            ],
            Self::InvalidServiceName { reason, .. } => vec![
                format!("Details: {reason}"),
                "Service names become Go module paths and directory names".into(),
                "Use lowercase letters, digits, '-' and '_'".into(),
            ],
            Self::DuplicateService { name } => vec![
                format!("Rename one of the '{name}' services"),
                "Each service needs its own directory".into(),
            ],
            Self::DuplicatePort { second, .. } => vec![
                format!("Give '{second}' its own port with --port"),
                "docker compose cannot publish one host port twice".into(),
            ],
            Self::DuplicateFile { bucket, .. } => vec![
                format!("Two generators in '{bucket}' emit the same file name"),
                "Remove or rename one of the custom generators".into(),
            ],
            Self::UnknownVariant(_) => vec!["Valid variants: api, broker, listener".into()],
            Self::UnknownHttpMethod(_) => {
                vec!["Valid methods: GET, POST, PUT, DELETE, PATCH, OPTIONS".into()]
            }
            Self::UnknownTemplate(name) => vec![
                format!("Template '{name}' does not exist"),
                "Try: layer list".into(),
            ],
            Self::ServiceNotFound(_) => vec!["Check the services listed in layer.json".into()],
            Self::ProjectNotFound { .. } => vec![
                "Run this command inside a generated project".into(),
                "Create one with: layer new <name>".into(),
            ],
            Self::InvalidProject(msg) => vec![
                "Check the project file for mistakes".into(),
                format!("Details: {msg}"),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTemplate(_) | Self::ServiceNotFound(_) | Self::ProjectNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::DuplicateService { .. }
            | Self::DuplicatePort { .. }
            | Self::DuplicateFile { .. }
            | Self::DuplicatePath { .. } => ErrorCategory::Conflict,
            Self::AbsolutePathNotAllowed { .. } | Self::EmptyStructure { .. } => {
                ErrorCategory::Internal
            }
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
