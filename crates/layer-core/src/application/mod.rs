//! Application layer for Layer.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    DriftReport, GenerateOptions, GenerationReport, GenerationService, ServiceReport,
    TemplateInfo, TemplateService,
};

pub use ports::{Filesystem, ManifestRenderer, SourceRenderer};

pub use error::{ApplicationError, ServiceFailure};
