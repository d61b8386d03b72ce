//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "list templates".

pub mod generation_service;
pub mod template_service;

pub use generation_service::{
    DriftReport, GenerateOptions, GenerationReport, GenerationService, ServiceReport,
};
pub use template_service::{TemplateInfo, TemplateService};
