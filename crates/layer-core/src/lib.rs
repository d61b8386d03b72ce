//! Layer Core - Go backend generation engine
//!
//! This crate provides the domain and application layers for the Layer
//! scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            layer-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, TemplateService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, SourceRenderer, Manifests) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     layer-adapters (Infrastructure)     │
//! │   (GoRenderer, LocalFilesystem, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Syntax, Service, Registry, Options)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use layer_core::domain::{options, template, Variant};
//!
//! let service = template(
//!     Variant::Api,
//!     [options::with_name("auth-service"), options::with_port(8080)],
//! )
//! .unwrap();
//!
//! // Render and write it with a GenerationService and injected adapters:
//! // service.generate_project(vec![service], "./out")
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        GenerationReport, GenerationService, ServiceFailure, TemplateInfo, TemplateService,
        ports::{Filesystem, ManifestRenderer, SourceRenderer},
    };
    pub use crate::domain::{
        Bucket, CorsOptions, Database, GenerationConfig, GeneratorRegistry, LayerProject,
        ProjectStructure, Route, RouteGroup, RoutesConfig, Service, ServiceOption,
        ServiceTemplate, SourceFile, Variant, options, template,
    };
    pub use crate::error::{LayerError, LayerResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
