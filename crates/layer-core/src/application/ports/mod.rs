//! Application ports (traits) for external dependencies.
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure
//!   - `Filesystem`: file operations
//!   - `SourceRenderer`: syntax tree to Go source
//!   - `ManifestRenderer`: `go.mod`, `Dockerfile`, `docker-compose.yml`
//!
//! Driving ports are the application services themselves.

pub mod output;

pub use output::{Filesystem, ManifestRenderer, SourceRenderer};

#[cfg(test)]
pub use output::{MockFilesystem, MockManifestRenderer, MockSourceRenderer};
