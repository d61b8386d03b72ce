//! Infrastructure adapters for Layer.
//!
//! This crate implements the ports defined in `layer_core::application::ports`:
//! the Go source renderer, filesystems and manifest text. It also owns the
//! project file (`layer.json`) persistence used by the CLI.

pub mod filesystem;
pub mod manifest;
pub mod project_file;
pub mod renderer;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::TextManifestRenderer;
pub use renderer::GoRenderer;
