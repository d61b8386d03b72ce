//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `layer-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{DeploymentManifest, ModuleManifest, SourceFile};
use crate::error::LayerResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `layer_adapters::filesystem::LocalFilesystem` (production)
/// - `layer_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> LayerResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> LayerResult<()>;

    fn read_file(&self, path: &Path) -> LayerResult<String>;

    /// Every regular file below `root`, relative to it, sorted.
    fn list_files(&self, root: &Path) -> LayerResult<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> LayerResult<()>;
}

/// Port for turning a syntax tree into source text.
///
/// Implemented by `layer_adapters::renderer::GoRenderer`.
#[cfg_attr(test, mockall::automock)]
pub trait SourceRenderer: Send + Sync {
    /// Print and canonically format `file`. Fails on composition errors.
    fn render(&self, file: &SourceFile) -> LayerResult<String>;
}

/// Port for the textual manifests written next to the sources.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestRenderer: Send + Sync {
    /// `go.mod`
    fn render_module(&self, manifest: &ModuleManifest) -> LayerResult<String>;

    /// `docker-compose.yml`
    fn render_deployment(&self, manifest: &DeploymentManifest) -> LayerResult<String>;

    /// Per-service `Dockerfile`.
    fn render_dockerfile(&self, manifest: &ModuleManifest) -> LayerResult<String>;
}
