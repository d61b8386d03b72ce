//! Text renderers for `go.mod`, `Dockerfile` and `docker-compose.yml`.

mod compose;
mod dockerfile;
mod gomod;

use layer_core::{
    application::ports::ManifestRenderer,
    domain::{DeploymentManifest, ModuleManifest},
    error::{Context, LayerResult},
};
use tracing::instrument;

/// [`ManifestRenderer`] writing plain text manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextManifestRenderer;

impl TextManifestRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestRenderer for TextManifestRenderer {
    #[instrument(skip_all, fields(module = %manifest.module))]
    fn render_module(&self, manifest: &ModuleManifest) -> LayerResult<String> {
        gomod::render(manifest).context("rendering go.mod")
    }

    #[instrument(skip_all, fields(project = %manifest.project))]
    fn render_deployment(&self, manifest: &DeploymentManifest) -> LayerResult<String> {
        compose::render(manifest).context("rendering docker-compose.yml")
    }

    #[instrument(skip_all, fields(module = %manifest.module))]
    fn render_dockerfile(&self, manifest: &ModuleManifest) -> LayerResult<String> {
        dockerfile::render(manifest).context("rendering Dockerfile")
    }
}
