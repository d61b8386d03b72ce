//! Generation Service - main application orchestrator.
//!
//! Drives the whole pipeline for a set of services:
//! 1. Generate packages and validate the result
//! 2. Render every file into a `ProjectStructure` per service
//! 3. Write each service, rolling it back if anything fails
//! 4. Write the deployment manifest last

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, ServiceFailure,
        ports::{Filesystem, ManifestRenderer, SourceRenderer},
    },
    domain::{
        DeploymentManifest, DomainValidator as validator, FileOrigin, FsEntry, GenerationConfig,
        GeneratorRegistry, ModuleManifest, ProjectStructure, Service, entities::manifest,
    },
    error::{LayerError, LayerResult},
};

pub const MODULE_FILE: &str = "go.mod";
pub const DOCKERFILE: &str = "Dockerfile";
pub const ENV_FILE: &str = ".env";
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Knobs of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Replace existing service directories instead of failing.
    pub overwrite: bool,
    pub go_version: String,
    /// Name used for the compose network; defaults to the output directory name.
    pub project_name: Option<String>,
    /// Write `docker-compose.yml` at the output root.
    pub deployment: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            go_version: manifest::DEFAULT_GO_VERSION.into(),
            project_name: None,
            deployment: true,
        }
    }
}

impl GenerateOptions {
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_go_version(mut self, version: impl Into<String>) -> Self {
        self.go_version = version.into();
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_deployment(mut self, deployment: bool) -> Self {
        self.deployment = deployment;
        self
    }

    fn project_name(&self, output_dir: &Path) -> String {
        self.project_name.clone().unwrap_or_else(|| {
            output_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "layer".into())
        })
    }
}

/// What was written for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub name: String,
    pub dir: PathBuf,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub services: Vec<ServiceReport>,
    /// Path of the compose file, when one was written.
    pub deployment: Option<PathBuf>,
}

impl GenerationReport {
    pub fn file_count(&self) -> usize {
        self.services.iter().map(|s| s.files).sum::<usize>() + usize::from(self.deployment.is_some())
    }
}

/// Difference between a fresh plan and what is on disk.
///
/// Paths are relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriftReport {
    pub added: Vec<PathBuf>,
    pub changed: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// On disk but no longer generated.
    pub stale: Vec<PathBuf>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.stale.is_empty()
    }
}

/// Main generation service.
pub struct GenerationService {
    renderer: Box<dyn SourceRenderer>,
    manifests: Box<dyn ManifestRenderer>,
    filesystem: Box<dyn Filesystem>,
    registry: Option<GeneratorRegistry>,
}

impl GenerationService {
    pub fn new(
        renderer: Box<dyn SourceRenderer>,
        manifests: Box<dyn ManifestRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            renderer,
            manifests,
            filesystem,
            registry: None,
        }
    }

    /// Use `registry` for every service instead of the variant bundles.
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// `GenerateProject(services, outputDir)`.
    pub fn generate_project(
        &self,
        services: Vec<Service>,
        output_dir: impl AsRef<Path>,
        opts: &GenerateOptions,
    ) -> LayerResult<GenerationReport> {
        self.generate_project_with(services, output_dir, opts, |_, _| {})
    }

    /// Like [`generate_project`](Self::generate_project), calling
    /// `on_service` after each service is written or has failed.
    ///
    /// A failing service is rolled back and does not stop the others; all
    /// failures are returned together at the end.
    #[instrument(
        skip_all,
        fields(services = services.len(), output_dir = %output_dir.as_ref().display())
    )]
    pub fn generate_project_with(
        &self,
        services: Vec<Service>,
        output_dir: impl AsRef<Path>,
        opts: &GenerateOptions,
        mut on_service: impl FnMut(&str, Result<&ServiceReport, &ServiceFailure>),
    ) -> LayerResult<GenerationReport> {
        let output_dir = output_dir.as_ref();
        let services = self.prepare(services)?;

        if !opts.overwrite {
            if let Some(existing) = services
                .iter()
                .map(|s| output_dir.join(&s.name))
                .find(|dir| self.filesystem.exists(dir))
            {
                return Err(ApplicationError::ProjectExists { path: existing }.into());
            }
        }

        let mut report = GenerationReport {
            output_dir: output_dir.to_path_buf(),
            ..Default::default()
        };
        let mut written = Vec::new();
        let mut failures = Vec::new();

        for service in &services {
            match self.materialize(service, output_dir, opts) {
                Ok(service_report) => {
                    info!(service = %service.name, files = service_report.files, "Service written");
                    on_service(&service.name, Ok(&service_report));
                    report.services.push(service_report);
                    written.push(service.clone());
                }
                Err(failure) => {
                    warn!(service = %service.name, reason = %failure.reason, "Service failed");
                    on_service(&service.name, Err(&failure));
                    failures.push(failure);
                }
            }
        }

        if opts.deployment && !written.is_empty() {
            let path = self.write_deployment(&written, output_dir, &opts.project_name(output_dir))?;
            report.deployment = Some(path);
        }

        if !failures.is_empty() {
            return Err(ApplicationError::GenerationFailed { failures }.into());
        }

        info!(files = report.file_count(), "Generation completed successfully");
        Ok(report)
    }

    /// Dry run: the structures that would be written, one per service.
    #[instrument(skip_all, fields(services = services.len()))]
    pub fn plan(
        &self,
        services: Vec<Service>,
        output_dir: impl AsRef<Path>,
        opts: &GenerateOptions,
    ) -> LayerResult<Vec<ProjectStructure>> {
        let output_dir = output_dir.as_ref();
        let services = self.prepare(services)?;

        let mut structures = Vec::with_capacity(services.len());
        let mut failures = Vec::new();
        for service in &services {
            match self.build_structure(service, output_dir.join(&service.name), opts) {
                Ok(structure) => structures.push(structure),
                Err(failure) => failures.push(failure),
            }
        }

        if failures.is_empty() {
            Ok(structures)
        } else {
            Err(ApplicationError::GenerationFailed { failures }.into())
        }
    }

    /// Compares a fresh plan with the files currently under `output_dir`.
    #[instrument(skip_all, fields(output_dir = %output_dir.as_ref().display()))]
    pub fn check(
        &self,
        services: Vec<Service>,
        output_dir: impl AsRef<Path>,
        opts: &GenerateOptions,
    ) -> LayerResult<DriftReport> {
        let output_dir = output_dir.as_ref();
        let structures = self.plan(services, output_dir, opts)?;
        let mut drift = DriftReport::default();

        for structure in &structures {
            let service_dir = structure.root.strip_prefix(output_dir).unwrap_or(&structure.root);
            let mut planned = BTreeSet::new();

            for file in structure.files() {
                planned.insert(file.path.clone());
                let relative = service_dir.join(&file.path);
                let path = structure.root.join(&file.path);

                if !self.filesystem.exists(&path) {
                    drift.added.push(relative);
                } else if self.filesystem.read_file(&path)? == file.content {
                    drift.unchanged.push(relative);
                } else {
                    drift.changed.push(relative);
                }
            }

            if self.filesystem.exists(&structure.root) {
                for on_disk in self.filesystem.list_files(&structure.root)? {
                    if !planned.contains(&on_disk) {
                        drift.stale.push(service_dir.join(on_disk));
                    }
                }
            }
        }

        debug!(
            added = drift.added.len(),
            changed = drift.changed.len(),
            stale = drift.stale.len(),
            "Drift computed"
        );
        Ok(drift)
    }

    /// Writes `docker-compose.yml` for `services` under `output_dir`.
    pub fn write_deployment(
        &self,
        services: &[Service],
        output_dir: &Path,
        project: &str,
    ) -> LayerResult<PathBuf> {
        validator::validate_services(services).map_err(LayerError::Domain)?;
        let manifest = DeploymentManifest::for_project(project, services);
        let content = self.manifests.render_deployment(&manifest)?;
        let path = output_dir.join(COMPOSE_FILE);

        self.filesystem.create_dir_all(output_dir)?;
        self.filesystem.write_file(&path, &content)?;
        info!(path = %path.display(), services = services.len(), "Deployment manifest written");
        Ok(path)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Generates packages for every service and rejects invalid results
    /// before anything is rendered.
    fn prepare(&self, services: Vec<Service>) -> LayerResult<Vec<Service>> {
        let mut config = GenerationConfig::new(services);
        if let Some(registry) = &self.registry {
            config = config.with_registry(registry.clone());
        }
        let services = config.generate().into_services();

        validator::validate_services(&services).map_err(LayerError::Domain)?;
        for service in &services {
            validator::validate_service(service).map_err(LayerError::Domain)?;
        }
        Ok(services)
    }

    /// Renders every file of `service`.
    ///
    /// Bucket directories come first, then sources, then the manifests.
    fn build_structure(
        &self,
        service: &Service,
        root: PathBuf,
        opts: &GenerateOptions,
    ) -> Result<ProjectStructure, ServiceFailure> {
        let mut structure = ProjectStructure::new(root);

        for package in &service.packages {
            if let Some(dir) = package.bucket.dir() {
                structure.add_directory(dir);
            }
        }

        for package in &service.packages {
            for file in &package.files {
                let content = self.renderer.render(&file.source).map_err(|e| {
                    ServiceFailure::new(&service.name, e.to_string())
                        .at(package.bucket.as_str(), &file.name)
                })?;
                let path = match package.bucket.dir() {
                    Some(dir) => Path::new(dir).join(&file.name),
                    None => PathBuf::from(&file.name),
                };
                structure.add_file(path, content, FileOrigin::Bucket(package.bucket));
            }
        }

        let module = ModuleManifest::for_service(service).with_go_version(&opts.go_version);
        let manifest_failure =
            |file: &str, e: LayerError| ServiceFailure::new(&service.name, e.to_string()).at("manifest", file);

        let go_mod = self
            .manifests
            .render_module(&module)
            .map_err(|e| manifest_failure(MODULE_FILE, e))?;
        structure.add_file(MODULE_FILE, go_mod, FileOrigin::Manifest);

        let dockerfile = self
            .manifests
            .render_dockerfile(&module)
            .map_err(|e| manifest_failure(DOCKERFILE, e))?;
        structure.add_file(DOCKERFILE, dockerfile, FileOrigin::Manifest);

        if let Some(db) = service.database.as_ref().filter(|db| !db.url.is_empty()) {
            structure.add_file(ENV_FILE, format!("DATABASE_URL={}\n", db.url), FileOrigin::Manifest);
        }

        validator::validate_project_structure(&structure)
            .map_err(|e| ServiceFailure::new(&service.name, e.to_string()))?;
        Ok(structure)
    }

    fn materialize(
        &self,
        service: &Service,
        output_dir: &Path,
        opts: &GenerateOptions,
    ) -> Result<ServiceReport, ServiceFailure> {
        let root = output_dir.join(&service.name);
        let structure = self.build_structure(service, root.clone(), opts)?;

        if self.filesystem.exists(&root) {
            debug!(path = %root.display(), "Replacing existing service directory");
            self.filesystem
                .remove_dir_all(&root)
                .map_err(|e| ServiceFailure::new(&service.name, e.to_string()))?;
        }

        if let Err((failure, origin)) = self.write_all(&structure, &service.name) {
            warn!(service = %service.name, "Write failed, attempting rollback");
            self.rollback(&root);
            return Err(match origin {
                Some((bucket, file)) => failure.at(bucket, file),
                None => failure,
            });
        }

        Ok(ServiceReport {
            name: service.name.clone(),
            dir: root,
            files: structure.file_count(),
        })
    }

    /// Writes all entries; on failure reports the file being written.
    #[allow(clippy::type_complexity)]
    fn write_all(
        &self,
        structure: &ProjectStructure,
        service: &str,
    ) -> Result<(), (ServiceFailure, Option<(String, String)>)> {
        let fail = |e: LayerError| ServiceFailure::new(service, e.to_string());

        self.filesystem
            .create_dir_all(&structure.root)
            .map_err(|e| (fail(e), None))?;

        for entry in &structure.entries {
            match entry {
                FsEntry::Directory(dir) => {
                    let path = structure.root.join(&dir.path);
                    self.filesystem
                        .create_dir_all(&path)
                        .map_err(|e| (fail(e), None))?;
                }
                FsEntry::File(file) => {
                    let path = structure.root.join(&file.path);
                    let origin = || {
                        let bucket = file.bucket().map_or("manifest", |b| b.as_str());
                        let name = file
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        Some((bucket.to_string(), name))
                    };

                    if let Some(parent) = path.parent() {
                        self.filesystem
                            .create_dir_all(parent)
                            .map_err(|e| (fail(e), origin()))?;
                    }
                    self.filesystem
                        .write_file(&path, &file.content)
                        .map_err(|e| (fail(e), origin()))?;
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!(path = %root.display(), "Rollback successful");
        }
    }
}
