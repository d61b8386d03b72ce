pub mod generated;
pub mod manifest;
pub mod project;
pub mod project_structure;
pub mod service;
pub mod template;

pub use generated::{GeneratedFile, Package};
pub use manifest::{DeployedService, Dependency, DeploymentManifest, ModuleManifest};
pub use project::LayerProject;
pub use project_structure::{DirectoryToCreate, FileOrigin, FileToWrite, FsEntry, ProjectStructure};
pub use service::{CorsOptions, Database, Route, RouteGroup, RoutesConfig, Service};
pub use template::ServiceTemplate;
