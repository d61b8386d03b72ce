//! Project file persistence.
//!
//! A generated project records its services in `layer.json` at the project
//! root. `layer.toml` is accepted as a hand-written alternative; when both
//! exist the JSON file wins. Saving always writes JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use layer_core::{
    application::ApplicationError,
    domain::{DomainError, LayerProject},
    error::LayerResult,
};
use tracing::{debug, instrument};

pub const JSON_FILE: &str = "layer.json";
pub const TOML_FILE: &str = "layer.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Json,
    Toml,
}

impl ProjectFormat {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Json => JSON_FILE,
            Self::Toml => TOML_FILE,
        }
    }

    fn parse(self, text: &str) -> Result<LayerProject, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// The project file in `root`, if any.
pub fn locate(root: &Path) -> Option<(PathBuf, ProjectFormat)> {
    [ProjectFormat::Json, ProjectFormat::Toml]
        .into_iter()
        .map(|format| (root.join(format.file_name()), format))
        .find(|(path, _)| path.is_file())
}

/// Nearest ancestor of `start` (itself included) holding a project file.
pub fn find_root(start: &Path) -> LayerResult<PathBuf> {
    start
        .ancestors()
        .find(|dir| locate(dir).is_some())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            DomainError::ProjectNotFound {
                start: start.display().to_string(),
            }
            .into()
        })
}

#[instrument(skip_all, fields(root = %root.display()))]
pub fn load(root: &Path) -> LayerResult<LayerProject> {
    let (path, format) = locate(root).ok_or_else(|| DomainError::ProjectNotFound {
        start: root.display().to_string(),
    })?;
    debug!(file = %path.display(), ?format, "Loading project");

    let text = fs::read_to_string(&path).map_err(|e| ApplicationError::FilesystemError {
        path: path.clone(),
        reason: format!("Failed to read project file: {e}"),
    })?;

    let mut project = format
        .parse(&text)
        .map_err(|e| DomainError::InvalidProject(format!("{}: {e}", path.display())))?;
    if project.root.is_empty() {
        project.root = root.display().to_string();
    }
    project.validate()?;
    Ok(project)
}

/// Writes `layer.json` into `root`, creating the directory when missing.
#[instrument(skip_all, fields(root = %root.display(), project = %project.name))]
pub fn save(root: &Path, project: &LayerProject) -> LayerResult<PathBuf> {
    let io_error = |path: &Path, e: std::io::Error| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    fs::create_dir_all(root).map_err(|e| io_error(root, e))?;

    let path = root.join(JSON_FILE);
    let mut json = serde_json::to_string_pretty(project).map_err(|e| {
        ApplicationError::ValidationFailed(format!("project cannot be serialized: {e}"))
    })?;
    json.push('\n');

    fs::write(&path, json).map_err(|e| io_error(&path, e))?;
    debug!(file = %path.display(), services = project.services.len(), "Saved project");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_core::domain::{Service, Variant};
    use tempfile::TempDir;

    #[test]
    fn saved_project_loads_back() {
        let tmp = TempDir::new().unwrap();
        let project = LayerProject::new("shop")
            .with_root(tmp.path().display().to_string())
            .with_service(Service::new("auth-service", Variant::Api));

        let path = save(tmp.path(), &project).unwrap();
        assert!(path.ends_with(JSON_FILE));

        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.id, project.id);
        assert_eq!(loaded.services, project.services);
    }

    #[test]
    fn toml_project_is_accepted() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(TOML_FILE),
            "name = \"shop\"\n\n[[services]]\nname = \"events\"\nvariant = \"listener\"\nport = 0\n",
        )
        .unwrap();

        let project = load(tmp.path()).unwrap();
        assert_eq!(project.name, "shop");
        assert_eq!(project.services[0].variant, Variant::Listener);
        assert_eq!(project.root, tmp.path().display().to_string());
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        save(tmp.path(), &LayerProject::new("shop")).unwrap();
        let nested = tmp.path().join("auth-service/handlers");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn missing_project_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("No layer project found"));
    }

    #[test]
    fn malformed_file_is_an_invalid_project() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(JSON_FILE), "{ not json").unwrap();
        assert!(load(tmp.path()).unwrap_err().to_string().contains("Invalid project"));
    }
}
