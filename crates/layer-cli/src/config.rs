//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `LAYER_*` environment variables (`LAYER_DEFAULTS__GO_VERSION=1.22`)
//! 3. `./.layer.toml`
//! 4. The user config file, or the file given with `--config`
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use layer_core::domain::entities::manifest::DEFAULT_GO_VERSION;

use crate::error::{CliError, CliResult};

/// Project-local configuration file name.
pub const LOCAL_FILE: &str = ".layer.toml";

/// Every key accepted by `layer config get|set`.
pub const KEYS: &[&str] = &[
    "defaults.go_version",
    "defaults.output_dir",
    "defaults.force",
    "output.no_color",
    "output.format",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects and services.
    pub defaults: Defaults,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Go version written to `go.mod` and the builder image.
    pub go_version: String,
    /// Parent directory for `layer new` when given a bare name.
    pub output_dir: PathBuf,
    /// Overwrite existing service directories without `--force`.
    pub force: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            go_version: DEFAULT_GO_VERSION.into(),
            output_dir: PathBuf::from("."),
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist when `require_explicit` is set;
    /// the default locations are always optional.
    pub fn load(config_file: Option<&Path>, require_explicit: bool) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(require_explicit)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_FILE)).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix("LAYER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Reads one config file on its own, or defaults when it is missing.
    pub fn read_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| CliError::IoError {
            message: format!("Failed to read '{}'", path.display()),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| CliError::ConfigError {
            message: format!("'{}' is not valid configuration: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Writes this configuration as TOML, creating parent directories.
    pub fn write_file(&self, path: &Path) -> CliResult<()> {
        let toml = toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::IoError {
                message: format!("Failed to create config directory '{}'", parent.display()),
                source: e,
            })?;
        }

        std::fs::write(path, toml).map_err(|e| CliError::IoError {
            message: format!("Failed to write config to '{}'", path.display()),
            source: e,
        })
    }

    pub fn get(&self, key: &str) -> CliResult<String> {
        match key {
            "defaults.go_version" => Ok(self.defaults.go_version.clone()),
            "defaults.output_dir" => Ok(self.defaults.output_dir.display().to_string()),
            "defaults.force" => Ok(self.defaults.force.to_string()),
            "output.no_color" => Ok(self.output.no_color.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Sets `key` from its textual form, checking the value's type.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        match key {
            "defaults.go_version" => {
                if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
                    return Err(invalid_value(key, value, "expected a version like 1.23"));
                }
                self.defaults.go_version = value.into();
            }
            "defaults.output_dir" => self.defaults.output_dir = PathBuf::from(value),
            "defaults.force" => self.defaults.force = parse_bool(key, value)?,
            "output.no_color" => self.output.no_color = parse_bool(key, value)?,
            "output.format" => {
                if crate::cli::OutputFormat::from_config(value).is_none() {
                    return Err(invalid_value(key, value, "expected auto, human, plain or json"));
                }
                self.output.format = value.to_ascii_lowercase();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.layer.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "layer", "layer")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_FILE))
    }

    /// The file `config set` and `config path` act on.
    pub fn active_path(explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None if Path::new(LOCAL_FILE).is_file() => PathBuf::from(LOCAL_FILE),
            None => Self::config_path(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> CliResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid_value(key, value, "expected true or false")),
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known keys: {})", KEYS.join(", ")),
        source: None,
    }
}

fn invalid_value(key: &str, value: &str, expected: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Invalid value '{value}' for '{key}': {expected}"),
        source: None,
    }
}
