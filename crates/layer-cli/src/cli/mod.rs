//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use layer_core::domain::{HttpMethod, Variant};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "layer",
    bin_name = "layer",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Multi-service Go backend scaffolding",
    long_about = "Layer generates Go microservices (HTTP APIs, message brokers \
                  and listeners) side by side, with go.mod, Dockerfiles and a \
                  docker-compose.yml wiring them together.",
    after_help = "EXAMPLES:\n\
        \x20 layer new shop --template auth\n\
        \x20 layer add --template listener --name events\n\
        \x20 layer generate --check\n\
        \x20 layer completions bash > /usr/share/bash-completion/completions/layer",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project, optionally with its first service.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 layer new shop --template auth\n\
            \x20 layer new shop --variant api --name orders --port 9000 --postgres\n\
            \x20 layer new shop --template custom --route GET:/orders:ListOrders\n\
            \x20 layer new shop --no-service"
    )]
    New(NewArgs),

    /// Add a service to the project in the current directory.
    #[command(
        about = "Add a service to an existing project",
        after_help = "EXAMPLES:\n\
            \x20 layer add --template broker\n\
            \x20 layer add --variant listener --name mailer\n\
            \x20 layer add -C ./shop --template custom --name billing --port 8085"
    )]
    Add(AddArgs),

    /// Regenerate every service recorded in `layer.json`.
    #[command(
        visible_alias = "gen",
        about = "Regenerate the project's services",
        after_help = "EXAMPLES:\n\
            \x20 layer generate --check     # report drift, exit non-zero if any\n\
            \x20 layer generate --dry-run   # list the files that would be written\n\
            \x20 layer generate --force     # rewrite every service directory"
    )]
    Generate(GenerateArgs),

    /// List service templates.
    #[command(
        visible_alias = "ls",
        about = "List available service templates",
        after_help = "EXAMPLES:\n\
            \x20 layer list\n\
            \x20 layer list --variant api\n\
            \x20 layer list --format json"
    )]
    List(ListArgs),

    /// Initialise a Layer configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 layer init           # user config directory\n\
            \x20 layer init --local   # ./.layer.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 layer completions bash > ~/.local/share/bash-completion/completions/layer\n\
            \x20 layer completions zsh  > ~/.zfunc/_layer\n\
            \x20 layer completions fish > ~/.config/fish/completions/layer.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Layer configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 layer config get defaults.go_version\n\
            \x20 layer config set defaults.go_version 1.23\n\
            \x20 layer config list"
    )]
    Config(ConfigCommands),
}

// ── service selection (shared by new / add) ──────────────────────────────────

/// How the service to generate is chosen and configured.
///
/// `--template` starts from a catalog preset; `--variant` starts from a bare
/// variant. The remaining flags override either.
#[derive(Debug, Clone, Default, Args)]
pub struct ServiceArgs {
    /// Catalog template to start from (see `layer list`).
    #[arg(
        short = 't',
        long = "template",
        value_name = "ID",
        conflicts_with = "variant",
        help = "Service template ID (auth, custom, broker, listener)"
    )]
    pub template: Option<String>,

    /// Bare variant to start from.
    #[arg(long = "variant", value_enum, value_name = "VARIANT", help = "Service variant")]
    pub variant: Option<VariantArg>,

    /// Service name; also the Go module path and directory name.
    #[arg(long = "name", value_name = "NAME", help = "Service name")]
    pub name: Option<String>,

    #[arg(short = 'p', long = "port", value_name = "PORT", help = "HTTP port")]
    pub port: Option<u16>,

    /// Attach PostgreSQL through pgx.
    #[arg(long = "postgres", help = "Use PostgreSQL")]
    pub postgres: bool,

    /// Extra route, repeatable.
    #[arg(
        long = "route",
        value_name = "METHOD:PATH:HANDLER",
        help = "Add a route, e.g. POST:/login:Login"
    )]
    pub routes: Vec<RouteArg>,
}

/// `METHOD:PATH:HANDLER`, split on the first and last colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteArg {
    pub method: String,
    pub path: String,
    pub handler: String,
}

impl FromStr for RouteArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (method, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected METHOD:PATH:HANDLER, got '{s}'"))?;
        let (path, handler) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("expected METHOD:PATH:HANDLER, got '{s}'"))?;

        let method = method.trim().to_ascii_uppercase();
        HttpMethod::from_str(&method).map_err(|e| e.to_string())?;
        if !path.starts_with('/') {
            return Err(format!("route path must start with '/', got '{path}'"));
        }
        if handler.is_empty() {
            return Err("handler name is empty".into());
        }

        Ok(Self {
            method,
            path: path.to_string(),
            handler: handler.to_string(),
        })
    }
}

/// Service variants as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum VariantArg {
    /// HTTP API backed by PostgreSQL.
    Api,
    /// HTTP ingress publishing to RabbitMQ.
    Broker,
    /// RabbitMQ consumer.
    Listener,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Api => Variant::Api,
            VariantArg::Broker => Variant::Broker,
            VariantArg::Listener => Variant::Listener,
        }
    }
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(id = "project", value_name = "NAME", help = "Project name or path")]
    pub project: String,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Create only `layer.json`, without a first service.
    #[arg(
        long = "no-service",
        conflicts_with_all = ["template", "variant"],
        help = "Create an empty project"
    )]
    pub no_service: bool,

    #[arg(long = "go-version", value_name = "VERSION", help = "Go version for go.mod and Dockerfiles")]
    pub go_version: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Overwrite an existing project (destructive).
    #[arg(long = "force", help = "Overwrite an existing project")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── add ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Directory inside the project; defaults to the current directory.
    #[arg(
        short = 'C',
        long = "project-dir",
        value_name = "DIR",
        help = "Project directory (searched upwards for layer.json)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(long = "go-version", value_name = "VERSION", help = "Go version for go.mod and Dockerfiles")]
    pub go_version: Option<String>,

    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,

    /// Replace a service of the same name.
    #[arg(long = "force", help = "Replace an existing service of the same name")]
    pub force: bool,

    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(
        short = 'C',
        long = "project-dir",
        value_name = "DIR",
        help = "Project directory (searched upwards for layer.json)"
    )]
    pub project_dir: Option<PathBuf>,

    /// Restrict generation to these services.
    #[arg(long = "only", value_name = "SERVICE", help = "Only regenerate SERVICE (repeatable)")]
    pub only: Vec<String>,

    #[arg(long = "go-version", value_name = "VERSION", help = "Go version for go.mod and Dockerfiles")]
    pub go_version: Option<String>,

    /// Compare generated output with the files on disk.
    #[arg(
        long = "check",
        conflicts_with_all = ["dry_run", "force"],
        help = "Report drift between layer.json and disk without writing"
    )]
    pub check: bool,

    #[arg(long = "dry-run", help = "List the files that would be written")]
    pub dry_run: bool,

    #[arg(long = "force", help = "Overwrite existing service directories")]
    pub force: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long = "variant", value_enum, help = "Filter by variant")]
    pub variant: Option<VariantArg>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One ID per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.layer.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.go_version`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
