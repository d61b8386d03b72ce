//! Implementation of the `layer new` command.
//!
//! Creates the project root with its `layer.json` and, when a service is
//! selected, generates it together with `docker-compose.yml`.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use layer_adapters::project_file;
use layer_core::{
    domain::{LayerProject, Service},
    error::LayerError,
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    commands::{
        base_options, confirm, generate_with_progress, generation_service, print_plan,
        print_report,
        service::{self, WhenUnselected},
    },
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `layer new` command.
///
/// 1. Resolve and validate the project name / directory
/// 2. Select the first service (flags, prompt, or none)
/// 3. Dry run: print the plan and stop
/// 4. Confirm, write `layer.json`, generate the service
#[instrument(skip_all, fields(project = %args.project))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (project_name, project_dir) = resolve_project_path(&args.project, &config.defaults.output_dir)?;
    validate_project_name(&project_name)?;

    let force = args.force || config.defaults.force;
    if project_file::locate(&project_dir).is_some() && !force {
        return Err(CliError::ProjectExists { path: project_dir });
    }

    let service = if args.no_service {
        None
    } else {
        service::resolve(&args.service, WhenUnselected::PromptOrSkip)?
    };

    let opts = base_options(args.go_version.as_deref(), &config)
        .with_overwrite(force)
        .with_project_name(&project_name);
    let generator = generation_service();

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create project '{}' at {}",
            project_name,
            project_dir.display(),
        ))?;
        if let Some(service) = service {
            let plan = generator.plan(vec![service], &project_dir, &opts)?;
            print_plan(&plan, &project_dir, &output)?;
        }
        return Ok(());
    }

    if !global.quiet && !output.is_json() {
        show_configuration(&project_name, &project_dir, service.as_ref(), &output)?;
        if !confirm(args.yes)? {
            return Err(CliError::Cancelled);
        }
    }

    let mut project = LayerProject::new(&project_name);
    project_file::save(&project_dir, &project).with_cli_context(|| "writing layer.json")?;
    info!(project = %project_name, path = %project_dir.display(), "Project created");

    if let Some(service) = service {
        output.header(&format!("Generating '{}'...", service.name))?;
        let report =
            generate_with_progress(&generator, vec![service.clone()], &project_dir, &opts, &output)?;

        project.add_service(service).map_err(LayerError::from)?;
        project.touch();
        project_file::save(&project_dir, &project)?;
        print_report(&report, &output)?;
    }

    output.success(&format!("Project '{project_name}' created!"))?;
    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_dir.display()))?;
        if project.services.is_empty() {
            output.print("  layer add --template auth")?;
        } else {
            output.print("  docker compose up --build")?;
        }
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Splits `name` into the project name and its directory.
///
/// A bare name lands under `base`; anything with a directory part is used
/// as given.
pub fn resolve_project_path(name: &str, base: &Path) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    let bare = path.parent().is_none_or(|p| p.as_os_str().is_empty());
    let project_dir = if bare && path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    };

    Ok((project_name, project_dir))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    let invalid = |reason: &str| CliError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("only letters, digits, '-' and '_' are allowed"));
    }
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    name: &str,
    project_dir: &Path,
    service: Option<&Service>,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:  {name}"))?;
    out.print(&format!("  Location: {}", project_dir.display()))?;
    match service {
        Some(service) => {
            out.print(&format!("  Service:  {} ({})", service.name, service.variant))?;
            if service.variant.serves_http() {
                out.print(&format!("  Port:     {}", service.port))?;
                out.print(&format!("  Handlers: {}", service.handler_names().len()))?;
            }
            if service.uses_database() {
                out.print("  Database: postgres")?;
            }
        }
        None => out.print("  Service:  none")?,
    }
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_resolves_under_base() {
        let (name, dir) = resolve_project_path("shop", Path::new(".")).unwrap();
        assert_eq!(name, "shop");
        assert_eq!(dir, PathBuf::from("./shop"));

        let (_, dir) = resolve_project_path("shop", Path::new("services")).unwrap();
        assert_eq!(dir, PathBuf::from("services/shop"));
    }

    #[test]
    fn relative_path_is_kept() {
        let (name, dir) = resolve_project_path("../shop", Path::new("services")).unwrap();
        assert_eq!(name, "shop");
        assert_eq!(dir, PathBuf::from("../shop"));
    }

    #[test]
    fn nested_path_works_on_all_platforms() {
        let sep = std::path::MAIN_SEPARATOR;
        let path = format!("foo{sep}bar{sep}shop");

        let (name, dir) = resolve_project_path(&path, Path::new(".")).unwrap();
        assert_eq!(name, "shop");
        assert_eq!(dir, PathBuf::from("foo").join("bar").join("shop"));
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(matches!(
            validate_project_name(""),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn dotfile_name_is_invalid() {
        assert!(matches!(
            validate_project_name(".hidden"),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn separators_and_spaces_are_invalid() {
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("a\\b").is_err());
        assert!(validate_project_name("my shop").is_err());
    }

    #[test]
    fn valid_names_pass() {
        for name in &["shop", "billing_platform", "infra2", "Shop-API"] {
            assert!(validate_project_name(name).is_ok(), "failed for: {name}");
        }
    }
}
