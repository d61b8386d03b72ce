//! `layer add`: generate one more service inside an existing project.

use std::path::PathBuf;

use tracing::{info, instrument};

use layer_adapters::project_file;
use layer_core::{
    domain::{DomainError, DomainValidator},
    error::LayerError,
};

use crate::{
    cli::{AddArgs, global::GlobalArgs},
    commands::{
        base_options, confirm, generate_with_progress, generation_service, print_plan,
        print_report,
        service::{self, WhenUnselected},
    },
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Adds the selected service to the nearest project.
///
/// The new service is written first; `layer.json` and the compose file are
/// only updated once it succeeded.
#[instrument(skip_all)]
pub fn execute(
    args: AddArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let start = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().with_cli_context(|| "reading the current directory")?,
    };
    let root = project_file::find_root(&start)?;
    let mut project = project_file::load(&root)?;

    let service = service::resolve(&args.service, WhenUnselected::PromptOrFail)?
        .ok_or_else(|| CliError::InvalidInput {
            message: "no service selected".into(),
            source: None,
        })?;

    let force = args.force || config.defaults.force;
    if project.service(&service.name).is_some() && !force {
        return Err(LayerError::from(DomainError::DuplicateService {
            name: service.name.clone(),
        })
        .into());
    }

    // The compose file lists every service, so ports must stay unique.
    let mut combined: Vec<_> = project
        .services
        .iter()
        .filter(|s| s.name != service.name)
        .cloned()
        .collect();
    combined.push(service.clone());
    DomainValidator::validate_services(&combined).map_err(LayerError::from)?;

    let opts = base_options(args.go_version.as_deref(), &config)
        .with_overwrite(force)
        .with_project_name(&project.name)
        .with_deployment(false);
    let generator = generation_service();

    if args.dry_run {
        output.info(&format!(
            "Dry run: would add '{}' to {}",
            service.name,
            root.display()
        ))?;
        let plan = generator.plan(vec![service], &root, &opts)?;
        print_plan(&plan, &root, &output)?;
        return Ok(());
    }

    if !global.quiet && !output.is_json() {
        output.header(&format!(
            "Adding {} service '{}' to '{}'",
            service.variant, service.name, project.name
        ))?;
        if !confirm(args.yes)? {
            return Err(CliError::Cancelled);
        }
    }

    let mut report =
        generate_with_progress(&generator, vec![service.clone()], &root, &opts, &output)?;

    if project.service(&service.name).is_some() {
        project.remove_service(&service.name).map_err(LayerError::from)?;
    }
    project.add_service(service).map_err(LayerError::from)?;
    project.touch();
    project_file::save(&root, &project)?;

    let compose: PathBuf = generator.write_deployment(&project.services, &root, &project.name)?;
    report.deployment = Some(compose);
    info!(project = %project.name, services = project.services.len(), "Service added");

    print_report(&report, &output)?;
    output.success(&format!(
        "Project '{}' now has {} service(s)",
        project.name,
        project.services.len()
    ))?;
    Ok(())
}
