//! `layer generate`: re-run generation for the services in `layer.json`.

use std::path::PathBuf;

use tracing::{debug, instrument};

use layer_adapters::project_file;
use layer_core::{
    application::DriftReport,
    domain::{DomainError, Service},
    error::LayerError,
};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    commands::{base_options, generate_with_progress, generation_service, print_plan, print_report},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
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

    let services = select(&project.services, &args.only)?;
    if services.is_empty() {
        output.warning("layer.json lists no services; nothing to generate")?;
        return Ok(());
    }
    debug!(services = services.len(), root = %root.display(), "Generating from project file");

    let opts = base_options(args.go_version.as_deref(), &config)
        .with_overwrite(args.force || config.defaults.force)
        .with_project_name(&project.name);
    let generator = generation_service();

    if args.check {
        let drift = generator.check(services, &root, &opts)?;
        print_drift(&drift, global.verbose > 0, &output)?;
        return if drift.is_clean() {
            Ok(())
        } else {
            Err(CliError::DriftDetected {
                count: drift.added.len() + drift.changed.len() + drift.stale.len(),
            })
        };
    }

    if args.dry_run {
        let plan = generator.plan(services, &root, &opts)?;
        print_plan(&plan, &root, &output)?;
        return Ok(());
    }

    output.header(&format!(
        "Generating {} service(s) for '{}'...",
        services.len(),
        project.name
    ))?;

    // Only the selected services are written; compose always lists them all.
    let subset = !args.only.is_empty();
    let mut report = generate_with_progress(
        &generator,
        services,
        &root,
        &opts.with_deployment(!subset),
        &output,
    )?;
    if subset {
        report.deployment =
            Some(generator.write_deployment(&project.services, &root, &project.name)?);
    }

    project.touch();
    project_file::save(&root, &project)?;
    print_report(&report, &output)?;
    Ok(())
}

/// Services named in `only`, or all of them.
fn select(services: &[Service], only: &[String]) -> CliResult<Vec<Service>> {
    if only.is_empty() {
        return Ok(services.to_vec());
    }
    only.iter()
        .map(|name| {
            services
                .iter()
                .find(|s| &s.name == name)
                .cloned()
                .ok_or_else(|| CliError::from(LayerError::from(DomainError::ServiceNotFound(name.clone()))))
        })
        .collect()
}

fn print_drift(drift: &DriftReport, verbose: bool, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(&serde_json::json!({
            "clean": drift.is_clean(),
            "added": drift.added,
            "changed": drift.changed,
            "unchanged": drift.unchanged,
            "stale": drift.stale,
        }))?;
        return Ok(());
    }

    let list = |label: &str, paths: &[PathBuf]| -> CliResult<()> {
        for path in paths {
            output.print(&format!("  {label:<9} {}", path.display()))?;
        }
        Ok(())
    };

    list("added", &drift.added)?;
    list("changed", &drift.changed)?;
    list("stale", &drift.stale)?;
    if verbose {
        list("unchanged", &drift.unchanged)?;
    }

    if drift.is_clean() {
        output.success(&format!(
            "Up to date ({} files checked)",
            drift.unchanged.len()
        ))?;
    } else {
        output.warning(&format!(
            "{} added, {} changed, {} stale",
            drift.added.len(),
            drift.changed.len(),
            drift.stale.len()
        ))?;
    }
    Ok(())
}
