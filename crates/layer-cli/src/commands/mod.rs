//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and print the results. The
//! helpers below are shared by the commands that generate code.

pub mod add;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
mod service;

use std::io::{self, IsTerminal as _, Write as _};
use std::path::Path;

use layer_adapters::{GoRenderer, LocalFilesystem, TextManifestRenderer};
use layer_core::{
    application::{GenerateOptions, GenerationReport, GenerationService},
    domain::{ProjectStructure, Service},
    error::LayerResult,
};

use crate::{
    error::{CliError, CliResult},
    output::OutputManager,
};

/// The production wiring: Go printer, text manifests, local disk.
pub(crate) fn generation_service() -> GenerationService {
    GenerationService::new(
        Box::new(GoRenderer::new()),
        Box::new(TextManifestRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}

/// Generates `services` under `root` with one progress tick per service.
pub(crate) fn generate_with_progress(
    generator: &GenerationService,
    services: Vec<Service>,
    root: &Path,
    opts: &GenerateOptions,
    output: &OutputManager,
) -> LayerResult<GenerationReport> {
    let bar = output.progress(services.len());

    let result = generator.generate_project_with(services, root, opts, |name, outcome| {
        match outcome {
            Ok(report) => bar.set_message(format!("{name} ({} files)", report.files)),
            Err(failure) => bar.println(format!("\u{2717} {failure}")),
        }
        bar.inc(1);
    });

    bar.finish_and_clear();
    result
}

/// Prints the planned files of a dry run, relative to `root`.
pub(crate) fn print_plan(
    structures: &[ProjectStructure],
    root: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        let plan: Vec<_> = structures
            .iter()
            .map(|s| {
                serde_json::json!({
                    "root": s.root.strip_prefix(root).unwrap_or(&s.root),
                    "files": s.files().map(|f| &f.path).collect::<Vec<_>>(),
                })
            })
            .collect();
        output.json(&plan)?;
        return Ok(());
    }

    for structure in structures {
        let dir = structure.root.strip_prefix(root).unwrap_or(&structure.root);
        output.header(&format!("{}/", dir.display()))?;
        for file in structure.files() {
            output.print(&format!("  {} ({} bytes)", file.path.display(), file.size()))?;
        }
    }
    Ok(())
}

/// Prints what a generation run wrote.
pub(crate) fn print_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        let services: Vec<_> = report
            .services
            .iter()
            .map(|s| serde_json::json!({ "name": s.name, "dir": s.dir, "files": s.files }))
            .collect();
        output.json(&serde_json::json!({
            "outputDir": report.output_dir,
            "services": services,
            "deployment": report.deployment,
            "files": report.file_count(),
        }))?;
        return Ok(());
    }

    for service in &report.services {
        output.success(&format!(
            "{} \u{2192} {} ({} files)",
            service.name,
            service.dir.display(),
            service.files
        ))?;
    }
    if let Some(compose) = &report.deployment {
        output.success(&format!("Deployment manifest \u{2192} {}", compose.display()))?;
    }
    Ok(())
}

/// Asks `Continue? [Y/n]` when a human is at the terminal.
///
/// Non-interactive stdin counts as consent; scripts pass `--yes` anyway.
pub(crate) fn confirm(skip: bool) -> CliResult<bool> {
    if skip || !io::stdin().is_terminal() {
        return Ok(true);
    }

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

/// `--go-version`, else the configured default.
pub(crate) fn base_options(go_version: Option<&str>, config: &crate::config::AppConfig) -> GenerateOptions {
    GenerateOptions::default()
        .with_go_version(go_version.unwrap_or(&config.defaults.go_version))
}
