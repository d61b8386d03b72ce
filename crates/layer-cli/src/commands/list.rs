//! Implementation of the `layer list` command.

use layer_core::{
    application::{TemplateInfo, TemplateService},
    domain::Variant,
};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let templates = filter(TemplateService::new().list(), args.variant.map(Variant::from));

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for line in table(&templates) {
                output.print(&line)?;
            }
        }
        // JSON bypasses quiet mode so it stays parseable in pipes.
        ListFormat::Json => {
            let rows: Vec<_> = templates
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "variant": t.variant,
                        "defaultName": t.default_name,
                        "defaultPort": t.default_port,
                        "routes": t.route_count,
                        "description": t.description,
                    })
                })
                .collect();
            output.json(&rows)?;
        }
        ListFormat::List => {
            for t in &templates {
                output.print(&t.id)?;
            }
        }
    }

    Ok(())
}

fn filter(templates: Vec<TemplateInfo>, variant: Option<Variant>) -> Vec<TemplateInfo> {
    match variant {
        Some(v) => templates
            .into_iter()
            .filter(|t| t.variant == v.as_str())
            .collect(),
        None => templates,
    }
}

fn table(templates: &[TemplateInfo]) -> Vec<String> {
    let mut lines = vec![format!(
        "  {:<10} {:<9} {:<20} {:>5} {:>6}  {}",
        "ID", "VARIANT", "DEFAULT NAME", "PORT", "ROUTES", "DESCRIPTION"
    )];
    for t in templates {
        let port = t.default_port.map_or_else(|| "-".to_string(), |p| p.to_string());
        lines.push(format!(
            "  {:<10} {:<9} {:<20} {:>5} {:>6}  {}",
            t.id, t.variant, t.default_name, port, t.route_count, t.description
        ));
    }
    lines
}
