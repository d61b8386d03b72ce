//! Turning `ServiceArgs` into a generated `Service`.

use std::io::IsTerminal as _;

use tracing::debug;

use layer_core::{
    application::TemplateService,
    domain::{Service, ServiceOption, Variant, options, template},
    error::LayerError,
};

use crate::{
    cli::ServiceArgs,
    error::{CliError, CliResult},
};

/// What to do when no flag selects a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WhenUnselected {
    /// Prompt when possible, otherwise create nothing.
    PromptOrSkip,
    /// Prompt when possible, otherwise fail.
    PromptOrFail,
}

/// The service selected by `args`, prompting for the rest at a terminal.
pub(crate) fn resolve(args: &ServiceArgs, when: WhenUnselected) -> CliResult<Option<Service>> {
    let templates = TemplateService::new();

    if let Some(id) = &args.template {
        debug!(template = %id, "Instantiating template");
        return Ok(Some(templates.instantiate(id, overrides(args))?));
    }

    if let Some(variant) = args.variant {
        let variant = Variant::from(variant);
        let name = args
            .name
            .clone()
            .unwrap_or_else(|| format!("{variant}-service"));
        let opts = std::iter::once(options::with_name(name)).chain(overrides(args));
        return Ok(Some(template(variant, opts).map_err(LayerError::from)?));
    }

    if !std::io::stdin().is_terminal() {
        return match when {
            WhenUnselected::PromptOrSkip => Ok(None),
            WhenUnselected::PromptOrFail => Err(CliError::InvalidInput {
                message: "no service selected; pass --template or --variant".into(),
                source: None,
            }),
        };
    }

    prompt_for(args, &templates).map(Some)
}

/// Flag values layered over a template's presets.
fn overrides(args: &ServiceArgs) -> Vec<ServiceOption> {
    let mut opts = Vec::new();
    if let Some(name) = &args.name {
        opts.push(options::with_name(name));
    }
    if let Some(port) = args.port {
        opts.push(options::with_port(port));
    }
    if args.postgres {
        opts.push(options::with_postgres());
    }
    opts.extend(
        args.routes
            .iter()
            .map(|r| options::with_route(&r.method, &r.path, &r.handler)),
    );
    opts
}

#[cfg(feature = "interactive")]
fn prompt_for(args: &ServiceArgs, templates: &TemplateService) -> CliResult<Service> {
    use dialoguer::{FuzzySelect, Input, theme::ColorfulTheme};

    let prompt_failed = |e: dialoguer::Error| CliError::IoError {
        message: "interactive prompt failed".into(),
        source: std::io::Error::other(e),
    };

    let theme = ColorfulTheme::default();
    let catalog = templates.list();
    let items: Vec<String> = catalog
        .iter()
        .map(|t| format!("{:<10} {}", t.id, t.description))
        .collect();

    let index = FuzzySelect::with_theme(&theme)
        .with_prompt("Service template")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(prompt_failed)?
        .ok_or(CliError::Cancelled)?;
    let chosen = &catalog[index];

    let mut answers = args.clone();
    answers.template = Some(chosen.id.clone());

    if answers.name.is_none() {
        let name: String = Input::with_theme(&theme)
            .with_prompt("Service name")
            .default(chosen.default_name.clone())
            .interact_text()
            .map_err(prompt_failed)?;
        answers.name = Some(name);
    }

    if let (None, Some(default_port)) = (answers.port, chosen.default_port) {
        let port: u16 = Input::with_theme(&theme)
            .with_prompt("Port")
            .default(default_port)
            .interact_text()
            .map_err(prompt_failed)?;
        answers.port = Some(port);
    }

    Ok(templates.instantiate(&chosen.id, overrides(&answers))?)
}

#[cfg(not(feature = "interactive"))]
fn prompt_for(_args: &ServiceArgs, _templates: &TemplateService) -> CliResult<Service> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{RouteArg, VariantArg};

    #[test]
    fn template_presets_yield_to_flags() {
        let args = ServiceArgs {
            template: Some("auth".into()),
            name: Some("identity".into()),
            port: Some(9100),
            ..Default::default()
        };
        let service = resolve(&args, WhenUnselected::PromptOrFail).unwrap().unwrap();
        assert_eq!(service.name, "identity");
        assert_eq!(service.port, 9100);
        assert!(service.uses_database());
    }

    #[test]
    fn bare_variant_gets_a_default_name() {
        let args = ServiceArgs {
            variant: Some(VariantArg::Listener),
            ..Default::default()
        };
        let service = resolve(&args, WhenUnselected::PromptOrFail).unwrap().unwrap();
        assert_eq!(service.name, "listener-service");
        assert_eq!(service.variant, Variant::Listener);
    }

    #[test]
    fn routes_become_handlers() {
        let args = ServiceArgs {
            variant: Some(VariantArg::Api),
            name: Some("orders".into()),
            routes: vec![RouteArg {
                method: "GET".into(),
                path: "/orders".into(),
                handler: "ListOrders".into(),
            }],
            ..Default::default()
        };
        let service = resolve(&args, WhenUnselected::PromptOrFail).unwrap().unwrap();
        assert_eq!(service.handler_names(), vec!["ListOrders"]);
    }

    #[test]
    fn unknown_template_is_a_core_error() {
        let args = ServiceArgs {
            template: Some("payments".into()),
            ..Default::default()
        };
        let err = resolve(&args, WhenUnselected::PromptOrFail).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
