//! Template Service - catalog queries and instantiation.
//!
//! Separated from GenerationService: templates only produce `Service`
//! values, they never touch ports.

use tracing::{debug, instrument};

use crate::{
    domain::{Service, ServiceOption, ServiceTemplate},
    error::LayerResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: String,
    pub description: String,
    pub variant: String,
    pub default_name: String,
    /// `None` for services without an HTTP server.
    pub default_port: Option<u16>,
    pub route_count: usize,
}

impl From<&ServiceTemplate> for TemplateInfo {
    fn from(t: &ServiceTemplate) -> Self {
        let route_count = t
            .defaults()
            .iter()
            .map(|o| match o {
                ServiceOption::Routes(r) => r.groups.iter().map(|g| g.routes.len()).sum(),
                _ => 0,
            })
            .sum();

        Self {
            id: t.id.to_string(),
            description: t.description.to_string(),
            variant: t.variant.to_string(),
            default_name: t.default_name.to_string(),
            default_port: (t.variant.serves_http() && t.default_port != 0).then_some(t.default_port),
            route_count,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateService;

impl TemplateService {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> Vec<TemplateInfo> {
        ServiceTemplate::catalog().iter().map(TemplateInfo::from).collect()
    }

    pub fn get(&self, id: &str) -> LayerResult<TemplateInfo> {
        Ok(ServiceTemplate::find(id)?.into())
    }

    /// Builds a service from template `id`; `overrides` win over presets.
    #[instrument(skip(self, overrides))]
    pub fn instantiate(
        &self,
        id: &str,
        overrides: impl IntoIterator<Item = ServiceOption>,
    ) -> LayerResult<Service> {
        let service = ServiceTemplate::find(id)?.instantiate(overrides)?;
        debug!(service = %service.name, files = service.file_count(), "Template instantiated");
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options;
    use crate::error::LayerError;

    #[test]
    fn lists_the_whole_catalog() {
        let infos = TemplateService::new().list();
        let ids: Vec<_> = infos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["auth", "custom", "broker", "listener"]);

        let auth = &infos[0];
        assert_eq!(auth.route_count, 3);
        assert_eq!(auth.default_port, Some(8080));
        assert_eq!(infos[3].default_port, None);
    }

    #[test]
    fn overrides_replace_presets() {
        let service = TemplateService::new()
            .instantiate("custom", [options::with_name("billing"), options::with_port(9000)])
            .unwrap();
        assert_eq!(service.name, "billing");
        assert_eq!(service.port, 9000);
    }

    #[test]
    fn unknown_template_is_not_found() {
        let err = TemplateService::new().get("payments").unwrap_err();
        assert!(matches!(err, LayerError::Domain(_)));
        assert_eq!(err.category(), crate::error::ErrorCategory::NotFound);
    }
}
