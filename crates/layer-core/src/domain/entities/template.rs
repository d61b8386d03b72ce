//! Built-in service templates.
//!
//! A template is a named preset over a variant: a default name, port and,
//! for some, a starter set of routes. Instantiating one runs the variant's
//! template factory with the preset options followed by the caller's.

use crate::domain::{
    entities::service::{Route, RouteGroup, RoutesConfig, Service},
    error::DomainError,
    options::{self, ServiceOption},
    value_objects::Variant,
};

#[derive(Debug, Clone, Copy)]
pub struct ServiceTemplate {
    pub id: &'static str,
    pub description: &'static str,
    pub variant: Variant,
    pub default_name: &'static str,
    pub default_port: u16,
    routes: fn() -> Option<RoutesConfig>,
}

const CATALOG: &[ServiceTemplate] = &[
    ServiceTemplate {
        id: "auth",
        description: "Authentication API with PostgreSQL and register/login/logout routes",
        variant: Variant::Api,
        default_name: "auth-service",
        default_port: 8080,
        routes: auth_routes,
    },
    ServiceTemplate {
        id: "custom",
        description: "Empty HTTP API with PostgreSQL",
        variant: Variant::Api,
        default_name: "custom-api-service",
        default_port: 8081,
        routes: no_routes,
    },
    ServiceTemplate {
        id: "broker",
        description: "HTTP ingress publishing events to RabbitMQ",
        variant: Variant::Broker,
        default_name: "broker-service",
        default_port: 8082,
        routes: no_routes,
    },
    ServiceTemplate {
        id: "listener",
        description: "RabbitMQ consumer replying to broker events",
        variant: Variant::Listener,
        default_name: "listener-service",
        default_port: 0,
        routes: no_routes,
    },
];

fn auth_routes() -> Option<RoutesConfig> {
    Some(
        RoutesConfig::default().with_group(
            RouteGroup::new("")
                .with_route(Route::new("POST", "/register", "Register"))
                .with_route(Route::new("POST", "/login", "Login"))
                .with_route(Route::new("POST", "/logout", "Logout")),
        ),
    )
}

fn no_routes() -> Option<RoutesConfig> {
    None
}

impl ServiceTemplate {
    pub fn catalog() -> &'static [ServiceTemplate] {
        CATALOG
    }

    pub fn find(id: &str) -> Result<&'static ServiceTemplate, DomainError> {
        CATALOG
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| DomainError::UnknownTemplate(id.to_string()))
    }

    /// Preset options, applied before any caller options.
    pub fn defaults(&self) -> Vec<ServiceOption> {
        let mut defaults = vec![
            options::with_name(self.default_name),
            options::with_port(self.default_port),
        ];
        if let Some(routes) = (self.routes)() {
            defaults.push(ServiceOption::Routes(routes));
        }
        defaults
    }

    /// Builds and generates a service from this template.
    pub fn instantiate(
        &self,
        overrides: impl IntoIterator<Item = ServiceOption>,
    ) -> Result<Service, DomainError> {
        options::template(self.variant, self.defaults().into_iter().chain(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Bucket;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = ServiceTemplate::catalog().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ServiceTemplate::catalog().len());
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(ServiceTemplate::find("AUTH").unwrap().default_name, "auth-service");
        assert!(matches!(
            ServiceTemplate::find("payments"),
            Err(DomainError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn auth_template_generates_three_handlers() {
        let service = ServiceTemplate::find("auth").unwrap().instantiate([]).unwrap();
        assert_eq!(service.name, "auth-service");
        assert_eq!(service.port, 8080);

        let handlers: Vec<_> = service
            .files(Bucket::Handlers)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(handlers, vec!["Register.go", "Login.go", "Logout.go"]);
    }

    #[test]
    fn overrides_win_over_presets() {
        let service = ServiceTemplate::find("broker")
            .unwrap()
            .instantiate([options::with_name("gateway"), options::with_port(9000)])
            .unwrap();
        assert_eq!(service.name, "gateway");
        assert_eq!(service.port, 9000);
        assert_eq!(service.variant, Variant::Broker);
    }
}
