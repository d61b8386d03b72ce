//! Service options and the template factory.
//!
//! Configuration happens in two phases. Options are first folded, in the
//! order given, into a plain [`ServiceSpec`]. Only once every option has been
//! applied is the `ServiceSpec` settled into a [`Service`] and handed to the variant's
//! generator bundle. No generator ever observes a half-configured service, so
//! the relative order of identity options (name, port) and feature options
//! has no effect on the generated files.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    entities::service::{CorsOptions, Database, Route, RouteGroup, RoutesConfig, Service},
    error::DomainError,
    registry::GenerationConfig,
    validation::DomainValidator,
    value_objects::Variant,
};

/// One configuration step. Later options override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "option", content = "value", rename_all = "camelCase")]
pub enum ServiceOption {
    Name(String),
    Port(u16),
    /// PostgreSQL through pgx with default settings.
    Postgres,
    Database(Database),
    NoDatabase,
    /// Replaces the whole routing configuration.
    Routes(RoutesConfig),
    Cors(CorsOptions),
    RouteGroup(RouteGroup),
    /// Appends a route to the unprefixed group.
    Route(Route),
}

impl ServiceOption {
    pub fn apply(&self, spec: &mut ServiceSpec) {
        match self {
            Self::Name(name) => spec.name = name.clone(),
            Self::Port(port) => spec.port = Some(*port),
            Self::Postgres => spec.database = Some(Database::postgres()),
            Self::Database(db) => spec.database = Some(db.clone()),
            Self::NoDatabase => spec.database = None,
            Self::Routes(routes) => spec.routes = Some(routes.clone()),
            Self::Cors(cors) => spec.routes_mut().cors = Some(cors.clone()),
            Self::RouteGroup(group) => spec.routes_mut().groups.push(group.clone()),
            Self::Route(route) => spec.routes_mut().add_route(route.clone()),
        }
    }
}

pub fn with_name(name: impl Into<String>) -> ServiceOption {
    ServiceOption::Name(name.into())
}

pub fn with_port(port: u16) -> ServiceOption {
    ServiceOption::Port(port)
}

pub fn with_postgres() -> ServiceOption {
    ServiceOption::Postgres
}

/// Drops the database the API base bundle starts with.
pub fn without_database() -> ServiceOption {
    ServiceOption::NoDatabase
}

pub fn with_cors(cors: CorsOptions) -> ServiceOption {
    ServiceOption::Cors(cors)
}

pub fn with_route(
    method: impl Into<String>,
    path: impl Into<String>,
    handler: impl Into<String>,
) -> ServiceOption {
    ServiceOption::Route(Route::new(method, path, handler))
}

/// Identity and configuration of a service before any code is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    pub port: Option<u16>,
    pub database: Option<Database>,
    pub routes: Option<RoutesConfig>,
}

impl ServiceSpec {
    /// Folds `options` in order.
    pub fn from_options(options: impl IntoIterator<Item = ServiceOption>) -> Self {
        let mut spec = Self::default();
        for option in options {
            option.apply(&mut spec);
        }
        spec
    }

    fn routes_mut(&mut self) -> &mut RoutesConfig {
        self.routes.get_or_insert_with(RoutesConfig::default)
    }

    /// Freezes the options into a service of `variant`, without packages.
    pub fn settle(self, variant: Variant) -> Result<Service, DomainError> {
        DomainValidator::validate_service_name(&self.name)?;

        Ok(Service {
            name: self.name,
            port: self.port.unwrap_or_else(|| variant.default_port()),
            database: self.database,
            routes: self.routes,
            variant,
            packages: Vec::new(),
        })
    }
}

/// Options every service of `variant` starts from.
pub fn base_options(variant: Variant) -> Vec<ServiceOption> {
    match variant {
        Variant::Api => vec![ServiceOption::Postgres],
        Variant::Broker | Variant::Listener => Vec::new(),
    }
}

/// Template factory: builds and generates a service of `variant`.
///
/// The variant's base options come first, then the caller's options in
/// order. The `ServiceSpec` is settled before the generator bundle runs once.
#[instrument(skip_all, fields(variant = %variant))]
pub fn template(
    variant: Variant,
    options: impl IntoIterator<Item = ServiceOption>,
) -> Result<Service, DomainError> {
    let spec = ServiceSpec::from_options(base_options(variant).into_iter().chain(options));
    let service = spec.settle(variant)?;
    debug!(service = %service.name, port = service.port, "Service settled");

    Ok(GenerationConfig::default().generate_service(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_options_override_earlier_ones() {
        let spec = ServiceSpec::from_options([with_name("a"), with_port(1), with_name("b")]);
        assert_eq!(spec.name, "b");
        assert_eq!(spec.port, Some(1));
    }

    #[test]
    fn route_options_accumulate() {
        let spec = ServiceSpec::from_options([
            with_route("POST", "/login", "Login"),
            ServiceOption::RouteGroup(
                RouteGroup::new("/v1").with_route(Route::new("GET", "/users", "GetUsers")),
            ),
            with_route("POST", "/logout", "Logout"),
        ]);
        let routes = spec.routes.unwrap();
        assert_eq!(routes.groups.len(), 2);
        assert_eq!(routes.groups[0].routes.len(), 2);
        assert_eq!(routes.groups[1].prefix, "/v1");
    }

    #[test]
    fn api_base_bundle_brings_postgres() {
        let service = template(Variant::Api, [with_name("auth-service")]).unwrap();
        assert!(service.database.as_ref().is_some_and(Database::is_pgx));

        let bare = template(
            Variant::Api,
            [with_name("auth-service"), ServiceOption::NoDatabase],
        )
        .unwrap();
        assert!(bare.database.is_none());
    }

    #[test]
    fn settle_rejects_empty_name() {
        assert_eq!(
            ServiceSpec::default().settle(Variant::Api),
            Err(DomainError::EmptyServiceName)
        );
    }

    #[test]
    fn default_port_comes_from_variant() {
        let service = template(Variant::Listener, [with_name("listener-service")]).unwrap();
        assert_eq!(service.port, 0);
        let service = template(Variant::Broker, [with_name("broker-service")]).unwrap();
        assert_eq!(service.port, 8082);
    }

    #[test]
    fn options_are_serializable_data() {
        let json = serde_json::to_string(&with_port(9000)).unwrap();
        assert_eq!(json, r#"{"option":"port","value":9000}"#);
        let back: ServiceOption = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ServiceOption::Port(9000));
    }
}
