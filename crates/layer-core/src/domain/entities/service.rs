//! The service model: one deployable Go program and its configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::generated::{GeneratedFile, Package},
    value_objects::{Bucket, HttpMethod, Variant},
};

/// A service to generate.
///
/// `packages` is derived content: it is recomputed by every generation pass
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub port: u16,
    #[serde(rename = "db", default, skip_serializing_if = "Option::is_none")]
    pub database: Option<Database>,
    #[serde(rename = "routesConfig", default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<RoutesConfig>,
    pub variant: Variant,
    #[serde(skip)]
    pub packages: Vec<Package>,
}

impl Service {
    pub fn new(name: impl Into<String>, variant: Variant) -> Self {
        Self {
            name: name.into(),
            port: variant.default_port(),
            database: None,
            routes: None,
            variant,
            packages: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_routes(mut self, routes: RoutesConfig) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Generated package for `bucket`, if the last pass produced one.
    pub fn package(&self, bucket: Bucket) -> Option<&Package> {
        self.packages.iter().find(|p| p.bucket == bucket)
    }

    /// Generated files of `bucket`; empty when the bucket was omitted.
    pub fn files(&self, bucket: Bucket) -> &[GeneratedFile] {
        self.package(bucket).map_or(&[], |p| p.files.as_slice())
    }

    pub fn file_count(&self) -> usize {
        self.packages.iter().map(|p| p.files.len()).sum()
    }

    /// Whether the generated program opens a `database/sql` pool.
    pub fn uses_database(&self) -> bool {
        self.variant == Variant::Api && self.database.is_some()
    }

    /// CORS policy baked into the router: the configured one or the defaults.
    pub fn cors(&self) -> CorsOptions {
        self.routes
            .as_ref()
            .and_then(|r| r.cors.clone())
            .unwrap_or_default()
    }

    pub fn route_groups(&self) -> &[RouteGroup] {
        self.routes.as_ref().map_or(&[], |r| r.groups.as_slice())
    }

    /// Distinct non-empty handler names in first-seen order.
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for route in self.route_groups().iter().flat_map(|g| &g.routes) {
            let name = route.handler.as_str();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Database wiring for API services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub driver: String,
    #[serde(rename = "timeoutConn", default)]
    pub connection_timeout: u32,
    /// Connection string, written to the service's `.env` as `DATABASE_URL`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default)]
    pub port: u16,
}

impl Database {
    pub const PGX_DRIVER: &'static str = "pgx";

    /// PostgreSQL through the pgx `database/sql` driver.
    pub fn postgres() -> Self {
        Self {
            driver: Self::PGX_DRIVER.into(),
            connection_timeout: 10,
            url: String::new(),
            port: 5432,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_pgx(&self) -> bool {
        self.driver == Self::PGX_DRIVER
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsOptions>,
    #[serde(rename = "routesGroup", default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<RouteGroup>,
}

impl RoutesConfig {
    pub fn with_cors(mut self, cors: CorsOptions) -> Self {
        self.cors = Some(cors);
        self
    }

    pub fn with_group(mut self, group: RouteGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Appends `route` to the unprefixed group, creating it when missing.
    pub fn add_route(&mut self, route: Route) {
        match self.groups.iter_mut().find(|g| g.prefix.is_empty()) {
            Some(group) => group.routes.push(route),
            None => self.groups.push(RouteGroup::new("").with_route(route)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroup {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }
}

/// One route registration.
///
/// The method stays textual so unknown verbs survive loading; the router
/// generator drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub method: String,
    pub handler: String,
}

impl Route {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            handler: handler.into(),
        }
    }

    /// Parsed method, `None` when it is not a routable verb.
    pub fn http_method(&self) -> Option<HttpMethod> {
        self.method.parse().ok()
    }
}

/// CORS policy of the generated router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsOptions {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default)]
    pub max_age: u32,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["https://*".into(), "http://*".into()],
            allowed_methods: ["POST", "GET", "DELETE", "PUT", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: ["Accept", "Content-Type", "Authorization"]
                .map(String::from)
                .to_vec(),
            allow_credentials: false,
            max_age: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes(entries: &[(&str, &str, &str)]) -> RoutesConfig {
        let mut config = RoutesConfig::default();
        for (method, path, handler) in entries {
            config.add_route(Route::new(*method, *path, *handler));
        }
        config
    }

    #[test]
    fn handler_names_are_distinct_in_first_seen_order() {
        let service = Service::new("auth-service", Variant::Api).with_routes(routes(&[
            ("POST", "/login", "Auth"),
            ("GET", "/users", "GetUsers"),
            ("POST", "/refresh", "Auth"),
            ("GET", "/health", ""),
        ]));

        assert_eq!(service.handler_names(), vec!["Auth", "GetUsers"]);
    }

    #[test]
    fn cors_falls_back_to_defaults() {
        let service = Service::new("svc", Variant::Broker);
        let cors = service.cors();
        assert_eq!(cors.allowed_origins, vec!["https://*", "http://*"]);
        assert_eq!(cors.max_age, 300);
        assert!(!cors.allow_credentials);
    }

    #[test]
    fn add_route_reuses_unprefixed_group() {
        let config = routes(&[("GET", "/a", "A"), ("GET", "/b", "B")]);
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].routes.len(), 2);
    }

    #[test]
    fn unknown_method_has_no_http_method() {
        assert_eq!(Route::new("TRACE", "/x", "X").http_method(), None);
        assert_eq!(Route::new("get", "/x", "X").http_method(), None);
        assert_eq!(
            Route::new("GET", "/x", "X").http_method(),
            Some(HttpMethod::Get)
        );
    }

    #[test]
    fn service_json_uses_wire_names() {
        let service = Service::new("auth-service", Variant::Api)
            .with_database(Database::postgres())
            .with_routes(routes(&[("POST", "/login", "Login")]));

        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["db"]["driver"], "pgx");
        assert_eq!(json["db"]["timeoutConn"], 10);
        assert_eq!(json["routesConfig"]["routesGroup"][0]["routes"][0]["handler"], "Login");
        assert_eq!(json["variant"], "api");
        assert!(json.get("packages").is_none());
    }
}
