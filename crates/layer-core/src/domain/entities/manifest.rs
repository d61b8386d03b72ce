//! Manifest data derived from the service model.
//!
//! These are plain values; turning them into `go.mod`, `Dockerfile` and
//! `docker-compose.yml` text is the job of a `ManifestRenderer` adapter.

use crate::domain::{entities::service::Service, value_objects::Variant};

/// Go toolchain version written into generated modules.
pub const DEFAULT_GO_VERSION: &str = "1.23";

/// Compose service name of the message broker.
pub const RABBITMQ_HOST: &str = "rabbitmq";

/// Compose service name of the bundled PostgreSQL instance.
pub const POSTGRES_HOST: &str = "postgres";

// ── module manifest ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub path: String,
    pub version: String,
}

impl Dependency {
    fn new(path: &str, version: &str) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

/// Contents of a service's `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    pub module: String,
    pub go_version: String,
    pub dependencies: Vec<Dependency>,
}

impl ModuleManifest {
    /// Picks dependencies from a fixed pool keyed by variant and features.
    ///
    /// The list is not derived from the imports of the generated files.
    pub fn for_service(service: &Service) -> Self {
        let mut dependencies = vec![
            Dependency::new("github.com/go-chi/chi/v5", "v5.1.0"),
            Dependency::new("github.com/go-chi/cors", "v1.2.1"),
        ];

        if service.variant == Variant::Api
            && service.database.as_ref().is_some_and(|db| db.is_pgx())
        {
            dependencies.push(Dependency::new("github.com/jackc/pgconn", "v1.14.3"));
            dependencies.push(Dependency::new("github.com/jackc/pgx/v5", "v5.6.0"));
        }

        if service.variant == Variant::Broker {
            dependencies.push(Dependency::new("github.com/google/uuid", "v1.6.0"));
        }

        if service.variant.uses_messaging() {
            dependencies.push(Dependency::new("github.com/rabbitmq/amqp091-go", "v1.10.0"));
        }

        Self {
            module: service.name.clone(),
            go_version: DEFAULT_GO_VERSION.into(),
            dependencies,
        }
    }

    pub fn with_go_version(mut self, version: impl Into<String>) -> Self {
        self.go_version = version.into();
        self
    }

    pub fn requires(&self, path: &str) -> bool {
        self.dependencies.iter().any(|d| d.path == path)
    }
}

// ── deployment manifest ──────────────────────────────────────────────────────

/// One compose service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedService {
    pub name: String,
    /// Build context relative to the project root.
    pub dir: String,
    /// Published port; `None` for services without an HTTP server.
    pub port: Option<u16>,
    pub depends_on: Vec<String>,
    /// `DATABASE_URL` passed to services that open a database pool.
    pub database_url: Option<String>,
}

/// Contents of the project's `docker-compose.yml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentManifest {
    pub project: String,
    pub services: Vec<DeployedService>,
    pub rabbitmq: bool,
    pub postgres: bool,
}

impl DeploymentManifest {
    /// Services are listed in name order so the file is stable across runs.
    pub fn for_project(project: impl Into<String>, services: &[Service]) -> Self {
        let project: String = project.into();
        let mut sorted: Vec<&Service> = services.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let rabbitmq = services.iter().any(|s| s.variant.uses_messaging());
        let postgres = services.iter().any(Service::uses_database);

        let services = sorted
            .into_iter()
            .map(|s| {
                let mut depends_on = Vec::new();
                if s.uses_database() {
                    depends_on.push(POSTGRES_HOST.to_string());
                }
                if s.variant.uses_messaging() {
                    depends_on.push(RABBITMQ_HOST.to_string());
                }
                DeployedService {
                    name: s.name.clone(),
                    dir: format!("./{}", s.name),
                    port: (s.variant.serves_http() && s.port != 0).then_some(s.port),
                    depends_on,
                    database_url: s.uses_database().then(|| database_url(s)),
                }
            })
            .collect();

        Self {
            project: compose_project_name(&project),
            services,
            rabbitmq,
            postgres,
        }
    }

    pub fn network(&self) -> String {
        format!("{}-network", self.project)
    }
}

/// Compose project names are lower-case letters, digits, `-` and `_`,
/// starting with a letter or digit. Other runs of characters become `-`.
pub fn compose_project_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    for c in raw.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            name.push(c);
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }
    let name = name
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .trim_end_matches('-');
    if name.is_empty() {
        "layer".to_string()
    } else {
        name.to_string()
    }
}

/// Configured URL, or one pointing at the bundled PostgreSQL instance.
fn database_url(service: &Service) -> String {
    match &service.database {
        Some(db) if !db.url.is_empty() => db.url.clone(),
        Some(db) => format!(
            "postgres://postgres:password@{POSTGRES_HOST}:{}/postgres?sslmode=disable&connect_timeout={}",
            db.port, db.connection_timeout
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::service::Database;

    #[test]
    fn api_with_postgres_pulls_pgx() {
        let service = Service::new("auth-service", Variant::Api).with_database(Database::postgres());
        let manifest = ModuleManifest::for_service(&service);

        assert_eq!(manifest.module, "auth-service");
        assert_eq!(manifest.go_version, "1.23");
        assert!(manifest.requires("github.com/go-chi/chi/v5"));
        assert!(manifest.requires("github.com/jackc/pgx/v5"));
        assert!(!manifest.requires("github.com/rabbitmq/amqp091-go"));
    }

    #[test]
    fn broker_pulls_amqp_and_uuid() {
        let manifest = ModuleManifest::for_service(&Service::new("broker-service", Variant::Broker));
        assert!(manifest.requires("github.com/rabbitmq/amqp091-go"));
        assert!(manifest.requires("github.com/google/uuid"));
        assert!(!manifest.requires("github.com/jackc/pgx/v5"));
    }

    #[test]
    fn listener_has_no_uuid() {
        let manifest =
            ModuleManifest::for_service(&Service::new("listener-service", Variant::Listener));
        assert!(manifest.requires("github.com/rabbitmq/amqp091-go"));
        assert!(!manifest.requires("github.com/google/uuid"));
    }

    #[test]
    fn deployment_is_sorted_and_wires_infrastructure() {
        let services = vec![
            Service::new("listener-service", Variant::Listener),
            Service::new("auth-service", Variant::Api).with_database(Database::postgres()),
        ];
        let manifest = DeploymentManifest::for_project("shop", &services);

        let names: Vec<_> = manifest.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["auth-service", "listener-service"]);
        assert!(manifest.rabbitmq);
        assert!(manifest.postgres);
        assert_eq!(manifest.services[0].port, Some(8080));
        assert_eq!(manifest.services[0].depends_on, vec!["postgres"]);
        assert!(
            manifest.services[0]
                .database_url
                .as_deref()
                .is_some_and(|url| url.contains("@postgres:5432/"))
        );
        assert_eq!(manifest.services[1].port, None);
        assert_eq!(manifest.services[1].database_url, None);
        assert_eq!(manifest.services[1].depends_on, vec!["rabbitmq"]);
        assert_eq!(manifest.network(), "shop-network");
    }

    #[test]
    fn project_name_is_a_valid_compose_name() {
        assert_eq!(compose_project_name("shop"), "shop");
        assert_eq!(compose_project_name("My Shop"), "my-shop");
        assert_eq!(compose_project_name("_Billing.API v2"), "billing-api-v2");
        assert_eq!(compose_project_name("..."), "layer");

        let manifest = DeploymentManifest::for_project("My Shop", &[]);
        assert_eq!(manifest.project, "my-shop");
        assert_eq!(manifest.network(), "my-shop-network");
    }
}
