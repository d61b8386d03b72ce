//! Project-level `docker-compose.yml`.

use std::collections::BTreeMap;

use serde::Serialize;

use layer_core::domain::{
    DeploymentManifest,
    entities::manifest::{POSTGRES_HOST, RABBITMQ_HOST},
};

const POSTGRES_IMAGE: &str = "postgres:16-alpine";
const RABBITMQ_IMAGE: &str = "rabbitmq:3-management-alpine";
const RESTART: &str = "unless-stopped";

#[derive(Debug, Serialize)]
struct ComposeFile<'a> {
    name: &'a str,
    services: BTreeMap<&'a str, ComposeService<'a>>,
    networks: BTreeMap<&'static str, Network>,
}

#[derive(Debug, Default, Serialize)]
struct ComposeService<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ports: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    environment: BTreeMap<&'static str, &'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<&'a str>,
    restart: &'static str,
}

#[derive(Debug, Serialize)]
struct Network {
    name: String,
}

fn published(port: u16) -> String {
    format!("{port}:{port}")
}

pub fn render(manifest: &DeploymentManifest) -> Result<String, serde_yaml::Error> {
    let mut services = BTreeMap::new();

    for service in &manifest.services {
        let mut environment = BTreeMap::new();
        if let Some(url) = &service.database_url {
            environment.insert("DATABASE_URL", url.as_str());
        }
        services.insert(
            service.name.as_str(),
            ComposeService {
                build: Some(&service.dir),
                ports: service.port.into_iter().map(published).collect(),
                environment,
                depends_on: service.depends_on.iter().map(String::as_str).collect(),
                restart: RESTART,
                ..Default::default()
            },
        );
    }

    if manifest.postgres {
        services.insert(
            POSTGRES_HOST,
            ComposeService {
                image: Some(POSTGRES_IMAGE),
                ports: vec![published(5432)],
                environment: BTreeMap::from([
                    ("POSTGRES_USER", "postgres"),
                    ("POSTGRES_PASSWORD", "password"),
                    ("POSTGRES_DB", "postgres"),
                ]),
                restart: RESTART,
                ..Default::default()
            },
        );
    }

    if manifest.rabbitmq {
        services.insert(
            RABBITMQ_HOST,
            ComposeService {
                image: Some(RABBITMQ_IMAGE),
                ports: vec![published(5672), published(15672)],
                restart: RESTART,
                ..Default::default()
            },
        );
    }

    let file = ComposeFile {
        name: &manifest.project,
        services,
        networks: BTreeMap::from([(
            "default",
            Network {
                name: manifest.network(),
            },
        )]),
    };
    serde_yaml::to_string(&file)
}
