//! A project: the set of services generated side by side under one root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{entities::service::Service, error::DomainError};

/// The persisted project description (`layer.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProject {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Directory the project was generated into, as given by the user.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root: String,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl LayerProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            root: String::new(),
            generated_at: Utc::now(),
            services: Vec::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Adds a service, rejecting a second one with the same name.
    pub fn add_service(&mut self, service: Service) -> Result<(), DomainError> {
        if self.service(&service.name).is_some() {
            return Err(DomainError::DuplicateService { name: service.name });
        }
        self.services.push(service);
        Ok(())
    }

    pub fn remove_service(&mut self, name: &str) -> Result<Service, DomainError> {
        let index = self
            .services
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| DomainError::ServiceNotFound(name.to_string()))?;
        Ok(self.services.remove(index))
    }

    /// Marks the project as generated now.
    pub fn touch(&mut self) {
        self.generated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidProject("project name is empty".into()));
        }
        crate::domain::DomainValidator::validate_services(&self.services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Variant;

    #[test]
    fn add_service_rejects_duplicates() {
        let mut project = LayerProject::new("shop");
        project
            .add_service(Service::new("auth-service", Variant::Api))
            .unwrap();

        let err = project
            .add_service(Service::new("auth-service", Variant::Broker))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateService { .. }));
        assert_eq!(project.services.len(), 1);
    }

    #[test]
    fn remove_unknown_service_is_not_found() {
        let mut project = LayerProject::new("shop");
        assert!(matches!(
            project.remove_service("ghost"),
            Err(DomainError::ServiceNotFound(_))
        ));
    }

    #[test]
    fn json_defaults_fill_id_and_timestamp() {
        let project: LayerProject = serde_json::from_str(
            r#"{"name":"shop","services":[{"name":"auth-service","port":8080,"variant":"api"}]}"#,
        )
        .unwrap();

        assert_eq!(project.name, "shop");
        assert_eq!(project.services[0].variant, Variant::Api);
        assert!(project.validate().is_ok());
    }
}
