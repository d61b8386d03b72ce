use std::collections::{HashMap, HashSet};

use crate::domain::{
    entities::{ProjectStructure, Service},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Service names become directory names, Go module paths and compose
    /// service names, so they are restricted to a portable alphabet.
    pub fn validate_service_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::EmptyServiceName);
        }

        let invalid = |reason: &str| DomainError::InvalidServiceName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(invalid("must start with a letter or digit"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("contains '{bad}'")));
        }
        Ok(())
    }

    /// Checks one generated service: name, and unique file names per bucket.
    pub fn validate_service(service: &Service) -> Result<(), DomainError> {
        Self::validate_service_name(&service.name)?;

        for package in &service.packages {
            let mut seen = HashSet::new();
            for name in package.file_names() {
                if !seen.insert(name) {
                    return Err(DomainError::DuplicateFile {
                        service: service.name.clone(),
                        bucket: package.bucket.to_string(),
                        file: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks a set of services generated side by side: unique names and,
    /// for HTTP services, unique published ports.
    pub fn validate_services(services: &[Service]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let mut ports: HashMap<u16, &str> = HashMap::new();
        for service in services {
            Self::validate_service_name(&service.name)?;
            if !seen.insert(service.name.as_str()) {
                return Err(DomainError::DuplicateService {
                    name: service.name.clone(),
                });
            }
            if !service.variant.serves_http() || service.port == 0 {
                continue;
            }
            if let Some(first) = ports.insert(service.port, &service.name) {
                return Err(DomainError::DuplicatePort {
                    port: service.port,
                    first: first.to_string(),
                    second: service.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        builder,
        entities::{GeneratedFile, Package},
        value_objects::{Bucket, Variant},
    };

    #[test]
    fn service_names() {
        assert!(DomainValidator::validate_service_name("auth-service").is_ok());
        assert!(DomainValidator::validate_service_name("svc_2.v1").is_ok());
        assert_eq!(
            DomainValidator::validate_service_name(""),
            Err(DomainError::EmptyServiceName)
        );
        assert!(DomainValidator::validate_service_name("-svc").is_err());
        assert!(DomainValidator::validate_service_name("my service").is_err());
        assert!(DomainValidator::validate_service_name("../etc").is_err());
    }

    #[test]
    fn duplicate_file_in_bucket_is_rejected() {
        let file = GeneratedFile::new("Auth.go", builder::file("handlers", vec![]));
        let mut service = Service::new("auth-service", Variant::Api);
        service.packages.push(Package {
            bucket: Bucket::Handlers,
            files: vec![file.clone(), file],
        });

        assert!(matches!(
            DomainValidator::validate_service(&service),
            Err(DomainError::DuplicateFile { bucket, file, .. })
                if bucket == "handlers" && file == "Auth.go"
        ));
    }

    #[test]
    fn duplicate_service_names_are_rejected() {
        let services = vec![
            Service::new("a", Variant::Api),
            Service::new("a", Variant::Listener),
        ];
        assert!(matches!(
            DomainValidator::validate_services(&services),
            Err(DomainError::DuplicateService { .. })
        ));
    }

    #[test]
    fn http_services_may_not_share_a_port() {
        let services = vec![
            Service::new("auth-service", Variant::Api),
            Service::new("broker-service", Variant::Broker).with_port(8080),
        ];
        assert!(matches!(
            DomainValidator::validate_services(&services),
            Err(DomainError::DuplicatePort { port: 8080, first, second })
                if first == "auth-service" && second == "broker-service"
        ));
    }

    #[test]
    fn default_ports_do_not_collide() {
        let services = vec![
            Service::new("auth-service", Variant::Api),
            Service::new("broker-service", Variant::Broker),
            Service::new("events", Variant::Listener),
            Service::new("audit", Variant::Listener),
        ];
        assert!(DomainValidator::validate_services(&services).is_ok());
    }
}
