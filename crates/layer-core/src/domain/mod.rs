//! Core domain layer for Layer.
//!
//! Pure logic only: the Go syntax model and its builders, the service model,
//! the options protocol, the generator registry and the generator bodies.
//! Rendering and I/O live behind the ports of the application layer.
//!
//! - **No I/O**: generation is a deterministic fold over owned values
//! - **Infallible builders**: composition errors surface when rendering
//! - **Closed variants**: `Api`, `Broker` and `Listener` select a bundle
pub mod builder;
pub mod entities;
pub mod error;
pub mod generators;
pub mod options;
pub mod registry;
pub mod syntax;
pub mod value_objects;

mod validation;

pub use entities::{
    CorsOptions, Database, DeployedService, Dependency, DeploymentManifest, DirectoryToCreate,
    FileOrigin, FileToWrite, FsEntry, GeneratedFile, LayerProject, ModuleManifest, Package,
    ProjectStructure, Route, RouteGroup, RoutesConfig, Service, ServiceTemplate,
};
pub use error::{DomainError, ErrorCategory};
pub use options::{ServiceOption, ServiceSpec, template};
pub use registry::{GenerationConfig, GeneratorFn, GeneratorRegistry, generate};
pub use syntax::SourceFile;
pub use validation::DomainValidator;
pub use value_objects::{Bucket, HttpMethod, Variant};

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_files(service: &Service, bucket: Bucket) -> Vec<String> {
        service
            .package(bucket)
            .map(|p| p.file_names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    #[test]
    fn api_without_routes_has_no_handlers() {
        let service = template(
            Variant::Api,
            [options::with_name("auth-service"), options::with_port(8080)],
        )
        .unwrap();

        assert_eq!(bucket_files(&service, Bucket::Config), vec!["config.go"]);
        assert_eq!(bucket_files(&service, Bucket::Main), vec!["main.go"]);
        assert_eq!(bucket_files(&service, Bucket::Routes), vec!["routes.go"]);
        assert!(service.package(Bucket::Handlers).is_none());

        let config = &service.package(Bucket::Config).unwrap().files[0].source;
        assert!(config.import_paths().any(|p| p == "auth-service/routes"));
        assert!(config.func("InitServer").is_some());
    }

    #[test]
    fn distinct_handlers_get_one_stub_each() {
        let service = template(
            Variant::Api,
            [
                options::with_name("auth-service"),
                options::with_route("POST", "/login", "Login"),
                options::with_route("GET", "/users", "GetUsers"),
            ],
        )
        .unwrap();

        assert_eq!(
            bucket_files(&service, Bucket::Handlers),
            vec!["Login.go", "GetUsers.go"]
        );
    }

    #[test]
    fn shared_handler_collapses_to_one_stub() {
        let service = template(
            Variant::Api,
            [
                options::with_name("auth-service"),
                options::with_route("POST", "/login", "Auth"),
                options::with_route("POST", "/refresh", "Auth"),
                options::with_route("GET", "/logout", "Auth"),
            ],
        )
        .unwrap();

        assert_eq!(bucket_files(&service, Bucket::Handlers), vec!["Auth.go"]);
    }

    #[test]
    fn listener_has_no_routes_bucket() {
        let service = template(Variant::Listener, [options::with_name("listener-service")]).unwrap();

        assert!(service.package(Bucket::Routes).is_none());
        assert!(service.package(Bucket::Handlers).is_none());
        assert_eq!(
            bucket_files(&service, Bucket::Event),
            vec!["consumer.go", "event.go"]
        );
    }

    #[test]
    fn broker_has_http_and_messaging() {
        let service = template(Variant::Broker, [options::with_name("broker-service")]).unwrap();

        assert!(service.package(Bucket::Routes).is_some());
        assert_eq!(
            bucket_files(&service, Bucket::Event),
            vec!["emitter.go", "event.go"]
        );
    }

    #[test]
    fn unnamed_service_is_rejected() {
        let err = template(Variant::Api, [options::with_port(9000)]).unwrap_err();
        assert_eq!(err, DomainError::EmptyServiceName);
    }
}
