//! End-to-end generation through the real adapters.

use std::fs;

use layer_adapters::{
    GoRenderer, LocalFilesystem, MemoryFilesystem, TextManifestRenderer, project_file,
};
use layer_core::{
    application::{ApplicationError, GenerateOptions, GenerationService},
    domain::{LayerProject, RouteGroup, options},
    error::LayerError,
    prelude::*,
};
use tempfile::TempDir;

fn service_on(fs: impl Filesystem + 'static) -> GenerationService {
    GenerationService::new(
        Box::new(GoRenderer::new()),
        Box::new(TextManifestRenderer::new()),
        Box::new(fs),
    )
}

fn auth_service() -> Service {
    template(
        Variant::Api,
        [
            options::with_name("auth-service"),
            options::with_port(8080),
            options::with_route("POST", "/login", "Login"),
        ],
    )
    .unwrap()
}

#[test]
fn api_service_renders_gofmt_source() {
    let tmp = TempDir::new().unwrap();
    let report = service_on(LocalFilesystem::new())
        .generate_project(vec![auth_service()], tmp.path(), &GenerateOptions::default())
        .unwrap();

    assert_eq!(report.services.len(), 1);
    let root = tmp.path().join("auth-service");

    assert_eq!(
        fs::read_to_string(root.join("main.go")).unwrap(),
        "package main\n\nimport \"auth-service/config\"\n\nfunc main() {\n\tconfig.InitConfig().InitServer()\n}\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("handlers/Login.go")).unwrap(),
        "package handlers\n\nimport \"net/http\"\n\nfunc Login(w http.ResponseWriter, r *http.Request) {}\n"
    );

    let routes = fs::read_to_string(root.join("routes/routes.go")).unwrap();
    assert!(routes.starts_with(
        "package routes\n\nimport (\n\t\"auth-service/handlers\"\n\t\"database/sql\"\n\t\"github.com/go-chi/chi/v5\"\n"
    ));
    assert!(routes.contains("func Routes(db *sql.DB) http.Handler {\n"));
    assert!(routes.contains("\tmux.Use(cors.Handler(cors.Options{\n\t\tAllowedOrigins:   []string{\"https://*\", \"http://*\"},\n"));
    assert!(routes.contains("\t\tAllowCredentials: false,\n\t\tMaxAge:           300,\n\t}))\n"));
    assert!(routes.contains("\tmux.Post(\"/login\", handlers.Login)\n\treturn mux\n}\n"));

    let config = fs::read_to_string(root.join("config/config.go")).unwrap();
    assert!(config.contains("type Config struct {\n\tDb *sql.DB\n}\n"));
    assert!(config.contains("\t_ \"github.com/jackc/pgx/v5/stdlib\"\n"));
    assert!(config.contains("\tserver := &http.Server{\n\t\tAddr:    \":8080\",\n\t\tHandler: routes.Routes(app.Db),\n\t}\n"));
    assert!(config.contains("\tdsn := os.Getenv(\"DATABASE_URL\")\n"));
    assert!(config.contains("\tif err := server.ListenAndServe(); err != nil {\n\t\tlog.Fatal(err)\n\t}\n"));

    let gomod = fs::read_to_string(root.join("go.mod")).unwrap();
    assert!(gomod.starts_with("module auth-service\n\ngo 1.23\n"));
    assert!(root.join("Dockerfile").is_file());

    let compose = fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
    assert!(compose.contains("  auth-service:\n    build: ./auth-service\n"));
}

#[test]
fn api_without_database_serves_plain_routes() {
    let service = template(
        Variant::Api,
        [
            options::with_name("gateway"),
            options::without_database(),
            options::with_route("GET", "/health", "Health"),
        ],
    )
    .unwrap();
    let fs = MemoryFilesystem::new();
    service_on(fs.clone())
        .generate_project(vec![service], "/out", &GenerateOptions::default())
        .unwrap();

    let files = fs.files();
    let routes = &files[std::path::Path::new("/out/gateway/routes/routes.go")];
    assert!(routes.starts_with(
        "package routes\n\nimport (\n\t\"gateway/handlers\"\n\t\"github.com/go-chi/chi/v5\"\n"
    ));
    assert!(routes.contains("func Routes() http.Handler {\n"));

    let config = &files[std::path::Path::new("/out/gateway/config/config.go")];
    assert!(config.contains("\t\tHandler: routes.Routes(),\n"));
    assert!(!config.contains("database/sql"));
}

#[test]
fn listener_event_files_align_struct_tags() {
    let listener = template(Variant::Listener, [options::with_name("listener-service")]).unwrap();
    let fs = MemoryFilesystem::new();
    service_on(fs.clone())
        .generate_project(vec![listener], "/out", &GenerateOptions::default())
        .unwrap();

    let files = fs.files();
    let event = &files[std::path::Path::new("/out/listener-service/event/event.go")];
    assert!(event.contains(
        "type EventPayload struct {\n\tName string          `json:\"name\"`\n\tData json.RawMessage `json:\"data\"`\n}\n"
    ));

    let consumer = &files[std::path::Path::new("/out/listener-service/event/consumer.go")];
    assert!(consumer.contains("type Handlers map[string]func(event json.RawMessage) ([]byte, error)\n"));
    assert!(consumer.contains("\t\tgo func("));

    let compose = &files[std::path::Path::new("/out/docker-compose.yml")];
    let doc: serde_yaml::Value = serde_yaml::from_str(compose).unwrap();
    let listener = &doc["services"]["listener-service"];
    assert_eq!(listener["depends_on"][0], "rabbitmq");
    assert!(listener.get("ports").is_none());
}

#[test]
fn database_service_gets_env_file_and_postgres() {
    let service = template(
        Variant::Api,
        [
            options::with_name("users"),
            options::with_postgres(),
            ServiceOption::RouteGroup(
                RouteGroup::new("/v1").with_route(Route::new("GET", "/me", "Me")),
            ),
        ],
    )
    .unwrap();
    let fs = MemoryFilesystem::new();
    service_on(fs.clone())
        .generate_project(vec![service], "/out", &GenerateOptions::default())
        .unwrap();

    let files = fs.files();
    let routes = &files[std::path::Path::new("/out/users/routes/routes.go")];
    assert!(routes.contains("func Routes(db *sql.DB) http.Handler {\n"));
    assert!(routes.contains("\tmux.Route(\"/v1\", func(r chi.Router) {\n\t\tr.Get(\"/me\", handlers.Me)\n\t})\n"));

    let config = &files[std::path::Path::new("/out/users/config/config.go")];
    assert!(config.contains("\t_ \"github.com/jackc/pgx/v5/stdlib\"\n"));
    assert!(config.contains("\t\ttime.Sleep(2 * time.Second)\n"));

    let compose = &files[std::path::Path::new("/out/docker-compose.yml")];
    assert!(compose.contains("  postgres:\n"));
    assert!(compose.contains("DATABASE_URL"));
}

#[test]
fn rerun_without_force_is_a_conflict_and_check_is_clean() {
    let tmp = TempDir::new().unwrap();
    let generator = service_on(LocalFilesystem::new());
    let opts = GenerateOptions::default();

    generator
        .generate_project(vec![auth_service()], tmp.path(), &opts)
        .unwrap();

    let err = generator
        .generate_project(vec![auth_service()], tmp.path(), &opts)
        .unwrap_err();
    assert!(matches!(
        err,
        LayerError::Application(ApplicationError::ProjectExists { .. })
    ));

    let drift = generator.check(vec![auth_service()], tmp.path(), &opts).unwrap();
    assert!(drift.is_clean(), "{drift:?}");

    fs::write(tmp.path().join("auth-service/handlers/Login.go"), "package handlers\n").unwrap();
    fs::write(tmp.path().join("auth-service/notes.txt"), "mine").unwrap();
    let drift = generator.check(vec![auth_service()], tmp.path(), &opts).unwrap();
    assert_eq!(drift.changed.len(), 1);
    assert_eq!(drift.stale.len(), 1);

    generator
        .generate_project(vec![auth_service()], tmp.path(), &opts.clone().with_overwrite(true))
        .unwrap();
    assert!(!tmp.path().join("auth-service/notes.txt").exists());
}

#[test]
fn invalid_handler_name_fails_only_that_service() {
    let bad = template(
        Variant::Api,
        [
            options::with_name("bad-service"),
            options::with_port(8090),
            options::with_route("GET", "/x", "Get-X"),
        ],
    )
    .unwrap();
    let fs = MemoryFilesystem::new();

    let err = service_on(fs.clone())
        .generate_project(vec![bad, auth_service()], "/out", &GenerateOptions::default())
        .unwrap_err();

    let LayerError::Application(ApplicationError::GenerationFailed { failures }) = err else {
        panic!("expected GenerationFailed, got {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].service, "bad-service");

    let files = fs.files();
    assert!(!files.keys().any(|p| p.starts_with("/out/bad-service")));
    assert!(files.contains_key(std::path::Path::new("/out/auth-service/main.go")));
}

#[test]
fn project_file_round_trips_generated_services() {
    let tmp = TempDir::new().unwrap();
    let project = LayerProject::new("shop").with_service(auth_service());
    project_file::save(tmp.path(), &project).unwrap();

    let loaded = project_file::load(tmp.path()).unwrap();
    assert_eq!(loaded.services[0].name, "auth-service");
    assert_eq!(loaded.services[0].route_groups().len(), 1);
}
