//! Integration tests for layer-core.

use layer_core::{
    domain::{
        Bucket, DomainError, GenerationConfig, GeneratedFile, GeneratorRegistry, HttpMethod,
        RouteGroup, RoutesConfig, Service, ServiceOption, Variant, builder, generate, options,
        syntax::{Expr, Stmt},
    },
    prelude::*,
};

fn files(service: &Service, bucket: Bucket) -> Vec<&str> {
    service.files(bucket).iter().map(|f| f.name.as_str()).collect()
}

/// Every call expression `x.sel(...)` in the routes function, as `x.sel`.
fn router_calls(service: &Service) -> Vec<String> {
    fn walk(stmts: &[Stmt], out: &mut Vec<String>) {
        for stmt in stmts {
            if let Stmt::Expr(Expr::Call { fun, args }) = stmt {
                if let Expr::Selector { x, sel } = fun.as_ref() {
                    if let Expr::Ident(recv) = x.as_ref() {
                        out.push(format!("{recv}.{sel}"));
                    }
                }
                for arg in args {
                    if let Expr::FuncLit { body, .. } = arg {
                        walk(&body.stmts, out);
                    }
                }
            }
        }
    }

    let routes = &service.files(Bucket::Routes)[0].source;
    let mut out = Vec::new();
    walk(&routes.func("Routes").unwrap().body.stmts, &mut out);
    out
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn api_service_has_config_main_and_empty_router() {
    let service = template(
        Variant::Api,
        [options::with_name("auth-service"), options::with_port(8080)],
    )
    .unwrap();

    assert_eq!(files(&service, Bucket::Config), vec!["config.go"]);
    assert_eq!(files(&service, Bucket::Main), vec!["main.go"]);
    assert_eq!(files(&service, Bucket::Routes), vec!["routes.go"]);
    assert!(files(&service, Bucket::Handlers).is_empty());

    let registrations: Vec<_> = router_calls(&service)
        .into_iter()
        .filter(|c| !c.ends_with(".Use"))
        .collect();
    assert!(registrations.is_empty(), "{registrations:?}");
}

#[test]
fn two_routes_two_handlers() {
    let service = template(
        Variant::Api,
        [
            options::with_name("auth-service"),
            options::with_route("POST", "/login", "Login"),
            options::with_route("GET", "/users", "GetUsers"),
        ],
    )
    .unwrap();

    let calls = router_calls(&service);
    assert!(calls.contains(&"mux.Post".to_string()));
    assert!(calls.contains(&"mux.Get".to_string()));
    assert_eq!(files(&service, Bucket::Handlers), vec!["Login.go", "GetUsers.go"]);
}

#[test]
fn routes_sharing_a_handler_yield_one_stub() {
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

    assert_eq!(files(&service, Bucket::Handlers), vec!["Auth.go"]);
    assert_eq!(router_calls(&service).iter().filter(|c| !c.ends_with(".Use")).count(), 3);
}

#[test]
fn listener_listens_instead_of_serving() {
    let service = template(Variant::Listener, [options::with_name("listener-service")]).unwrap();

    assert!(files(&service, Bucket::Routes).is_empty());
    let main = service.files(Bucket::Main)[0].source.func("main").unwrap();
    let debug = format!("{main:?}");
    assert!(debug.contains("StartListening"));
    assert!(!debug.contains("InitServer"));
}

#[test]
fn unknown_method_is_dropped_without_failing() {
    let service = template(
        Variant::Api,
        [
            options::with_name("auth-service"),
            options::with_route("FETCH", "/x", "Fetch"),
            options::with_route("GET", "/y", "Get"),
        ],
    )
    .unwrap();

    let registrations: Vec<_> = router_calls(&service)
        .into_iter()
        .filter(|c| !c.ends_with(".Use"))
        .collect();
    assert_eq!(registrations, vec!["mux.Get"]);
    assert!("FETCH".parse::<HttpMethod>().is_err());
}

#[test]
fn cors_defaults_are_baked_into_router() {
    let service = template(Variant::Api, [options::with_name("auth-service")]).unwrap();
    let routes = format!("{:?}", service.files(Bucket::Routes)[0].source);

    for expected in ["https://*", "http://*", "OPTIONS", "Authorization", "AllowCredentials", "300"] {
        assert!(routes.contains(expected), "missing {expected}");
    }
}

// ============================================================================
// Options protocol
// ============================================================================

#[test]
fn option_order_does_not_change_output() {
    let name_first = template(
        Variant::Api,
        [options::with_name("auth-service"), options::with_postgres()],
    )
    .unwrap();
    let name_last = template(
        Variant::Api,
        [options::with_postgres(), options::with_name("auth-service")],
    )
    .unwrap();

    assert_eq!(name_first, name_last);
    let config = &name_last.files(Bucket::Config)[0].source;
    assert!(config.import_paths().any(|p| p == "auth-service/routes"));
}

#[test]
fn missing_name_is_rejected_before_generation() {
    let err = template(Variant::Broker, [options::with_postgres()]).unwrap_err();
    assert_eq!(err, DomainError::EmptyServiceName);
}

#[test]
fn options_round_trip_through_json() {
    let opts = vec![
        options::with_name("auth-service"),
        options::with_port(8080),
        ServiceOption::RouteGroup(RouteGroup::new("/v1")),
    ];
    let json = serde_json::to_string(&opts).unwrap();
    let back: Vec<ServiceOption> = serde_json::from_str(&json).unwrap();
    assert_eq!(opts, back);
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn generation_is_deterministic_and_idempotent() {
    let services = vec![
        Service::new("auth-service", Variant::Api)
            .with_database(Database::postgres())
            .with_routes(RoutesConfig::default().with_group(
                RouteGroup::new("/v1").with_route(Route::new("GET", "/me", "Me")),
            )),
        Service::new("broker-service", Variant::Broker),
    ];

    let once = generate(GenerationConfig::new(services.clone()));
    let twice = generate(generate(GenerationConfig::new(services)));

    assert_eq!(once.services, twice.services);
    assert_eq!(files(&once.services[1], Bucket::Event), vec!["emitter.go", "event.go"]);
}

#[test]
fn custom_registry_replaces_bundles() {
    fn doc(service: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
        vec![GeneratedFile::new(
            "doc.go",
            builder::file(service.name.replace('-', "_"), vec![]),
        )]
    }

    let registry = GeneratorRegistry::for_variant(Variant::Api)
        .without_bucket(Bucket::Handlers)
        .with_generator(Bucket::Main, doc);
    let config = GenerationConfig::new(vec![Service::new("svc", Variant::Api)])
        .with_registry(registry.clone())
        .generate();

    assert_eq!(files(&config.services[0], Bucket::Main), vec!["main.go", "doc.go"]);
    assert!(!registry.shares_table_with(&GeneratorRegistry::for_variant(Variant::Api)));
}
