//! API variant: HTTP server backed by `database/sql`.

use crate::domain::{
    builder::*,
    entities::{GeneratedFile, Service},
    generators::shared::{self, local_import},
    registry::GenerationConfig,
    syntax::{BinaryOp, Decl, Stmt},
};

/// Attempts before `connectToDB` gives up.
const MAX_DB_ATTEMPTS: i64 = 10;

/// `config/config.go`
///
/// With a database the config owns the connection pool and retries until
/// Postgres accepts connections; without one it is a bare HTTP config.
pub fn config_file(service: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let Some(db) = service.database.as_ref() else {
        return vec![shared::plain_http_config(service)];
    };

    let mut specs = vec![
        local_import(service, "routes"),
        import("database/sql"),
        import("log"),
        import("net/http"),
        import("os"),
        import("time"),
    ];
    if db.is_pgx() {
        specs.extend([
            blank_import("github.com/jackc/pgconn"),
            blank_import("github.com/jackc/pgx/v5"),
            blank_import("github.com/jackc/pgx/v5/stdlib"),
        ]);
    }

    let decls = vec![
        imports(specs),
        var_decl("counts", Some(ident("int")), None),
        type_struct("Config", vec![field("Db", star(selector("sql.DB")))]),
        init_config(),
        shared::init_server(service, selector_call("routes.Routes", vec![selector("app.Db")])),
        open_db(&db.driver),
        connect_to_db(),
    ];

    vec![GeneratedFile::new("config.go", file("config", decls))]
}

fn init_config() -> Decl {
    func(
        "InitConfig",
        vec![],
        vec![result(star(ident("Config")))],
        vec![
            define(&["db"], call(ident("connectToDB"), vec![])),
            if_stmt(
                binary(ident("db"), BinaryOp::Eq, nil()),
                vec![expr_stmt(selector_call(
                    "log.Panic",
                    vec![string_lit("Can't connect to Postgres!")],
                ))],
            ),
            ret(vec![addr_of(composite(
                ident("Config"),
                vec![key_value("Db", ident("db"))],
            ))]),
        ],
    )
}

/// `func openDB(dsn string) (*sql.DB, error)`
fn open_db(driver: &str) -> Decl {
    let fail = || if_err(vec![ret(vec![nil(), ident("err")])]);

    func(
        "openDB",
        vec![field("dsn", ident("string"))],
        vec![result(star(selector("sql.DB"))), result(ident("error"))],
        vec![
            define_err(
                &["db"],
                selector_call("sql.Open", vec![string_lit(driver), ident("dsn")]),
            ),
            fail(),
            assign_err(selector_call("db.Ping", vec![])),
            fail(),
            ret(vec![ident("db"), nil()]),
        ],
    )
}

/// `func connectToDB() *sql.DB`
fn connect_to_db() -> Decl {
    let log = |msg: &str| -> Stmt { expr_stmt(selector_call("log.Println", vec![string_lit(msg)])) };

    let attempt = vec![
        define_err(&["conn"], call(ident("openDB"), vec![ident("dsn")])),
        if_else(
            err_not_nil(),
            vec![log("Postgres not yet ready..."), inc("counts")],
            vec![log("Connected to Postgres!"), ret(vec![ident("conn")])],
        ),
        if_stmt(
            binary(ident("counts"), BinaryOp::Gt, int_lit(MAX_DB_ATTEMPTS)),
            vec![
                expr_stmt(selector_call("log.Println", vec![ident("err")])),
                ret(vec![nil()]),
            ],
        ),
        log("Backing off for two seconds..."),
        expr_stmt(selector_call(
            "time.Sleep",
            vec![binary(int_lit(2), BinaryOp::Mul, selector("time.Second"))],
        )),
        cont(),
    ];

    func(
        "connectToDB",
        vec![],
        vec![result(star(selector("sql.DB")))],
        vec![
            define(
                &["dsn"],
                selector_call("os.Getenv", vec![string_lit("DATABASE_URL")]),
            ),
            for_ever(attempt),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::Database, value_objects::Variant};

    #[test]
    fn pgx_driver_adds_blank_imports() {
        let service = Service::new("auth-service", Variant::Api).with_database(Database::postgres());
        let files = config_file(&service, &GenerationConfig::default());
        let paths: Vec<_> = files[0].source.import_paths().collect();

        assert!(paths.contains(&"auth-service/routes"));
        assert!(paths.contains(&"github.com/jackc/pgx/v5/stdlib"));
        assert_eq!(
            files[0].source.func_names().collect::<Vec<_>>(),
            vec!["InitConfig", "InitServer", "openDB", "connectToDB"]
        );
    }

    #[test]
    fn other_driver_skips_pgx_imports() {
        let db = Database {
            driver: "mysql".into(),
            ..Database::postgres()
        };
        let service = Service::new("svc", Variant::Api).with_database(db);
        let files = config_file(&service, &GenerationConfig::default());
        assert!(!files[0].source.import_paths().any(|p| p.contains("pgx")));
    }

    #[test]
    fn no_database_yields_plain_config() {
        let service = Service::new("svc", Variant::Api);
        let files = config_file(&service, &GenerationConfig::default());
        assert!(!files[0].source.import_paths().any(|p| p == "database/sql"));
        assert!(files[0].source.func("connectToDB").is_none());
    }
}
