//! Listener variant: RabbitMQ consumer that runs a handler per event name
//! and publishes the result to the message's reply queue.

use crate::domain::{
    builder::*,
    entities::{GeneratedFile, Service},
    generators::shared::{self, amqp_import, local_import, open_channel, return_err},
    registry::GenerationConfig,
    syntax::{BinaryOp, Decl, Expr, Field, Stmt},
};

pub const EXCHANGE: &str = "logs_topic";
pub const TOPICS: [&str; 3] = ["log.INFO", "log.WARNING", "log.ERROR"];

/// `config/config.go`: RabbitMQ bootstrap and `StartListening`.
pub fn config_file(service: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let init_config = func(
        "InitConfig",
        vec![],
        vec![result(star(ident("Config")))],
        vec![
            define(&["conn"], selector_call("event.ConnectToRabbit", vec![])),
            ret(vec![addr_of(composite(
                ident("Config"),
                vec![key_value("Conn", ident("conn"))],
            ))]),
        ],
    );

    let start_listening = method(
        vec![field("app", star(ident("Config")))],
        "StartListening",
        vec![],
        vec![result(ident("error"))],
        vec![
            define(&["handlers"], composite(selector("event.Handlers"), vec![])),
            define(
                &["consumer"],
                selector_call(
                    "event.NewConsumer",
                    vec![selector("app.Conn"), string_lit(EXCHANGE), ident("handlers")],
                ),
            ),
            if_init(
                define(&["err"], selector_call("consumer.Setup", vec![])),
                err_not_nil(),
                vec![ret(vec![ident("err")])],
            ),
            define(&["topics"], string_slice(&TOPICS)),
            expr_stmt(selector_call(
                "log.Printf",
                vec![string_lit("Listening for topics: %v"), ident("topics")],
            )),
            ret(vec![selector_call("consumer.Listen", vec![ident("topics")])]),
        ],
    );

    let decls = vec![
        imports([local_import(service, "event"), import("log"), amqp_import()]),
        type_struct("Config", vec![field("Conn", star(selector("amqp.Connection")))]),
        init_config,
        start_listening,
    ];

    vec![GeneratedFile::new("config.go", file("config", decls))]
}

/// `main.go`: start listening, never an HTTP server.
pub fn main_file(service: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let main = func(
        "main",
        vec![],
        vec![],
        vec![
            define(&["app"], selector_call("config.InitConfig", vec![])),
            if_init(
                define(&["err"], selector_call("app.StartListening", vec![])),
                err_not_nil(),
                vec![expr_stmt(selector_call("log.Fatal", vec![ident("err")]))],
            ),
        ],
    );

    vec![GeneratedFile::new(
        "main.go",
        file(
            "main",
            vec![imports([local_import(service, "config"), import("log")]), main],
        ),
    )]
}

fn consumer_recv() -> Vec<Field> {
    vec![field("c", star(ident("Consumer")))]
}

fn nack(msg: &str) -> Stmt {
    expr_stmt(selector_call(
        &format!("{msg}.Nack"),
        vec![bool_lit(false), bool_lit(false)],
    ))
}

fn log_println(args: Vec<Expr>) -> Stmt {
    expr_stmt(selector_call("log.Println", args))
}

/// `event/consumer.go`: `Handlers`, `Consumer`, `Setup`, `Listen`.
pub fn consumer_file(_: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let handler_fn = func_sig(
        vec![field("event", selector("json.RawMessage"))],
        vec![result(array(ident("byte"))), result(ident("error"))],
    );

    let new_consumer = func(
        "NewConsumer",
        vec![
            field("conn", star(selector("amqp.Connection"))),
            field("exchange", ident("string")),
            field("handlers", ident("Handlers")),
        ],
        vec![result(star(ident("Consumer")))],
        vec![ret(vec![addr_of(composite(
            ident("Consumer"),
            vec![
                key_value("conn", ident("conn")),
                key_value("exchange", ident("exchange")),
                key_value("handlers", ident("handlers")),
            ],
        ))])],
    );

    let mut setup_body = open_channel("c.conn");
    setup_body.push(ret(vec![selector_call(
        "ch.ExchangeDeclare",
        vec![
            selector("c.exchange"),
            string_lit("topic"),
            bool_lit(true),
            bool_lit(false),
            bool_lit(false),
            bool_lit(false),
            nil(),
        ],
    )]));
    let setup = method(
        consumer_recv(),
        "Setup",
        vec![],
        vec![result(ident("error"))],
        setup_body,
    );

    let decls = vec![
        imports([import("encoding/json"), import("log"), amqp_import()]),
        type_decl("Handlers", map_of(ident("string"), handler_fn)),
        type_struct(
            "Consumer",
            vec![
                field("conn", star(selector("amqp.Connection"))),
                field("exchange", ident("string")),
                field("handlers", ident("Handlers")),
            ],
        ),
        new_consumer,
        setup,
        listen(),
    ];

    vec![GeneratedFile::new("consumer.go", file("event", decls))]
}

/// Binds the topics and dispatches each delivery on its own goroutine.
fn listen() -> Decl {
    let on_delivery = func_lit(
        vec![field("d", selector("amqp.Delivery"))],
        vec![],
        vec![
            log_println(vec![string_lit("new message from: "), selector("d.Exchange")]),
            declare("eventPayload", ident("EventPayload")),
            if_init(
                define(
                    &["err"],
                    selector_call(
                        "json.Unmarshal",
                        vec![selector("d.Body"), addr_of(ident("eventPayload"))],
                    ),
                ),
                err_not_nil(),
                vec![nack("d"), ret(vec![])],
            ),
            log_println(vec![ident("eventPayload")]),
            expr_stmt(selector_call(
                "c.handlePayload",
                vec![ident("eventPayload"), ident("ch"), ident("d")],
            )),
        ],
    );

    let mut body = open_channel("c.conn");
    body.extend([
        define_err(
            &["q"],
            selector_call(
                "ch.QueueDeclare",
                vec![
                    string_lit(""),
                    bool_lit(true),
                    bool_lit(false),
                    bool_lit(false),
                    bool_lit(false),
                    nil(),
                ],
            ),
        ),
        return_err(),
        range(
            Some("_"),
            Some("topic"),
            ident("topics"),
            vec![
                assign_err(selector_call(
                    "ch.QueueBind",
                    vec![
                        selector("q.Name"),
                        ident("topic"),
                        selector("c.exchange"),
                        bool_lit(false),
                        nil(),
                    ],
                )),
                return_err(),
            ],
        ),
        define_err(
            &["messages"],
            selector_call(
                "ch.Consume",
                vec![
                    selector("q.Name"),
                    string_lit(""),
                    bool_lit(false),
                    bool_lit(false),
                    bool_lit(false),
                    bool_lit(false),
                    nil(),
                ],
            ),
        ),
        return_err(),
        define(
            &["forever"],
            call(ident("make"), vec![chan(ident("bool"))]),
        ),
        log_println(vec![string_lit("listening for messages!")]),
        range(
            Some("d"),
            None,
            ident("messages"),
            vec![go_stmt(call(on_delivery, vec![ident("d")]))],
        ),
        expr_stmt(recv_from(ident("forever"))),
        ret(vec![nil()]),
    ]);

    method(
        consumer_recv(),
        "Listen",
        vec![field("topics", array(ident("string")))],
        vec![result(ident("error"))],
        body,
    )
}

/// `event/event.go`: payload type, `ConnectToRabbit`, `handlePayload`.
pub fn event_file(_: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let decls = vec![
        imports([
            import("encoding/json"),
            import("log"),
            import("math"),
            import("time"),
            amqp_import(),
        ]),
        shared::event_payload(),
        shared::connect_to_rabbit(),
        handle_payload(),
    ];

    vec![GeneratedFile::new("event.go", file("event", decls))]
}

/// Runs the handler registered for the event and publishes its reply.
fn handle_payload() -> Decl {
    let body = vec![
        define(
            &["function", "ok"],
            index(selector("c.handlers"), selector("payload.Name")),
        ),
        if_stmt(
            not(ident("ok")),
            vec![
                log_println(vec![string_lit(
                    "error trying to execute a function method for the event",
                )]),
                nack("msg"),
                ret(vec![]),
            ],
        ),
        log_println(vec![string_lit("Event detected, executing function")]),
        define_err(
            &["response"],
            call(ident("function"), vec![selector("payload.Data")]),
        ),
        if_err(vec![
            log_println(vec![string_lit("error executing event: "), ident("err")]),
            nack("msg"),
            ret(vec![]),
        ]),
        if_stmt(
            binary(
                selector("msg.ReplyTo"),
                BinaryOp::Eq,
                string_lit(""),
            ),
            vec![
                expr_stmt(selector_call(
                    "log.Printf",
                    vec![
                        string_lit("No ReplyTo queue specified for event: %s, correlationId: %s"),
                        selector("payload.Name"),
                        selector("msg.CorrelationId"),
                    ],
                )),
                nack("msg"),
                ret(vec![]),
            ],
        ),
        assign_err(selector_call(
            "ch.Publish",
            vec![
                string_lit(""),
                selector("msg.ReplyTo"),
                bool_lit(false),
                bool_lit(false),
                composite(
                    selector("amqp.Publishing"),
                    vec![
                        key_value("ContentType", string_lit("application/json")),
                        key_value("CorrelationId", selector("msg.CorrelationId")),
                        key_value("Body", ident("response")),
                    ],
                ),
            ],
        )),
        if_err(vec![
            expr_stmt(selector_call(
                "log.Printf",
                vec![
                    string_lit("Failed to publish response to %s: %v"),
                    selector("msg.ReplyTo"),
                    ident("err"),
                ],
            )),
            nack("msg"),
            ret(vec![]),
        ]),
        expr_stmt(selector_call("msg.Ack", vec![bool_lit(false)])),
        expr_stmt(selector_call(
            "log.Printf",
            vec![
                string_lit("Successfully published response to %s for event: %s, correlationId: %s"),
                selector("msg.ReplyTo"),
                selector("payload.Name"),
                selector("msg.CorrelationId"),
            ],
        )),
    ];

    method(
        consumer_recv(),
        "handlePayload",
        vec![
            field("payload", ident("EventPayload")),
            field("ch", star(selector("amqp.Channel"))),
            field("msg", selector("amqp.Delivery")),
        ],
        vec![],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Variant;

    fn service() -> Service {
        Service::new("listener-service", Variant::Listener)
    }

    #[test]
    fn main_starts_listening_instead_of_serving() {
        let files = main_file(&service(), &GenerationConfig::default());
        let main = files[0].source.func("main").unwrap();
        let rendered = format!("{main:?}");
        assert!(rendered.contains("StartListening"));
        assert!(!rendered.contains("InitServer"));
    }

    #[test]
    fn config_bootstraps_rabbit_not_http() {
        let files = config_file(&service(), &GenerationConfig::default());
        let paths: Vec<_> = files[0].source.import_paths().collect();
        assert!(paths.contains(&"listener-service/event"));
        assert!(!paths.contains(&"net/http"));
        assert!(files[0].source.func("StartListening").is_some());
        assert!(files[0].source.func("InitServer").is_none());
    }

    #[test]
    fn consumer_exports_handlers_type() {
        let files = consumer_file(&service(), &GenerationConfig::default());
        assert!(files[0].source.decls.iter().any(
            |d| matches!(d, Decl::Type(t) if t.name == "Handlers")
        ));
        assert_eq!(
            files[0].source.func_names().collect::<Vec<_>>(),
            vec!["NewConsumer", "Setup", "Listen"]
        );
    }
}
