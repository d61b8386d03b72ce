//! Broker variant: HTTP ingress that publishes events to RabbitMQ and
//! relays the listener's reply back to the HTTP caller.

use crate::domain::{
    builder::*,
    entities::{GeneratedFile, Service},
    generators::shared::{self, amqp_import, open_channel, return_err},
    registry::GenerationConfig,
    syntax::{BinaryOp, Decl, Expr, Field},
};

/// `config/config.go`
pub fn config_file(service: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    vec![shared::plain_http_config(service)]
}

/// `event/emitter.go`: `Emitter`, `NewEmitter`, `Push`, `SendResponse`.
pub fn emitter_file(_: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let decls = vec![
        imports([
            import("encoding/json"),
            import("fmt"),
            import("log"),
            import("net/http"),
            import("github.com/google/uuid"),
            amqp_import(),
        ]),
        type_struct(
            "Emitter",
            vec![
                field("conn", star(selector("amqp.Connection"))),
                field("exchange", ident("string")),
                field("id", selector("uuid.UUID")),
            ],
        ),
        new_emitter(),
        push(),
        send_response(),
    ];

    vec![GeneratedFile::new("emitter.go", file("event", decls))]
}

fn emitter_recv() -> Vec<Field> {
    vec![field("e", star(ident("Emitter")))]
}

fn new_emitter() -> Decl {
    func(
        "NewEmitter",
        vec![
            field("conn", star(selector("amqp.Connection"))),
            field("exchange", ident("string")),
        ],
        vec![result(star(ident("Emitter")))],
        vec![
            define(&["id"], selector_call("uuid.New", vec![])),
            ret(vec![addr_of(composite(
                ident("Emitter"),
                vec![
                    key_value("conn", ident("conn")),
                    key_value("exchange", ident("exchange")),
                    key_value("id", ident("id")),
                ],
            ))]),
        ],
    )
}

fn correlation_id() -> Expr {
    selector_call("e.id.String", vec![])
}

/// Publishes the event with a private reply queue and waits for the answer.
fn push() -> Decl {
    let mut body = open_channel("e.conn");
    body.extend([
        expr_stmt(selector_call(
            "log.Println",
            vec![string_lit("push function: topic payload: "), ident("topicPayload")],
        )),
        define_err(
            &["jsonBytes"],
            selector_call("json.Marshal", vec![selector("topicPayload.Event")]),
        ),
        return_err(),
        define_err(
            &["q"],
            selector_call(
                "ch.QueueDeclare",
                vec![
                    string_lit(""),
                    bool_lit(true),
                    bool_lit(true),
                    bool_lit(false),
                    bool_lit(false),
                    nil(),
                ],
            ),
        ),
        return_err(),
        assign_err(selector_call(
            "ch.Publish",
            vec![
                selector("e.exchange"),
                selector("topicPayload.Name"),
                bool_lit(false),
                bool_lit(false),
                composite(
                    selector("amqp.Publishing"),
                    vec![
                        key_value("ContentType", string_lit("application/json")),
                        key_value("CorrelationId", correlation_id()),
                        key_value("ReplyTo", selector("q.Name")),
                        key_value("Body", ident("jsonBytes")),
                    ],
                ),
            ],
        )),
        return_err(),
        ret(vec![selector_call(
            "e.SendResponse",
            vec![ident("w"), ident("q")],
        )]),
    ]);

    method(
        emitter_recv(),
        "Push",
        vec![
            field("w", selector("http.ResponseWriter")),
            field("topicPayload", ident("TopicPayload")),
        ],
        vec![result(ident("error"))],
        body,
    )
}

/// Consumes one reply from `q` and writes it to the HTTP response.
fn send_response() -> Decl {
    let mut body = open_channel("e.conn");
    body.extend([
        define_err(
            &["msgs"],
            selector_call(
                "ch.Consume",
                vec![
                    selector("q.Name"),
                    string_lit(""),
                    bool_lit(true),
                    bool_lit(false),
                    bool_lit(false),
                    bool_lit(false),
                    nil(),
                ],
            ),
        ),
        if_err(vec![
            expr_stmt(selector_call(
                "http.Error",
                vec![
                    ident("w"),
                    string_lit("Failed to set up consumer"),
                    selector("http.StatusInternalServerError"),
                ],
            )),
            ret(vec![selector_call(
                "fmt.Errorf",
                vec![string_lit("failed to set up consumer: %w"), ident("err")],
            )]),
        ]),
        define(&["msg"], recv_from(ident("msgs"))),
        if_stmt(
            binary(selector("msg.CorrelationId"), BinaryOp::Eq, correlation_id()),
            vec![
                expr_stmt(call(
                    sel(selector_call("w.Header", vec![]), "Set"),
                    vec![string_lit("Content-Type"), string_lit("application/json")],
                )),
                expr_stmt(selector_call(
                    "w.WriteHeader",
                    vec![selector("http.StatusOK")],
                )),
                if_init(
                    define(
                        &["_", "err"],
                        selector_call("w.Write", vec![selector("msg.Body")]),
                    ),
                    err_not_nil(),
                    vec![ret(vec![selector_call(
                        "fmt.Errorf",
                        vec![string_lit("failed to write HTTP response: %w"), ident("err")],
                    )])],
                ),
                ret(vec![nil()]),
            ],
        ),
        ret(vec![nil()]),
    ]);

    method(
        emitter_recv(),
        "SendResponse",
        vec![
            field("w", selector("http.ResponseWriter")),
            field("q", selector("amqp.Queue")),
        ],
        vec![result(ident("error"))],
        body,
    )
}

/// `event/event.go`: payload types, `ConnectToRabbit`, `SendToListener`.
pub fn event_file(_: &Service, _: &GenerationConfig) -> Vec<GeneratedFile> {
    let send_to_listener = func(
        "SendToListener",
        vec![
            field("w", selector("http.ResponseWriter")),
            field("exchange", ident("string")),
            field("topicPayload", ident("TopicPayload")),
        ],
        vec![result(ident("error"))],
        vec![
            define(&["conn"], call(ident("ConnectToRabbit"), vec![])),
            defer(selector_call("conn.Close", vec![])),
            define(
                &["e"],
                call(ident("NewEmitter"), vec![ident("conn"), ident("exchange")]),
            ),
            if_init(
                define(
                    &["err"],
                    selector_call("e.Push", vec![ident("w"), ident("topicPayload")]),
                ),
                err_not_nil(),
                vec![ret(vec![ident("err")])],
            ),
            ret(vec![nil()]),
        ],
    );

    let decls = vec![
        imports([
            import("encoding/json"),
            import("log"),
            import("math"),
            import("net/http"),
            import("time"),
            amqp_import(),
        ]),
        shared::event_payload(),
        type_struct(
            "TopicPayload",
            vec![
                json_field("Name", ident("string"), "name"),
                json_field("Event", ident("EventPayload"), "event"),
            ],
        ),
        shared::connect_to_rabbit(),
        send_to_listener,
    ];

    vec![GeneratedFile::new("event.go", file("event", decls))]
}
