//! Builder library for the Go syntax model.
//!
//! Every function here is pure and infallible. Builders encode the local
//! syntactic policy (single vs grouped imports, optional tags, optional
//! receivers) so generators compose trees without repeating it. Semantic
//! content such as an empty identifier is not checked here; the renderer
//! rejects it.

use crate::domain::syntax::{
    AssignOp, BasicLit, BinaryOp, Block, BranchKind, Decl, Expr, Field, FuncDecl, FuncType,
    IfStmt, ImportDecl, ImportSpec, LitKind, SourceFile, Stmt, TypeSpec, UnaryOp, VarSpec,
};

// ── files & imports ──────────────────────────────────────────────────────────

pub fn file(package: impl Into<String>, decls: Vec<Decl>) -> SourceFile {
    SourceFile {
        package: package.into(),
        decls,
    }
}

pub fn import(path: impl Into<String>) -> ImportSpec {
    ImportSpec {
        path: path.into(),
        alias: None,
    }
}

pub fn import_as(alias: impl Into<String>, path: impl Into<String>) -> ImportSpec {
    ImportSpec {
        path: path.into(),
        alias: Some(alias.into()),
    }
}

/// `import _ "path"`
pub fn blank_import(path: impl Into<String>) -> ImportSpec {
    import_as("_", path)
}

/// Import declaration; grouped iff it carries more than one spec.
pub fn imports(specs: impl IntoIterator<Item = ImportSpec>) -> Decl {
    let specs: Vec<ImportSpec> = specs.into_iter().collect();
    let grouped = specs.len() > 1;
    Decl::Import(ImportDecl { specs, grouped })
}

// ── declarations ─────────────────────────────────────────────────────────────

pub fn func_type(params: Vec<Field>, results: Vec<Field>) -> FuncType {
    FuncType { params, results }
}

pub fn func(
    name: impl Into<String>,
    params: Vec<Field>,
    results: Vec<Field>,
    body: Vec<Stmt>,
) -> Decl {
    method(Vec::new(), name, params, results, body)
}

/// Function declaration with an optional receiver.
///
/// The receiver clause is omitted when `recv` is empty; only the first
/// receiver is used otherwise.
pub fn method(
    recv: Vec<Field>,
    name: impl Into<String>,
    params: Vec<Field>,
    results: Vec<Field>,
    body: Vec<Stmt>,
) -> Decl {
    Decl::Func(FuncDecl {
        name: name.into(),
        recv: recv.into_iter().next(),
        ty: func_type(params, results),
        body: block(body),
    })
}

/// Named parameter or field.
pub fn field(name: impl Into<String>, ty: Expr) -> Field {
    Field {
        names: vec![name.into()],
        ty,
        tag: None,
    }
}

/// Anonymous result.
pub fn result(ty: Expr) -> Field {
    Field {
        names: Vec::new(),
        ty,
        tag: None,
    }
}

/// Struct field; the tag is attached only when non-empty.
pub fn struct_field(name: impl Into<String>, ty: Expr, tag: &str) -> Field {
    Field {
        names: vec![name.into()],
        ty,
        tag: (!tag.is_empty()).then(|| tag.to_string()),
    }
}

/// Struct field tagged with `json:"key"`.
pub fn json_field(name: impl Into<String>, ty: Expr, key: &str) -> Field {
    struct_field(name, ty, &format!("json:\"{key}\""))
}

pub fn type_decl(name: impl Into<String>, ty: Expr) -> Decl {
    Decl::Type(TypeSpec {
        name: name.into(),
        ty,
    })
}

pub fn type_struct(name: impl Into<String>, fields: Vec<Field>) -> Decl {
    type_decl(name, Expr::Struct(fields))
}

/// Top-level `var name type = value`.
pub fn var_decl(name: impl Into<String>, ty: Option<Expr>, value: Option<Expr>) -> Decl {
    Decl::Var(var_spec(name, ty, value))
}

fn var_spec(name: impl Into<String>, ty: Option<Expr>, value: Option<Expr>) -> VarSpec {
    VarSpec {
        names: vec![name.into()],
        ty,
        values: value.into_iter().collect(),
    }
}

// ── expressions ──────────────────────────────────────────────────────────────

pub fn ident(name: impl Into<String>) -> Expr {
    Expr::Ident(name.into())
}

pub fn nil() -> Expr {
    ident("nil")
}

/// Dotted path such as `routes.Routes` or `app.Db`, split into nested selectors.
pub fn selector(path: &str) -> Expr {
    let mut parts = path.split('.');
    let head = ident(parts.next().unwrap_or_default());
    parts.fold(head, sel)
}

/// `x.name` on an arbitrary expression.
pub fn sel(x: Expr, name: &str) -> Expr {
    Expr::Selector {
        x: Box::new(x),
        sel: name.to_string(),
    }
}

pub fn call(fun: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        fun: Box::new(fun),
        args,
    }
}

/// `a.b.C(args)`
pub fn selector_call(path: &str, args: Vec<Expr>) -> Expr {
    call(selector(path), args)
}

/// Quoted Go string literal.
pub fn string_lit(value: &str) -> Expr {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                quoted.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Expr::BasicLit(BasicLit {
        kind: LitKind::String,
        value: quoted,
    })
}

pub fn int_lit(value: i64) -> Expr {
    Expr::BasicLit(BasicLit {
        kind: LitKind::Int,
        value: value.to_string(),
    })
}

pub fn bool_lit(value: bool) -> Expr {
    ident(if value { "true" } else { "false" })
}

/// `[]string{"a", "b"}`
pub fn string_slice<S: AsRef<str>>(items: &[S]) -> Expr {
    composite(
        array(ident("string")),
        items.iter().map(|s| string_lit(s.as_ref())).collect(),
    )
}

pub fn composite(ty: Expr, elts: Vec<Expr>) -> Expr {
    Expr::Composite {
        ty: Some(Box::new(ty)),
        elts,
    }
}

/// `Key: value` with an identifier key.
pub fn key_value(key: &str, value: Expr) -> Expr {
    Expr::KeyValue {
        key: Box::new(ident(key)),
        value: Box::new(value),
    }
}

pub fn func_lit(params: Vec<Field>, results: Vec<Field>, body: Vec<Stmt>) -> Expr {
    Expr::FuncLit {
        ty: func_type(params, results),
        body: block(body),
    }
}

pub fn addr_of(x: Expr) -> Expr {
    unary(UnaryOp::Addr, x)
}

/// `*x`, the pointer type or a dereference.
pub fn star(x: Expr) -> Expr {
    Expr::Star(Box::new(x))
}

/// `<-x`
pub fn recv_from(x: Expr) -> Expr {
    unary(UnaryOp::Recv, x)
}

pub fn not(x: Expr) -> Expr {
    unary(UnaryOp::Not, x)
}

pub fn unary(op: UnaryOp, x: Expr) -> Expr {
    Expr::Unary {
        op,
        x: Box::new(x),
    }
}

pub fn binary(x: Expr, op: BinaryOp, y: Expr) -> Expr {
    Expr::Binary {
        x: Box::new(x),
        op,
        y: Box::new(y),
    }
}

pub fn index(x: Expr, idx: Expr) -> Expr {
    Expr::Index {
        x: Box::new(x),
        index: Box::new(idx),
    }
}

// ── type expressions ─────────────────────────────────────────────────────────

pub fn array(elem: Expr) -> Expr {
    Expr::Array(Box::new(elem))
}

pub fn map_of(key: Expr, value: Expr) -> Expr {
    Expr::Map {
        key: Box::new(key),
        value: Box::new(value),
    }
}

pub fn chan(elem: Expr) -> Expr {
    Expr::Chan(Box::new(elem))
}

pub fn func_sig(params: Vec<Field>, results: Vec<Field>) -> Expr {
    Expr::Func(func_type(params, results))
}

// ── statements ───────────────────────────────────────────────────────────────

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts)
}

pub fn expr_stmt(x: Expr) -> Stmt {
    Stmt::Expr(x)
}

/// `a, b := rhs`
pub fn define(lhs: &[&str], rhs: Expr) -> Stmt {
    Stmt::Assign {
        lhs: lhs.iter().map(|name| ident(*name)).collect(),
        op: AssignOp::Define,
        rhs: vec![rhs],
    }
}

/// `lhs..., err := rhs`
pub fn define_err(lhs: &[&str], rhs: Expr) -> Stmt {
    let mut names = lhs.to_vec();
    names.push("err");
    define(&names, rhs)
}

/// `lhs = rhs`
pub fn assign(lhs: Expr, rhs: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![lhs],
        op: AssignOp::Assign,
        rhs: vec![rhs],
    }
}

/// `err = rhs`
pub fn assign_err(rhs: Expr) -> Stmt {
    assign(ident("err"), rhs)
}

/// `err != nil`
pub fn err_not_nil() -> Expr {
    binary(ident("err"), BinaryOp::NotEq, nil())
}

/// `if err != nil { body }`
pub fn if_err(body: Vec<Stmt>) -> Stmt {
    if_stmt(err_not_nil(), body)
}

pub fn if_stmt(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        init: None,
        cond,
        body: block(body),
        els: None,
    })
}

/// `if init; cond { body }`
pub fn if_init(init: Stmt, cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        init: Some(Box::new(init)),
        cond,
        body: block(body),
        els: None,
    })
}

pub fn if_else(cond: Expr, body: Vec<Stmt>, els: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        init: None,
        cond,
        body: block(body),
        els: Some(Box::new(Stmt::Block(block(els)))),
    })
}

pub fn ret(values: Vec<Expr>) -> Stmt {
    Stmt::Return(values)
}

pub fn defer(call: Expr) -> Stmt {
    Stmt::Defer(call)
}

pub fn go_stmt(call: Expr) -> Stmt {
    Stmt::Go(call)
}

/// `for key, value := range over { body }`
pub fn range(key: Option<&str>, value: Option<&str>, over: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::Range {
        key: key.map(ident),
        value: value.map(ident),
        define: key.is_some(),
        over,
        body: block(body),
    }
}

/// `for { body }`
pub fn for_ever(body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        init: None,
        cond: None,
        post: None,
        body: block(body),
    }
}

pub fn inc(name: &str) -> Stmt {
    Stmt::IncDec {
        x: ident(name),
        inc: true,
    }
}

pub fn brk() -> Stmt {
    Stmt::Branch(BranchKind::Break)
}

pub fn cont() -> Stmt {
    Stmt::Branch(BranchKind::Continue)
}

/// `var name type` inside a function body.
pub fn declare(name: &str, ty: Expr) -> Stmt {
    Stmt::Decl(var_spec(name, Some(ty), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_import_is_not_grouped() {
        let Decl::Import(decl) = imports([import("net/http")]) else {
            panic!("expected import decl");
        };
        assert!(!decl.grouped);
        assert_eq!(decl.specs.len(), 1);
    }

    #[test]
    fn several_imports_are_grouped() {
        let Decl::Import(decl) = imports([import("log"), import_as("amqp", "x/amqp")]) else {
            panic!("expected import decl");
        };
        assert!(decl.grouped);
        assert_eq!(decl.specs[1].alias.as_deref(), Some("amqp"));
    }

    #[test]
    fn struct_field_omits_empty_tag() {
        assert_eq!(struct_field("Db", star(selector("sql.DB")), "").tag, None);
        assert_eq!(
            json_field("Name", ident("string"), "name").tag.as_deref(),
            Some("json:\"name\"")
        );
    }

    #[test]
    fn func_without_receiver_has_none() {
        let Decl::Func(f) = func("main", vec![], vec![], vec![]) else {
            panic!("expected func");
        };
        assert!(f.recv.is_none());

        let Decl::Func(m) = method(
            vec![field("app", star(ident("Config")))],
            "InitServer",
            vec![],
            vec![],
            vec![],
        ) else {
            panic!("expected method");
        };
        assert_eq!(m.recv.map(|r| r.names), Some(vec!["app".to_string()]));
    }

    #[test]
    fn selector_splits_dotted_path() {
        assert_eq!(
            selector("app.Db.Ping"),
            sel(sel(ident("app"), "Db"), "Ping")
        );
        assert_eq!(selector("mux"), ident("mux"));
    }

    #[test]
    fn string_lit_escapes_quotes_and_controls() {
        let Expr::BasicLit(lit) = string_lit("say \"hi\"\n\u{1}") else {
            panic!("expected literal");
        };
        assert_eq!(lit.value, r#""say \"hi\"\n\x01""#);
    }

    #[test]
    fn define_err_appends_err() {
        let Stmt::Assign { lhs, op, .. } = define_err(&["db"], ident("x")) else {
            panic!("expected assignment");
        };
        assert_eq!(op, AssignOp::Define);
        assert_eq!(lhs, vec![ident("db"), ident("err")]);
    }

    #[test]
    fn range_without_key_does_not_define() {
        let Stmt::Range { define, key, .. } = range(None, None, ident("ch"), vec![]) else {
            panic!("expected range");
        };
        assert!(!define);
        assert!(key.is_none());
    }
}
