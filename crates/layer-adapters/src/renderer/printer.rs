//! Structural printer: syntax tree to unformatted Go text.
//!
//! Every statement and declaration goes on its own line, opening braces end
//! a line and closing braces start one. Indentation is left to the
//! formatter. Alignment cells (struct fields, multi-line key-value
//! elements) are separated by [`CELL`].

use layer_core::domain::syntax::{
    Block, Decl, Expr, Field, FuncDecl, FuncType, IfStmt, ImportDecl, ImportSpec, SourceFile,
    Stmt, VarSpec,
};

use super::{RenderError, RenderResult};

/// Alignment cell separator, consumed by the formatter.
pub const CELL: char = '\x0b';

pub fn print_file(file: &SourceFile) -> RenderResult<String> {
    let mut p = Printer::default();
    p.file(file)?;
    Ok(p.out)
}

/// Checks `name` against Go's identifier grammar.
pub fn check_ident(name: &str, context: &'static str) -> RenderResult<()> {
    let mut chars = name.chars();
    match chars.next() {
        None => Err(RenderError::EmptyIdentifier { context }),
        Some(first)
            if (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_') =>
        {
            Ok(())
        }
        Some(_) => Err(RenderError::InvalidIdentifier { name: name.into() }),
    }
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn w(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn nl(&mut self) {
        self.out.push('\n');
    }

    fn file(&mut self, file: &SourceFile) -> RenderResult<()> {
        if file.package.is_empty() {
            return Err(RenderError::EmptyPackage);
        }
        check_ident(&file.package, "package clause")?;

        self.w("package ");
        self.w(&file.package);
        self.nl();

        for decl in &file.decls {
            self.nl();
            self.decl(decl)?;
            self.nl();
        }
        Ok(())
    }

    // ── declarations ─────────────────────────────────────────────────────────

    fn decl(&mut self, decl: &Decl) -> RenderResult<()> {
        match decl {
            Decl::Import(imports) => self.import_decl(imports),
            Decl::Func(func) => self.func_decl(func),
            Decl::Type(spec) => {
                check_ident(&spec.name, "type declaration")?;
                self.w("type ");
                self.w(&spec.name);
                self.w(" ");
                self.expr(&spec.ty)
            }
            Decl::Var(spec) => self.var_spec(spec),
        }
    }

    fn import_decl(&mut self, decl: &ImportDecl) -> RenderResult<()> {
        if decl.specs.is_empty() {
            return Ok(());
        }

        if decl.grouped {
            self.w("import (\n");
            for spec in &decl.specs {
                self.import_spec(spec)?;
                self.nl();
            }
            self.w(")");
            return Ok(());
        }

        match decl.specs.as_slice() {
            [spec] => {
                self.w("import ");
                self.import_spec(spec)
            }
            specs => Err(RenderError::UngroupedImport { count: specs.len() }),
        }
    }

    fn import_spec(&mut self, spec: &ImportSpec) -> RenderResult<()> {
        if spec.path.is_empty() {
            return Err(RenderError::EmptyImportPath);
        }
        if let Some(alias) = &spec.alias {
            if alias != "_" {
                check_ident(alias, "import alias")?;
            }
            self.w(alias);
            self.w(" ");
        }
        self.w("\"");
        self.w(&spec.path);
        self.w("\"");
        Ok(())
    }

    fn func_decl(&mut self, func: &FuncDecl) -> RenderResult<()> {
        check_ident(&func.name, "function name")?;

        self.w("func ");
        if let Some(recv) = &func.recv {
            self.w("(");
            self.field(recv)?;
            self.w(") ");
        }
        self.w(&func.name);
        self.signature(&func.ty)?;
        self.w(" ");
        self.block(&func.body)
    }

    fn var_spec(&mut self, spec: &VarSpec) -> RenderResult<()> {
        self.w("var ");
        self.names(&spec.names, "var declaration")?;
        if let Some(ty) = &spec.ty {
            self.w(" ");
            self.expr(ty)?;
        }
        if !spec.values.is_empty() {
            check_arity(spec.names.len(), spec.values.len())?;
            self.w(" = ");
            self.expr_list(&spec.values, 1)?;
        }
        Ok(())
    }

    /// `(params) results`
    fn signature(&mut self, ty: &FuncType) -> RenderResult<()> {
        self.w("(");
        self.field_list(&ty.params)?;
        self.w(")");

        match ty.results.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                self.w(" ");
                self.expr(&single.ty)?;
            }
            results => {
                self.w(" (");
                self.field_list(results)?;
                self.w(")");
            }
        }
        Ok(())
    }

    fn field_list(&mut self, fields: &[Field]) -> RenderResult<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.field(field)?;
        }
        Ok(())
    }

    fn field(&mut self, field: &Field) -> RenderResult<()> {
        if !field.names.is_empty() {
            self.names(&field.names, "parameter")?;
            self.w(" ");
        }
        self.expr(&field.ty)
    }

    fn names(&mut self, names: &[String], context: &'static str) -> RenderResult<()> {
        if names.is_empty() {
            return Err(RenderError::EmptyIdentifier { context });
        }
        for (i, name) in names.iter().enumerate() {
            check_ident(name, context)?;
            if i > 0 {
                self.w(", ");
            }
            self.w(name);
        }
        Ok(())
    }

    // ── statements ───────────────────────────────────────────────────────────

    fn block(&mut self, block: &Block) -> RenderResult<()> {
        if block.is_empty() {
            self.w("{}");
            return Ok(());
        }

        self.w("{\n");
        for stmt in &block.stmts {
            self.stmt(stmt)?;
            self.nl();
        }
        self.w("}");
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> RenderResult<()> {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::If(if_stmt) => self.if_stmt(if_stmt),
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                self.w("for ");
                match (init, cond, post) {
                    (None, None, None) => {}
                    (None, Some(cond), None) => {
                        self.expr(cond)?;
                        self.w(" ");
                    }
                    _ => {
                        if let Some(init) = init {
                            self.stmt(init)?;
                        }
                        self.w("; ");
                        if let Some(cond) = cond {
                            self.expr(cond)?;
                        }
                        self.w("; ");
                        if let Some(post) = post {
                            self.stmt(post)?;
                        }
                        self.w(" ");
                    }
                }
                self.block(body)
            }
            Stmt::Range {
                key,
                value,
                define,
                over,
                body,
            } => {
                self.w("for ");
                match (key, value) {
                    (None, Some(_)) => return Err(RenderError::RangeValueWithoutKey),
                    (None, None) => {}
                    (Some(key), value) => {
                        self.expr(key)?;
                        if let Some(value) = value {
                            self.w(", ");
                            self.expr(value)?;
                        }
                        self.w(if *define { " := " } else { " = " });
                    }
                }
                self.w("range ");
                self.expr(over)?;
                self.w(" ");
                self.block(body)
            }
            Stmt::Assign { lhs, op, rhs } => {
                if lhs.is_empty() || rhs.is_empty() {
                    return Err(RenderError::AssignmentArity {
                        lhs: lhs.len(),
                        rhs: rhs.len(),
                    });
                }
                check_arity(lhs.len(), rhs.len())?;
                self.expr_list(lhs, 1)?;
                self.w(" ");
                self.w(op.as_str());
                self.w(" ");
                self.expr_list(rhs, 1)
            }
            Stmt::Return(values) => {
                self.w("return");
                if !values.is_empty() {
                    self.w(" ");
                    self.expr_list(values, 1)?;
                }
                Ok(())
            }
            Stmt::Expr(x) => self.expr(x),
            Stmt::Defer(x) => {
                self.w("defer ");
                self.expr(x)
            }
            Stmt::Go(x) => {
                self.w("go ");
                self.expr(x)
            }
            Stmt::Decl(spec) => self.var_spec(spec),
            Stmt::IncDec { x, inc } => {
                self.expr(x)?;
                self.w(if *inc { "++" } else { "--" });
                Ok(())
            }
            Stmt::Branch(kind) => {
                self.w(kind.as_str());
                Ok(())
            }
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) -> RenderResult<()> {
        self.w("if ");
        if let Some(init) = &stmt.init {
            self.stmt(init)?;
            self.w("; ");
        }
        self.expr(&stmt.cond)?;
        self.w(" ");
        self.block(&stmt.body)?;

        if let Some(els) = &stmt.els {
            self.w(" else ");
            match els.as_ref() {
                Stmt::If(nested) => self.if_stmt(nested)?,
                Stmt::Block(block) => self.block(block)?,
                other => self.block(&Block::new(vec![other.clone()]))?,
            }
        }
        Ok(())
    }

    // ── expressions ──────────────────────────────────────────────────────────

    fn expr(&mut self, x: &Expr) -> RenderResult<()> {
        self.expr_at(x, 1)
    }

    fn expr_list(&mut self, list: &[Expr], depth: usize) -> RenderResult<()> {
        for (i, x) in list.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.expr_at(x, depth)?;
        }
        Ok(())
    }

    /// `depth` grows inside multi-argument calls, where gofmt tightens
    /// binary expressions.
    fn expr_at(&mut self, x: &Expr, depth: usize) -> RenderResult<()> {
        match x {
            Expr::Ident(name) => {
                check_ident(name, "identifier")?;
                self.w(name);
            }
            Expr::Selector { x, sel } => {
                self.operand(x, depth)?;
                check_ident(sel, "selector")?;
                self.w(".");
                self.w(sel);
            }
            Expr::Call { fun, args } => {
                self.operand(fun, depth)?;
                self.w("(");
                let depth = if args.len() > 1 { depth + 1 } else { depth };
                self.expr_list(args, depth)?;
                self.w(")");
            }
            Expr::Composite { ty, elts } => {
                if let Some(ty) = ty {
                    self.expr_at(ty, depth)?;
                }
                self.composite_body(elts)?;
            }
            Expr::BasicLit(lit) => self.w(&lit.value),
            Expr::KeyValue { .. } => return Err(RenderError::KeyValueOutsideComposite),
            Expr::Binary { .. } => self.binary(x, cutoff(x, depth), depth)?,
            Expr::Unary { op, x } => {
                self.w(op.as_str());
                self.operand(x, depth)?;
            }
            Expr::Star(x) => {
                self.w("*");
                self.operand(x, depth)?;
            }
            Expr::Index { x, index } => {
                self.operand(x, depth)?;
                self.w("[");
                self.expr_at(index, depth + 1)?;
                self.w("]");
            }
            Expr::FuncLit { ty, body } => {
                self.w("func");
                self.signature(ty)?;
                self.w(" ");
                self.block(body)?;
            }
            Expr::Array(elem) => {
                self.w("[]");
                self.expr_at(elem, depth)?;
            }
            Expr::Map { key, value } => {
                self.w("map[");
                self.expr_at(key, depth)?;
                self.w("]");
                self.expr_at(value, depth)?;
            }
            Expr::Chan(elem) => {
                self.w("chan ");
                self.expr_at(elem, depth)?;
            }
            Expr::Func(ty) => {
                self.w("func");
                self.signature(ty)?;
            }
            Expr::Struct(fields) => self.struct_type(fields)?,
        }
        Ok(())
    }

    /// Primary-expression position: binary operands need parentheses.
    fn operand(&mut self, x: &Expr, depth: usize) -> RenderResult<()> {
        if matches!(x, Expr::Binary { .. }) {
            self.w("(");
            self.expr_at(x, depth)?;
            self.w(")");
            Ok(())
        } else {
            self.expr_at(x, depth)
        }
    }

    fn binary(&mut self, x: &Expr, cutoff: u8, depth: usize) -> RenderResult<()> {
        let Expr::Binary { x: lhs, op, y: rhs } = x else {
            return self.expr_at(x, depth);
        };
        let prec = op.precedence();

        self.binary_operand(lhs, prec, false, cutoff, depth)?;
        if prec < cutoff {
            self.w(" ");
            self.w(op.as_str());
            self.w(" ");
        } else {
            self.w(op.as_str());
        }
        self.binary_operand(rhs, prec, true, cutoff, depth)
    }

    fn binary_operand(
        &mut self,
        x: &Expr,
        parent: u8,
        right: bool,
        cutoff: u8,
        depth: usize,
    ) -> RenderResult<()> {
        if !matches!(x, Expr::Binary { .. }) {
            return self.expr_at(x, depth);
        }

        if needs_parens(x, parent, right) {
            self.w("(");
            self.binary(x, self::cutoff(x, depth), depth)?;
            self.w(")");
            Ok(())
        } else {
            self.binary(x, cutoff, depth)
        }
    }

    /// `{a, b}` on one line, or one element per line when more than one
    /// element is a key-value pair.
    fn composite_body(&mut self, elts: &[Expr]) -> RenderResult<()> {
        if elts.is_empty() {
            self.w("{}");
            return Ok(());
        }

        let pairs = elts
            .iter()
            .filter(|e| matches!(e, Expr::KeyValue { .. }))
            .count();

        if pairs > 1 {
            self.w("{\n");
            for elt in elts {
                self.element(elt, true)?;
                self.w(",\n");
            }
        } else {
            self.w("{");
            for (i, elt) in elts.iter().enumerate() {
                if i > 0 {
                    self.w(", ");
                }
                self.element(elt, false)?;
            }
        }
        self.w("}");
        Ok(())
    }

    fn element(&mut self, elt: &Expr, aligned: bool) -> RenderResult<()> {
        match elt {
            Expr::KeyValue { key, value } => {
                self.expr(key)?;
                self.w(":");
                if aligned {
                    self.out.push(CELL);
                } else {
                    self.w(" ");
                }
                self.expr(value)
            }
            other => self.expr(other),
        }
    }

    fn struct_type(&mut self, fields: &[Field]) -> RenderResult<()> {
        if fields.is_empty() {
            self.w("struct{}");
            return Ok(());
        }

        self.w("struct {\n");
        for field in fields {
            if !field.names.is_empty() {
                self.names(&field.names, "struct field")?;
                self.out.push(CELL);
            }
            self.expr(&field.ty)?;
            if let Some(tag) = &field.tag {
                self.out.push(CELL);
                self.w("`");
                self.w(tag);
                self.w("`");
            }
            self.nl();
        }
        self.w("}");
        Ok(())
    }
}

fn check_arity(lhs: usize, rhs: usize) -> RenderResult<()> {
    if lhs == rhs || rhs == 1 {
        Ok(())
    } else {
        Err(RenderError::AssignmentArity { lhs, rhs })
    }
}

/// Precedence at or above which binary operators are printed without
/// surrounding blanks, following gofmt.
fn cutoff(x: &Expr, depth: usize) -> u8 {
    let (has4, has5) = mixed_precedence(x);
    match (has4 && has5, depth) {
        (true, 1) => 5,
        (false, 1) => 6,
        _ => 4,
    }
}

/// Which of the additive (4) and multiplicative (5) levels occur in `x`.
/// Operands printed inside parentheses are atomic and do not count.
fn mixed_precedence(x: &Expr) -> (bool, bool) {
    let Expr::Binary { x: lhs, op, y: rhs } = x else {
        return (false, false);
    };
    let prec = op.precedence();
    let side = |operand: &Expr, right: bool| {
        if needs_parens(operand, prec, right) {
            (false, false)
        } else {
            mixed_precedence(operand)
        }
    };
    let (l4, l5) = side(lhs, false);
    let (r4, r5) = side(rhs, true);
    (l4 || r4 || prec == 4, l5 || r5 || prec == 5)
}

/// A binary operand binding looser than its parent is printed in parentheses.
fn needs_parens(operand: &Expr, parent: u8, right: bool) -> bool {
    if !matches!(operand, Expr::Binary { .. }) {
        return false;
    }
    let prec = operand.precedence();
    prec < parent || (right && prec == parent)
}
