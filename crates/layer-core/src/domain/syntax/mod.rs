//! Go syntax model.
//!
//! A small owned tree covering the subset of Go the service generators emit.
//! Nodes carry no behaviour: they are built by [`crate::domain::builder`],
//! compared structurally in tests, and walked by the renderer adapter.
//!
//! The tree is a plain ownership hierarchy (`Box`/`Vec`), so a [`SourceFile`]
//! exclusively owns every node reachable from it. There is no sharing and
//! there are no cycles.

mod decl;
mod expr;
mod stmt;

pub use decl::{Decl, Field, FuncDecl, FuncType, ImportDecl, ImportSpec, TypeSpec, VarSpec};
pub use expr::{BasicLit, BinaryOp, Expr, LitKind, UnaryOp};
pub use stmt::{AssignOp, Block, BranchKind, IfStmt, Stmt};

/// One Go source file: a package clause followed by top-level declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            decls: Vec::new(),
        }
    }

    pub fn with_decl(mut self, decl: Decl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Import paths declared in this file, in declaration order.
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.decls
            .iter()
            .filter_map(|d| match d {
                Decl::Import(imports) => Some(imports.specs.iter()),
                _ => None,
            })
            .flatten()
            .map(|spec| spec.path.as_str())
    }

    /// Names of top-level functions and methods.
    pub fn func_names(&self) -> impl Iterator<Item = &str> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f.name.as_str()),
            _ => None,
        })
    }

    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.decls.iter().find_map(|d| match d {
            Decl::Func(f) if f.name == name => Some(f),
            _ => None,
        })
    }
}
