use super::{Block, Expr};

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Import(ImportDecl),
    Func(FuncDecl),
    Type(TypeSpec),
    Var(VarSpec),
}

/// An import declaration.
///
/// `grouped` selects `import ( ... )` over the single-line form. The builder
/// decides it from the number of import specs; the printer only honours it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: String,
    /// `_` for blank imports, or a local package name.
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    pub recv: Option<Field>,
    pub ty: FuncType,
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// A parameter, result or struct field. `names` is empty for anonymous ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: Expr,
    /// Raw struct tag text without backquotes.
    pub tag: Option<String>,
}

/// `type Name <ty>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    pub ty: Expr,
}

/// `var names type = values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub names: Vec<String>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}
