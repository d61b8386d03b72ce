use super::{Expr, VarSpec};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    If(IfStmt),
    /// `for init; cond; post { }`; an infinite loop when all three are absent.
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    /// `for key, value := range over { }`
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        over: Expr,
        body: Block,
    },
    Assign {
        lhs: Vec<Expr>,
        op: AssignOp,
        rhs: Vec<Expr>,
    },
    Return(Vec<Expr>),
    Expr(Expr),
    Defer(Expr),
    Go(Expr),
    /// `var name type = value` inside a function body.
    Decl(VarSpec),
    /// `x++` / `x--`
    IncDec {
        x: Expr,
        inc: bool,
    },
    Branch(BranchKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: Block,
    /// Either a [`Stmt::Block`] or a nested [`Stmt::If`].
    pub els: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
}

impl AssignOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Define => ":=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
}

impl BranchKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
        }
    }
}
