use super::{Block, Field, FuncType};

/// Expressions, including the type expressions used in declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    /// `x.sel`
    Selector {
        x: Box<Expr>,
        sel: String,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `T{elts}`; `ty` is `None` for elided element types inside another literal.
    Composite {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    BasicLit(BasicLit),
    /// `key: value`, valid only as a composite literal element.
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op: BinaryOp,
        y: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    /// `*x`, both the pointer type and the dereference.
    Star(Box<Expr>),
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    FuncLit {
        ty: FuncType,
        body: Block,
    },

    // ── type forms ───────────────────────────────────────────────────────────
    /// `[]elem`
    Array(Box<Expr>),
    /// `map[key]value`
    Map {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// `chan elem`
    Chan(Box<Expr>),
    /// `func(params) results`
    Func(FuncType),
    /// `struct { fields }`
    Struct(Vec<Field>),
}

impl Expr {
    /// Binding strength used by the printer to decide on parentheses.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Literal text exactly as it appears in source, quotes included.
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    String,
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Quo,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Quo => "/",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        }
    }

    /// Go operator precedence (5 binds tightest).
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Mul | Self::Quo => 5,
            Self::Add | Self::Sub => 4,
            Self::Eq | Self::NotEq | Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 3,
            Self::LogicalAnd => 2,
            Self::LogicalOr => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `&x`
    Addr,
    /// `!x`
    Not,
    /// `<-x`
    Recv,
    /// `-x`
    Neg,
}

impl UnaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Addr => "&",
            Self::Not => "!",
            Self::Recv => "<-",
            Self::Neg => "-",
        }
    }
}
