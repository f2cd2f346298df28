//! Syntax tree for footprint scripts.
//!
//! Every node carries the [`Span`] it was parsed from so the interpreter can
//! point runtime faults at source text.

use std::fmt;

use crate::span::{Span, Spanned};

/// A parsed script: top-level functions and constants in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub items: Vec<Item>,
}

impl Script {
    /// Returns the function named `name`, if defined
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.items.iter().find_map(|item| match item {
            Item::Function(function) if function.name.inner() == name => Some(function),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            Item::Let { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDef),
    Let {
        name: Spanned<String>,
        value: Expr,
    },
}

impl Item {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Self::Function(function) => &function.name,
            Self::Let { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Spanned<String>,
    pub params: Vec<Spanned<String>>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

pub type Stmt = Spanned<StmtKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let {
        name: Spanned<String>,
        value: Expr,
    },
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    Expr(Expr),
    Return(Option<Expr>),
    /// `if` / `else if` chain; branches are tried in order.
    If {
        branches: Vec<(Expr, Block)>,
        otherwise: Option<Block>,
    },
    For {
        var: Spanned<String>,
        iterable: Expr,
        body: Block,
    },
}

pub type Expr = Spanned<ExprKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Name(String),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: Spanned<String>,
        args: Vec<Argument>,
    },
    Field {
        object: Box<Expr>,
        field: Spanned<String>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
}

impl ExprKind {
    /// Returns true for expressions that name storage: `x`, `x.f`, `x[i]`
    /// and chains of those rooted at a variable
    pub fn is_place(&self) -> bool {
        let mut current = self;
        loop {
            match current {
                Self::Name(_) => return true,
                Self::Field { object, .. } | Self::Index { object, .. } => {
                    current = object.inner();
                }
                _ => return false,
            }
        }
    }
}

/// A call argument, positional or `name=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Spanned<String>>,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Assignment operators; compound forms apply the matching [`BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
        }
    }
}
