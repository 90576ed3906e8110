//! Expression nodes.

use crate::jsx::{JsxElement, JsxFragment};
use crate::pattern::Pattern;
use crate::stmt::Stmt;
use crate::type_ann::{TypeAnn, TypeParam};
use esc_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// A literal value as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
    BigInt(String),
    Regex { pattern: String, flags: String },
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Num(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "\"{s}\""),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
            Literal::Undefined => write!(f, "undefined"),
            Literal::BigInt(v) => write!(f, "{v}n"),
            Literal::Regex { pattern, flags } => write!(f, "/{pattern}/{flags}"),
        }
    }
}

/// An identifier reference, optionally qualified by a namespace path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    /// Dotted namespace qualifier (`foo.bar` in `foo.bar.baz`), if any.
    pub namespace: Option<String>,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            namespace: None,
            span,
        }
    }

    /// The full dotted name, including the namespace qualifier.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Minus,
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// The JavaScript spelling of this operator.
    #[must_use]
    pub fn js_text(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "===",
            BinaryOp::NotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Comparison and logical operators produce `boolean`.
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// A function parameter: pattern plus optional annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncParam {
    pub pattern: Pattern,
    pub type_ann: Option<TypeAnn>,
    pub optional: bool,
}

/// A function body: a block or a bare expression (arrow shorthand).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FuncBody {
    Block(Block),
    Expr(Box<Expr>),
}

/// A block of statements. The value of a block is the value of its
/// trailing expression statement, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// One arm of a `match` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub span: Span,
}

/// Object literal element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjLitElem {
    KeyValue { key: String, value: Expr, span: Span },
    Shorthand { key: String, span: Span },
    Spread { arg: Expr, span: Span },
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Lit {
        lit: Literal,
        span: Span,
    },
    Ident(Ident),
    Member {
        obj: Box<Expr>,
        prop: String,
        opt_chain: bool,
        span: Span,
    },
    Index {
        obj: Box<Expr>,
        index: Box<Expr>,
        opt_chain: bool,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        opt_chain: bool,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Func {
        type_params: Vec<TypeParam>,
        params: Vec<FuncParam>,
        body: FuncBody,
        return_type: Option<TypeAnn>,
        throws: Option<TypeAnn>,
        is_async: bool,
        span: Span,
    },
    Tuple {
        elems: Vec<Expr>,
        span: Span,
    },
    /// Spread element inside a tuple literal or call arguments.
    Spread {
        arg: Box<Expr>,
        span: Span,
    },
    Object {
        elems: Vec<ObjLitElem>,
        span: Span,
    },
    If {
        cond: Box<Expr>,
        consequent: Block,
        alternate: Option<Box<Expr>>,
        span: Span,
    },
    Match {
        target: Box<Expr>,
        cases: Vec<MatchCase>,
        span: Span,
    },
    Await {
        arg: Box<Expr>,
        span: Span,
    },
    Throw {
        arg: Box<Expr>,
        span: Span,
    },
    /// A `do { ... }` block expression.
    Do {
        body: Block,
        span: Span,
    },
    JsxElement(JsxElement),
    JsxFragment(JsxFragment),
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Lit { span, .. }
            | Expr::Member { span, .. }
            | Expr::Index { span, .. }
            | Expr::Call { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Func { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::Spread { span, .. }
            | Expr::Object { span, .. }
            | Expr::If { span, .. }
            | Expr::Match { span, .. }
            | Expr::Await { span, .. }
            | Expr::Throw { span, .. }
            | Expr::Do { span, .. } => *span,
            Expr::Ident(ident) => ident.span,
            Expr::JsxElement(elem) => elem.span,
            Expr::JsxFragment(frag) => frag.span,
        }
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}
