//! The JavaScript AST: a conservative subset sufficient for emission.
//!
//! Every node carries an optional `source` back-pointer into the source
//! AST (set by the builder) and an optional generated `span` (backfilled
//! by the printer). Nodes with both produce source-map segments.

use esc_common::Span;

/// A generated-text span: 0-based line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// Back-pointer from a generated node into the source ASTs: the owning
/// source file's stable id (the `srcIndex` of emitted source maps) plus
/// the span within that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    pub file: u32,
    pub span: Span,
}

/// Binary operators in emitted JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsBinOp {
    // `===` / `!==`
    StrictEq,
    StrictNotEq,
    // Loose `!=`, used for `x != null` nullish guards
    LooseNotEq,
    LooseEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    In,
    InstanceOf,
}

impl JsBinOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JsBinOp::StrictEq => "===",
            JsBinOp::StrictNotEq => "!==",
            JsBinOp::LooseNotEq => "!=",
            JsBinOp::LooseEq => "==",
            JsBinOp::Lt => "<",
            JsBinOp::LtEq => "<=",
            JsBinOp::Gt => ">",
            JsBinOp::GtEq => ">=",
            JsBinOp::Add => "+",
            JsBinOp::Sub => "-",
            JsBinOp::Mul => "*",
            JsBinOp::Div => "/",
            JsBinOp::Mod => "%",
            JsBinOp::And => "&&",
            JsBinOp::Or => "||",
            JsBinOp::In => "in",
            JsBinOp::InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsUnaryOp {
    Minus,
    Not,
    TypeOf,
}

impl JsUnaryOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JsUnaryOp::Minus => "-",
            JsUnaryOp::Not => "!",
            JsUnaryOp::TypeOf => "typeof ",
        }
    }
}

/// A property in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum JsObjProp {
    KeyValue { key: String, value: JsExpr },
    Shorthand(String),
    Spread(JsExpr),
}

/// A binding pattern in emitted JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub enum JsPat {
    Ident(String),
    Array {
        /// `None` elements are elisions (`[, x]`).
        elems: Vec<Option<JsPat>>,
        rest: Option<Box<JsPat>>,
    },
    Object {
        props: Vec<JsObjPatProp>,
        rest: Option<Box<JsPat>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsObjPatProp {
    Shorthand(String),
    KeyValue { key: String, value: JsPat },
}

/// Expression node: kind plus span bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct JsExpr {
    pub kind: JsExprKind,
    /// Source-side position this expression was lowered from. The file id
    /// is stamped by the builder once the owning declaration is known.
    pub source: Option<SourceRef>,
    /// Generated span, backfilled by the printer.
    pub span: Option<GenSpan>,
}

impl JsExpr {
    #[must_use]
    pub fn new(kind: JsExprKind) -> Self {
        JsExpr {
            kind,
            source: None,
            span: None,
        }
    }

    #[must_use]
    pub fn with_source(kind: JsExprKind, source: Span) -> Self {
        JsExpr {
            kind,
            source: if source.is_dummy() {
                None
            } else {
                Some(SourceRef {
                    file: 0,
                    span: source,
                })
            },
            span: None,
        }
    }

    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        JsExpr::new(JsExprKind::Ident(name.into()))
    }

    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        JsExpr::new(JsExprKind::Str(value.into()))
    }

    #[must_use]
    pub fn num(value: f64) -> Self {
        JsExpr::new(JsExprKind::Num(value))
    }

    #[must_use]
    pub fn undefined() -> Self {
        JsExpr::new(JsExprKind::Ident("undefined".to_string()))
    }

    #[must_use]
    pub fn binary(op: JsBinOp, left: JsExpr, right: JsExpr) -> Self {
        JsExpr::new(JsExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    #[must_use]
    pub fn member(obj: JsExpr, prop: impl Into<String>) -> Self {
        JsExpr::new(JsExprKind::Member {
            obj: Box::new(obj),
            prop: prop.into(),
            opt_chain: false,
        })
    }

    #[must_use]
    pub fn index(obj: JsExpr, index: JsExpr) -> Self {
        JsExpr::new(JsExprKind::Index {
            obj: Box::new(obj),
            index: Box::new(index),
        })
    }

    #[must_use]
    pub fn call(callee: JsExpr, args: Vec<JsExpr>) -> Self {
        JsExpr::new(JsExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsExprKind {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    /// Verbatim text: bigint and regex literals.
    Raw(String),
    Ident(String),
    Member {
        obj: Box<JsExpr>,
        prop: String,
        opt_chain: bool,
    },
    Index {
        obj: Box<JsExpr>,
        index: Box<JsExpr>,
    },
    Call {
        callee: Box<JsExpr>,
        args: Vec<JsExpr>,
    },
    New {
        callee: Box<JsExpr>,
        args: Vec<JsExpr>,
    },
    Unary {
        op: JsUnaryOp,
        arg: Box<JsExpr>,
    },
    Binary {
        op: JsBinOp,
        left: Box<JsExpr>,
        right: Box<JsExpr>,
    },
    Assign {
        target: Box<JsExpr>,
        value: Box<JsExpr>,
    },
    Cond {
        test: Box<JsExpr>,
        cons: Box<JsExpr>,
        alt: Box<JsExpr>,
    },
    Arrow {
        params: Vec<JsPat>,
        body: Vec<JsStmt>,
        is_async: bool,
    },
    Await(Box<JsExpr>),
    Spread(Box<JsExpr>),
    Array {
        elems: Vec<JsExpr>,
    },
    Object {
        props: Vec<JsObjProp>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsDeclKind {
    Const,
    Let,
    Var,
}

impl JsDeclKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JsDeclKind::Const => "const",
            JsDeclKind::Let => "let",
            JsDeclKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsDeclarator {
    pub pattern: JsPat,
    pub init: Option<JsExpr>,
}

/// Statement node: kind plus span bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct JsStmt {
    pub kind: JsStmtKind,
    pub source: Option<SourceRef>,
    pub span: Option<GenSpan>,
}

impl JsStmt {
    #[must_use]
    pub fn new(kind: JsStmtKind) -> Self {
        JsStmt {
            kind,
            source: None,
            span: None,
        }
    }

    #[must_use]
    pub fn with_source(kind: JsStmtKind, source: Span) -> Self {
        JsStmt {
            kind,
            source: if source.is_dummy() {
                None
            } else {
                Some(SourceRef {
                    file: 0,
                    span: source,
                })
            },
            span: None,
        }
    }

    /// `const <pat> = <init>;`
    #[must_use]
    pub fn const_decl(pattern: JsPat, init: JsExpr) -> Self {
        JsStmt::new(JsStmtKind::VarDecl {
            kind: JsDeclKind::Const,
            declarators: vec![JsDeclarator {
                pattern,
                init: Some(init),
            }],
            export: false,
        })
    }

    #[must_use]
    pub fn expr(expr: JsExpr) -> Self {
        JsStmt::new(JsStmtKind::Expr(expr))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsStmtKind {
    Expr(JsExpr),
    VarDecl {
        kind: JsDeclKind,
        declarators: Vec<JsDeclarator>,
        export: bool,
    },
    Func {
        name: String,
        params: Vec<JsPat>,
        body: Vec<JsStmt>,
        is_async: bool,
        export: bool,
    },
    Return(Option<JsExpr>),
    If {
        test: JsExpr,
        consequent: Vec<JsStmt>,
        alternate: Option<Vec<JsStmt>>,
    },
    Throw(JsExpr),
    Block(Vec<JsStmt>),
    Import {
        /// `(imported, local)` pairs; `local == None` imports unaliased.
        specifiers: Vec<(String, Option<String>)>,
        path: String,
    },
}

/// A complete emitted module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsModule {
    pub stmts: Vec<JsStmt>,
}

/// Stamp the source-file id onto a statement subtree. The builder calls
/// this once per lowered declaration, after the owning module item (and
/// therefore its `Source.id`) is known.
pub fn stamp_source_file(stmt: &mut JsStmt, file: u32) {
    if let Some(source) = &mut stmt.source {
        source.file = file;
    }
    match &mut stmt.kind {
        JsStmtKind::Expr(expr) | JsStmtKind::Throw(expr) => stamp_expr(expr, file),
        JsStmtKind::VarDecl { declarators, .. } => {
            for declarator in declarators {
                if let Some(init) = &mut declarator.init {
                    stamp_expr(init, file);
                }
            }
        }
        JsStmtKind::Func { body, .. } | JsStmtKind::Block(body) => {
            for stmt in body {
                stamp_source_file(stmt, file);
            }
        }
        JsStmtKind::Return(arg) => {
            if let Some(arg) = arg {
                stamp_expr(arg, file);
            }
        }
        JsStmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            stamp_expr(test, file);
            for stmt in consequent {
                stamp_source_file(stmt, file);
            }
            if let Some(alternate) = alternate {
                for stmt in alternate {
                    stamp_source_file(stmt, file);
                }
            }
        }
        JsStmtKind::Import { .. } => {}
    }
}

fn stamp_expr(expr: &mut JsExpr, file: u32) {
    if let Some(source) = &mut expr.source {
        source.file = file;
    }
    match &mut expr.kind {
        JsExprKind::Num(_)
        | JsExprKind::Str(_)
        | JsExprKind::Bool(_)
        | JsExprKind::Null
        | JsExprKind::Raw(_)
        | JsExprKind::Ident(_) => {}
        JsExprKind::Member { obj, .. } => stamp_expr(obj, file),
        JsExprKind::Index { obj, index } => {
            stamp_expr(obj, file);
            stamp_expr(index, file);
        }
        JsExprKind::Call { callee, args } | JsExprKind::New { callee, args } => {
            stamp_expr(callee, file);
            for arg in args {
                stamp_expr(arg, file);
            }
        }
        JsExprKind::Unary { arg, .. } | JsExprKind::Await(arg) | JsExprKind::Spread(arg) => {
            stamp_expr(arg, file)
        }
        JsExprKind::Binary { left, right, .. } => {
            stamp_expr(left, file);
            stamp_expr(right, file);
        }
        JsExprKind::Assign { target, value } => {
            stamp_expr(target, file);
            stamp_expr(value, file);
        }
        JsExprKind::Cond { test, cons, alt } => {
            stamp_expr(test, file);
            stamp_expr(cons, file);
            stamp_expr(alt, file);
        }
        JsExprKind::Arrow { body, .. } => {
            for stmt in body {
                stamp_source_file(stmt, file);
            }
        }
        JsExprKind::Array { elems } => {
            for elem in elems {
                stamp_expr(elem, file);
            }
        }
        JsExprKind::Object { props } => {
            for prop in props {
                match prop {
                    JsObjProp::KeyValue { value, .. } => stamp_expr(value, file),
                    JsObjProp::Shorthand(_) => {}
                    JsObjProp::Spread(arg) => stamp_expr(arg, file),
                }
            }
        }
    }
}
