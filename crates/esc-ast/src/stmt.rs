//! Statement nodes.

use crate::decl::Decl;
use crate::expr::{Block, Expr};
use esc_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// One name imported by an import statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
    pub span: Span,
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr {
        expr: Expr,
        span: Span,
    },
    Decl(Decl),
    Return {
        arg: Option<Expr>,
        span: Span,
    },
    Block(Block),
    If {
        cond: Expr,
        consequent: Block,
        alternate: Option<Block>,
        span: Span,
    },
    Throw {
        arg: Expr,
        span: Span,
    },
    Import {
        specifiers: Vec<ImportSpecifier>,
        path: String,
        span: Span,
    },
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Expr { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Import { span, .. } => *span,
            Stmt::Decl(decl) => decl.span(),
            Stmt::Block(block) => block.span,
        }
    }
}
