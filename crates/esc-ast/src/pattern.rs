//! Pattern nodes, shared by declarations, function parameters and `match`.

use crate::expr::{Expr, Literal};
use crate::type_ann::TypeAnn;
use esc_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// Object pattern element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjPatElem {
    KeyValue {
        key: String,
        value: Pattern,
        default: Option<Expr>,
        span: Span,
    },
    Shorthand {
        key: String,
        default: Option<Expr>,
        span: Span,
    },
    Rest {
        inner: Pattern,
        span: Span,
    },
}

/// Pattern nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Ident {
        name: String,
        default: Option<Box<Expr>>,
        type_ann: Option<TypeAnn>,
        span: Span,
    },
    Lit {
        lit: Literal,
        span: Span,
    },
    Object {
        elems: Vec<ObjPatElem>,
        span: Span,
    },
    Tuple {
        elems: Vec<Pattern>,
        span: Span,
    },
    Rest {
        inner: Box<Pattern>,
        span: Span,
    },
    Wildcard {
        span: Span,
    },
    /// A user-defined extractor: `Point(x, y)` in pattern position.
    Extractor {
        name: String,
        args: Vec<Pattern>,
        span: Span,
    },
}

impl Pattern {
    /// Collect the names this pattern binds, in source order.
    pub fn binding_names(&self, out: &mut Vec<String>) {
        match self {
            Pattern::Ident { name, .. } => out.push(name.clone()),
            Pattern::Lit { .. } | Pattern::Wildcard { .. } => {}
            Pattern::Object { elems, .. } => {
                for elem in elems {
                    match elem {
                        ObjPatElem::KeyValue { value, .. } => value.binding_names(out),
                        ObjPatElem::Shorthand { key, .. } => out.push(key.clone()),
                        ObjPatElem::Rest { inner, .. } => inner.binding_names(out),
                    }
                }
            }
            Pattern::Tuple { elems, .. } => {
                for elem in elems {
                    elem.binding_names(out);
                }
            }
            Pattern::Rest { inner, .. } => inner.binding_names(out),
            Pattern::Extractor { args, .. } => {
                for arg in args {
                    arg.binding_names(out);
                }
            }
        }
    }

    /// A pattern is irrefutable when it matches every value of its type:
    /// plain identifiers, wildcards, and tuples/objects of the same.
    #[must_use]
    pub fn is_irrefutable(&self) -> bool {
        match self {
            Pattern::Ident { .. } | Pattern::Wildcard { .. } => true,
            Pattern::Lit { .. } | Pattern::Extractor { .. } => false,
            Pattern::Tuple { elems, .. } => elems.iter().all(|e| e.is_irrefutable()),
            Pattern::Rest { inner, .. } => inner.is_irrefutable(),
            Pattern::Object { elems, .. } => elems.iter().all(|e| match e {
                ObjPatElem::KeyValue { value, .. } => value.is_irrefutable(),
                ObjPatElem::Shorthand { .. } => true,
                ObjPatElem::Rest { inner, .. } => inner.is_irrefutable(),
            }),
        }
    }
}

impl Spanned for Pattern {
    fn span(&self) -> Span {
        match self {
            Pattern::Ident { span, .. }
            | Pattern::Lit { span, .. }
            | Pattern::Object { span, .. }
            | Pattern::Tuple { span, .. }
            | Pattern::Rest { span, .. }
            | Pattern::Wildcard { span }
            | Pattern::Extractor { span, .. } => *span,
        }
    }
}
