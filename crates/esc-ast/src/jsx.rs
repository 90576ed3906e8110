//! JSX nodes.

use crate::expr::{Expr, Literal};
use esc_common::Span;
use serde::{Deserialize, Serialize};

/// The value of a JSX attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttrValue {
    Lit(Literal),
    Expr(Expr),
}

/// One attribute on a JSX element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttr {
    pub name: String,
    /// A bare attribute (`<input disabled />`) has no value and means `true`.
    pub value: Option<JsxAttrValue>,
    pub span: Span,
}

/// A child of a JSX element or fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxChild {
    Text { text: String, span: Span },
    Expr { expr: Expr, span: Span },
    Element(JsxElement),
    Fragment(JsxFragment),
}

/// `<Tag attr=...>children</Tag>` or `<tag ... />`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    /// The element tag: an identifier, or a dotted member path.
    pub tag: Box<Expr>,
    pub attrs: Vec<JsxAttr>,
    pub children: Vec<JsxChild>,
    pub span: Span,
}

impl JsxElement {
    /// Intrinsic elements are simple identifiers starting with a lowercase
    /// letter; they lower to string-literal element types.
    #[must_use]
    pub fn is_intrinsic(&self) -> bool {
        match self.tag.as_ref() {
            Expr::Ident(ident) if ident.namespace.is_none() => ident
                .name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase()),
            _ => false,
        }
    }
}

/// `<>children</>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxFragment {
    pub children: Vec<JsxChild>,
    pub span: Span,
}
