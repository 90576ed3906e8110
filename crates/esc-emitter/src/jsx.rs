//! JSX lowering to `jsx-runtime` calls.
//!
//! `<T props>children</T>` lowers to `_jsx(T, { ...props, children })`
//! (or `_jsxs` when there are several children); fragments lower through
//! `_Fragment`. The builder records which helpers were used so a single
//! selective import is prepended to the module.

use crate::builder::{lower_literal, JsBuilder};
use crate::js_ast::{JsExpr, JsExprKind, JsObjProp};
use esc_ast::{JsxAttrValue, JsxChild, JsxElement, JsxFragment};

impl JsBuilder<'_> {
    pub(crate) fn lower_jsx_element(&mut self, elem: &JsxElement) -> JsExpr {
        // Intrinsic elements become string literal element types;
        // component elements keep their identifier or member reference.
        let tag = if elem.is_intrinsic() {
            match elem.tag.as_ref() {
                esc_ast::Expr::Ident(ident) => JsExpr::str(ident.name.clone()),
                _ => unreachable!("intrinsic tags are simple identifiers"),
            }
        } else {
            self.lower_expr(&elem.tag)
        };

        let mut props: Vec<JsObjProp> = elem
            .attrs
            .iter()
            .map(|attr| {
                let value = match &attr.value {
                    Some(JsxAttrValue::Lit(lit)) => lower_literal(lit, attr.span),
                    Some(JsxAttrValue::Expr(expr)) => self.lower_expr(expr),
                    None => JsExpr::new(JsExprKind::Bool(true)),
                };
                JsObjProp::KeyValue {
                    key: attr.name.clone(),
                    value,
                }
            })
            .collect();

        let children = self.lower_jsx_children(&elem.children);
        self.finish_jsx_call(tag, &mut props, children, elem.span)
    }

    pub(crate) fn lower_jsx_fragment(&mut self, frag: &JsxFragment) -> JsExpr {
        self.jsx_uses_fragment = true;
        let tag = JsExpr::ident("_Fragment");
        let mut props = Vec::new();
        let children = self.lower_jsx_children(&frag.children);
        self.finish_jsx_call(tag, &mut props, children, frag.span)
    }

    fn lower_jsx_children(&mut self, children: &[JsxChild]) -> Vec<JsExpr> {
        let mut out = Vec::new();
        for child in children {
            match child {
                JsxChild::Text { text, .. } => {
                    let collapsed = collapse_whitespace(text);
                    if !collapsed.is_empty() {
                        out.push(JsExpr::str(collapsed));
                    }
                }
                JsxChild::Expr { expr, .. } => out.push(self.lower_expr(expr)),
                JsxChild::Element(elem) => out.push(self.lower_jsx_element(elem)),
                JsxChild::Fragment(frag) => out.push(self.lower_jsx_fragment(frag)),
            }
        }
        out
    }

    fn finish_jsx_call(
        &mut self,
        tag: JsExpr,
        props: &mut Vec<JsObjProp>,
        mut children: Vec<JsExpr>,
        span: esc_common::Span,
    ) -> JsExpr {
        let helper = match children.len() {
            0 | 1 => {
                self.jsx_uses_jsx = true;
                "_jsx"
            }
            _ => {
                self.jsx_uses_jsxs = true;
                "_jsxs"
            }
        };
        match children.len() {
            0 => {}
            1 => props.push(JsObjProp::KeyValue {
                key: "children".to_string(),
                value: children.remove(0),
            }),
            _ => props.push(JsObjProp::KeyValue {
                key: "children".to_string(),
                value: JsExpr::new(JsExprKind::Array { elems: children }),
            }),
        }
        let props_obj = JsExpr::new(JsExprKind::Object {
            props: std::mem::take(props),
        });
        JsExpr::with_source(
            JsExprKind::Call {
                callee: Box::new(JsExpr::ident(helper)),
                args: vec![tag, props_obj],
            },
            span,
        )
    }
}

/// Trim leading/trailing whitespace and collapse internal runs to a
/// single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "tests/jsx_tests.rs"]
mod tests;
