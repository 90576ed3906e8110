//! Pattern lowering: runtime guards plus destructuring bindings.
//!
//! A source pattern against a target expression lowers to three parts:
//! statements that must run before the guard (extractor invocations),
//! boolean checks conjoined left-to-right outermost-first, and the
//! statements that bind the pattern's names once the guard holds.

use crate::builder::{lower_literal, JsBuilder};
use crate::js_ast::{
    JsBinOp, JsExpr, JsExprKind, JsObjPatProp, JsPat, JsStmt, JsUnaryOp,
};
use esc_ast::{Literal, ObjPatElem, Pattern, TypeAnn};
use esc_common::Span;

impl JsBuilder<'_> {
    /// Lower a pattern against a target expression.
    ///
    /// Returns `(pre_stmts, checks, bindings)`.
    pub(crate) fn lower_pattern(
        &mut self,
        pattern: &Pattern,
        target: &JsExpr,
    ) -> (Vec<JsStmt>, Vec<JsExpr>, Vec<JsStmt>) {
        let mut pre = Vec::new();
        let mut checks = Vec::new();
        let mut bindings = Vec::new();
        self.lower_pattern_into(pattern, target, &mut pre, &mut checks, &mut bindings);
        (pre, checks, bindings)
    }

    fn lower_pattern_into(
        &mut self,
        pattern: &Pattern,
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        checks: &mut Vec<JsExpr>,
        bindings: &mut Vec<JsStmt>,
    ) {
        match pattern {
            Pattern::Ident {
                name,
                default,
                type_ann,
                ..
            } => {
                // A primitive annotation narrows at runtime via typeof.
                if let Some(tag) = type_ann.as_ref().and_then(prim_typeof_tag) {
                    checks.push(typeof_check(target.clone(), tag));
                }
                self.declare_local(name);
                let init = match default {
                    Some(default) => {
                        let default = self.lower_expr(default);
                        JsExpr::new(JsExprKind::Cond {
                            test: Box::new(JsExpr::binary(
                                JsBinOp::StrictEq,
                                target.clone(),
                                JsExpr::undefined(),
                            )),
                            cons: Box::new(default),
                            alt: Box::new(target.clone()),
                        })
                    }
                    None => target.clone(),
                };
                bindings.push(JsStmt::const_decl(JsPat::Ident(name.clone()), init));
            }
            Pattern::Lit { lit, span } => {
                checks.push(JsExpr::binary(
                    JsBinOp::StrictEq,
                    target.clone(),
                    lower_literal(lit, *span),
                ));
            }
            Pattern::Wildcard { .. } => {}
            Pattern::Tuple { elems, .. } => {
                self.lower_tuple_pattern(elems, target, pre, checks, bindings);
            }
            Pattern::Object { elems, .. } => {
                self.lower_object_pattern(elems, target, pre, checks, bindings);
            }
            Pattern::Rest { inner, .. } => {
                // A bare rest outside a tuple binds the whole target.
                self.lower_pattern_into(inner, target, pre, checks, bindings);
            }
            Pattern::Extractor { name, args, span } => {
                self.lower_extractor_pattern(name, args, *span, target, pre, checks, bindings);
            }
        }
    }

    fn lower_tuple_pattern(
        &mut self,
        elems: &[Pattern],
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        checks: &mut Vec<JsExpr>,
        bindings: &mut Vec<JsStmt>,
    ) {
        let rest_index = elems
            .iter()
            .position(|elem| matches!(elem, Pattern::Rest { .. }));

        checks.push(not_nullish(target.clone()));
        let length = JsExpr::member(target.clone(), "length");
        match rest_index {
            Some(_) => checks.push(JsExpr::binary(
                JsBinOp::GtEq,
                length,
                JsExpr::num((elems.len() - 1) as f64),
            )),
            None => checks.push(JsExpr::binary(
                JsBinOp::StrictEq,
                length,
                JsExpr::num(elems.len() as f64),
            )),
        }

        // Element checks, left to right, on indexed access. Extractor
        // elements lower fully here so the runtime matcher is invoked
        // exactly once.
        for (index, elem) in elems.iter().enumerate() {
            if matches!(elem, Pattern::Rest { .. }) {
                continue;
            }
            let elem_target = JsExpr::index(target.clone(), JsExpr::num(index as f64));
            if matches!(elem, Pattern::Extractor { .. }) {
                self.lower_pattern_into(elem, &elem_target, pre, checks, bindings);
            } else {
                self.collect_checks_only(elem, &elem_target, pre, checks);
            }
        }

        // Bindings: a single destructuring when every element is simple,
        // per-element recursion otherwise.
        if elems.iter().all(is_simple_binding) {
            let mut names = Vec::new();
            for elem in elems {
                elem.binding_names(&mut names);
            }
            if names.is_empty() {
                return;
            }
            for name in &names {
                self.declare_local(name);
            }
            let mut js_elems: Vec<Option<JsPat>> = Vec::new();
            let mut rest: Option<Box<JsPat>> = None;
            for elem in elems {
                match elem {
                    Pattern::Ident { name, .. } => {
                        js_elems.push(Some(JsPat::Ident(name.clone())))
                    }
                    Pattern::Rest { inner, .. } => {
                        if let Pattern::Ident { name, .. } = inner.as_ref() {
                            rest = Some(Box::new(JsPat::Ident(name.clone())));
                        }
                    }
                    _ => js_elems.push(None),
                }
            }
            bindings.push(JsStmt::const_decl(
                JsPat::Array {
                    elems: js_elems,
                    rest,
                },
                target.clone(),
            ));
            return;
        }

        for (index, elem) in elems.iter().enumerate() {
            match elem {
                Pattern::Rest { inner, .. } => {
                    let slice = JsExpr::call(
                        JsExpr::member(target.clone(), "slice"),
                        vec![JsExpr::num(index as f64)],
                    );
                    self.bind_only(inner, &slice, pre, bindings);
                }
                Pattern::Extractor { .. } => {
                    // Already lowered during the check pass.
                }
                _ => {
                    let elem_target =
                        JsExpr::index(target.clone(), JsExpr::num(index as f64));
                    self.bind_only(elem, &elem_target, pre, bindings);
                }
            }
        }
    }

    fn lower_object_pattern(
        &mut self,
        elems: &[ObjPatElem],
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        checks: &mut Vec<JsExpr>,
        bindings: &mut Vec<JsStmt>,
    ) {
        checks.push(not_nullish(target.clone()));

        for elem in elems {
            match elem {
                ObjPatElem::KeyValue {
                    key,
                    value,
                    default,
                    ..
                } => {
                    if default.is_none() {
                        checks.push(in_check(key, target.clone()));
                    }
                    let prop_target = JsExpr::member(target.clone(), key);
                    if matches!(value, Pattern::Extractor { .. }) {
                        self.lower_pattern_into(value, &prop_target, pre, checks, bindings);
                    } else {
                        self.collect_checks_only(value, &prop_target, pre, checks);
                    }
                }
                ObjPatElem::Shorthand { key, default, .. } => {
                    if default.is_none() {
                        checks.push(in_check(key, target.clone()));
                    }
                }
                ObjPatElem::Rest { .. } => {}
            }
        }

        // Bindings lower to one destructuring statement; nested complex
        // sub-patterns go through a fresh temporary.
        let mut props: Vec<JsObjPatProp> = Vec::new();
        let mut rest: Option<Box<JsPat>> = None;
        let mut nested: Vec<(String, ObjPatElem)> = Vec::new();

        for elem in elems {
            match elem {
                ObjPatElem::Shorthand { key, default, .. } => {
                    self.declare_local(key);
                    match default {
                        // Defaults are rebuilt as conditional bindings to
                        // keep emission uniform with keyed defaults.
                        Some(_) => nested.push((key.clone(), elem.clone())),
                        None => props.push(JsObjPatProp::Shorthand(key.clone())),
                    }
                }
                ObjPatElem::KeyValue { key, value, .. } => match value {
                    Pattern::Ident {
                        name,
                        default: None,
                        ..
                    } => {
                        self.declare_local(name);
                        props.push(JsObjPatProp::KeyValue {
                            key: key.clone(),
                            value: JsPat::Ident(name.clone()),
                        });
                    }
                    Pattern::Wildcard { .. }
                    | Pattern::Lit { .. }
                    | Pattern::Extractor { .. } => {}
                    _ => {
                        let temp = self.fresh_temp();
                        props.push(JsObjPatProp::KeyValue {
                            key: key.clone(),
                            value: JsPat::Ident(temp.clone()),
                        });
                        nested.push((temp, elem.clone()));
                    }
                },
                ObjPatElem::Rest { inner, .. } => {
                    if let Pattern::Ident { name, .. } = inner {
                        self.declare_local(name);
                        rest = Some(Box::new(JsPat::Ident(name.clone())));
                    }
                }
            }
        }

        if !props.is_empty() || rest.is_some() {
            bindings.push(JsStmt::const_decl(
                JsPat::Object { props, rest },
                target.clone(),
            ));
        }

        for (temp, elem) in nested {
            match elem {
                ObjPatElem::KeyValue { value, default, .. } => {
                    let temp_expr = JsExpr::ident(&temp);
                    if let Some(default) = default {
                        let default = self.lower_expr(&default);
                        let value_name = match &value {
                            Pattern::Ident { name, .. } => name.clone(),
                            _ => temp.clone(),
                        };
                        self.declare_local(&value_name);
                        bindings.push(JsStmt::const_decl(
                            JsPat::Ident(value_name),
                            JsExpr::new(JsExprKind::Cond {
                                test: Box::new(JsExpr::binary(
                                    JsBinOp::StrictEq,
                                    temp_expr.clone(),
                                    JsExpr::undefined(),
                                )),
                                cons: Box::new(default),
                                alt: Box::new(temp_expr),
                            }),
                        ));
                    } else {
                        self.bind_only(&value, &temp_expr, pre, bindings);
                    }
                }
                ObjPatElem::Shorthand { key, default, .. } => {
                    let prop_target = JsExpr::member(target.clone(), &key);
                    let default = default.expect("only defaulted shorthands are deferred");
                    let default = self.lower_expr(&default);
                    bindings.push(JsStmt::const_decl(
                        JsPat::Ident(key),
                        JsExpr::new(JsExprKind::Cond {
                            test: Box::new(JsExpr::binary(
                                JsBinOp::StrictEq,
                                prop_target.clone(),
                                JsExpr::undefined(),
                            )),
                            cons: Box::new(default),
                            alt: Box::new(prop_target),
                        }),
                    ));
                }
                ObjPatElem::Rest { .. } => {}
            }
        }
    }

    fn lower_extractor_pattern(
        &mut self,
        name: &str,
        args: &[Pattern],
        span: Span,
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        checks: &mut Vec<JsExpr>,
        bindings: &mut Vec<JsStmt>,
    ) {
        self.needs_matcher_import = true;
        let temp = self.fresh_temp();
        let call = JsExpr::with_source(
            JsExprKind::Call {
                callee: Box::new(JsExpr::ident("invokeCustomMatcherOrThrow")),
                args: vec![
                    JsExpr::ident(name),
                    target.clone(),
                    JsExpr::undefined(),
                ],
            },
            span,
        );
        pre.push(JsStmt::const_decl(JsPat::Ident(temp.clone()), call));

        // The call returns a tuple; recurse over the argument patterns.
        let temp_expr = JsExpr::ident(&temp);
        for (index, arg) in args.iter().enumerate() {
            let elem_target = JsExpr::index(temp_expr.clone(), JsExpr::num(index as f64));
            self.lower_pattern_into(arg, &elem_target, pre, checks, bindings);
        }
    }

    /// Collect only the checks of a sub-pattern (bindings handled by the
    /// enclosing destructuring).
    fn collect_checks_only(
        &mut self,
        pattern: &Pattern,
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        checks: &mut Vec<JsExpr>,
    ) {
        let mut scratch = Vec::new();
        self.lower_pattern_into(pattern, target, pre, checks, &mut scratch);
        // Sub-bindings are rebuilt by the caller; drop them here.
    }

    /// Collect only the bindings of a sub-pattern (checks were already
    /// emitted against the same target).
    fn bind_only(
        &mut self,
        pattern: &Pattern,
        target: &JsExpr,
        pre: &mut Vec<JsStmt>,
        bindings: &mut Vec<JsStmt>,
    ) {
        let mut scratch = Vec::new();
        self.lower_pattern_into(pattern, target, pre, &mut scratch, bindings);
    }
}

/// `E != null`, tolerating both null and undefined.
fn not_nullish(target: JsExpr) -> JsExpr {
    JsExpr::binary(JsBinOp::LooseNotEq, target, JsExpr::new(JsExprKind::Null))
}

/// `"key" in E`
fn in_check(key: &str, target: JsExpr) -> JsExpr {
    JsExpr::binary(JsBinOp::In, JsExpr::str(key), target)
}

/// `typeof E === "tag"`
fn typeof_check(target: JsExpr, tag: &str) -> JsExpr {
    JsExpr::binary(
        JsBinOp::StrictEq,
        JsExpr::new(JsExprKind::Unary {
            op: JsUnaryOp::TypeOf,
            arg: Box::new(target),
        }),
        JsExpr::str(tag),
    )
}

fn prim_typeof_tag(ann: &TypeAnn) -> Option<&'static str> {
    match ann {
        TypeAnn::Ref { name, .. } => match name.as_str() {
            "number" => Some("number"),
            "string" => Some("string"),
            "boolean" => Some("boolean"),
            "bigint" => Some("bigint"),
            _ => None,
        },
        TypeAnn::Lit { lit, .. } => match lit {
            Literal::Num(_) => Some("number"),
            Literal::Str(_) => Some("string"),
            Literal::Bool(_) => Some("boolean"),
            _ => None,
        },
        _ => None,
    }
}

/// Patterns a single JS destructuring can bind directly.
fn is_simple_binding(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Ident {
            default: None,
            type_ann,
            ..
        } => {
            // Annotated elements still destructure directly; the typeof
            // check was already emitted against the indexed access.
            let _ = type_ann;
            true
        }
        Pattern::Wildcard { .. } => true,
        Pattern::Rest { inner, .. } => {
            matches!(inner.as_ref(), Pattern::Ident { default: None, .. })
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/patterns_tests.rs"]
mod tests;
