//! Pattern inference.
//!
//! `infer_pattern` destructures a pattern into a type plus the bindings
//! it introduces. The caller decides the unification direction: for
//! assignments the initializer must satisfy the pattern; for `match` the
//! pattern must satisfy the target.

use crate::context::Context;
use crate::infer_expr::infer_expr;
use crate::type_ann::{infer_type_ann, lit_type};
use esc_common::{codes, Span, Spanned};
use esc_solver::{prune, ObjElem, ObjectFlags, Type, TypeId, Unifier};
use esc_ast::{ObjPatElem, Pattern};

/// Names introduced by a pattern, with their (not yet generalized) types.
#[derive(Debug, Default)]
pub struct PatternBindings {
    pub names: Vec<(String, TypeId, Span)>,
}

impl PatternBindings {
    fn push(&mut self, ctx: &mut Context, name: &str, ty: TypeId, span: Span) {
        if self.names.iter().any(|(n, _, _)| n == name) {
            ctx.error(
                span,
                format!("duplicate identifier `{name}` in pattern"),
                codes::PATTERN_MISMATCH,
            );
            return;
        }
        self.names.push((name.to_string(), ty, span));
    }
}

/// Infer a pattern's type, collecting its bindings.
pub fn infer_pattern(
    ctx: &mut Context,
    pattern: &Pattern,
    bindings: &mut PatternBindings,
) -> TypeId {
    match pattern {
        Pattern::Ident {
            name,
            default,
            type_ann,
            span,
        } => {
            let ty = match type_ann {
                Some(ann) => infer_type_ann(ctx, ann),
                None => ctx.fresh_var(),
            };
            if let Some(default) = default {
                let default_ty = infer_expr(ctx, default);
                ctx.unify(default_ty, ty, *span);
            }
            bindings.push(ctx, name, ty, *span);
            ty
        }
        Pattern::Lit { lit, .. } => lit_type(ctx, lit),
        Pattern::Tuple { elems, .. } => {
            let elem_tys: Vec<TypeId> = elems
                .iter()
                .map(|elem| match elem {
                    Pattern::Rest { inner, .. } => {
                        let inner_ty = infer_pattern(ctx, inner, bindings);
                        ctx.arena.alloc(Type::Rest(inner_ty))
                    }
                    _ => infer_pattern(ctx, elem, bindings),
                })
                .collect();
            ctx.arena.tuple(elem_tys)
        }
        Pattern::Object { elems, .. } => {
            let mut obj_elems: Vec<ObjElem> = Vec::new();
            for elem in elems {
                match elem {
                    ObjPatElem::KeyValue {
                        key,
                        value,
                        default,
                        span,
                    } => {
                        let value_ty = infer_pattern(ctx, value, bindings);
                        if let Some(default) = default {
                            let default_ty = infer_expr(ctx, default);
                            ctx.unify(default_ty, value_ty, *span);
                        }
                        obj_elems.push(ObjElem::Prop {
                            name: key.clone(),
                            optional: default.is_some(),
                            readonly: false,
                            ty: value_ty,
                        });
                    }
                    ObjPatElem::Shorthand { key, default, span } => {
                        let ty = ctx.fresh_var();
                        if let Some(default) = default {
                            let default_ty = infer_expr(ctx, default);
                            ctx.unify(default_ty, ty, *span);
                        }
                        bindings.push(ctx, key, ty, *span);
                        obj_elems.push(ObjElem::Prop {
                            name: key.clone(),
                            optional: default.is_some(),
                            readonly: false,
                            ty,
                        });
                    }
                    ObjPatElem::Rest { inner, .. } => {
                        // The rest pattern collects the unrecognized
                        // remainder of the object.
                        let rest_ty = infer_pattern(ctx, inner, bindings);
                        obj_elems.push(ObjElem::Spread(rest_ty));
                    }
                }
            }
            ctx.arena.object(obj_elems, ObjectFlags::empty())
        }
        Pattern::Rest { inner, .. } => infer_pattern(ctx, inner, bindings),
        Pattern::Wildcard { .. } => ctx.fresh_var(),
        Pattern::Extractor { name, args, span } => {
            infer_extractor(ctx, name, args, *span, bindings)
        }
    }
}

/// Resolve an extractor pattern through the matcher protocol: the named
/// value must expose a `matcher` whose signature determines the subject
/// type and the extracted tuple the argument patterns destructure.
fn infer_extractor(
    ctx: &mut Context,
    name: &str,
    args: &[Pattern],
    span: Span,
    bindings: &mut PatternBindings,
) -> TypeId {
    let extractor_ty = match ctx.lookup_value_type(name) {
        Some(ty) => ty,
        None => return ctx.unresolved(name, span),
    };

    let matcher = {
        let mut unifier = Unifier::new(&mut ctx.arena, span);
        let resolved = match unifier.expand_alias(extractor_ty) {
            Some(resolved) => resolved,
            None => extractor_ty,
        };
        let diags = unifier.into_diagnostics();
        ctx.diags.extend(diags);
        let resolved = prune(&mut ctx.arena, resolved);
        match ctx.arena.get(resolved) {
            Type::Object(object) => object.elems.iter().find_map(|elem| match elem {
                ObjElem::Method { name, func } if name == "matcher" => Some(*func),
                ObjElem::Prop { name, ty, .. } if name == "matcher" => Some(*ty),
                _ => None,
            }),
            _ => None,
        }
    };

    let matcher = match matcher {
        Some(matcher) => prune(&mut ctx.arena, matcher),
        None => {
            ctx.error(
                span,
                format!("`{name}` does not implement the matcher protocol"),
                codes::PATTERN_MISMATCH,
            );
            return ctx.fresh_var();
        }
    };

    let func = match ctx.arena.get(matcher) {
        Type::Func(func) => func.clone(),
        _ => {
            ctx.error(
                span,
                format!("`{name}.matcher` is not a function"),
                codes::PATTERN_MISMATCH,
            );
            return ctx.fresh_var();
        }
    };

    // The matcher returns a tuple of extracted values; each argument
    // pattern destructures one element.
    let ret = prune(&mut ctx.arena, func.ret);
    let extracted: Vec<TypeId> = match ctx.arena.get(ret).clone() {
        Type::Tuple(elems) => elems.to_vec(),
        _ => vec![ret],
    };

    if args.len() != extracted.len() {
        ctx.error(
            span,
            format!(
                "extractor `{name}` produces {} value(s), but the pattern has {}",
                extracted.len(),
                args.len()
            ),
            codes::ARITY_MISMATCH,
        );
    }

    for (arg, elem_ty) in args.iter().zip(extracted.iter()) {
        let arg_ty = infer_pattern(ctx, arg, bindings);
        ctx.unify(*elem_ty, arg_ty, arg.span());
    }

    // The subject type is the matcher's sole parameter.
    match func.params.first() {
        Some(param) => param.ty,
        None => ctx.fresh_var(),
    }
}

#[cfg(test)]
#[path = "tests/infer_pattern_tests.rs"]
mod tests;
