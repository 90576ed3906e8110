//! Conversion of syntactic type annotations into semantic types.

use crate::context::Context;
use esc_ast::{
    Literal, MappedModifierAnn, ObjTypeAnnElem, Pattern, TypeAnn, TypeAnnFuncParam, TypeParam,
};
use esc_common::{codes, Span};
use esc_solver::{
    FuncParam, FuncType, LitValue, MappedElem, MappedModifier, ObjElem, ObjectFlags, Type,
    TypeArena, TypeId, TypeParamDef,
};

/// Convert an annotation to a type, resolving named references through
/// the scope stack.
pub fn infer_type_ann(ctx: &mut Context, ann: &TypeAnn) -> TypeId {
    match ann {
        TypeAnn::Lit { lit, .. } => lit_type(ctx, lit),
        TypeAnn::Ref {
            name,
            type_args,
            span,
        } => infer_ref(ctx, name, type_args, *span),
        TypeAnn::Func {
            type_params,
            params,
            ret,
            throws,
            ..
        } => {
            let func = infer_func_ann(ctx, type_params, params, ret, throws.as_deref());
            ctx.arena.alloc(Type::Func(func))
        }
        TypeAnn::Object { elems, .. } => {
            let elems = infer_obj_elems(ctx, elems);
            ctx.arena.object(elems, ObjectFlags::empty())
        }
        TypeAnn::Tuple { elems, .. } => {
            let elems: Vec<TypeId> = elems.iter().map(|e| infer_type_ann(ctx, e)).collect();
            ctx.arena.tuple(elems)
        }
        TypeAnn::Rest { inner, .. } => {
            let inner = infer_type_ann(ctx, inner);
            ctx.arena.alloc(Type::Rest(inner))
        }
        TypeAnn::Union { types, .. } => {
            let members: Vec<TypeId> = types.iter().map(|t| infer_type_ann(ctx, t)).collect();
            ctx.arena.union(members)
        }
        TypeAnn::Intersection { types, .. } => {
            let members: Vec<TypeId> = types.iter().map(|t| infer_type_ann(ctx, t)).collect();
            ctx.arena.intersection(members)
        }
        TypeAnn::KeyOf { inner, .. } => {
            let inner = infer_type_ann(ctx, inner);
            ctx.arena.alloc(Type::KeyOf(inner))
        }
        TypeAnn::IndexedAccess { target, index, .. } => {
            let target = infer_type_ann(ctx, target);
            let index = infer_type_ann(ctx, index);
            ctx.arena.alloc(Type::IndexedAccess { target, index })
        }
        TypeAnn::Cond {
            check,
            extends,
            then_ty,
            else_ty,
            ..
        } => {
            let check = infer_type_ann(ctx, check);
            let extends = infer_type_ann(ctx, extends);
            let then_ty = infer_type_ann(ctx, then_ty);
            let else_ty = infer_type_ann(ctx, else_ty);
            ctx.arena.alloc(Type::Cond {
                check,
                extends,
                then_ty,
                else_ty,
            })
        }
        TypeAnn::Infer { name, .. } => ctx.arena.alloc(Type::Infer { name: name.clone() }),
        TypeAnn::TemplateLit { quasis, types, .. } => {
            let types: Vec<TypeId> = types.iter().map(|t| infer_type_ann(ctx, t)).collect();
            ctx.arena.alloc(Type::TemplateLit {
                quasis: quasis.clone(),
                types,
            })
        }
        TypeAnn::Mutable { inner, .. } => {
            let inner = infer_type_ann(ctx, inner);
            ctx.arena.alloc(Type::Mutable(inner))
        }
        TypeAnn::Wildcard { .. } => TypeArena::WILDCARD,
    }
}

pub fn lit_type(ctx: &mut Context, lit: &Literal) -> TypeId {
    match lit {
        Literal::Num(n) => ctx.arena.lit_num(*n),
        Literal::Str(s) => ctx.arena.lit_str(s.clone()),
        Literal::Bool(b) => ctx.arena.lit_bool(*b),
        Literal::Null => TypeArena::NULL,
        Literal::Undefined => TypeArena::UNDEFINED,
        Literal::BigInt(v) => ctx.arena.alloc(Type::Lit(LitValue::BigInt(v.clone()))),
        Literal::Regex { .. } => ctx.arena.reference("RegExp", Vec::new()),
    }
}

fn infer_ref(ctx: &mut Context, name: &str, type_args: &[TypeAnn], span: Span) -> TypeId {
    // Primitives and built-in constants short-circuit.
    match name {
        "number" => return TypeArena::NUM,
        "string" => return TypeArena::STR,
        "boolean" => return TypeArena::BOOL,
        "bigint" => return TypeArena::BIGINT,
        "symbol" => return TypeArena::SYMBOL,
        "unknown" => return TypeArena::UNKNOWN,
        "never" => return TypeArena::NEVER,
        "any" => return TypeArena::ANY,
        "null" => return TypeArena::NULL,
        "undefined" => return TypeArena::UNDEFINED,
        "globalThis" => return TypeArena::GLOBAL_THIS,
        _ => {}
    }

    let mut args: Vec<TypeId> = type_args.iter().map(|a| infer_type_ann(ctx, a)).collect();

    // `Promise<T>` is rewritten to `Promise<T, never>`.
    if name == "Promise" && args.len() == 1 {
        args.push(TypeArena::NEVER);
    }

    match ctx.scopes.lookup_type(name) {
        Some(alias) => {
            if !alias.type_params.is_empty() && alias.type_params.len() != args.len() {
                // Defaults fill trailing unsupplied arguments.
                let missing = alias.type_params[args.len()..].to_vec();
                let mut filled = true;
                for tp in &missing {
                    match tp.default {
                        Some(default) => args.push(default),
                        None => {
                            filled = false;
                            break;
                        }
                    }
                }
                if !filled {
                    ctx.error(
                        span,
                        format!(
                            "type `{name}` expects {} type argument(s), got {}",
                            alias.type_params.len(),
                            type_args.len()
                        ),
                        codes::ARITY_MISMATCH,
                    );
                    return ctx.fresh_var();
                }
            }
            ctx.arena.resolved_reference(name, alias, args)
        }
        // Unresolved references (type parameters in scope-free positions
        // and external types) stay as parameter references.
        None => ctx.arena.reference(name, args),
    }
}

fn infer_func_ann(
    ctx: &mut Context,
    type_params: &[TypeParam],
    params: &[TypeAnnFuncParam],
    ret: &TypeAnn,
    throws: Option<&TypeAnn>,
) -> FuncType {
    ctx.scopes.push_scope();
    let tp_defs = bind_type_params(ctx, type_params);
    let params: Vec<FuncParam> = params.iter().map(|p| func_param(ctx, p)).collect();
    let ret = infer_type_ann(ctx, ret);
    let throws = throws.map(|t| infer_type_ann(ctx, t));
    ctx.scopes.pop_scope();
    FuncType {
        type_params: tp_defs,
        params,
        ret,
        throws,
    }
}

fn func_param(ctx: &mut Context, param: &TypeAnnFuncParam) -> FuncParam {
    let (name, rest) = param_name(&param.pattern);
    let ty = infer_type_ann(ctx, &param.type_ann);
    FuncParam {
        name,
        ty,
        optional: param.optional,
        rest,
    }
}

fn param_name(pattern: &Pattern) -> (String, bool) {
    match pattern {
        Pattern::Ident { name, .. } => (name.clone(), false),
        Pattern::Rest { inner, .. } => {
            let (name, _) = param_name(inner);
            (name, true)
        }
        Pattern::Wildcard { .. } => ("_".to_string(), false),
        _ => ("arg".to_string(), false),
    }
}

/// Bind type parameters into the current scope as parameter references
/// and evaluate their constraints in topological order, so a later
/// parameter can reference an earlier one's constraint.
pub fn bind_type_params(ctx: &mut Context, type_params: &[TypeParam]) -> Vec<TypeParamDef> {
    let order = topo_sort_type_params(type_params);

    // Bind every name first so mutually referencing constraints resolve.
    for tp in type_params {
        let param_ref = ctx.arena.reference(tp.name.clone(), Vec::new());
        ctx.scopes.set_type(
            tp.name.clone(),
            std::sync::Arc::new(esc_solver::TypeAlias::mono(param_ref)),
        );
    }

    let mut defs: Vec<Option<TypeParamDef>> = vec![None; type_params.len()];
    for index in order {
        let tp = &type_params[index];
        let constraint = tp.constraint.as_ref().map(|c| infer_type_ann(ctx, c));
        let default = tp.default.as_ref().map(|d| infer_type_ann(ctx, d));
        defs[index] = Some(TypeParamDef {
            name: tp.name.clone(),
            constraint,
            default,
        });
    }
    defs.into_iter().map(|d| d.expect("all params sorted")).collect()
}

/// Topologically order type parameters by their mutual constraint
/// references (referenced parameters first). Cycles keep source order.
fn topo_sort_type_params(type_params: &[TypeParam]) -> Vec<usize> {
    let names: Vec<&str> = type_params.iter().map(|tp| tp.name.as_str()).collect();
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); type_params.len()];
    for (i, tp) in type_params.iter().enumerate() {
        if let Some(constraint) = &tp.constraint {
            let mut referenced = Vec::new();
            collect_ref_names(constraint, &mut referenced);
            for name in referenced {
                if let Some(j) = names.iter().position(|n| *n == name) {
                    if i != j {
                        deps[i].push(j);
                    }
                }
            }
        }
    }

    let mut order = Vec::with_capacity(type_params.len());
    let mut state = vec![0u8; type_params.len()]; // 0 = unseen, 1 = visiting, 2 = done
    fn visit(i: usize, deps: &[Vec<usize>], state: &mut [u8], order: &mut Vec<usize>) {
        if state[i] != 0 {
            return;
        }
        state[i] = 1;
        for &j in &deps[i] {
            if state[j] == 0 {
                visit(j, deps, state, order);
            }
        }
        state[i] = 2;
        order.push(i);
    }
    for i in 0..type_params.len() {
        visit(i, &deps, &mut state, &mut order);
    }
    order
}

fn collect_ref_names(ann: &TypeAnn, out: &mut Vec<String>) {
    struct RefNames<'o> {
        out: &'o mut Vec<String>,
    }
    impl esc_ast::Visitor for RefNames<'_> {
        fn visit_type_ann(&mut self, type_ann: &TypeAnn) {
            if let TypeAnn::Ref { name, .. } = type_ann {
                self.out.push(name.clone());
            }
            esc_ast::visit::walk_type_ann(self, type_ann);
        }
    }
    let mut visitor = RefNames { out };
    esc_ast::Visitor::visit_type_ann(&mut visitor, ann);
}

pub fn infer_obj_elems(ctx: &mut Context, elems: &[ObjTypeAnnElem]) -> Vec<ObjElem> {
    elems.iter().map(|elem| infer_obj_elem(ctx, elem)).collect()
}

fn infer_obj_elem(ctx: &mut Context, elem: &ObjTypeAnnElem) -> ObjElem {
    match elem {
        ObjTypeAnnElem::Property {
            name,
            optional,
            readonly,
            type_ann,
            ..
        } => ObjElem::Prop {
            name: name.clone(),
            optional: *optional,
            readonly: *readonly,
            ty: infer_type_ann(ctx, type_ann),
        },
        ObjTypeAnnElem::Method {
            name,
            type_params,
            params,
            ret,
            ..
        } => {
            let func = infer_method_ann(ctx, type_params, params, ret);
            ObjElem::Method {
                name: name.clone(),
                func,
            }
        }
        ObjTypeAnnElem::Getter { name, ret, .. } => ObjElem::Getter {
            name: name.clone(),
            ret: infer_type_ann(ctx, ret),
        },
        ObjTypeAnnElem::Setter { name, param, .. } => ObjElem::Setter {
            name: name.clone(),
            param: infer_type_ann(ctx, &param.type_ann),
        },
        ObjTypeAnnElem::Callable {
            type_params,
            params,
            ret,
            ..
        } => ObjElem::Callable(infer_method_ann(ctx, type_params, params, ret)),
        ObjTypeAnnElem::Constructor {
            type_params,
            params,
            ret,
            ..
        } => ObjElem::Constructor(infer_method_ann(ctx, type_params, params, ret)),
        ObjTypeAnnElem::Mapped {
            type_param,
            constraint,
            name_remap,
            value,
            optional,
            readonly,
            ..
        } => {
            ctx.scopes.push_scope();
            let param_ref = ctx.arena.reference(type_param.clone(), Vec::new());
            ctx.scopes.set_type(
                type_param.clone(),
                std::sync::Arc::new(esc_solver::TypeAlias::mono(param_ref)),
            );
            let constraint = infer_type_ann(ctx, constraint);
            let name_remap = name_remap.as_ref().map(|r| infer_type_ann(ctx, r));
            let value = infer_type_ann(ctx, value);
            ctx.scopes.pop_scope();
            ObjElem::Mapped(MappedElem {
                type_param: type_param.clone(),
                constraint,
                name_remap,
                value,
                optional: optional.map(mapped_modifier),
                readonly: readonly.map(mapped_modifier),
            })
        }
        ObjTypeAnnElem::Spread { arg, .. } => ObjElem::Spread(infer_type_ann(ctx, arg)),
    }
}

fn infer_method_ann(
    ctx: &mut Context,
    type_params: &[TypeParam],
    params: &[TypeAnnFuncParam],
    ret: &TypeAnn,
) -> TypeId {
    let func = infer_func_ann(ctx, type_params, params, ret, None);
    ctx.arena.alloc(Type::Func(func))
}

fn mapped_modifier(ann: MappedModifierAnn) -> MappedModifier {
    match ann {
        MappedModifierAnn::Add => MappedModifier::Add,
        MappedModifierAnn::Remove => MappedModifier::Remove,
    }
}

#[cfg(test)]
#[path = "tests/type_ann_tests.rs"]
mod tests;
