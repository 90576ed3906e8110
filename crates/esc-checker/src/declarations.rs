//! Declaration inference: variables, functions, type aliases, and
//! interface merging.

use crate::context::Context;
use crate::infer_expr::{infer_func, is_promise};
use crate::infer_pattern::{infer_pattern, PatternBindings};
use crate::type_ann::{bind_type_params, infer_obj_elems, infer_type_ann};
use esc_ast::{Decl, FuncBody, FuncDecl, InterfaceDecl, TypeAnn, TypeDecl, VarDecl, VarKind};
use esc_binder::Binding;
use esc_common::{codes, Spanned};
use esc_solver::{
    generalize, FuncParam, FuncType, ObjElem, ObjectFlags, ObjectType, Scheme, Type, TypeAlias,
    TypeId, Unifier,
};
use std::sync::Arc;

/// Infer a declaration in statement position, binding its names in the
/// current scope.
pub fn infer_decl(ctx: &mut Context, decl: &Decl) {
    match decl {
        Decl::Var(var) => {
            let bindings = infer_var_decl(ctx, var);
            let generalized = var.kind == VarKind::Val;
            bind_var_names(ctx, var, bindings, generalized);
        }
        Decl::Func(func) => {
            let ty = infer_func_decl(ctx, func, None);
            let scheme = generalize(&mut ctx.arena, ty);
            ctx.scopes
                .set_value(&func.name, Binding::new(func.span, scheme, false));
        }
        Decl::TypeAlias(alias) => {
            infer_type_decl(ctx, alias);
        }
        Decl::Interface(iface) => {
            infer_interface_decl(ctx, iface);
        }
        Decl::Class(class) => {
            ctx.diags
                .push(esc_common::Diagnostic::unimplemented(class.span, "class"));
            ctx.bind_mono(&class.name, esc_solver::TypeArena::ANY, class.span, false);
        }
        Decl::Enum(en) => {
            ctx.diags
                .push(esc_common::Diagnostic::unimplemented(en.span, "enum"));
            ctx.bind_mono(&en.name, esc_solver::TypeArena::ANY, en.span, false);
        }
        Decl::Namespace(ns) => {
            let ns_id = {
                let current = ctx.scopes.current();
                let existing = ctx.scopes.arena.get(current).children.get(&ns.name).copied();
                match existing {
                    Some(id) => id,
                    None => {
                        let child = ctx.scopes.arena.alloc(Some(current));
                        ctx.scopes
                            .arena
                            .get_mut(current)
                            .children
                            .insert(ns.name.clone(), child);
                        child
                    }
                }
            };
            ctx.scopes.push_namespace(ns_id);
            for inner in &ns.decls {
                infer_decl(ctx, inner);
            }
            ctx.scopes.pop_scope();
        }
    }
}

/// Bind the names a var declaration introduced, generalizing immutable
/// (`val`) bindings.
pub fn bind_var_names(
    ctx: &mut Context,
    var: &VarDecl,
    bindings: PatternBindings,
    generalized: bool,
) {
    let mutable = var.kind == VarKind::Var;
    for (name, ty, span) in bindings.names {
        let scheme = if generalized {
            generalize(&mut ctx.arena, ty)
        } else {
            Scheme::mono(ty)
        };
        ctx.scopes.set_value(name, Binding::new(span, scheme, mutable));
    }
}

/// Infer a var declaration: pattern, annotation, initializer.
pub fn infer_var_decl(ctx: &mut Context, var: &VarDecl) -> PatternBindings {
    let mut bindings = PatternBindings::default();
    let pat_ty = infer_pattern(ctx, &var.pattern, &mut bindings);

    let mut expected = pat_ty;
    if let Some(ann) = &var.type_ann {
        let ann_ty = infer_type_ann(ctx, ann);
        ctx.unify(ann_ty, pat_ty, var.pattern.span());
        expected = ann_ty;
    }

    if var.declare {
        if var.type_ann.is_none() {
            ctx.error(
                var.span,
                "a type annotation is required in a declare statement",
                codes::TYPE_MISMATCH,
            );
        }
        return bindings;
    }

    match &var.init {
        Some(init) => {
            let init_ty = crate::infer_expr::infer_expr(ctx, init);
            ctx.unify(init_ty, expected, init.span());
        }
        None => {
            ctx.error(
                var.span,
                "a variable declaration requires an initializer",
                codes::TYPE_MISMATCH,
            );
        }
    }
    bindings
}

/// Infer a function declaration. `prebound` carries the placeholder type
/// variable when the scheduler pre-bound the name for (mutual) recursion;
/// otherwise the name is bound here before the body is inferred.
pub fn infer_func_decl(ctx: &mut Context, func: &FuncDecl, prebound: Option<TypeId>) -> TypeId {
    if func.declare || func.body.is_none() {
        return declared_signature_type(ctx, func);
    }

    let placeholder = match prebound {
        Some(placeholder) => placeholder,
        None => {
            let placeholder = ctx.fresh_var();
            ctx.bind_mono(&func.name, placeholder, func.span, false);
            placeholder
        }
    };

    let body = FuncBody::Block(func.body.clone().expect("checked above"));
    let inferred = infer_func(
        ctx,
        &func.sig.type_params,
        &func.sig.params,
        &body,
        func.sig.return_type.as_ref(),
        func.sig.throws.as_ref(),
        func.is_async,
    );
    ctx.unify(inferred, placeholder, func.span);
    // The inferred type carries the declared parameter names; the
    // placeholder may have pruned to a call shape.
    inferred
}

/// Signature-only type for `declare` functions and bodiless overload
/// heads. Elided parameter and return types become fresh variables.
pub fn declared_signature_type(ctx: &mut Context, func: &FuncDecl) -> TypeId {
    ctx.scopes.push_scope();
    let tp_defs = bind_type_params(ctx, &func.sig.type_params);

    let params: Vec<FuncParam> = func
        .sig
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let ty = match &param.type_ann {
                Some(ann) => infer_type_ann(ctx, ann),
                None => ctx.fresh_var(),
            };
            let (name, rest) = match &param.pattern {
                esc_ast::Pattern::Ident { name, .. } => (name.clone(), false),
                esc_ast::Pattern::Rest { inner, .. } => match inner.as_ref() {
                    esc_ast::Pattern::Ident { name, .. } => (name.clone(), true),
                    _ => (format!("arg{index}"), true),
                },
                _ => (format!("arg{index}"), false),
            };
            FuncParam {
                name,
                ty,
                optional: param.optional,
                rest,
            }
        })
        .collect();

    let ret = match &func.sig.return_type {
        Some(ann) => infer_type_ann(ctx, ann),
        None => ctx.fresh_var(),
    };
    let throws = func.sig.throws.as_ref().map(|ann| infer_type_ann(ctx, ann));
    ctx.scopes.pop_scope();

    // A declared async function must advertise a Promise return type; the
    // single-argument form was already rewritten to `Promise<T, never>`.
    if func.declare && func.is_async {
        let is_promise_ann = matches!(
            &func.sig.return_type,
            Some(TypeAnn::Ref { name, .. }) if name == "Promise"
        );
        if !is_promise_ann {
            ctx.error(
                func.span,
                format!(
                    "declared async function `{}` must return a `Promise`",
                    func.name
                ),
                codes::TYPE_MISMATCH,
            );
        }
    } else if func.is_async && func.body.is_none() {
        let ret_is_promise = is_promise(ctx, ret);
        if !ret_is_promise {
            ctx.error(
                func.span,
                format!("async function `{}` must return a `Promise`", func.name),
                codes::TYPE_MISMATCH,
            );
        }
    }

    ctx.arena.alloc(Type::Func(FuncType {
        type_params: tp_defs,
        params,
        ret,
        throws,
    }))
}

/// Infer a type alias declaration and register it in the current scope.
pub fn infer_type_decl(ctx: &mut Context, decl: &TypeDecl) -> Arc<TypeAlias> {
    ctx.scopes.push_scope();
    let tp_defs = bind_type_params(ctx, &decl.type_params);
    let ty = infer_type_ann(ctx, &decl.type_ann);
    ctx.scopes.pop_scope();

    let alias = Arc::new(TypeAlias {
        type_params: tp_defs,
        ty,
    });
    ctx.scopes.set_type(&decl.name, alias.clone());
    alias
}

/// Infer an interface declaration, merging with an existing same-name
/// interface when present.
pub fn infer_interface_decl(ctx: &mut Context, iface: &InterfaceDecl) -> Arc<TypeAlias> {
    ctx.scopes.push_scope();
    let tp_defs = bind_type_params(ctx, &iface.type_params);
    let elems = infer_obj_elems(ctx, &iface.body);
    let extends: Vec<TypeId> = iface
        .extends
        .iter()
        .map(|ann| infer_type_ann(ctx, ann))
        .collect();
    ctx.scopes.pop_scope();

    let existing = ctx.scopes.lookup_type(&iface.name);
    let existing_object = existing.as_ref().and_then(|alias| {
        match ctx.arena.get(alias.ty) {
            Type::Object(object) if object.is_interface() => {
                Some((alias.clone(), object.clone()))
            }
            _ => None,
        }
    });

    let alias = match existing_object {
        Some((prev_alias, prev_object)) => {
            merge_interface(ctx, iface, prev_alias, prev_object, elems, extends, tp_defs)
        }
        None => {
            let id = ctx.arena.fresh_object_id();
            let object = ctx.arena.alloc(Type::Object(ObjectType {
                elems,
                extends,
                flags: ObjectFlags::INTERFACE | ObjectFlags::NOMINAL,
                id,
            }));
            Arc::new(TypeAlias {
                type_params: tp_defs,
                ty: object,
            })
        }
    };

    ctx.scopes.set_type(&iface.name, alias.clone());
    alias
}

fn merge_interface(
    ctx: &mut Context,
    iface: &InterfaceDecl,
    prev_alias: Arc<TypeAlias>,
    prev_object: ObjectType,
    new_elems: Vec<ObjElem>,
    new_extends: Vec<TypeId>,
    new_tp_defs: Vec<esc_solver::TypeParamDef>,
) -> Arc<TypeAlias> {
    // Type parameters of every partial declaration must agree.
    let prev_names: Vec<&str> = prev_alias
        .type_params
        .iter()
        .map(|tp| tp.name.as_str())
        .collect();
    let new_names: Vec<&str> = new_tp_defs.iter().map(|tp| tp.name.as_str()).collect();
    if prev_names != new_names {
        ctx.error(
            iface.span,
            format!(
                "interface `{}` redeclared with different type parameters",
                iface.name
            ),
            codes::INTERFACE_MERGE,
        );
        return prev_alias;
    }

    let mut merged = prev_object.elems.clone();
    for elem in new_elems {
        let name = elem.name().map(str::to_string);
        let duplicate = name.as_deref().and_then(|n| {
            merged.iter().find_map(|existing| match (existing, &elem) {
                (ObjElem::Prop { name: en, ty: et, .. }, ObjElem::Prop { ty: nt, .. })
                    if en == n =>
                {
                    Some((*et, *nt))
                }
                (
                    ObjElem::Method { name: en, func: ef },
                    ObjElem::Method { func: nf, .. },
                ) if en == n => Some((*ef, *nf)),
                _ => None,
            })
        });
        match duplicate {
            Some((existing_ty, new_ty)) => {
                // Duplicate members must be mutually assignable.
                let mut unifier = Unifier::new(&mut ctx.arena, iface.span);
                let compatible =
                    unifier.unify(existing_ty, new_ty) && unifier.unify(new_ty, existing_ty);
                let _ = unifier.into_diagnostics();
                if !compatible {
                    let name = name.unwrap_or_default();
                    ctx.error(
                        iface.span,
                        format!(
                            "interface `{}` declares property `{name}` with an incompatible type",
                            iface.name
                        ),
                        codes::INTERFACE_MERGE,
                    );
                }
            }
            None => merged.push(elem),
        }
    }

    let mut extends = prev_object.extends.clone();
    extends.extend(new_extends);

    // Nominal identity is preserved across the merge.
    let object = ctx.arena.alloc(Type::Object(ObjectType {
        elems: merged,
        extends,
        flags: prev_object.flags,
        id: prev_object.id,
    }));
    Arc::new(TypeAlias {
        type_params: prev_alias.type_params.clone(),
        ty: object,
    })
}

#[cfg(test)]
#[path = "tests/declarations_tests.rs"]
mod tests;
