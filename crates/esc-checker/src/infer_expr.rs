//! Expression inference.

use crate::context::Context;
use crate::infer_pattern::{infer_pattern, PatternBindings};
use crate::type_ann::{bind_type_params, infer_type_ann, lit_type};
use esc_ast::{
    Block, Expr, FuncBody, FuncParam as AstFuncParam, JsxAttrValue, JsxChild, JsxElement,
    JsxFragment, MatchCase, ObjLitElem, Stmt, TypeParam, UnaryOp,
};
use esc_common::{codes, Span, Spanned};
use esc_solver::{
    prune, FuncParam, FuncType, ObjElem, ObjectFlags, Type, TypeArena, TypeId, Unifier,
};

/// Infer the type of an expression.
pub fn infer_expr(ctx: &mut Context, expr: &Expr) -> TypeId {
    match expr {
        Expr::Lit { lit, .. } => lit_type(ctx, lit),
        Expr::Ident(ident) => {
            let name = ident.qualified_name();
            match ctx.lookup_value_type(&name) {
                Some(ty) => ty,
                None => ctx.unresolved(&name, ident.span),
            }
        }
        Expr::Member {
            obj,
            prop,
            opt_chain,
            span,
        } => {
            let obj_ty = infer_expr(ctx, obj);
            member_type(ctx, obj_ty, prop, *opt_chain, *span)
        }
        Expr::Index {
            obj, index, span, ..
        } => {
            let obj_ty = infer_expr(ctx, obj);
            let index_ty = infer_expr(ctx, index);
            let mut unifier = Unifier::new(&mut ctx.arena, *span);
            let resolved = unifier.resolve_indexed_access(obj_ty, index_ty);
            let diags = unifier.into_diagnostics();
            ctx.diags.extend(diags);
            resolved.unwrap_or_else(|| ctx.fresh_var())
        }
        Expr::Call {
            callee, args, span, ..
        } => infer_call(ctx, callee, args, *span),
        Expr::Unary { op, arg, span } => {
            let arg_ty = infer_expr(ctx, arg);
            match op {
                UnaryOp::Minus => {
                    ctx.unify(arg_ty, TypeArena::NUM, *span);
                    TypeArena::NUM
                }
                UnaryOp::Not => TypeArena::BOOL,
            }
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let left_ty = infer_expr(ctx, left);
            let right_ty = infer_expr(ctx, right);
            if op.is_logical() {
                ctx.unify(left_ty, TypeArena::BOOL, left.span());
                ctx.unify(right_ty, TypeArena::BOOL, right.span());
                TypeArena::BOOL
            } else if matches!(*op, esc_ast::BinaryOp::Eq | esc_ast::BinaryOp::NotEq) {
                // Equality is polymorphic.
                TypeArena::BOOL
            } else {
                // Arithmetic and ordering operate on numbers.
                ctx.unify(left_ty, TypeArena::NUM, left.span());
                ctx.unify(right_ty, TypeArena::NUM, right.span());
                if op.is_comparison() {
                    TypeArena::BOOL
                } else {
                    TypeArena::NUM
                }
            }
        }
        Expr::Func {
            type_params,
            params,
            body,
            return_type,
            throws,
            is_async,
            ..
        } => infer_func(
            ctx,
            type_params,
            params,
            body,
            return_type.as_ref(),
            throws.as_ref(),
            *is_async,
        ),
        Expr::Tuple { elems, .. } => {
            let elem_tys: Vec<TypeId> = elems
                .iter()
                .map(|elem| match elem {
                    Expr::Spread { arg, .. } => {
                        let ty = infer_expr(ctx, arg);
                        ctx.arena.alloc(Type::Rest(ty))
                    }
                    _ => infer_expr(ctx, elem),
                })
                .collect();
            ctx.arena.tuple(elem_tys)
        }
        Expr::Spread { arg, .. } => infer_expr(ctx, arg),
        Expr::Object { elems, .. } => infer_object_lit(ctx, elems),
        Expr::If {
            cond,
            consequent,
            alternate,
            ..
        } => {
            let cond_ty = infer_expr(ctx, cond);
            ctx.unify(cond_ty, TypeArena::BOOL, cond.span());
            let cons_ty = infer_block(ctx, consequent);
            match alternate {
                Some(alt) => {
                    let alt_ty = infer_expr(ctx, alt);
                    ctx.arena.union(vec![cons_ty, alt_ty])
                }
                None => ctx.arena.union(vec![cons_ty, TypeArena::UNDEFINED]),
            }
        }
        Expr::Match { target, cases, span } => infer_match(ctx, target, cases, *span),
        Expr::Await { arg, span } => infer_await(ctx, arg, *span),
        Expr::Throw { arg, .. } => {
            infer_expr(ctx, arg);
            TypeArena::NEVER
        }
        Expr::Do { body, .. } => {
            ctx.scopes.push_scope();
            let ty = infer_block(ctx, body);
            ctx.scopes.pop_scope();
            ty
        }
        Expr::JsxElement(elem) => infer_jsx_element(ctx, elem),
        Expr::JsxFragment(frag) => infer_jsx_fragment(ctx, frag),
    }
}

/// Infer the statements of a block. The block's value is the value of its
/// trailing expression statement, `undefined` otherwise.
pub fn infer_block(ctx: &mut Context, block: &Block) -> TypeId {
    let mut last = TypeArena::UNDEFINED;
    for (index, stmt) in block.stmts.iter().enumerate() {
        let ty = crate::module::infer_stmt(ctx, stmt);
        if index + 1 == block.stmts.len() {
            if let Stmt::Expr { .. } = stmt {
                last = ty;
            }
        }
    }
    last
}

fn infer_call(ctx: &mut Context, callee: &Expr, args: &[Expr], span: Span) -> TypeId {
    let callee_ty = infer_expr(ctx, callee);
    let arg_tys: Vec<TypeId> = args.iter().map(|arg| infer_expr(ctx, arg)).collect();

    // Strict arity on direct calls: too many arguments is an error even
    // though function subtyping would ignore them.
    let callee_pruned = prune(&mut ctx.arena, callee_ty);
    let declared = match ctx.arena.get(callee_pruned) {
        Type::Func(func) => Some((func.params.len(), func.has_rest())),
        _ => None,
    };
    if let Some((param_count, has_rest)) = declared {
        if args.len() > param_count && !has_rest {
            ctx.error(
                span,
                format!("expected {param_count} argument(s), got {}", args.len()),
                codes::ARITY_MISMATCH,
            );
        }
    }

    let ret = ctx.fresh_var();
    let params: Vec<FuncParam> = arg_tys
        .iter()
        .enumerate()
        .map(|(i, ty)| FuncParam::new(format!("arg{i}"), *ty))
        .collect();
    let call_shape = ctx.arena.func(params, ret);
    ctx.unify(callee_ty, call_shape, span);
    ret
}

pub(crate) fn infer_func(
    ctx: &mut Context,
    type_params: &[TypeParam],
    params: &[AstFuncParam],
    body: &FuncBody,
    return_type: Option<&esc_ast::TypeAnn>,
    throws: Option<&esc_ast::TypeAnn>,
    is_async: bool,
) -> TypeId {
    ctx.scopes.push_scope();
    let tp_defs = bind_type_params(ctx, type_params);

    let mut func_params: Vec<FuncParam> = Vec::new();
    for param in params {
        let mut bindings = PatternBindings::default();
        let mut pat_ty = infer_pattern(ctx, &param.pattern, &mut bindings);
        if let Some(ann) = &param.type_ann {
            let ann_ty = infer_type_ann(ctx, ann);
            ctx.unify(ann_ty, pat_ty, param.pattern.span());
            pat_ty = ann_ty;
        }
        for (name, ty, bind_span) in bindings.names {
            ctx.bind_mono(&name, ty, bind_span, false);
        }
        let (name, rest) = match &param.pattern {
            esc_ast::Pattern::Ident { name, .. } => (name.clone(), false),
            esc_ast::Pattern::Rest { inner, .. } => match inner.as_ref() {
                esc_ast::Pattern::Ident { name, .. } => (name.clone(), true),
                _ => ("arg".to_string(), true),
            },
            _ => (format!("arg{}", func_params.len()), false),
        };
        func_params.push(FuncParam {
            name,
            ty: pat_ty,
            optional: param.optional,
            rest,
        });
    }

    ctx.async_stack.push(is_async);
    ctx.return_stack.push(Vec::new());
    let body_ty = match body {
        FuncBody::Block(block) => infer_block(ctx, block),
        FuncBody::Expr(expr) => infer_expr(ctx, expr),
    };
    let returns = ctx.return_stack.pop().unwrap_or_default();
    ctx.async_stack.pop();

    let mut ret = if returns.is_empty() {
        body_ty
    } else {
        ctx.arena.union(returns)
    };

    // An async body yields a Promise; wrap unless it already is one.
    if is_async && !is_promise(ctx, ret) {
        ret = promise_of(ctx, ret, TypeArena::NEVER);
    }

    if let Some(ann) = return_type {
        let ann_ty = infer_type_ann(ctx, ann);
        ctx.unify(ret, ann_ty, ann.span());
        ret = ann_ty;
    }
    let throws_ty = throws.map(|ann| infer_type_ann(ctx, ann));

    ctx.scopes.pop_scope();
    ctx.arena.alloc(Type::Func(FuncType {
        type_params: tp_defs,
        params: func_params,
        ret,
        throws: throws_ty,
    }))
}

fn infer_object_lit(ctx: &mut Context, elems: &[ObjLitElem]) -> TypeId {
    let mut props: Vec<ObjElem> = Vec::new();
    let mut spreads: Vec<TypeId> = Vec::new();
    for elem in elems {
        match elem {
            ObjLitElem::KeyValue { key, value, .. } => {
                let ty = infer_expr(ctx, value);
                props.push(ObjElem::Prop {
                    name: key.clone(),
                    optional: false,
                    readonly: false,
                    ty,
                });
            }
            ObjLitElem::Shorthand { key, span } => {
                let ty = match ctx.lookup_value_type(key) {
                    Some(ty) => ty,
                    None => ctx.unresolved(key, *span),
                };
                props.push(ObjElem::Prop {
                    name: key.clone(),
                    optional: false,
                    readonly: false,
                    ty,
                });
            }
            ObjLitElem::Spread { arg, .. } => {
                spreads.push(infer_expr(ctx, arg));
            }
        }
    }
    let object = ctx.arena.object(props, ObjectFlags::empty());
    if spreads.is_empty() {
        object
    } else {
        let mut members = spreads;
        members.push(object);
        ctx.arena.intersection(members)
    }
}

fn infer_match(ctx: &mut Context, target: &Expr, cases: &[MatchCase], span: Span) -> TypeId {
    let target_ty = infer_expr(ctx, target);
    let mut case_tys = Vec::new();
    for case in cases {
        ctx.scopes.push_scope();
        let mut bindings = PatternBindings::default();
        let pat_ty = infer_pattern(ctx, &case.pattern, &mut bindings);
        // The pattern must be a subtype of the matched target.
        ctx.unify(pat_ty, target_ty, case.pattern.span());
        for (name, ty, bind_span) in bindings.names {
            ctx.bind_mono(&name, ty, bind_span, false);
        }
        if let Some(guard) = &case.guard {
            let guard_ty = infer_expr(ctx, guard);
            ctx.unify(guard_ty, TypeArena::BOOL, guard.span());
        }
        case_tys.push(infer_expr(ctx, &case.body));
        ctx.scopes.pop_scope();
    }
    if case_tys.is_empty() {
        ctx.error(span, "match expression has no cases", codes::PATTERN_MISMATCH);
        return TypeArena::NEVER;
    }
    ctx.arena.union(case_tys)
}

fn infer_await(ctx: &mut Context, arg: &Expr, span: Span) -> TypeId {
    if !ctx.async_stack.last().copied().unwrap_or(false) {
        ctx.error(
            span,
            "`await` is only allowed inside async functions",
            codes::TYPE_MISMATCH,
        );
    }
    let arg_ty = infer_expr(ctx, arg);
    let value = ctx.fresh_var();
    let error = ctx.fresh_var();
    let promise = promise_of(ctx, value, error);
    ctx.unify(arg_ty, promise, span);
    value
}

/// Build a `Promise<T, E>` reference, resolving through the prelude alias
/// when one is available.
pub fn promise_of(ctx: &mut Context, value: TypeId, error: TypeId) -> TypeId {
    match ctx.scopes.lookup_type("Promise") {
        Some(alias) => ctx
            .arena
            .resolved_reference("Promise", alias, vec![value, error]),
        None => ctx.arena.reference("Promise", vec![value, error]),
    }
}

pub fn is_promise(ctx: &mut Context, ty: TypeId) -> bool {
    let ty = prune(&mut ctx.arena, ty);
    matches!(ctx.arena.get(ty), Type::Ref { name, .. } if name == "Promise")
}

/// Resolve a member access, expanding aliases and handling optional
/// chaining by filtering nullish members from the receiver.
pub fn member_type(
    ctx: &mut Context,
    obj_ty: TypeId,
    prop: &str,
    opt_chain: bool,
    span: Span,
) -> TypeId {
    let mut receiver = prune(&mut ctx.arena, obj_ty);

    if opt_chain {
        if let Type::Union(members) = ctx.arena.get(receiver).clone() {
            let non_nullish: Vec<TypeId> = members
                .into_iter()
                .filter(|m| {
                    !matches!(
                        ctx.arena.get(*m),
                        Type::Lit(esc_solver::LitValue::Null)
                            | Type::Lit(esc_solver::LitValue::Undefined)
                    )
                })
                .collect();
            receiver = ctx.arena.union(non_nullish);
        }
    }

    let key = ctx.arena.lit_str(prop.to_string());
    let mut unifier = Unifier::new(&mut ctx.arena, span);
    let resolved = unifier.resolve_indexed_access(receiver, key);
    let diags = unifier.into_diagnostics();
    ctx.diags.extend(diags);
    match resolved {
        Some(ty) if opt_chain => ctx.arena.union(vec![ty, TypeArena::UNDEFINED]),
        Some(ty) => ty,
        None => ctx.fresh_var(),
    }
}

// =============================================================================
// JSX
// =============================================================================

fn jsx_element_type(ctx: &mut Context) -> TypeId {
    match ctx.scopes.lookup_type("JSXElement") {
        Some(alias) => ctx.arena.resolved_reference("JSXElement", alias, vec![]),
        None => ctx.arena.reference("JSXElement", Vec::new()),
    }
}

fn infer_jsx_element(ctx: &mut Context, elem: &JsxElement) -> TypeId {
    let result = jsx_element_type(ctx);

    // Attribute values are inferred for both intrinsic and component
    // elements; component elements additionally check their props object
    // against the component's signature.
    let mut props: Vec<ObjElem> = Vec::new();
    for attr in &elem.attrs {
        let ty = match &attr.value {
            Some(JsxAttrValue::Lit(lit)) => lit_type(ctx, lit),
            Some(JsxAttrValue::Expr(expr)) => infer_expr(ctx, expr),
            None => ctx.arena.lit_bool(true),
        };
        props.push(ObjElem::Prop {
            name: attr.name.clone(),
            optional: false,
            readonly: false,
            ty,
        });
    }
    for child in &elem.children {
        infer_jsx_child(ctx, child);
    }

    if elem.is_intrinsic() {
        return result;
    }

    let component_ty = infer_expr(ctx, &elem.tag);
    let props_obj = ctx.arena.object(props, ObjectFlags::empty());
    let params = vec![FuncParam::new("props", props_obj)];
    let call_shape = ctx.arena.func(params, result);
    ctx.unify(component_ty, call_shape, elem.span);
    result
}

fn infer_jsx_fragment(ctx: &mut Context, frag: &JsxFragment) -> TypeId {
    for child in &frag.children {
        infer_jsx_child(ctx, child);
    }
    jsx_element_type(ctx)
}

fn infer_jsx_child(ctx: &mut Context, child: &JsxChild) {
    match child {
        JsxChild::Text { .. } => {}
        JsxChild::Expr { expr, .. } => {
            infer_expr(ctx, expr);
        }
        JsxChild::Element(elem) => {
            infer_jsx_element(ctx, elem);
        }
        JsxChild::Fragment(frag) => {
            infer_jsx_fragment(ctx, frag);
        }
    }
}

#[cfg(test)]
#[path = "tests/infer_expr_tests.rs"]
mod tests;
