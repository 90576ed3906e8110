//! Module and script checking driven by the dependency graph schedule.
//!
//! Components are processed in the scheduler's dependency-first order;
//! recursive components of function declarations are pre-bound before
//! their bodies are inferred. Cancellation is polled at statement and
//! component boundaries.

use crate::context::Context;
use crate::declarations::{
    bind_var_names, infer_decl, infer_func_decl, infer_interface_decl, infer_type_decl,
    infer_var_decl,
};
use crate::infer_expr::infer_expr;
use esc_ast::{Decl, Module, Script, Stmt, VarKind};
use esc_binder::{build_dep_graph, Binding, BindingKey, BindingKind, DepGraph};
use esc_common::{codes, Diagnostic, Span, Spanned};
use esc_solver::{generalize, Scheme, TypeArena, TypeId};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Infer a script: statements in order at the root scope. Returns the
/// trailing expression's type and the accumulated diagnostics.
pub fn infer_script(ctx: &mut Context, script: &Script) -> (TypeId, Vec<Diagnostic>) {
    let mut last = TypeArena::UNDEFINED;
    for (index, stmt) in script.stmts.iter().enumerate() {
        let ty = infer_stmt(ctx, stmt);
        if index + 1 == script.stmts.len() {
            if let Stmt::Expr { .. } = stmt {
                last = ty;
            }
        }
    }
    (last, ctx.take_diagnostics())
}

/// Build the dependency graph for a module and check it.
pub fn infer_module(ctx: &mut Context, module: &Module) -> (DepGraph, Vec<Diagnostic>) {
    let graph = build_dep_graph(module);
    check_module(ctx, module, &graph);
    (graph, ctx.take_diagnostics())
}

/// Infer one statement. The returned type is meaningful for expression
/// statements (block values); other statements yield `undefined`.
pub fn infer_stmt(ctx: &mut Context, stmt: &Stmt) -> TypeId {
    if ctx.check_cancelled(stmt.span()) {
        return TypeArena::ANY;
    }
    match stmt {
        Stmt::Expr { expr, .. } => infer_expr(ctx, expr),
        Stmt::Decl(decl) => {
            infer_decl(ctx, decl);
            TypeArena::UNDEFINED
        }
        Stmt::Return { arg, span } => {
            let ty = match arg {
                Some(arg) => infer_expr(ctx, arg),
                None => TypeArena::UNDEFINED,
            };
            match ctx.return_stack.last_mut() {
                Some(frame) => frame.push(ty),
                None => ctx.error(
                    *span,
                    "`return` outside of a function body",
                    codes::TYPE_MISMATCH,
                ),
            }
            TypeArena::UNDEFINED
        }
        Stmt::Block(block) => {
            ctx.scopes.push_scope();
            let ty = crate::infer_expr::infer_block(ctx, block);
            ctx.scopes.pop_scope();
            ty
        }
        Stmt::If {
            cond,
            consequent,
            alternate,
            ..
        } => {
            let cond_ty = infer_expr(ctx, cond);
            ctx.unify(cond_ty, TypeArena::BOOL, cond.span());
            ctx.scopes.push_scope();
            crate::infer_expr::infer_block(ctx, consequent);
            ctx.scopes.pop_scope();
            if let Some(alt) = alternate {
                ctx.scopes.push_scope();
                crate::infer_expr::infer_block(ctx, alt);
                ctx.scopes.pop_scope();
            }
            TypeArena::UNDEFINED
        }
        Stmt::Throw { arg, .. } => {
            infer_expr(ctx, arg);
            TypeArena::UNDEFINED
        }
        Stmt::Import {
            specifiers, span, ..
        } => {
            // Module resolution is a collaborator concern; imported names
            // check as `any`.
            for spec in specifiers {
                let name = spec.alias.as_deref().unwrap_or(&spec.name);
                ctx.bind_mono(name, TypeArena::ANY, *span, false);
            }
            TypeArena::UNDEFINED
        }
    }
}

/// Check a module following the component schedule.
pub fn check_module(ctx: &mut Context, module: &Module, graph: &DepGraph) {
    let mut processed: FxHashSet<(usize, usize)> = FxHashSet::default();

    for component in &graph.components {
        let span = component_span(module, graph, component);
        if ctx.check_cancelled(span) {
            return;
        }
        check_component(ctx, module, graph, component, &mut processed);
    }
}

fn component_span(module: &Module, graph: &DepGraph, component: &[BindingKey]) -> Span {
    component
        .first()
        .and_then(|key| graph.decls.get(key))
        .and_then(|decls| decls.first())
        .map(|decl_ref| graph.decl(module, *decl_ref).span())
        .unwrap_or_else(Span::dummy)
}

fn check_component(
    ctx: &mut Context,
    module: &Module,
    graph: &DepGraph,
    component: &[BindingKey],
    processed: &mut FxHashSet<(usize, usize)>,
) {
    let recursive = component.len() > 1
        || component
            .first()
            .is_some_and(|key| graph.is_self_recursive(key));

    // A recursive component is typeable only when every value member is a
    // function declaration; other value cycles are reported once at the
    // component boundary.
    if recursive && !recursive_values_are_funcs(module, graph, component) {
        let names: Vec<&str> = component.iter().map(|key| key.name.as_str()).collect();
        let span = component_span(module, graph, component);
        ctx.error(
            span,
            format!(
                "cyclic dependency between `{}` cannot be typed",
                names.join("`, `")
            ),
            codes::DEPENDENCY_CYCLE,
        );
        for key in component {
            if key.kind == BindingKind::Value {
                ctx.failed_keys.push(key.clone());
                with_namespace(ctx, graph, key, |ctx| {
                    let local = key.local_name().to_string();
                    ctx.bind_mono(&local, TypeArena::ANY, Span::dummy(), false);
                });
            }
        }
        return;
    }

    // Pre-bind every function in a recursive component before inferring
    // any body, so mutual recursion resolves.
    let mut prebound: Vec<(BindingKey, TypeId)> = Vec::new();
    if recursive {
        for key in component {
            if key.kind != BindingKind::Value {
                continue;
            }
            let placeholder = ctx.fresh_var();
            with_namespace(ctx, graph, key, |ctx| {
                let local = key.local_name().to_string();
                ctx.bind_mono(&local, placeholder, Span::dummy(), false);
            });
            prebound.push((key.clone(), placeholder));
        }
    }

    for key in component {
        let decl_refs = match graph.decls.get(key) {
            Some(decl_refs) => decl_refs.clone(),
            None => continue,
        };
        let placeholder = prebound
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, ty)| *ty);

        with_namespace(ctx, graph, key, |ctx| {
            if decl_refs.len() > 1 {
                check_merged_decls(ctx, module, graph, key, &decl_refs, placeholder);
                processed.extend(decl_refs.iter().map(|r| (r.item, r.decl)));
                return;
            }

            let decl_ref = decl_refs[0];
            let decl = graph.decl(module, decl_ref);
            // A var pattern or namespace block may introduce several keys
            // for one declaration; infer it once.
            if !processed.insert((decl_ref.item, decl_ref.decl)) {
                return;
            }
            check_single_decl(ctx, decl, placeholder);
        });
    }
}

fn recursive_values_are_funcs(
    module: &Module,
    graph: &DepGraph,
    component: &[BindingKey],
) -> bool {
    component.iter().all(|key| {
        if key.kind != BindingKind::Value {
            return true;
        }
        graph
            .decls
            .get(key)
            .is_some_and(|decl_refs| {
                decl_refs
                    .iter()
                    .all(|r| matches!(graph.decl(module, *r), Decl::Func(_)))
            })
    })
}

/// Push the key's namespace frame (if any) around `f`, so sibling
/// declarations in the same namespace resolve by bare name and bindings
/// land in the right namespace.
fn with_namespace<F: FnOnce(&mut Context)>(
    ctx: &mut Context,
    graph: &DepGraph,
    key: &BindingKey,
    f: F,
) {
    let namespace = graph.namespace.get(key).cloned().unwrap_or_default();
    if namespace.is_empty() {
        f(ctx);
        return;
    }
    let ns_id = ctx.scopes.ensure_namespace(&namespace);
    ctx.scopes.push_namespace(ns_id);
    f(ctx);
    ctx.scopes.pop_scope();
}

fn check_single_decl(ctx: &mut Context, decl: &Decl, placeholder: Option<TypeId>) {
    match decl {
        Decl::Var(var) => {
            let bindings = infer_var_decl(ctx, var);
            bind_var_names(ctx, var, bindings, var.kind == VarKind::Val);
        }
        Decl::Func(func) => {
            let ty = infer_func_decl(ctx, func, placeholder);
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
        other => infer_decl(ctx, other),
    }
}

/// A key with several declarations: merged interfaces or function
/// overloads.
fn check_merged_decls(
    ctx: &mut Context,
    module: &Module,
    graph: &DepGraph,
    key: &BindingKey,
    decl_refs: &[esc_binder::DeclRef],
    placeholder: Option<TypeId>,
) {
    let decls: Vec<&Decl> = decl_refs.iter().map(|r| graph.decl(module, *r)).collect();

    if key.kind == BindingKind::Type {
        // Interface merging happens declaration by declaration; each call
        // folds into the alias registered by the previous one.
        for decl in decls {
            if let Decl::Interface(iface) = decl {
                infer_interface_decl(ctx, iface);
            }
        }
        return;
    }

    // Function overloads: one node, the intersection of all signatures.
    // Each overload infers independently; the recursion placeholder (if
    // any) is resolved against the final intersection instead.
    let mut overloads = Vec::new();
    let mut span = Span::dummy();
    for decl in &decls {
        match decl {
            Decl::Func(func) => {
                span = func.span;
                overloads.push(infer_func_decl(ctx, func, None));
            }
            _ => {
                debug!(key = %key, "merged non-function value declarations");
            }
        }
    }
    let overload_ty = ctx.arena.intersection(overloads);
    if let Some(placeholder) = placeholder {
        ctx.unify(overload_ty, placeholder, span);
    }
    let local = key.local_name().to_string();
    ctx.scopes
        .set_value(local, Binding::new(span, Scheme::mono(overload_ty), false));
}

#[cfg(test)]
#[path = "tests/module_tests.rs"]
mod tests;
