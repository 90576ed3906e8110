//! `.d.ts` synthesis from checked binding types.
//!
//! Every top-level declaration renders as a typed-only declaration;
//! namespaced declarations group under `declare namespace` blocks.

use crate::source_writer::SourceWriter;
use esc_ast::{Decl, Module, VarKind};
use esc_binder::{BindingKind, DepGraph};
use esc_checker::Context;
use esc_solver::{
    resolve, FuncType, ObjElem, Scheme, Type, TypeAlias, TypeDisplay, TypeId,
};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Render the `.d.ts` text for a checked module.
pub fn build_dts(module: &Module, graph: &DepGraph, ctx: &Context) -> String {
    let mut root = SourceWriter::new();
    let mut namespaced: IndexMap<String, SourceWriter> = IndexMap::new();
    let mut processed: FxHashSet<(usize, usize)> = FxHashSet::default();

    for component in &graph.components {
        for key in component {
            let decl_refs = match graph.decls.get(key) {
                Some(refs) => refs.clone(),
                None => continue,
            };
            let namespace = graph.namespace.get(key).cloned().unwrap_or_default();
            let is_root = namespace.is_empty();
            let writer = if is_root {
                &mut root
            } else {
                namespaced.entry(namespace.clone()).or_default()
            };

            match key.kind {
                BindingKind::Value => {
                    if decl_refs
                        .iter()
                        .all(|r| processed.contains(&(r.item, r.decl)))
                    {
                        continue;
                    }
                    processed.extend(decl_refs.iter().map(|r| (r.item, r.decl)));
                    // An overloaded function's binding already carries every
                    // signature; emit it once for the whole group.
                    let mut emitted_func = false;
                    for decl_ref in &decl_refs {
                        let decl = graph.decl(module, *decl_ref);
                        if matches!(decl, Decl::Func(_)) {
                            if emitted_func {
                                continue;
                            }
                            emitted_func = true;
                        }
                        emit_value_decl(writer, ctx, decl, &namespace, is_root);
                    }
                }
                BindingKind::Type => {
                    // Merged interfaces registered one alias; emit once.
                    if !processed.insert((decl_refs[0].item, decl_refs[0].decl)) {
                        continue;
                    }
                    processed.extend(decl_refs.iter().map(|r| (r.item, r.decl)));
                    let decl = graph.decl(module, decl_refs[0]);
                    emit_type_decl(writer, ctx, &key.name, decl);
                }
            }
        }
    }

    let mut out = root.into_output();
    for (namespace, writer) in namespaced {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("declare namespace {namespace} {{\n"));
        for line in writer.get_output().lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("}\n");
    }
    out
}

fn emit_value_decl(
    writer: &mut SourceWriter,
    ctx: &Context,
    decl: &Decl,
    namespace: &str,
    is_root: bool,
) {
    let declare = if is_root { "declare " } else { "" };
    let qualify = |name: &str| {
        if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{namespace}.{name}")
        }
    };
    match decl {
        Decl::Var(var) => {
            let keyword = match var.kind {
                VarKind::Val => "const",
                VarKind::Var => "let",
            };
            let mut names = Vec::new();
            var.pattern.binding_names(&mut names);
            if names.is_empty() {
                return;
            }
            // One var introducing several bindings groups its declarators.
            let declarators: Vec<String> = names
                .iter()
                .map(|name| {
                    let rendered = lookup_value_type(ctx, &qualify(name));
                    format!("{name}: {rendered}")
                })
                .collect();
            writer.write(&format!("{declare}{keyword} {};", declarators.join(", ")));
            writer.write_line();
        }
        Decl::Func(func) => {
            let scheme = ctx
                .scopes
                .lookup_value(&qualify(&func.name))
                .map(|b| b.scheme.clone());
            let Some(scheme) = scheme else {
                return;
            };
            for func_ty in overload_types(ctx, scheme.ty) {
                emit_function_signature(writer, ctx, declare, &func.name, &scheme, &func_ty);
            }
        }
        _ => {}
    }
}

/// Overload bindings hold an intersection of function types; a plain
/// function holds one.
fn overload_types(ctx: &Context, ty: TypeId) -> Vec<FuncType> {
    let ty = resolve(&ctx.arena, ty);
    match ctx.arena.get(ty) {
        Type::Func(func) => vec![func.clone()],
        Type::Intersection(members) => members
            .iter()
            .filter_map(|member| {
                let member = resolve(&ctx.arena, *member);
                match ctx.arena.get(member) {
                    Type::Func(func) => Some(func.clone()),
                    _ => None,
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn emit_function_signature(
    writer: &mut SourceWriter,
    ctx: &Context,
    declare: &str,
    name: &str,
    scheme: &Scheme,
    func: &FuncType,
) {
    let mut type_params: Vec<String> = scheme.type_params.clone();
    for tp in &func.type_params {
        let mut rendered = tp.name.clone();
        if let Some(constraint) = tp.constraint {
            rendered.push_str(" extends ");
            rendered.push_str(&show(ctx, constraint));
        }
        type_params.push(rendered);
    }
    let tp_text = if type_params.is_empty() {
        String::new()
    } else {
        format!("<{}>", type_params.join(", "))
    };

    let params: Vec<String> = func
        .params
        .iter()
        .map(|param| {
            let rest = if param.rest { "..." } else { "" };
            let opt = if param.optional { "?" } else { "" };
            format!("{rest}{}{opt}: {}", param.name, show(ctx, param.ty))
        })
        .collect();

    writer.write(&format!(
        "{declare}function {name}{tp_text}({}): {};",
        params.join(", "),
        show(ctx, func.ret)
    ));
    writer.write_line();
}

fn emit_type_decl(writer: &mut SourceWriter, ctx: &Context, qualified_name: &str, decl: &Decl) {
    let alias = match ctx.scopes.lookup_type(qualified_name) {
        Some(alias) => alias,
        None => return,
    };
    let local = qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, name)| name);
    let tp_text = type_params_text(ctx, &alias);

    match decl {
        Decl::Interface(_) => {
            let ty = resolve(&ctx.arena, alias.ty);
            let Type::Object(object) = ctx.arena.get(ty) else {
                return;
            };
            writer.write(&format!("interface {local}{tp_text} {{"));
            if object.elems.is_empty() {
                writer.write("}");
                writer.write_line();
                return;
            }
            writer.write_line();
            writer.increase_indent();
            for elem in &object.elems {
                emit_interface_member(writer, ctx, elem);
            }
            writer.decrease_indent();
            writer.write("}");
            writer.write_line();
        }
        Decl::TypeAlias(_) => {
            // `declare` is not spelled on type aliases.
            writer.write(&format!(
                "type {local}{tp_text} = {};",
                show(ctx, alias.ty)
            ));
            writer.write_line();
        }
        _ => {}
    }
}

fn type_params_text(ctx: &Context, alias: &TypeAlias) -> String {
    if alias.type_params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = alias
        .type_params
        .iter()
        .map(|tp| {
            let mut text = tp.name.clone();
            if let Some(constraint) = tp.constraint {
                text.push_str(" extends ");
                text.push_str(&show(ctx, constraint));
            }
            if let Some(default) = tp.default {
                text.push_str(" = ");
                text.push_str(&show(ctx, default));
            }
            text
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

fn emit_interface_member(writer: &mut SourceWriter, ctx: &Context, elem: &ObjElem) {
    match elem {
        ObjElem::Prop {
            name,
            optional,
            readonly,
            ty,
        } => {
            let ro = if *readonly { "readonly " } else { "" };
            let opt = if *optional { "?" } else { "" };
            writer.write(&format!("{ro}{name}{opt}: {};", show(ctx, *ty)));
            writer.write_line();
        }
        ObjElem::Method { name, func } => {
            if let Some(signature) = method_signature(ctx, *func) {
                writer.write(&format!("{name}{signature};"));
                writer.write_line();
            }
        }
        ObjElem::Callable(func) => {
            if let Some(signature) = method_signature(ctx, *func) {
                writer.write(&format!("{signature};"));
                writer.write_line();
            }
        }
        ObjElem::Constructor(func) => {
            if let Some(signature) = method_signature(ctx, *func) {
                writer.write(&format!("new {signature};"));
                writer.write_line();
            }
        }
        ObjElem::Getter { name, ret } => {
            writer.write(&format!("get {name}(): {};", show(ctx, *ret)));
            writer.write_line();
        }
        ObjElem::Setter { name, param } => {
            writer.write(&format!("set {name}(value: {});", show(ctx, *param)));
            writer.write_line();
        }
        ObjElem::Mapped(mapped) => {
            writer.write(&format!(
                "[{} in {}]: {};",
                mapped.type_param,
                show(ctx, mapped.constraint),
                show(ctx, mapped.value)
            ));
            writer.write_line();
        }
        ObjElem::Spread(_) => {}
    }
}

/// `(params): ret` for method-position signatures.
fn method_signature(ctx: &Context, func: TypeId) -> Option<String> {
    let func = resolve(&ctx.arena, func);
    let Type::Func(func) = ctx.arena.get(func) else {
        return None;
    };
    let params: Vec<String> = func
        .params
        .iter()
        .map(|param| format!("{}: {}", param.name, show(ctx, param.ty)))
        .collect();
    Some(format!("({}): {}", params.join(", "), show(ctx, func.ret)))
}

fn lookup_value_type(ctx: &Context, name: &str) -> String {
    match ctx.scopes.lookup_value(name) {
        Some(binding) => {
            let prefix = if binding.scheme.type_params.is_empty() {
                String::new()
            } else {
                format!("<{}>", binding.scheme.type_params.join(", "))
            };
            format!("{prefix}{}", show(ctx, binding.scheme.ty))
        }
        None => "unknown".to_string(),
    }
}

fn show(ctx: &Context, ty: TypeId) -> String {
    TypeDisplay::new(&ctx.arena, ty).to_string()
}

#[cfg(test)]
#[path = "tests/dts_tests.rs"]
mod tests;
