//! Normalized human-readable type printing.
//!
//! Union members print sorted by variant class then lexicographically;
//! intersection members keep declaration order. Bound variables print as
//! their referent.

use crate::types::{FuncType, ObjElem, ObjectType, Type, TypeArena, TypeId};
use crate::visitor::resolve;

/// Display adapter: `format!("{}", TypeDisplay::new(&arena, id))`.
pub struct TypeDisplay<'a> {
    arena: &'a TypeArena,
    id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    #[must_use]
    pub fn new(arena: &'a TypeArena, id: TypeId) -> Self {
        TypeDisplay { arena, id }
    }
}

impl std::fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(self.arena, self.id))
    }
}

/// Sort key for union members: variant class first, then the rendered text.
fn variant_rank(arena: &TypeArena, id: TypeId) -> u8 {
    match arena.get(resolve(arena, id)) {
        Type::Prim(_) => 0,
        Type::Lit(_) => 1,
        Type::Ref { .. } | Type::Intrinsic { .. } => 2,
        Type::Object(_) => 3,
        Type::Tuple(_) | Type::Rest(_) => 4,
        Type::Func(_) => 5,
        _ => 6,
    }
}

pub(crate) fn render(arena: &TypeArena, id: TypeId) -> String {
    let id = resolve(arena, id);
    match arena.get(id) {
        Type::Var { id: var_id, .. } => format!("t{var_id}"),
        Type::Prim(prim) => prim.name().to_string(),
        Type::Lit(lit) => lit.to_string(),
        Type::Unknown => "unknown".to_string(),
        Type::Never => "never".to_string(),
        Type::Any => "any".to_string(),
        Type::GlobalThis => "globalThis".to_string(),
        Type::UniqueSymbol { .. } => "unique symbol".to_string(),
        Type::Wildcard => "_".to_string(),
        Type::Ref { name, args, .. } => {
            if args.is_empty() {
                name.clone()
            } else {
                let args: Vec<String> = args.iter().map(|a| render(arena, *a)).collect();
                format!("{name}<{}>", args.join(", "))
            }
        }
        Type::Func(func) => render_func(arena, func),
        Type::Object(object) => render_object(arena, object),
        Type::Tuple(elems) => {
            let elems: Vec<String> = elems.iter().map(|e| render(arena, *e)).collect();
            format!("[{}]", elems.join(", "))
        }
        Type::Rest(inner) => format!("...{}", render(arena, *inner)),
        Type::Union(members) => {
            let mut rendered: Vec<(u8, String)> = members
                .iter()
                .map(|m| (variant_rank(arena, *m), render(arena, *m)))
                .collect();
            rendered.sort();
            rendered.dedup();
            rendered
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join(" | ")
        }
        Type::Intersection(members) => members
            .iter()
            .map(|m| render(arena, *m))
            .collect::<Vec<_>>()
            .join(" & "),
        Type::KeyOf(inner) => format!("keyof {}", render(arena, *inner)),
        Type::IndexedAccess { target, index } => {
            format!("{}[{}]", render(arena, *target), render(arena, *index))
        }
        Type::Cond {
            check,
            extends,
            then_ty,
            else_ty,
        } => format!(
            "{} extends {} ? {} : {}",
            render(arena, *check),
            render(arena, *extends),
            render(arena, *then_ty),
            render(arena, *else_ty)
        ),
        Type::Infer { name } => format!("infer {name}"),
        Type::TemplateLit { quasis, types } => {
            let mut out = String::from("`");
            for (i, quasi) in quasis.iter().enumerate() {
                out.push_str(quasi);
                if let Some(ty) = types.get(i) {
                    out.push_str("${");
                    out.push_str(&render(arena, *ty));
                    out.push('}');
                }
            }
            out.push('`');
            out
        }
        Type::Intrinsic { name } => name.clone(),
        Type::Mutable(inner) => format!("mut {}", render(arena, *inner)),
    }
}

fn render_func(arena: &TypeArena, func: &FuncType) -> String {
    let mut out = String::new();
    if !func.type_params.is_empty() {
        out.push('<');
        for (i, tp) in func.type_params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&tp.name);
            if let Some(constraint) = tp.constraint {
                out.push_str(" extends ");
                out.push_str(&render(arena, constraint));
            }
        }
        out.push('>');
    }
    out.push('(');
    for (i, param) in func.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if param.rest {
            out.push_str("...");
        }
        out.push_str(&param.name);
        if param.optional {
            out.push('?');
        }
        out.push_str(": ");
        out.push_str(&render(arena, param.ty));
    }
    out.push_str(") => ");
    out.push_str(&render(arena, func.ret));
    if let Some(throws) = func.throws {
        out.push_str(" throws ");
        out.push_str(&render(arena, throws));
    }
    out
}

fn render_object(arena: &TypeArena, object: &ObjectType) -> String {
    let mut parts = Vec::new();
    for elem in &object.elems {
        match elem {
            ObjElem::Callable(func) => parts.push(render(arena, *func)),
            ObjElem::Constructor(func) => parts.push(format!("new {}", render(arena, *func))),
            ObjElem::Method { name, func } => {
                parts.push(format!("{name}{}", render(arena, *func)));
            }
            ObjElem::Getter { name, ret } => {
                parts.push(format!("get {name}(): {}", render(arena, *ret)));
            }
            ObjElem::Setter { name, param } => {
                parts.push(format!("set {name}({})", render(arena, *param)));
            }
            ObjElem::Prop {
                name,
                optional,
                readonly,
                ty,
            } => {
                let ro = if *readonly { "readonly " } else { "" };
                let opt = if *optional { "?" } else { "" };
                parts.push(format!("{ro}{name}{opt}: {}", render(arena, *ty)));
            }
            ObjElem::Mapped(mapped) => {
                let mut part = format!(
                    "[{} in {}]",
                    mapped.type_param,
                    render(arena, mapped.constraint)
                );
                part.push_str(&format!(": {}", render(arena, mapped.value)));
                parts.push(part);
            }
            ObjElem::Spread(ty) => parts.push(format!("...{}", render(arena, *ty))),
        }
    }
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
