//! Pruning and the replacing type visitor.
//!
//! `prune` collapses chains of bound type variables to their ultimate
//! referent, compressing paths as it goes. `fold` is a pre/post-order
//! rewrite: `enter` may short-circuit with a replacement, otherwise the
//! children are folded and `exit` may rewrite the rebuilt node.

use crate::types::{FuncType, MappedElem, ObjElem, ObjectType, Type, TypeArena, TypeId, TypeList};

/// Follow `Var.instance` chains to the representative type, writing the
/// terminal id back into every variable visited.
pub fn prune(arena: &mut TypeArena, id: TypeId) -> TypeId {
    let next = match arena.get(id) {
        Type::Var {
            instance: Some(inst),
            ..
        } => *inst,
        _ => return id,
    };
    let root = prune(arena, next);
    if let Type::Var { instance, .. } = arena.get_mut(id) {
        *instance = Some(root);
    }
    root
}

/// Non-compressing variant of `prune` for read-only contexts.
#[must_use]
pub fn resolve(arena: &TypeArena, mut id: TypeId) -> TypeId {
    loop {
        match arena.get(id) {
            Type::Var {
                instance: Some(inst),
                ..
            } => id = *inst,
            _ => return id,
        }
    }
}

/// Check whether the variable `var` occurs in the prune-traversal of `ty`.
///
/// Used by the occurs check before binding `var := ty`.
pub fn occurs_in(arena: &mut TypeArena, var: TypeId, ty: TypeId) -> bool {
    let ty = prune(arena, ty);
    if ty == var {
        return true;
    }
    let children = children_of(arena, ty);
    children.into_iter().any(|child| occurs_in(arena, var, child))
}

/// Collect the immediate child type ids of a node.
pub(crate) fn children_of(arena: &TypeArena, id: TypeId) -> Vec<TypeId> {
    let mut out = Vec::new();
    match arena.get(id) {
        Type::Var { .. }
        | Type::Prim(_)
        | Type::Lit(_)
        | Type::Unknown
        | Type::Never
        | Type::Any
        | Type::GlobalThis
        | Type::UniqueSymbol { .. }
        | Type::Wildcard
        | Type::Infer { .. }
        | Type::Intrinsic { .. } => {}
        Type::Ref { args, .. } => out.extend(args.iter().copied()),
        Type::Func(func) => {
            for tp in &func.type_params {
                out.extend(tp.constraint);
                out.extend(tp.default);
            }
            out.extend(func.params.iter().map(|p| p.ty));
            out.push(func.ret);
            out.extend(func.throws);
        }
        Type::Object(object) => {
            for elem in &object.elems {
                match elem {
                    ObjElem::Callable(func) | ObjElem::Constructor(func) => out.push(*func),
                    ObjElem::Method { func, .. } => out.push(*func),
                    ObjElem::Getter { ret, .. } => out.push(*ret),
                    ObjElem::Setter { param, .. } => out.push(*param),
                    ObjElem::Prop { ty, .. } => out.push(*ty),
                    ObjElem::Mapped(mapped) => {
                        out.push(mapped.constraint);
                        out.extend(mapped.name_remap);
                        out.push(mapped.value);
                    }
                    ObjElem::Spread(ty) => out.push(*ty),
                }
            }
            out.extend(object.extends.iter().copied());
        }
        Type::Tuple(elems) | Type::Union(elems) | Type::Intersection(elems) => {
            out.extend(elems.iter().copied());
        }
        Type::Rest(inner) | Type::KeyOf(inner) | Type::Mutable(inner) => out.push(*inner),
        Type::IndexedAccess { target, index } => {
            out.push(*target);
            out.push(*index);
        }
        Type::Cond {
            check,
            extends,
            then_ty,
            else_ty,
        } => {
            out.push(*check);
            out.push(*extends);
            out.push(*then_ty);
            out.push(*else_ty);
        }
        Type::TemplateLit { types, .. } => out.extend(types.iter().copied()),
    }
    out
}

/// A replacing visitor over the type graph.
pub trait TypeFolder {
    /// Pre-order step. Returning `Some` replaces the node without
    /// descending into its children.
    fn enter(&mut self, arena: &mut TypeArena, id: TypeId) -> Option<TypeId> {
        let _ = (arena, id);
        None
    }

    /// Post-order step over the rebuilt node.
    fn exit(&mut self, arena: &mut TypeArena, id: TypeId) -> Option<TypeId> {
        let _ = (arena, id);
        None
    }
}

/// Fold a type bottom-up, rebuilding nodes whose children changed.
pub fn fold<F: TypeFolder>(folder: &mut F, arena: &mut TypeArena, id: TypeId) -> TypeId {
    let id = prune(arena, id);
    if let Some(replacement) = folder.enter(arena, id) {
        return replacement;
    }

    let node = arena.get(id).clone();
    let rebuilt = match node {
        Type::Var { .. }
        | Type::Prim(_)
        | Type::Lit(_)
        | Type::Unknown
        | Type::Never
        | Type::Any
        | Type::GlobalThis
        | Type::UniqueSymbol { .. }
        | Type::Wildcard
        | Type::Infer { .. }
        | Type::Intrinsic { .. } => id,
        Type::Ref { name, alias, args } => {
            let new_args: TypeList = args.iter().map(|a| fold(folder, arena, *a)).collect();
            if new_args == args {
                id
            } else {
                arena.alloc(Type::Ref {
                    name,
                    alias,
                    args: new_args,
                })
            }
        }
        Type::Func(func) => {
            let new_func = fold_func(folder, arena, &func);
            if new_func == func {
                id
            } else {
                arena.alloc(Type::Func(new_func))
            }
        }
        Type::Object(object) => {
            let new_object = fold_object(folder, arena, &object);
            if new_object == object {
                id
            } else {
                arena.alloc(Type::Object(new_object))
            }
        }
        Type::Tuple(elems) => {
            let new_elems: TypeList = elems.iter().map(|e| fold(folder, arena, *e)).collect();
            if new_elems == elems {
                id
            } else {
                arena.alloc(Type::Tuple(new_elems))
            }
        }
        Type::Union(elems) => {
            let new_elems: TypeList = elems.iter().map(|e| fold(folder, arena, *e)).collect();
            if new_elems == elems {
                id
            } else {
                arena.union(new_elems)
            }
        }
        Type::Intersection(elems) => {
            let new_elems: TypeList = elems.iter().map(|e| fold(folder, arena, *e)).collect();
            if new_elems == elems {
                id
            } else {
                arena.intersection(new_elems)
            }
        }
        Type::Rest(inner) => {
            let new_inner = fold(folder, arena, inner);
            if new_inner == inner {
                id
            } else {
                arena.alloc(Type::Rest(new_inner))
            }
        }
        Type::KeyOf(inner) => {
            let new_inner = fold(folder, arena, inner);
            if new_inner == inner {
                id
            } else {
                arena.alloc(Type::KeyOf(new_inner))
            }
        }
        Type::Mutable(inner) => {
            let new_inner = fold(folder, arena, inner);
            if new_inner == inner {
                id
            } else {
                arena.alloc(Type::Mutable(new_inner))
            }
        }
        Type::IndexedAccess { target, index } => {
            let new_target = fold(folder, arena, target);
            let new_index = fold(folder, arena, index);
            if new_target == target && new_index == index {
                id
            } else {
                arena.alloc(Type::IndexedAccess {
                    target: new_target,
                    index: new_index,
                })
            }
        }
        Type::Cond {
            check,
            extends,
            then_ty,
            else_ty,
        } => {
            let new_check = fold(folder, arena, check);
            let new_extends = fold(folder, arena, extends);
            let new_then = fold(folder, arena, then_ty);
            let new_else = fold(folder, arena, else_ty);
            if new_check == check
                && new_extends == extends
                && new_then == then_ty
                && new_else == else_ty
            {
                id
            } else {
                arena.alloc(Type::Cond {
                    check: new_check,
                    extends: new_extends,
                    then_ty: new_then,
                    else_ty: new_else,
                })
            }
        }
        Type::TemplateLit { quasis, types } => {
            let new_types: Vec<TypeId> = types.iter().map(|t| fold(folder, arena, *t)).collect();
            if new_types == types {
                id
            } else {
                arena.alloc(Type::TemplateLit {
                    quasis,
                    types: new_types,
                })
            }
        }
    };

    folder.exit(arena, rebuilt).unwrap_or(rebuilt)
}

fn fold_func<F: TypeFolder>(folder: &mut F, arena: &mut TypeArena, func: &FuncType) -> FuncType {
    let mut new_func = func.clone();
    for tp in &mut new_func.type_params {
        tp.constraint = tp.constraint.map(|c| fold(folder, arena, c));
        tp.default = tp.default.map(|d| fold(folder, arena, d));
    }
    for param in &mut new_func.params {
        param.ty = fold(folder, arena, param.ty);
    }
    new_func.ret = fold(folder, arena, func.ret);
    new_func.throws = func.throws.map(|t| fold(folder, arena, t));
    new_func
}

fn fold_object<F: TypeFolder>(
    folder: &mut F,
    arena: &mut TypeArena,
    object: &ObjectType,
) -> ObjectType {
    let mut new_object = object.clone();
    for elem in &mut new_object.elems {
        *elem = match elem {
            ObjElem::Callable(func) => ObjElem::Callable(fold(folder, arena, *func)),
            ObjElem::Constructor(func) => ObjElem::Constructor(fold(folder, arena, *func)),
            ObjElem::Method { name, func } => ObjElem::Method {
                name: name.clone(),
                func: fold(folder, arena, *func),
            },
            ObjElem::Getter { name, ret } => ObjElem::Getter {
                name: name.clone(),
                ret: fold(folder, arena, *ret),
            },
            ObjElem::Setter { name, param } => ObjElem::Setter {
                name: name.clone(),
                param: fold(folder, arena, *param),
            },
            ObjElem::Prop {
                name,
                optional,
                readonly,
                ty,
            } => ObjElem::Prop {
                name: name.clone(),
                optional: *optional,
                readonly: *readonly,
                ty: fold(folder, arena, *ty),
            },
            ObjElem::Mapped(mapped) => ObjElem::Mapped(MappedElem {
                type_param: mapped.type_param.clone(),
                constraint: fold(folder, arena, mapped.constraint),
                name_remap: mapped.name_remap.map(|r| fold(folder, arena, r)),
                value: fold(folder, arena, mapped.value),
                optional: mapped.optional,
                readonly: mapped.readonly,
            }),
            ObjElem::Spread(ty) => ObjElem::Spread(fold(folder, arena, *ty)),
        };
    }
    for parent in &mut new_object.extends {
        *parent = fold(folder, arena, *parent);
    }
    new_object
}

#[cfg(test)]
#[path = "tests/visitor_tests.rs"]
mod tests;
