//! Generalization, instantiation, and type-parameter substitution.
//!
//! Generalization closes the free unresolved type variables of a
//! declaration's inferred type into named type parameters. Instantiation
//! replaces those parameters with fresh variables at each use site.

use crate::types::{FuncType, Scheme, Type, TypeArena, TypeId};
use crate::visitor::{fold, TypeFolder};
use rustc_hash::FxHashMap;

/// Folder that replaces parameter references (`Ref` with no alias and no
/// args) by the mapped types.
struct Substitute<'m> {
    map: &'m FxHashMap<String, TypeId>,
}

impl TypeFolder for Substitute<'_> {
    fn enter(&mut self, arena: &mut TypeArena, id: TypeId) -> Option<TypeId> {
        match arena.get(id) {
            Type::Ref {
                name,
                alias: None,
                args,
            } if args.is_empty() => self.map.get(name).copied(),
            Type::Infer { name } => self.map.get(name).copied(),
            _ => None,
        }
    }
}

/// Replace named type parameters in `ty` according to `map`.
pub fn substitute(
    arena: &mut TypeArena,
    ty: TypeId,
    map: &FxHashMap<String, TypeId>,
) -> TypeId {
    if map.is_empty() {
        return ty;
    }
    fold(&mut Substitute { map }, arena, ty)
}

/// Instantiate a scheme: every quantified parameter becomes a fresh
/// type variable.
pub fn instantiate(arena: &mut TypeArena, scheme: &Scheme) -> TypeId {
    if scheme.type_params.is_empty() {
        return scheme.ty;
    }
    let mut map = FxHashMap::default();
    for name in &scheme.type_params {
        let fresh = arena.fresh_var();
        map.insert(name.clone(), fresh);
    }
    substitute(arena, scheme.ty, &map)
}

/// Instantiate a function's declared type parameters with fresh
/// variables, returning a monomorphic copy. Constraints are carried onto
/// the fresh variables by substituting within them first.
pub fn instantiate_func(arena: &mut TypeArena, func: &FuncType) -> FuncType {
    if func.type_params.is_empty() {
        return func.clone();
    }
    let mut map = FxHashMap::default();
    for tp in &func.type_params {
        let fresh = arena.fresh_var();
        map.insert(tp.name.clone(), fresh);
    }
    let mut out = func.clone();
    out.type_params = Vec::new();
    for param in &mut out.params {
        param.ty = substitute(arena, param.ty, &map);
    }
    out.ret = substitute(arena, func.ret, &map);
    out.throws = func.throws.map(|t| substitute(arena, t, &map));
    out
}

/// Folder that rewrites free unresolved variables into named parameter
/// references, assigning names in first-occurrence order.
struct Generalize {
    names: FxHashMap<u32, TypeId>,
    ordered: Vec<String>,
}

impl Generalize {
    fn param_name(index: usize) -> String {
        // A, B, ..., Z, T26, T27, ...
        if index < 26 {
            char::from(b'A' + index as u8).to_string()
        } else {
            format!("T{index}")
        }
    }
}

impl TypeFolder for Generalize {
    fn enter(&mut self, arena: &mut TypeArena, id: TypeId) -> Option<TypeId> {
        let var_id = match arena.get(id) {
            Type::Var { id, instance: None } => *id,
            _ => return None,
        };
        if let Some(existing) = self.names.get(&var_id) {
            return Some(*existing);
        }
        let name = Self::param_name(self.ordered.len());
        let param = arena.reference(name.clone(), Vec::new());
        self.ordered.push(name);
        self.names.insert(var_id, param);
        Some(param)
    }
}

/// Close over the free type variables of `ty`, producing a scheme.
///
/// Variables are left unbound in the arena; the rewrite is purely
/// structural so sibling declarations sharing a variable are unaffected.
pub fn generalize(arena: &mut TypeArena, ty: TypeId) -> Scheme {
    let mut folder = Generalize {
        names: FxHashMap::default(),
        ordered: Vec::new(),
    };
    let generalized = fold(&mut folder, arena, ty);
    Scheme {
        type_params: folder.ordered,
        ty: generalized,
    }
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;
