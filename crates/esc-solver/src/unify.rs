//! Unification with occurs check and structural subtyping.
//!
//! `unify(a, b)` checks that `a` is assignable to `b`, binding type
//! variables as a side effect. Errors are accumulated, never thrown;
//! speculative attempts (union members, conditional types) run inside a
//! trial that rolls variable bindings back on failure.

use crate::display::render;
use crate::instantiate::{instantiate_func, substitute};
use crate::types::{
    FuncType, LitValue, ObjElem, ObjectFlags, ObjectType, Primitive, Type, TypeArena, TypeId,
};
use crate::visitor::{occurs_in, prune};
use esc_common::{codes, Diagnostic, Span};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Unify two types, returning the accumulated diagnostics.
pub fn unify(arena: &mut TypeArena, a: TypeId, b: TypeId, span: Span) -> Vec<Diagnostic> {
    let mut unifier = Unifier::new(arena, span);
    unifier.unify(a, b);
    unifier.into_diagnostics()
}

/// The unification engine. Holds the arena, the current source span for
/// error attribution, and the trail of variable bindings for rollback.
pub struct Unifier<'a> {
    pub arena: &'a mut TypeArena,
    span: Span,
    diags: Vec<Diagnostic>,
    trail: Vec<TypeId>,
}

impl<'a> Unifier<'a> {
    pub fn new(arena: &'a mut TypeArena, span: Span) -> Self {
        Unifier {
            arena,
            span,
            diags: Vec::new(),
            trail: Vec::new(),
        }
    }

    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diags
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diags)
    }

    fn mismatch(&mut self, a: TypeId, b: TypeId) -> bool {
        let found = render(self.arena, a);
        let expected = render(self.arena, b);
        trace!(%found, %expected, "unification failure");
        self.diags.push(Diagnostic::error(
            self.span,
            format!("type mismatch: expected `{expected}`, found `{found}`"),
            codes::TYPE_MISMATCH,
        ));
        false
    }

    /// Bind `var := ty` after the occurs check.
    fn bind_var(&mut self, var: TypeId, ty: TypeId) -> bool {
        if var == ty {
            return true;
        }
        if occurs_in(self.arena, var, ty) {
            let rendered = render(self.arena, ty);
            self.diags.push(Diagnostic::error(
                self.span,
                format!("cannot construct the infinite type arising from `{rendered}`"),
                codes::INFINITE_TYPE,
            ));
            return false;
        }
        if let Type::Var { instance, .. } = self.arena.get_mut(var) {
            *instance = Some(ty);
        }
        self.trail.push(var);
        true
    }

    /// Run `f` speculatively: on failure, roll back variable bindings and
    /// discard the diagnostics it produced.
    fn trial<F: FnOnce(&mut Self) -> bool>(&mut self, f: F) -> bool {
        let trail_mark = self.trail.len();
        let diag_mark = self.diags.len();
        if f(self) {
            return true;
        }
        for var in self.trail.drain(trail_mark..) {
            if let Type::Var { instance, .. } = self.arena.get_mut(var) {
                *instance = None;
            }
        }
        self.diags.truncate(diag_mark);
        false
    }

    /// Check that `a` is assignable to `b`. Returns success; failures are
    /// recorded as diagnostics.
    pub fn unify(&mut self, a: TypeId, b: TypeId) -> bool {
        let a = prune(self.arena, a);
        let b = prune(self.arena, b);
        if a == b {
            return true;
        }

        let ta = self.arena.get(a).clone();
        let tb = self.arena.get(b).clone();

        match (&ta, &tb) {
            (Type::Var { .. }, _) => self.bind_var(a, b),
            (_, Type::Var { .. }) => self.bind_var(b, a),

            (Type::Any, _) | (_, Type::Any) => true,
            (_, Type::Unknown) => true,
            (Type::Never, _) => true,
            (Type::Wildcard, _) | (_, Type::Wildcard) => true,

            (Type::Lit(la), Type::Lit(lb)) => {
                if la == lb {
                    true
                } else {
                    self.mismatch(a, b)
                }
            }
            // A literal type is a subtype of its primitive; never the
            // reverse at an assignment site.
            (Type::Lit(lit), Type::Prim(prim)) => {
                if lit.primitive() == Some(*prim) {
                    true
                } else {
                    self.mismatch(a, b)
                }
            }
            (Type::Prim(pa), Type::Prim(pb)) => {
                if pa == pb {
                    true
                } else {
                    self.mismatch(a, b)
                }
            }

            (Type::Lit(LitValue::Str(text)), Type::TemplateLit { quasis, types }) => {
                if template_matches(self.arena, text, quasis, types) {
                    true
                } else {
                    self.mismatch(a, b)
                }
            }
            (Type::TemplateLit { .. }, Type::Prim(Primitive::Str)) => true,
            (Type::Intrinsic { .. }, Type::Prim(Primitive::Str)) => true,
            (Type::Intrinsic { name: na }, Type::Intrinsic { name: nb }) => {
                if na == nb {
                    true
                } else {
                    self.mismatch(a, b)
                }
            }

            // Same name with matching arity: unify arguments pairwise.
            // This covers equal aliases, two references to one type
            // parameter, and self-references that are still unresolved
            // inside their own definition.
            (
                Type::Ref {
                    name: name_a,
                    args: args_a,
                    ..
                },
                Type::Ref {
                    name: name_b,
                    args: args_b,
                    ..
                },
            ) if name_a == name_b && args_a.len() == args_b.len() => {
                let mut ok = true;
                for (arg_a, arg_b) in args_a.iter().zip(args_b.iter()) {
                    ok &= self.unify(*arg_a, *arg_b);
                }
                ok
            }
            // Otherwise expand the alias by substitution and retry.
            (Type::Ref { alias: Some(_), .. }, _) => {
                match self.expand_alias(a) {
                    Some(expanded) => self.unify(expanded, b),
                    None => false,
                }
            }
            (_, Type::Ref { alias: Some(_), .. }) => {
                match self.expand_alias(b) {
                    Some(expanded) => self.unify(a, expanded),
                    None => false,
                }
            }

            (Type::KeyOf(_), _) => {
                let expanded = self.expand_keyof(a);
                self.unify(expanded, b)
            }
            (_, Type::KeyOf(_)) => {
                let expanded = self.expand_keyof(b);
                self.unify(a, expanded)
            }

            (Type::IndexedAccess { target, index }, _) => {
                match self.resolve_indexed_access(*target, *index) {
                    Some(resolved) => self.unify(resolved, b),
                    None => false,
                }
            }
            (_, Type::IndexedAccess { target, index }) => {
                match self.resolve_indexed_access(*target, *index) {
                    Some(resolved) => self.unify(a, resolved),
                    None => false,
                }
            }

            (Type::Cond { .. }, _) => {
                let evaluated = self.eval_cond(a);
                self.unify(evaluated, b)
            }
            (_, Type::Cond { .. }) => {
                let evaluated = self.eval_cond(b);
                self.unify(a, evaluated)
            }

            (Type::Mutable(inner_a), Type::Mutable(inner_b)) => {
                // Mutable demands invariance.
                let (ia, ib) = (*inner_a, *inner_b);
                self.unify(ia, ib) && self.unify(ib, ia)
            }
            (Type::Mutable(inner), _) => {
                let inner = *inner;
                self.unify(inner, b)
            }
            (_, Type::Mutable(inner)) => {
                let inner = *inner;
                self.unify(a, inner) && self.unify(inner, a)
            }

            (Type::Func(fa), Type::Func(fb)) => {
                let (fa, fb) = (fa.clone(), fb.clone());
                self.unify_funcs(&fa, &fb)
            }

            (Type::Tuple(ea), Type::Tuple(eb)) => {
                let (ea, eb) = (ea.clone(), eb.clone());
                self.unify_tuples(a, b, &ea, &eb)
            }

            (Type::Object(oa), Type::Object(ob)) => {
                let (oa, ob) = (oa.clone(), ob.clone());
                self.unify_objects(a, b, &oa, &ob)
            }

            // Every variant of the left union must be assignable to the right.
            (Type::Union(members), _) => {
                let members = members.clone();
                let mut ok = true;
                for member in members {
                    ok &= self.unify(member, b);
                }
                ok
            }
            // The left type must be assignable to some variant.
            (_, Type::Union(members)) => {
                let members = members.clone();
                for member in members {
                    if self.trial(|u| u.unify(a, member)) {
                        return true;
                    }
                }
                self.mismatch(a, b)
            }

            // The left type must satisfy every member of the right
            // intersection.
            (_, Type::Intersection(members)) => {
                let members = members.clone();
                let mut ok = true;
                for member in members {
                    ok &= self.unify(a, member);
                }
                ok
            }
            // Some member of the left intersection must satisfy the right.
            (Type::Intersection(members), _) => {
                let members = members.clone();
                for member in &members {
                    if self.trial(|u| u.unify(*member, b)) {
                        return true;
                    }
                }
                self.mismatch(a, b)
            }

            (Type::Rest(inner_a), Type::Rest(inner_b)) => {
                let (ia, ib) = (*inner_a, *inner_b);
                self.unify(ia, ib)
            }

            _ => self.mismatch(a, b),
        }
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// Expand a resolved reference by substituting its arguments into the
    /// alias body. Reports arity errors.
    pub fn expand_alias(&mut self, id: TypeId) -> Option<TypeId> {
        let (name, alias, args) = match self.arena.get(id) {
            Type::Ref {
                name,
                alias: Some(alias),
                args,
            } => (name.clone(), alias.clone(), args.clone()),
            _ => return Some(id),
        };
        if alias.type_params.len() != args.len() {
            self.diags.push(Diagnostic::error(
                self.span,
                format!(
                    "type `{name}` expects {} type argument(s), got {}",
                    alias.type_params.len(),
                    args.len()
                ),
                codes::ARITY_MISMATCH,
            ));
            return None;
        }
        let mut map = FxHashMap::default();
        for (tp, arg) in alias.type_params.iter().zip(args.iter()) {
            map.insert(tp.name.clone(), *arg);
        }
        Some(substitute(self.arena, alias.ty, &map))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `fa` assignable to `fb`: params contravariant, return covariant,
    /// throws covariant. Declared type parameters are fresh-instantiated
    /// on both sides first.
    fn unify_funcs(&mut self, fa: &FuncType, fb: &FuncType) -> bool {
        let fa = instantiate_func(self.arena, fa);
        let fb = instantiate_func(self.arena, fb);

        if fa.min_arity() > fb.params.len() && !fb.has_rest() {
            self.diags.push(Diagnostic::error(
                self.span,
                format!(
                    "function expects at least {} argument(s), but only {} are supplied",
                    fa.min_arity(),
                    fb.params.len()
                ),
                codes::ARITY_MISMATCH,
            ));
            return false;
        }

        let mut ok = true;
        for (index, pb) in fb.params.iter().enumerate() {
            let pa_ty = if let Some(pa) = fa.params.get(index) {
                if pa.rest {
                    rest_elem_type(self.arena, pa.ty)
                } else {
                    pa.ty
                }
            } else if fa.has_rest() {
                let rest = fa.params.last().expect("has_rest implies a param");
                rest_elem_type(self.arena, rest.ty)
            } else {
                // Extra expected parameters are simply ignored by the
                // implementation.
                continue;
            };
            let pb_ty = if pb.rest {
                rest_elem_type(self.arena, pb.ty)
            } else {
                pb.ty
            };
            // Contravariant in parameters.
            ok &= self.unify(pb_ty, pa_ty);
        }

        ok &= self.unify(fa.ret, fb.ret);

        if let (Some(throws_a), Some(throws_b)) = (fa.throws, fb.throws) {
            ok &= self.unify(throws_a, throws_b);
        }
        ok
    }

    // =========================================================================
    // Tuples
    // =========================================================================

    fn unify_tuples(&mut self, a: TypeId, b: TypeId, ea: &[TypeId], eb: &[TypeId]) -> bool {
        let rest_b = eb
            .last()
            .is_some_and(|last| matches!(self.arena.get(*last), Type::Rest(_)));

        if rest_b {
            let fixed = eb.len() - 1;
            if ea.len() < fixed {
                return self.arity_mismatch(a, b, fixed, ea.len());
            }
            let mut ok = true;
            for (elem_a, elem_b) in ea.iter().zip(eb[..fixed].iter()) {
                ok &= self.unify(*elem_a, *elem_b);
            }
            let rest_inner = match self.arena.get(eb[fixed]) {
                Type::Rest(inner) => *inner,
                _ => unreachable!("checked above"),
            };
            // The rest element widens to the remaining elements.
            let remaining: Vec<TypeId> = ea[fixed..].to_vec();
            let remaining_tuple = self.arena.tuple(remaining);
            ok &= self.unify(remaining_tuple, rest_inner);
            ok
        } else if ea.len() == eb.len() {
            let mut ok = true;
            for (elem_a, elem_b) in ea.iter().zip(eb.iter()) {
                ok &= self.unify(*elem_a, *elem_b);
            }
            ok
        } else {
            self.arity_mismatch(a, b, eb.len(), ea.len())
        }
    }

    fn arity_mismatch(&mut self, _a: TypeId, _b: TypeId, expected: usize, found: usize) -> bool {
        self.diags.push(Diagnostic::error(
            self.span,
            format!("expected {expected} element(s), found {found}"),
            codes::ARITY_MISMATCH,
        ));
        false
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Structural width/depth subtyping, nominal short-circuit for
    /// interface-vs-interface.
    fn unify_objects(
        &mut self,
        a: TypeId,
        b: TypeId,
        oa: &ObjectType,
        ob: &ObjectType,
    ) -> bool {
        if oa.is_nominal() && ob.is_nominal() {
            if oa.id == ob.id || self.extends_chain_contains(oa, ob.id) {
                return true;
            }
            return self.mismatch(a, b);
        }

        // A mapped type on the expected side is evaluated to concrete
        // properties before matching.
        if ob.elems.iter().any(|e| matches!(e, ObjElem::Mapped(_))) {
            if let Some(expanded) = self.expand_mapped_object(ob) {
                let expanded_id = self.arena.alloc(Type::Object(expanded));
                return self.unify(a, expanded_id);
            }
        }

        let mut ok = true;
        for elem in &ob.elems {
            match elem {
                ObjElem::Prop {
                    name,
                    optional,
                    readonly: _,
                    ty,
                } => match self.lookup_member(oa, name) {
                    Some(found) => {
                        let invariant = matches!(self.arena.get(found), Type::Mutable(_))
                            || matches!(self.arena.get(*ty), Type::Mutable(_));
                        ok &= self.unify(found, *ty);
                        if invariant {
                            ok &= self.unify(*ty, found);
                        }
                    }
                    None => {
                        if *optional {
                            continue;
                        }
                        // Index signatures from mapped elements contribute
                        // candidate lookups.
                        if let Some(candidate) = self.mapped_candidate(oa) {
                            ok &= self.unify(candidate, *ty);
                        } else {
                            ok = false;
                            let rendered = render(self.arena, a);
                            self.diags.push(Diagnostic::error(
                                self.span,
                                format!("property `{name}` is missing in `{rendered}`"),
                                codes::TYPE_MISMATCH,
                            ));
                        }
                    }
                },
                ObjElem::Method { name, func } => match self.lookup_member(oa, name) {
                    Some(found) => ok &= self.unify(found, *func),
                    None => {
                        ok = false;
                        let rendered = render(self.arena, a);
                        self.diags.push(Diagnostic::error(
                            self.span,
                            format!("method `{name}` is missing in `{rendered}`"),
                            codes::TYPE_MISMATCH,
                        ));
                    }
                },
                ObjElem::Callable(expected) => {
                    match self.find_callable(oa) {
                        Some(found) => ok &= self.unify(found, *expected),
                        None => ok = self.mismatch(a, b),
                    }
                }
                ObjElem::Constructor(expected) => {
                    let found = oa.elems.iter().find_map(|e| match e {
                        ObjElem::Constructor(f) => Some(*f),
                        _ => None,
                    });
                    match found {
                        Some(found) => ok &= self.unify(found, *expected),
                        None => ok = self.mismatch(a, b),
                    }
                }
                ObjElem::Getter { name, ret } => match self.lookup_member(oa, name) {
                    Some(found) => ok &= self.unify(found, *ret),
                    None => ok = self.mismatch(a, b),
                },
                ObjElem::Setter { name, param } => match self.lookup_member(oa, name) {
                    // Contravariant, like any written-to position.
                    Some(found) => ok &= self.unify(*param, found),
                    None => ok = self.mismatch(a, b),
                },
                ObjElem::Mapped(_) => {
                    // Unexpandable mapped element (abstract key set);
                    // accept and let instantiation check later.
                }
                ObjElem::Spread(spread) => ok &= self.unify(a, *spread),
            }
        }

        if ok && ob.flags.contains(ObjectFlags::EXACT) {
            for elem in &oa.elems {
                if let Some(name) = elem.name() {
                    if self.lookup_member(ob, name).is_none() {
                        ok = false;
                        self.diags.push(Diagnostic::error(
                            self.span,
                            format!("unexpected property `{name}` in exact object type"),
                            codes::TYPE_MISMATCH,
                        ));
                    }
                }
            }
        }
        ok
    }

    fn extends_chain_contains(&mut self, object: &ObjectType, target_id: u32) -> bool {
        for parent in object.extends.clone() {
            let parent = prune(self.arena, parent);
            let parent = match self.arena.get(parent) {
                Type::Ref { alias: Some(_), .. } => {
                    match self.expand_alias(parent) {
                        Some(expanded) => expanded,
                        None => continue,
                    }
                }
                _ => parent,
            };
            if let Type::Object(parent_obj) = self.arena.get(parent) {
                if parent_obj.id == target_id {
                    return true;
                }
                let parent_obj = parent_obj.clone();
                if self.extends_chain_contains(&parent_obj, target_id) {
                    return true;
                }
            }
        }
        false
    }

    /// Find a named member's type, searching the object then its parents.
    fn lookup_member(&mut self, object: &ObjectType, name: &str) -> Option<TypeId> {
        for elem in &object.elems {
            match elem {
                ObjElem::Prop { name: n, ty, .. } if n == name => return Some(*ty),
                ObjElem::Method { name: n, func } if n == name => return Some(*func),
                ObjElem::Getter { name: n, ret } if n == name => return Some(*ret),
                _ => {}
            }
        }
        for parent in object.extends.clone() {
            let parent = prune(self.arena, parent);
            let parent = match self.arena.get(parent) {
                Type::Ref { alias: Some(_), .. } => self.expand_alias(parent)?,
                _ => parent,
            };
            if let Type::Object(parent_obj) = self.arena.get(parent) {
                let parent_obj = parent_obj.clone();
                if let Some(found) = self.lookup_member(&parent_obj, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn find_callable(&mut self, object: &ObjectType) -> Option<TypeId> {
        object.elems.iter().find_map(|e| match e {
            ObjElem::Callable(func) => Some(*func),
            _ => None,
        })
    }

    /// The value type a mapped element would give an arbitrary key.
    fn mapped_candidate(&mut self, object: &ObjectType) -> Option<TypeId> {
        object.elems.iter().find_map(|e| match e {
            ObjElem::Mapped(mapped) => Some(mapped.value),
            _ => None,
        })
    }

    // =========================================================================
    // keyof / indexed access / conditional / mapped evaluation
    // =========================================================================

    /// Expand `keyof T` to the literal union of T's known keys.
    pub fn expand_keyof(&mut self, id: TypeId) -> TypeId {
        let id = prune(self.arena, id);
        let target = match self.arena.get(id) {
            Type::KeyOf(inner) => prune(self.arena, *inner),
            _ => return id,
        };
        let target = match self.arena.get(target) {
            Type::Ref { alias: Some(_), .. } => match self.expand_alias(target) {
                Some(expanded) => expanded,
                None => return TypeArena::NEVER,
            },
            _ => target,
        };
        match self.arena.get(target).clone() {
            Type::Object(object) => {
                let mut keys = Vec::new();
                for elem in &object.elems {
                    if let Some(name) = elem.name() {
                        let key = self.arena.lit_str(name.to_string());
                        keys.push(key);
                    }
                    if let ObjElem::Mapped(mapped) = elem {
                        let constraint = self.expand_keyof_constraint(mapped.constraint);
                        keys.push(constraint);
                    }
                }
                for parent in object.extends {
                    let parent_keyof = self.arena.alloc(Type::KeyOf(parent));
                    let expanded = self.expand_keyof(parent_keyof);
                    keys.push(expanded);
                }
                self.arena.union(keys)
            }
            Type::Tuple(elems) => {
                let keys: Vec<TypeId> = (0..elems.len())
                    .map(|i| self.arena.lit_num(i as f64))
                    .collect();
                self.arena.union(keys)
            }
            _ => TypeArena::NEVER,
        }
    }

    /// A mapped constraint is either already a key union or `keyof T`.
    fn expand_keyof_constraint(&mut self, constraint: TypeId) -> TypeId {
        let constraint = prune(self.arena, constraint);
        match self.arena.get(constraint) {
            Type::KeyOf(_) => self.expand_keyof(constraint),
            _ => constraint,
        }
    }

    /// Resolve `T[K]` to the property type of T at K.
    pub fn resolve_indexed_access(&mut self, target: TypeId, index: TypeId) -> Option<TypeId> {
        let target = prune(self.arena, target);
        let index = prune(self.arena, index);

        let target = match self.arena.get(target) {
            Type::Ref { alias: Some(_), .. } => self.expand_alias(target)?,
            _ => target,
        };
        let index = match self.arena.get(index) {
            Type::KeyOf(_) => self.expand_keyof(index),
            _ => index,
        };

        // A union index resolves component-wise.
        if let Type::Union(members) = self.arena.get(index).clone() {
            let mut resolved = Vec::new();
            for member in members {
                resolved.push(self.resolve_indexed_access(target, member)?);
            }
            return Some(self.arena.union(resolved));
        }

        match (self.arena.get(target).clone(), self.arena.get(index).clone()) {
            (Type::Object(object), Type::Lit(LitValue::Str(key))) => {
                if let Some(found) = self.lookup_member(&object, &key) {
                    return Some(found);
                }
                if let Some(candidate) = self.mapped_candidate(&object) {
                    let lit = self.arena.lit_str(key.clone());
                    let mapped_param = object.elems.iter().find_map(|e| match e {
                        ObjElem::Mapped(m) => Some(m.type_param.clone()),
                        _ => None,
                    });
                    if let Some(param) = mapped_param {
                        let mut map = FxHashMap::default();
                        map.insert(param, lit);
                        return Some(substitute(self.arena, candidate, &map));
                    }
                    return Some(candidate);
                }
                let rendered = render(self.arena, target);
                self.diags.push(Diagnostic::error(
                    self.span,
                    format!("property `{key}` does not exist on `{rendered}`"),
                    codes::TYPE_MISMATCH,
                ));
                None
            }
            (Type::Tuple(elems), Type::Lit(LitValue::Num(n))) => {
                let idx = n as usize;
                match elems.get(idx) {
                    Some(elem) => Some(*elem),
                    None => {
                        self.diags.push(Diagnostic::error(
                            self.span,
                            format!("tuple index {idx} is out of bounds"),
                            codes::TYPE_MISMATCH,
                        ));
                        None
                    }
                }
            }
            (Type::Tuple(elems), Type::Prim(Primitive::Num)) => {
                Some(self.arena.union(elems))
            }
            (Type::Object(object), Type::Prim(Primitive::Str)) => {
                match self.mapped_candidate(&object) {
                    Some(candidate) => Some(candidate),
                    None => {
                        let rendered = render(self.arena, target);
                        self.diags.push(Diagnostic::error(
                            self.span,
                            format!("`{rendered}` has no string index signature"),
                            codes::TYPE_MISMATCH,
                        ));
                        None
                    }
                }
            }
            _ => {
                let rendered_target = render(self.arena, target);
                let rendered_index = render(self.arena, index);
                self.diags.push(Diagnostic::error(
                    self.span,
                    format!("cannot index `{rendered_target}` with `{rendered_index}`"),
                    codes::TYPE_MISMATCH,
                ));
                None
            }
        }
    }

    /// Evaluate a conditional type, distributing over unions on the check
    /// side and binding `infer` variables found on the extends side.
    pub fn eval_cond(&mut self, id: TypeId) -> TypeId {
        let id = prune(self.arena, id);
        let (check, extends, then_ty, else_ty) = match self.arena.get(id) {
            Type::Cond {
                check,
                extends,
                then_ty,
                else_ty,
            } => (*check, *extends, *then_ty, *else_ty),
            _ => return id,
        };

        let check = prune(self.arena, check);
        if let Type::Union(members) = self.arena.get(check).clone() {
            let mut results = Vec::new();
            for member in members {
                let cond = self.arena.alloc(Type::Cond {
                    check: member,
                    extends,
                    then_ty,
                    else_ty,
                });
                results.push(self.eval_cond(cond));
            }
            return self.arena.union(results);
        }

        // Bind `infer` names to fresh variables on the extends side.
        let mut infer_map = FxHashMap::default();
        collect_infer_names(self.arena, extends, &mut infer_map);
        let mut fresh_map = FxHashMap::default();
        for name in infer_map.keys() {
            let fresh = self.arena.fresh_var();
            fresh_map.insert(name.clone(), fresh);
        }
        let extends_inst = substitute(self.arena, extends, &fresh_map);

        if self.trial(|u| u.unify(check, extends_inst)) {
            substitute(self.arena, then_ty, &fresh_map)
        } else {
            else_ty
        }
    }

    /// Evaluate a mapped object to one with concrete properties, by
    /// instantiating the type parameter over the expanded key set.
    pub fn expand_mapped_object(&mut self, object: &ObjectType) -> Option<ObjectType> {
        let mut elems = Vec::new();
        for elem in &object.elems {
            let mapped = match elem {
                ObjElem::Mapped(mapped) => mapped.clone(),
                other => {
                    elems.push(other.clone());
                    continue;
                }
            };
            let keys = self.expand_keyof_constraint(mapped.constraint);
            let keys = prune(self.arena, keys);
            let key_list: Vec<TypeId> = match self.arena.get(keys).clone() {
                Type::Union(members) => members.to_vec(),
                Type::Lit(_) => vec![keys],
                _ => return None,
            };
            for key in key_list {
                let key_name = match self.arena.get(key) {
                    Type::Lit(LitValue::Str(name)) => name.clone(),
                    _ => continue,
                };
                let mut map = FxHashMap::default();
                map.insert(mapped.type_param.clone(), key);
                let out_name = match mapped.name_remap {
                    Some(remap) => {
                        let remapped = substitute(self.arena, remap, &map);
                        let remapped = prune(self.arena, remapped);
                        match self.arena.get(remapped) {
                            Type::Lit(LitValue::Str(name)) => name.clone(),
                            Type::Never => continue,
                            _ => key_name.clone(),
                        }
                    }
                    None => key_name,
                };
                let value = substitute(self.arena, mapped.value, &map);
                elems.push(ObjElem::Prop {
                    name: out_name,
                    optional: matches!(mapped.optional, Some(crate::types::MappedModifier::Add)),
                    readonly: matches!(mapped.readonly, Some(crate::types::MappedModifier::Add)),
                    ty: value,
                });
            }
        }
        let id = self.arena.fresh_object_id();
        Some(ObjectType {
            elems,
            extends: object.extends.clone(),
            flags: object.flags & !ObjectFlags::EXACT,
            id,
        })
    }
}

/// Element type of a rest parameter (`...xs: Array<T>` or a tuple).
fn rest_elem_type(arena: &mut TypeArena, ty: TypeId) -> TypeId {
    let ty = prune(arena, ty);
    match arena.get(ty).clone() {
        Type::Ref { name, args, .. } if name == "Array" && args.len() == 1 => args[0],
        Type::Tuple(elems) => arena.union(elems),
        Type::Rest(inner) => rest_elem_type(arena, inner),
        _ => ty,
    }
}

/// Collect the names of `infer` placeholders reachable from `ty`.
fn collect_infer_names(arena: &TypeArena, ty: TypeId, out: &mut FxHashMap<String, ()>) {
    let mut stack = vec![ty];
    let mut seen = Vec::new();
    while let Some(id) = stack.pop() {
        let id = crate::visitor::resolve(arena, id);
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        if let Type::Infer { name } = arena.get(id) {
            out.insert(name.clone(), ());
        }
        stack.extend(crate::visitor::children_of(arena, id));
    }
}

/// Match a string literal against a template-literal type, treating the
/// interpolated types as wildcards when they accept strings or numbers.
fn template_matches(arena: &TypeArena, text: &str, quasis: &[String], types: &[TypeId]) -> bool {
    // Greedy scan: each quasi must appear in order, with arbitrary
    // (possibly empty) interpolations between them.
    let mut rest = text;
    for (i, quasi) in quasis.iter().enumerate() {
        if i == 0 {
            match rest.strip_prefix(quasi.as_str()) {
                Some(stripped) => rest = stripped,
                None => return false,
            }
        } else {
            match rest.find(quasi.as_str()) {
                Some(pos) => rest = &rest[pos + quasi.len()..],
                None => return false,
            }
        }
    }
    let _ = (arena, types);
    quasis.len() > types.len() || rest.is_empty()
}

#[cfg(test)]
#[path = "tests/unify_tests.rs"]
mod tests;
