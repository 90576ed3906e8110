use super::*;
use crate::display::TypeDisplay;
use crate::types::{
    FuncParam, FuncType, ObjElem, ObjectFlags, Type, TypeAlias, TypeArena, TypeId, TypeParamDef,
};
use crate::visitor::prune;
use esc_common::Span;
use std::sync::Arc;

fn show(arena: &TypeArena, id: TypeId) -> String {
    TypeDisplay::new(arena, id).to_string()
}

fn assert_unifies(arena: &mut TypeArena, a: TypeId, b: TypeId) {
    let diags = unify(arena, a, b, Span::dummy());
    assert!(
        diags.is_empty(),
        "expected `{}` to unify with `{}`, got: {:?}",
        show(arena, a),
        show(arena, b),
        diags
    );
}

fn assert_fails(arena: &mut TypeArena, a: TypeId, b: TypeId) {
    let diags = unify(arena, a, b, Span::dummy());
    assert!(
        !diags.is_empty(),
        "expected `{}` not to unify with `{}`",
        show(arena, a),
        show(arena, b),
    );
}

#[test]
fn test_prim_equality() {
    let mut arena = TypeArena::new();
    assert_unifies(&mut arena, TypeArena::NUM, TypeArena::NUM);
    assert_fails(&mut arena, TypeArena::NUM, TypeArena::STR);
}

#[test]
fn test_literal_subtype_of_primitive_is_directional() {
    let mut arena = TypeArena::new();
    let five = arena.lit_num(5.0);
    assert_unifies(&mut arena, five, TypeArena::NUM);
    assert_fails(&mut arena, TypeArena::NUM, five);
}

#[test]
fn test_lattice_constants() {
    let mut arena = TypeArena::new();
    // Never is assignable to anything.
    assert_unifies(&mut arena, TypeArena::NEVER, TypeArena::NUM);
    // Unknown accepts anything.
    assert_unifies(&mut arena, TypeArena::STR, TypeArena::UNKNOWN);
    assert_fails(&mut arena, TypeArena::UNKNOWN, TypeArena::STR);
    // Any unifies in both directions.
    assert_unifies(&mut arena, TypeArena::ANY, TypeArena::NUM);
    assert_unifies(&mut arena, TypeArena::NUM, TypeArena::ANY);
}

#[test]
fn test_var_binding_satisfies_both_endpoints() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    assert_unifies(&mut arena, var, TypeArena::NUM);
    // Round-trip: after success both endpoints prune to the same type.
    assert_eq!(prune(&mut arena, var), TypeArena::NUM);
    // Re-unification against the bound referent still succeeds.
    assert_unifies(&mut arena, var, TypeArena::NUM);
}

#[test]
fn test_occurs_check_refuses_infinite_type() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    let tuple = arena.tuple(vec![var]);
    let diags = unify(&mut arena, var, tuple, Span::dummy());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, esc_common::codes::INFINITE_TYPE);
    // The variable stays unbound.
    assert_eq!(prune(&mut arena, var), var);
}

#[test]
fn test_func_params_contravariant_return_covariant() {
    let mut arena = TypeArena::new();
    let five = arena.lit_num(5.0);
    // (x: number) => 5  ⊑  (x: 5) => number
    let wide = arena.func(vec![FuncParam::new("x", TypeArena::NUM)], five);
    let narrow = arena.func(vec![FuncParam::new("x", five)], TypeArena::NUM);
    assert_unifies(&mut arena, wide, narrow);
    assert_fails(&mut arena, narrow, wide);
}

#[test]
fn test_func_arity_optional_aware() {
    let mut arena = TypeArena::new();
    let two = arena.func(
        vec![
            FuncParam::new("a", TypeArena::NUM),
            FuncParam::new("b", TypeArena::NUM),
        ],
        TypeArena::NUM,
    );
    let one = arena.func(vec![FuncParam::new("a", TypeArena::NUM)], TypeArena::NUM);
    // A two-required-param function cannot stand in where one param is
    // supplied.
    assert_fails(&mut arena, two, one);
    // The reverse ignores the extra expected parameter.
    assert_unifies(&mut arena, one, two);
}

#[test]
fn test_generic_func_instantiated_fresh() {
    let mut arena = TypeArena::new();
    let param = arena.reference("T", Vec::new());
    let identity = arena.alloc(Type::Func(FuncType {
        type_params: vec![TypeParamDef {
            name: "T".to_string(),
            constraint: None,
            default: None,
        }],
        params: vec![FuncParam::new("x", param)],
        ret: param,
        throws: None,
    }));
    let num_to_num = arena.func(vec![FuncParam::new("x", TypeArena::NUM)], TypeArena::NUM);
    assert_unifies(&mut arena, identity, num_to_num);
    // The original polymorphic signature is untouched.
    assert_eq!(show(&arena, identity), "<T>(x: T) => T");
}

#[test]
fn test_tuple_pairwise_and_arity() {
    let mut arena = TypeArena::new();
    let a = arena.tuple(vec![TypeArena::NUM, TypeArena::STR]);
    let b = arena.tuple(vec![TypeArena::NUM, TypeArena::STR]);
    let c = arena.tuple(vec![TypeArena::NUM]);
    assert_unifies(&mut arena, a, b);
    assert_fails(&mut arena, a, c);
}

#[test]
fn test_tuple_rest_widens_remaining() {
    let mut arena = TypeArena::new();
    let three = arena.tuple(vec![TypeArena::NUM, TypeArena::STR, TypeArena::STR]);
    let rest_var = arena.fresh_var();
    let rest = arena.alloc(Type::Rest(rest_var));
    let pattern = arena.tuple(vec![TypeArena::NUM, rest]);
    assert_unifies(&mut arena, three, pattern);
    let bound = prune(&mut arena, rest_var);
    assert_eq!(show(&arena, bound), "[string, string]");
}

#[test]
fn test_object_width_subtyping() {
    let mut arena = TypeArena::new();
    let wide = arena.object(
        vec![
            ObjElem::Prop {
                name: "a".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::NUM,
            },
            ObjElem::Prop {
                name: "b".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::STR,
            },
        ],
        ObjectFlags::empty(),
    );
    let narrow = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    assert_unifies(&mut arena, wide, narrow);
    assert_fails(&mut arena, narrow, wide);
}

#[test]
fn test_object_missing_property_message() {
    let mut arena = TypeArena::new();
    let empty = arena.object(vec![], ObjectFlags::empty());
    let wants_a = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    let diags = unify(&mut arena, empty, wants_a, Span::dummy());
    assert!(diags[0].message.contains("property `a` is missing"));
}

#[test]
fn test_optional_property_may_be_absent() {
    let mut arena = TypeArena::new();
    let empty = arena.object(vec![], ObjectFlags::empty());
    let optional_a = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: true,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    assert_unifies(&mut arena, empty, optional_a);
}

#[test]
fn test_nominal_interfaces_by_id() {
    let mut arena = TypeArena::new();
    let flags = ObjectFlags::INTERFACE | ObjectFlags::NOMINAL;
    let foo = arena.object(vec![], flags);
    let bar = arena.object(vec![], flags);
    assert_fails(&mut arena, foo, bar);
    assert_unifies(&mut arena, foo, foo);
}

#[test]
fn test_nominal_interface_extends_chain() {
    let mut arena = TypeArena::new();
    let flags = ObjectFlags::INTERFACE | ObjectFlags::NOMINAL;
    let base = arena.object(vec![], flags);
    let derived_id = arena.fresh_object_id();
    let derived = arena.alloc(Type::Object(crate::types::ObjectType {
        elems: vec![],
        extends: vec![base],
        flags,
        id: derived_id,
    }));
    assert_unifies(&mut arena, derived, base);
    assert_fails(&mut arena, base, derived);
}

#[test]
fn test_union_assignability_both_directions() {
    let mut arena = TypeArena::new();
    let num_or_str = arena.union(vec![TypeArena::NUM, TypeArena::STR]);
    let num_str_bool = arena.union(vec![TypeArena::NUM, TypeArena::STR, TypeArena::BOOL]);
    assert_unifies(&mut arena, TypeArena::NUM, num_or_str);
    assert_unifies(&mut arena, num_or_str, num_str_bool);
    assert_fails(&mut arena, num_str_bool, num_or_str);
}

#[test]
fn test_intersection_target_requires_all_members() {
    let mut arena = TypeArena::new();
    let has_a = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    let has_b = arena.object(
        vec![ObjElem::Prop {
            name: "b".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::STR,
        }],
        ObjectFlags::empty(),
    );
    let both = arena.object(
        vec![
            ObjElem::Prop {
                name: "a".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::NUM,
            },
            ObjElem::Prop {
                name: "b".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::STR,
            },
        ],
        ObjectFlags::empty(),
    );
    let isect = arena.intersection(vec![has_a, has_b]);
    assert_unifies(&mut arena, both, isect);
    assert_fails(&mut arena, has_a, isect);
}

#[test]
fn test_alias_expansion_and_arity() {
    let mut arena = TypeArena::new();
    let param = arena.reference("T", Vec::new());
    let body = arena.tuple(vec![param, param]);
    let alias = Arc::new(TypeAlias {
        type_params: vec![TypeParamDef {
            name: "T".to_string(),
            constraint: None,
            default: None,
        }],
        ty: body,
    });
    let pair_of_num = arena.resolved_reference("Pair", alias.clone(), vec![TypeArena::NUM]);
    let expected = arena.tuple(vec![TypeArena::NUM, TypeArena::NUM]);
    assert_unifies(&mut arena, pair_of_num, expected);

    let wrong_arity = arena.resolved_reference("Pair", alias, vec![]);
    let diags = unify(&mut arena, wrong_arity, expected, Span::dummy());
    assert_eq!(diags[0].code, esc_common::codes::ARITY_MISMATCH);
}

#[test]
fn test_same_alias_unifies_args_pairwise() {
    let mut arena = TypeArena::new();
    let param = arena.reference("T", Vec::new());
    let alias = Arc::new(TypeAlias {
        type_params: vec![TypeParamDef {
            name: "T".to_string(),
            constraint: None,
            default: None,
        }],
        ty: param,
    });
    let var = arena.fresh_var();
    let boxed_var = arena.resolved_reference("Box", alias.clone(), vec![var]);
    let boxed_num = arena.resolved_reference("Box", alias, vec![TypeArena::NUM]);
    assert_unifies(&mut arena, boxed_var, boxed_num);
    assert_eq!(prune(&mut arena, var), TypeArena::NUM);
}

#[test]
fn test_keyof_expands_to_key_union() {
    let mut arena = TypeArena::new();
    let obj = arena.object(
        vec![
            ObjElem::Prop {
                name: "a".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::NUM,
            },
            ObjElem::Prop {
                name: "b".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::STR,
            },
        ],
        ObjectFlags::empty(),
    );
    let keyof = arena.alloc(Type::KeyOf(obj));
    let lit_a = arena.lit_str("a");
    assert_unifies(&mut arena, lit_a, keyof);
    let lit_c = arena.lit_str("c");
    assert_fails(&mut arena, lit_c, keyof);
}

#[test]
fn test_indexed_access_resolves_property() {
    let mut arena = TypeArena::new();
    let obj = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    let key = arena.lit_str("a");
    let access = arena.alloc(Type::IndexedAccess {
        target: obj,
        index: key,
    });
    assert_unifies(&mut arena, access, TypeArena::NUM);

    let missing_key = arena.lit_str("missing");
    let bad_access = arena.alloc(Type::IndexedAccess {
        target: obj,
        index: missing_key,
    });
    assert_fails(&mut arena, bad_access, TypeArena::NUM);
}

#[test]
fn test_conditional_distributes_over_union() {
    let mut arena = TypeArena::new();
    let num_or_str = arena.union(vec![TypeArena::NUM, TypeArena::STR]);
    let lit_yes = arena.lit_str("yes");
    let lit_no = arena.lit_str("no");
    // (number | string) extends number ? "yes" : "no"  ->  "yes" | "no"
    let cond = arena.alloc(Type::Cond {
        check: num_or_str,
        extends: TypeArena::NUM,
        then_ty: lit_yes,
        else_ty: lit_no,
    });
    let mut unifier = Unifier::new(&mut arena, Span::dummy());
    let evaluated = unifier.eval_cond(cond);
    assert!(unifier.into_diagnostics().is_empty());
    assert_eq!(show(&arena, evaluated), "\"no\" | \"yes\"");
}

#[test]
fn test_conditional_binds_infer_variables() {
    let mut arena = TypeArena::new();
    // [number, string] extends [infer H, ...] ? H : never
    let infer_h = arena.alloc(Type::Infer {
        name: "H".to_string(),
    });
    let rest_var = arena.fresh_var();
    let rest = arena.alloc(Type::Rest(rest_var));
    let extends = arena.tuple(vec![infer_h, rest]);
    let check = arena.tuple(vec![TypeArena::NUM, TypeArena::STR]);
    let cond = arena.alloc(Type::Cond {
        check,
        extends,
        then_ty: infer_h,
        else_ty: TypeArena::NEVER,
    });
    let mut unifier = Unifier::new(&mut arena, Span::dummy());
    let evaluated = unifier.eval_cond(cond);
    assert!(unifier.into_diagnostics().is_empty());
    let evaluated = prune(&mut arena, evaluated);
    assert_eq!(show(&arena, evaluated), "number");
}

#[test]
fn test_mapped_type_evaluates_over_keyof() {
    let mut arena = TypeArena::new();
    let source = arena.object(
        vec![
            ObjElem::Prop {
                name: "a".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::NUM,
            },
            ObjElem::Prop {
                name: "b".to_string(),
                optional: false,
                readonly: false,
                ty: TypeArena::STR,
            },
        ],
        ObjectFlags::empty(),
    );
    let keys = arena.alloc(Type::KeyOf(source));
    let key_param = arena_ref_param(&mut arena, "K");
    let value = arena.alloc(Type::IndexedAccess {
        target: source,
        index: key_param,
    });
    let mapped = arena.object(
        vec![ObjElem::Mapped(crate::types::MappedElem {
            type_param: "K".to_string(),
            constraint: keys,
            name_remap: None,
            value,
            optional: None,
            readonly: None,
        })],
        ObjectFlags::empty(),
    );
    // The source object satisfies the identity-mapped copy of itself.
    assert_unifies(&mut arena, source, mapped);
}

fn arena_ref_param(arena: &mut TypeArena, name: &str) -> TypeId {
    arena.reference(name, Vec::new())
}

#[test]
fn test_trial_rollback_leaves_no_bindings() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    let tuple_var = arena.tuple(vec![var]);
    let tuple_num = arena.tuple(vec![TypeArena::NUM, TypeArena::NUM]);
    let target = arena.union(vec![tuple_num, TypeArena::STR]);
    // [t0] is assignable to neither union member; the failed trials must
    // not leave t0 bound.
    let diags = unify(&mut arena, tuple_var, target, Span::dummy());
    assert!(!diags.is_empty());
    assert_eq!(prune(&mut arena, var), var);
}
