use super::*;
use crate::types::{FuncParam, FuncType, ObjElem, ObjectFlags, Type, TypeArena};

fn show(arena: &TypeArena, id: crate::types::TypeId) -> String {
    TypeDisplay::new(arena, id).to_string()
}

#[test]
fn test_primitives_and_literals() {
    let mut arena = TypeArena::new();
    assert_eq!(show(&arena, TypeArena::NUM), "number");
    assert_eq!(show(&arena, TypeArena::STR), "string");
    assert_eq!(show(&arena, TypeArena::NEVER), "never");
    let lit = arena.lit_str("hi");
    assert_eq!(show(&arena, lit), "\"hi\"");
    let five = arena.lit_num(5.0);
    assert_eq!(show(&arena, five), "5");
}

#[test]
fn test_union_members_are_sorted() {
    let mut arena = TypeArena::new();
    let lit = arena.lit_str("b");
    let lit2 = arena.lit_str("a");
    // Primitives sort before literals regardless of insertion order.
    let union = arena.alloc(Type::Union(vec![lit, TypeArena::NUM, lit2].into()));
    assert_eq!(show(&arena, union), "number | \"a\" | \"b\"");
}

#[test]
fn test_intersection_preserves_declaration_order() {
    let mut arena = TypeArena::new();
    let a = arena.object(
        vec![ObjElem::Prop {
            name: "a".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::NUM,
        }],
        ObjectFlags::empty(),
    );
    let b = arena.object(
        vec![ObjElem::Prop {
            name: "b".to_string(),
            optional: false,
            readonly: false,
            ty: TypeArena::STR,
        }],
        ObjectFlags::empty(),
    );
    let isect = arena.intersection(vec![b, a]);
    assert_eq!(show(&arena, isect), "{b: string} & {a: number}");
}

#[test]
fn test_func_display() {
    let mut arena = TypeArena::new();
    let func = arena.alloc(Type::Func(FuncType {
        type_params: Vec::new(),
        params: vec![
            FuncParam::new("a", TypeArena::NUM),
            FuncParam::new("b", TypeArena::STR),
        ],
        ret: TypeArena::BOOL,
        throws: None,
    }));
    assert_eq!(show(&arena, func), "(a: number, b: string) => boolean");
}

#[test]
fn test_bound_var_displays_referent() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    if let Type::Var { instance, .. } = arena.get_mut(var) {
        *instance = Some(TypeArena::NUM);
    }
    assert_eq!(show(&arena, var), "number");
}
