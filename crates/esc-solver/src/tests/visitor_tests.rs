use super::*;
use crate::types::{Type, TypeArena, TypeId};

#[test]
fn test_prune_unbound_is_identity() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    assert_eq!(prune(&mut arena, var), var);
}

#[test]
fn test_prune_follows_chain_and_compresses() {
    let mut arena = TypeArena::new();
    let a = arena.fresh_var();
    let b = arena.fresh_var();
    if let Type::Var { instance, .. } = arena.get_mut(a) {
        *instance = Some(b);
    }
    if let Type::Var { instance, .. } = arena.get_mut(b) {
        *instance = Some(TypeArena::NUM);
    }

    assert_eq!(prune(&mut arena, a), TypeArena::NUM);
    // Path compression writes the root back into `a` directly.
    match arena.get(a) {
        Type::Var { instance, .. } => assert_eq!(*instance, Some(TypeArena::NUM)),
        _ => panic!("expected var"),
    }
}

#[test]
fn test_prune_is_idempotent() {
    let mut arena = TypeArena::new();
    let a = arena.fresh_var();
    if let Type::Var { instance, .. } = arena.get_mut(a) {
        *instance = Some(TypeArena::STR);
    }
    let once = prune(&mut arena, a);
    let twice = prune(&mut arena, once);
    assert_eq!(once, twice);
}

#[test]
fn test_occurs_in_direct_and_nested() {
    let mut arena = TypeArena::new();
    let var = arena.fresh_var();
    assert!(occurs_in(&mut arena, var, var));

    let tuple = arena.tuple(vec![TypeArena::NUM, var]);
    assert!(occurs_in(&mut arena, var, tuple));

    let clean = arena.tuple(vec![TypeArena::NUM, TypeArena::STR]);
    assert!(!occurs_in(&mut arena, var, clean));
}

#[test]
fn test_fold_enter_replaces() {
    struct NumToStr;
    impl TypeFolder for NumToStr {
        fn enter(&mut self, arena: &mut TypeArena, id: TypeId) -> Option<TypeId> {
            match arena.get(id) {
                Type::Prim(crate::types::Primitive::Num) => Some(TypeArena::STR),
                _ => None,
            }
        }
    }

    let mut arena = TypeArena::new();
    let tuple = arena.tuple(vec![TypeArena::NUM, TypeArena::BOOL]);
    let folded = fold(&mut NumToStr, &mut arena, tuple);
    match arena.get(folded) {
        Type::Tuple(elems) => {
            assert_eq!(elems.to_vec(), vec![TypeArena::STR, TypeArena::BOOL]);
        }
        other => panic!("expected tuple, got {other:?}"),
    }
}

#[test]
fn test_fold_unchanged_returns_same_id() {
    struct Noop;
    impl TypeFolder for Noop {}

    let mut arena = TypeArena::new();
    let tuple = arena.tuple(vec![TypeArena::NUM, TypeArena::BOOL]);
    assert_eq!(fold(&mut Noop, &mut arena, tuple), tuple);
}
