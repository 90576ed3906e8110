use super::*;

#[test]
fn test_well_known_constants() {
    let arena = TypeArena::new();
    assert!(matches!(arena.get(TypeArena::ANY), Type::Any));
    assert!(matches!(arena.get(TypeArena::UNKNOWN), Type::Unknown));
    assert!(matches!(arena.get(TypeArena::NEVER), Type::Never));
    assert!(matches!(
        arena.get(TypeArena::NUM),
        Type::Prim(Primitive::Num)
    ));
    assert!(matches!(
        arena.get(TypeArena::STR),
        Type::Prim(Primitive::Str)
    ));
    assert!(matches!(
        arena.get(TypeArena::BOOL),
        Type::Prim(Primitive::Bool)
    ));
    assert!(matches!(
        arena.get(TypeArena::NULL),
        Type::Lit(LitValue::Null)
    ));
    assert!(matches!(
        arena.get(TypeArena::UNDEFINED),
        Type::Lit(LitValue::Undefined)
    ));
}

#[test]
fn test_fresh_vars_are_distinct() {
    let mut arena = TypeArena::new();
    let a = arena.fresh_var();
    let b = arena.fresh_var();
    assert_ne!(a, b);
    match (arena.get(a), arena.get(b)) {
        (Type::Var { id: ia, .. }, Type::Var { id: ib, .. }) => assert_ne!(ia, ib),
        _ => panic!("expected vars"),
    }
}

#[test]
fn test_union_flattens_and_dedupes() {
    let mut arena = TypeArena::new();
    let inner = arena.union(vec![TypeArena::NUM, TypeArena::STR]);
    let outer = arena.union(vec![inner, TypeArena::NUM, TypeArena::NEVER]);
    match arena.get(outer) {
        Type::Union(members) => {
            assert_eq!(members.to_vec(), vec![TypeArena::NUM, TypeArena::STR]);
        }
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn test_union_collapses_singleton() {
    let mut arena = TypeArena::new();
    assert_eq!(arena.union(vec![TypeArena::NUM]), TypeArena::NUM);
    assert_eq!(arena.union(vec![]), TypeArena::NEVER);
}

#[test]
fn test_object_ids_increment() {
    let mut arena = TypeArena::new();
    let a = arena.object(vec![], ObjectFlags::empty());
    let b = arena.object(vec![], ObjectFlags::empty());
    match (arena.get(a), arena.get(b)) {
        (Type::Object(oa), Type::Object(ob)) => assert_ne!(oa.id, ob.id),
        _ => panic!("expected objects"),
    }
}

#[test]
fn test_func_min_arity() {
    let mut arena = TypeArena::new();
    let func = FuncType {
        type_params: Vec::new(),
        params: vec![
            FuncParam::new("a", TypeArena::NUM),
            FuncParam {
                name: "b".to_string(),
                ty: TypeArena::NUM,
                optional: true,
                rest: false,
            },
        ],
        ret: TypeArena::NUM,
        throws: None,
    };
    assert_eq!(func.min_arity(), 1);
    assert!(!func.has_rest());
    let _ = arena.alloc(Type::Func(func));
}
