use super::*;
use esc_ast::builder::*;
use esc_ast::BinaryOp;

#[test]
fn test_namespace_from_path() {
    assert_eq!(namespace_from_path("main.esc"), "");
    assert_eq!(namespace_from_path("foo/x.esc"), "foo");
    assert_eq!(namespace_from_path("a/b/x.esc"), "a.b");
}

#[test]
fn test_keys_and_namespaces() {
    let module = module(vec![
        module_item("main.esc", vec![var_decl("x", num(1.0))]),
        module_item("foo/y.esc", vec![var_decl("y", num(2.0))]),
    ]);
    let graph = build_dep_graph(&module);

    assert!(graph.decls.contains_key(&BindingKey::value("x")));
    assert!(graph.decls.contains_key(&BindingKey::value("foo.y")));
    assert_eq!(
        graph.namespace.get(&BindingKey::value("foo.y")),
        Some(&"foo".to_string())
    );
    assert!(graph.namespaces.contains(""));
    assert!(graph.namespaces.contains("foo"));
}

#[test]
fn test_var_pattern_introduces_many_keys_one_decl() {
    let pattern = tuple_pattern(vec![ident_pattern("a"), ident_pattern("b")]);
    let module = module(vec![module_item(
        "main.esc",
        vec![var_decl_with_pattern(pattern, tuple(vec![num(1.0), num(2.0)]))],
    )]);
    let graph = build_dep_graph(&module);

    let decl_a = &graph.decls[&BindingKey::value("a")];
    let decl_b = &graph.decls[&BindingKey::value("b")];
    assert_eq!(decl_a, decl_b);
    assert_eq!(decl_a.len(), 1);
}

#[test]
fn test_dependency_edges_and_schedule_order() {
    // val b = a + 1; val a = 2  -- a must be scheduled before b
    let module = module(vec![module_item(
        "main.esc",
        vec![
            var_decl("b", binary(BinaryOp::Add, ident("a"), num(1.0))),
            var_decl("a", num(2.0)),
        ],
    )]);
    let graph = build_dep_graph(&module);

    let deps_b = &graph.deps[&BindingKey::value("b")];
    assert!(deps_b.contains(&BindingKey::value("a")));

    let pos = |name: &str| {
        graph
            .components
            .iter()
            .position(|c| c.contains(&BindingKey::value(name)))
            .unwrap()
    };
    assert!(pos("a") < pos("b"));
}

#[test]
fn test_local_bindings_do_not_create_edges() {
    // fn f(a) { return a }  -- the parameter `a` is not a dependency
    let body = block(vec![return_stmt(Some(ident("a")))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl("f", vec![func_param("a")], body),
            var_decl("a", num(1.0)),
        ],
    )]);
    let graph = build_dep_graph(&module);
    let deps_f = &graph.deps[&BindingKey::value("f")];
    assert!(!deps_f.contains(&BindingKey::value("a")));
}

#[test]
fn test_recursive_function_self_edge() {
    // fn f() { return f() }
    let body = block(vec![return_stmt(Some(call(ident("f"), vec![])))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![func_decl("f", vec![], body)],
    )]);
    let graph = build_dep_graph(&module);
    assert!(graph.is_self_recursive(&BindingKey::value("f")));
}

#[test]
fn test_mutual_recursion_single_component() {
    let body_f = block(vec![return_stmt(Some(call(ident("g"), vec![])))]);
    let body_g = block(vec![return_stmt(Some(call(ident("f"), vec![])))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl("f", vec![], body_f),
            func_decl("g", vec![], body_g),
        ],
    )]);
    let graph = build_dep_graph(&module);

    let component = graph
        .components
        .iter()
        .find(|c| c.contains(&BindingKey::value("f")))
        .unwrap();
    assert_eq!(component.len(), 2);
    assert!(component.contains(&BindingKey::value("g")));
    // Discovery order within the component.
    assert_eq!(component[0], BindingKey::value("f"));
}

#[test]
fn test_overloads_merge_into_one_node() {
    let body = block(vec![return_stmt(Some(ident("x")))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl("add", vec![func_param("x")], body.clone()),
            func_decl("add", vec![func_param("x")], body),
        ],
    )]);
    let graph = build_dep_graph(&module);
    assert_eq!(graph.decls[&BindingKey::value("add")].len(), 2);
}

#[test]
fn test_interfaces_merge_into_one_node() {
    let module = module(vec![module_item(
        "main.esc",
        vec![
            interface_decl("Foo", vec![prop_ann("a", type_ref("number"))]),
            interface_decl("Foo", vec![prop_ann("b", type_ref("string"))]),
        ],
    )]);
    let graph = build_dep_graph(&module);
    assert_eq!(graph.decls[&BindingKey::type_("Foo")].len(), 2);
}

#[test]
fn test_type_dependencies_resolved() {
    let module = module(vec![module_item(
        "main.esc",
        vec![
            type_decl("A", type_ref("B")),
            type_decl("B", type_ref("number")),
        ],
    )]);
    let graph = build_dep_graph(&module);
    let deps_a = &graph.deps[&BindingKey::type_("A")];
    assert!(deps_a.contains(&BindingKey::type_("B")));
    // Builtins never become edges.
    assert!(graph.deps[&BindingKey::type_("B")].is_empty());
}

#[test]
fn test_sibling_namespace_resolution_prefers_same_namespace() {
    let module = module(vec![
        module_item("foo/a.esc", vec![var_decl("x", num(1.0))]),
        module_item("foo/b.esc", vec![var_decl("y", ident("x"))]),
        module_item("main.esc", vec![var_decl("x", num(2.0))]),
    ]);
    let graph = build_dep_graph(&module);
    let deps_y = &graph.deps[&BindingKey::value("foo.y")];
    assert!(deps_y.contains(&BindingKey::value("foo.x")));
    assert!(!deps_y.contains(&BindingKey::value("x")));
}
