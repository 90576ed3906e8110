use super::*;
use esc_ast::builder::*;
use esc_ast::BinaryOp;
use esc_checker::{check_module, Context};
use esc_binder::build_dep_graph;

fn emit_dts(module: &esc_ast::Module) -> String {
    let graph = build_dep_graph(module);
    let mut ctx = Context::new();
    check_module(&mut ctx, module, &graph);
    assert!(
        ctx.diags.iter().all(|d| !d.is_error()),
        "{:?}",
        ctx.diags
    );
    build_dts(module, &graph, &ctx)
}

#[test]
fn test_const_declaration() {
    let module = module(vec![module_item("main.esc", vec![var_decl("x", num(42.0))])]);
    assert_eq!(emit_dts(&module), "declare const x: 42;\n");
}

#[test]
fn test_function_declaration() {
    let body = block(vec![return_stmt(Some(binary(
        BinaryOp::Add,
        ident("a"),
        ident("b"),
    )))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![func_decl("add", vec![func_param("a"), func_param("b")], body)],
    )]);
    assert_eq!(
        emit_dts(&module),
        "declare function add(a: number, b: number): number;\n"
    );
}

#[test]
fn test_generic_function_declaration() {
    let body = block(vec![return_stmt(Some(ident("x")))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![func_decl("id", vec![func_param("x")], body)],
    )]);
    assert_eq!(emit_dts(&module), "declare function id<A>(x: A): A;\n");
}

#[test]
fn test_type_alias() {
    let module = module(vec![module_item(
        "main.esc",
        vec![type_decl("Id", type_ref("number"))],
    )]);
    assert_eq!(emit_dts(&module), "type Id = number;\n");
}

#[test]
fn test_merged_interface() {
    // Two partial interfaces merge into one declaration.
    let module = module(vec![module_item(
        "main.esc",
        vec![
            interface_decl("Foo", vec![prop_ann("a", type_ref("number"))]),
            interface_decl("Foo", vec![prop_ann("b", type_ref("string"))]),
        ],
    )]);
    assert_eq!(
        emit_dts(&module),
        "interface Foo {\n  a: number;\n  b: string;\n}\n"
    );
}

#[test]
fn test_overloads_emit_both_signatures() {
    use esc_ast::FuncSig;
    let sig = |ty: &str| FuncSig {
        type_params: Vec::new(),
        params: vec![esc_ast::FuncParam {
            pattern: ident_pattern("x"),
            type_ann: Some(type_ref(ty)),
            optional: false,
        }],
        return_type: Some(type_ref(ty)),
        throws: None,
    };
    let body = block(vec![return_stmt(Some(ident("x")))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl_with_sig("add", sig("number"), Some(body.clone())),
            func_decl_with_sig("add", sig("string"), Some(body)),
        ],
    )]);
    let output = emit_dts(&module);
    assert!(output.contains("declare function add(x: number): number;"));
    assert!(output.contains("declare function add(x: string): string;"));
}

#[test]
fn test_namespaced_declarations_grouped() {
    let module = module(vec![
        module_item("main.esc", vec![var_decl("root", num(1.0))]),
        module_item("foo/x.esc", vec![var_decl("x", num(2.0))]),
    ]);
    let output = emit_dts(&module);
    assert!(output.contains("declare const root: 1;"));
    assert!(output.contains("declare namespace foo {"));
    assert!(output.contains("  const x: 2;"));
}

#[test]
fn test_grouped_declarators_for_pattern_var() {
    let pattern = tuple_pattern(vec![ident_pattern("a"), ident_pattern("b")]);
    let module = module(vec![module_item(
        "main.esc",
        vec![var_decl_with_pattern(
            pattern,
            tuple(vec![num(1.0), str_("x")]),
        )],
    )]);
    assert_eq!(emit_dts(&module), "declare const a: 1, b: \"x\";\n");
}
