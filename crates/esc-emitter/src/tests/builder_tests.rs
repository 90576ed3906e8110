use super::*;
use crate::printer::print_module;
use esc_ast::builder::*;
use esc_ast::{BinaryOp, FuncSig};
use esc_binder::build_dep_graph;
use esc_common::CompilerOptions;

fn emit(module: &esc_ast::Module) -> String {
    let graph = build_dep_graph(module);
    let mut js = build_module(module, &graph, &CompilerOptions::default());
    print_module(&mut js)
}

#[test]
fn test_simple_arithmetic_function() {
    // fn add(a, b) { return a + b }
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
        emit(&module),
        "function add(temp1, temp2) {\n  \
           const a = temp1;\n  \
           const b = temp2;\n  \
           return a + b;\n\
         }\n"
    );
}

#[test]
fn test_namespace_mounting() {
    // val x = 42 in foo/x.esc
    let module = module(vec![module_item("foo/x.esc", vec![var_decl("x", num(42.0))])]);
    assert_eq!(
        emit(&module),
        "const foo = {};\nconst foo__x = 42;\nfoo.x = foo__x;\n"
    );
}

#[test]
fn test_nested_namespace_init_chain_once() {
    let module = module(vec![module_item(
        "a/b/x.esc",
        vec![var_decl("x", num(1.0)), var_decl("y", num(2.0))],
    )]);
    let output = emit(&module);
    // Exactly one init chain for a and a.b across the module.
    assert_eq!(output.matches("const a = {};").count(), 1);
    assert_eq!(output.matches("a.b = {};").count(), 1);
    // One mount per declaration.
    assert!(output.contains("const a__b__x = 1;"));
    assert!(output.contains("a.b.x = a__b__x;"));
    assert!(output.contains("const a__b__y = 2;"));
    assert!(output.contains("a.b.y = a__b__y;"));
}

#[test]
fn test_sibling_reference_folds_to_dunder() {
    let module = module(vec![
        module_item("foo/a.esc", vec![var_decl("x", num(1.0))]),
        module_item(
            "foo/b.esc",
            vec![var_decl("y", binary(BinaryOp::Add, ident("x"), num(1.0)))],
        ),
    ]);
    let output = emit(&module);
    assert!(output.contains("const foo__y = foo__x + 1;"));
}

#[test]
fn test_tuple_pattern_guard_lowering() {
    // val tuple = [42, "hello"]; val [n, s] = tuple
    let module = module(vec![module_item(
        "main.esc",
        vec![
            var_decl("tuple", tuple(vec![num(42.0), str_("hello")])),
            var_decl_with_pattern(
                tuple_pattern(vec![ident_pattern("n"), ident_pattern("s")]),
                ident("tuple"),
            ),
        ],
    )]);
    let output = emit(&module);
    assert!(output.contains("if (tuple != null && tuple.length === 2) {"));
    assert!(output.contains("const [n, s] = tuple;"));
}

#[test]
fn test_overloaded_function_dispatch() {
    let sig = |ty: &str| FuncSig {
        type_params: Vec::new(),
        params: vec![
            esc_ast::FuncParam {
                pattern: ident_pattern("x"),
                type_ann: Some(type_ref(ty)),
                optional: false,
            },
            esc_ast::FuncParam {
                pattern: ident_pattern("y"),
                type_ann: Some(type_ref(ty)),
                optional: false,
            },
        ],
        return_type: Some(type_ref(ty)),
        throws: None,
    };
    let body = block(vec![return_stmt(Some(binary(
        BinaryOp::Add,
        ident("x"),
        ident("y"),
    )))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl_with_sig("add", sig("number"), Some(body.clone())),
            func_decl_with_sig("add", sig("string"), Some(body)),
        ],
    )]);
    let output = emit(&module);
    // One function dispatching on runtime argument types.
    assert_eq!(output.matches("function add(").count(), 1);
    assert!(output.contains(
        "if (typeof temp1 === \"number\" && typeof temp2 === \"number\") {"
    ));
    assert!(output.contains(
        "if (typeof temp1 === \"string\" && typeof temp2 === \"string\") {"
    ));
    assert!(output.contains("throw new TypeError(\"no overload matches this call\");"));
}

#[test]
fn test_match_expression_lowering() {
    let expr = esc_ast::Expr::Match {
        target: Box::new(ident("value")),
        cases: vec![
            match_case(
                esc_ast::Pattern::Lit {
                    lit: esc_ast::Literal::Num(1.0),
                    span: esc_common::Span::dummy(),
                },
                str_("one"),
            ),
            match_case(wildcard_pattern(), str_("other")),
        ],
        span: esc_common::Span::dummy(),
    };
    let module = module(vec![module_item(
        "main.esc",
        vec![var_decl("value", num(1.0)), var_decl("result", expr)],
    )]);
    let output = emit(&module);
    assert!(output.contains("if (value === 1) {"));
    assert!(output.contains("return \"one\";"));
    assert!(output.contains("return \"other\";"));
    assert!(output.contains("throw new TypeError(\"no case matched the subject\");"));
}

#[test]
fn test_local_var_and_if_expression() {
    // fn f(c) { val r = if c { 1 } else { 2 }; return r }
    let if_expr = esc_ast::Expr::If {
        cond: Box::new(ident("c")),
        consequent: block(vec![expr_stmt(num(1.0))]),
        alternate: Some(Box::new(esc_ast::Expr::Do {
            body: block(vec![expr_stmt(num(2.0))]),
            span: esc_common::Span::dummy(),
        })),
        span: esc_common::Span::dummy(),
    };
    let body = block(vec![
        esc_ast::Stmt::Decl(var_decl("r", if_expr)),
        return_stmt(Some(ident("r"))),
    ]);
    let module = module(vec![module_item(
        "main.esc",
        vec![func_decl("f", vec![func_param("c")], body)],
    )]);
    let output = emit(&module);
    // Simple branches fold to a conditional expression.
    assert!(output.contains("const r = c ? 1 : 2;"));
}

#[test]
fn test_declare_decls_are_not_emitted() {
    let mut decl = var_decl("x", num(1.0));
    if let esc_ast::Decl::Var(var) = &mut decl {
        var.declare = true;
        var.init = None;
        var.type_ann = Some(type_ref("number"));
    }
    let module = module(vec![module_item("main.esc", vec![decl])]);
    assert_eq!(emit(&module), "");
}

#[test]
fn test_extractor_records_runtime_import() {
    let module = module(vec![module_item(
        "main.esc",
        vec![
            var_decl("Point", num(0.0)),
            var_decl("p", num(0.0)),
            var_decl_with_pattern(
                esc_ast::Pattern::Extractor {
                    name: "Point".to_string(),
                    args: vec![ident_pattern("x")],
                    span: esc_common::Span::dummy(),
                },
                ident("p"),
            ),
        ],
    )]);
    let output = emit(&module);
    assert!(output
        .starts_with("import { invokeCustomMatcherOrThrow } from \"@escalier/runtime\";"));
    assert!(output.contains("invokeCustomMatcherOrThrow(Point, p, undefined)"));
}
