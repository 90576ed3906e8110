use super::*;
use crate::context::Context;
use esc_ast::builder::*;
use esc_ast::{BinaryOp, Expr};
use esc_common::CancellationToken;
use esc_solver::TypeDisplay;

fn show_binding(ctx: &Context, name: &str) -> String {
    let binding = ctx.scopes.lookup_value(name).expect("binding exists");
    TypeDisplay::new(&ctx.arena, binding.scheme.ty).to_string()
}

#[test]
fn test_out_of_order_declarations_check() {
    // val b = a + 1 appears before val a = 2; the schedule fixes the order.
    let module = module(vec![module_item(
        "main.esc",
        vec![
            var_decl("b", binary(BinaryOp::Add, ident("a"), num(1.0))),
            var_decl("a", num(2.0)),
        ],
    )]);
    let mut ctx = Context::new();
    let (_, diags) = infer_module(&mut ctx, &module);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(show_binding(&ctx, "b"), "number");
}

#[test]
fn test_namespaced_decl_lands_in_namespace() {
    let module = module(vec![module_item("foo/x.esc", vec![var_decl("x", num(42.0))])]);
    let mut ctx = Context::new();
    let (_, diags) = infer_module(&mut ctx, &module);
    assert!(diags.is_empty(), "{diags:?}");
    assert!(ctx.scopes.lookup_value("foo.x").is_some());
    assert!(ctx.scopes.lookup_value("x").is_none());
}

#[test]
fn test_sibling_namespace_reference_by_bare_name() {
    let module = module(vec![
        module_item("foo/a.esc", vec![var_decl("x", num(1.0))]),
        module_item(
            "foo/b.esc",
            vec![var_decl("y", binary(BinaryOp::Add, ident("x"), num(1.0)))],
        ),
    ]);
    let mut ctx = Context::new();
    let (_, diags) = infer_module(&mut ctx, &module);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(show_binding(&ctx, "foo.y"), "number");
}

#[test]
fn test_mutual_recursion_checks() {
    // fn is_even(n) { return if n == 0 { true } else { is_odd(n - 1) } }
    let is_even_body = block(vec![return_stmt(Some(Expr::If {
        cond: Box::new(binary(BinaryOp::Eq, ident("n"), num(0.0))),
        consequent: block(vec![expr_stmt(bool_(true))]),
        alternate: Some(Box::new(Expr::Do {
            body: block(vec![expr_stmt(call(
                ident("is_odd"),
                vec![binary(BinaryOp::Sub, ident("n"), num(1.0))],
            ))]),
            span: esc_common::Span::dummy(),
        })),
        span: esc_common::Span::dummy(),
    }))]);
    let is_odd_body = block(vec![return_stmt(Some(call(
        ident("is_even"),
        vec![binary(BinaryOp::Sub, ident("n"), num(1.0))],
    )))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl("is_even", vec![func_param("n")], is_even_body),
            func_decl("is_odd", vec![func_param("n")], is_odd_body),
        ],
    )]);
    let mut ctx = Context::new();
    let (_, diags) = infer_module(&mut ctx, &module);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn test_value_cycle_reports_cycle_error() {
    // val a = b; val b = a -- not typeable as recursion
    let module = module(vec![module_item(
        "main.esc",
        vec![var_decl("a", ident("b")), var_decl("b", ident("a"))],
    )]);
    let mut ctx = Context::new();
    let (_, diags) = infer_module(&mut ctx, &module);
    let cycle_errors: Vec<_> = diags
        .iter()
        .filter(|d| d.code == esc_common::codes::DEPENDENCY_CYCLE)
        .collect();
    // Reported once, at the component boundary.
    assert_eq!(cycle_errors.len(), 1);
}

#[test]
fn test_overloads_bind_intersection() {
    use esc_ast::FuncSig;
    let sig = |ty: &str| FuncSig {
        type_params: Vec::new(),
        params: vec![
            esc_ast::FuncParam {
                pattern: annotated_pattern("x", type_ref(ty)),
                type_ann: Some(type_ref(ty)),
                optional: false,
            },
        ],
        return_type: Some(type_ref(ty)),
        throws: None,
    };
    let body_num = block(vec![return_stmt(Some(ident("x")))]);
    let module = module(vec![module_item(
        "main.esc",
        vec![
            func_decl_with_sig("add", sig("number"), Some(body_num.clone())),
            func_decl_with_sig("add", sig("string"), Some(body_num)),
        ],
    )]);
    let mut ctx = Context::new();
    let (graph, diags) = infer_module(&mut ctx, &module);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(
        graph.decls[&esc_binder::BindingKey::value("add")].len(),
        2
    );
    assert_eq!(
        show_binding(&ctx, "add"),
        "(x: number) => number & (x: string) => string"
    );
}

#[test]
fn test_script_trailing_expression_type() {
    let script = esc_ast::Script {
        stmts: vec![
            esc_ast::Stmt::Decl(var_decl("x", num(1.0))),
            expr_stmt(binary(BinaryOp::Add, ident("x"), num(2.0))),
        ],
    };
    let mut ctx = Context::new();
    let (ty, diags) = infer_script(&mut ctx, &script);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(ty, esc_solver::TypeArena::NUM);
}

#[test]
fn test_cancellation_reports_single_diagnostic() {
    let token = CancellationToken::none();
    token.cancel();
    let mut ctx = Context::with_cancellation(token);
    let script = esc_ast::Script {
        stmts: vec![
            expr_stmt(num(1.0)),
            expr_stmt(num(2.0)),
            expr_stmt(num(3.0)),
        ],
    };
    let (_, diags) = infer_script(&mut ctx, &script);
    let cancelled: Vec<_> = diags
        .iter()
        .filter(|d| d.code == esc_common::codes::CANCELLED)
        .collect();
    assert_eq!(cancelled.len(), 1);
}
