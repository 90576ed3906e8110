use super::*;
use crate::context::Context;
use esc_ast::builder::*;
use esc_ast::{BinaryOp, Decl, FuncDecl, FuncSig, VarDecl, VarKind};
use esc_common::Span;
use esc_solver::{ObjElem, TypeDisplay};

fn show_binding(ctx: &Context, name: &str) -> String {
    let binding = ctx.scopes.lookup_value(name).expect("binding exists");
    let prefix = if binding.scheme.type_params.is_empty() {
        String::new()
    } else {
        format!("<{}>", binding.scheme.type_params.join(", "))
    };
    format!(
        "{prefix}{}",
        TypeDisplay::new(&ctx.arena, binding.scheme.ty)
    )
}

#[test]
fn test_val_decl_with_initializer() {
    let mut ctx = Context::new();
    infer_decl(&mut ctx, &var_decl("x", num(42.0)));
    assert!(ctx.diags.is_empty(), "{:?}", ctx.diags);
    assert_eq!(show_binding(&ctx, "x"), "42");
}

#[test]
fn test_val_decl_annotation_mismatch() {
    let mut ctx = Context::new();
    let decl = Decl::Var(VarDecl {
        kind: VarKind::Val,
        pattern: annotated_pattern("x", type_ref("string")),
        type_ann: None,
        init: Some(num(1.0)),
        export: false,
        declare: false,
        span: Span::dummy(),
    });
    infer_decl(&mut ctx, &decl);
    assert!(!ctx.diags.is_empty());
}

#[test]
fn test_declare_requires_annotation() {
    let mut ctx = Context::new();
    let decl = Decl::Var(VarDecl {
        kind: VarKind::Val,
        pattern: ident_pattern("x"),
        type_ann: None,
        init: None,
        export: false,
        declare: true,
        span: Span::dummy(),
    });
    infer_decl(&mut ctx, &decl);
    assert!(ctx
        .diags
        .iter()
        .any(|d| d.message.contains("type annotation is required")));
}

#[test]
fn test_func_decl_is_generalized() {
    let mut ctx = Context::new();
    // fn id(x) { return x }
    let body = block(vec![return_stmt(Some(ident("x")))]);
    infer_decl(&mut ctx, &func_decl("id", vec![func_param("x")], body));
    assert!(ctx.diags.is_empty(), "{:?}", ctx.diags);
    assert_eq!(show_binding(&ctx, "id"), "<A>(x: A) => A");
}

#[test]
fn test_recursive_func_decl() {
    let mut ctx = Context::new();
    // fn fact(n) { return fact(n - 1) + n }
    let recur = call(ident("fact"), vec![binary(BinaryOp::Sub, ident("n"), num(1.0))]);
    let body = block(vec![return_stmt(Some(binary(
        BinaryOp::Add,
        recur,
        ident("n"),
    )))]);
    infer_decl(&mut ctx, &func_decl("fact", vec![func_param("n")], body));
    assert!(ctx.diags.is_empty(), "{:?}", ctx.diags);
    assert_eq!(show_binding(&ctx, "fact"), "(n: number) => number");
}

#[test]
fn test_declared_async_func_requires_promise_return() {
    let mut ctx = Context::new();
    let decl = Decl::Func(FuncDecl {
        name: "fetchNum".to_string(),
        sig: FuncSig {
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: Some(type_ref("number")),
            throws: None,
        },
        body: None,
        export: false,
        declare: true,
        is_async: true,
        span: Span::dummy(),
    });
    infer_decl(&mut ctx, &decl);
    assert!(ctx
        .diags
        .iter()
        .any(|d| d.message.contains("must return a `Promise`")));
}

#[test]
fn test_declared_async_func_promise_single_arg_rewritten() {
    let mut ctx = Context::new();
    let decl = Decl::Func(FuncDecl {
        name: "fetchNum".to_string(),
        sig: FuncSig {
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: Some(type_ref_with_args("Promise", vec![type_ref("number")])),
            throws: None,
        },
        body: None,
        export: false,
        declare: true,
        is_async: true,
        span: Span::dummy(),
    });
    infer_decl(&mut ctx, &decl);
    assert!(ctx.diags.is_empty(), "{:?}", ctx.diags);
    assert_eq!(show_binding(&ctx, "fetchNum"), "() => Promise<number, never>");
}

#[test]
fn test_type_alias_registered() {
    let mut ctx = Context::new();
    infer_decl(&mut ctx, &type_decl("Id", type_ref("number")));
    let alias = ctx.scopes.lookup_type("Id").expect("alias registered");
    assert_eq!(alias.ty, esc_solver::TypeArena::NUM);
}

#[test]
fn test_interface_merging_combines_members() {
    let mut ctx = Context::new();
    infer_decl(
        &mut ctx,
        &interface_decl("Foo", vec![prop_ann("a", type_ref("number"))]),
    );
    let first = ctx.scopes.lookup_type("Foo").expect("Foo registered");
    let first_id = match ctx.arena.get(first.ty) {
        esc_solver::Type::Object(object) => {
            assert!(object.is_interface());
            object.id
        }
        other => panic!("expected object, got {other:?}"),
    };

    infer_decl(
        &mut ctx,
        &interface_decl("Foo", vec![prop_ann("b", type_ref("string"))]),
    );
    assert!(ctx.diags.is_empty(), "{:?}", ctx.diags);

    let merged = ctx.scopes.lookup_type("Foo").expect("Foo still registered");
    match ctx.arena.get(merged.ty) {
        esc_solver::Type::Object(object) => {
            // Nominal identity is preserved; members are combined in order.
            assert_eq!(object.id, first_id);
            let names: Vec<&str> = object
                .elems
                .iter()
                .filter_map(ObjElem::name)
                .collect();
            assert_eq!(names, vec!["a", "b"]);
        }
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn test_interface_merge_incompatible_duplicate() {
    let mut ctx = Context::new();
    infer_decl(
        &mut ctx,
        &interface_decl("Foo", vec![prop_ann("a", type_ref("number"))]),
    );
    infer_decl(
        &mut ctx,
        &interface_decl("Foo", vec![prop_ann("a", type_ref("string"))]),
    );
    assert!(ctx
        .diags
        .iter()
        .any(|d| d.code == esc_common::codes::INTERFACE_MERGE));
}

#[test]
fn test_interface_merge_type_param_mismatch() {
    let mut ctx = Context::new();
    let mut with_param = interface_decl("Box", vec![]);
    if let Decl::Interface(iface) = &mut with_param {
        iface.type_params.push(type_param("T"));
    }
    infer_decl(&mut ctx, &with_param);
    infer_decl(&mut ctx, &interface_decl("Box", vec![]));
    assert!(ctx
        .diags
        .iter()
        .any(|d| d.message.contains("different type parameters")));
}

#[test]
fn test_class_is_unimplemented_warning() {
    let mut ctx = Context::new();
    let decl = Decl::Class(esc_ast::ClassDecl {
        name: "C".to_string(),
        export: false,
        declare: false,
        span: Span::dummy(),
    });
    infer_decl(&mut ctx, &decl);
    assert_eq!(ctx.diags.len(), 1);
    assert_eq!(ctx.diags[0].severity, esc_common::Severity::Warning);
    assert_eq!(ctx.diags[0].code, esc_common::codes::UNIMPLEMENTED);
}
