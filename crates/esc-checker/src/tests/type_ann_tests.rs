use super::*;
use crate::context::Context;
use esc_ast::builder::{type_param, type_ref, type_ref_with_args};
use esc_ast::TypeAnn;
use esc_common::Span;
use esc_solver::{Type, TypeArena, TypeDisplay};

fn show(ctx: &Context, id: esc_solver::TypeId) -> String {
    TypeDisplay::new(&ctx.arena, id).to_string()
}

#[test]
fn test_primitive_names_short_circuit() {
    let mut ctx = Context::new();
    assert_eq!(infer_type_ann(&mut ctx, &type_ref("number")), TypeArena::NUM);
    assert_eq!(infer_type_ann(&mut ctx, &type_ref("string")), TypeArena::STR);
    assert_eq!(infer_type_ann(&mut ctx, &type_ref("never")), TypeArena::NEVER);
    assert_eq!(
        infer_type_ann(&mut ctx, &type_ref("undefined")),
        TypeArena::UNDEFINED
    );
}

#[test]
fn test_unresolved_ref_stays_parameter() {
    let mut ctx = Context::new();
    let ty = infer_type_ann(&mut ctx, &type_ref("T"));
    assert!(matches!(
        ctx.arena.get(ty),
        Type::Ref { alias: None, .. }
    ));
}

#[test]
fn test_promise_single_argument_rewritten() {
    let mut ctx = Context::new();
    let ann = type_ref_with_args("Promise", vec![type_ref("number")]);
    let ty = infer_type_ann(&mut ctx, &ann);
    assert_eq!(show(&ctx, ty), "Promise<number, never>");
}

#[test]
fn test_union_and_tuple_annotations() {
    let mut ctx = Context::new();
    let ann = TypeAnn::Union {
        types: vec![type_ref("number"), type_ref("string")],
        span: Span::dummy(),
    };
    let ty = infer_type_ann(&mut ctx, &ann);
    assert_eq!(show(&ctx, ty), "number | string");

    let ann = TypeAnn::Tuple {
        elems: vec![type_ref("number"), type_ref("boolean")],
        span: Span::dummy(),
    };
    let ty = infer_type_ann(&mut ctx, &ann);
    assert_eq!(show(&ctx, ty), "[number, boolean]");
}

#[test]
fn test_type_params_sorted_by_constraint_references() {
    // <B extends A, A> evaluates A's constraint context before B's.
    let mut b = type_param("B");
    b.constraint = Some(type_ref("A"));
    let a = type_param("A");

    let mut ctx = Context::new();
    ctx.scopes.push_scope();
    let defs = bind_type_params(&mut ctx, &[b, a]);
    ctx.scopes.pop_scope();

    // Source order is preserved in the output; evaluation order differed.
    assert_eq!(defs[0].name, "B");
    assert_eq!(defs[1].name, "A");
    let constraint = defs[0].constraint.expect("B has a constraint");
    assert!(matches!(
        ctx.arena.get(constraint),
        Type::Ref { alias: None, .. }
    ));
}
