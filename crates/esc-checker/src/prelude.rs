//! The imported prelude: built-in names consulted after the scope stack.

use crate::context::Context;
use esc_binder::Binding;
use esc_common::Span;
use esc_solver::{
    FuncParam, ObjElem, ObjectFlags, ObjectType, Scheme, Type, TypeAlias, TypeArena, TypeParamDef,
};
use std::sync::Arc;

/// Install the built-in types and values.
///
/// `Promise<T, E>` and `JSXElement` are abstract nominal types; `console`
/// carries the logging surface the emitted code can rely on.
pub fn install_prelude(ctx: &mut Context) {
    let promise = nominal_type(ctx, &["T", "E"]);
    ctx.scopes.set_prelude_type("Promise", promise);

    let jsx_element = nominal_type(ctx, &[]);
    ctx.scopes.set_prelude_type("JSXElement", jsx_element);

    let array = nominal_type(ctx, &["T"]);
    ctx.scopes.set_prelude_type("Array", array);

    let log = ctx.arena.func(
        vec![FuncParam {
            name: "message".to_string(),
            ty: TypeArena::STR,
            optional: false,
            rest: false,
        }],
        TypeArena::UNDEFINED,
    );
    let console = ctx.arena.object(
        vec![ObjElem::Method {
            name: "log".to_string(),
            func: log,
        }],
        ObjectFlags::empty(),
    );
    ctx.scopes.set_prelude_value(
        "console",
        Binding::new(Span::dummy(), Scheme::mono(console), false),
    );
}

/// An abstract nominal type with the given parameters.
fn nominal_type(ctx: &mut Context, params: &[&str]) -> Arc<TypeAlias> {
    let id = ctx.arena.fresh_object_id();
    let ty = ctx.arena.alloc(Type::Object(ObjectType {
        elems: Vec::new(),
        extends: Vec::new(),
        flags: ObjectFlags::NOMINAL,
        id,
    }));
    Arc::new(TypeAlias {
        type_params: params
            .iter()
            .map(|name| TypeParamDef {
                name: (*name).to_string(),
                constraint: None,
                default: None,
            })
            .collect(),
        ty,
    })
}
