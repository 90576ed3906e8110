use super::*;
use esc_common::Span;
use esc_solver::{Scheme, TypeArena};

fn binding() -> Binding {
    Binding::new(Span::dummy(), Scheme::mono(TypeArena::NUM), false)
}

#[test]
fn test_lookup_walks_scope_stack() {
    let mut scopes = Scopes::new();
    scopes.set_value("x", binding());
    scopes.push_scope();
    assert!(scopes.lookup_value("x").is_some());
    scopes.set_value("y", binding());
    assert!(scopes.lookup_value("y").is_some());
    scopes.pop_scope();
    assert!(scopes.lookup_value("y").is_none());
    assert!(scopes.lookup_value("x").is_some());
}

#[test]
fn test_inner_scope_shadows_outer() {
    let mut scopes = Scopes::new();
    let outer = Binding::new(Span::dummy(), Scheme::mono(TypeArena::NUM), false);
    let inner = Binding::new(Span::dummy(), Scheme::mono(TypeArena::STR), false);
    scopes.set_value("x", outer);
    scopes.push_scope();
    scopes.set_value("x", inner.clone());
    assert_eq!(scopes.lookup_value("x"), Some(&inner));
}

#[test]
fn test_prelude_is_consulted_last() {
    let mut scopes = Scopes::new();
    let prelude = Binding::new(Span::dummy(), Scheme::mono(TypeArena::BOOL), false);
    scopes.set_prelude_value("console", prelude.clone());
    assert_eq!(scopes.lookup_value("console"), Some(&prelude));

    let shadow = Binding::new(Span::dummy(), Scheme::mono(TypeArena::NUM), false);
    scopes.set_value("console", shadow.clone());
    assert_eq!(scopes.lookup_value("console"), Some(&shadow));
}

#[test]
fn test_qualified_binding_and_lookup() {
    let mut scopes = Scopes::new();
    scopes.set_value_qualified("foo.bar.x", binding());
    assert!(scopes.lookup_value("foo.bar.x").is_some());
    assert!(scopes.lookup_value("x").is_none());
    assert!(scopes.lookup_namespace("foo").is_some());
    assert!(scopes.lookup_namespace("foo.bar").is_some());
    assert!(scopes.lookup_namespace("foo.baz").is_none());
}

#[test]
fn test_ensure_namespace_is_idempotent() {
    let mut scopes = Scopes::new();
    let first = scopes.ensure_namespace("a.b");
    let second = scopes.ensure_namespace("a.b");
    assert_eq!(first, second);
    assert_eq!(scopes.ensure_namespace(""), scopes.root());
}
