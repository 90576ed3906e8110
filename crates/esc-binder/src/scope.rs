//! Scopes, namespaces, and value/type bindings.
//!
//! Namespaces form a tree stored in an arena; a child holds its parent as
//! an arena index to avoid cyclic ownership. A scope is a stack of
//! namespace frames; lookup walks the stack innermost-first and then the
//! imported prelude.

use esc_common::Span;
use esc_solver::{Scheme, TypeAlias};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A declared value binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Span of the declaration that introduced this binding.
    pub span: Span,
    pub scheme: Scheme,
    pub mutable: bool,
}

impl Binding {
    #[must_use]
    pub fn new(span: Span, scheme: Scheme, mutable: bool) -> Self {
        Binding {
            span,
            scheme,
            mutable,
        }
    }
}

/// Index of a namespace in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub u32);

impl NamespaceId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One namespace: values, type aliases, and child namespaces.
#[derive(Debug, Default)]
pub struct Namespace {
    pub values: FxHashMap<String, Binding>,
    pub types: FxHashMap<String, Arc<TypeAlias>>,
    pub children: FxHashMap<String, NamespaceId>,
    pub parent: Option<NamespaceId>,
}

/// Arena of namespaces.
#[derive(Debug, Default)]
pub struct NamespaceArena {
    namespaces: Vec<Namespace>,
}

impl NamespaceArena {
    pub fn alloc(&mut self, parent: Option<NamespaceId>) -> NamespaceId {
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace {
            parent,
            ..Namespace::default()
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn get_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.namespaces[id.index()]
    }
}

/// The scope stack used during inference.
///
/// Frame 0 is the module root namespace; the prelude sits outside the
/// stack and is consulted last.
#[derive(Debug)]
pub struct Scopes {
    pub arena: NamespaceArena,
    frames: Vec<NamespaceId>,
    prelude: NamespaceId,
    root: NamespaceId,
}

impl Scopes {
    #[must_use]
    pub fn new() -> Self {
        let mut arena = NamespaceArena::default();
        let prelude = arena.alloc(None);
        let root = arena.alloc(None);
        Scopes {
            arena,
            frames: vec![root],
            prelude,
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> NamespaceId {
        self.root
    }

    #[must_use]
    pub fn prelude(&self) -> NamespaceId {
        self.prelude
    }

    #[must_use]
    pub fn current(&self) -> NamespaceId {
        *self.frames.last().expect("scope stack is never empty")
    }

    /// Enter a fresh child scope.
    pub fn push_scope(&mut self) {
        let current = self.current();
        let child = self.arena.alloc(Some(current));
        self.frames.push(child);
    }

    /// Enter an existing namespace as a scope frame.
    pub fn push_namespace(&mut self, id: NamespaceId) {
        self.frames.push(id);
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the root scope");
        self.frames.pop();
    }

    /// Look up a value binding, walking the stack then the prelude.
    #[must_use]
    pub fn lookup_value(&self, name: &str) -> Option<&Binding> {
        if let Some((ns_path, last)) = name.rsplit_once('.') {
            return self.lookup_namespace(ns_path).and_then(|ns| {
                self.arena.get(ns).values.get(last)
            });
        }
        for frame in self.frames.iter().rev() {
            if let Some(binding) = self.arena.get(*frame).values.get(name) {
                return Some(binding);
            }
        }
        self.arena.get(self.prelude).values.get(name)
    }

    /// Look up a type alias, walking the stack then the prelude.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<Arc<TypeAlias>> {
        if let Some((ns_path, last)) = name.rsplit_once('.') {
            return self
                .lookup_namespace(ns_path)
                .and_then(|ns| self.arena.get(ns).types.get(last).cloned());
        }
        for frame in self.frames.iter().rev() {
            if let Some(alias) = self.arena.get(*frame).types.get(name) {
                return Some(alias.clone());
            }
        }
        self.arena.get(self.prelude).types.get(name).cloned()
    }

    /// Resolve a dotted namespace path from the root.
    #[must_use]
    pub fn lookup_namespace(&self, dotted: &str) -> Option<NamespaceId> {
        let mut current = self.root;
        for segment in dotted.split('.') {
            current = *self.arena.get(current).children.get(segment)?;
        }
        Some(current)
    }

    /// Set a value binding in the current scope.
    pub fn set_value(&mut self, name: impl Into<String>, binding: Binding) {
        let current = self.current();
        self.arena.get_mut(current).values.insert(name.into(), binding);
    }

    /// Set a type alias in the current scope.
    pub fn set_type(&mut self, name: impl Into<String>, alias: Arc<TypeAlias>) {
        let current = self.current();
        self.arena.get_mut(current).types.insert(name.into(), alias);
    }

    pub fn set_prelude_value(&mut self, name: impl Into<String>, binding: Binding) {
        let prelude = self.prelude;
        self.arena.get_mut(prelude).values.insert(name.into(), binding);
    }

    pub fn set_prelude_type(&mut self, name: impl Into<String>, alias: Arc<TypeAlias>) {
        let prelude = self.prelude;
        self.arena.get_mut(prelude).types.insert(name.into(), alias);
    }

    /// Ensure a dotted namespace path exists under the root, creating
    /// missing links, and return the terminal namespace.
    pub fn ensure_namespace(&mut self, dotted: &str) -> NamespaceId {
        if dotted.is_empty() {
            return self.root;
        }
        let mut current = self.root;
        for segment in dotted.split('.') {
            let existing = self.arena.get(current).children.get(segment).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = self.arena.alloc(Some(current));
                    self.arena
                        .get_mut(current)
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }
        current
    }

    /// Record a binding under a dotted declaration name (`a.b.x` lands in
    /// namespace `a.b` as `x`; a bare name lands in the root).
    pub fn set_value_qualified(&mut self, dotted: &str, binding: Binding) {
        match dotted.rsplit_once('.') {
            Some((ns_path, name)) => {
                let ns = self.ensure_namespace(ns_path);
                self.arena.get_mut(ns).values.insert(name.to_string(), binding);
            }
            None => {
                let root = self.root;
                self.arena
                    .get_mut(root)
                    .values
                    .insert(dotted.to_string(), binding);
            }
        }
    }

    /// Record a type alias under a dotted declaration name.
    pub fn set_type_qualified(&mut self, dotted: &str, alias: Arc<TypeAlias>) {
        match dotted.rsplit_once('.') {
            Some((ns_path, name)) => {
                let ns = self.ensure_namespace(ns_path);
                self.arena.get_mut(ns).types.insert(name.to_string(), alias);
            }
            None => {
                let root = self.root;
                self.arena
                    .get_mut(root)
                    .types
                    .insert(dotted.to_string(), alias);
            }
        }
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod tests;
