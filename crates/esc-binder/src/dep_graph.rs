//! Dependency graph of top-level declarations.
//!
//! The graph keys every top-level declaration by `(kind, dotted name)`,
//! records the edges induced by referenced identifiers, merges function
//! overloads and same-name interfaces into single nodes, and schedules
//! strongly connected components in dependency-first order.

use crate::tarjan::strongly_connected_components;
use esc_ast::{
    visit, Decl, Expr, Module, Pattern, Stmt, TypeAnn, Visitor,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Whether a binding names a value or a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingKind {
    Value,
    Type,
}

/// The (kind, name) pair identifying a top-level declaration. The name is
/// dotted for namespaced declarations (`a.b.x`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub kind: BindingKind,
    pub name: String,
}

impl BindingKey {
    pub fn value(name: impl Into<String>) -> Self {
        BindingKey {
            kind: BindingKind::Value,
            name: name.into(),
        }
    }

    pub fn type_(name: impl Into<String>) -> Self {
        BindingKey {
            kind: BindingKind::Type,
            name: name.into(),
        }
    }

    /// The bare name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.rsplit_once('.').map_or(&self.name[..], |(_, n)| n)
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            BindingKind::Value => write!(f, "value:{}", self.name),
            BindingKind::Type => write!(f, "type:{}", self.name),
        }
    }
}

/// Reference to a declaration inside a `Module`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclRef {
    pub item: usize,
    pub decl: usize,
}

/// The dependency graph over top-level declarations.
#[derive(Debug, Default)]
pub struct DepGraph {
    /// Declarations per key. Overloaded functions and merged interfaces
    /// list every declaration under one key.
    pub decls: IndexMap<BindingKey, Vec<DeclRef>>,
    /// Edges `key -> keys it depends on`.
    pub deps: FxHashMap<BindingKey, FxHashSet<BindingKey>>,
    /// Namespace (dotted, possibly empty) per key.
    pub namespace: FxHashMap<BindingKey, String>,
    /// All namespaces seen, in first-use order.
    pub namespaces: IndexSet<String>,
    /// Strongly connected components in dependency-first order.
    pub components: Vec<Vec<BindingKey>>,
}

impl DepGraph {
    /// Fetch a declaration through a `DeclRef`.
    #[must_use]
    pub fn decl<'m>(&self, module: &'m Module, decl_ref: DeclRef) -> &'m Decl {
        &module.items[decl_ref.item].decls[decl_ref.decl]
    }

    /// True if the key participates in a multi-member component or
    /// depends on itself.
    #[must_use]
    pub fn is_self_recursive(&self, key: &BindingKey) -> bool {
        self.deps
            .get(key)
            .is_some_and(|deps| deps.contains(key))
    }
}

/// Derive the namespace from a source path: split on `/`, drop the
/// terminal filename, join with `.`. `a/b/x.esc` places its declarations
/// in namespace `a.b`.
#[must_use]
pub fn namespace_from_path(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments.join(".")
}

/// Join a namespace and a local name into a dotted binding name.
fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Build the dependency graph for a module.
pub fn build_dep_graph(module: &Module) -> DepGraph {
    let mut graph = DepGraph::default();

    // Pass 1: binding keys per declaration. Var patterns may introduce
    // several keys all pointing at the same declaration.
    for (item_idx, item) in module.items.iter().enumerate() {
        let namespace = namespace_from_path(&item.path);
        graph.namespaces.insert(namespace.clone());
        for (decl_idx, decl) in item.decls.iter().enumerate() {
            collect_decl_keys(
                &mut graph,
                decl,
                DeclRef {
                    item: item_idx,
                    decl: decl_idx,
                },
                &namespace,
            );
        }
    }

    // Pass 2: dependency edges from referenced identifiers, resolved to
    // sibling declarations (same namespace first, then root).
    let keys: Vec<BindingKey> = graph.decls.keys().cloned().collect();
    for key in &keys {
        let namespace = graph.namespace.get(key).cloned().unwrap_or_default();
        let mut edges: FxHashSet<BindingKey> = FxHashSet::default();
        for decl_ref in graph.decls.get(key).cloned().unwrap_or_default() {
            let decl = graph.decl(module, decl_ref);
            let refs = free_references(decl);
            for (kind, name) in refs {
                let qualified = BindingKey {
                    kind,
                    name: qualify(&namespace, &name),
                };
                let target = if graph.decls.contains_key(&qualified) {
                    Some(qualified)
                } else {
                    let bare = BindingKey { kind, name };
                    graph.decls.contains_key(&bare).then_some(bare)
                };
                if let Some(target) = target {
                    edges.insert(target);
                }
            }
        }
        graph.deps.insert(key.clone(), edges);
    }

    // Pass 3: intern keys to dense ids and run Tarjan.
    let key_index: FxHashMap<&BindingKey, u32> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k, i as u32))
        .collect();
    let adj: Vec<Vec<u32>> = keys
        .iter()
        .map(|key| {
            let mut successors: Vec<u32> = graph
                .deps
                .get(key)
                .map(|deps| {
                    deps.iter()
                        .filter_map(|dep| key_index.get(dep).copied())
                        .collect()
                })
                .unwrap_or_default();
            successors.sort_unstable();
            successors
        })
        .collect();

    let components = strongly_connected_components(keys.len(), &adj);
    graph.components = components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|id| keys[id as usize].clone())
                .collect()
        })
        .collect();

    debug!(
        decls = graph.decls.len(),
        components = graph.components.len(),
        "dependency graph built"
    );
    graph
}

fn collect_decl_keys(graph: &mut DepGraph, decl: &Decl, decl_ref: DeclRef, namespace: &str) {
    match decl {
        Decl::Var(var) => {
            let mut names = Vec::new();
            var.pattern.binding_names(&mut names);
            for name in names {
                push_key(
                    graph,
                    BindingKey::value(qualify(namespace, &name)),
                    decl_ref,
                    namespace,
                );
            }
        }
        Decl::Func(func) => push_key(
            graph,
            BindingKey::value(qualify(namespace, &func.name)),
            decl_ref,
            namespace,
        ),
        Decl::TypeAlias(alias) => push_key(
            graph,
            BindingKey::type_(qualify(namespace, &alias.name)),
            decl_ref,
            namespace,
        ),
        Decl::Interface(iface) => push_key(
            graph,
            BindingKey::type_(qualify(namespace, &iface.name)),
            decl_ref,
            namespace,
        ),
        Decl::Class(class) => push_key(
            graph,
            BindingKey::value(qualify(namespace, &class.name)),
            decl_ref,
            namespace,
        ),
        Decl::Enum(en) => push_key(
            graph,
            BindingKey::value(qualify(namespace, &en.name)),
            decl_ref,
            namespace,
        ),
        Decl::Namespace(ns) => {
            // Explicit namespace blocks extend the path for their decls,
            // but the graph still points at the whole block.
            let nested = qualify(namespace, &ns.name);
            graph.namespaces.insert(nested.clone());
            for inner in &ns.decls {
                collect_decl_keys(graph, inner, decl_ref, &nested);
            }
        }
    }
}

fn push_key(graph: &mut DepGraph, key: BindingKey, decl_ref: DeclRef, namespace: &str) {
    graph.namespace.insert(key.clone(), namespace.to_string());
    let decls = graph.decls.entry(key).or_default();
    // One Var pattern introducing several keys shares the DeclRef; avoid
    // double-recording a decl under its own key.
    if !decls.contains(&decl_ref) {
        decls.push(decl_ref);
    }
}

// =============================================================================
// Free reference scanning
// =============================================================================

/// Names that resolve to built-in types, never to sibling declarations.
const BUILTIN_TYPE_NAMES: &[&str] = &[
    "number", "string", "boolean", "bigint", "symbol", "null", "undefined", "unknown", "never",
    "any", "object", "true", "false", "_",
];

/// Scan a declaration for the identifiers it references, with local
/// bindings (parameters, block declarations, pattern names, type
/// parameters) shadowed out.
fn free_references(decl: &Decl) -> Vec<(BindingKind, String)> {
    let mut scanner = FreeRefs {
        out: IndexSet::new(),
        value_locals: vec![FxHashSet::default()],
        type_locals: vec![FxHashSet::default()],
    };

    // Declared names stay visible to their own initializers and bodies,
    // so recursion surfaces as a self-edge for the scheduler.
    scanner.visit_decl(decl);

    scanner.out.into_iter().collect()
}

struct FreeRefs {
    out: IndexSet<(BindingKind, String)>,
    value_locals: Vec<FxHashSet<String>>,
    type_locals: Vec<FxHashSet<String>>,
}

impl FreeRefs {
    fn is_value_local(&self, name: &str) -> bool {
        self.value_locals.iter().any(|frame| frame.contains(name))
    }

    fn is_type_local(&self, name: &str) -> bool {
        self.type_locals.iter().any(|frame| frame.contains(name))
    }

    fn bind_pattern(&mut self, pattern: &Pattern) {
        let mut names = Vec::new();
        pattern.binding_names(&mut names);
        let frame = self.value_locals.last_mut().expect("scope stack");
        frame.extend(names);
    }

    fn bind_type_params(&mut self, type_params: &[esc_ast::TypeParam]) {
        let frame = self.type_locals.last_mut().expect("scope stack");
        frame.extend(type_params.iter().map(|tp| tp.name.clone()));
    }

    fn push(&mut self) {
        self.value_locals.push(FxHashSet::default());
        self.type_locals.push(FxHashSet::default());
    }

    fn pop(&mut self) {
        self.value_locals.pop();
        self.type_locals.pop();
    }
}

impl Visitor for FreeRefs {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                let name = ident.qualified_name();
                if ident.namespace.is_some() || !self.is_value_local(&name) {
                    self.out.insert((BindingKind::Value, name));
                }
            }
            Expr::Func {
                type_params,
                params,
                ..
            } => {
                self.push();
                self.bind_type_params(type_params);
                for param in params {
                    self.bind_pattern(&param.pattern);
                }
                visit::walk_expr(self, expr);
                self.pop();
            }
            Expr::Match { target, cases, .. } => {
                self.visit_expr(target);
                for case in cases {
                    self.push();
                    self.bind_pattern(&case.pattern);
                    self.visit_pattern(&case.pattern);
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    self.visit_expr(&case.body);
                    self.pop();
                }
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        if let Pattern::Extractor { name, .. } = pattern {
            if !self.is_value_local(name) {
                self.out.insert((BindingKind::Value, name.clone()));
            }
        }
        visit::walk_pattern(self, pattern);
    }

    fn visit_block(&mut self, block: &esc_ast::Block) {
        self.push();
        // Hoist block-level declarations so later statements in the block
        // do not appear as free references.
        for stmt in &block.stmts {
            if let Stmt::Decl(decl) = stmt {
                let mut names = Vec::new();
                decl.binding_names(&mut names);
                match decl {
                    Decl::TypeAlias(_) | Decl::Interface(_) => {
                        let frame = self.type_locals.last_mut().expect("scope stack");
                        frame.extend(names);
                    }
                    _ => {
                        let frame = self.value_locals.last_mut().expect("scope stack");
                        frame.extend(names);
                    }
                }
            }
        }
        visit::walk_block(self, block);
        self.pop();
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Func(func) => {
                self.push();
                self.bind_type_params(&func.sig.type_params);
                for param in &func.sig.params {
                    self.bind_pattern(&param.pattern);
                }
                visit::walk_decl(self, decl);
                self.pop();
            }
            Decl::TypeAlias(alias) => {
                self.push();
                self.bind_type_params(&alias.type_params);
                visit::walk_decl(self, decl);
                self.pop();
            }
            Decl::Interface(iface) => {
                self.push();
                self.bind_type_params(&iface.type_params);
                visit::walk_decl(self, decl);
                self.pop();
            }
            _ => visit::walk_decl(self, decl),
        }
    }

    fn visit_type_ann(&mut self, type_ann: &TypeAnn) {
        if let TypeAnn::Ref { name, .. } = type_ann {
            if !BUILTIN_TYPE_NAMES.contains(&name.as_str()) && !self.is_type_local(name) {
                self.out.insert((BindingKind::Type, name.clone()));
            }
        }
        visit::walk_type_ann(self, type_ann);
    }
}

#[cfg(test)]
#[path = "tests/dep_graph_tests.rs"]
mod tests;
