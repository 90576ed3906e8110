//! Name binding for the Escalier compiler.
//!
//! This crate provides:
//! - `Binding`, `Namespace`, and the scope stack used during checking
//! - `BindingKey` and the `DepGraph` of top-level declarations
//! - The Tarjan SCC scheduler that orders declarations for analysis
//!   and emission

pub mod scope;
pub use scope::{Binding, Namespace, NamespaceArena, NamespaceId, Scopes};

pub mod dep_graph;
pub use dep_graph::{
    build_dep_graph, namespace_from_path, BindingKey, BindingKind, DeclRef, DepGraph,
};

pub mod tarjan;
pub use tarjan::strongly_connected_components;
