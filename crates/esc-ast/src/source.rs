//! Source files, scripts and modules.

use crate::decl::Decl;
use crate::stmt::Stmt;
use serde::{Deserialize, Serialize};

/// One logical source file.
///
/// `path` drives namespace derivation; `id` is the stable small integer
/// used as the source index in emitted source maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: u32,
    pub path: String,
    pub contents: String,
}

impl Source {
    pub fn new(id: u32, path: impl Into<String>, contents: impl Into<String>) -> Self {
        Source {
            id,
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// A script: an ordered list of statements from a single source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub stmts: Vec<Stmt>,
}

/// The top-level declarations contributed by one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleItem {
    pub source_id: u32,
    pub path: String,
    pub decls: Vec<Decl>,
}

/// A module: top-level declarations collected across source files, with
/// per-source namespace attribution derived from each file's path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub items: Vec<ModuleItem>,
}

impl Module {
    /// Iterate all declarations with their owning item index.
    pub fn decls(&self) -> impl Iterator<Item = (usize, usize, &Decl)> {
        self.items.iter().enumerate().flat_map(|(item_idx, item)| {
            item.decls
                .iter()
                .enumerate()
                .map(move |(decl_idx, decl)| (item_idx, decl_idx, decl))
        })
    }
}
