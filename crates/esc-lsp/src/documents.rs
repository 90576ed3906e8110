//! Open-document store with parsed-AST caching.

use esc_ast::{Script, Source};
use esc_common::LineMap;
use rustc_hash::FxHashMap;

/// One open document.
#[derive(Debug)]
pub struct Document {
    pub source: Source,
    pub version: i32,
    pub line_map: LineMap,
    /// Parsed AST, reused by hover and definition until the next change.
    pub script: Option<Script>,
}

impl Document {
    #[must_use]
    pub fn new(source: Source, version: i32) -> Self {
        let line_map = LineMap::build(&source.contents);
        Document {
            source,
            version,
            line_map,
            script: None,
        }
    }
}

/// URI-keyed store of open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: FxHashMap<String, Document>,
    next_id: u32,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or replace a document.
    pub fn open(&mut self, uri: &str, text: String, version: i32) {
        let id = match self.docs.get(uri) {
            Some(doc) => doc.source.id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        let path = uri_to_path(uri);
        self.docs.insert(
            uri.to_string(),
            Document::new(Source::new(id, path, text), version),
        );
    }

    /// Replace a document's full contents, invalidating the AST cache.
    pub fn update(&mut self, uri: &str, text: String, version: i32) -> bool {
        match self.docs.get_mut(uri) {
            Some(doc) => {
                doc.source.contents = text;
                doc.version = version;
                doc.line_map = LineMap::build(&doc.source.contents);
                doc.script = None;
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, uri: &str) {
        self.docs.remove(uri);
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.docs.get(uri)
    }

    pub fn get_mut(&mut self, uri: &str) -> Option<&mut Document> {
        self.docs.get_mut(uri)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Strip a `file://` scheme; the remainder is used as the source path.
fn uri_to_path(uri: &str) -> String {
    uri.strip_prefix("file://").unwrap_or(uri).to_string()
}
