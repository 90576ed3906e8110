//! LSP operations: validation, hover, definition, and the `compile`
//! workspace command.

use crate::documents::DocumentStore;
use esc_ast::{visit, Expr, Ident, Module, ModuleItem, Parser, Script, Stmt, Visitor};
use esc_checker::{infer_module, infer_script, Context};
use esc_common::{
    CancellationToken, CompilerOptions, Diagnostic, FileLocation, Position, Range, Span, Spanned,
};
use esc_emitter::{build_module, print_module};
use esc_solver::TypeDisplay;
use std::time::Duration;
use tracing::debug;

/// A freshly produced text document (the `compile` command result).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TextDocumentItem {
    pub uri: String,
    #[serde(rename = "languageId")]
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LspError {
    /// Only whole-document synchronization is supported.
    IncrementalChangesUnsupported,
    UnknownDocument(String),
}

impl std::fmt::Display for LspError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LspError::IncrementalChangesUnsupported => {
                write!(f, "incremental document changes are not supported")
            }
            LspError::UnknownDocument(uri) => write!(f, "unknown document: {uri}"),
        }
    }
}

/// The operations behind the LSP transport.
pub struct LspServer<P> {
    parser: P,
    pub documents: DocumentStore,
    options: CompilerOptions,
}

impl<P: Parser> LspServer<P> {
    pub fn new(parser: P) -> Self {
        LspServer {
            parser,
            documents: DocumentStore::new(),
            options: CompilerOptions::default(),
        }
    }

    /// `textDocument/didOpen`: cache the document and validate it.
    pub fn did_open(&mut self, uri: &str, text: String, version: i32) -> Vec<Diagnostic> {
        self.documents.open(uri, text, version);
        self.validate(uri, Self::validation_token())
    }

    /// `textDocument/didChange`, whole-document mode only. A ranged
    /// (incremental) change is rejected.
    pub fn did_change(
        &mut self,
        uri: &str,
        range: Option<Range>,
        text: String,
        version: i32,
    ) -> Result<Vec<Diagnostic>, LspError> {
        if range.is_some() {
            return Err(LspError::IncrementalChangesUnsupported);
        }
        if !self.documents.update(uri, text, version) {
            return Err(LspError::UnknownDocument(uri.to_string()));
        }
        Ok(self.validate(uri, Self::validation_token()))
    }

    /// Each validation runs under a one-second deadline.
    fn validation_token() -> CancellationToken {
        CancellationToken::with_timeout(Duration::from_secs(1))
    }

    /// Parse and check one document, returning its diagnostics.
    pub fn validate(&mut self, uri: &str, token: CancellationToken) -> Vec<Diagnostic> {
        let Some(script) = self.script_for(uri) else {
            return Vec::new();
        };
        let parse_diags = self.parse_diags(uri);

        let mut ctx = Context::with_cancellation(token);
        let (_, mut diags) = infer_script(&mut ctx, &script);
        debug!(uri, diagnostics = diags.len(), "validated");

        let mut all = parse_diags;
        all.append(&mut diags);
        all
    }

    /// Parse (or reuse) the document's AST.
    fn script_for(&mut self, uri: &str) -> Option<Script> {
        let doc = self.documents.get(uri)?;
        if let Some(script) = &doc.script {
            return Some(script.clone());
        }
        let (script, _diags) = self.parser.parse_script(&doc.source);
        let doc = self.documents.get_mut(uri)?;
        doc.script = Some(script.clone());
        Some(script)
    }

    fn parse_diags(&mut self, uri: &str) -> Vec<Diagnostic> {
        let doc = match self.documents.get(uri) {
            Some(doc) => doc,
            None => return Vec::new(),
        };
        let (_, diags) = self.parser.parse_script(&doc.source);
        diags
    }

    /// Convert an incoming LSP position through the document's line map,
    /// so UTF-16 columns land on the right compiler column.
    fn request_location(&self, uri: &str, position: Position) -> Option<esc_common::Location> {
        let doc = self.documents.get(uri)?;
        doc.line_map
            .position_to_location(position, &doc.source.contents)
    }

    /// `textDocument/hover`: the display type of the identifier at the
    /// position.
    pub fn hover(&mut self, uri: &str, position: Position) -> Option<String> {
        let location = self.request_location(uri, position)?;
        let script = self.script_for(uri)?;
        let ident = find_ident_at(&script, location)?;

        let mut ctx = Context::new();
        let _ = infer_script(&mut ctx, &script);
        let binding = ctx.scopes.lookup_value(&ident.qualified_name())?;
        let rendered = TypeDisplay::new(&ctx.arena, binding.scheme.ty).to_string();
        Some(format!("{}: {rendered}", ident.name))
    }

    /// `textDocument/definition`: the span of the declaration that
    /// introduces the identifier at the position.
    pub fn definition(&mut self, uri: &str, position: Position) -> Option<FileLocation> {
        let location = self.request_location(uri, position)?;
        let script = self.script_for(uri)?;
        let ident = find_ident_at(&script, location)?;

        let span = find_decl_span(&script, &ident.name)?;
        let doc = self.documents.get(uri)?;
        let start = doc
            .line_map
            .location_to_position(span.start, &doc.source.contents)?;
        let end = doc
            .line_map
            .location_to_position(span.end, &doc.source.contents)?;
        Some(FileLocation::new(uri.to_string(), Range::new(start, end)))
    }

    /// `workspace/executeCommand "compile"`: run the full pipeline and
    /// return the compiled JS as a new text document.
    pub fn execute_compile(&mut self, uri: &str) -> Result<TextDocumentItem, LspError> {
        let doc = self
            .documents
            .get(uri)
            .ok_or_else(|| LspError::UnknownDocument(uri.to_string()))?;
        let source = doc.source.clone();

        let (module, _parse_diags) = self.parser.parse_module(std::slice::from_ref(&source));
        let module = nonempty_module(module, &source);

        let mut ctx = Context::new();
        let (graph, _diags) = infer_module(&mut ctx, &module);
        let mut js = build_module(&module, &graph, &self.options);
        let text = print_module(&mut js);

        Ok(TextDocumentItem {
            uri: rename_to_js(uri),
            language_id: "javascript".to_string(),
            version: 0,
            text,
        })
    }
}

/// A parser collaborator may hand back an empty module for script-shaped
/// input; fall back to a single empty item so emission still runs.
fn nonempty_module(module: Module, source: &esc_ast::Source) -> Module {
    if module.items.is_empty() {
        Module {
            items: vec![ModuleItem {
                source_id: source.id,
                path: source.path.clone(),
                decls: Vec::new(),
            }],
        }
    } else {
        module
    }
}

fn rename_to_js(uri: &str) -> String {
    match uri.strip_suffix(".esc") {
        Some(stem) => format!("{stem}.js"),
        None => format!("{uri}.js"),
    }
}

/// Find the identifier whose span contains the location.
fn find_ident_at(script: &Script, location: esc_common::Location) -> Option<Ident> {
    struct Finder {
        location: esc_common::Location,
        found: Option<Ident>,
    }
    impl Visitor for Finder {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Ident(ident) = expr {
                if ident.span.contains(self.location) {
                    self.found = Some(ident.clone());
                }
            }
            visit::walk_expr(self, expr);
        }
    }
    let mut finder = Finder {
        location,
        found: None,
    };
    for stmt in &script.stmts {
        finder.visit_stmt(stmt);
    }
    finder.found
}

/// Find the top-level declaration introducing `name`.
fn find_decl_span(script: &Script, name: &str) -> Option<Span> {
    for stmt in &script.stmts {
        if let Stmt::Decl(decl) = stmt {
            let mut names = Vec::new();
            decl.binding_names(&mut names);
            if names.iter().any(|n| n == name) {
                return Some(decl.span());
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "tests/server_tests.rs"]
mod tests;
