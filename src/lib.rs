//! Escalier: a statically-typed language that compiles to JavaScript.
//!
//! This crate wires the pipeline together: the parser collaborator
//! produces the source AST, the dependency graph schedules top-level
//! declarations, the checker infers a type for every binding, and the
//! emitter produces JavaScript, a SourceMap v3 document, and `.d.ts`
//! type definitions.

pub use esc_ast as ast;
pub use esc_binder as binder;
pub use esc_checker as checker;
pub use esc_common as common;
pub use esc_emitter as emitter;
pub use esc_lsp as lsp;
pub use esc_solver as solver;

use esc_ast::{Parser, Source};
use esc_checker::{infer_module, Context};
use esc_common::{CompilerOptions, Diagnostic, SourceMap};
use esc_emitter::{build_dts, generate_source_map, print_module, JsBuilder};
use tracing::debug;

/// Everything one compilation produces.
#[derive(Debug)]
pub struct CompileResult {
    pub js: String,
    pub dts: Option<String>,
    pub source_map: Option<SourceMap>,
    pub parse_errors: Vec<Diagnostic>,
    pub type_errors: Vec<Diagnostic>,
}

impl CompileResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.parse_errors.iter().any(Diagnostic::is_error)
            || self.type_errors.iter().any(Diagnostic::is_error)
    }

    /// The source map as SourceMap v3 JSON text.
    #[must_use]
    pub fn source_map_json(&self) -> Option<String> {
        self.source_map
            .as_ref()
            .and_then(|map| serde_json::to_string(map).ok())
    }
}

/// Run the full pipeline over a set of sources.
///
/// Every pass runs even in the presence of errors; emission is
/// suppressed only for declarations whose binding type could not be
/// closed.
pub fn compile(
    sources: &[Source],
    parser: &dyn Parser,
    options: &CompilerOptions,
) -> CompileResult {
    let (module, parse_errors) = parser.parse_module(sources);

    let mut ctx = Context::new();
    let (graph, type_errors) = infer_module(&mut ctx, &module);
    debug!(
        decls = graph.decls.len(),
        errors = type_errors.len(),
        "checked module"
    );

    let mut builder = JsBuilder::new(&module, &graph, options.clone());
    builder.suppress(ctx.failed_keys.iter().cloned());
    let mut js_module = builder.build();
    let mut js = print_module(&mut js_module);

    let out_name = sources
        .first()
        .map(|s| js_name(&s.path))
        .unwrap_or_else(|| "out.js".to_string());

    let source_map = if options.source_maps && !sources.is_empty() {
        let map = generate_source_map(sources, &js_module, &out_name);
        if options.inline_source_map {
            js.push_str(&esc_emitter::generate_inline_source_map(
                sources,
                &js_module,
                &out_name,
            ));
            js.push('\n');
        }
        Some(map)
    } else {
        None
    };

    let dts = options
        .declarations
        .then(|| build_dts(&module, &graph, &ctx));

    CompileResult {
        js,
        dts,
        source_map,
        parse_errors,
        type_errors,
    }
}

/// Rewrite a source path's `.esc` suffix to `.js`.
fn js_name(path: &str) -> String {
    match path.strip_suffix(".esc") {
        Some(stem) => format!("{stem}.js"),
        None => format!("{path}.js"),
    }
}

/// Install the default tracing subscriber, honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
