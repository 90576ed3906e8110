//! JavaScript code generation for the Escalier compiler.
//!
//! The JS builder lowers the source AST into a conservative JavaScript
//! AST: patterns compile to runtime guards plus destructuring bindings,
//! namespaces fold to dunder-prefixed globals with mount assignments, and
//! JSX lowers to `jsx-runtime` calls. The printer serializes the JS AST
//! deterministically, backfilling generated spans that drive source-map
//! emission. The `.d.ts` builder renders each binding's inferred type.

pub mod js_ast;
pub use js_ast::{
    stamp_source_file, GenSpan, JsBinOp, JsDeclKind, JsDeclarator, JsExpr, JsExprKind, JsModule,
    JsObjPatProp, JsObjProp, JsPat, JsStmt, JsStmtKind, JsUnaryOp, SourceRef,
};

pub mod source_writer;
pub use source_writer::SourceWriter;

pub mod printer;
pub use printer::{print_module, Printer};

pub mod builder;
pub use builder::{build_module, JsBuilder};

pub mod patterns;

pub mod jsx;

pub mod dts;
pub use dts::build_dts;

pub mod source_map_gen;
pub use source_map_gen::{generate_inline_source_map, generate_source_map};
