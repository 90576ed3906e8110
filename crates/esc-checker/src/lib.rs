//! Type inference engine for the Escalier compiler.
//!
//! Inference consumes the dependency graph's component schedule, infers a
//! type for every expression and pattern, and populates the namespace
//! tree with generalized bindings. All errors are accumulated as
//! diagnostics; nothing panics the pass.

pub mod context;
pub use context::Context;

pub mod prelude;
pub use prelude::install_prelude;

pub mod type_ann;

pub mod infer_pattern;
pub use infer_pattern::PatternBindings;

pub mod infer_expr;

pub mod declarations;

pub mod module;
pub use module::{check_module, infer_module, infer_script};
