//! Common types and utilities for the Escalier compiler.
//!
//! This crate provides foundational types used across all esc crates:
//! - Source spans (`Location`, `Span`, `Spanned`)
//! - Position/LineMap utilities for offset <-> line/column conversion
//! - Diagnostics (accumulated, never thrown)
//! - Cooperative cancellation (`CancellationToken`)
//! - Compiler options
//! - Source map generation (VLQ mappings, SourceMap v3 JSON)

// Span - Source location tracking (1-based line/column)
pub mod span;
pub use span::{Location, Span, Spanned};

// Position/LineMap for offset-based conversions (LSP surface)
pub mod position;
pub use position::{FileLocation, LineMap, Position, Range};

// Diagnostics - accumulated error reporting
pub mod diagnostics;
pub use diagnostics::{codes, Diagnostic, Severity};

// Cooperative cancellation
pub mod cancellation;
pub use cancellation::CancellationToken;

// Compiler options
pub mod options;
pub use options::CompilerOptions;

// Source map generation
pub mod source_map;
pub use source_map::{Segment, SourceMap, SourceMapGenerator};
