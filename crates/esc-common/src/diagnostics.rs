//! Diagnostics - accumulated error reporting.
//!
//! Every analyzer returns its partial result plus a list of diagnostics;
//! errors are never thrown and never abort a pass. The numeric codes are
//! stable and grouped by pipeline stage.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Diagnostic severity, in descending order of urgency.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// Stable diagnostic codes, grouped by pipeline stage.
pub mod codes {
    /// Bad syntax; span covers the offending token.
    pub const PARSE_ERROR: u32 = 1001;
    /// Type mismatch between two endpoints.
    pub const TYPE_MISMATCH: u32 = 2001;
    /// Identifier not in scope.
    pub const UNRESOLVED_NAME: u32 = 2002;
    /// Wrong number of arguments or type arguments.
    pub const ARITY_MISMATCH: u32 = 2003;
    /// Incompatible duplicate properties in merged interfaces.
    pub const INTERFACE_MERGE: u32 = 2004;
    /// Pattern cannot bind the inferred target type.
    pub const PATTERN_MISMATCH: u32 = 2005;
    /// Cyclic top-level value dependency not typeable as recursive.
    pub const DEPENDENCY_CYCLE: u32 = 2006;
    /// Occurs check failure: a type variable appears in its own binding.
    pub const INFINITE_TYPE: u32 = 2007;
    /// The compiler deliberately rejects a construct it does not yet handle.
    pub const UNIMPLEMENTED: u32 = 3001;
    /// The compilation was cancelled cooperatively.
    pub const CANCELLED: u32 = 9001;
}

/// Related location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedInformation {
    pub span: Span,
    pub message: String,
}

/// A single diagnostic: severity, stable code, source span, message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: u32,
    pub span: Span,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<RelatedInformation>,
}

impl Diagnostic {
    pub fn error(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self {
            severity: Severity::Error,
            code,
            span,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn warning(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            span,
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    /// The `Unimplemented` taxonomy entry surfaces as a warning.
    pub fn unimplemented(span: Span, construct: &str) -> Self {
        Self::warning(
            span,
            format!("not yet implemented: {construct}"),
            codes::UNIMPLEMENTED,
        )
    }

    pub fn cancelled(span: Span) -> Self {
        Self::error(span, "compilation cancelled", codes::CANCELLED)
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(RelatedInformation {
            span,
            message: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ESC{}: {}",
            self.span.start, self.code, self.message
        )
    }
}
