//! Span - Source location tracking for AST nodes and diagnostics
//!
//! A `Location` is a 1-based line/column pair as reported by the parser.
//! A `Span` is a half-open `[start, end)` range of locations. Spans are
//! attached to every AST node and every diagnostic, and drive source map
//! generation.

use serde::{Deserialize, Serialize};

/// A position in a source file (1-based line and column).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl Location {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }

    /// The first position in any file.
    #[inline]
    pub const fn start_of_file() -> Self {
        Location { line: 1, column: 1 }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::start_of_file()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source code: half-open `[start, end)` in line/column space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    #[inline]
    pub const fn new(start: Location, end: Location) -> Self {
        Span { start, end }
    }

    /// Create an empty span at the given position.
    #[inline]
    pub const fn at(pos: Location) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Create a dummy span for synthetic nodes.
    #[inline]
    pub const fn dummy() -> Self {
        Span {
            start: Location::new(0, 0),
            end: Location::new(0, 0),
        }
    }

    /// Check if this is a dummy span (synthetic node).
    #[inline]
    pub const fn is_dummy(&self) -> bool {
        self.start.line == 0
    }

    /// Check if this span contains a position.
    #[inline]
    pub fn contains(&self, pos: Location) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Merge two spans to create a span covering both.
    #[inline]
    pub fn merge(&self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return *self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A trait for types that have a source span.
pub trait Spanned {
    /// Get the source span of this element.
    fn span(&self) -> Span;

    /// Get the start location.
    fn start(&self) -> Location {
        self.span().start
    }

    /// Get the end location.
    fn end(&self) -> Location {
        self.span().end
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
#[path = "../tests/span.rs"]
mod tests;
