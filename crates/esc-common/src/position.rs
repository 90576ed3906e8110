//! Position and line-map utilities for the LSP surface.
//!
//! LSP uses 0-based line/character positions with UTF-16 columns, while the
//! compiler's spans are 1-based line/column. This module provides the
//! conversions between byte offsets, LSP positions, and compiler locations.

use crate::span::Location;

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units for LSP compatibility)
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Convert to the compiler's 1-based location.
    #[must_use]
    pub fn to_location(self) -> Location {
        Location::new(self.line + 1, self.character + 1)
    }

    /// Convert from the compiler's 1-based location.
    #[must_use]
    pub fn from_location(loc: Location) -> Self {
        Self {
            line: loc.line.saturating_sub(1),
            character: loc.column.saturating_sub(1),
        }
    }
}

/// A range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A location in a source file (file URI + range), as the LSP surface
/// reports it. The compiler-side line/column type is `span::Location`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileLocation {
    pub uri: String,
    pub range: Range,
}

impl FileLocation {
    #[must_use]
    pub fn new(uri: String, range: Range) -> Self {
        Self { uri, range }
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];

        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a Position (line, character).
    /// Character is counted in UTF-16 code units for LSP compatibility.
    #[must_use]
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = usize::try_from(self.line_starts.get(line).copied().unwrap_or(0))
            .unwrap_or(usize::MAX)
            .min(source.len());
        let clamped_end = usize::try_from(offset)
            .unwrap_or(source.len())
            .min(source.len());
        let start = line_start.min(clamped_end);
        let slice = source.get(start..clamped_end).unwrap_or("");
        let character = slice
            .chars()
            .map(|ch| u32::try_from(ch.len_utf16()).unwrap_or(u32::MAX))
            .sum();

        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character,
        }
    }

    /// Convert a Position (line, character) to a byte offset.
    #[must_use]
    pub fn position_to_offset(&self, position: Position, source: &str) -> Option<u32> {
        let line_idx = usize::try_from(position.line).ok()?;
        let line_start = *self.line_starts.get(line_idx)?;
        let line_start = usize::try_from(line_start).ok()?;
        let line_limit = if line_idx + 1 < self.line_starts.len() {
            usize::try_from(self.line_starts[line_idx + 1]).ok()?
        } else {
            source.len()
        };
        let slice = source.get(line_start..line_limit).unwrap_or("");
        let mut utf16_count = 0u32;
        let mut byte_count = 0usize;

        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            let ch_utf16 = u32::try_from(ch.len_utf16()).ok()?;
            if utf16_count + ch_utf16 > position.character {
                break;
            }
            utf16_count += ch_utf16;
            byte_count += ch.len_utf8();
            if utf16_count == position.character {
                break;
            }
        }

        u32::try_from(line_start + byte_count).ok()
    }

    /// Convert an LSP position (UTF-16 columns) to the compiler's
    /// 1-based line/column location, where columns count characters.
    ///
    /// The two units diverge on any line containing a character outside
    /// the Basic Multilingual Plane, so LSP requests must come through
    /// here rather than naive offset arithmetic.
    #[must_use]
    pub fn position_to_location(&self, position: Position, source: &str) -> Option<Location> {
        let offset = self.position_to_offset(position, source)? as usize;
        let line_start = *self.line_starts.get(position.line as usize)? as usize;
        let slice = source.get(line_start..offset)?;
        let column = u32::try_from(slice.chars().count()).ok()?;
        Some(Location::new(position.line + 1, column + 1))
    }

    /// Convert a compiler location back to an LSP position (UTF-16
    /// columns).
    #[must_use]
    pub fn location_to_position(&self, location: Location, source: &str) -> Option<Position> {
        let line = location.line.checked_sub(1)?;
        let column = location.column.checked_sub(1)?;
        let line_start = *self.line_starts.get(line as usize)? as usize;
        let slice = source.get(line_start..)?;
        let mut character = 0u32;
        for (index, ch) in slice.chars().enumerate() {
            if index as u32 == column || ch == '\n' || ch == '\r' {
                break;
            }
            character += u32::try_from(ch.len_utf16()).ok()?;
        }
        Some(Position::new(line, character))
    }

    /// Get the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
