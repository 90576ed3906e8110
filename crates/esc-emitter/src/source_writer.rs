//! Cursor-tracking text writer used by the printer.
//!
//! Tracks the current (line, column) so generated spans can be backfilled
//! onto JS AST nodes as they are written. Indentation is two spaces per
//! level, applied lazily at the first write after a newline.

/// Accumulates output text while tracking the write cursor.
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    line: u32,
    column: u32,
    indent: u32,
    at_line_start: bool,
}

impl SourceWriter {
    #[must_use]
    pub fn new() -> Self {
        SourceWriter {
            output: String::new(),
            line: 0,
            column: 0,
            indent: 0,
            at_line_start: true,
        }
    }

    /// Current 0-based line.
    #[must_use]
    pub fn current_line(&self) -> u32 {
        self.line
    }

    /// Current 0-based column, including pending indentation.
    #[must_use]
    pub fn current_column(&self) -> u32 {
        if self.at_line_start {
            self.indent * 2
        } else {
            self.column
        }
    }

    fn flush_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent * 2 {
                self.output.push(' ');
            }
            self.column = self.indent * 2;
            self.at_line_start = false;
        }
    }

    /// Write text. Must not contain newlines; use `write_line`.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_indent();
        debug_assert!(!text.contains('\n'), "use write_line for newlines");
        self.output.push_str(text);
        self.column += text.chars().count() as u32;
    }

    pub fn write_char(&mut self, ch: char) {
        self.flush_indent();
        self.output.push(ch);
        self.column += 1;
    }

    pub fn write_space(&mut self) {
        self.write(" ");
    }

    /// End the current line with LF.
    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.line += 1;
        self.column = 0;
        self.at_line_start = true;
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        debug_assert!(self.indent > 0, "unbalanced indentation");
        self.indent = self.indent.saturating_sub(1);
    }

    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }
}

#[cfg(test)]
#[path = "tests/source_writer_tests.rs"]
mod tests;
