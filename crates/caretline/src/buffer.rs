#![forbid(unsafe_code)]

//! Line storage and formatter notifications.
//!
//! [`TextBuffer`] owns the ordered lines of one document and the
//! [`LineFormatter`] that mirrors them. Every mutation that adds, removes, or
//! replaces a line calls the matching hook in the same order the mutation is
//! applied, so a per-line token index kept by the formatter stays aligned
//! with the buffer line for line.
//!
//! A buffer always holds at least one line; an empty document is a single
//! empty line.
//!
//! # Example
//! ```
//! use caretline::buffer::TextBuffer;
//!
//! let mut buf = TextBuffer::from_text("alpha\nbeta");
//! buf.insert_lines(1, ["middle".to_string()]);
//! assert_eq!(buf.full_text(), "alpha\nmiddle\nbeta");
//! buf.clear();
//! assert_eq!(buf.line_count(), 1);
//! ```

use std::fmt;
use std::ops::Range;

use crate::position::{TextPosition, TextRange, char_len};

/// Point in host pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// External token/format index kept in sync with the buffer.
///
/// Hooks are called inline with the mutation that caused them and receive
/// plain strings, never the buffer itself, so they cannot re-enter it.
/// All methods default to no-ops.
pub trait LineFormatter {
    /// A line was inserted at `index`.
    fn on_line_added(&mut self, index: usize, text: &str) {
        let _ = (index, text);
    }

    /// The line at `index` was removed.
    fn on_line_removed(&mut self, index: usize, text: &str) {
        let _ = (index, text);
    }

    /// The line at `index` changed from `old` to `new`.
    fn on_line_replaced(&mut self, index: usize, old: &str, new: &str) {
        let _ = (index, old, new);
    }

    /// Draw one line. `selection` is the selected column span on this line.
    fn render_line(&mut self, index: usize, text: &str, selection: Option<Range<usize>>) {
        let _ = (index, text, selection);
    }

    /// Draw the hover/tooltip for the caret line.
    fn render_tooltip(&mut self, line: &str, caret: TextPosition, caret_point: Point) {
        let _ = (line, caret, caret_point);
    }
}

/// Formatter that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFormatter;

impl LineFormatter for NullFormatter {}

/// Ordered lines of one document.
pub struct TextBuffer {
    lines: Vec<String>,
    formatter: Box<dyn LineFormatter>,
    /// Bumped by every mutation that changes a line.
    revision: u64,
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.lines)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// A buffer holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            formatter: Box::new(NullFormatter),
            revision: 0,
        }
    }

    /// Build a buffer from `\n`-separated text. A trailing newline produces a
    /// trailing empty line.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
            formatter: Box::new(NullFormatter),
            revision: 0,
        }
    }

    /// Replace the formatter. The new formatter is told about every existing
    /// line so it never sees an index it has not been introduced to.
    pub fn set_formatter(&mut self, formatter: Box<dyn LineFormatter>) {
        self.formatter = formatter;
        for (index, line) in self.lines.iter().enumerate() {
            self.formatter.on_line_added(index, line);
        }
    }

    /// Draw lines `visible` (clamped to the buffer) through the formatter,
    /// passing each line's share of `selection`.
    pub fn render_lines(&mut self, visible: Range<usize>, selection: Option<TextRange>) {
        let end = visible.end.min(self.lines.len());
        for index in visible.start.min(end)..end {
            let text = &self.lines[index];
            let columns = selection.and_then(|r| r.columns_on_line(index, char_len(text)));
            self.formatter.render_line(index, text, columns);
        }
    }

    /// Draw the caret-line tooltip through the formatter.
    pub fn render_tooltip(&mut self, caret: TextPosition, caret_point: Point) {
        let caret = self.clamp(caret);
        self.formatter
            .render_tooltip(&self.lines[caret.line], caret, caret_point);
    }

    // ====================================================================
    // Reads
    // ====================================================================

    /// Number of lines; never zero.
    #[must_use]
    pub fn line_count(&self) -> usize {
        debug_assert!(!self.lines.is_empty(), "buffer lost its last line");
        self.lines.len()
    }

    /// Text of line `index`, if it exists.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Length of line `index` in chars; zero for missing lines.
    #[must_use]
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |l| char_len(l))
    }

    /// Changes whenever the text changes; equal revisions mean equal text.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the last line.
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// End of the last line.
    #[must_use]
    pub fn last_position(&self) -> TextPosition {
        let last = self.last_line();
        TextPosition::new(last, self.line_len(last))
    }

    /// Char at `pos`. The virtual end of line reads as `'\n'`; positions
    /// outside the buffer read as `None`.
    #[must_use]
    pub fn char_at(&self, pos: TextPosition) -> Option<char> {
        let line = self.lines.get(pos.line)?;
        match line.chars().nth(pos.column) {
            Some(ch) => Some(ch),
            None if pos.column == char_len(line) => Some('\n'),
            None => None,
        }
    }

    /// Clamp `pos` into `[0, line_count-1] x [0, line_len]`.
    #[must_use]
    pub fn clamp(&self, pos: TextPosition) -> TextPosition {
        let line = pos.line.min(self.last_line());
        TextPosition::new(line, pos.column.min(self.line_len(line)))
    }

    /// The document: lines joined with `\n`.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }

    // ====================================================================
    // Mutations
    // ====================================================================

    /// Replace line `index`. Identical text is left alone and not reported.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn replace_line(&mut self, index: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        let Some(slot) = self.lines.get_mut(index) else {
            return false;
        };
        if *slot == text {
            return true;
        }
        let old = std::mem::replace(slot, text);
        self.revision += 1;
        tracing::trace!(index, "line replaced");
        self.formatter.on_line_replaced(index, &old, &self.lines[index]);
        true
    }

    /// Insert `lines` starting at `at` (clamped to `line_count`), in order.
    pub fn insert_lines<I>(&mut self, at: usize, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut index = at.min(self.lines.len());
        for text in lines {
            self.lines.insert(index, text);
            self.revision += 1;
            tracing::trace!(index, "line added");
            self.formatter.on_line_added(index, &self.lines[index]);
            index += 1;
        }
    }

    /// Remove line `index` and return its text.
    ///
    /// Refuses to remove the only remaining line.
    pub fn remove_line(&mut self, index: usize) -> Option<String> {
        if index >= self.lines.len() || self.lines.len() == 1 {
            return None;
        }
        let text = self.lines.remove(index);
        self.revision += 1;
        tracing::trace!(index, "line removed");
        self.formatter.on_line_removed(index, &text);
        Some(text)
    }

    /// Reset to a single empty line, reporting each removal bottom-up.
    pub fn clear(&mut self) {
        while self.lines.len() > 1 {
            let index = self.lines.len() - 1;
            let _ = self.remove_line(index);
        }
        self.replace_line(0, String::new());
    }
}
