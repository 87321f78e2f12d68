#![forbid(unsafe_code)]

//! Caret and selection state.
//!
//! [`CursorModel::set_caret`] is the single write path for the caret. It
//! clamps into the buffer, then raises the presentation signals: a
//! scroll-into-view request and a new blink generation so the caret is drawn
//! solid right after it moves.

use std::ops::Range;

use crate::buffer::TextBuffer;
use crate::position::{TextPosition, TextRange, byte_offset};

/// Caret, selection, and pending drag anchor for one editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorModel {
    caret: TextPosition,
    selection: Option<TextRange>,
    /// Set on mouse-down; becomes a selection once the drag reaches a position.
    anchor: Option<TextPosition>,
    scroll_requested: bool,
    blink_generation: u64,
}

impl CursorModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current caret.
    #[must_use]
    pub fn caret(&self) -> TextPosition {
        self.caret
    }

    /// Clamp `pos` into `buf` and store it as the caret.
    ///
    /// Negative-style overflow cannot occur with `usize`; oversized lines and
    /// columns are pulled back to the last line and that line's end.
    pub fn set_caret(&mut self, buf: &TextBuffer, pos: TextPosition) -> TextPosition {
        let clamped = buf.clamp(pos);
        self.caret = clamped;
        self.scroll_requested = true;
        self.blink_generation = self.blink_generation.wrapping_add(1);
        clamped
    }

    /// Consume the pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Bumped on every caret write; a change restarts the blink phase.
    #[must_use]
    pub fn blink_generation(&self) -> u64 {
        self.blink_generation
    }

    /// Raw selection as the user made it, endpoints in drag order.
    #[must_use]
    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    pub fn set_selection(&mut self, range: Option<TextRange>) {
        self.selection = range;
    }

    /// Drop both the selection and any pending drag anchor.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.anchor = None;
    }

    /// Pending drag anchor, if a drag has started.
    #[must_use]
    pub fn anchor(&self) -> Option<TextPosition> {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Option<TextPosition>) {
        self.anchor = anchor;
    }

    /// Set and non-empty.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selection.is_some_and(|r| !r.sorted().is_empty())
    }

    /// Sorted selection, if one is set and non-empty.
    #[must_use]
    pub fn sorted_selection(&self) -> Option<TextRange> {
        self.selection.map(TextRange::sorted).filter(|r| !r.is_empty())
    }

    /// Columns of `line` covered by the selection.
    #[must_use]
    pub fn selection_columns(&self, line: usize, line_len: usize) -> Option<Range<usize>> {
        self.sorted_selection()?.columns_on_line(line, line_len)
    }

    /// Text spanned by the selection, or `None` without one.
    #[must_use]
    pub fn selected_text(&self, buf: &TextBuffer) -> Option<String> {
        self.sorted_selection().map(|r| text_in_range(buf, r))
    }
}

/// Extract the text covered by `range` (sorted and clamped first).
///
/// Single-line ranges yield a substring. Multi-line ranges yield the tail of
/// the first line, the middle lines whole, and the head of the last line,
/// joined by `\n`.
#[must_use]
pub fn text_in_range(buf: &TextBuffer, range: TextRange) -> String {
    let range = range.sorted();
    let start = buf.clamp(range.start);
    let end = buf.clamp(range.end);
    let line_at = |i: usize| buf.line(i).unwrap_or_default();

    if start.line == end.line {
        let line = line_at(start.line);
        return line[byte_offset(line, start.column)..byte_offset(line, end.column)].to_owned();
    }

    let first = line_at(start.line);
    let last = line_at(end.line);
    let mut out = String::from(&first[byte_offset(first, start.column)..]);
    for i in start.line + 1..end.line {
        out.push('\n');
        out.push_str(line_at(i));
    }
    out.push('\n');
    out.push_str(&last[..byte_offset(last, end.column)]);
    out
}
