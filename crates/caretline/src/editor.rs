#![forbid(unsafe_code)]

//! Edit operations on top of [`TextBuffer`] + [`CursorModel`] + [`UndoManager`].
//!
//! [`Editor`] is the one mutation entry point for a document. Destructive
//! operations take an undo checkpoint first, then change the buffer and the
//! caret together; motions never touch the undo history.
//!
//! # Example
//! ```
//! use caretline::{Editor, TextPosition, TextRange};
//!
//! let mut ed = Editor::with_text("abcdef");
//! ed.set_caret(TextPosition::new(0, 3));
//! ed.insert("XY\nZ");
//! assert_eq!(ed.text(), "abcXY\nZdef");
//! assert_eq!(ed.caret(), TextPosition::new(1, 1));
//!
//! ed.delete_range(TextRange::new(TextPosition::new(0, 3), TextPosition::new(1, 1)));
//! assert_eq!(ed.text(), "abcdef");
//! assert_eq!(ed.caret(), TextPosition::new(0, 3));
//! ```

use std::fmt;
use std::ops::Range;

use crate::buffer::{LineFormatter, Point, TextBuffer};
use crate::clipboard::{Clipboard, ClipboardError, normalize_newlines};
use crate::config::EditorConfig;
use crate::cursor::{CursorModel, text_in_range};
use crate::motion::{self, Granularity, Motion, apply_motion};
use crate::position::{TextPosition, TextRange, byte_offset, char_len};
use crate::undo::{Clock, EditorState, SystemClock, UndoManager};

/// Receives the final document when editing is committed.
pub trait CommitSink {
    fn on_commit(&mut self, text: &str);
}

impl<F: FnMut(&str)> CommitSink for F {
    fn on_commit(&mut self, text: &str) {
        self(text);
    }
}

/// Summary shown in the editor footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorStatus {
    pub lines: usize,
    pub caret: TextPosition,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lines: {}  Caret: ({},{})  Undo: {}",
            self.lines, self.caret.line, self.caret.column, self.undo_depth
        )
    }
}

/// Line editor for one document.
///
/// Owns the buffer, the caret/selection, and the undo history. The caret is
/// always inside the buffer.
pub struct Editor {
    buffer: TextBuffer,
    cursor: CursorModel,
    undo: UndoManager,
    config: EditorConfig,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("undo", &self.undo)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an empty editor with default config and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an empty editor with `config`.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: CursorModel::new(),
            undo: UndoManager::new(config.undo_limit, config.coalesce_window_ms),
            config,
            clock: Box::new(SystemClock),
        }
    }

    /// Create an editor holding `text`, caret at the origin, empty history.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut ed = Self::new();
        ed.buffer = TextBuffer::from_text(text);
        ed
    }

    /// Use `clock` for undo timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Attach a formatter; it is told about every existing line.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl LineFormatter + 'static) -> Self {
        self.buffer.set_formatter(Box::new(formatter));
        self
    }

    // ====================================================================
    // Reads
    // ====================================================================

    /// The document, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.full_text()
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn cursor(&self) -> &CursorModel {
        &self.cursor
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Text of one line.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.buffer.line(line)
    }

    /// The line the caret is on.
    #[must_use]
    pub fn current_line(&self) -> &str {
        self.buffer.line(self.cursor.caret().line).unwrap_or_default()
    }

    #[must_use]
    pub fn caret(&self) -> TextPosition {
        self.cursor.caret()
    }

    /// Raw selection, endpoints in the order the user made them.
    #[must_use]
    pub fn selection(&self) -> Option<TextRange> {
        self.cursor.selection()
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.cursor.has_selection()
    }

    /// Selected text, if any non-empty selection exists.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        self.cursor.selected_text(&self.buffer)
    }

    /// Text covered by an arbitrary range.
    #[must_use]
    pub fn text_in(&self, range: TextRange) -> String {
        text_in_range(&self.buffer, range)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    #[must_use]
    pub fn undo_history(&self) -> &UndoManager {
        &self.undo
    }

    /// Footer summary.
    #[must_use]
    pub fn status(&self) -> EditorStatus {
        EditorStatus {
            lines: self.buffer.line_count(),
            caret: self.cursor.caret(),
            undo_depth: self.undo.undo_depth(),
            redo_depth: self.undo.redo_depth(),
        }
    }

    /// Consume the caret's scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        self.cursor.take_scroll_request()
    }

    // ====================================================================
    // State snapshots / undo
    // ====================================================================

    /// Snapshot of text and caret, stamped with the current time.
    #[must_use]
    pub fn state(&self) -> EditorState {
        EditorState {
            code: self.buffer.full_text(),
            caret: self.cursor.caret(),
            timestamp_ms: self.clock.now_ms(),
        }
    }

    /// Make `state` the live document and caret. Not itself undoable.
    pub fn restore(&mut self, state: &EditorState) {
        self.buffer.clear();
        self.cursor.set_caret(&self.buffer, TextPosition::ORIGIN);
        self.insert(&state.code);
        self.cursor.set_caret(&self.buffer, state.caret);
        self.cursor.clear_selection();
        tracing::debug!(caret = %self.cursor.caret(), lines = self.buffer.line_count(), "state restored");
    }

    /// Take an undo checkpoint of the current state.
    pub fn push_undo(&mut self) {
        let state = self.state();
        self.undo.checkpoint(state);
    }

    /// Return to the newest checkpoint. `false` when there is none.
    pub fn undo(&mut self) -> bool {
        let current = self.state();
        let Some(target) = self.undo.undo(current) else {
            return false;
        };
        self.restore(&target);
        tracing::debug!(
            undo_depth = self.undo.undo_depth(),
            redo_depth = self.undo.redo_depth(),
            "undo"
        );
        true
    }

    /// Re-apply the newest undone state. `false` when there is none.
    pub fn redo(&mut self) -> bool {
        let current = self.state();
        let Some(target) = self.undo.redo(current) else {
            return false;
        };
        self.restore(&target);
        tracing::debug!(
            undo_depth = self.undo.undo_depth(),
            redo_depth = self.undo.redo_depth(),
            "redo"
        );
        true
    }

    // ====================================================================
    // Insert / delete primitives
    // ====================================================================

    /// Insert `text` at the caret without taking a checkpoint.
    ///
    /// The caret line becomes `prefix + first segment`; further segments
    /// become new lines after it, the last one carrying the old suffix. The
    /// caret lands at the end of the inserted text.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let caret = self.buffer.clamp(self.cursor.caret());
        let line = self.line_owned(caret.line);
        let split = byte_offset(&line, caret.column);
        let (prefix, suffix) = line.split_at(split);

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let new_caret = match rest.last() {
            None => {
                self.buffer
                    .replace_line(caret.line, format!("{prefix}{first}{suffix}"));
                caret.with_column(caret.column + char_len(first))
            }
            Some(last) => {
                let inserted = rest.len();
                let last_len = char_len(last);
                self.buffer
                    .replace_line(caret.line, format!("{prefix}{first}"));
                let new_lines = rest.iter().enumerate().map(|(i, seg)| {
                    if i + 1 == inserted {
                        format!("{seg}{suffix}")
                    } else {
                        (*seg).to_owned()
                    }
                });
                self.buffer.insert_lines(caret.line + 1, new_lines);
                TextPosition::new(caret.line + inserted, last_len)
            }
        };
        tracing::trace!(from = %caret, to = %new_caret, bytes = text.len(), "insert");
        self.cursor.set_caret(&self.buffer, new_caret);
    }

    /// Delete the text covered by `range` (either order, clamped).
    ///
    /// Empty ranges are a no-op returning `false`. Otherwise takes a
    /// checkpoint, removes the text, puts the caret at the range start, and
    /// returns `true`.
    pub fn delete_range(&mut self, range: TextRange) -> bool {
        let range =
            TextRange::new(self.buffer.clamp(range.start), self.buffer.clamp(range.end)).sorted();
        if range.is_empty() {
            return false;
        }
        self.push_undo();

        let TextRange { start, end } = range;
        let first = self.line_owned(start.line);
        let head = &first[..byte_offset(&first, start.column)];
        if start.line == end.line {
            let tail = &first[byte_offset(&first, end.column)..];
            self.buffer.replace_line(start.line, format!("{head}{tail}"));
        } else {
            let last = self.line_owned(end.line);
            let tail = &last[byte_offset(&last, end.column)..];
            self.buffer.replace_line(start.line, format!("{head}{tail}"));
            for index in (start.line + 1..=end.line).rev() {
                let _ = self.buffer.remove_line(index);
            }
        }
        tracing::trace!(%start, %end, "delete range");
        self.cursor.set_caret(&self.buffer, start);
        true
    }

    /// Delete the selection and clear it. `false` without a selection.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.cursor.selection() else {
            return false;
        };
        if self.delete_range(range) {
            self.cursor.clear_selection();
            true
        } else {
            false
        }
    }

    // ====================================================================
    // Character-level edits
    // ====================================================================

    /// Backspace: delete the selection, or the char before the caret, or
    /// merge with the previous line at column zero.
    ///
    /// Returns `true` if anything was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let caret = self.caret();
        if caret.column > 0 {
            self.push_undo();
            let mut line = self.line_owned(caret.line);
            line.remove(byte_offset(&line, caret.column - 1));
            self.buffer.replace_line(caret.line, line);
            self.cursor
                .set_caret(&self.buffer, caret.with_column(caret.column - 1));
        } else if caret.line > 0 {
            self.push_undo();
            let prev = caret.line - 1;
            let prev_len = self.buffer.line_len(prev);
            let merged = format!("{}{}", self.line_owned(prev), self.line_owned(caret.line));
            self.buffer.replace_line(prev, merged);
            let _ = self.buffer.remove_line(caret.line);
            self.cursor
                .set_caret(&self.buffer, TextPosition::new(prev, prev_len));
        } else {
            return false;
        }
        true
    }

    /// Forward delete: delete the selection, or the char under the caret, or
    /// pull the next line up at end of line.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let caret = self.caret();
        if caret.column < self.buffer.line_len(caret.line) {
            self.push_undo();
            let mut line = self.line_owned(caret.line);
            line.remove(byte_offset(&line, caret.column));
            self.buffer.replace_line(caret.line, line);
        } else if caret.line < self.buffer.last_line() {
            self.push_undo();
            let next = caret.line + 1;
            let merged = format!("{}{}", self.line_owned(caret.line), self.line_owned(next));
            self.buffer.replace_line(caret.line, merged);
            let _ = self.buffer.remove_line(next);
        } else {
            return false;
        }
        self.cursor.set_caret(&self.buffer, caret);
        true
    }

    /// Typed input: replaces the selection if there is one, otherwise takes
    /// its own checkpoint, then inserts at the caret.
    pub fn type_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if !self.delete_selection() {
            self.push_undo();
        }
        self.insert(text);
        true
    }

    /// Type a single char.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.type_text(ch.encode_utf8(&mut buf))
    }

    /// Enter: split the line at the caret (replacing the selection first).
    pub fn insert_newline(&mut self) -> bool {
        self.type_text("\n")
    }

    // ====================================================================
    // Clipboard
    // ====================================================================

    /// Copy the selection. `Ok(false)` without a selection.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        let Some(text) = self.selected_text() else {
            return Ok(false);
        };
        clipboard
            .set_text(&text)
            .inspect_err(|err| tracing::warn!(%err, "copy failed"))?;
        Ok(true)
    }

    /// Copy then delete the selection. The buffer is untouched if the
    /// clipboard write fails.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        if !self.copy(clipboard)? {
            return Ok(false);
        }
        Ok(self.delete_selection())
    }

    /// Replace the selection (or insert at the caret) with the clipboard
    /// contents, carriage returns stripped. An empty clipboard still deletes
    /// the selection.
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        let text = clipboard
            .get_text()
            .inspect_err(|err| tracing::warn!(%err, "paste failed"))?;
        let text = normalize_newlines(&text);
        let deleted = self.delete_selection();
        if text.is_empty() {
            return Ok(deleted);
        }
        if !deleted {
            self.push_undo();
        }
        self.insert(&text);
        Ok(true)
    }

    /// Put the whole document on the clipboard.
    pub fn copy_document(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
        clipboard
            .set_text(&self.text())
            .inspect_err(|err| tracing::warn!(%err, "copy document failed"))
    }

    /// Replace the whole document with the clipboard contents.
    pub fn replace_document_from_clipboard(
        &mut self,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        let text = clipboard
            .get_text()
            .inspect_err(|err| tracing::warn!(%err, "paste document failed"))?;
        self.clear_code(true);
        self.insert(&normalize_newlines(&text));
        Ok(())
    }

    // ====================================================================
    // Whole-document operations
    // ====================================================================

    /// Reset to one empty line, optionally taking a checkpoint first.
    pub fn clear_code(&mut self, push_undo: bool) {
        if push_undo {
            self.push_undo();
        }
        self.buffer.clear();
        self.cursor.set_caret(&self.buffer, TextPosition::ORIGIN);
        self.cursor.clear_selection();
    }

    /// Load `code` as the document (undoable), caret at the origin.
    pub fn set_source_code(&mut self, code: &str) {
        self.clear_code(true);
        self.insert(&normalize_newlines(code));
        self.cursor.set_caret(&self.buffer, TextPosition::ORIGIN);
        tracing::debug!(lines = self.buffer.line_count(), "source code loaded");
    }

    /// Hand the current document to `sink`.
    pub fn commit(&self, sink: &mut impl CommitSink) {
        let text = self.text();
        tracing::debug!(bytes = text.len(), "commit");
        sink.on_commit(&text);
    }

    // ====================================================================
    // Caret movement
    // ====================================================================

    /// Write the caret (clamped). Leaves the selection alone.
    pub fn set_caret(&mut self, pos: TextPosition) -> TextPosition {
        self.cursor.set_caret(&self.buffer, pos)
    }

    /// Move the caret by `motion`. With `extend`, grow the selection from its
    /// anchor (or from the old caret); without, drop the selection.
    pub fn move_caret(&mut self, motion: Motion, extend: bool) -> TextPosition {
        let target = apply_motion(&self.buffer, self.cursor.caret(), motion);
        self.move_caret_to(target, extend)
    }

    /// Move the caret to `target` with the same selection rules as
    /// [`move_caret`](Self::move_caret).
    pub fn move_caret_to(&mut self, target: TextPosition, extend: bool) -> TextPosition {
        let old = self.cursor.caret();
        let new = self.cursor.set_caret(&self.buffer, target);
        if extend {
            let anchor = self.cursor.selection().map_or(old, |r| r.start);
            self.cursor.set_selection(Some(TextRange::new(anchor, new)));
        } else {
            self.cursor.clear_selection();
        }
        new
    }

    pub fn move_left(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::backward(Granularity::Char, 1), extend)
    }

    pub fn move_right(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::forward(Granularity::Char, 1), extend)
    }

    pub fn move_up(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::backward(Granularity::Line, 1), extend)
    }

    pub fn move_down(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::forward(Granularity::Line, 1), extend)
    }

    /// Previous word beginning.
    pub fn move_word_left(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::backward(Granularity::WordStart, 1), extend)
    }

    /// Next word end.
    pub fn move_word_right(&mut self, extend: bool) -> TextPosition {
        self.move_caret(Motion::forward(Granularity::WordEnd, 1), extend)
    }

    pub fn move_to_line_start(&mut self, extend: bool) -> TextPosition {
        self.move_caret_to(motion::line_start(self.cursor.caret()), extend)
    }

    pub fn move_to_line_end(&mut self, extend: bool) -> TextPosition {
        let target = motion::line_end(&self.buffer, self.cursor.caret());
        self.move_caret_to(target, extend)
    }

    pub fn move_to_document_start(&mut self, extend: bool) -> TextPosition {
        self.move_caret_to(motion::document_start(), extend)
    }

    pub fn move_to_document_end(&mut self, extend: bool) -> TextPosition {
        let target = motion::document_end(&self.buffer);
        self.move_caret_to(target, extend)
    }

    /// Up by `config.page_lines`.
    pub fn page_up(&mut self, extend: bool) -> TextPosition {
        let lines = self.config.page_lines;
        self.move_caret(Motion::backward(Granularity::Line, lines), extend)
    }

    /// Down by `config.page_lines`.
    pub fn page_down(&mut self, extend: bool) -> TextPosition {
        let lines = self.config.page_lines;
        self.move_caret(Motion::forward(Granularity::Line, lines), extend)
    }

    // ====================================================================
    // Selection
    // ====================================================================

    /// Select from the origin to the end of the last line.
    pub fn select_all(&mut self) {
        let end = self.buffer.last_position();
        self.cursor
            .set_selection(Some(TextRange::new(TextPosition::ORIGIN, end)));
    }

    /// Replace the selection with `range` (clamped), or clear it with `None`.
    pub fn set_selection(&mut self, range: Option<TextRange>) {
        let range = range
            .map(|r| TextRange::new(self.buffer.clamp(r.start), self.buffer.clamp(r.end)));
        self.cursor.set_selection(range);
    }

    pub fn clear_selection(&mut self) {
        self.cursor.clear_selection();
    }

    /// Mouse down at `pos`: move the caret there and anchor a new selection.
    pub fn begin_drag(&mut self, pos: TextPosition) -> TextPosition {
        let caret = self.cursor.set_caret(&self.buffer, pos);
        self.cursor.clear_selection();
        self.cursor.set_anchor(Some(caret));
        caret
    }

    /// Mouse held or released at `pos`: stretch the selection from the drag
    /// anchor. No-op without an anchor.
    pub fn drag_to(&mut self, pos: TextPosition) {
        if let Some(anchor) = self.cursor.anchor() {
            let end = self.buffer.clamp(pos);
            self.cursor.set_selection(Some(TextRange::new(anchor, end)));
        }
    }

    // ====================================================================
    // Rendering surface
    // ====================================================================

    /// Draw `visible` lines and the caret tooltip through the formatter.
    pub fn render(&mut self, visible: Range<usize>, caret_point: Point) {
        let selection = self.cursor.sorted_selection();
        self.buffer.render_lines(visible, selection);
        self.buffer.render_tooltip(self.cursor.caret(), caret_point);
    }

    fn line_owned(&self, line: usize) -> String {
        self.buffer.line(line).unwrap_or_default().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{MemoryClipboard, UnavailableClipboard};
    use crate::undo::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    fn pos(line: usize, column: usize) -> TextPosition {
        TextPosition::new(line, column)
    }

    /// Editor on a manual clock, so undo coalescing is deterministic.
    fn editor(text: &str) -> (Editor, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let ed = Editor::with_text(text).with_clock(clock.clone());
        (ed, clock)
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Hook {
        Added(usize, String),
        Removed(usize, String),
        Replaced(usize, String, String),
    }

    #[derive(Default, Clone)]
    struct Hooks(Rc<RefCell<Vec<Hook>>>);

    impl LineFormatter for Hooks {
        fn on_line_added(&mut self, index: usize, text: &str) {
            self.0.borrow_mut().push(Hook::Added(index, text.into()));
        }
        fn on_line_removed(&mut self, index: usize, text: &str) {
            self.0.borrow_mut().push(Hook::Removed(index, text.into()));
        }
        fn on_line_replaced(&mut self, index: usize, old: &str, new: &str) {
            self.0
                .borrow_mut()
                .push(Hook::Replaced(index, old.into(), new.into()));
        }
    }

    // ================================================================
    // Insert
    // ================================================================

    #[test]
    fn new_editor_is_one_empty_line() {
        let ed = Editor::new();
        assert_eq!(ed.text(), "");
        assert_eq!(ed.line_count(), 1);
        assert_eq!(ed.caret(), TextPosition::ORIGIN);
    }

    #[test]
    fn insert_single_segment_mid_line() {
        let (mut ed, _) = editor("helo");
        ed.set_caret(pos(0, 3));
        ed.insert("l");
        assert_eq!(ed.text(), "hello");
        assert_eq!(ed.caret(), pos(0, 4));
    }

    #[test]
    fn insert_multi_segment_splits_suffix() {
        let (mut ed, _) = editor("abcdef");
        ed.set_caret(pos(0, 3));
        ed.insert("XY\nZ");
        assert_eq!(ed.buffer().lines(), ["abcXY", "Zdef"]);
        assert_eq!(ed.caret(), pos(1, 1));
    }

    #[test]
    fn insert_three_segments() {
        let (mut ed, _) = editor("[]");
        ed.set_caret(pos(0, 1));
        ed.insert("a\nb\nc");
        assert_eq!(ed.buffer().lines(), ["[a", "b", "c]"]);
        assert_eq!(ed.caret(), pos(2, 1));
    }

    #[test]
    fn insert_trailing_newline_lands_on_fresh_line() {
        let (mut ed, _) = editor("x");
        ed.insert("line\n");
        assert_eq!(ed.buffer().lines(), ["line", "x"]);
        assert_eq!(ed.caret(), pos(1, 0));
    }

    #[test]
    fn insert_does_not_checkpoint() {
        let (mut ed, _) = editor("");
        ed.insert("abc");
        assert!(!ed.can_undo());
    }

    #[test]
    fn insert_reports_replace_then_adds() {
        let hooks = Hooks::default();
        let log = Rc::clone(&hooks.0);
        let mut ed = Editor::with_text("abcdef").with_formatter(hooks);
        log.borrow_mut().clear();
        ed.set_caret(pos(0, 3));
        ed.insert("1\n2\n3");
        assert_eq!(
            *log.borrow(),
            vec![
                Hook::Replaced(0, "abcdef".into(), "abc1".into()),
                Hook::Added(1, "2".into()),
                Hook::Added(2, "3def".into()),
            ]
        );
    }

    #[test]
    fn insert_multibyte_columns() {
        let (mut ed, _) = editor("añb");
        ed.set_caret(pos(0, 2));
        ed.insert("é");
        assert_eq!(ed.text(), "añéb");
        assert_eq!(ed.caret(), pos(0, 3));
    }

    // ================================================================
    // Delete
    // ================================================================

    #[test]
    fn delete_range_round_trip() {
        let (mut ed, _) = editor("abcXY\nZdef");
        assert!(ed.delete_range(TextRange::new(pos(0, 3), pos(1, 1))));
        assert_eq!(ed.buffer().lines(), ["abcdef"]);
        assert_eq!(ed.caret(), pos(0, 3));
    }

    #[test]
    fn delete_range_backward_endpoints() {
        let (mut ed, _) = editor("hello world");
        assert!(ed.delete_range(TextRange::new(pos(0, 11), pos(0, 5))));
        assert_eq!(ed.text(), "hello");
        assert_eq!(ed.caret(), pos(0, 5));
    }

    #[test]
    fn delete_empty_range_is_noop() {
        let (mut ed, _) = editor("abc");
        assert!(!ed.delete_range(TextRange::point(pos(0, 1))));
        assert!(!ed.can_undo());
        assert_eq!(ed.text(), "abc");
    }

    #[test]
    fn delete_range_removes_lines_descending() {
        let hooks = Hooks::default();
        let log = Rc::clone(&hooks.0);
        let mut ed = Editor::with_text("a1\nb\nc\nd2").with_formatter(hooks);
        log.borrow_mut().clear();
        assert!(ed.delete_range(TextRange::new(pos(0, 1), pos(3, 1))));
        assert_eq!(ed.text(), "a2");
        assert_eq!(
            *log.borrow(),
            vec![
                Hook::Replaced(0, "a1".into(), "a2".into()),
                Hook::Removed(3, "d2".into()),
                Hook::Removed(2, "c".into()),
                Hook::Removed(1, "b".into()),
            ]
        );
    }

    #[test]
    fn delete_selection_clears_selection() {
        let (mut ed, _) = editor("hello world");
        ed.set_selection(Some(TextRange::new(pos(0, 0), pos(0, 6))));
        assert!(ed.delete_selection());
        assert_eq!(ed.text(), "world");
        assert_eq!(ed.selection(), None);
        assert!(!ed.delete_selection());
    }

    #[test]
    fn backspace_removes_previous_char() {
        let (mut ed, _) = editor("hello");
        ed.set_caret(pos(0, 5));
        assert!(ed.backspace());
        assert_eq!(ed.text(), "hell");
        assert_eq!(ed.caret(), pos(0, 4));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let (mut ed, _) = editor("hello");
        assert!(!ed.backspace());
        assert!(!ed.can_undo());
    }

    #[test]
    fn backspace_merges_lines() {
        let (mut ed, _) = editor("hello\nworld");
        ed.set_caret(pos(1, 0));
        assert!(ed.backspace());
        assert_eq!(ed.text(), "helloworld");
        assert_eq!(ed.caret(), pos(0, 5));
    }

    #[test]
    fn backspace_with_selection_deletes_only_selection() {
        let (mut ed, _) = editor("hello world");
        ed.set_selection(Some(TextRange::new(pos(0, 0), pos(0, 5))));
        ed.set_caret(pos(0, 5));
        assert!(ed.backspace());
        assert_eq!(ed.text(), " world");
        assert_eq!(ed.undo_history().undo_depth(), 1);
    }

    #[test]
    fn delete_forward_char_and_join() {
        let (mut ed, _) = editor("ab\ncd");
        assert!(ed.delete_forward());
        assert_eq!(ed.text(), "b\ncd");
        ed.set_caret(pos(0, 1));
        assert!(ed.delete_forward());
        assert_eq!(ed.text(), "bcd");
        assert_eq!(ed.caret(), pos(0, 1));
    }

    #[test]
    fn backspace_merge_reports_replace_then_remove() {
        let hooks = Hooks::default();
        let log = Rc::clone(&hooks.0);
        let mut ed = Editor::with_text("ab\ncd").with_formatter(hooks);
        log.borrow_mut().clear();
        ed.set_caret(pos(1, 0));
        assert!(ed.backspace());
        assert_eq!(
            *log.borrow(),
            vec![
                Hook::Replaced(0, "ab".into(), "abcd".into()),
                Hook::Removed(1, "cd".into()),
            ]
        );
    }

    #[test]
    fn delete_forward_merge_reports_replace_then_remove() {
        let hooks = Hooks::default();
        let log = Rc::clone(&hooks.0);
        let mut ed = Editor::with_text("ab\ncd").with_formatter(hooks);
        log.borrow_mut().clear();
        ed.set_caret(pos(0, 2));
        assert!(ed.delete_forward());
        assert_eq!(
            *log.borrow(),
            vec![
                Hook::Replaced(0, "ab".into(), "abcd".into()),
                Hook::Removed(1, "cd".into()),
            ]
        );
    }

    #[test]
    fn delete_forward_at_end_is_noop() {
        let (mut ed, _) = editor("ab");
        ed.set_caret(pos(0, 2));
        assert!(!ed.delete_forward());
    }

    #[test]
    fn newline_splits_line() {
        let (mut ed, _) = editor("hello world");
        ed.set_caret(pos(0, 5));
        assert!(ed.insert_newline());
        assert_eq!(ed.buffer().lines(), ["hello", " world"]);
        assert_eq!(ed.caret(), pos(1, 0));
    }

    #[test]
    fn typing_replaces_selection() {
        let (mut ed, _) = editor("hello world");
        ed.set_selection(Some(TextRange::new(pos(0, 5), pos(0, 0))));
        assert!(ed.type_text("goodbye"));
        assert_eq!(ed.text(), "goodbye world");
        assert!(!ed.has_selection());
    }

    // ================================================================
    // Undo / redo
    // ================================================================

    #[test]
    fn undo_restores_text_and_caret() {
        let (mut ed, _) = editor("abc");
        ed.set_caret(pos(0, 3));
        ed.insert_char('d');
        assert_eq!(ed.text(), "abcd");
        assert!(ed.undo());
        assert_eq!(ed.text(), "abc");
        assert_eq!(ed.caret(), pos(0, 3));
    }

    #[test]
    fn redo_reapplies() {
        let (mut ed, clock) = editor("");
        ed.type_text("one");
        clock.advance(1_000);
        assert!(ed.undo());
        assert_eq!(ed.text(), "");
        assert!(ed.redo());
        assert_eq!(ed.text(), "one");
        assert!(!ed.redo());
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let (mut ed, _) = editor("keep");
        assert!(!ed.undo());
        assert!(!ed.redo());
        assert_eq!(ed.text(), "keep");
    }

    #[test]
    fn spaced_edits_undo_one_by_one() {
        let (mut ed, clock) = editor("");
        for ch in ['a', 'b', 'c'] {
            ed.insert_char(ch);
            clock.advance(600);
        }
        assert!(ed.undo());
        assert_eq!(ed.text(), "ab");
        assert!(ed.undo());
        assert_eq!(ed.text(), "a");
        assert!(ed.undo());
        assert_eq!(ed.text(), "");
    }

    #[test]
    fn fast_burst_keeps_only_state_before_last_edit() {
        let (mut ed, clock) = editor("");
        for ch in ['a', 'b', 'c'] {
            ed.insert_char(ch);
            clock.advance(100);
        }
        assert_eq!(ed.undo_history().undo_depth(), 1);
        assert!(ed.undo());
        assert_eq!(ed.text(), "ab");
        assert!(!ed.undo());
    }

    #[test]
    fn undo_cap_holds_last_hundred() {
        let (mut ed, clock) = editor("");
        for i in 0..130 {
            ed.type_text(&format!("{i};"));
            clock.advance(1_000);
        }
        let history = ed.undo_history();
        assert_eq!(history.undo_depth(), 100);
        let expected: String = (0..129).map(|i| format!("{i};")).collect();
        let newest = history.undo_entries().next().map(|s| s.code.clone());
        assert_eq!(newest, Some(expected));
    }

    #[test]
    fn new_edit_clears_redo() {
        let (mut ed, clock) = editor("");
        ed.type_text("a");
        clock.advance(1_000);
        ed.undo();
        assert!(ed.can_redo());
        ed.type_text("b");
        assert!(!ed.can_redo());
    }

    #[test]
    fn motion_is_not_undoable() {
        let (mut ed, _) = editor("abc\ndef");
        ed.move_down(false);
        ed.move_right(true);
        ed.move_to_document_end(false);
        assert!(!ed.can_undo());
    }

    #[traced_test]
    #[test]
    fn undo_logs_depths() {
        let (mut ed, _) = editor("x");
        ed.type_text("y");
        ed.undo();
        assert!(logs_contain("undo checkpoint"));
        assert!(logs_contain("redo_depth=1"));
    }

    // ================================================================
    // Clipboard
    // ================================================================

    #[test]
    fn copy_cut_paste() {
        let (mut ed, clock) = editor("hello world");
        let mut clip = MemoryClipboard::new();
        ed.set_selection(Some(TextRange::new(pos(0, 0), pos(0, 6))));
        assert!(ed.copy(&mut clip).unwrap());
        assert_eq!(clip.contents(), "hello ");
        assert!(ed.cut(&mut clip).unwrap());
        assert_eq!(ed.text(), "world");
        clock.advance(1_000);
        ed.move_to_line_end(false);
        assert!(ed.paste(&mut clip).unwrap());
        assert_eq!(ed.text(), "worldhello ");
    }

    #[test]
    fn copy_without_selection_is_noop() {
        let (mut ed, _) = editor("abc");
        let mut clip = MemoryClipboard::with_text("old");
        assert!(!ed.copy(&mut clip).unwrap());
        assert!(!ed.cut(&mut clip).unwrap());
        assert_eq!(clip.contents(), "old");
    }

    #[test]
    fn paste_strips_carriage_returns_and_replaces_selection() {
        let (mut ed, _) = editor("[sel]");
        let mut clip = MemoryClipboard::with_text("a\r\nb");
        ed.set_selection(Some(TextRange::new(pos(0, 1), pos(0, 4))));
        assert!(ed.paste(&mut clip).unwrap());
        assert_eq!(ed.buffer().lines(), ["[a", "b]"]);
        assert_eq!(ed.undo_history().undo_depth(), 1);
    }

    #[test]
    fn empty_paste_still_deletes_selection() {
        let (mut ed, _) = editor("hello world");
        let mut clip = MemoryClipboard::with_text("");
        ed.set_selection(Some(TextRange::new(pos(0, 0), pos(0, 6))));
        assert!(ed.paste(&mut clip).unwrap());
        assert_eq!(ed.text(), "world");
        assert!(!ed.has_selection());
        assert_eq!(ed.caret(), pos(0, 0));
        assert!(ed.undo());
        assert_eq!(ed.text(), "hello world");
    }

    #[test]
    fn empty_paste_without_selection_is_noop() {
        let (mut ed, _) = editor("abc");
        let mut clip = MemoryClipboard::with_text("\r");
        assert!(!ed.paste(&mut clip).unwrap());
        assert_eq!(ed.text(), "abc");
        assert!(!ed.can_undo());
    }

    #[test]
    fn failed_cut_keeps_buffer() {
        let (mut ed, _) = editor("abc");
        ed.select_all();
        let err = ed.cut(&mut UnavailableClipboard).unwrap_err();
        assert_eq!(err, ClipboardError::NotAvailable);
        assert_eq!(ed.text(), "abc");
        assert!(ed.has_selection());
    }

    #[test]
    fn document_copy_and_replace() {
        let (mut ed, _) = editor("one\ntwo");
        let mut clip = MemoryClipboard::new();
        ed.copy_document(&mut clip).unwrap();
        assert_eq!(clip.contents(), "one\ntwo");
        let mut other = MemoryClipboard::with_text("fresh");
        ed.replace_document_from_clipboard(&mut other).unwrap();
        assert_eq!(ed.text(), "fresh");
        assert!(ed.undo());
        assert_eq!(ed.text(), "one\ntwo");
    }

    // ================================================================
    // Selection / motion / misc
    // ================================================================

    #[test]
    fn select_all_spans_document() {
        let (mut ed, _) = editor("abc\ndef");
        ed.select_all();
        assert_eq!(
            ed.selection(),
            Some(TextRange::new(pos(0, 0), pos(1, 3)))
        );
        assert_eq!(ed.selected_text().as_deref(), Some("abc\ndef"));
    }

    #[test]
    fn extend_selection_keeps_anchor() {
        let (mut ed, _) = editor("hello");
        ed.move_right(true);
        ed.move_right(true);
        assert_eq!(ed.selected_text().as_deref(), Some("he"));
        ed.move_left(true);
        assert_eq!(ed.selection(), Some(TextRange::new(pos(0, 0), pos(0, 1))));
        ed.move_right(false);
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn drag_backward_matches_forward() {
        let (mut fwd, _) = editor("alpha\nbeta");
        fwd.begin_drag(pos(0, 2));
        fwd.drag_to(pos(1, 3));
        let (mut back, _) = editor("alpha\nbeta");
        back.begin_drag(pos(1, 3));
        back.drag_to(pos(0, 2));
        assert_eq!(fwd.selected_text(), back.selected_text());
        assert_eq!(fwd.selected_text().as_deref(), Some("pha\nbet"));
    }

    #[test]
    fn drag_without_anchor_is_noop() {
        let (mut ed, _) = editor("abc");
        ed.drag_to(pos(0, 2));
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn set_caret_clamps() {
        let (mut ed, _) = editor("hello\nabc");
        assert_eq!(ed.set_caret(pos(999, 999)), pos(1, 3));
    }

    #[test]
    fn vertical_motion_reclamps_column() {
        let (mut ed, _) = editor("long line\nab");
        ed.set_caret(pos(0, 8));
        assert_eq!(ed.move_down(false), pos(1, 2));
    }

    #[test]
    fn page_motion_uses_config() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut ed = Editor::with_config(EditorConfig::default().with_page_lines(10));
        ed.insert(&text);
        ed.set_caret(pos(0, 0));
        assert_eq!(ed.page_down(false).line, 10);
        assert_eq!(ed.page_up(false).line, 0);
    }

    #[test]
    fn word_motions() {
        let (mut ed, _) = editor("foo bar");
        assert_eq!(ed.move_word_right(false), pos(0, 3));
        assert_eq!(ed.move_word_right(false), pos(0, 7));
        assert_eq!(ed.move_word_left(false), pos(0, 4));
    }

    #[test]
    fn set_source_code_is_undoable() {
        let (mut ed, _) = editor("old");
        ed.set_source_code("new\r\ncode");
        assert_eq!(ed.buffer().lines(), ["new", "code"]);
        assert_eq!(ed.caret(), TextPosition::ORIGIN);
        assert!(ed.undo());
        assert_eq!(ed.text(), "old");
    }

    #[test]
    fn clear_code_without_checkpoint() {
        let (mut ed, _) = editor("a\nb");
        ed.clear_code(false);
        assert_eq!(ed.text(), "");
        assert!(!ed.can_undo());
    }

    #[test]
    fn commit_hands_over_full_text() {
        let (ed, _) = editor("x\ny");
        let mut committed = String::new();
        ed.commit(&mut |text: &str| committed = text.to_owned());
        assert_eq!(committed, "x\ny");
    }

    #[test]
    fn status_line() {
        let (mut ed, _) = editor("a\nb");
        ed.set_caret(pos(1, 1));
        ed.type_text("c");
        assert_eq!(ed.status().to_string(), "Lines: 2  Caret: (1,2)  Undo: 1");
    }

    #[test]
    fn caret_writes_request_scroll() {
        let (mut ed, _) = editor("abc");
        ed.take_scroll_request();
        ed.move_right(false);
        assert!(ed.take_scroll_request());
        assert!(!ed.take_scroll_request());
    }
}
