#![forbid(unsafe_code)]

//! Caret motion over a [`TextBuffer`].
//!
//! Everything here is a pure function from a position (plus read-only buffer
//! access) to a new position. Nothing touches the caret or the undo history;
//! the editor feeds the result back through its clamping caret setter.
//!
//! Word boundaries use a simple word-character test: letters, digits, and
//! underscore. The virtual end of a line reads as `'\n'`, so line ends count
//! as non-word characters.
//!
//! # Example
//! ```
//! use caretline::buffer::TextBuffer;
//! use caretline::motion::{Granularity, Motion, apply_motion};
//! use caretline::TextPosition;
//!
//! let buf = TextBuffer::from_text("foo bar");
//! let end = apply_motion(&buf, TextPosition::ORIGIN, Motion::forward(Granularity::WordEnd, 1));
//! assert_eq!(end, TextPosition::new(0, 3));
//! ```

use crate::buffer::TextBuffer;
use crate::position::TextPosition;

/// Unit a motion moves by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One char, wrapping across line ends.
    Char,
    /// One line; the column is left for the caller to re-clamp.
    Line,
    /// Next/previous word beginning.
    WordStart,
    /// Next/previous word end.
    WordEnd,
}

/// A motion request: unit, direction, and repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Motion {
    pub granularity: Granularity,
    pub forward: bool,
    pub amount: usize,
}

impl Motion {
    #[must_use]
    pub const fn new(granularity: Granularity, forward: bool, amount: usize) -> Self {
        Self {
            granularity,
            forward,
            amount,
        }
    }

    /// Move forward (right/down) by `amount` units.
    #[must_use]
    pub const fn forward(granularity: Granularity, amount: usize) -> Self {
        Self::new(granularity, true, amount)
    }

    /// Move backward (left/up) by `amount` units.
    #[must_use]
    pub const fn backward(granularity: Granularity, amount: usize) -> Self {
        Self::new(granularity, false, amount)
    }
}

/// Letter, digit, or underscore.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Compute where `motion` takes `pos`.
///
/// `amount == 0` returns `pos` untouched. Motion saturates at the document
/// boundaries instead of wrapping around.
#[must_use]
pub fn apply_motion(buf: &TextBuffer, pos: TextPosition, motion: Motion) -> TextPosition {
    if motion.amount == 0 {
        return pos;
    }
    match motion.granularity {
        Granularity::Line => {
            let line = if motion.forward {
                pos.line.saturating_add(motion.amount)
            } else {
                pos.line.saturating_sub(motion.amount)
            };
            pos.with_line(line.min(buf.last_line()))
        }
        Granularity::Char => repeat(buf, pos, motion, |buf, p, fwd| step_char(buf, p, fwd)),
        Granularity::WordStart => repeat(buf, pos, motion, |buf, p, fwd| {
            scan(buf, p, fwd, is_word_start)
        }),
        Granularity::WordEnd => {
            repeat(buf, pos, motion, |buf, p, fwd| scan(buf, p, fwd, is_word_end))
        }
    }
}

fn repeat(
    buf: &TextBuffer,
    pos: TextPosition,
    motion: Motion,
    step: impl Fn(&TextBuffer, TextPosition, bool) -> TextPosition,
) -> TextPosition {
    let mut pos = buf.clamp(pos);
    for _ in 0..motion.amount {
        let next = step(buf, pos, motion.forward);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}

/// One char step, wrapping to the neighbouring line. Returns `pos` itself at
/// the document boundary.
fn step_char(buf: &TextBuffer, pos: TextPosition, forward: bool) -> TextPosition {
    if forward {
        if pos.column < buf.line_len(pos.line) {
            pos.with_column(pos.column + 1)
        } else if pos.line < buf.last_line() {
            TextPosition::new(pos.line + 1, 0)
        } else {
            pos
        }
    } else if pos.column > 0 {
        pos.with_column(pos.column - 1)
    } else if pos.line > 0 {
        TextPosition::new(pos.line - 1, buf.line_len(pos.line - 1))
    } else {
        pos
    }
}

/// Step at least once, then keep stepping until `pred` holds or the
/// document boundary stops us.
fn scan(
    buf: &TextBuffer,
    start: TextPosition,
    forward: bool,
    pred: fn(&TextBuffer, TextPosition) -> bool,
) -> TextPosition {
    let mut pos = start;
    loop {
        let next = step_char(buf, pos, forward);
        if next == pos {
            return pos;
        }
        pos = next;
        if pred(buf, pos) {
            return pos;
        }
    }
}

fn char_before(buf: &TextBuffer, pos: TextPosition) -> Option<char> {
    if pos.column == 0 {
        return None;
    }
    buf.char_at(pos.with_column(pos.column - 1))
}

fn word_at(buf: &TextBuffer, pos: TextPosition) -> bool {
    buf.char_at(pos).is_some_and(is_word_char)
}

/// Column zero, or a non-word char on the left and a word char at `pos`.
#[must_use]
pub fn is_word_start(buf: &TextBuffer, pos: TextPosition) -> bool {
    if pos.column == 0 {
        return true;
    }
    !char_before(buf, pos).is_some_and(is_word_char) && word_at(buf, pos)
}

/// A word char on the left and a non-word char at `pos`.
#[must_use]
pub fn is_word_end(buf: &TextBuffer, pos: TextPosition) -> bool {
    pos.column > 0 && char_before(buf, pos).is_some_and(is_word_char) && !word_at(buf, pos)
}

/// Advance while the current char is not whitespace, staying on the line.
///
/// Forward looks at the char at the position, backward at the char to its
/// left.
#[must_use]
pub fn find_whitespace(buf: &TextBuffer, pos: TextPosition, forward: bool) -> TextPosition {
    advance_while(buf, pos, forward, |ch| !ch.is_whitespace())
}

/// Advance while the current char is whitespace, staying on the line.
#[must_use]
pub fn find_non_whitespace(buf: &TextBuffer, pos: TextPosition, forward: bool) -> TextPosition {
    advance_while(buf, pos, forward, char::is_whitespace)
}

fn advance_while(
    buf: &TextBuffer,
    pos: TextPosition,
    forward: bool,
    keep_going: impl Fn(char) -> bool,
) -> TextPosition {
    let pos = buf.clamp(pos);
    let chars: Vec<char> = buf.line(pos.line).unwrap_or_default().chars().collect();
    let mut column = pos.column;
    if forward {
        while column < chars.len() && keep_going(chars[column]) {
            column += 1;
        }
    } else {
        while column > 0 && keep_going(chars[column - 1]) {
            column -= 1;
        }
    }
    pos.with_column(column)
}

/// Start of the next whitespace-delimited token on the line.
///
/// On a token, skips the rest of it and the whitespace that follows. On
/// whitespace, skips to the end of that run. Never leaves the line.
#[must_use]
pub fn find_next_word_token(buf: &TextBuffer, pos: TextPosition) -> TextPosition {
    let pos = buf.clamp(pos);
    let on_token = buf.char_at(pos).is_some_and(|ch| !ch.is_whitespace());
    let pos = if on_token {
        find_whitespace(buf, pos, true)
    } else {
        pos
    };
    find_non_whitespace(buf, pos, true)
}

/// Column zero of the same line.
#[must_use]
pub const fn line_start(pos: TextPosition) -> TextPosition {
    pos.with_column(0)
}

/// End of the (clamped) line.
#[must_use]
pub fn line_end(buf: &TextBuffer, pos: TextPosition) -> TextPosition {
    let line = pos.line.min(buf.last_line());
    TextPosition::new(line, buf.line_len(line))
}

#[must_use]
pub const fn document_start() -> TextPosition {
    TextPosition::ORIGIN
}

#[must_use]
pub fn document_end(buf: &TextBuffer) -> TextPosition {
    buf.last_position()
}
