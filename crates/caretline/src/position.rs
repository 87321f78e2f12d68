#![forbid(unsafe_code)]

//! Caret positions and ranges.
//!
//! Both types are small `Copy` values. Nothing mutates a position in place:
//! motion, clamping, and sorting all compute and return a new value.
//!
//! Columns count Unicode scalar values (`char`s), so a column can always be
//! turned into a valid byte offset with [`byte_offset`].
//!
//! # Example
//! ```
//! use caretline::{TextPosition, TextRange};
//!
//! let range = TextRange::new(TextPosition::new(2, 0), TextPosition::new(0, 4));
//! let sorted = range.sorted();
//! assert_eq!(sorted.start, TextPosition::new(0, 4));
//! assert_eq!(sorted.end, TextPosition::new(2, 0));
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A (line, column) location in a buffer.
///
/// Ordering is lexicographic: line first, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextPosition {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars. Equal to the line length at end of line.
    pub column: usize,
}

impl TextPosition {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first position of any document.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Same line, different column.
    #[must_use]
    pub const fn with_column(self, column: usize) -> Self {
        Self {
            line: self.line,
            column,
        }
    }

    /// Same column, different line.
    #[must_use]
    pub const fn with_line(self, line: usize) -> Self {
        Self {
            line,
            column: self.column,
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// A directional span between two positions.
///
/// `start` is where the user anchored, `end` where they stopped; the two may
/// be in either document order. Use [`sorted`](Self::sorted) before slicing.
/// An unset selection is `Option::<TextRange>::None`, which is distinct from
/// an empty range sitting at a real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    /// Create a range from two endpoints, in any order.
    #[must_use]
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// A zero-length range at `pos`.
    #[must_use]
    pub const fn point(pos: TextPosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The same range with `start <= end`.
    #[must_use]
    pub fn sorted(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Whether both endpoints coincide.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the range runs backward in document order.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Whether `pos` lies in the half-open sorted span `[start, end)`.
    #[must_use]
    pub fn contains(&self, pos: TextPosition) -> bool {
        let sorted = self.sorted();
        sorted.start <= pos && pos < sorted.end
    }

    /// Column span this range covers on `line`, given that line's length.
    ///
    /// Returns `None` when the line is outside the range or nothing on it
    /// is covered. Lines strictly inside a multi-line range are covered to
    /// their end.
    #[must_use]
    pub fn columns_on_line(&self, line: usize, line_len: usize) -> Option<std::ops::Range<usize>> {
        let sorted = self.sorted();
        if line < sorted.start.line || line > sorted.end.line {
            return None;
        }
        let from = if line == sorted.start.line {
            sorted.start.column.min(line_len)
        } else {
            0
        };
        let to = if line == sorted.end.line {
            sorted.end.column.min(line_len)
        } else {
            line_len
        };
        (from < to).then_some(from..to)
    }
}

/// Byte offset of char column `column` in `line`. Columns past the end map
/// to `line.len()`.
#[must_use]
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(idx, _)| idx)
}

/// Length of `line` in chars.
#[inline]
#[must_use]
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}
