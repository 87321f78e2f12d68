#![forbid(unsafe_code)]

//! Line-oriented text editing engine.
//!
//! This crate provides the model behind a code editor widget:
//! - [`TextBuffer`] - ordered lines with per-line formatter notifications
//! - [`CursorModel`] - caret, selection, and drag anchor
//! - [`Motion`] / [`apply_motion`] - char, line, and word motions
//! - [`UndoManager`] - snapshot undo/redo with time-window coalescing
//! - [`Editor`] - the edit operations tying the above together
//! - [`EditCommand`] - decoded key bindings dispatched via [`Editor::apply`]
//! - [`EditorRegistry`] - one editor per document id
//!
//! Positions are `(line, column)` with columns counted in chars.
//!
//! # Example
//! ```
//! use caretline::{Editor, MemoryClipboard, TextPosition, TextRange};
//!
//! let mut ed = Editor::with_text("hello world");
//! let mut clip = MemoryClipboard::new();
//!
//! ed.set_selection(Some(TextRange::new(TextPosition::new(0, 6), TextPosition::new(0, 11))));
//! ed.cut(&mut clip).unwrap();
//! assert_eq!(ed.text(), "hello ");
//!
//! ed.move_to_document_start(false);
//! ed.paste(&mut clip).unwrap();
//! assert_eq!(ed.text(), "worldhello ");
//!
//! ed.undo();
//! assert_eq!(ed.text(), "hello ");
//! ```

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod motion;
pub mod position;
pub mod registry;
pub mod undo;

pub use buffer::{LineFormatter, NullFormatter, Point, TextBuffer};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use command::{CommandOutcome, EditCommand};
pub use config::{ConfigError, EditorConfig};
pub use cursor::CursorModel;
pub use editor::{CommitSink, Editor, EditorStatus};
pub use hit_test::{CellMetrics, cell_width, point_from_position, position_from_point};
pub use motion::{Granularity, Motion, apply_motion};
pub use position::{TextPosition, TextRange};
pub use registry::EditorRegistry;
pub use undo::{Clock, EditorState, ManualClock, SystemClock, UndoManager};
