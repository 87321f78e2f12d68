#![forbid(unsafe_code)]

//! Decoded edit commands.
//!
//! Hosts translate their key bindings into [`EditCommand`]s and feed them to
//! [`Editor::apply`]. One command is handled at a time; the buffer and caret
//! are consistent again when `apply` returns.
//!
//! # Example
//! ```
//! use caretline::{EditCommand, Editor, MemoryClipboard};
//!
//! let mut ed = Editor::new();
//! let mut clip = MemoryClipboard::new();
//! ed.apply(EditCommand::Insert("hi".into()), &mut clip).unwrap();
//! ed.apply(EditCommand::SelectAll, &mut clip).unwrap();
//! ed.apply(EditCommand::Copy, &mut clip).unwrap();
//! assert_eq!(clip.contents(), "hi");
//! ```

use crate::clipboard::{Clipboard, ClipboardError};
use crate::editor::Editor;
use crate::motion::Motion;

/// One input command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Typed text; replaces the selection.
    Insert(String),
    Backspace,
    /// Forward delete.
    Delete,
    /// Enter.
    Newline,
    /// Caret motion, growing the selection when `extend` is set.
    Move { motion: Motion, extend: bool },
    LineStart { extend: bool },
    LineEnd { extend: bool },
    PageUp { extend: bool },
    PageDown { extend: bool },
    SelectAll,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
}

impl EditCommand {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Newline => "newline",
            Self::Move { .. } => "move",
            Self::LineStart { .. } => "line_start",
            Self::LineEnd { .. } => "line_end",
            Self::PageUp { .. } => "page_up",
            Self::PageDown { .. } => "page_down",
            Self::SelectAll => "select_all",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Whether the command may change the document.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::Insert(_)
                | Self::Backspace
                | Self::Delete
                | Self::Newline
                | Self::Cut
                | Self::Paste
                | Self::Undo
                | Self::Redo
        )
    }
}

/// Result of applying a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The document text changed.
    pub changed: bool,
}

impl Editor {
    /// Apply one command.
    ///
    /// Only clipboard commands can fail; on failure the document is left as
    /// it was.
    pub fn apply(
        &mut self,
        command: EditCommand,
        clipboard: &mut dyn Clipboard,
    ) -> Result<CommandOutcome, ClipboardError> {
        let _span = tracing::debug_span!(
            "edit_command",
            command = command.name(),
            destructive = command.is_destructive(),
            caret = %self.caret()
        )
        .entered();

        let before = self.buffer().revision();
        match command {
            EditCommand::Insert(text) => {
                self.type_text(&text);
            }
            EditCommand::Backspace => {
                self.backspace();
            }
            EditCommand::Delete => {
                self.delete_forward();
            }
            EditCommand::Newline => {
                self.insert_newline();
            }
            EditCommand::Move { motion, extend } => {
                self.move_caret(motion, extend);
            }
            EditCommand::LineStart { extend } => {
                self.move_to_line_start(extend);
            }
            EditCommand::LineEnd { extend } => {
                self.move_to_line_end(extend);
            }
            EditCommand::PageUp { extend } => {
                self.page_up(extend);
            }
            EditCommand::PageDown { extend } => {
                self.page_down(extend);
            }
            EditCommand::SelectAll => self.select_all(),
            EditCommand::Cut => {
                self.cut(clipboard)?;
            }
            EditCommand::Copy => {
                self.copy(clipboard)?;
            }
            EditCommand::Paste => {
                self.paste(clipboard)?;
            }
            EditCommand::Undo => {
                self.undo();
            }
            EditCommand::Redo => {
                self.redo();
            }
        }

        let outcome = CommandOutcome {
            changed: self.buffer().revision() != before,
        };
        tracing::trace!(changed = outcome.changed, caret = %self.caret(), "command applied");
        Ok(outcome)
    }
}
