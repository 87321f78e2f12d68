#![forbid(unsafe_code)]

//! Clipboard collaborator.
//!
//! The editor treats the clipboard as an opaque, process-wide string store it
//! does not own. Hosts implement [`Clipboard`] over whatever they have (a game
//! clipboard, OSC 52, a platform API); [`MemoryClipboard`] is the in-process
//! store used when nothing else is available and in tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Clipboard errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard backend is reachable.
    NotAvailable,
    ReadError(String),
    WriteError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "clipboard not available"),
            Self::ReadError(msg) => write!(f, "clipboard read failed: {msg}"),
            Self::WriteError(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// External string store used by cut, copy, and paste.
pub trait Clipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory clipboard. Clones share one store, so every editor handed a
/// clone sees the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Rc::new(RefCell::new(text.to_owned())),
        }
    }

    /// Current contents.
    #[must_use]
    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        tracing::trace!(bytes = text.len(), "clipboard write");
        *self.text.borrow_mut() = text.to_owned();
        Ok(())
    }
}

/// Clipboard with no backend: reads and writes fail with
/// [`ClipboardError::NotAvailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::NotAvailable)
    }

    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::NotAvailable)
    }
}

/// Strip carriage returns so pasted CRLF text splits into clean lines.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    text.replace('\r', "")
}
