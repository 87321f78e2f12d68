#![forbid(unsafe_code)]

//! Snapshot-based undo/redo with coalescing.
//!
//! Each checkpoint is a full [`EditorState`]: document text, caret, and the
//! wall-clock time it was taken. Both stacks are most-recent-first and
//! bounded; the oldest entries fall off the tail.
//!
//! # Coalescing rule
//!
//! A new checkpoint *replaces* the top of the undo stack when either
//!
//! 1. it arrives before `top.timestamp_ms + coalesce_window_ms`, or
//! 2. its text equals the top's text.
//!
//! Otherwise it is pushed as a new entry. Because rule 1 replaces rather than
//! keeps the older entry, a fast burst of edits leaves only the state from
//! just before the *last* edit of the burst on the stack.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::TextPosition;

/// Default cap for each stack.
pub const DEFAULT_UNDO_LIMIT: usize = 100;
/// Default coalescing window in milliseconds.
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 500;

/// Immutable snapshot of the document and caret.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EditorState {
    pub code: String,
    pub caret: TextPosition,
    pub timestamp_ms: u64,
}

/// Millisecond time source for undo timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock, milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// What a checkpoint did to the undo stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Pushed as a new entry.
    Pushed,
    /// Replaced the previous top entry.
    Coalesced,
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo: VecDeque<EditorState>,
    redo: VecDeque<EditorState>,
    limit: usize,
    coalesce_window_ms: u64,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT, DEFAULT_COALESCE_WINDOW_MS)
    }
}

impl UndoManager {
    /// Create a manager. A `limit` of zero is treated as one.
    #[must_use]
    pub fn new(limit: usize, coalesce_window_ms: u64) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit: limit.max(1),
            coalesce_window_ms,
        }
    }

    /// Record `state` as the newest undo checkpoint.
    ///
    /// Applies the coalescing rule, enforces the cap, and clears the redo
    /// stack since the history has branched.
    pub fn checkpoint(&mut self, state: EditorState) -> Checkpoint {
        let outcome = match self.undo.front() {
            Some(top)
                if state.timestamp_ms < top.timestamp_ms.saturating_add(self.coalesce_window_ms)
                    || state.code == top.code =>
            {
                self.undo.pop_front();
                Checkpoint::Coalesced
            }
            _ => Checkpoint::Pushed,
        };
        tracing::debug!(
            ?outcome,
            depth = self.undo.len() + 1,
            timestamp_ms = state.timestamp_ms,
            "undo checkpoint"
        );
        push_capped(&mut self.undo, state, self.limit);
        self.redo.clear();
        outcome
    }

    /// Step back: park `current` on the redo stack and hand back the newest
    /// undo checkpoint. `None` (and no change) when there is nothing to undo.
    pub fn undo(&mut self, current: EditorState) -> Option<EditorState> {
        let target = self.undo.pop_front()?;
        push_capped(&mut self.redo, current, self.limit);
        Some(target)
    }

    /// Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: EditorState) -> Option<EditorState> {
        let target = self.redo.pop_front()?;
        push_capped(&mut self.undo, current, self.limit);
        Some(target)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Undo checkpoints, newest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &EditorState> {
        self.undo.iter()
    }

    /// Redo checkpoints, newest first.
    pub fn redo_entries(&self) -> impl Iterator<Item = &EditorState> {
        self.redo.iter()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_capped(stack: &mut VecDeque<EditorState>, state: EditorState, limit: usize) {
    stack.push_front(state);
    while stack.len() > limit {
        stack.pop_back();
    }
}
