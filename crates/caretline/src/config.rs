#![forbid(unsafe_code)]

//! Editor tuning knobs.
//!
//! Defaults match the interactive behaviour: 100 undo steps per stack, a
//! 500 ms coalescing window, and 20-line page jumps. Each knob can be
//! overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CARETLINE_UNDO_LIMIT` | [`EditorConfig::undo_limit`] |
//! | `CARETLINE_COALESCE_MS` | [`EditorConfig::coalesce_window_ms`] |
//! | `CARETLINE_PAGE_LINES` | [`EditorConfig::page_lines`] |

use std::env;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::undo::{DEFAULT_COALESCE_WINDOW_MS, DEFAULT_UNDO_LIMIT};

pub const ENV_UNDO_LIMIT: &str = "CARETLINE_UNDO_LIMIT";
pub const ENV_COALESCE_MS: &str = "CARETLINE_COALESCE_MS";
pub const ENV_PAGE_LINES: &str = "CARETLINE_PAGE_LINES";

/// Lines moved by PageUp/PageDown.
pub const DEFAULT_PAGE_LINES: usize = 20;

/// Errors from building or validating an [`EditorConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An override could not be parsed.
    InvalidValue { key: &'static str, value: String },
    /// `undo_limit` must be at least one.
    ZeroUndoLimit,
    /// `page_lines` must be at least one.
    ZeroPageLines,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
            Self::ZeroUndoLimit => write!(f, "undo_limit must be at least 1"),
            Self::ZeroPageLines => write!(f, "page_lines must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for an [`Editor`](crate::Editor).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EditorConfig {
    /// Maximum entries on each of the undo and redo stacks.
    pub undo_limit: usize,

    /// A checkpoint taken within this many ms of the previous one replaces it.
    pub coalesce_window_ms: u64,

    /// Lines moved by a page motion.
    pub page_lines: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
            page_lines: DEFAULT_PAGE_LINES,
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }

    #[must_use]
    pub fn with_coalesce_window_ms(mut self, ms: u64) -> Self {
        self.coalesce_window_ms = ms;
        self
    }

    #[must_use]
    pub fn with_page_lines(mut self, lines: usize) -> Self {
        self.page_lines = lines;
        self
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_limit == 0 {
            return Err(ConfigError::ZeroUndoLimit);
        }
        if self.page_lines == 0 {
            return Err(ConfigError::ZeroPageLines);
        }
        Ok(())
    }

    /// Defaults with the `CARETLINE_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    /// Missing variables keep the current value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = parse_override(&lookup, ENV_UNDO_LIMIT)? {
            self.undo_limit = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_COALESCE_MS)? {
            self.coalesce_window_ms = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_PAGE_LINES)? {
            self.page_lines = v;
        }
        self.validate()?;
        tracing::debug!(
            undo_limit = self.undo_limit,
            coalesce_window_ms = self.coalesce_window_ms,
            page_lines = self.page_lines,
            "editor config resolved"
        );
        Ok(self)
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
