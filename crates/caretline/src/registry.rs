#![forbid(unsafe_code)]

//! One [`Editor`] per document, created on first access.
//!
//! The owner of the registry decides when a document is gone and calls
//! [`EditorRegistry::remove`]; nothing is evicted implicitly.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::editor::Editor;

/// Editors keyed by an opaque document id.
#[derive(Debug)]
pub struct EditorRegistry<K> {
    editors: FxHashMap<K, Editor>,
}

impl<K> Default for EditorRegistry<K> {
    fn default() -> Self {
        Self {
            editors: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash> EditorRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The editor for `id`, building it with `make` if it does not exist yet.
    pub fn get_or_insert_with(&mut self, id: K, make: impl FnOnce() -> Editor) -> &mut Editor {
        self.editors.entry(id).or_insert_with(|| {
            tracing::debug!("editor created");
            make()
        })
    }

    #[must_use]
    pub fn get(&self, id: &K) -> Option<&Editor> {
        self.editors.get(id)
    }

    pub fn get_mut(&mut self, id: &K) -> Option<&mut Editor> {
        self.editors.get_mut(id)
    }

    /// Drop the editor for `id` and hand it back.
    pub fn remove(&mut self, id: &K) -> Option<Editor> {
        let removed = self.editors.remove(id);
        if removed.is_some() {
            tracing::debug!(remaining = self.editors.len(), "editor removed");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.editors.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// All editors, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut Editor)> {
        self.editors.iter_mut()
    }
}
