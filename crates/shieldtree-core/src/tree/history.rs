use std::ops::{Deref, DerefMut, Index};

use crate::tree::ids::{ActionId, ObservationId};

/// One `(action, observation)` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub action: ActionId,
    pub observation: ObservationId,
}

/// Sequence of steps taken so far, real steps first and simulated ones after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: ActionId, observation: ObservationId) {
        self.entries.push(HistoryEntry {
            action,
            observation,
        });
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Shrink back to `len` entries. Longer lengths leave the history untouched.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn back(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Open a scope whose appends are discarded when the guard drops,
    /// on every exit path including `?` returns.
    pub fn trial(&mut self) -> TrialScope<'_> {
        let base = self.entries.len();
        TrialScope {
            history: self,
            base,
        }
    }
}

impl Index<usize> for History {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Guard returned by [`History::trial`].
#[derive(Debug)]
pub struct TrialScope<'a> {
    history: &'a mut History,
    base: usize,
}

impl TrialScope<'_> {
    /// History length when the scope opened.
    pub fn base(&self) -> usize {
        self.base
    }
}

impl Deref for TrialScope<'_> {
    type Target = History;

    fn deref(&self) -> &Self::Target {
        self.history
    }
}

impl DerefMut for TrialScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.history
    }
}

impl Drop for TrialScope<'_> {
    fn drop(&mut self) {
        self.history.truncate(self.base);
    }
}
