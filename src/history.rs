//! Snapshot-based undo/redo stack.
//!
//! Each entry is a deep copy of the element array. The cursor points at the
//! entry matching the live state; undo and redo move it and hand back a fresh
//! copy for the caller to restore.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::element::Element;

/// Linear history with a cursor and a bounded depth.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Element>>,
    cursor: usize,
    max_depth: usize,
}

impl History {
    /// Empty history retaining at most `max_depth` entries (minimum 1).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { entries: Vec::new(), cursor: 0, max_depth: max_depth.max(1) }
    }

    /// Record a new state.
    ///
    /// Entries after the cursor are discarded. When the stack is full the
    /// oldest entry is evicted, so the cursor stays on the last entry.
    pub fn push(&mut self, snapshot: Vec<Element>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry and return a copy of it. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Vec<Element>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward one entry and return a copy of it. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<Vec<Element>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Drop every entry and start over from `baseline`.
    pub fn reset(&mut self, baseline: Vec<Element>) {
        self.entries.clear();
        self.entries.push(baseline);
        self.cursor = 0;
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&[Element]> {
        self.entries.get(self.cursor).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
