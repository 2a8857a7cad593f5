//! Bounded undo/redo timeline of surface snapshots.

use crate::surface::SurfaceSnapshot;
use std::collections::VecDeque;

/// Default number of snapshots kept.
pub const MAX_HISTORY: usize = 50;

/// Linear snapshot history with a cursor.
///
/// The entry at the cursor always mirrors the committed surface. Committing
/// after an undo discards every entry past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<SurfaceSnapshot>,
    index: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: SurfaceSnapshot) -> Self {
        Self::with_limit(initial, MAX_HISTORY)
    }

    /// Like [`History::new`], keeping at most `limit` entries (minimum 1).
    pub fn with_limit(initial: SurfaceSnapshot, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.min(MAX_HISTORY));
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new committed state.
    pub fn commit(&mut self, snapshot: SurfaceSnapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<&SurfaceSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<&SurfaceSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Replace the whole timeline with a single entry.
    pub fn reset(&mut self, initial: SurfaceSnapshot) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.index = 0;
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&SurfaceSnapshot> {
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
