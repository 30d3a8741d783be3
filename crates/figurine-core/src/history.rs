//! Snapshot-based linear undo/redo.

use crate::ids::LayerId;
use crate::layers::Layer;
use crate::viewport::CanvasState;
use std::sync::Arc;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// A full copy of the undoable editor state.
///
/// The layer list is shared with the store until either side changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub layers: Arc<Vec<Layer>>,
    pub selection: Vec<LayerId>,
    pub canvas: CanvasState,
}

/// Linear list of snapshots with a cursor.
///
/// `index` is `None` only while the history is empty. Pushing truncates any
/// redo branch past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryState>,
    index: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of retained snapshots, baseline included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the current snapshot, `None` before the baseline is set.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Snapshot the document currently matches.
    pub fn current(&self) -> Option<&HistoryState> {
        self.index.and_then(|i| self.entries.get(i))
    }

    /// Record a new snapshot after the cursor, discarding the redo branch.
    pub fn push(&mut self, state: HistoryState) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(state);

        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
            log::trace!("history full, dropped {} oldest snapshot(s)", overflow);
        }
        self.index = Some(self.entries.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(i) => i + 1 < self.entries.len(),
            None => false,
        }
    }

    /// Step back; returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&HistoryState> {
        if !self.can_undo() {
            return None;
        }
        let i = self.index? - 1;
        self.index = Some(i);
        self.entries.get(i)
    }

    /// Step forward; returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&HistoryState> {
        if !self.can_redo() {
            return None;
        }
        let i = self.index? + 1;
        self.index = Some(i);
        self.entries.get(i)
    }

    /// Drop everything and start over from `baseline`.
    pub fn reset(&mut self, baseline: HistoryState) {
        self.entries.clear();
        self.index = None;
        self.push(baseline);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
