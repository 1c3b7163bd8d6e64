use std::collections::VecDeque;

use tracing::trace;

use crate::core::table::DataTable;
use crate::error::{ExtractError, ExtractResult};

/// Undo/redo stacks of whole-table snapshots, owned by one session.
///
/// Callers record the current table right before mutating it. Recording a new
/// snapshot discards everything that could have been redone.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    undo: VecDeque<DataTable>,
    redo: Vec<DataTable>,
    limit: Option<usize>,
}

impl HistoryManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` undo steps, dropping the oldest first.
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn record(&mut self, current: &DataTable) {
        self.record_snapshot(current.clone());
    }

    /// Same as [`record`](Self::record) for a snapshot the caller already owns.
    pub fn record_snapshot(&mut self, snapshot: DataTable) {
        self.undo.push_back(snapshot);
        self.redo.clear();
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
        trace!(undo_depth = self.undo.len(), "recorded restore point");
    }

    /// Returns the previous table; `current` becomes redoable.
    pub fn undo(&mut self, current: &DataTable) -> ExtractResult<DataTable> {
        let previous = self.undo.pop_back().ok_or(ExtractError::NothingToUndo)?;
        self.redo.push(current.clone());
        Ok(previous)
    }

    /// Returns the table undone last; `current` becomes undoable again.
    pub fn redo(&mut self, current: &DataTable) -> ExtractResult<DataTable> {
        let next = self.redo.pop().ok_or(ExtractError::NothingToRedo)?;
        self.undo.push_back(current.clone());
        Ok(next)
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

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
