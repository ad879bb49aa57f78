//! Undo/redo stacks of document snapshots.
//!
//! The undo stack is bounded; once full, the oldest entry is evicted. Any new
//! action clears the redo stack. While a snapshot is being restored the history
//! is marked as restoring and `save_state` becomes a no-op, so restoring never
//! records itself.

use std::collections::VecDeque;

use crate::data::Document;
use crate::selection::Selection;

/// Immutable copy of everything undo/redo restores.
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySnapshot {
    pub document: Document,
    pub selection: Selection,
    pub current_time: f64,
    /// Human-readable name of the action this snapshot precedes.
    pub label: String,
}

/// Outcome of an undo or redo request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryStep {
    /// The stack was empty; nothing changed.
    Empty,
    /// A snapshot was restored. `label` names the action that was undone or redone.
    Restored { label: String },
}

#[derive(Debug)]
pub struct History {
    undo: VecDeque<HistorySnapshot>,
    redo: Vec<HistorySnapshot>,
    max_depth: usize,
    restoring: bool,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(max_depth.min(64)),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
            restoring: false,
        }
    }

    /// Record the pre-mutation state. Returns false (and records nothing) while a
    /// restore is in progress.
    pub fn save_state(&mut self, snapshot: HistorySnapshot) -> bool {
        if self.restoring {
            log::debug!("history: ignoring save '{}' during restore", snapshot.label);
            return false;
        }
        log::debug!(
            "history: saved '{}' (undo depth {})",
            snapshot.label,
            self.undo.len() + 1
        );
        self.push_undo(snapshot);
        self.redo.clear();
        true
    }

    fn push_undo(&mut self, snapshot: HistorySnapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    /// Pop the latest undo entry, parking `current` on the redo stack.
    ///
    /// Returns `None` without touching either stack when there is nothing to undo.
    /// The caller must restore the returned snapshot between
    /// [`History::begin_restore`] and [`History::end_restore`].
    pub fn undo(&mut self, mut current: HistorySnapshot) -> Option<HistorySnapshot> {
        let previous = self.undo.pop_back()?;
        current.label = previous.label.clone();
        self.redo.push(current);
        log::debug!("history: undo '{}'", previous.label);
        Some(previous)
    }

    /// Pop the latest redo entry, parking `current` on the undo stack.
    pub fn redo(&mut self, mut current: HistorySnapshot) -> Option<HistorySnapshot> {
        let next = self.redo.pop()?;
        current.label = next.label.clone();
        self.push_undo(current);
        log::debug!("history: redo '{}'", next.label);
        Some(next)
    }

    #[inline]
    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    #[inline]
    pub fn end_restore(&mut self) {
        self.restoring = false;
    }

    #[inline]
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Label of the action the next undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|s| s.label.as_str())
    }

    /// Label of the action the next redo would reapply.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|s| s.label.as_str())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
