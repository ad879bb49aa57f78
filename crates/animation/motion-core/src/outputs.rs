//! Outbound notifications from the editing session.
//!
//! Every operation queues the events the UI needs to refresh cached displays.
//! Hosts drain them with `EditorSession::drain_events`. The queue is bounded: once full,
//! the oldest pending events are dropped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_PENDING_EVENTS;
use crate::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Discrete signals emitted by session operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EditorEvent {
    /// Undo/redo availability after any history change.
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// Workspace or animation end changed; the timeline needs re-layout.
    DurationChanged {
        workspace_ms: f64,
        animation_end_ms: f64,
    },
    SelectionChanged { selection: Selection },
    /// The whole document was swapped (new, load, undo, redo).
    DocumentReplaced,
    /// Message for the user, e.g. a toast.
    Notice { level: NoticeLevel, message: String },
}

/// Pending events, in emission order, bounded by `limit`.
#[derive(Clone, Debug)]
pub struct EventQueue {
    events: VecDeque<EditorEvent>,
    limit: usize,
    dropped: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_PENDING_EVENTS)
    }
}

impl EventQueue {
    /// Queue holding at most `limit` events (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: EditorEvent) {
        if self.events.len() >= self.limit {
            self.events.pop_front();
            if self.dropped == 0 {
                log::warn!(
                    "event queue full ({} pending); dropping oldest events until drained",
                    self.limit
                );
            }
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.push(EditorEvent::Notice {
            level,
            message: message.into(),
        });
    }

    /// Take every pending event and reset the dropped counter.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.dropped = 0;
        self.events.drain(..).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded since the last drain.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditorEvent> {
        self.events.iter()
    }
}
