//! The editing session: single owner of the document, selection, playhead and history.
//!
//! Every mutating operation follows the same sequence:
//! 1. validate (rejections return `Err` and leave everything untouched),
//! 2. snapshot the pre-mutation state into history,
//! 3. mutate,
//! 4. recompute the workspace duration when the keyframe set changed,
//! 5. point the selection at the affected entity and queue UI events.
//!
//! Operations are split by concern across `keyframes`, `layers`, `background` and
//! `gestures`; this module holds the shared plumbing, history and project lifecycle.

mod background;
mod gestures;
mod keyframes;
mod layers;

pub use gestures::GestureKind;
pub use layers::validate_layer_name;

use crate::color::Rgb;
use crate::config::EditorConfig;
use crate::data::{Document, KeyframeValues, LayerProperties};
use crate::error::EditorError;
use crate::history::{History, HistorySnapshot, HistoryStep};
use crate::ids::LayerId;
use crate::outputs::{EditorEvent, EventQueue, NoticeLevel};
use crate::sampling::{sample_background_color, sample_keyframes};
use crate::selection::{clamp_selection, Selection};
use crate::stored_project::{parse_project_json, to_project_json, ImageResolver};
use crate::timeline::{
    advance_playback, compute_animation_end, playback_start_time, recompute_workspace_duration,
    PlaybackStep,
};
use crate::Result;

use gestures::ActiveGesture;

/// Value-only copy of a keyframe, remembered together with the layer it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Clipboard {
    pub values: KeyframeValues,
    pub source_layer: LayerId,
}

/// Owns an editable document and everything derived from it.
///
/// Operations queue [`EditorEvent`]s for the host. Drain them with
/// [`EditorSession::drain_events`] regularly; at most `max_pending_events` are kept and
/// the oldest are dropped first.
#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    selection: Selection,
    current_time: f64,
    history: History,
    clipboard: Option<Clipboard>,
    gesture: Option<ActiveGesture>,
    config: EditorConfig,
    events: EventQueue,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(config.default_settings.clone());
        Self {
            document,
            selection: Selection::default(),
            current_time: 0.0,
            history: History::new(config.max_history),
            clipboard: None,
            gesture: None,
            events: EventQueue::with_limit(config.max_pending_events),
            config,
        }
    }

    /// Start a session on an existing document. History starts empty and the
    /// document's workspace duration is kept unless it is not positive.
    pub fn with_document(config: EditorConfig, mut document: Document) -> Self {
        if !(document.settings.duration.is_finite() && document.settings.duration > 0.0) {
            document.settings.duration = config.default_settings.duration;
        }
        let mut session = Self::new(config);
        session.document = document;
        session.announce_duration();
        session
    }

    // ---------- read access ----------

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn animation_end(&self) -> f64 {
        compute_animation_end(&self.document)
    }

    #[inline]
    pub fn workspace_duration(&self) -> f64 {
        self.document.settings.duration
    }

    /// Sample one layer honoring the document's smooth-playback flag.
    pub fn sample_layer(&self, index: usize, time: f64) -> Result<Option<LayerProperties>> {
        let layer = self.document.layer(index)?;
        Ok(sample_keyframes(&layer.keyframes, time, self.snap_window()))
    }

    /// Sample every layer in z-order. Hidden layers are included; `None` means no keyframes.
    pub fn sample_all(&self, time: f64) -> Vec<Option<LayerProperties>> {
        let snap = self.snap_window();
        self.document
            .layers
            .iter()
            .map(|l| sample_keyframes(&l.keyframes, time, snap))
            .collect()
    }

    pub fn background_color(&self, time: f64) -> Rgb {
        sample_background_color(&self.document, time)
    }

    #[inline]
    fn snap_window(&self) -> Option<f64> {
        if self.document.smooth_playback {
            None
        } else {
            Some(self.config.snap_threshold_ms)
        }
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    /// Events discarded because the queue was full since the last drain.
    #[inline]
    pub fn dropped_events(&self) -> usize {
        self.events.dropped()
    }

    // ---------- playhead ----------

    /// Move the playhead. Negative times clamp to 0.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(self.reject(EditorError::InvalidTime { time }));
        }
        self.current_time = time.max(0.0);
        Ok(())
    }

    /// Rewind to the start if the playhead sits at or past the animation end.
    pub fn start_playback(&mut self) -> f64 {
        self.current_time = playback_start_time(self.current_time, self.animation_end());
        self.current_time
    }

    /// Advance the playhead by one frame of playback.
    pub fn tick(&mut self, elapsed_ms: f64, speed: f64) -> PlaybackStep {
        let step = advance_playback(
            self.current_time,
            elapsed_ms,
            speed,
            self.animation_end(),
            self.document.loop_enabled,
        );
        self.current_time = step.time;
        step
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.document.loop_enabled = enabled;
    }

    pub fn set_smooth_playback(&mut self, enabled: bool) {
        self.document.smooth_playback = enabled;
    }

    // ---------- selection ----------

    /// Select a layer. Switching to a different layer selects its first keyframe and
    /// moves the playhead there. An out-of-range index clears the selection.
    pub fn select_layer(&mut self, index: usize) {
        if index >= self.document.layers.len() {
            log::warn!(
                "select_layer: index {index} out of range ({} layers)",
                self.document.layers.len()
            );
            self.clear_selection();
            return;
        }
        let switching = self.selection.layer != Some(index);
        self.selection.layer = Some(index);
        self.selection.background_keyframe = None;
        if switching {
            let first = self.document.layers[index].keyframes.first().map(|k| k.time);
            self.selection.keyframe = first.map(|_| 0);
            if let Some(t) = first {
                self.current_time = t;
            }
        }
        self.emit_selection();
    }

    /// Select a keyframe of the selected layer and move the playhead to it.
    pub fn select_keyframe(&mut self, index: usize) -> Result<()> {
        let layer_index = self
            .selection
            .layer
            .ok_or_else(|| self.reject(EditorError::NoLayerSelected))?;
        let time = self
            .document
            .layer(layer_index)
            .and_then(|l| l.keyframe(index))
            .map(|k| k.time)
            .map_err(|e| self.reject(e))?;
        self.selection.keyframe = Some(index);
        self.selection.background_keyframe = None;
        self.current_time = time;
        self.emit_selection();
        Ok(())
    }

    /// Select a background keyframe and move the playhead to it. The layer stays
    /// selected; its keyframe selection is cleared.
    pub fn select_background_keyframe(&mut self, index: usize) -> Result<()> {
        let len = self.document.background_keyframes.len();
        let Some(time) = self.document.background_keyframes.get(index).map(|k| k.time) else {
            return Err(self.reject(EditorError::BackgroundKeyframeOutOfRange { index, len }));
        };
        self.selection.background_keyframe = Some(index);
        self.selection.keyframe = None;
        self.current_time = time;
        self.emit_selection();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
        self.emit_selection();
    }

    // ---------- history ----------

    /// Restore the state before the most recent action.
    pub fn undo(&mut self) -> HistoryStep {
        self.finish_gesture_for_history();
        // Skip the snapshot when there is nothing to restore.
        let restored = if self.history.can_undo() {
            let current = self.capture("Current state");
            self.history.undo(current)
        } else {
            None
        };
        let Some(snapshot) = restored else {
            self.events.notice(NoticeLevel::Info, "Nothing to undo");
            return HistoryStep::Empty;
        };
        let label = snapshot.label.clone();
        self.restore(snapshot);
        self.events
            .notice(NoticeLevel::Info, format!("Undo: {label}"));
        HistoryStep::Restored { label }
    }

    /// Reapply the most recently undone action.
    pub fn redo(&mut self) -> HistoryStep {
        self.finish_gesture_for_history();
        // Skip the snapshot when there is nothing to restore.
        let restored = if self.history.can_redo() {
            let current = self.capture("Previous state");
            self.history.redo(current)
        } else {
            None
        };
        let Some(snapshot) = restored else {
            self.events.notice(NoticeLevel::Info, "Nothing to redo");
            return HistoryStep::Empty;
        };
        let label = snapshot.label.clone();
        self.restore(snapshot);
        self.events
            .notice(NoticeLevel::Info, format!("Redo: {label}"));
        HistoryStep::Restored { label }
    }

    fn restore(&mut self, snapshot: HistorySnapshot) {
        self.history.begin_restore();
        self.document = snapshot.document;
        self.selection = clamp_selection(&self.document, snapshot.selection);
        self.current_time = snapshot.current_time;
        // The snapshot carries the workspace computed when it was taken.
        self.announce_duration();
        self.events.push(EditorEvent::DocumentReplaced);
        self.emit_selection();
        self.emit_history();
        self.history.end_restore();
    }

    // ---------- project lifecycle ----------

    /// Replace the document with an empty one and forget all history.
    pub fn new_project(&mut self) {
        self.gesture = None;
        self.document = Document::new(self.config.default_settings.clone());
        self.selection = Selection::default();
        self.current_time = 0.0;
        self.history.clear();
        log::debug!("new project");
        self.announce_duration();
        self.events.push(EditorEvent::DocumentReplaced);
        self.emit_selection();
        self.emit_history();
    }

    /// Replace the document with a stored project. History is cleared.
    ///
    /// On error the current document is kept.
    pub fn load_project(&mut self, json: &str, images: &dyn ImageResolver) -> Result<()> {
        let document = parse_project_json(json, images).map_err(|e| self.reject(e))?;
        self.gesture = None;
        self.document = document;
        self.selection = clamp_selection(&self.document, self.selection);
        self.current_time = 0.0;
        self.history.clear();
        log::debug!(
            "loaded project: {} layers, {} keyframes",
            self.document.layers.len(),
            self.document.keyframe_count()
        );
        self.announce_duration();
        self.events.push(EditorEvent::DocumentReplaced);
        self.emit_selection();
        self.emit_history();
        Ok(())
    }

    /// Persistence view of the current document (image handles dropped).
    pub fn to_project_json(&self) -> Result<String> {
        to_project_json(&self.document)
    }

    // ---------- shared plumbing ----------

    fn capture(&self, label: &str) -> HistorySnapshot {
        HistorySnapshot {
            document: self.document.snapshot(),
            selection: self.selection,
            current_time: self.current_time,
            label: label.to_string(),
        }
    }

    /// Record the pre-mutation state under `label`.
    fn save_state(&mut self, label: &str) {
        let snapshot = self.capture(label);
        if self.history.save_state(snapshot) {
            self.emit_history();
        }
    }

    /// Recompute the workspace duration after a mutation.
    ///
    /// The growth rule only runs when the mutation moved the animation end away from
    /// `end_before`. Loaded and restored documents keep their stored workspace.
    fn refresh_duration(&mut self, end_before: f64) {
        let end = compute_animation_end(&self.document);
        let before = self.document.settings.duration;
        let end_moved = end != end_before;
        if end_moved {
            self.document.settings.duration =
                recompute_workspace_duration(end, before, &self.config.workspace);
        }
        if end_moved || self.document.settings.duration != before {
            log::debug!(
                "duration: workspace {} ms, animation end {} ms",
                self.document.settings.duration,
                end
            );
            self.events.push(EditorEvent::DurationChanged {
                workspace_ms: self.document.settings.duration,
                animation_end_ms: end,
            });
        }
    }

    /// Tell the UI to re-layout the timeline without changing the workspace.
    fn announce_duration(&mut self) {
        self.events.push(EditorEvent::DurationChanged {
            workspace_ms: self.document.settings.duration,
            animation_end_ms: compute_animation_end(&self.document),
        });
    }

    fn emit_selection(&mut self) {
        self.events.push(EditorEvent::SelectionChanged {
            selection: self.selection,
        });
    }

    fn emit_history(&mut self) {
        self.events.push(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Log a rejected operation and hand the error back for propagation.
    fn reject(&self, err: EditorError) -> EditorError {
        log::warn!("rejected ({}): {err}", err.category());
        err
    }

    fn selected_layer(&self) -> Result<usize> {
        match self.selection.layer {
            Some(i) if i < self.document.layers.len() => Ok(i),
            Some(i) => Err(self.reject(EditorError::LayerOutOfRange {
                index: i,
                len: self.document.layers.len(),
            })),
            None => Err(self.reject(EditorError::NoLayerSelected)),
        }
    }

    fn selected_keyframe(&self) -> Result<(usize, usize)> {
        let layer = self.selected_layer()?;
        let keyframe = self
            .selection
            .keyframe
            .ok_or_else(|| self.reject(EditorError::NoKeyframeSelected))?;
        self.document.layers[layer]
            .keyframe(keyframe)
            .map_err(|e| self.reject(e))?;
        Ok((layer, keyframe))
    }
}

fn check_time(time: f64) -> Result<()> {
    if time.is_finite() && time >= 0.0 {
        Ok(())
    } else {
        Err(EditorError::InvalidTime { time })
    }
}
