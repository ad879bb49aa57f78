//! Interactive gestures: one history entry at the start, many commits without history.
//!
//! Two kinds exist:
//! - transform gestures (move/scale/rotate a layer at the playhead),
//! - keyframe time drags on the timeline.
//!
//! Only one gesture is active at a time; starting another ends the current one, and so
//! does any editing operation, before it validates its arguments.

use serde::{Deserialize, Serialize};

use super::EditorSession;
use crate::data::{remove_near, settle, LayerProperties};
use crate::error::EditorError;
use crate::selection::Selection;
use crate::Result;

/// Interactive transform being applied to the selected layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    Move,
    Scale,
    Rotate,
}

impl GestureKind {
    /// History label for the gesture.
    pub fn label(self) -> &'static str {
        match self {
            Self::Move => "Move Layer",
            Self::Scale => "Scale Layer",
            Self::Rotate => "Rotate Layer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ActiveGesture {
    Transform {
        kind: GestureKind,
        layer: usize,
    },
    KeyframeDrag {
        layer: usize,
        keyframe: usize,
        end_before: f64,
    },
}

impl EditorSession {
    /// Start a transform gesture on the selected layer, snapshotting once.
    pub fn begin_gesture(&mut self, kind: GestureKind) -> Result<()> {
        self.end_active_gesture();
        let layer = self.selected_layer()?;
        self.save_state(kind.label());
        self.gesture = Some(ActiveGesture::Transform { kind, layer });
        log::debug!("gesture {kind:?} started on layer {layer}");
        Ok(())
    }

    /// Commit intermediate transform values at the playhead without a history entry.
    ///
    /// Behaves like a properties commit: overwrites the keyframe within the merge
    /// threshold (keeping its easing) or inserts a linear one.
    pub fn commit_gesture_tick(&mut self, props: LayerProperties) -> Result<usize> {
        let Some(ActiveGesture::Transform { layer, .. }) = self.gesture else {
            return Err(self.reject(EditorError::NoActiveGesture));
        };
        if let Err(err) = self.document.layer(layer) {
            self.gesture = None;
            return Err(self.reject(err));
        }
        let end_before = self.animation_end();
        let previous = self.selection;
        let index = self.write_at_current_time(layer, props);
        self.refresh_duration(end_before);
        if self.selection != previous {
            self.emit_selection();
        }
        Ok(index)
    }

    /// Finish the active gesture. Keyframe drags are dropped as by [`Self::end_keyframe_drag`].
    pub fn end_gesture(&mut self) -> Result<()> {
        match self.gesture {
            Some(ActiveGesture::Transform { kind, layer }) => {
                self.gesture = None;
                log::debug!("gesture {kind:?} ended on layer {layer}");
                Ok(())
            }
            Some(ActiveGesture::KeyframeDrag { .. }) => self.end_keyframe_drag().map(|_| ()),
            None => Err(self.reject(EditorError::NoActiveGesture)),
        }
    }

    #[inline]
    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Kind of the active transform gesture, if any.
    pub fn active_gesture_kind(&self) -> Option<GestureKind> {
        match self.gesture {
            Some(ActiveGesture::Transform { kind, .. }) => Some(kind),
            _ => None,
        }
    }

    /// Start dragging a keyframe along the timeline, snapshotting once.
    pub fn begin_keyframe_drag(&mut self, layer: usize, keyframe: usize) -> Result<()> {
        self.end_active_gesture();
        self.document
            .layer(layer)
            .and_then(|l| l.keyframe(keyframe))
            .map_err(|e| self.reject(e))?;
        let end_before = self.animation_end();
        self.save_state("Drag keyframe");
        self.selection = Selection::layer_keyframe(layer, Some(keyframe));
        self.gesture = Some(ActiveGesture::KeyframeDrag {
            layer,
            keyframe,
            end_before,
        });
        self.emit_selection();
        Ok(())
    }

    /// Move the dragged keyframe to `time`, clamped to the workspace. The keyframes stay
    /// sorted and the selection follows the dragged one. Returns its new index.
    pub fn drag_keyframe_to(&mut self, time: f64) -> Result<usize> {
        let Some(ActiveGesture::KeyframeDrag {
            layer,
            keyframe,
            end_before,
        }) = self.gesture
        else {
            return Err(self.reject(EditorError::NoActiveGesture));
        };
        if !time.is_finite() {
            return Err(self.reject(EditorError::InvalidTime { time }));
        }
        let time = time.clamp(0.0, self.document.settings.duration.max(0.0));
        if let Err(err) = self.document.layer(layer).and_then(|l| l.keyframe(keyframe)) {
            self.gesture = None;
            return Err(self.reject(err));
        }
        let keys = &mut self.document.layers[layer].keyframes;
        keys[keyframe].time = time;
        let index = settle(keys, keyframe);
        self.gesture = Some(ActiveGesture::KeyframeDrag {
            layer,
            keyframe: index,
            end_before,
        });
        if self.selection.keyframe != Some(index) {
            self.selection.keyframe = Some(index);
            self.emit_selection();
        }
        Ok(index)
    }

    /// Drop the dragged keyframe.
    ///
    /// Every other keyframe left within the merge threshold is removed (the dragged one
    /// wins). The playhead moves to the dropped keyframe and the duration is
    /// recomputed. Returns the keyframe's final index.
    pub fn end_keyframe_drag(&mut self) -> Result<usize> {
        let Some(ActiveGesture::KeyframeDrag {
            layer,
            keyframe,
            end_before,
        }) = self.gesture
        else {
            return Err(self.reject(EditorError::NoActiveGesture));
        };
        self.gesture = None;
        let time = self
            .document
            .layer(layer)
            .and_then(|l| l.keyframe(keyframe))
            .map(|k| k.time)
            .map_err(|e| self.reject(e))?;
        let threshold = self.config.merge_threshold_ms;
        let keys = &mut self.document.layers[layer].keyframes;
        let (index, removed) = remove_near(keys, keyframe, threshold);
        if removed > 0 {
            log::debug!("keyframe drop on layer {layer} replaced {removed} keyframe(s)");
        }
        self.current_time = time;
        self.selection = Selection::layer_keyframe(layer, Some(index));
        self.refresh_duration(end_before);
        self.emit_selection();
        log::debug!("keyframe drag ended on layer {layer}: index {index} at {time} ms");
        Ok(index)
    }

    /// End any active gesture before another gesture or an edit starts.
    pub(super) fn end_active_gesture(&mut self) {
        if self.gesture.is_some() {
            if let Err(err) = self.end_gesture() {
                log::warn!("failed to end previous gesture: {err}");
            }
        }
    }

    /// Undo/redo replace the document, so an in-flight gesture is abandoned.
    pub(super) fn finish_gesture_for_history(&mut self) {
        if let Some(g) = self.gesture.take() {
            log::debug!("abandoning gesture {g:?} for history restore");
        }
    }
}
