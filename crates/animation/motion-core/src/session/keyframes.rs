//! Layer keyframe operations: add/update, delete, copy/paste, easing and panel edits.

use super::{check_time, Clipboard, EditorSession};
use crate::data::{upsert_by_time, Keyframe, KeyframeValues, LayerProperties};
use crate::error::EditorError;
use crate::interp::Easing;
use crate::outputs::NoticeLevel;
use crate::selection::Selection;
use crate::Result;

impl EditorSession {
    /// Add a keyframe at `time`, or overwrite the one within the merge threshold.
    ///
    /// An overwritten keyframe takes every value of `values` (easing included) and
    /// moves to `time`. Selects the affected keyframe and returns its index.
    pub fn add_keyframe(&mut self, layer: usize, time: f64, values: KeyframeValues) -> Result<usize> {
        self.end_active_gesture();
        check_time(time).map_err(|e| self.reject(e))?;
        self.document.layer(layer).map_err(|e| self.reject(e))?;

        let end_before = self.animation_end();
        self.save_state("Add Keyframe");
        let threshold = self.config.merge_threshold_ms;
        let keys = &mut self.document.layers[layer].keyframes;
        let up = upsert_by_time(
            keys,
            time,
            threshold,
            Keyframe::from_values(time, values),
            |existing, new| *existing = new,
        );
        log::debug!(
            "{} keyframe {} on layer {layer} at {time} ms",
            if up.merged { "updated" } else { "added" },
            up.index
        );
        self.selection = Selection::layer_keyframe(layer, Some(up.index));
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(up.index)
    }

    /// Delete the selected keyframe. The keyframe selection is cleared.
    pub fn delete_keyframe(&mut self) -> Result<Keyframe> {
        self.end_active_gesture();
        let (layer, keyframe) = self.selected_keyframe()?;
        self.delete_keyframe_at(layer, keyframe)
    }

    /// Delete keyframe `keyframe` of layer `layer`. A layer may end up with none.
    pub fn delete_keyframe_at(&mut self, layer: usize, keyframe: usize) -> Result<Keyframe> {
        self.end_active_gesture();
        self.document
            .layer(layer)
            .and_then(|l| l.keyframe(keyframe))
            .map_err(|e| self.reject(e))?;

        let end_before = self.animation_end();
        self.save_state("Delete Keyframe");
        let removed = self.document.layers[layer].keyframes.remove(keyframe);
        log::debug!("deleted keyframe {keyframe} on layer {layer} at {} ms", removed.time);
        if self.selection.layer == Some(layer) {
            match self.selection.keyframe {
                Some(k) if k == keyframe => self.selection.keyframe = None,
                Some(k) if k > keyframe => self.selection.keyframe = Some(k - 1),
                _ => {}
            }
        }
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(removed)
    }

    /// Remember the selected keyframe's values (not its time) for pasting on another layer.
    pub fn copy_keyframe(&mut self) -> Result<KeyframeValues> {
        let (layer, keyframe) = self.selected_keyframe()?;
        let l = &self.document.layers[layer];
        let values = l.keyframes[keyframe].values();
        self.clipboard = Some(Clipboard {
            values,
            source_layer: l.id.clone(),
        });
        log::debug!("copied keyframe {keyframe} from layer {layer}");
        self.events
            .notice(NoticeLevel::Success, "Keyframe copied");
        Ok(values)
    }

    /// Paste the copied values onto the selected layer at the playhead.
    ///
    /// Rejected when nothing was copied, no layer is selected, or the selected layer is
    /// the one the values were copied from. The clipboard survives a rejection.
    pub fn paste_keyframe(&mut self) -> Result<usize> {
        self.end_active_gesture();
        let Some(clip) = self.clipboard.clone() else {
            return Err(self.reject(EditorError::ClipboardEmpty));
        };
        let layer = self.selected_layer()?;
        if self.document.layers[layer].id == clip.source_layer {
            return Err(self.reject(EditorError::SameLayerPaste));
        }

        let time = self.current_time;
        let end_before = self.animation_end();
        self.save_state("Paste Keyframe");
        let threshold = self.config.merge_threshold_ms;
        let up = upsert_by_time(
            &mut self.document.layers[layer].keyframes,
            time,
            threshold,
            Keyframe::from_values(time, clip.values),
            |existing, new| *existing = new,
        );
        log::debug!("pasted keyframe onto layer {layer} at {time} ms (merged: {})", up.merged);
        self.selection.keyframe = Some(up.index);
        self.selection.background_keyframe = None;
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(up.index)
    }

    /// Change the easing used from this keyframe to the next.
    pub fn set_keyframe_easing(&mut self, layer: usize, keyframe: usize, easing: Easing) -> Result<()> {
        self.end_active_gesture();
        let current = self
            .document
            .layer(layer)
            .and_then(|l| l.keyframe(keyframe))
            .map(|k| k.easing)
            .map_err(|e| self.reject(e))?;
        if current == easing {
            return Ok(());
        }
        self.save_state("Change Easing");
        self.document.layers[layer].keyframes[keyframe].easing = easing;
        log::debug!("layer {layer} keyframe {keyframe} easing -> {easing}");
        Ok(())
    }

    /// Properties-panel commit: write `props` to the selected layer at the playhead.
    pub fn set_layer_properties(&mut self, props: LayerProperties) -> Result<usize> {
        self.end_active_gesture();
        let layer = self.selected_layer()?;
        let end_before = self.animation_end();
        self.save_state("Update Properties");
        let index = self.write_at_current_time(layer, props);
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(index)
    }

    /// Update-or-insert at the playhead without touching history.
    ///
    /// An existing keyframe keeps its easing; a new one is linear. The selection moves
    /// to the affected keyframe.
    pub(super) fn write_at_current_time(&mut self, layer: usize, props: LayerProperties) -> usize {
        let time = self.current_time;
        let threshold = self.config.merge_threshold_ms;
        let up = upsert_by_time(
            &mut self.document.layers[layer].keyframes,
            time,
            threshold,
            Keyframe::from_values(time, KeyframeValues::from_properties(props, Easing::Linear)),
            |existing, new| existing.set_properties(new.properties()),
        );
        self.selection.layer = Some(layer);
        self.selection.keyframe = Some(up.index);
        self.selection.background_keyframe = None;
        up.index
    }
}
