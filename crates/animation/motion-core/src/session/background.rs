//! Background color timeline and the static default background.

use super::{check_time, EditorSession};
use crate::color::normalize_hex;
use crate::data::{find_near, upsert_by_time, BackgroundKeyframe};
use crate::error::EditorError;
use crate::Result;

impl EditorSession {
    /// Set the background color at `time`, updating a keyframe within the merge
    /// threshold or inserting a new one. Colors are stored as lowercase `#rrggbb`.
    ///
    /// The selection is not moved, but a selected background keyframe keeps pointing
    /// at the same keyframe. Returns the index of the affected keyframe.
    pub fn set_background_keyframe(&mut self, time: f64, color: &str) -> Result<usize> {
        self.end_active_gesture();
        check_time(time).map_err(|e| self.reject(e))?;
        let color = normalize_hex(color).map_err(|e| self.reject(e))?;

        let threshold = self.config.merge_threshold_ms;
        let selected_time = self
            .selection
            .background_keyframe
            .and_then(|i| self.document.background_keyframes.get(i))
            .map(|k| k.time);
        let existing = find_near(&self.document.background_keyframes, time, threshold);
        self.save_state(if existing.is_some() {
            "Update Background Keyframe"
        } else {
            "Create Background Keyframe"
        });
        let up = upsert_by_time(
            &mut self.document.background_keyframes,
            time,
            threshold,
            BackgroundKeyframe {
                time,
                color: color.clone(),
            },
            |existing, new| existing.color = new.color,
        );
        log::debug!("background keyframe {} at {time} ms -> {color}", up.index);

        // A selected keyframe that was merged away follows the one that absorbed it.
        if let (Some(sel), Some(t)) = (self.selection.background_keyframe, selected_time) {
            let keys = &self.document.background_keyframes;
            let remapped = if Some(sel) == existing || (t - time).abs() < threshold {
                up.index
            } else {
                keys.partition_point(|k| k.time < t)
            };
            if remapped != sel {
                self.selection.background_keyframe = Some(remapped);
                self.emit_selection();
            }
        }
        Ok(up.index)
    }

    /// Delete a background keyframe. Deleting the only one is rejected.
    pub fn delete_background_keyframe(&mut self, index: usize) -> Result<BackgroundKeyframe> {
        self.end_active_gesture();
        let len = self.document.background_keyframes.len();
        if index >= len {
            return Err(self.reject(EditorError::BackgroundKeyframeOutOfRange { index, len }));
        }
        if len == 1 {
            return Err(self.reject(EditorError::SoleBackgroundKeyframe));
        }

        self.save_state("Delete Background Keyframe");
        let removed = self.document.background_keyframes.remove(index);
        log::debug!("deleted background keyframe {index} at {} ms", removed.time);
        match self.selection.background_keyframe {
            Some(b) if b == index => self.selection.background_keyframe = None,
            Some(b) if b > index => self.selection.background_keyframe = Some(b - 1),
            _ => {}
        }
        self.emit_selection();
        Ok(removed)
    }

    /// Delete the selected background keyframe.
    pub fn delete_selected_background_keyframe(&mut self) -> Result<BackgroundKeyframe> {
        self.end_active_gesture();
        match self.selection.background_keyframe {
            Some(index) => self.delete_background_keyframe(index),
            None => Err(self.reject(EditorError::NoKeyframeSelected)),
        }
    }

    /// Change the static background used when there are no background keyframes.
    pub fn set_default_background_color(&mut self, color: &str) -> Result<()> {
        self.end_active_gesture();
        let color = normalize_hex(color).map_err(|e| self.reject(e))?;
        if self.document.settings.background_color == color {
            return Ok(());
        }
        self.save_state("Change Background Color");
        log::debug!("default background -> {color}");
        self.document.settings.background_color = color;
        Ok(())
    }
}
