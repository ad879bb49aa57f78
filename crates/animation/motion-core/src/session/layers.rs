//! Layer operations: add, delete, duplicate, reorder, rename and visibility.

use super::EditorSession;
use crate::data::{ImageHandle, Layer};
use crate::error::NameError;
use crate::ids::LayerId;
use crate::outputs::NoticeLevel;
use crate::selection::Selection;
use crate::Result;

const COPY_SUFFIX: &str = " (Copy)";

/// Trim `name` and check it against the length limit (counted in characters).
pub fn validate_layer_name(name: &str, max: usize) -> std::result::Result<String, NameError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(NameError::Empty);
    }
    if len > max {
        return Err(NameError::TooLong { len, max });
    }
    Ok(trimmed.to_string())
}

/// `"<name> (Copy)"`, shortening `name` so the result stays within `max` characters.
fn copy_name(name: &str, max: usize) -> String {
    let suffix_len = COPY_SUFFIX.chars().count();
    let keep = max.saturating_sub(suffix_len);
    let base: String = name.chars().take(keep).collect();
    format!("{}{COPY_SUFFIX}", base.trim_end())
}

impl EditorSession {
    /// Append a layer with one identity keyframe at time 0, centered on the canvas.
    ///
    /// Selects the new layer and its keyframe and moves the playhead to 0.
    pub fn add_layer(
        &mut self,
        name: &str,
        image_url: &str,
        image: Option<ImageHandle>,
    ) -> Result<usize> {
        self.end_active_gesture();
        let name = validate_layer_name(name, self.config.max_layer_name_len)
            .map_err(|e| self.reject(e.into()))?;

        let end_before = self.animation_end();
        self.save_state("Add Layer");
        let (cx, cy) = self.document.canvas_center();
        self.document
            .layers
            .push(Layer::new(name, image_url, image, cx, cy));
        let index = self.document.layers.len() - 1;
        log::debug!("added layer {index} ({})", self.document.layers[index].id);
        self.selection = Selection::layer_keyframe(index, Some(0));
        self.current_time = 0.0;
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(index)
    }

    /// Remove a layer. A later selected layer keeps being tracked; deleting the selected
    /// layer clears the layer and keyframe selection.
    pub fn delete_layer(&mut self, index: usize) -> Result<Layer> {
        self.end_active_gesture();
        self.document.layer(index).map_err(|e| self.reject(e))?;

        let end_before = self.animation_end();
        self.save_state("Delete Layer");
        let removed = self.document.layers.remove(index);
        log::debug!("deleted layer {index} ({})", removed.id);
        self.selection.on_layer_removed(index);
        self.refresh_duration(end_before);
        self.emit_selection();
        Ok(removed)
    }

    /// Copy a layer with all its keyframes right after the source.
    ///
    /// The copy gets a new id and is visible; its image handle is shared with the
    /// source. Selects the copy's first keyframe and moves the playhead to it.
    pub fn duplicate_layer(&mut self, index: usize) -> Result<usize> {
        self.end_active_gesture();
        let source = self.document.layer(index).map_err(|e| self.reject(e))?;
        let mut copy = source.clone();
        copy.id = LayerId::generate();
        copy.name = copy_name(&source.name, self.config.max_layer_name_len);
        copy.visible = true;
        let first = copy.keyframes.first().map(|k| k.time);
        let count = copy.keyframes.len();

        let end_before = self.animation_end();
        self.save_state("Duplicate Layer");
        let at = index + 1;
        self.document.layers.insert(at, copy);
        log::debug!("duplicated layer {index} -> {at} ({count} keyframes)");
        self.selection = Selection::layer_keyframe(at, first.map(|_| 0));
        if let Some(t) = first {
            self.current_time = t;
        }
        self.refresh_duration(end_before);
        self.emit_selection();
        self.events.notice(
            NoticeLevel::Success,
            format!("Layer duplicated with {count} keyframes"),
        );
        Ok(at)
    }

    /// Move a layer from `from` to `to` in z-order. The selection follows the same
    /// logical layer. Moving onto itself does nothing.
    pub fn reorder_layer(&mut self, from: usize, to: usize) -> Result<()> {
        self.end_active_gesture();
        self.document.layer(from).map_err(|e| self.reject(e))?;
        self.document.layer(to).map_err(|e| self.reject(e))?;
        if from == to {
            return Ok(());
        }

        self.save_state("Reorder Layers");
        let layer = self.document.layers.remove(from);
        self.document.layers.insert(to, layer);
        self.selection.on_layer_moved(from, to);
        log::debug!("moved layer {from} -> {to}");
        self.emit_selection();
        Ok(())
    }

    /// Rename a layer. Returns `Ok(false)` when the trimmed name is unchanged.
    ///
    /// Renames are not recorded in history and leave the selection alone.
    pub fn rename_layer(&mut self, index: usize, name: &str) -> Result<bool> {
        self.end_active_gesture();
        let current = &self.document.layer(index).map_err(|e| self.reject(e))?.name;
        let name = validate_layer_name(name, self.config.max_layer_name_len)
            .map_err(|e| self.reject(e.into()))?;
        if *current == name {
            return Ok(false);
        }
        log::debug!("renamed layer {index} to '{name}'");
        self.document.layers[index].name = name;
        Ok(true)
    }

    /// Flip a layer's visibility, returning the new state.
    pub fn toggle_layer_visibility(&mut self, index: usize) -> Result<bool> {
        self.end_active_gesture();
        self.document.layer(index).map_err(|e| self.reject(e))?;
        self.save_state("Toggle Visibility");
        let layer = &mut self.document.layers[index];
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }
}
