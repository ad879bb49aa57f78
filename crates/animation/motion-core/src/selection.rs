//! Transient selection state, captured in history snapshots but never persisted.

use serde::{Deserialize, Serialize};

use crate::data::Document;

/// What the user has selected.
///
/// A keyframe selection is only meaningful together with a layer. Selecting a
/// background keyframe clears the keyframe selection and vice versa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub layer: Option<usize>,
    pub keyframe: Option<usize>,
    pub background_keyframe: Option<usize>,
}

impl Selection {
    pub fn layer_keyframe(layer: usize, keyframe: Option<usize>) -> Self {
        Self {
            layer: Some(layer),
            keyframe,
            background_keyframe: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layer.is_none() && self.keyframe.is_none() && self.background_keyframe.is_none()
    }

    /// Keep tracking the same logical layer after `removed` was deleted.
    pub(crate) fn on_layer_removed(&mut self, removed: usize) {
        match self.layer {
            Some(sel) if sel == removed => {
                self.layer = None;
                self.keyframe = None;
            }
            Some(sel) if sel > removed => self.layer = Some(sel - 1),
            _ => {}
        }
    }

    /// Keep tracking the same logical layer after a move from `from` to `to`.
    pub(crate) fn on_layer_moved(&mut self, from: usize, to: usize) {
        if let Some(sel) = self.layer {
            self.layer = Some(index_after_move(sel, from, to));
        }
    }
}

/// Where the item at `index` ends up after the item at `from` is moved to `to`.
pub(crate) fn index_after_move(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < index && index <= to {
        index - 1
    } else if to <= index && index < from {
        index + 1
    } else {
        index
    }
}

/// Drop any index that no longer refers to something in `doc`.
pub fn clamp_selection(doc: &Document, sel: Selection) -> Selection {
    let mut out = sel;
    match out.layer {
        Some(i) if i >= doc.layers.len() => {
            log::warn!(
                "selected layer {i} out of range ({} layers), clearing",
                doc.layers.len()
            );
            out.layer = None;
            out.keyframe = None;
        }
        None => out.keyframe = None,
        Some(_) => {}
    }
    if let (Some(l), Some(k)) = (out.layer, out.keyframe) {
        let len = doc.layers[l].keyframes.len();
        if k >= len {
            log::warn!("selected keyframe {k} out of range ({len} keyframes), clearing");
            out.keyframe = None;
        }
    }
    if let Some(b) = out.background_keyframe {
        if b >= doc.background_keyframes.len() {
            log::warn!("selected background keyframe {b} out of range, clearing");
            out.background_keyframe = None;
        }
    }
    out
}
