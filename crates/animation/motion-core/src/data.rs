//! Document data model: layers, keyframes, background keyframes and settings.
//!
//! Serialized shape is the camelCase document used by the persistence layer.
//! Layer image handles are never serialized.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_BACKGROUND_COLOR;
use crate::error::EditorError;
use crate::ids::LayerId;
use crate::interp::Easing;

fn default_true() -> bool {
    true
}

fn default_opacity() -> u8 {
    255
}

/// Opaque, already-loaded image owned by the host's image loader.
///
/// The core never inspects it. Clones share the same allocation, so document
/// snapshots carry images by reference.
#[derive(Clone)]
pub struct ImageHandle(Arc<dyn Any + Send + Sync>);

impl ImageHandle {
    pub fn new<T: Any + Send + Sync>(image: T) -> Self {
        Self(Arc::new(image))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True when both handles point at the same loaded image.
    #[inline]
    pub fn ptr_eq(&self, other: &ImageHandle) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImageHandle(..)")
    }
}

/// Canvas and timeline settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Static background used when there are no background keyframes.
    pub background_color: String,
    /// Editable workspace length in milliseconds.
    pub duration: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 30,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            duration: 5000.0,
        }
    }
}

/// Transform of a layer at some instant, as produced by sampling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProperties {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees, unbounded.
    pub rotation: f64,
    pub visible: bool,
}

impl LayerProperties {
    pub fn identity_at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            visible: true,
        }
    }
}

/// Everything a keyframe holds except its time. Used for copy/paste and explicit adds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeValues {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub visible: bool,
    pub easing: Easing,
}

impl KeyframeValues {
    pub fn from_properties(props: LayerProperties, easing: Easing) -> Self {
        Self {
            x: props.x,
            y: props.y,
            scale_x: props.scale_x,
            scale_y: props.scale_y,
            rotation: props.rotation,
            visible: props.visible,
            easing,
        }
    }
}

/// A point on a layer's timeline. `easing` shapes the segment to the next keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Milliseconds, >= 0.
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    pub fn from_values(time: f64, v: KeyframeValues) -> Self {
        Self {
            time,
            x: v.x,
            y: v.y,
            scale_x: v.scale_x,
            scale_y: v.scale_y,
            rotation: v.rotation,
            visible: v.visible,
            easing: v.easing,
        }
    }

    pub fn values(&self) -> KeyframeValues {
        KeyframeValues {
            x: self.x,
            y: self.y,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            rotation: self.rotation,
            visible: self.visible,
            easing: self.easing,
        }
    }

    pub fn properties(&self) -> LayerProperties {
        LayerProperties {
            x: self.x,
            y: self.y,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            rotation: self.rotation,
            visible: self.visible,
        }
    }

    /// Overwrite the transform and visibility, keeping time and easing.
    pub fn set_properties(&mut self, props: LayerProperties) {
        self.x = props.x;
        self.y = props.y;
        self.scale_x = props.scale_x;
        self.scale_y = props.scale_y;
        self.rotation = props.rotation;
        self.visible = props.visible;
    }
}

/// A point on the document-wide background color timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundKeyframe {
    pub time: f64,
    /// Hex RGB, `#rrggbb`.
    pub color: String,
}

/// Anything positioned on a timeline by a millisecond time.
pub trait Timed {
    fn time(&self) -> f64;
    fn set_time(&mut self, time: f64);
}

impl Timed for Keyframe {
    #[inline]
    fn time(&self) -> f64 {
        self.time
    }
    #[inline]
    fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

impl Timed for BackgroundKeyframe {
    #[inline]
    fn time(&self) -> f64 {
        self.time
    }
    #[inline]
    fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

/// Result of a time-keyed upsert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Upsert {
    /// Index of the affected item after sorting.
    pub index: usize,
    /// True when an existing item within the threshold was overwritten.
    pub merged: bool,
}

/// Nearest item strictly closer than `threshold` to `time`. Ties go to the earlier item.
pub fn find_near<T: Timed>(items: &[T], time: f64, threshold: f64) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (i, (item.time() - time).abs()))
        .filter(|&(_, d)| d < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Stable ascending sort by time.
pub fn sort_by_time<T: Timed>(items: &mut [T]) {
    items.sort_by(|a, b| a.time().total_cmp(&b.time()));
}

/// Overwrite the item nearest to `time` within `threshold` via `merge`, or insert `item`.
/// Either way the sequence stays sorted, the affected item ends up at `time` and no
/// other item is left within `threshold` of it.
pub fn upsert_by_time<T: Timed>(
    items: &mut Vec<T>,
    time: f64,
    threshold: f64,
    item: T,
    merge: impl FnOnce(&mut T, T),
) -> Upsert {
    match find_near(items, time, threshold) {
        Some(existing) => {
            merge(&mut items[existing], item);
            items[existing].set_time(time);
            let (kept, removed) = remove_near(items, existing, threshold);
            if removed > 0 {
                log::debug!("merge at {time} ms absorbed {removed} neighbouring item(s)");
            }
            // The overwritten item keeps its slot unless the new time crossed a neighbor.
            let index = settle(items, kept);
            Upsert {
                index,
                merged: true,
            }
        }
        None => {
            let index = items.partition_point(|k| k.time() <= time);
            let mut item = item;
            item.set_time(time);
            items.insert(index, item);
            Upsert {
                index,
                merged: false,
            }
        }
    }
}

/// Remove every item other than `items[keep]` lying within `threshold` of it.
///
/// Returns the kept item's new index and the number of items removed.
pub(crate) fn remove_near<T: Timed>(
    items: &mut Vec<T>,
    keep: usize,
    threshold: f64,
) -> (usize, usize) {
    let time = items[keep].time();
    let before = items.len();
    let mut i = 0;
    let mut removed_before_keep = 0;
    items.retain(|item| {
        let retain = i == keep || (item.time() - time).abs() >= threshold;
        if !retain && i < keep {
            removed_before_keep += 1;
        }
        i += 1;
        retain
    });
    (keep - removed_before_keep, before - items.len())
}

/// Move `items[index]` to its sorted position, returning the new index.
pub(crate) fn settle<T: Timed>(items: &mut Vec<T>, index: usize) -> usize {
    let item = items.remove(index);
    let time = item.time();
    let at = items.partition_point(|k| k.time() <= time);
    items.insert(at, item);
    at
}

/// A keyframed image layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default = "LayerId::generate")]
    pub id: LayerId,
    pub name: String,
    pub image_url: String,
    #[serde(skip)]
    pub image: Option<ImageHandle>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Sorted ascending by time.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl Layer {
    /// New layer with one identity keyframe at time 0, positioned at `(cx, cy)`.
    pub fn new(
        name: impl Into<String>,
        image_url: impl Into<String>,
        image: Option<ImageHandle>,
        cx: f64,
        cy: f64,
    ) -> Self {
        let first = Keyframe::from_values(
            0.0,
            KeyframeValues::from_properties(LayerProperties::identity_at(cx, cy), Easing::Linear),
        );
        Self {
            id: LayerId::generate(),
            name: name.into(),
            image_url: image_url.into(),
            image,
            visible: true,
            opacity: 255,
            keyframes: vec![first],
        }
    }

    pub fn keyframe(&self, index: usize) -> Result<&Keyframe, EditorError> {
        let len = self.keyframes.len();
        self.keyframes
            .get(index)
            .ok_or(EditorError::KeyframeOutOfRange { index, len })
    }

    pub fn keyframe_mut(&mut self, index: usize) -> Result<&mut Keyframe, EditorError> {
        let len = self.keyframes.len();
        self.keyframes
            .get_mut(index)
            .ok_or(EditorError::KeyframeOutOfRange { index, len })
    }

    /// Latest keyframe time, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.keyframes.last().map(|k| k.time)
    }
}

/// The whole editable animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Format marker written by the persistence layer; preserved as-is.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub version: serde_json::Value,
    pub settings: Settings,
    #[serde(default = "default_true")]
    pub loop_enabled: bool,
    #[serde(default)]
    pub smooth_playback: bool,
    /// Z-order: later layers draw on top.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Sorted ascending by time.
    #[serde(default)]
    pub background_keyframes: Vec<BackgroundKeyframe>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Document {
    pub fn new(settings: Settings) -> Self {
        Self {
            version: serde_json::Value::Null,
            settings,
            loop_enabled: true,
            smooth_playback: false,
            layers: Vec::new(),
            background_keyframes: Vec::new(),
        }
    }

    /// Copy for the history stacks. Every value is deep-copied; image handles are
    /// shared with the live document since loaded images are immutable.
    #[inline]
    pub fn snapshot(&self) -> Document {
        self.clone()
    }

    pub fn layer(&self, index: usize) -> Result<&Layer, EditorError> {
        let len = self.layers.len();
        self.layers
            .get(index)
            .ok_or(EditorError::LayerOutOfRange { index, len })
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, EditorError> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(EditorError::LayerOutOfRange { index, len })
    }

    pub fn canvas_center(&self) -> (f64, f64) {
        (
            f64::from(self.settings.width) / 2.0,
            f64::from(self.settings.height) / 2.0,
        )
    }

    pub fn keyframe_count(&self) -> usize {
        self.layers.iter().map(|l| l.keyframes.len()).sum()
    }
}
