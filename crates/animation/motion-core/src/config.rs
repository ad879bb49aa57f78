//! Core configuration for motion-core.

use serde::{Deserialize, Serialize};

use crate::data::Settings;

/// Two keyframes closer than this (in ms) are treated as the same keyframe on insert.
pub const KEYFRAME_MERGE_THRESHOLD_MS: f64 = 100.0;

/// With smooth playback off, sampling within this window (in ms) of a keyframe returns it verbatim.
pub const SNAP_THRESHOLD_MS: f64 = 100.0;

/// Undo stack depth before the oldest entries are evicted.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Pending UI events kept between drains before the oldest are dropped.
pub const DEFAULT_MAX_PENDING_EVENTS: usize = 1024;

/// Maximum layer name length, counted in characters after trimming.
pub const MAX_LAYER_NAME_LEN: usize = 50;

/// Scene background when the document has no background keyframes.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#2c3e50";

/// Growth rule for the editable workspace duration.
///
/// When the animation end comes within `headroom_ms` of the workspace end, the workspace
/// grows to `animation_end + headroom_ms` rounded up to the next multiple of `step_ms`,
/// clamped to `[min_ms, max_ms]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkspacePolicy {
    pub headroom_ms: f64,
    pub step_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Default for WorkspacePolicy {
    fn default() -> Self {
        Self {
            headroom_ms: 1000.0,
            step_ms: 5000.0,
            min_ms: 5000.0,
            max_ms: 60000.0,
        }
    }
}

/// Configuration for an editing session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of undo entries retained.
    pub max_history: usize,
    /// Keyframe merge-on-insert window, shared by layer and background keyframes.
    pub merge_threshold_ms: f64,
    /// Exact-match snap window used by the sampler when smooth playback is off.
    pub snap_threshold_ms: f64,
    pub workspace: WorkspacePolicy,
    pub max_layer_name_len: usize,
    /// Bound on events queued for the host between `drain_events` calls.
    #[serde(default = "default_max_pending_events")]
    pub max_pending_events: usize,
    /// Settings applied to documents created by `new_project`.
    pub default_settings: Settings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            merge_threshold_ms: KEYFRAME_MERGE_THRESHOLD_MS,
            snap_threshold_ms: SNAP_THRESHOLD_MS,
            workspace: WorkspacePolicy::default(),
            max_layer_name_len: MAX_LAYER_NAME_LEN,
            max_pending_events: DEFAULT_MAX_PENDING_EVENTS,
            default_settings: Settings::default(),
        }
    }
}

fn default_max_pending_events() -> usize {
    DEFAULT_MAX_PENDING_EVENTS
}
