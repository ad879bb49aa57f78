//! Time math: animation end, workspace duration, timeline position and playback stepping.
//!
//! Animation end is derived from layer keyframes only; background keyframes never
//! extend it. The workspace duration is the editable timeline length and is kept
//! separate from the animation end.

use crate::config::WorkspacePolicy;
use crate::data::Document;

/// Latest keyframe time across every layer, or 0 when there are none.
pub fn compute_animation_end(doc: &Document) -> f64 {
    doc.layers
        .iter()
        .flat_map(|l| l.keyframes.iter())
        .fold(0.0_f64, |acc, k| if k.time > acc { k.time } else { acc })
}

/// Grow the workspace when the animation end comes within `policy.headroom_ms` of it.
///
/// A non-positive `current` is treated as `policy.min_ms`. The result never drops
/// below `current`.
pub fn recompute_workspace_duration(animation_end: f64, current: f64, policy: &WorkspacePolicy) -> f64 {
    let current = if current > 0.0 { current } else { policy.min_ms };
    if animation_end <= current - policy.headroom_ms {
        return current;
    }
    let step = if policy.step_ms > 0.0 {
        policy.step_ms
    } else {
        policy.min_ms.max(1.0)
    };
    let grown = ((animation_end + policy.headroom_ms) / step).ceil() * step;
    grown.clamp(policy.min_ms, policy.max_ms).max(current)
}

/// Map a time to its normalized position on a workspace of `workspace_ms`.
#[inline]
pub fn time_to_progress(time: f64, workspace_ms: f64) -> f64 {
    if workspace_ms <= 0.0 {
        return 0.0;
    }
    (time / workspace_ms).clamp(0.0, 1.0)
}

/// Inverse of [`time_to_progress`].
#[inline]
pub fn progress_to_time(progress: f64, workspace_ms: f64) -> f64 {
    progress.clamp(0.0, 1.0) * workspace_ms.max(0.0)
}

/// Result of advancing the playhead by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackStep {
    pub time: f64,
    /// Playback reached the end with looping disabled; the host should stop.
    pub finished: bool,
}

/// Advance `current` by `elapsed_ms * speed`.
///
/// Passing the animation end loops back to 0, or clamps to the end and reports
/// `finished` when looping is off.
pub fn advance_playback(
    current: f64,
    elapsed_ms: f64,
    speed: f64,
    animation_end: f64,
    loop_enabled: bool,
) -> PlaybackStep {
    let next = current + elapsed_ms * speed;
    if next > animation_end {
        if loop_enabled {
            PlaybackStep {
                time: 0.0,
                finished: false,
            }
        } else {
            PlaybackStep {
                time: animation_end,
                finished: true,
            }
        }
    } else {
        PlaybackStep {
            time: next.max(0.0),
            finished: false,
        }
    }
}

/// Where playback starts when play is pressed: rewinds to 0 from the end.
#[inline]
pub fn playback_start_time(current: f64, animation_end: f64) -> f64 {
    if current >= animation_end {
        0.0
    } else {
        current
    }
}
