//! Read-only sampling of layer transforms and the background color timeline.
//!
//! Model:
//! - Keyframes are sorted ascending by time (ms).
//! - Segment [Ki -> K(i+1)] is shaped by `Ki.easing`; the last keyframe's easing is unused.
//! - Before the first / after the last keyframe the boundary keyframe holds.
//! - `visible` is a step function taken from the left keyframe.
//! - Background colors blend per channel in byte space with no easing and no snapping.

use crate::color::{Rgb, FALLBACK_RGB};
use crate::config::SNAP_THRESHOLD_MS;
use crate::data::{Document, Keyframe, Layer, LayerProperties, Timed};
use crate::interp::functions::lerp_transform;

/// Locate the segment containing `time` and return `(i, j, local_t)`.
///
/// `i == j` means `items[i]` should be used verbatim: `time` is outside the keyframe
/// range or lands exactly on a keyframe. Otherwise the first adjacent pair with
/// `items[i].time <= time <= items[i+1].time` wins.
fn find_segment<T: Timed>(items: &[T], time: f64) -> (usize, usize, f64) {
    let n = items.len();
    if n <= 1 || time <= items[0].time() {
        return (0, 0, 0.0);
    }
    if time >= items[n - 1].time() {
        return (n - 1, n - 1, 0.0);
    }
    for i in 0..(n - 1) {
        let t0 = items[i].time();
        let t1 = items[i + 1].time();
        if time == t1 {
            return (i + 1, i + 1, 0.0);
        }
        if t0 <= time && time < t1 {
            let span = t1 - t0;
            if span <= 0.0 {
                return (i, i, 0.0);
            }
            return (i, i + 1, (time - t0) / span);
        }
    }
    (n - 1, n - 1, 0.0)
}

/// Sample a layer at `time` using the default snap window.
///
/// Returns `None` when the layer has no keyframes (nothing to draw).
#[inline]
pub fn sample_layer(layer: &Layer, time: f64, smooth: bool) -> Option<LayerProperties> {
    let snap = if smooth {
        None
    } else {
        Some(SNAP_THRESHOLD_MS)
    };
    sample_keyframes(&layer.keyframes, time, snap)
}

/// Sample a keyframe sequence at `time`.
///
/// With `snap = Some(window)`, a keyframe strictly within `window` ms of `time` is
/// returned verbatim. `None` always interpolates.
pub fn sample_keyframes(
    keyframes: &[Keyframe],
    time: f64,
    snap: Option<f64>,
) -> Option<LayerProperties> {
    match keyframes {
        [] => None,
        [only] => Some(only.properties()),
        _ => {
            if let Some(window) = snap {
                if let Some(hit) = keyframes.iter().find(|k| (k.time - time).abs() < window) {
                    return Some(hit.properties());
                }
            }
            let (i, j, local) = find_segment(keyframes, time);
            if i == j {
                return Some(keyframes[i].properties());
            }
            let prev = &keyframes[i];
            let next = &keyframes[j];
            let eased = prev.easing.apply(local);
            Some(lerp_transform(&prev.properties(), &next.properties(), eased))
        }
    }
}

/// Scene background color at `time`.
///
/// Zero background keyframes yield the document's static background color. Colors
/// that fail to parse are replaced with `#2c3e50`.
pub fn sample_background_color(doc: &Document, time: f64) -> Rgb {
    let keys = &doc.background_keyframes;
    match keys.as_slice() {
        [] => parse_or_fallback(&doc.settings.background_color),
        [only] => parse_or_fallback(&only.color),
        _ => {
            let (i, j, local) = find_segment(keys, time);
            let a = parse_or_fallback(&keys[i].color);
            if i == j {
                return a;
            }
            let b = parse_or_fallback(&keys[j].color);
            a.lerp(b, local)
        }
    }
}

fn parse_or_fallback(s: &str) -> Rgb {
    Rgb::parse_hex(s).unwrap_or_else(|| {
        log::warn!("unparsable background color '{s}', using {FALLBACK_RGB}");
        FALLBACK_RGB
    })
}

/// Nearest keyframes strictly before and strictly after `time` (onion skin).
pub fn neighbor_keyframes(layer: &Layer, time: f64) -> (Option<&Keyframe>, Option<&Keyframe>) {
    let before = layer.keyframes.iter().rev().find(|k| k.time < time);
    let after = layer.keyframes.iter().find(|k| k.time > time);
    (before, after)
}

/// Evenly spaced `(x, y)` positions from the first to the last keyframe, both ends
/// included (`samples + 1` points). Layers with fewer than two keyframes have no path.
pub fn sample_motion_path(layer: &Layer, samples: usize, smooth: bool) -> Vec<(f64, f64)> {
    let (first, last) = match (layer.keyframes.first(), layer.keyframes.last()) {
        (Some(f), Some(l)) if layer.keyframes.len() >= 2 => (f.time, l.time),
        _ => return Vec::new(),
    };
    let steps = samples.max(1);
    (0..=steps)
        .filter_map(|i| {
            let t = first + (last - first) * (i as f64 / steps as f64);
            sample_layer(layer, t, smooth).map(|p| (p.x, p.y))
        })
        .collect()
}
