//! Interpolation helpers:
//! - lerp_f64 (scalar)
//! - lerp_transform (component-wise over a layer transform)

use crate::data::LayerProperties;

/// Linear interpolation of scalars. `t` is not clamped, so overshooting easings
/// extrapolate past either end.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Component-wise blend of position, scale and rotation. Visibility is a step
/// function and is taken from `a`.
#[inline]
pub fn lerp_transform(a: &LayerProperties, b: &LayerProperties, t: f64) -> LayerProperties {
    LayerProperties {
        x: lerp_f64(a.x, b.x, t),
        y: lerp_f64(a.y, b.y, t),
        scale_x: lerp_f64(a.scale_x, b.scale_x, t),
        scale_y: lerp_f64(a.scale_y, b.scale_y, t),
        rotation: lerp_f64(a.rotation, b.rotation, t),
        visible: a.visible,
    }
}
