//! Easing curves and interpolation helpers.
//!
//! Easing is a closed set of named curves; unknown names resolve to linear.
//! Blending is plain component-wise lerp; rotation is not angle-wrapped.

pub mod easing;
pub mod functions;

pub use easing::{ease, Easing};
