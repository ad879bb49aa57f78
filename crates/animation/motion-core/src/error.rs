//! Error types for editor operations.
//!
//! Every condition here is recoverable: an operation that returns `Err` leaves the
//! document, selection and history exactly as they were.

use thiserror::Error;

/// Why a layer name was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Layer name cannot be empty")]
    Empty,
    #[error("Layer name too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },
}

/// Error type for document operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EditorError {
    #[error(transparent)]
    InvalidName(#[from] NameError),

    #[error("Cannot delete the only background keyframe")]
    SoleBackgroundKeyframe,

    #[error("Cannot paste on the same layer - select a different layer")]
    SameLayerPaste,

    #[error("No keyframe copied yet")]
    ClipboardEmpty,

    #[error("No layer selected")]
    NoLayerSelected,

    #[error("No keyframe selected")]
    NoKeyframeSelected,

    #[error("Layer index {index} out of range ({len} layers)")]
    LayerOutOfRange { index: usize, len: usize },

    #[error("Keyframe index {index} out of range ({len} keyframes)")]
    KeyframeOutOfRange { index: usize, len: usize },

    #[error("Background keyframe index {index} out of range ({len} keyframes)")]
    BackgroundKeyframeOutOfRange { index: usize, len: usize },

    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    #[error("Invalid time value: {time}")]
    InvalidTime { time: f64 },

    #[error("No gesture in progress")]
    NoActiveGesture,

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl EditorError {
    /// Short category label for UI routing and logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidName(_) | Self::InvalidColor { .. } | Self::InvalidTime { .. } => {
                "validation"
            }
            Self::SoleBackgroundKeyframe | Self::SameLayerPaste | Self::ClipboardEmpty => {
                "rejected"
            }
            Self::NoLayerSelected | Self::NoKeyframeSelected | Self::NoActiveGesture => {
                "selection"
            }
            Self::LayerOutOfRange { .. }
            | Self::KeyframeOutOfRange { .. }
            | Self::BackgroundKeyframeOutOfRange { .. } => "index",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
