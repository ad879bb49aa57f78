//! Motion Core (engine-agnostic)
//!
//! Animation-state engine for a layered, keyframe-based 2D motion editor. This crate
//! owns the document model, the numeric semantics (easing, interpolation, color
//! blending), the time/duration model and undo/redo. Rendering, image loading,
//! pointer handling and persistence transport live in the host.
//!
//! Hosts drive an [`EditorSession`]: sample it once per animation tick, call its
//! operations from input handlers, and drain [`EditorEvent`]s to refresh the UI.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod history;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod sampling;
pub mod selection;
pub mod session;
pub mod stored_project;
pub mod timeline;

// Re-exports for hosts
pub use color::Rgb;
pub use config::{EditorConfig, WorkspacePolicy};
pub use data::{
    BackgroundKeyframe, Document, ImageHandle, Keyframe, KeyframeValues, Layer, LayerProperties,
    Settings,
};
pub use error::{EditorError, NameError};
pub use history::{History, HistorySnapshot, HistoryStep};
pub use ids::LayerId;
pub use interp::{ease, Easing};
pub use outputs::{EditorEvent, NoticeLevel};
pub use sampling::{
    neighbor_keyframes, sample_background_color, sample_layer, sample_motion_path,
};
pub use selection::{clamp_selection, Selection};
pub use session::{Clipboard, EditorSession, GestureKind};
pub use stored_project::{parse_project_json, to_project_json, ImageResolver, NoImages};
pub use timeline::{
    advance_playback, compute_animation_end, progress_to_time, recompute_workspace_duration,
    time_to_progress, PlaybackStep,
};

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
