//! Trait seams for the external collaborators the core calls out to. All of
//! them are optional configuration state; absence is normal, not an error.

use range_model::{Region, Shot};
use std::path::Path;

/// The only operations the core performs on the rendering layer.
pub trait DrawableSurface: Send + Sync {
    fn add_marker(&self, shot: &Shot);
    fn remove_marker(&self, shot: &Shot);
    fn set_marker_visible(&self, shot: &Shot, visible: bool);
}

/// Supervises every active surface. Consumed by the `reset` region command.
pub trait SurfaceSupervisor: Send + Sync {
    fn reset_all(&self);
}

/// Fire-and-forget audio cue playback.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, sound: &Path);
}

/// Scoring/training logic listening for resolved shots. Invoked at most once
/// per physical shot.
pub trait TrainingExercise: Send + Sync {
    fn shot_listener(&self, shot: &Shot, hit_region: Option<&Region>);
}
