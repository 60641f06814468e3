//! Core of a laser dry-fire shooting range: shot admission, pixel-accurate
//! hit resolution against overlapping animated targets, region command
//! execution, and remapping onto a projector/arena surface.
//!
//! Rendering, camera capture, audio playback, and session persistence are
//! external collaborators behind the traits in [`surface`] and [`session`].

pub mod admission;
pub mod canvas;
mod command;
pub mod config;
pub mod pipeline;
pub mod session;
pub mod surface;

pub use admission::{Admission, AdmissionChain, RejectionKind, ShotProcessor};
pub use canvas::{ArenaLink, Canvas};
pub use config::RangeConfig;
pub use pipeline::{RangePipeline, RangeStatus, ShotEvent};
pub use session::{RecorderHandle, RecordingManager, SessionRecorder};
pub use surface::{AudioPlayer, DrawableSurface, SurfaceSupervisor, TrainingExercise};
