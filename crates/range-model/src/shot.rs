use serde::{Deserialize, Serialize};

/// Laser color detected by the camera. Selects the feedback sound and is
/// carried through to the drawn marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotColor {
    Red,
    Green,
}

/// A detected laser point event. Immutable once created; owned by the canvas
/// that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub color: ShotColor,
    pub x: f64,
    pub y: f64,
    /// Capture frame index at detection time. Monotonically increasing per
    /// camera.
    pub timestamp: u64,
    pub marker_radius: f64,
}

impl Shot {
    pub fn new(color: ShotColor, x: f64, y: f64, timestamp: u64, marker_radius: f64) -> Self {
        Self {
            color,
            x,
            y,
            timestamp,
            marker_radius,
        }
    }
}

/// Row in the externally observable shot log. The canvas clears this log
/// together with its shot list on reset.
#[derive(Debug, Clone)]
pub struct ShotEntry {
    shot: Shot,
}

impl ShotEntry {
    pub fn new(shot: Shot) -> Self {
        Self { shot }
    }

    pub fn shot(&self) -> &Shot {
        &self.shot
    }
}
