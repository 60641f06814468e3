use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Runtime settings for one range session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Radius of the marker drawn for each shot, in surface units.
    pub marker_radius: f64,
    pub debug_mode: bool,
    pub use_red_laser_sound: bool,
    pub red_laser_sound: PathBuf,
    pub use_green_laser_sound: bool,
    pub green_laser_sound: PathBuf,
    /// Shots within this distance of the previous shot are duplicate
    /// candidates.
    pub dedupe_distance: f64,
    /// Frame window within which a nearby shot counts as a duplicate.
    pub dedupe_frame_window: u64,
    pub use_malfunctions: bool,
    /// Probability in [0, 1] that an admitted shot is turned into a simulated
    /// malfunction.
    pub malfunction_probability: f32,
    pub use_virtual_magazine: bool,
    pub virtual_magazine_capacity: u32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            marker_radius: 2.0,
            debug_mode: false,
            use_red_laser_sound: false,
            red_laser_sound: PathBuf::from("sounds/walther_ppq.wav"),
            use_green_laser_sound: false,
            green_laser_sound: PathBuf::from("sounds/walther_ppq.wav"),
            dedupe_distance: 10.0,
            dedupe_frame_window: 2,
            use_malfunctions: false,
            malfunction_probability: 0.1,
            use_virtual_magazine: false,
            virtual_magazine_capacity: 7,
        }
    }
}

impl RangeConfig {
    /// Load settings from a JSON file. A missing file yields defaults; a
    /// malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No range config found at {}. Using defaults.", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded range config from {}", path.display());
        Ok(config)
    }
}
