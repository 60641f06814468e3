//! Data model for the dry-fire range: shots, target geometry, and the
//! shape/image regions that make up a target face.

pub mod command_tag;
pub mod geometry;
pub mod region;
pub mod shot;
pub mod target;

pub use command_tag::{parse_command_tag, RegionCommand};
pub use geometry::Bounds;
pub use region::{
    ImageRegion, Region, RegionKind, ShapeRegion, SELECTED_STROKE, UNSELECTED_STROKE,
};
pub use shot::{Shot, ShotColor, ShotEntry};
pub use target::{Hit, Target};
