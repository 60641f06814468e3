//! Pixel-accurate hit resolution for the dry-fire range.
//!
//! Given a shot point and the live target list, finds the topmost visually
//! opaque region under the point, alpha-testing image regions against the
//! frame the user actually sees on screen.

mod resolver;

pub use resolver::HitResolver;
