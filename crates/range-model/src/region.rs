use crate::geometry::Bounds;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stroke color applied to shape regions of the selected target group.
pub const SELECTED_STROKE: Rgba<u8> = Rgba([255, 215, 0, 255]);

/// Stroke color for shape regions of unselected targets.
pub const UNSELECTED_STROKE: Rgba<u8> = Rgba([0, 0, 0, 255]);

static NEXT_REGION_ID: AtomicU64 = AtomicU64::new(1);

/// An individually hit-testable sub-area of a target face.
///
/// Every region carries a string tag map; the `command` tag encodes the
/// sub-commands run when the region is struck, the `name` tag makes the
/// region addressable from other regions' commands.
#[derive(Debug, Clone)]
pub struct Region {
    id: u64,
    tags: HashMap<String, String>,
    kind: RegionKind,
}

#[derive(Debug, Clone)]
pub enum RegionKind {
    Shape(ShapeRegion),
    Image(ImageRegion),
}

impl Region {
    pub fn shape(outline: Vec<(f64, f64)>) -> Self {
        Self {
            id: NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed),
            tags: HashMap::new(),
            kind: RegionKind::Shape(ShapeRegion::new(outline)),
        }
    }

    pub fn image(x: f64, y: f64, width: f64, height: f64, frames: Vec<RgbaImage>) -> Self {
        Self {
            id: NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed),
            tags: HashMap::new(),
            kind: RegionKind::Image(ImageRegion::new(x, y, width, height, frames)),
        }
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    /// Process-unique identifier, used to key the resolver's resize cache.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &RegionKind {
        &self.kind
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    pub fn name(&self) -> Option<&str> {
        self.tag("name")
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, RegionKind::Image(_))
    }

    pub fn as_image(&self) -> Option<&ImageRegion> {
        match &self.kind {
            RegionKind::Image(region) => Some(region),
            RegionKind::Shape(_) => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageRegion> {
        match &mut self.kind {
            RegionKind::Image(region) => Some(region),
            RegionKind::Shape(_) => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeRegion> {
        match &mut self.kind {
            RegionKind::Shape(region) => Some(region),
            RegionKind::Image(_) => None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match &self.kind {
            RegionKind::Shape(region) => region.bounds(),
            RegionKind::Image(region) => region.bounds(),
        }
    }
}

/// Closed 2D outline. Treated as fully opaque within its bounds for hit
/// testing; the stroke color reflects target selection state.
#[derive(Debug, Clone)]
pub struct ShapeRegion {
    outline: Vec<(f64, f64)>,
    stroke: Rgba<u8>,
}

impl ShapeRegion {
    pub fn new(outline: Vec<(f64, f64)>) -> Self {
        Self {
            outline,
            stroke: UNSELECTED_STROKE,
        }
    }

    pub fn outline(&self) -> &[(f64, f64)] {
        &self.outline
    }

    pub fn stroke(&self) -> Rgba<u8> {
        self.stroke
    }

    pub fn set_stroke(&mut self, stroke: Rgba<u8>) {
        self.stroke = stroke;
    }

    pub fn bounds(&self) -> Bounds {
        let mut points = self.outline.iter();
        let Some(&(first_x, first_y)) = points.next() else {
            return Bounds::new(0.0, 0.0, 0.0, 0.0);
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Rectangular region backed by an ordered animation frame sequence. The
/// display size may differ from the frames' native size; hit testing must
/// use the displayed size.
#[derive(Debug, Clone)]
pub struct ImageRegion {
    x: f64,
    y: f64,
    display_width: f64,
    display_height: f64,
    frames: Vec<RgbaImage>,
    current: usize,
    reversed: bool,
}

impl ImageRegion {
    pub fn new(x: f64, y: f64, display_width: f64, display_height: f64, frames: Vec<RgbaImage>) -> Self {
        Self {
            x,
            y,
            display_width,
            display_height,
            frames,
            current: 0,
            reversed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.display_width, self.display_height)
    }

    /// The frame currently on screen, or `None` for a region with no decoded
    /// frame data.
    pub fn current_frame(&self) -> Option<&RgbaImage> {
        self.frames.get(self.current)
    }

    pub fn frame_index(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Native pixel size of the decoded frames, before any display scaling.
    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.current_frame().map(|f| (f.width(), f.height()))
    }

    pub fn display_size(&self) -> (f64, f64) {
        (self.display_width, self.display_height)
    }

    pub fn on_first_frame(&self) -> bool {
        self.current == 0
    }

    /// Advance the animation by one frame in the current playback direction.
    /// A first argument of `"true"` wraps around instead of stopping at the
    /// end of the sequence.
    pub fn advance(&mut self, args: &[String]) {
        if self.frames.is_empty() {
            return;
        }
        let looped = args.first().map(|a| a == "true").unwrap_or(false);
        let last = self.frames.len() - 1;
        if self.reversed {
            if self.current > 0 {
                self.current -= 1;
            } else if looped {
                self.current = last;
            }
        } else if self.current < last {
            self.current += 1;
        } else if looped {
            self.current = 0;
        }
    }

    /// Flip playback direction, so subsequent advances walk back toward the
    /// first frame from the current one.
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Restore the animation to its initial frame and forward playback.
    pub fn reset(&mut self) {
        self.current = 0;
        self.reversed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<RgbaImage> {
        (0..n)
            .map(|i| RgbaImage::from_pixel(4, 4, Rgba([i as u8, 0, 0, 255])))
            .collect()
    }

    #[test]
    fn test_advance_clamps_without_loop() {
        let mut region = ImageRegion::new(0.0, 0.0, 4.0, 4.0, frames(3));
        region.advance(&[]);
        region.advance(&[]);
        region.advance(&[]);
        assert_eq!(region.frame_index(), 2);
    }

    #[test]
    fn test_advance_wraps_with_loop() {
        let mut region = ImageRegion::new(0.0, 0.0, 4.0, 4.0, frames(2));
        let looped = vec!["true".to_string()];
        region.advance(&looped);
        region.advance(&looped);
        assert_eq!(region.frame_index(), 0);
    }

    #[test]
    fn test_reverse_walks_back() {
        let mut region = ImageRegion::new(0.0, 0.0, 4.0, 4.0, frames(3));
        region.advance(&[]);
        region.advance(&[]);
        region.reverse();
        region.advance(&[]);
        assert_eq!(region.frame_index(), 1);
        assert!(!region.on_first_frame());
        region.reset();
        assert!(region.on_first_frame());
    }

    #[test]
    fn test_shape_bounds_from_outline() {
        let region = Region::shape(vec![(10.0, 5.0), (30.0, 5.0), (20.0, 25.0)]);
        assert_eq!(region.bounds(), Bounds::new(10.0, 5.0, 20.0, 20.0));
    }

    #[test]
    fn test_tags() {
        let region = Region::shape(vec![(0.0, 0.0), (1.0, 1.0)])
            .with_tag("name", "plate_1")
            .with_tag("command", "reset");
        assert!(region.tag_exists("command"));
        assert_eq!(region.name(), Some("plate_1"));
        assert_eq!(region.tag("points"), None);
    }

    #[test]
    fn test_region_ids_unique() {
        let a = Region::shape(vec![(0.0, 0.0)]);
        let b = Region::shape(vec![(0.0, 0.0)]);
        assert_ne!(a.id(), b.id());
    }
}
