use image::imageops::{self, FilterType};
use image::RgbaImage;
use range_model::{Bounds, Hit, ImageRegion, RegionKind, Shot, Target};
use std::collections::HashMap;
use tracing::debug;

/// Cache key: region id, animation frame index, display size.
type ResizeKey = (u64, usize, u32, u32);

/// Finds the topmost visually opaque region under a shot point.
///
/// Owns a resize cache so an animated region displayed at a non-native size
/// is resampled once per (region, frame, size) instead of on every shot.
pub struct HitResolver {
    cache: HashMap<ResizeKey, RgbaImage>,
}

impl HitResolver {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Drop all cached resized frames. Called when targets are removed or the
    /// canvas resets, since cached entries are keyed by region identity.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolve a shot against the target list.
    ///
    /// Targets are stored in insertion order, so both the target scan and the
    /// per-target region scan run in reverse: when targets or regions overlap,
    /// the shot must register against whatever is drawn on top. A transparent
    /// image pixel lets the scan fall through to regions beneath it, and a
    /// target whose bounds contain the point but whose regions were all missed
    /// does not stop the scan of lower targets.
    pub fn resolve(&mut self, shot: &Shot, targets: &[Target]) -> Option<Hit> {
        for (target_index, target) in targets.iter().enumerate().rev() {
            let Some(target_bounds) = target.bounds() else {
                continue;
            };
            if !target_bounds.contains(shot.x, shot.y) {
                continue;
            }

            for (region_index, region) in target.regions().iter().enumerate().rev() {
                let region_bounds = region.bounds();
                if !region_bounds.contains(shot.x, shot.y) {
                    continue;
                }

                if let RegionKind::Image(image_region) = region.kind() {
                    if !self.alpha_hit(region.id(), image_region, &region_bounds, shot) {
                        // Transparent pixel: keep testing regions beneath
                        // this one at the same point.
                        continue;
                    }
                }

                debug!(
                    "shot ({}, {}) struck region {} of target {}",
                    shot.x, shot.y, region_index, target_index
                );
                return Some(Hit {
                    target_index,
                    region_index,
                });
            }
        }

        debug!("no hit for shot ({}, {})", shot.x, shot.y);
        None
    }

    /// Alpha-test an image region at the shot point.
    ///
    /// The point is mapped into region-local pixel coordinates; when the
    /// displayed size differs from the native frame size, the current frame
    /// is smoothly resized to the display size before sampling so the test
    /// matches what the user sees. Missing frame data and samples outside the
    /// resized bounds both count as "not struck".
    fn alpha_hit(
        &mut self,
        region_id: u64,
        region: &ImageRegion,
        bounds: &Bounds,
        shot: &Shot,
    ) -> bool {
        let Some((native_width, native_height)) = region.native_size() else {
            return false;
        };

        let display_width = bounds.width.round() as u32;
        let display_height = bounds.height.round() as u32;
        if display_width == 0 || display_height == 0 {
            return false;
        }

        let local_x = (shot.x - bounds.x).floor();
        let local_y = (shot.y - bounds.y).floor();
        if local_x < 0.0 || local_y < 0.0 {
            return false;
        }
        let (px, py) = (local_x as u32, local_y as u32);
        if px >= display_width || py >= display_height {
            return false;
        }

        if native_width == display_width && native_height == display_height {
            let Some(frame) = region.current_frame() else {
                return false;
            };
            return frame.get_pixel(px, py)[3] != 0;
        }

        let key = (region_id, region.frame_index(), display_width, display_height);
        if !self.cache.contains_key(&key) {
            let Some(frame) = region.current_frame() else {
                return false;
            };
            let resized = imageops::resize(frame, display_width, display_height, FilterType::Triangle);
            self.cache.insert(key, resized);
        }

        self.cache[&key].get_pixel(px, py)[3] != 0
    }
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new()
    }
}
