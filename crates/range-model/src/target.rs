use crate::geometry::Bounds;
use crate::region::Region;
use std::path::{Path, PathBuf};

/// A loaded group of regions representing one physical target face.
///
/// Region order is fixed at load time and doubles as the z-order: later
/// regions draw (and hit-test) on top of earlier ones.
#[derive(Debug, Clone)]
pub struct Target {
    source: PathBuf,
    regions: Vec<Region>,
    user_deletable: bool,
    provenance: usize,
}

impl Target {
    pub fn new(source: impl Into<PathBuf>, regions: Vec<Region>, user_deletable: bool) -> Self {
        Self {
            source: source.into(),
            regions,
            user_deletable,
            provenance: 0,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    pub fn user_deletable(&self) -> bool {
        self.user_deletable
    }

    /// Insertion order within the owning canvas.
    pub fn provenance(&self) -> usize {
        self.provenance
    }

    pub fn set_provenance(&mut self, provenance: usize) {
        self.provenance = provenance;
    }

    /// Union of all region bounds, or `None` for an empty target.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut regions = self.regions.iter();
        let mut bounds = regions.next()?.bounds();
        for region in regions {
            bounds = bounds.union(&region.bounds());
        }
        Some(bounds)
    }

    /// Find a region by its `name` tag, preferring the target the struck
    /// region belongs to before scanning the rest of the canvas's targets.
    pub fn region_by_name<'a>(
        targets: &'a [Target],
        hit_target: usize,
        name: &str,
    ) -> Option<&'a Region> {
        if let Some(target) = targets.get(hit_target) {
            if let Some(region) = target.regions.iter().find(|r| r.name() == Some(name)) {
                return Some(region);
            }
        }
        targets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != hit_target)
            .flat_map(|(_, t)| t.regions.iter())
            .find(|r| r.name() == Some(name))
    }
}

/// Result of resolving a shot against the target list: which target was
/// struck and the 0-based index of the struck region within it. Ephemeral;
/// produced and consumed within one shot-processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target_index: usize,
    pub region_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
    }

    #[test]
    fn test_bounds_union() {
        let target = Target::new(
            "plates.target",
            vec![
                Region::shape(rect(0.0, 0.0, 10.0, 10.0)),
                Region::shape(rect(20.0, 5.0, 10.0, 10.0)),
            ],
            true,
        );
        assert_eq!(target.bounds(), Some(Bounds::new(0.0, 0.0, 30.0, 15.0)));
    }

    #[test]
    fn test_empty_target_has_no_bounds() {
        let target = Target::new("empty.target", vec![], true);
        assert!(target.bounds().is_none());
    }

    #[test]
    fn test_region_by_name_prefers_hit_target() {
        let first = Target::new(
            "a.target",
            vec![Region::shape(rect(0.0, 0.0, 1.0, 1.0)).with_tag("name", "plate")],
            true,
        );
        let second = Target::new(
            "b.target",
            vec![Region::shape(rect(5.0, 5.0, 1.0, 1.0)).with_tag("name", "plate")],
            true,
        );
        let targets = vec![first, second];

        let found = Target::region_by_name(&targets, 1, "plate").unwrap();
        assert_eq!(found.bounds().x, 5.0);

        let found = Target::region_by_name(&targets, 0, "plate").unwrap();
        assert_eq!(found.bounds().x, 0.0);

        assert!(Target::region_by_name(&targets, 0, "missing").is_none());
    }
}
