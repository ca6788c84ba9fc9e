use std::sync::OnceLock;

use crate::clump::{ClumpDraw, SphereClump};

/// Radii precomputed by `ClumpCache`.
pub const CACHED_RADII: usize = 9;

/// Sphere clumps for radii `1..=CACHED_RADII`, built once.
#[derive(Clone, Debug)]
pub struct ClumpCache {
    spheres: Vec<SphereClump>,
}

impl Default for ClumpCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ClumpCache {
    pub fn new() -> Self {
        let spheres = (1..=CACHED_RADII)
            .map(|r| SphereClump::build(r as f32))
            .collect();
        Self { spheres }
    }

    /// Process-wide cache, built on first use.
    pub fn shared() -> &'static ClumpCache {
        static CACHE: OnceLock<ClumpCache> = OnceLock::new();
        CACHE.get_or_init(ClumpCache::new)
    }

    pub fn sphere(&self, radius: u32) -> Option<&SphereClump> {
        let idx = (radius as usize).checked_sub(1)?;
        self.spheres.get(idx)
    }

    /// Removal state for `radius`. Radii outside the cache are built on demand
    /// and not retained.
    pub fn get(&self, radius: u32) -> ClumpDraw {
        match self.sphere(radius) {
            Some(s) => s.draw(),
            None => SphereClump::build(radius as f32).draw(),
        }
    }

    pub fn capacity(&self, radius: u32) -> usize {
        match self.sphere(radius) {
            Some(s) => s.len(),
            None => SphereClump::build(radius as f32).len(),
        }
    }

    /// Smallest cached radius whose clump holds at least `count` offsets.
    pub fn smallest_radius_holding(&self, count: usize) -> Option<u32> {
        self.spheres
            .iter()
            .position(|s| s.len() >= count)
            .map(|i| i as u32 + 1)
    }
}
