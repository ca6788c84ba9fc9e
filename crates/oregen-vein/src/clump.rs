//! Lattice spheres sorted by distance from their centre.
use std::sync::Arc;

use oregen_world::BlockPos;
use rand::Rng;
use rand_distr::StandardNormal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
    pub distance: f32,
}

impl Offset {
    pub fn new(dx: i32, dy: i32, dz: i32) -> Self {
        let d2 = (dx * dx + dy * dy + dz * dz) as f32;
        Self {
            dx,
            dy,
            dz,
            distance: d2.sqrt(),
        }
    }

    pub const ZERO: Offset = Offset {
        dx: 0,
        dy: 0,
        dz: 0,
        distance: 0.0,
    };

    /// `None` when the translated position leaves the coordinate range.
    #[inline]
    pub fn apply(self, origin: BlockPos) -> Option<BlockPos> {
        origin.offset(self.dx, self.dy, self.dz)
    }
}

/// Immutable sphere geometry. Never empty.
#[derive(Clone, Debug)]
pub struct SphereClump {
    offsets: Arc<[Offset]>,
}

impl SphereClump {
    pub fn build(radius: f32) -> Self {
        let r = radius.max(0.0);
        let extent = r.ceil() as i32;
        let mut offsets = Vec::new();
        for dx in -extent..=extent {
            for dy in -extent..=extent {
                for dz in -extent..=extent {
                    let o = Offset::new(dx, dy, dz);
                    if o.distance <= r {
                        offsets.push(o);
                    }
                }
            }
        }
        if offsets.is_empty() {
            offsets.push(Offset::ZERO);
        }
        offsets.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self {
            offsets: offsets.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn max_distance(&self) -> f32 {
        self.offsets.last().map_or(0.0, |o| o.distance)
    }

    /// Fresh removal state over this geometry. The clump itself is untouched.
    pub fn draw(&self) -> ClumpDraw {
        ClumpDraw {
            offsets: Arc::clone(&self.offsets),
            remaining: (0..self.offsets.len() as u32).collect(),
        }
    }
}

/// Disposable removal state over a shared `SphereClump`. Cloning yields an
/// independent copy; removals from one never show up in another.
#[derive(Clone, Debug)]
pub struct ClumpDraw {
    offsets: Arc<[Offset]>,
    // Indices into `offsets`, still in distance order.
    remaining: Vec<u32>,
}

impl ClumpDraw {
    #[inline]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    // The entry is consumed even when its position is unrepresentable.
    fn take(&mut self, index: usize, origin: BlockPos) -> Option<BlockPos> {
        let i = self.remaining.remove(index);
        self.offsets[i as usize].apply(origin)
    }

    /// Panics when the draw is empty.
    pub fn remove_uniform<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: BlockPos,
    ) -> Option<BlockPos> {
        assert!(!self.is_empty(), "remove_uniform on an exhausted clump");
        let index = rng.gen_range(0..self.remaining.len());
        self.take(index, origin)
    }

    /// Removes an offset biased toward the centre. Panics when the draw is empty.
    pub fn remove_gaussian<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: BlockPos,
    ) -> Option<BlockPos> {
        assert!(!self.is_empty(), "remove_gaussian on an exhausted clump");
        let sample: f64 = rng.sample(StandardNormal);
        let index = gaussian_index(sample, self.remaining.len());
        self.take(index, origin)
    }
}

/// `trunc(|sample| * len)` clamped into `0..len`. `len` must be non-zero.
#[inline]
pub fn gaussian_index(sample: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    // `as` saturates; NaN maps to 0.
    let i = (sample.abs() * len as f64) as usize;
    i.min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn radius_one_is_a_cross() {
        let c = SphereClump::build(1.0);
        assert_eq!(c.len(), 7);
        assert_eq!(c.offsets()[0], Offset::ZERO);
        assert!(c.offsets()[1..].iter().all(|o| o.distance == 1.0));
    }

    #[test]
    fn sub_unit_radius_falls_back_to_origin() {
        let c = SphereClump::build(0.5);
        assert_eq!(c.len(), 1);
        assert_eq!(c.offsets()[0], Offset::ZERO);
        let c = SphereClump::build(0.0);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn offsets_sorted_and_within_radius() {
        for r in 1..=9 {
            let c = SphereClump::build(r as f32);
            let offs = c.offsets();
            assert!(offs.windows(2).all(|w| w[0].distance <= w[1].distance));
            assert!(offs.iter().all(|o| o.distance <= r as f32));
        }
    }

    #[test]
    fn gaussian_index_clamps_extremes() {
        assert_eq!(gaussian_index(0.0, 10), 0);
        assert_eq!(gaussian_index(-0.25, 10), 2);
        assert_eq!(gaussian_index(1.0, 10), 9);
        assert_eq!(gaussian_index(37.5, 10), 9);
        assert_eq!(gaussian_index(f64::INFINITY, 3), 2);
        assert_eq!(gaussian_index(f64::NAN, 3), 0);
        assert_eq!(gaussian_index(5.0, 1), 0);
    }

    #[test]
    fn draws_are_independent() {
        let clump = SphereClump::build(2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut a = clump.draw();
        let _ = a.remove_gaussian(&mut rng, BlockPos::new(0, 0, 0));
        let b = a.clone();
        let mut c = a.clone();
        let _ = c.remove_uniform(&mut rng, BlockPos::new(0, 0, 0));
        assert_eq!(a.len(), clump.len() - 1);
        assert_eq!(b.len(), clump.len() - 1);
        assert_eq!(c.len(), clump.len() - 2);
        assert_eq!(clump.draw().len(), clump.len());
    }

    #[test]
    fn draining_yields_every_offset_once() {
        let clump = SphereClump::build(3.0);
        let origin = BlockPos::new(10, 20, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut draw = clump.draw();
        let mut seen = std::collections::HashSet::new();
        while !draw.is_empty() {
            assert!(seen.insert(draw.remove_gaussian(&mut rng, origin).unwrap()));
        }
        assert_eq!(seen.len(), clump.len());
        let expected: std::collections::HashSet<_> =
            clump.offsets().iter().filter_map(|o| o.apply(origin)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn removal_at_coordinate_limit_consumes_without_position() {
        let clump = SphereClump::build(1.0);
        let mut draw = clump.draw();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let origin = BlockPos::new(0, i32::MAX, 0);
        let mut unrepresentable = 0;
        while !draw.is_empty() {
            if draw.remove_uniform(&mut rng, origin).is_none() {
                unrepresentable += 1;
            }
        }
        assert_eq!(unrepresentable, 1);
    }

    #[test]
    #[should_panic]
    fn removing_from_exhausted_draw_panics() {
        let mut draw = SphereClump::build(0.0).draw();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let _ = draw.remove_uniform(&mut rng, BlockPos::new(0, 0, 0));
        let _ = draw.remove_uniform(&mut rng, BlockPos::new(0, 0, 0));
    }
}
