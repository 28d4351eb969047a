//! Surface bounds and radius ranges

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Current drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Radius range circles are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a radius in `[min, min + |max - min|)`.
    ///
    /// Equivalent to `[min, max)` for an ordered range. A reversed range
    /// (which randomize can produce) still grows upward from `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min).abs()
    }

    /// Upper bound of values `sample` can return
    pub fn upper(&self) -> f32 {
        self.min + (self.max - self.min).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sample_within_ordered_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let range = SizeRange::new(80.0, 160.0);
        for _ in 0..1000 {
            let r = range.sample(&mut rng);
            assert!((80.0..=160.0).contains(&r));
        }
    }

    #[test]
    fn test_sample_reversed_range_grows_from_min() {
        let mut rng = Pcg32::seed_from_u64(7);
        let range = SizeRange::new(150.0, 100.0);
        assert_eq!(range.upper(), 200.0);
        for _ in 0..1000 {
            let r = range.sample(&mut rng);
            assert!((150.0..=200.0).contains(&r));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let range = SizeRange::new(50.0, 50.0);
        assert_eq!(range.sample(&mut rng), 50.0);
    }
}
