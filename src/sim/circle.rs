//! Circle physics
//!
//! Each tick a circle drifts along its fixed direction, gets pushed away from
//! the pointer while the pointer is inside its disc, and wraps around the
//! surface edges with a re-entry impulse.

use glam::Vec2;
use rand::Rng;

use super::bounds::{Bounds, SizeRange};
use crate::consts::*;
use crate::surface::{BlendMode, Paint, Placement, Primitive, PrimitiveId, Surface};

/// Per-tick inputs shared by every circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub pointer: Vec2,
    pub sensibility: f32,
    pub bounds: Bounds,
}

/// A drifting circle
#[derive(Debug, Clone)]
pub struct Circle {
    /// Position in its generation's creation order
    pub index: usize,
    pub pos: Vec2,
    /// Drift direction in [-1, 1]², never renormalized
    pub dir: Vec2,
    pub speed: f32,
    pub acc: Vec2,
    radius: f32,
    /// Disc registered on the surface, once attached
    primitive: Option<PrimitiveId>,
}

impl Circle {
    pub fn new(index: usize, pos: Vec2, dir: Vec2, radius: f32) -> Self {
        Self {
            index,
            pos,
            dir,
            speed: CIRCLE_SPEED,
            acc: Vec2::ZERO,
            radius,
            primitive: None,
        }
    }

    /// Random circle for the given surface size.
    ///
    /// Start positions span `[0, w + 2r) x [0, h + 2r)`, so some circles begin
    /// past the right/bottom edges and wrap in.
    pub fn random<R: Rng + ?Sized>(index: usize, bounds: Bounds, sizes: SizeRange, rng: &mut R) -> Self {
        let radius = sizes.sample(rng);
        let pos = Vec2::new(
            rng.random::<f32>() * (bounds.width + radius * 2.0),
            rng.random::<f32>() * (bounds.height + radius * 2.0),
        );
        let dir = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        Self::new(index, pos, dir, radius)
    }

    /// Random circle registered on `surface` as a lightened gradient disc
    pub fn create<R: Rng + ?Sized, S: Surface + ?Sized>(
        index: usize,
        bounds: Bounds,
        sizes: SizeRange,
        rng: &mut R,
        surface: &mut S,
    ) -> Self {
        let mut circle = Self::random(index, bounds, sizes, rng);
        circle.attach(surface);
        circle
    }

    /// Register this circle's disc on `surface`
    pub fn attach<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let id = surface.add(&self.primitive_desc(), Placement::Front);
        self.primitive = Some(id);
    }

    pub fn primitive_desc(&self) -> Primitive {
        Primitive::Disc {
            center: self.pos,
            radius: self.radius,
            fill: Paint::Gradient(RADIAL_GRADIENT_ID),
            blend: BlendMode::Lighten,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn primitive(&self) -> Option<PrimitiveId> {
        self.primitive
    }

    /// Advance one tick and push the new position to `surface`
    pub fn advance<S: Surface + ?Sized>(&mut self, ctx: &FrameContext, surface: &mut S) {
        let drawn = self.step(ctx);
        if let Some(id) = self.primitive {
            surface.move_to(id, drawn);
        }
    }

    /// Advance one tick without a surface.
    ///
    /// Returns the integrated position before wraparound, which is what gets
    /// drawn this tick.
    pub fn step(&mut self, ctx: &FrameContext) -> Vec2 {
        let diff = ctx.pointer - self.pos;
        let dist = diff.length();

        // dist >= 0, so a non-positive radius never divides. A zero diff adds zero.
        if dist < self.radius {
            self.acc += -diff / self.radius * ctx.sensibility;
        }

        self.acc *= ACCEL_DAMPING;
        self.pos += self.dir * self.speed + self.acc;
        let drawn = self.pos;

        self.wrap(ctx.bounds);
        drawn
    }

    fn wrap(&mut self, bounds: Bounds) {
        let r = self.radius;

        if self.pos.x < -r {
            self.acc.x = -WRAP_IMPULSE;
            self.pos.x = bounds.width + r - 1.0;
        } else if self.pos.x > bounds.width + r {
            self.acc.x = WRAP_IMPULSE;
            self.pos.x = -r + 1.0;
        }

        if self.pos.y < -r {
            self.acc.y = -WRAP_IMPULSE;
            self.pos.y = bounds.height + r - 1.0;
        } else if self.pos.y > bounds.height + r {
            self.acc.y = WRAP_IMPULSE;
            self.pos.y = -r + 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SvgDocument;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(pointer: Vec2) -> FrameContext {
        FrameContext {
            pointer,
            sensibility: 1.0,
            bounds: Bounds::new(500.0, 500.0),
        }
    }

    #[test]
    fn test_pointer_inside_pushes_away() {
        let mut c = Circle::new(0, Vec2::new(250.0, 250.0), Vec2::ZERO, 50.0);
        c.step(&ctx(Vec2::new(260.0, 250.0)));
        // Pointer to the right, so acceleration points left
        assert!(c.acc.x < 0.0);
        assert_eq!(c.acc.y, 0.0);
        let expected = -10.0 / 50.0 * ACCEL_DAMPING;
        assert!((c.acc.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_outside_has_no_influence() {
        let mut c = Circle::new(0, Vec2::new(250.0, 250.0), Vec2::ZERO, 50.0);
        c.step(&ctx(Vec2::new(300.0, 250.0)));
        assert_eq!(c.acc, Vec2::ZERO);
    }

    #[test]
    fn test_sensibility_scales_push() {
        let mut a = Circle::new(0, Vec2::new(250.0, 250.0), Vec2::ZERO, 50.0);
        let mut b = a.clone();
        let pointer = Vec2::new(250.0, 230.0);
        a.step(&FrameContext { sensibility: 0.5, ..ctx(pointer) });
        b.step(&FrameContext { sensibility: 1.0, ..ctx(pointer) });
        assert!((b.acc.y - 2.0 * a.acc.y).abs() < 1e-6);
    }

    #[test]
    fn test_damping_decays_exponentially() {
        let mut c = Circle::new(0, Vec2::new(250.0, 250.0), Vec2::ZERO, 10.0);
        c.acc = Vec2::new(3.0, -4.0);
        let far = Vec2::new(-1000.0, -1000.0);
        for _ in 0..50 {
            c.step(&ctx(far));
        }
        let expected = 5.0 * ACCEL_DAMPING.powi(50);
        assert!((c.acc.length() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_left_edge() {
        let r = 20.0;
        let mut c = Circle::new(0, Vec2::new(-r - 1.0, 250.0), Vec2::new(-1.0, 0.0), r);
        let far = Vec2::new(5000.0, 5000.0);
        let drawn = c.step(&ctx(far));
        assert!(drawn.x < -r);
        assert_eq!(c.pos.x, 500.0 + r - 1.0);
        assert_eq!(c.acc.x, -WRAP_IMPULSE);
    }

    #[test]
    fn test_wrap_right_edge() {
        let r = 20.0;
        let mut c = Circle::new(0, Vec2::new(500.0 + r, 250.0), Vec2::new(1.0, 0.0), r);
        c.step(&ctx(Vec2::new(-5000.0, -5000.0)));
        assert_eq!(c.pos.x, -r + 1.0);
        assert_eq!(c.acc.x, WRAP_IMPULSE);
        assert_eq!(c.acc.y, 0.0);
    }

    #[test]
    fn test_wrap_axes_independent() {
        let r = 10.0;
        let mut c = Circle::new(0, Vec2::new(-r - 0.5, 500.0 + r), Vec2::new(-1.0, 1.0), r);
        c.step(&ctx(Vec2::new(250.0, 250.0)));
        assert_eq!(c.pos, Vec2::new(500.0 + r - 1.0, -r + 1.0));
        assert_eq!(c.acc, Vec2::new(-WRAP_IMPULSE, WRAP_IMPULSE));
    }

    #[test]
    fn test_pointer_at_center_never_nan() {
        let mut c = Circle::new(0, Vec2::new(100.0, 100.0), Vec2::new(0.3, -0.7), 50.0);
        for _ in 0..10 {
            let pointer = c.pos;
            c.step(&ctx(pointer));
            assert!(c.pos.is_finite());
            assert!(c.acc.is_finite());
            assert_eq!(c.acc, Vec2::ZERO);
        }
    }

    #[test]
    fn test_random_within_spawn_area() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Bounds::new(400.0, 300.0);
        for i in 0..200 {
            let c = Circle::random(i, bounds, SizeRange::new(10.0, 30.0), &mut rng);
            let r = c.radius();
            assert!((10.0..=30.0).contains(&r));
            assert!(c.pos.x >= 0.0 && c.pos.x < bounds.width + 2.0 * r);
            assert!(c.pos.y >= 0.0 && c.pos.y < bounds.height + 2.0 * r);
            assert!(c.dir.abs().max_element() <= 1.0);
            assert_eq!(c.acc, Vec2::ZERO);
            assert_eq!(c.speed, CIRCLE_SPEED);
        }
    }

    #[test]
    fn test_advance_pushes_pre_wrap_position() {
        let mut doc = SvgDocument::new();
        doc.reset(Bounds::new(500.0, 500.0));
        let r = 20.0;
        let mut c = Circle::new(0, Vec2::new(-r - 1.0, 100.0), Vec2::new(-1.0, 0.0), r);
        c.attach(&mut doc);

        c.advance(&ctx(Vec2::new(5000.0, 5000.0)), &mut doc);

        let el = doc.element(c.primitive().unwrap()).unwrap();
        let cx: f32 = el.get_attr("cx").unwrap().parse().unwrap();
        assert!(cx < -r);
        assert_eq!(c.pos.x, 500.0 + r - 1.0);
    }

    #[test]
    fn test_create_registers_disc() {
        let mut doc = SvgDocument::new();
        doc.reset(Bounds::new(500.0, 500.0));
        let mut rng = Pcg32::seed_from_u64(11);
        let c = Circle::create(0, Bounds::new(500.0, 500.0), SizeRange::new(5.0, 6.0), &mut rng, &mut doc);
        let el = doc.element(c.primitive().unwrap()).unwrap();
        assert_eq!(el.get_attr("fill"), Some("url(\"#radialGradient\")"));
        assert_eq!(el.get_attr("style"), Some("mix-blend-mode: lighten;"));
        assert_eq!(el.get_attr("r"), Some(c.radius().to_string().as_str()));
    }

    proptest! {
        #[test]
        fn prop_radius_fixed_and_position_finite(
            x in -200.0f32..700.0,
            y in -200.0f32..700.0,
            dx in -1.0f32..1.0,
            dy in -1.0f32..1.0,
            radius in 5.0f32..200.0,
            px in -100.0f32..600.0,
            py in -100.0f32..600.0,
            sensibility in 0.0f32..2.0,
            ticks in 1usize..300,
        ) {
            let mut c = Circle::new(0, Vec2::new(x, y), Vec2::new(dx, dy), radius);
            let frame = FrameContext {
                pointer: Vec2::new(px, py),
                sensibility,
                bounds: Bounds::new(500.0, 500.0),
            };
            for _ in 0..ticks {
                c.step(&frame);
                prop_assert!(c.pos.is_finite());
                prop_assert_eq!(c.radius(), radius);
            }
        }

        #[test]
        fn prop_push_points_away_from_pointer(
            ox in -0.99f32..0.99,
            oy in -0.99f32..0.99,
            radius in 5.0f32..200.0,
        ) {
            let offset = Vec2::new(ox, oy) * radius * 0.7;
            prop_assume!(offset.length() > 1e-3);
            let center = Vec2::new(250.0, 250.0);
            let mut c = Circle::new(0, center, Vec2::ZERO, radius);
            c.step(&FrameContext {
                pointer: center + offset,
                sensibility: 1.0,
                bounds: Bounds::new(500.0, 500.0),
            });
            // Acceleration opposes the pointer's offset
            prop_assert!(c.acc.dot(offset) < 0.0);
        }

        #[test]
        fn prop_acceleration_bounded_by_damping(
            ax in -10.0f32..10.0,
            ay in -10.0f32..10.0,
            n in 1i32..100,
        ) {
            // Large bounds and no drift keep the circle clear of the edges
            let mut c = Circle::new(0, Vec2::new(5000.0, 5000.0), Vec2::ZERO, 1.0);
            c.acc = Vec2::new(ax, ay);
            let start = c.acc.length();
            let frame = FrameContext {
                pointer: Vec2::ZERO,
                sensibility: 1.0,
                bounds: Bounds::new(100_000.0, 100_000.0),
            };
            for _ in 0..n {
                c.step(&frame);
            }
            let expected = start * ACCEL_DAMPING.powi(n);
            prop_assert!((c.acc.length() - expected).abs() <= 1e-3 * start.max(1.0));
        }
    }
}
