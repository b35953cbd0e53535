use crate::{Float, Point2i, Point3f, Ray, Vec3f};

/// Axis-aligned bounding box, stored by its min/max corners. The empty box
/// has inverted infinite corners so that any union with it is the identity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds3f {
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            max: Point3f::new(Float::NEG_INFINITY, Float::NEG_INFINITY, Float::NEG_INFINITY),
        }
    }

    pub fn with_bounds(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    pub fn from_point(p: Point3f) -> Self {
        Self { min: p, max: p }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point3f::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3f::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn union_point(&self, p: Point3f) -> Self {
        self.union(&Self::from_point(p))
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Point3f::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3f::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| self.max[i] >= other.min[i] && self.min[i] <= other.max[i])
    }

    pub fn inside(&self, p: Point3f) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn diagonal(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn centroid(&self) -> Point3f {
        self.min + self.diagonal() / 2.0
    }

    /// Index of the axis with the largest extent.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Ray/box slab test against the cached inverse direction. Per axis the
    /// (near, far) pair is swapped when the direction component is negative;
    /// the box is hit iff max(near) <= min(far) and the exit is not behind
    /// the ray origin.
    ///
    /// This test does not clip against `ray.t_max`; shadow-ray callers
    /// compare the intersection distance against their own range.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        let mut t_min = Float::NEG_INFINITY;
        let mut t_max = Float::INFINITY;

        for i in 0..3 {
            let mut near = (self.min[i] - ray.origin[i]) * ray.inv_dir[i];
            let mut far = (self.max[i] - ray.origin[i]) * ray.inv_dir[i];
            if ray.dir[i] < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }
            t_min = t_min.max(near);
            t_max = t_max.min(far);
        }

        t_min <= t_max && t_max >= 0.0
    }
}

/// Integer pixel bounds, used to carve the film into tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds2i {
    pub min: Point2i,
    pub max: Point2i,
}

impl Bounds2i {
    pub fn with_bounds(min: Point2i, max: Point2i) -> Self {
        Self { min, max }
    }

    pub fn area(&self) -> i32 {
        let d = self.max - self.min;
        (d.x * d.y).max(0)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Point2i::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point2i::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }

    pub fn iter_points(&self) -> impl Iterator<Item = Point2i> {
        let b = *self;
        (b.min.y..b.max.y).flat_map(move |y| (b.min.x..b.max.x).map(move |x| Point2i::new(x, y)))
    }

    pub fn iter_tiles(&self, tile_size: i32) -> impl Iterator<Item = Bounds2i> {
        let b = *self;
        (b.min.y..b.max.y).step_by(tile_size as usize).flat_map(move |y| {
            (b.min.x..b.max.x).step_by(tile_size as usize).map(move |x| {
                Bounds2i::with_bounds(
                    Point2i::new(x, y),
                    Point2i::new((x + tile_size).min(b.max.x), (y + tile_size).min(b.max.y)),
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3f;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn rand_bounds(rng: &mut Xoshiro256Plus) -> Bounds3f {
        let p1 = Point3f::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        let p2 = Point3f::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        Bounds3f::from_point(p1).union_point(p2)
    }

    #[test]
    fn union_contains_both() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        for _ in 0..100 {
            let a = rand_bounds(&mut rng);
            let b = rand_bounds(&mut rng);
            let u = a.union(&b);
            assert!(u.inside(a.min) && u.inside(a.max));
            assert!(u.inside(b.min) && u.inside(b.max));
        }
    }

    #[test]
    fn overlaps_is_symmetric() {
        let mut rng = Xoshiro256Plus::seed_from_u64(2);
        for _ in 0..100 {
            let a = rand_bounds(&mut rng);
            let b = rand_bounds(&mut rng);
            assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }

    #[test]
    fn empty_is_union_identity() {
        let b = Bounds3f::with_bounds(Point3f::new(-1.0, 0.0, 0.0), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(Bounds3f::empty().union(&b), b);
    }

    #[test]
    fn slab_test_hits_from_both_sides() {
        let b = Bounds3f::with_bounds(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));

        let hit = Ray::new(Point3f::new(-5.0, 0.0, 0.0), Vec3f::new(1.0, 0.0, 0.0));
        assert!(b.intersect_p(&hit));

        // negative direction component exercises the near/far swap
        let hit_neg = Ray::new(Point3f::new(5.0, 0.0, 0.0), Vec3f::new(-1.0, 0.0, 0.0));
        assert!(b.intersect_p(&hit_neg));

        let miss = Ray::new(Point3f::new(-5.0, 3.0, 0.0), Vec3f::new(1.0, 0.0, 0.0));
        assert!(!b.intersect_p(&miss));

        // box fully behind the origin
        let behind = Ray::new(Point3f::new(5.0, 0.0, 0.0), Vec3f::new(1.0, 0.0, 0.0));
        assert!(!b.intersect_p(&behind));
    }

    #[test]
    fn slab_test_ignores_ray_range() {
        let b = Bounds3f::with_bounds(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        // t_max clips well before the box, but the slab test still reports a hit
        let ray = Ray::with_t_max(Point3f::new(-5.0, 0.0, 0.0), Vec3f::new(1.0, 0.0, 0.0), 0.5);
        assert!(b.intersect_p(&ray));
    }

    #[test]
    fn slab_test_from_inside() {
        let b = Bounds3f::with_bounds(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vec3f::new(0.0, 1.0, 0.0));
        assert!(b.intersect_p(&ray));
    }

    #[test]
    fn tiles_cover_sample_bounds() {
        let b = Bounds2i::with_bounds(Point2i::new(0, 0), Point2i::new(37, 21));
        let total: i32 = b.iter_tiles(16).map(|t| t.area()).sum();
        assert_eq!(total, b.area());
    }
}
