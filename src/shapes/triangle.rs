use crate::geometry::bounds::Bounds3f;
use crate::interaction::SurfaceInteraction;
use crate::material::MaterialId;
use crate::shapes::{Shape, SurfaceHit};
use crate::{Float, Normal3, Point2f, Point3f, Ray, Vec3f};
use cgmath::prelude::*;

/// Rejection threshold for near-parallel rays in the Möller–Trumbore
/// determinant test.
pub const DET_EPSILON: Float = 1e-8;

/// Single-sided triangle with precomputed edges, face normal and area.
/// Consistent counter-clockwise winding is assumed; back faces never hit.
pub struct Triangle {
    pub v0: Point3f,
    pub v1: Point3f,
    pub v2: Point3f,
    e1: Vec3f,
    e2: Vec3f,
    n: Normal3,
    area: Float,
    material: MaterialId,
}

impl Triangle {
    pub fn new(v0: Point3f, v1: Point3f, v2: Point3f, material: MaterialId) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);
        let area = cross.magnitude() / 2.0;
        // A degenerate (collinear) triangle gets a zero normal. Its intersect
        // routine still works (the determinant test rejects everything) but
        // it must be excluded from light sampling by its zero area.
        let n = if area > 0.0 {
            Normal3(cross.normalize())
        } else {
            Normal3::new(0.0, 0.0, 0.0)
        };
        Self { v0, v1, v2, e1, e2, n, area, material }
    }

    pub fn normal(&self) -> Normal3 {
        self.n
    }
}

impl Shape for Triangle {
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::from_point(self.v0)
            .union_point(self.v1)
            .union_point(self.v2)
    }

    fn area(&self) -> Float {
        self.area
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        // Single-sided: only front-facing rays can hit.
        if ray.dir.dot(self.n.0) >= 0.0 {
            return None;
        }

        let pvec = ray.dir.cross(self.e2);
        let det = self.e1.dot(pvec);
        if det.abs() < DET_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.v0;
        let u = tvec.dot(pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(self.e1);
        let v = ray.dir.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.e2.dot(qvec) * inv_det;
        if t < 0.0 || t > ray.t_max {
            return None;
        }

        Some(SurfaceInteraction {
            p: ray.at(t),
            n: self.n,
            t,
            uv: Point2f::new(u, v),
            material: self.material,
        })
    }

    fn sample(&self, _u_select: Float, u: Point2f) -> (SurfaceHit, Float) {
        let x = u.x.sqrt();
        let p = Point3f::from_vec(
            self.v0.to_vec() * (1.0 - x)
                + self.v1.to_vec() * ((1.0 - u.y) * x)
                + self.v2.to_vec() * (u.y * x),
        );
        let pdf = if self.area > 0.0 { 1.0 / self.area } else { 0.0 };
        (SurfaceHit { p, n: self.n }, pdf)
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3f;
    use approx::assert_abs_diff_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn unit_tri() -> Triangle {
        // CCW in the xy plane seen from +z, so the normal points toward +z.
        Triangle::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            MaterialId(0),
        )
    }

    #[test]
    fn area_and_normal() {
        let tri = unit_tri();
        assert_abs_diff_eq!(tri.area(), 0.5);
        assert_abs_diff_eq!(tri.normal().z, 1.0);
    }

    #[test]
    fn barycentric_round_trip() {
        let tri = unit_tri();
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        for _ in 0..1000 {
            // point strictly inside the triangle
            let (mut u, mut v) = (rng.gen_range(0.01..0.99), rng.gen_range(0.01..0.99f32));
            if u + v >= 0.99 {
                u /= 2.0;
                v /= 2.0;
            }
            let target = Point3f::new(u, v, 0.0);
            let origin = Point3f::new(0.3, 0.3, 5.0);
            let dir = (target - origin).normalize();
            let isect = tri.intersect(&Ray::new(origin, dir)).expect("interior hit");
            assert_abs_diff_eq!(isect.uv.x, u, epsilon = 1e-4);
            assert_abs_diff_eq!(isect.uv.y, v, epsilon = 1e-4);
            assert_abs_diff_eq!(isect.p.x, u, epsilon = 1e-4);
            assert_abs_diff_eq!(isect.p.y, v, epsilon = 1e-4);
        }
    }

    #[test]
    fn back_face_never_hits() {
        let tri = unit_tri();
        let ray = Ray::new(Point3f::new(0.25, 0.25, -1.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn parallel_ray_rejected() {
        let tri = unit_tri();
        let ray = Ray::new(Point3f::new(-1.0, 0.5, 0.0), Vec3f::new(1.0, 0.0, 0.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn respects_ray_t_max() {
        let tri = unit_tri();
        let ray = Ray::with_t_max(Point3f::new(0.25, 0.25, 5.0), Vec3f::new(0.0, 0.0, -1.0), 1.0);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn degenerate_triangle() {
        let tri = Triangle::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
            MaterialId(0),
        );
        assert_eq!(tri.area(), 0.0);
        let ray = Ray::new(Point3f::new(0.5, 0.0, 1.0), Vec3f::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray).is_none());
        let (_, pdf) = tri.sample(0.0, Point2f::new(0.5, 0.5));
        assert_eq!(pdf, 0.0);
    }

    #[test]
    fn sample_stays_on_surface() {
        let tri = unit_tri();
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        for _ in 0..1000 {
            let u = Point2f::new(rng.gen(), rng.gen());
            let (hit, pdf) = tri.sample(0.0, u);
            assert_abs_diff_eq!(pdf, 2.0);
            assert_abs_diff_eq!(hit.p.z, 0.0);
            assert!(hit.p.x >= 0.0 && hit.p.y >= 0.0 && hit.p.x + hit.p.y <= 1.0 + 1e-5);
        }
    }
}
