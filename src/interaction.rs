use crate::material::MaterialId;
use crate::{Float, Normal3, Point2f, Point3f, Ray, Vec3f};
use cgmath::prelude::*;

/// Record of a ray/surface intersection. Created fresh per query and never
/// mutated after being returned.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    pub n: Normal3,

    /// Parametric distance along the intersecting ray.
    pub t: Float,

    /// Barycentric (u, v) coordinates of the hit.
    pub uv: Point2f,

    pub material: MaterialId,
}

impl SurfaceInteraction {
    /// Spawns a ray leaving the surface in `dir`, offsetting the origin along
    /// the normal (toward the side `dir` points at) to avoid self-intersection.
    pub fn spawn_ray(&self, dir: Vec3f, offset: Float) -> Ray {
        let origin = if dir.dot(self.n.0) < 0.0 {
            self.p - self.n.0 * offset
        } else {
            self.p + self.n.0 * offset
        };
        Ray::new(origin, dir)
    }
}
