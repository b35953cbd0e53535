use crate::geometry::bounds::Bounds3f;
use crate::interaction::SurfaceInteraction;
use crate::material::MaterialId;
use crate::{Float, Normal3, Point2f, Point3f, Ray};
use std::sync::Arc;

pub mod mesh;
pub mod triangle;

pub use mesh::Mesh;
pub use triangle::Triangle;

/// A point sampled on a surface, used for area-light sampling.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub p: Point3f,
    pub n: Normal3,
}

/// Geometry capability set shared by leaf primitives and aggregates. Material
/// properties (emission, diffuse color) are reached through the material
/// arena via `material()` rather than back-references to live objects.
pub trait Shape: Send + Sync {
    fn world_bound(&self) -> Bounds3f;

    fn area(&self) -> Float;

    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction>;

    /// Samples a point uniformly over the shape's surface, returning the
    /// point and its area density. `u_select` steers aggregate shapes'
    /// descent over sub-primitives; leaf shapes ignore it.
    fn sample(&self, u_select: Float, u: Point2f) -> (SurfaceHit, Float);

    fn material(&self) -> MaterialId;
}

impl<S: Shape + ?Sized> Shape for Arc<S> {
    fn world_bound(&self) -> Bounds3f {
        (**self).world_bound()
    }

    fn area(&self) -> Float {
        (**self).area()
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        (**self).intersect(ray)
    }

    fn sample(&self, u_select: Float, u: Point2f) -> (SurfaceHit, Float) {
        (**self).sample(u_select, u)
    }

    fn material(&self) -> MaterialId {
        (**self).material()
    }
}
