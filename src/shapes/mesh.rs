use crate::bvh::{Bvh, SplitMethod};
use crate::geometry::bounds::Bounds3f;
use crate::interaction::SurfaceInteraction;
use crate::material::MaterialId;
use crate::shapes::{Shape, SurfaceHit, Triangle};
use crate::{Float, Normal3, Point2f, Point3f, Ray};

/// Triangle aggregate sharing one material, accelerated by its own private
/// BVH built at construction. Every shape operation delegates to that inner
/// hierarchy, which nests inside the scene-level one.
pub struct Mesh {
    bvh: Bvh<Triangle>,
    material: MaterialId,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>, material: MaterialId) -> Self {
        Self {
            bvh: Bvh::build(triangles, SplitMethod::EqualCounts),
            material,
        }
    }

    /// Planar quad as two triangles. Vertices are expected in consistent
    /// counter-clockwise order seen from the front side.
    pub fn quad(p0: Point3f, p1: Point3f, p2: Point3f, p3: Point3f, material: MaterialId) -> Self {
        Self::new(
            vec![
                Triangle::new(p0, p1, p2, material),
                Triangle::new(p0, p2, p3, material),
            ],
            material,
        )
    }

    pub fn n_triangles(&self) -> usize {
        self.bvh.shapes().len()
    }
}

impl Shape for Mesh {
    fn world_bound(&self) -> Bounds3f {
        self.bvh.bounds()
    }

    fn area(&self) -> Float {
        self.bvh.area()
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        self.bvh.intersect(ray)
    }

    fn sample(&self, u_select: Float, u: Point2f) -> (SurfaceHit, Float) {
        self.bvh.sample(u_select, u).unwrap_or((
            // Unreachable for meshes with surface; zero density keeps empty
            // or fully-degenerate meshes out of any estimate.
            SurfaceHit { p: Point3f::new(0.0, 0.0, 0.0), n: Normal3::new(0.0, 0.0, 0.0) },
            0.0,
        ))
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}
