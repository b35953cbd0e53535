pub mod geometry;
pub mod spectrum;
pub mod interaction;
pub mod shapes;
pub mod bvh;
pub mod material;
pub mod sampler;
pub mod camera;
pub mod film;
pub mod scene;
pub mod integrator;

pub use geometry::*;
pub use interaction::SurfaceInteraction;
pub use material::{Material, MaterialId};
pub use spectrum::Spectrum;

use cgmath::{Point2, Point3, Vector2, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point2i = Point2<i32>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec3f = Vector3<Float>;

pub const INFINITY: Float = f32::INFINITY;
