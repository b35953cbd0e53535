use crate::{Float, Point2f, Point2i, Point3f, Ray, Vec3f};
use cgmath::prelude::*;

#[derive(Clone, Copy)]
pub struct CameraSample {
    pub p_film: Point2f,
}

pub trait Camera: Send + Sync {
    fn generate_ray(&self, sample: CameraSample) -> Ray;
}

/// Pinhole perspective camera: fixed position, look-at orientation, vertical
/// field of view. No lens/depth-of-field model.
pub struct PerspectiveCamera {
    position: Point3f,
    right: Vec3f,
    up: Vec3f,
    forward: Vec3f,
    /// tan(fov / 2)
    fov_scale: Float,
    resolution: Point2i,
}

impl PerspectiveCamera {
    pub fn new(
        position: Point3f,
        look_at: Point3f,
        up: Vec3f,
        fov_degrees: Float,
        resolution: Point2i,
    ) -> Self {
        let forward = (look_at - position).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self {
            position,
            right,
            up,
            forward,
            fov_scale: (fov_degrees.to_radians() / 2.0).tan(),
            resolution,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, sample: CameraSample) -> Ray {
        let w = self.resolution.x as Float;
        let h = self.resolution.y as Float;

        // NDC in [-1, 1], y up. The aspect ratio stretches the non-dominant
        // axis so pixels stay square in both orientations.
        let mut x = (2.0 * sample.p_film.x / w - 1.0) * self.fov_scale;
        let mut y = (1.0 - 2.0 * sample.p_film.y / h) * self.fov_scale;
        if w >= h {
            x *= w / h;
        } else {
            y *= h / w;
        }

        let dir = (self.right * x + self.up * y + self.forward).normalize();
        Ray::new(self.position, dir)
    }
}
