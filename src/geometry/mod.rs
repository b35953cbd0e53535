use crate::{Float, Point3f, Vec3f, INFINITY};
use cgmath::prelude::*;
use std::ops::{Deref, Neg};

pub mod bounds;

pub use bounds::*;

/// Builds an orthonormal basis around `n`. The tangent is derived from
/// whichever of the normal's x/y components is larger in magnitude, so the
/// intermediate cross product never degenerates.
pub fn coordinate_system(n: Vec3f) -> (Vec3f, Vec3f) {
    let tangent = if n.x.abs() > n.y.abs() {
        Vec3f::new(n.z, 0.0, -n.x) / (n.x * n.x + n.z * n.z).sqrt()
    } else {
        Vec3f::new(0.0, n.z, -n.y) / (n.y * n.y + n.z * n.z).sqrt()
    };
    let bitangent = tangent.cross(n);
    (tangent, bitangent)
}

pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,

    /// Componentwise reciprocal of `dir`, cached for the slab test.
    pub inv_dir: Vec3f,

    pub t_max: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self {
            origin,
            dir,
            inv_dir: Vec3f::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z),
            t_max: INFINITY,
        }
    }

    pub fn with_t_max(origin: Point3f, dir: Vec3f, t_max: Float) -> Self {
        Self { t_max, ..Self::new(origin, dir) }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Normal3(pub Vec3f);

impl Normal3 {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self(Vec3f::new(x, y, z))
    }
}

impl Deref for Normal3 {
    type Target = Vec3f;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Neg for Normal3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Vec3f> for Normal3 {
    fn from(v: Vec3f) -> Self {
        Self(v)
    }
}

impl From<Normal3> for Vec3f {
    fn from(n: Normal3) -> Self {
        n.0
    }
}
