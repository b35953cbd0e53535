use crate::geometry::coordinate_system;
use crate::spectrum::Spectrum;
use crate::{Float, Normal3, Point2f, Vec3f};
use cgmath::prelude::*;
use std::f32::consts::{FRAC_1_PI, PI};

/// Index into the scene's material arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Diffuse,
}

/// Surface material: BRDF sampling/evaluation/pdf plus emission. Immutable
/// once constructed and shared by id among the triangles of a mesh.
///
/// `ks`, `ior` and `specular_exponent` are reserved for specular material
/// kinds and unused by `Diffuse`.
pub struct Material {
    pub kind: MaterialKind,
    pub kd: Spectrum,
    pub emission: Spectrum,
    pub ks: Spectrum,
    pub ior: Float,
    pub specular_exponent: Float,
}

impl Material {
    pub fn diffuse(kd: Spectrum) -> Self {
        Self {
            kind: MaterialKind::Diffuse,
            kd,
            emission: Spectrum::black(),
            ks: Spectrum::black(),
            ior: 1.0,
            specular_exponent: 0.0,
        }
    }

    pub fn emissive(kd: Spectrum, emission: Spectrum) -> Self {
        Self { emission, ..Self::diffuse(kd) }
    }

    pub fn has_emission(&self) -> bool {
        !self.emission.is_black()
    }

    /// Draws a direction uniformly over the hemisphere above `n`.
    pub fn sample_wi(&self, n: Normal3, u: Point2f) -> Vec3f {
        match self.kind {
            MaterialKind::Diffuse => {
                let z = (1.0 - 2.0 * u.x).abs();
                let r = (1.0 - z * z).max(0.0).sqrt();
                let phi = 2.0 * PI * u.y;
                let (tangent, bitangent) = coordinate_system(n.0);
                tangent * (r * phi.cos()) + bitangent * (r * phi.sin()) + n.0 * z
            }
        }
    }

    /// Density of `sample_wi` with respect to solid angle: uniform over the
    /// hemisphere, deliberately not cosine-weighted.
    pub fn pdf(&self, wi: Vec3f, n: Normal3) -> Float {
        match self.kind {
            MaterialKind::Diffuse => {
                if wi.dot(n.0) >= 0.0 {
                    0.5 * FRAC_1_PI
                } else {
                    0.0
                }
            }
        }
    }

    /// Lambertian BRDF value for light arriving from `wi`.
    pub fn eval(&self, wi: Vec3f, n: Normal3) -> Spectrum {
        match self.kind {
            MaterialKind::Diffuse => {
                if wi.dot(n.0) >= 0.0 {
                    self.kd * FRAC_1_PI
                } else {
                    Spectrum::black()
                }
            }
        }
    }
}
