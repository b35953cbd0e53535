use crate::bvh::{Bvh, SplitMethod};
use crate::interaction::SurfaceInteraction;
use crate::material::{Material, MaterialId};
use crate::shapes::{Shape, SurfaceHit};
use crate::spectrum::Spectrum;
use crate::{Float, Point2f, Ray};
use anyhow::Context;
use std::sync::Arc;

/// Numeric policy constants. These are configuration, not derived
/// quantities; override any of them before rendering.
#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Russian-roulette continuation probability for indirect bounces.
    /// Default 0.8 (expected path depth 1 / (1 - 0.8) = 5).
    pub russian_roulette: Float,

    /// Slack when comparing a shadow ray's nearest hit distance against the
    /// distance to the sampled light point. Default 1e-3.
    pub shadow_epsilon: Float,

    /// Offset applied along the surface normal when spawning secondary rays,
    /// to avoid self-intersection. Default 1e-4.
    pub ray_offset: Float,

    /// Densities at or below this value short-circuit the indirect term
    /// instead of dividing by a near-zero pdf. Default 1e-6.
    pub pdf_epsilon: Float,

    /// Hard recursion cap guarding against stack exhaustion. Russian
    /// roulette terminates paths long before this in expectation, so the cap
    /// does not measurably alter the estimator. Default 64.
    pub max_depth: u16,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            russian_roulette: 0.8,
            shadow_epsilon: 1e-3,
            ray_offset: 1e-4,
            pdf_epsilon: 1e-6,
            max_depth: 64,
        }
    }
}

/// A point sampled on the scene's aggregate emissive surface.
pub struct LightSample {
    pub hit: SurfaceHit,
    pub emission: Spectrum,
    /// Area density over the full emissive surface; integrates to 1.
    pub pdf: Float,
}

/// Owns the shape and material arenas, the top-level BVH built over the
/// shapes, and the render configuration. Shapes and materials are assembled
/// once during setup; the BVH is built once after all shapes are added and
/// immutable thereafter.
#[derive(Default)]
pub struct Scene {
    shapes: Vec<Arc<dyn Shape>>,
    materials: Vec<Material>,
    aggregate: Option<Bvh<Arc<dyn Shape>>>,
    pub background: Spectrum,
    pub settings: RenderSettings,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    /// Adding a shape invalidates any previously built hierarchy.
    pub fn add_shape(&mut self, shape: Arc<dyn Shape>) {
        self.shapes.push(shape);
        self.aggregate = None;
    }

    /// Builds the top-level BVH over the current shape set, discarding any
    /// prior tree. Must complete before rendering starts.
    pub fn build(&mut self) {
        let _span = tracing::info_span!("bvh_build", n_shapes = self.shapes.len()).entered();
        self.aggregate = Some(Bvh::build(self.shapes.clone(), SplitMethod::EqualCounts));
        tracing::info!(n_shapes = self.shapes.len(), "built scene BVH");
    }

    pub fn is_built(&self) -> bool {
        self.aggregate.is_some()
    }

    /// Nearest intersection via the top-level BVH. Fails if `build` has not
    /// been called since the last shape was added.
    pub fn intersect(&self, ray: &Ray) -> anyhow::Result<Option<SurfaceInteraction>> {
        let bvh = self
            .aggregate
            .as_ref()
            .context("scene BVH not built; call Scene::build before rendering")?;
        Ok(bvh.intersect(ray))
    }

    /// Total area of emissive, non-degenerate surfaces.
    pub fn emissive_area(&self) -> Float {
        self.emissive_shapes().map(|s| s.area()).sum()
    }

    fn emissive_shapes(&self) -> impl Iterator<Item = &Arc<dyn Shape>> + '_ {
        // Zero-area (degenerate) geometry must never be selected as a light,
        // even when its material emits.
        self.shapes
            .iter()
            .filter(move |s| s.area() > 0.0 && self.material(s.material()).has_emission())
    }

    /// Draws one point on the aggregate emissive surface, area-proportionally
    /// across emitters: linear scan accumulating shape areas until `u_pick`
    /// scaled by the total falls inside one, then that shape's own uniform
    /// sampler. P(shape) * within-shape density = area/total * 1/area, so the
    /// final pdf is the uniform 1/total and integrates to 1.
    ///
    /// Returns `None` when the scene has no (non-degenerate) emitters.
    pub fn sample_light(&self, u_pick: Float, u_select: Float, u: Point2f) -> Option<LightSample> {
        let total_area = self.emissive_area();
        if total_area <= 0.0 {
            return None;
        }

        let target = u_pick.min(1.0 - 1e-6) * total_area;
        let mut accum = 0.0;
        for shape in self.emissive_shapes() {
            accum += shape.area();
            if target < accum {
                let (hit, _) = shape.sample(u_select, u);
                return Some(LightSample {
                    hit,
                    emission: self.material(shape.material()).emission,
                    pdf: 1.0 / total_area,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Triangle;
    use crate::{Point3f, Vec3f};
    use approx::assert_abs_diff_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn tri(scale: Float, offset: Float, material: MaterialId) -> Triangle {
        Triangle::new(
            Point3f::new(offset, 0.0, 0.0),
            Point3f::new(offset + scale, 0.0, 0.0),
            Point3f::new(offset, scale, 0.0),
            material,
        )
    }

    #[test]
    fn intersect_before_build_is_an_error() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::diffuse(Spectrum::uniform(0.5)));
        scene.add_shape(Arc::new(tri(1.0, 0.0, m)));

        let ray = Ray::new(Point3f::new(0.2, 0.2, 1.0), Vec3f::new(0.0, 0.0, -1.0));
        let err = scene.intersect(&ray).unwrap_err();
        assert!(err.to_string().contains("not built"));

        scene.build();
        assert!(scene.intersect(&ray).unwrap().is_some());
    }

    #[test]
    fn adding_shape_invalidates_bvh() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::diffuse(Spectrum::uniform(0.5)));
        scene.add_shape(Arc::new(tri(1.0, 0.0, m)));
        scene.build();
        assert!(scene.is_built());
        scene.add_shape(Arc::new(tri(1.0, 5.0, m)));
        assert!(!scene.is_built());
    }

    #[test]
    fn light_selection_is_area_proportional() {
        let mut scene = Scene::new();
        let emit = scene.add_material(Material::emissive(Spectrum::black(), Spectrum::uniform(1.0)));
        // areas 0.5 and 2.0, so selection should split 20% / 80%
        scene.add_shape(Arc::new(tri(1.0, 0.0, emit)));
        scene.add_shape(Arc::new(tri(2.0, 10.0, emit)));

        assert_abs_diff_eq!(scene.emissive_area(), 2.5);

        let mut rng = Xoshiro256Plus::seed_from_u64(21);
        let draws = 20_000;
        let mut small = 0u32;
        for _ in 0..draws {
            let s = scene
                .sample_light(rng.gen(), rng.gen(), Point2f::new(rng.gen(), rng.gen()))
                .expect("scene has emitters");
            assert_abs_diff_eq!(s.pdf, 1.0 / 2.5, epsilon = 1e-6);
            if s.hit.p.x < 5.0 {
                small += 1;
            }
        }
        let frac = small as Float / draws as Float;
        assert_abs_diff_eq!(frac, 0.2, epsilon = 0.02);
    }

    #[test]
    fn degenerate_emitters_are_excluded() {
        let mut scene = Scene::new();
        let emit = scene.add_material(Material::emissive(Spectrum::black(), Spectrum::uniform(1.0)));
        // collinear vertices: zero area
        scene.add_shape(Arc::new(Triangle::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
            emit,
        )));
        assert_eq!(scene.emissive_area(), 0.0);
        assert!(scene.sample_light(0.5, 0.5, Point2f::new(0.5, 0.5)).is_none());
    }

    #[test]
    fn no_emitters_yields_no_sample() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::diffuse(Spectrum::uniform(0.5)));
        scene.add_shape(Arc::new(tri(1.0, 0.0, m)));
        assert!(scene.sample_light(0.5, 0.5, Point2f::new(0.5, 0.5)).is_none());
    }
}
