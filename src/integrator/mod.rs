use crate::camera::Camera;
use crate::film::Film;
use crate::geometry::bounds::Bounds2i;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{Point2i, Ray};
use indicatif::ProgressBar;
use rayon::prelude::*;

pub mod path;

pub use path::PathIntegrator;

const TILE_SIZE: i32 = 16;

/// A radiance estimator driven per camera ray by `SamplerIntegrator`.
pub trait IntegratorRadiance: Sync + Send {
    fn incident_radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u16,
    ) -> anyhow::Result<Spectrum>;
}

/// Tile-parallel render driver. Pixels are independent units of work: tiles
/// render concurrently into private film tiles against the read-only scene,
/// each with its own seeded sampler, and merge when done.
pub struct SamplerIntegrator<R: IntegratorRadiance> {
    pub camera: Box<dyn Camera>,
    pub radiance: R,
}

impl<R: IntegratorRadiance> SamplerIntegrator<R> {
    pub fn render(&self, scene: &Scene, film: &Film, sampler: &dyn Sampler) -> anyhow::Result<()> {
        anyhow::ensure!(scene.is_built(), "scene BVH not built; call Scene::build before rendering");

        let sample_bounds = film.sample_bounds();
        let n_tiles = sample_bounds.iter_tiles(TILE_SIZE).count() as u64;
        let progress = ProgressBar::new(n_tiles);

        let result = sample_bounds.iter_tiles(TILE_SIZE).par_bridge().try_for_each(|tile| {
            let tile_id = Self::tile_id(tile, sample_bounds);
            let mut tile_sampler = sampler.clone_with_seed(tile_id);
            let mut film_tile = film.get_film_tile(tile);

            for pixel in tile.iter_points() {
                for _ in 0..tile_sampler.samples_per_pixel() {
                    let camera_sample = tile_sampler.get_camera_sample(pixel);
                    let ray = self.camera.generate_ray(camera_sample);

                    let radiance = self.radiance.incident_radiance(
                        &ray,
                        scene,
                        tile_sampler.as_mut(),
                        0,
                    )?;
                    let radiance = check_radiance(radiance, pixel);

                    film_tile.add_sample(camera_sample.p_film, radiance);
                }
            }

            film.merge_film_tile(film_tile);
            progress.inc(1);
            Ok(())
        });
        progress.finish();
        result
    }

    pub fn render_with_pool(
        &self,
        scene: &Scene,
        film: &Film,
        sampler: &dyn Sampler,
        pool: &rayon::ThreadPool,
    ) -> anyhow::Result<()> {
        pool.install(|| self.render(scene, film, sampler))
    }

    fn tile_id(tile: Bounds2i, sample_bounds: Bounds2i) -> u64 {
        let n_cols = sample_bounds.max.x as u64;
        tile.min.y as u64 * n_cols + tile.min.x as u64
    }
}

/// A NaN or negative component reaching the film indicates a geometry or
/// sampling defect; clamp it out and report rather than propagating.
fn check_radiance(l: Spectrum, pixel: Point2i) -> Spectrum {
    if l.has_nans() || !l.is_finite() || l.has_negatives() {
        tracing::warn!(x = pixel.x, y = pixel.y, ?l, "invalid radiance value, clamping");
        l.map(|v| if v.is_finite() { v } else { 0.0 }).clamp_positive()
    } else {
        l
    }
}
