use crate::camera::CameraSample;
use crate::{Float, Point2f, Point2i};

pub mod random;

pub use random::RandomSampler;

/// Per-worker random sample source. Each render tile gets its own seeded
/// clone so parallel sampling is reproducible and shares no mutable state.
pub trait Sampler: Send + Sync {
    fn get_1d(&mut self) -> Float;

    fn get_2d(&mut self) -> Point2f;

    fn samples_per_pixel(&self) -> u32;

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler>;

    /// Raster pixel plus a sub-pixel offset drawn from this sampler. This is
    /// the seam where an external multisample pattern source plugs in.
    fn get_camera_sample(&mut self, p_raster: Point2i) -> CameraSample {
        let jitter = self.get_2d();
        CameraSample {
            p_film: Point2f::new(
                p_raster.x as Float + jitter.x,
                p_raster.y as Float + jitter.y,
            ),
        }
    }
}
