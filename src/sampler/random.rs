use crate::sampler::Sampler;
use crate::{Float, Point2f};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

pub struct RandomSampler {
    rng: Xoshiro256Plus,
    samples_per_pixel: u32,
    /// Kept so per-tile clones derive their streams from the user's seed.
    base_seed: u64,
}

impl RandomSampler {
    pub fn new_with_seed(samples_per_pixel: u32, seed: u64) -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(seed),
            samples_per_pixel,
            base_seed: seed,
        }
    }
}

impl Sampler for RandomSampler {
    fn get_1d(&mut self) -> Float {
        self.rng.gen()
    }

    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.gen(), self.rng.gen())
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler> {
        // Mix the per-tile seed with the base seed so different base seeds
        // yield different streams for the same tile.
        let mixed = self.base_seed ^ seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Box::new(Self {
            rng: Xoshiro256Plus::seed_from_u64(mixed),
            samples_per_pixel: self.samples_per_pixel,
            base_seed: self.base_seed,
        })
    }
}
