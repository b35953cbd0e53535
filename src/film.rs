use crate::geometry::bounds::Bounds2i;
use crate::spectrum::Spectrum;
use crate::{Float, Point2f, Point2i};
use anyhow::Context;
use parking_lot::Mutex;
use std::path::Path;

/// Accumulates per-pixel radiance samples. Workers render into private
/// `FilmTile`s and merge them back under a short-lived lock; no two samples
/// of the same tile ever race.
pub struct Film {
    pub full_resolution: Point2i,
    pixels: Mutex<Vec<Pixel>>,
}

#[derive(Default, Copy, Clone)]
struct Pixel {
    sum: Spectrum,
    n_samples: u32,
}

pub struct FilmTile {
    pixel_bounds: Bounds2i,
    pixels: Vec<Pixel>,
}

impl Film {
    pub fn new(resolution: Point2i) -> Self {
        Self {
            full_resolution: resolution,
            pixels: Mutex::new(vec![Pixel::default(); (resolution.x * resolution.y) as usize]),
        }
    }

    pub fn sample_bounds(&self) -> Bounds2i {
        Bounds2i::with_bounds(Point2i::new(0, 0), self.full_resolution)
    }

    pub fn get_film_tile(&self, pixel_bounds: Bounds2i) -> FilmTile {
        let pixel_bounds = pixel_bounds.intersection(&self.sample_bounds());
        FilmTile {
            pixel_bounds,
            pixels: vec![Pixel::default(); pixel_bounds.area() as usize],
        }
    }

    pub fn merge_film_tile(&self, tile: FilmTile) {
        let mut pixels = self.pixels.lock();
        let width = self.full_resolution.x;
        for (i, p) in tile.pixel_bounds.iter_points().enumerate() {
            let global = &mut pixels[(p.y * width + p.x) as usize];
            global.sum += tile.pixels[i].sum;
            global.n_samples += tile.pixels[i].n_samples;
        }
    }

    /// Average radiance per pixel in row-major order, plus the resolution.
    pub fn into_spectrum_buffer(self) -> (Vec<Spectrum>, (u32, u32)) {
        let pixels = self.pixels.into_inner();
        let buf = pixels
            .iter()
            .map(|px| {
                if px.n_samples > 0 {
                    px.sum / px.n_samples as Float
                } else {
                    Spectrum::black()
                }
            })
            .collect();
        (buf, (self.full_resolution.x as u32, self.full_resolution.y as u32))
    }

    /// Writes the averaged frame as an 8-bit gamma-encoded PNG.
    pub fn write_png(self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let (buf, (w, h)) = self.into_spectrum_buffer();
        let mut img = image::RgbImage::new(w, h);
        for (i, px) in img.pixels_mut().enumerate() {
            *px = image::Rgb(to_srgb_bytes(buf[i]));
        }
        img.save(path)
            .with_context(|| format!("failed to write image to {}", path.display()))
    }
}

impl FilmTile {
    pub fn add_sample(&mut self, p_film: Point2f, radiance: Spectrum) {
        let p = Point2i::new(p_film.x.floor() as i32, p_film.y.floor() as i32);
        let b = self.pixel_bounds;
        if p.x < b.min.x || p.x >= b.max.x || p.y < b.min.y || p.y >= b.max.y {
            return;
        }
        let width = b.max.x - b.min.x;
        let idx = ((p.y - b.min.y) * width + (p.x - b.min.x)) as usize;
        self.pixels[idx].sum += radiance;
        self.pixels[idx].n_samples += 1;
    }
}

fn to_srgb_bytes(s: Spectrum) -> [u8; 3] {
    let encode = |v: Float| (v.max(0.0).min(1.0).powf(1.0 / 2.2) * 255.0).round() as u8;
    let [r, g, b] = s.into_array();
    [encode(r), encode(g), encode(b)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tile_merge_averages_samples() {
        let film = Film::new(Point2i::new(4, 4));
        let bounds = Bounds2i::with_bounds(Point2i::new(0, 0), Point2i::new(4, 4));

        let mut tile = film.get_film_tile(bounds);
        tile.add_sample(Point2f::new(1.5, 2.5), Spectrum::uniform(1.0));
        tile.add_sample(Point2f::new(1.2, 2.8), Spectrum::uniform(3.0));
        film.merge_film_tile(tile);

        let (buf, (w, _)) = film.into_spectrum_buffer();
        assert_abs_diff_eq!(buf[(2 * w + 1) as usize].r, 2.0);
        assert!(buf[0].is_black());
    }

    #[test]
    fn srgb_encoding_clamps_and_gamma_corrects() {
        assert_eq!(to_srgb_bytes(Spectrum::new(0.0, 1.0, 2.0)), [0, 255, 255]);
        assert_eq!(to_srgb_bytes(Spectrum::uniform(-1.0)), [0, 0, 0]);
    }

    #[test]
    fn out_of_bounds_samples_are_dropped() {
        let film = Film::new(Point2i::new(2, 2));
        let mut tile = film.get_film_tile(film.sample_bounds());
        tile.add_sample(Point2f::new(-0.5, 0.5), Spectrum::uniform(1.0));
        tile.add_sample(Point2f::new(0.5, 2.5), Spectrum::uniform(1.0));
        film.merge_film_tile(tile);
        let (buf, _) = film.into_spectrum_buffer();
        assert!(buf.iter().all(|s| s.is_black()));
    }
}
