//! CPU generators that paint straight into a [`Surface`].
//!
//! Every generator follows the same shape: hash the value, open the random
//! stream on the first digest half, derive colours, then paint. The order in
//! which each generator pulls from its stream is part of its output.

pub(crate) mod algorithmic;
pub(crate) mod bayer;
pub(crate) mod diffusion;
pub(crate) mod generative;
pub(crate) mod nature;
pub(crate) mod organic;
pub(crate) mod pattern;
pub(crate) mod retro;
pub(crate) mod striking;
pub(crate) mod terminal;
pub(crate) mod textile;

use crate::color::{get_colors, ColorScheme, Rgb};
use crate::hash::{derive_hue, hash_string, Digest, Rng};
use crate::surface::{ImageData, Surface};

/// Signature shared by every raster generator.
pub type RasterFn = fn(&mut dyn Surface, u32, &str, ColorScheme);

/// Per-call derivations most generators start from.
pub(crate) struct Seeded {
    pub digest: Digest,
    pub rng: Rng,
}

impl Seeded {
    pub fn new(value: &str) -> Self {
        let digest = hash_string(value);
        Self {
            digest,
            rng: digest.rng(),
        }
    }

    pub fn colors(&self, scheme: ColorScheme) -> (Rgb, Rgb) {
        get_colors(self.digest, scheme)
    }

    pub fn hue(&self) -> f64 {
        f64::from(derive_hue(self.digest))
    }

    pub fn next(&mut self) -> f64 {
        self.rng.next_f64()
    }

    pub fn h1(&self) -> u32 {
        self.digest.h1
    }

    pub fn h2(&self) -> u32 {
        self.digest.h2
    }
}

/// Row-major index of pixel `(x, y)` in a `size` x `size` image.
pub(crate) fn pixel_index(x: u32, y: u32, size: u32) -> usize {
    y as usize * size as usize + x as usize
}

/// Pixels in a `size` x `size` image.
pub(crate) fn pixel_count(size: u32) -> usize {
    size as usize * size as usize
}

pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Linear gradient position of a pixel along `angle`, centred on the image.
pub(crate) fn sweep(x: u32, y: u32, size: u32, angle: f64) -> f64 {
    let s = f64::from(size);
    clamp01((f64::from(x) / s - 0.5) * angle.cos() + (f64::from(y) / s - 0.5) * angle.sin() + 0.5)
}

/// Evaluates `shade` for every pixel in row-major order and writes the
/// result as one opaque image.
pub(crate) fn paint_pixels(
    surface: &mut dyn Surface,
    size: u32,
    mut shade: impl FnMut(u32, u32) -> Rgb,
) {
    let mut image = ImageData::new(size, size);
    for y in 0..size {
        for x in 0..size {
            image.set_pixel(pixel_index(x, y, size), shade(x, y));
        }
    }
    surface.put_image_data(&image, 0, 0);
}

/// Ordered dither: `fg` wherever the sweep along `angle` exceeds the
/// per-pixel threshold.
pub(crate) fn threshold_sweep(
    surface: &mut dyn Surface,
    size: u32,
    angle: f64,
    (fg, bg): (Rgb, Rgb),
    mut threshold: impl FnMut(u32, u32) -> f64,
) {
    paint_pixels(surface, size, |x, y| {
        if sweep(x, y, size, angle) > threshold(x, y) {
            fg
        } else {
            bg
        }
    });
}

/// Writes a two-colour image from a row-major mask, `fg` where it is set.
pub(crate) fn paint_binary(surface: &mut dyn Surface, size: u32, on: &[bool], fg: Rgb, bg: Rgb) {
    let mut image = ImageData::new(size, size);
    for (i, &lit) in on.iter().enumerate() {
        image.set_pixel(i, if lit { fg } else { bg });
    }
    surface.put_image_data(&image, 0, 0);
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::color::ColorScheme;
    use crate::surface::{ImageData, SkiaSurface, Surface};

    use super::RasterFn;

    pub fn render(generator: RasterFn, size: u32, value: &str) -> ImageData {
        let mut surface = SkiaSurface::new(size, size).unwrap();
        generator(&mut surface, size, value, ColorScheme::OklchMono);
        surface.image_data()
    }

    /// Runs a generator twice per value and checks the output is stable and
    /// fully opaque.
    pub fn assert_deterministic_and_opaque(generator: RasterFn, size: u32) {
        for value in ["evilrabbit", "a", "", "ünïcødé"] {
            let first = render(generator, size, value);
            let second = render(generator, size, value);
            assert_eq!(first, second, "output changed between runs for {value:?}");
            let transparent = first.data().chunks_exact(4).filter(|p| p[3] != 255).count();
            assert_eq!(transparent, 0, "{transparent} pixels left transparent for {value:?}");
        }
    }

    pub fn distinct_colors(image: &ImageData) -> usize {
        let mut seen: Vec<[u8; 4]> = image
            .data()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_index_is_row_major() {
        assert_eq!(pixel_index(3, 2, 10), 23);
        assert_eq!(pixel_count(10), 100);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn pixel_index_does_not_wrap_past_u32() {
        assert_eq!(pixel_index(5, 70_000, 70_000), 4_900_000_005);
        assert_eq!(pixel_count(70_000), 4_900_000_000);
    }
}
