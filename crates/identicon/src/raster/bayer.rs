//! Ordered dithering of a linear sweep against Bayer threshold matrices.

use std::f64::consts::TAU;

use crate::color::{hsl, oklch_to_rgb, ColorScheme};
use crate::registry::Generator;
use crate::surface::Surface;

use super::{threshold_sweep, Seeded};

pub(crate) const BAYER_2: [[u32; 2]; 2] = [[0, 2], [3, 1]];

pub(crate) const BAYER_4: [[u32; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Builds the 8x8 matrix by recursive interleaving of quadrant indices.
pub(crate) fn bayer_8() -> [[u32; 8]; 8] {
    let mut matrix = [[0; 8]; 8];
    for (y, row) in matrix.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            let (mut xc, mut yc, mut s, mut v) = (x as u32, y as u32, 8u32, 0u32);
            while s > 1 {
                s >>= 1;
                v <<= 2;
                let xb = u32::from(xc >= s);
                let yb = u32::from(yc >= s);
                v |= (xb ^ yb) | (yb << 1);
                xc %= s;
                yc %= s;
            }
            *cell = v;
        }
    }
    matrix
}

fn bayer_4_threshold(x: u32, y: u32) -> f64 {
    f64::from(BAYER_4[(y % 4) as usize][(x % 4) as usize]) / 16.0
}

fn bayer_2x2(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), |x, y| {
        f64::from(BAYER_2[(y % 2) as usize][(x % 2) as usize]) / 4.0
    });
}

fn bayer_4x4(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), bayer_4_threshold);
}

/// Fixed HSL triadic pair regardless of the requested scheme.
fn bayer_4x4_hsl_triadic(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let fg = hsl(hue, 95.0, 50.0);
    let bg = hsl((hue + 120.0) % 360.0, 95.0, 50.0);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), bayer_4_threshold);
}

/// Fixed OKLCH mono pair regardless of the requested scheme.
fn bayer_4x4_oklch_mono(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let fg = oklch_to_rgb(0.8, 0.18, hue);
    let bg = oklch_to_rgb(0.45, 0.18, hue);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), bayer_4_threshold);
}

fn bayer_4x4_1_5x(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), |x, y| {
        let row = (f64::from(y) / 1.5).floor() as usize % 4;
        let col = (f64::from(x) / 1.5).floor() as usize % 4;
        f64::from(BAYER_4[row][col]) / 16.0
    });
}

fn bayer_4x4_2x(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, (fg, bg), |x, y| {
        f64::from(BAYER_4[(y / 2 % 4) as usize][(x / 2 % 4) as usize]) / 16.0
    });
}

fn bayer_8x8(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let matrix = bayer_8();
    threshold_sweep(surface, size, angle, (fg, bg), |x, y| {
        f64::from(matrix[(y % 8) as usize][(x % 8) as usize]) / 64.0
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("bayer-2x2", bayer_2x2),
        Generator::raster("bayer-4x4", bayer_4x4),
        Generator::raster("bayer-4x4-hsl-triadic", bayer_4x4_hsl_triadic),
        Generator::raster("bayer-4x4-oklch-mono", bayer_4x4_oklch_mono),
        Generator::raster("bayer-4x4-1-5x", bayer_4x4_1_5x),
        Generator::raster("bayer-4x4-2x", bayer_4x4_2x),
        Generator::raster("bayer-8x8", bayer_8x8),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::get_colors;
    use crate::hash::hash_string;
    use crate::raster::testing;
    use crate::raster::sweep;
    use crate::surface::SkiaSurface;

    #[test]
    fn bayer_8_is_a_permutation_of_0_to_63() {
        let mut values: Vec<u32> = bayer_8().iter().flatten().copied().collect();
        values.sort_unstable();
        assert_eq!(values, (0..64).collect::<Vec<_>>());
        assert_eq!(bayer_8()[0][0], 0);
        assert_eq!(bayer_8()[0][..4], [0, 1, 4, 5]);
        assert_eq!(bayer_8()[1][..4], [3, 2, 7, 6]);
    }

    #[test]
    fn top_left_cell_at_zero_rotation_is_background() {
        // At angle 0 the sweep at (0, 0) is exactly 0, which never exceeds the
        // 0/16 threshold in the top-left cell.
        let fg = [255, 255, 255];
        let bg = [0, 0, 0];
        let mut surface = SkiaSurface::new(4, 4).unwrap();
        threshold_sweep(&mut surface, 4, 0.0, (fg, bg), bayer_4_threshold);
        let image = surface.image_data();
        assert_eq!(sweep(0, 0, 4, 0.0), 0.0);
        assert_eq!(image.pixel_at(0, 0), [0, 0, 0, 255]);
        // Column 3 sweeps to 0.75, above the 10/16 threshold of row 0.
        assert_eq!(image.pixel_at(3, 0), [255, 255, 255, 255]);
        // (1, 0) sweeps to 0.25, below 8/16.
        assert_eq!(image.pixel_at(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn oklch_mono_variant_uses_only_its_two_colours() {
        let image = testing::render(bayer_4x4_oklch_mono, 32, "evilrabbit");
        let (fg, bg) = get_colors(hash_string("evilrabbit"), ColorScheme::OklchMono);
        for pixel in image.data().chunks_exact(4) {
            let rgb = [pixel[0], pixel[1], pixel[2]];
            assert!(rgb == fg || rgb == bg);
        }
        assert_eq!(testing::distinct_colors(&image), 2);
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 20);
        }
    }
}
