//! Threshold patterns other than Bayer: noise, lines, rings and tiles.

use std::f64::consts::{PI, TAU};

use crate::color::ColorScheme;
use crate::hash::{pixel_hash, Rng};
use crate::registry::Generator;
use crate::surface::Surface;

use super::{threshold_sweep, Seeded};

const HALFTONE: [[u32; 4]; 4] = [[12, 5, 6, 13], [4, 0, 1, 7], [11, 3, 2, 8], [15, 10, 9, 14]];

const CROSS: [[u32; 4]; 4] = [[11, 6, 8, 13], [5, 0, 1, 7], [9, 2, 3, 10], [15, 4, 12, 14]];

fn matrix_level(matrix: &[[u32; 4]; 4], x: u32, y: u32) -> f64 {
    f64::from(matrix[(y % 4) as usize][(x % 4) as usize]) / 16.0
}

fn white_noise(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let mut noise = Rng::new(seeded.h2());
    threshold_sweep(surface, size, angle, colors, |_, _| noise.next_f64());
}

fn blue_noise(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let seed = seeded.h1();
    threshold_sweep(surface, size, angle, colors, |x, y| pixel_hash(x, y, seed));
}

fn halftone_dots(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, colors, |x, y| matrix_level(&HALFTONE, x, y));
}

fn diagonal_line(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let cell = 4;
    threshold_sweep(surface, size, angle, colors, |x, y| {
        f64::from((x + y) % cell) / f64::from(cell)
    });
}

fn horizontal_line(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let cell = if size <= 32 { 3 } else { 4 };
    threshold_sweep(surface, size, angle, colors, |_, y| {
        f64::from(y % cell) / f64::from(cell)
    });
}

fn spiral(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let twist = 2.0 + seeded.next() * 4.0;
    let s = f64::from(size);
    threshold_sweep(surface, size, angle, colors, |x, y| {
        let (dx, dy) = (f64::from(x) / s - 0.5, f64::from(y) / s - 0.5);
        let a = dy.atan2(dx);
        let dist = (dx * dx + dy * dy).sqrt();
        ((a / (PI * 2.0) + dist * twist) % 1.0 + 1.0) % 1.0
    });
}

fn radial(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let s = f64::from(size);
    let cx = s * (0.3 + seeded.next() * 0.4);
    let cy = s * (0.3 + seeded.next() * 0.4);
    let rings = if size <= 32 { 6.0 } else { 10.0 };
    threshold_sweep(surface, size, angle, colors, |x, y| {
        let d = (f64::from(x) - cx).hypot(f64::from(y) - cy) / s;
        (d * rings) % 1.0
    });
}

fn checkerboard(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, colors, |x, y| {
        f64::from((x + y) % 2) / 2.0 + 0.25
    });
}

fn cross(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    threshold_sweep(surface, size, angle, colors, |x, y| matrix_level(&CROSS, x, y));
}

fn diamond(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let cell = 6u32;
    let half = f64::from(cell) / 2.0;
    threshold_sweep(surface, size, angle, colors, |x, y| {
        let cx = f64::from(x % cell) - half + 0.5;
        let cy = f64::from(y % cell) - half + 0.5;
        (cx.abs() + cy.abs()) / f64::from(cell)
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("white-noise", white_noise),
        Generator::raster("blue-noise", blue_noise),
        Generator::raster("halftone-dots", halftone_dots),
        Generator::raster("diagonal-line", diagonal_line),
        Generator::raster("horizontal-line", horizontal_line),
        Generator::raster("spiral", spiral),
        Generator::raster("radial", radial),
        Generator::raster("checkerboard", checkerboard),
        Generator::raster("cross", cross),
        Generator::raster("diamond", diamond),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn halftone_and_cross_matrices_cover_every_level() {
        for matrix in [&HALFTONE, &CROSS] {
            let mut values: Vec<u32> = matrix.iter().flatten().copied().collect();
            values.sort_unstable();
            assert_eq!(values, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn white_and_blue_noise_differ_for_the_same_value() {
        let white = testing::render(white_noise, 24, "evilrabbit");
        let blue = testing::render(blue_noise, 24, "evilrabbit");
        assert_ne!(white, blue);
        assert_eq!(testing::distinct_colors(&white), 2);
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 20);
        }
    }
}
