//! Error-diffusion dithering of a linear sweep.
//!
//! Each algorithm is nothing more than its kernel: the offsets that receive a
//! share of the quantisation error and the divisor that normalises them.
//! Contributions falling outside the image are dropped.

use crate::color::ColorScheme;
use crate::registry::Generator;
use crate::surface::Surface;

use super::{paint_binary, pixel_count, sweep, Seeded};

/// `(dx, dy, weight)` taps plus the shared divisor.
pub(crate) struct Kernel {
    pub taps: &'static [(i32, u32, f64)],
    pub divisor: f64,
}

pub(crate) const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)],
    divisor: 16.0,
};

pub(crate) const ATKINSON: Kernel = Kernel {
    taps: &[
        (1, 0, 1.0),
        (2, 0, 1.0),
        (-1, 1, 1.0),
        (0, 1, 1.0),
        (1, 1, 1.0),
        (0, 2, 1.0),
    ],
    divisor: 8.0,
};

pub(crate) const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    taps: &[
        (1, 0, 7.0),
        (2, 0, 5.0),
        (-2, 1, 3.0),
        (-1, 1, 5.0),
        (0, 1, 7.0),
        (1, 1, 5.0),
        (2, 1, 3.0),
        (-2, 2, 1.0),
        (-1, 2, 3.0),
        (0, 2, 5.0),
        (1, 2, 3.0),
        (2, 2, 1.0),
    ],
    divisor: 48.0,
};

pub(crate) const SIERRA: Kernel = Kernel {
    taps: &[
        (1, 0, 5.0),
        (2, 0, 3.0),
        (-2, 1, 2.0),
        (-1, 1, 4.0),
        (0, 1, 5.0),
        (1, 1, 4.0),
        (2, 1, 2.0),
        (-1, 2, 2.0),
        (0, 2, 3.0),
        (1, 2, 2.0),
    ],
    divisor: 32.0,
};

pub(crate) const STUCKI: Kernel = Kernel {
    taps: &[
        (1, 0, 8.0),
        (2, 0, 4.0),
        (-2, 1, 2.0),
        (-1, 1, 4.0),
        (0, 1, 8.0),
        (1, 1, 4.0),
        (2, 1, 2.0),
        (-2, 2, 1.0),
        (-1, 2, 2.0),
        (0, 2, 4.0),
        (1, 2, 2.0),
        (2, 2, 1.0),
    ],
    divisor: 42.0,
};

/// Quantises `levels` (row-major, `size` wide) to on/off, spreading the error
/// with `kernel`. The working buffer is single precision.
pub(crate) fn diffuse(mut levels: Vec<f32>, size: u32, kernel: &Kernel) -> Vec<bool> {
    let n = size as i64;
    let mut out = vec![false; levels.len()];
    for y in 0..n {
        for x in 0..n {
            let i = (y * n + x) as usize;
            let level = f64::from(levels[i]);
            let lit = level >= 0.5;
            out[i] = lit;
            let error = level - if lit { 1.0 } else { 0.0 };
            for &(dx, dy, weight) in kernel.taps {
                let (nx, ny) = (x + i64::from(dx), y + i64::from(dy));
                if nx < 0 || nx >= n || ny >= n {
                    continue;
                }
                let j = (ny * n + nx) as usize;
                levels[j] = (f64::from(levels[j]) + error * weight / kernel.divisor) as f32;
            }
        }
    }
    out
}

fn sweep_levels(size: u32, angle: f64) -> Vec<f32> {
    let mut levels = Vec::with_capacity(pixel_count(size));
    for y in 0..size {
        for x in 0..size {
            levels.push(sweep(x, y, size, angle) as f32);
        }
    }
    levels
}

fn render_with(
    surface: &mut dyn Surface,
    size: u32,
    value: &str,
    scheme: ColorScheme,
    kernel: &Kernel,
) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * std::f64::consts::TAU;
    let lit = diffuse(sweep_levels(size, angle), size, kernel);
    paint_binary(surface, size, &lit, fg, bg);
}

fn floyd_steinberg(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    render_with(surface, size, value, scheme, &FLOYD_STEINBERG);
}

fn atkinson(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    render_with(surface, size, value, scheme, &ATKINSON);
}

fn jarvis_judice_ninke(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    render_with(surface, size, value, scheme, &JARVIS_JUDICE_NINKE);
}

fn sierra(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    render_with(surface, size, value, scheme, &SIERRA);
}

fn stucki(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    render_with(surface, size, value, scheme, &STUCKI);
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("floyd-steinberg", floyd_steinberg),
        Generator::raster("atkinson", atkinson),
        Generator::raster("jarvis-judice-ninke", jarvis_judice_ninke),
        Generator::raster("sierra", sierra),
        Generator::raster("stucki", stucki),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn kernels_distribute_whole_error_except_atkinson() {
        for kernel in [&FLOYD_STEINBERG, &JARVIS_JUDICE_NINKE, &SIERRA, &STUCKI] {
            let total: f64 = kernel.taps.iter().map(|t| t.2).sum();
            assert_eq!(total, kernel.divisor);
        }
        let atkinson: f64 = ATKINSON.taps.iter().map(|t| t.2).sum();
        assert_eq!(atkinson / ATKINSON.divisor, 0.75);
    }

    #[test]
    fn flat_mid_grey_dithers_to_roughly_half_coverage() {
        let size = 16;
        let lit = diffuse(vec![0.5; 256], size, &FLOYD_STEINBERG);
        let count = lit.iter().filter(|&&b| b).count();
        assert!((100..=156).contains(&count), "coverage {count}");
    }

    #[test]
    fn edge_contributions_are_dropped_not_wrapped() {
        // Right-hand taps from the last column would land on the next row's
        // first pixel if the buffer wrapped, pushing it over the threshold.
        let size = 4;
        let mut levels = vec![0.0f32; 16];
        levels[3] = 0.45;
        levels[4] = 0.45;
        let lit = diffuse(levels, size, &STUCKI);
        assert!(!lit[4]);
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            let raster = generator.as_raster().unwrap();
            testing::assert_deterministic_and_opaque(raster, 24);
        }
    }
}
