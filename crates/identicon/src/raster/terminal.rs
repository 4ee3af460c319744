//! Fixed-palette looks borrowed from CRTs, teletext and the demoscene. These
//! ignore the requested colour scheme.

use std::f64::consts::PI;

use crate::color::{hsl, ColorScheme, Rgb};
use crate::hash::get_bits;
use crate::registry::Generator;
use crate::surface::{Paint, RadialGradient, Rgba, Surface};

use super::{paint_pixels, Seeded};

const ANSI: [Rgb; 15] = [
    [170, 0, 0],
    [0, 170, 0],
    [170, 85, 0],
    [0, 0, 170],
    [170, 0, 170],
    [0, 170, 170],
    [170, 170, 170],
    [85, 85, 85],
    [255, 85, 85],
    [85, 255, 85],
    [255, 255, 85],
    [85, 85, 255],
    [255, 85, 255],
    [85, 255, 255],
    [255, 255, 255],
];

const CEEFAX: [Rgb; 7] = [
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
    [0, 0, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 255],
];

fn phosphor_grid(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let bits = get_bits(seeded.digest, 64);
    let green = seeded.h1() % 2 == 1;
    let (bright, dim): (Rgb, Rgb) = if green {
        ([0, 255, 65], [0, 40, 8])
    } else {
        ([255, 176, 0], [40, 28, 0])
    };
    let grid = if size <= 32 { 5 } else { 7 };
    let cell = f64::from(size) / f64::from(grid);

    paint_pixels(surface, size, |_, _| dim);
    for row in 0..grid {
        for col in 0..grid {
            let on = bits[((row * grid + col) as usize) % bits.len()] == 1;
            let cx = f64::from(col) * cell + cell / 2.0;
            let cy = f64::from(row) * cell + cell / 2.0;
            let r = cell * 0.35;
            if on {
                surface.set_fill_style(Paint::Radial(RadialGradient {
                    cx,
                    cy,
                    inner_radius: r * 0.1,
                    outer_radius: r * 2.2,
                    stops: vec![
                        (0.0, Rgba::new(bright, 0.95)),
                        (0.35, Rgba::new(bright, 0.25)),
                        (1.0, Rgba::new(bright, 0.0)),
                    ],
                }));
                surface.fill_rect(cx - r * 2.2, cy - r * 2.2, r * 4.4, r * 4.4);
                surface.set_fill_style(bright.into());
                surface.fill_rect(cx - r, cy - r, r * 2.0, r * 2.0);
            } else {
                let v = 0.3 + seeded.next() * 0.3;
                surface.set_fill_style(Rgba::new(bright, v * 0.15).into());
                surface.fill_rect(f64::from(col) * cell, f64::from(row) * cell, cell, cell);
            }
        }
    }

    // Scanlines.
    surface.set_fill_style(Rgba::new([0, 0, 0], 0.18).into());
    for y in (0..size).step_by(2) {
        surface.fill_rect(0.0, f64::from(y), f64::from(size), 1.0);
    }
}

fn ansi_quilt(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let grid = if size <= 32 { 4 } else { 8 };
    let cell = f64::from(size) / f64::from(grid);
    for row in 0..grid {
        for col in 0..grid {
            let index = (seeded.next() * ANSI.len() as f64).floor() as usize;
            surface.set_fill_style(ANSI[index].into());
            surface.fill_rect(f64::from(col) * cell, f64::from(row) * cell, cell, cell);
        }
    }
}

fn teletext_mosaic(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let seeded = Seeded::new(value);
    let bits = get_bits(seeded.digest, 64);
    let s = f64::from(size);
    surface.set_fill_style(Paint::from([0, 0, 0x50]));
    surface.fill_rect(0.0, 0.0, s, s);

    let (cols, rows) = if size <= 32 { (6u32, 6u32) } else { (10, 9) };
    let cw = s / f64::from(cols);
    let ch = s / f64::from(rows);
    for row in 0..rows {
        for col in 0..cols {
            let cell_index = row * cols + col;
            if bits[cell_index as usize % bits.len()] == 0 {
                continue;
            }
            let (bw, bh) = (cw / 2.0, ch / 3.0);
            surface.set_fill_style(CEEFAX[cell_index as usize % CEEFAX.len()].into());
            // Sextant blocks in a fixed checker arrangement per cell.
            for sy in 0..3 {
                for sx in 0..2 {
                    if (cell_index + sy * 2 + sx) % 2 == 1 {
                        surface.fill_rect(
                            f64::from(col) * cw + f64::from(sx) * bw,
                            f64::from(row) * ch + f64::from(sy) * bh,
                            bw - 1.0,
                            bh - 1.0,
                        );
                    }
                }
            }
        }
    }
}

fn matrix_rain(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let cols = if size <= 32 { 8 } else { 16 };
    let col_width = f64::from(size) / f64::from(cols);
    let heads: Vec<u32> = (0..cols)
        .map(|_| (seeded.next() * f64::from(size)).floor() as u32)
        .collect();
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let head = heads[(f64::from(x) / col_width).floor() as usize];
        let dist = f64::from((head + size - y) % size);
        let brightness = if dist == 0.0 {
            255.0
        } else if dist < s * 0.25 {
            (200.0 * (1.0 - dist / (s * 0.25))).floor()
        } else {
            (20.0 * (1.0 - dist / s)).floor()
        };
        [0, brightness as u8, 0]
    });
}

fn raster_bars(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let offset = seeded.next() * PI * 2.0;
    let s = f64::from(size);
    let rows: Vec<Rgb> = (0..size)
        .map(|y| {
            let t = f64::from(y) / s;
            let h1 = (hue + (t * PI * 4.0 + offset).sin() * 60.0) % 360.0;
            let h2 = (hue + 120.0 + (t * PI * 6.0 + offset + 1.0).sin() * 40.0) % 360.0;
            let blend = ((t * PI * 3.0 + offset * 0.7).sin() + 1.0) / 2.0;
            let bar_hue = (h1 * (1.0 - blend) + h2 * blend + 360.0) % 360.0;
            let lightness = 40.0 + (t * PI * 8.0 + offset).sin() * 20.0;
            hsl(bar_hue, 90.0, lightness)
        })
        .collect();
    paint_pixels(surface, size, |_, y| rows[y as usize]);
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("phosphor-grid", phosphor_grid),
        Generator::raster("ansi-quilt", ansi_quilt),
        Generator::raster("teletext-mosaic", teletext_mosaic),
        Generator::raster("matrix-rain", matrix_rain),
        Generator::raster("raster-bars", raster_bars),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn ansi_quilt_only_uses_palette_colours() {
        let image = testing::render(ansi_quilt, 32, "evilrabbit");
        for pixel in image.data().chunks_exact(4) {
            assert!(ANSI.contains(&[pixel[0], pixel[1], pixel[2]]));
        }
    }

    #[test]
    fn matrix_rain_is_green_only() {
        let image = testing::render(matrix_rain, 32, "a");
        for pixel in image.data().chunks_exact(4) {
            assert_eq!((pixel[0], pixel[2]), (0, 0));
        }
        // Every column has exactly one full-brightness head.
        let heads = image.data().chunks_exact(4).filter(|p| p[1] == 255).count();
        assert_eq!(heads, 32);
    }

    #[test]
    fn raster_bars_are_horizontal() {
        let image = testing::render(raster_bars, 16, "evilrabbit");
        for y in 0..16 {
            let first = image.pixel_at(0, y);
            assert!((1..16).all(|x| image.pixel_at(x, y) == first));
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
