//! Dithers driven by distance fields rather than a plain sweep.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use crate::color::ColorScheme;
use crate::hash::pixel_hash;
use crate::registry::Generator;
use crate::surface::{Path2d, Rgba, Surface};

use super::diffusion::{diffuse, ATKINSON};
use super::{clamp01, paint_binary, paint_pixels, pixel_count, sweep, Seeded};

/// Random point in the middle 40% of the canvas, x drawn first.
fn centre_point(seeded: &mut Seeded, size: u32) -> (f64, f64) {
    let s = f64::from(size);
    let x = (0.3 + seeded.next() * 0.4) * s;
    let y = (0.3 + seeded.next() * 0.4) * s;
    (x, y)
}

fn atkinson_blob(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let (cx0, cy0) = centre_point(&mut seeded, size);
    let (cx1, cy1) = centre_point(&mut seeded, size);
    let s = f64::from(size);
    let mut levels = Vec::with_capacity(pixel_count(size));
    for y in 0..size {
        for x in 0..size {
            let (x, y) = (f64::from(x), f64::from(y));
            let d0 = ((x - cx0).powi(2) + (y - cy0).powi(2)).sqrt() / s;
            let d1 = ((x - cx1).powi(2) + (y - cy1).powi(2)).sqrt() / s;
            levels.push(clamp01(1.0 - d0.min(d1) * 2.0) as f32);
        }
    }
    let lit = diffuse(levels, size, &ATKINSON);
    paint_binary(surface, size, &lit, fg, bg);
}

fn halftone_field(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let grid = (size / 16).max(4);
    let s = f64::from(size);

    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_fill_style(fg.into());
    for gy in (0..=size).step_by(grid as usize) {
        for gx in (0..=size).step_by(grid as usize) {
            let cx = f64::from(gx) + f64::from(grid) / 2.0;
            let cy = f64::from(gy) + f64::from(grid) / 2.0;
            let t = clamp01((cx / s - 0.5) * angle.cos() + (cy / s - 0.5) * angle.sin() + 0.5);
            let r = t * f64::from(grid) * 0.5;
            if r < 0.5 {
                continue;
            }
            let mut dot = Path2d::new();
            dot.arc(cx, cy, r, 0.0, TAU);
            surface.fill_path(&dot);
        }
    }
}

fn cross_hatch(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let spacing = (size / 24).max(2) as usize;
    let s = f64::from(size);

    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_stroke_style(Rgba::opaque(fg));
    surface.set_line_width(1.0);
    let size = i64::from(size);
    for a in [FRAC_PI_4, -FRAC_PI_4] {
        let (cos, sin) = (a.cos(), a.sin());
        for i in (-size..size * 2).step_by(spacing) {
            let i = i as f64;
            let t = clamp01((i / s - 0.5) * angle.cos() + 0.5);
            if t < 0.5 {
                continue;
            }
            let (px, py) = (i * cos, i * sin);
            let mut line = Path2d::new();
            line.move_to(px - sin * s * 2.0, py + cos * s * 2.0);
            line.line_to(px + sin * s * 2.0, py - cos * s * 2.0);
            surface.stroke_path(&line);
        }
    }
}

fn spiral_dither(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let (ocx, ocy) = centre_point(&mut seeded, size);
    let twist = 3.0 + seeded.next() * 5.0;
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let dx = (f64::from(x) - ocx) / s;
        let dy = (f64::from(y) - ocy) / s;
        let dist = (dx * dx + dy * dy).sqrt();
        let spiral = ((dy.atan2(dx) / (PI * 2.0) + dist * twist) % 1.0 + 1.0) % 1.0;
        if clamp01(1.0 - dist * 1.5) > spiral {
            fg
        } else {
            bg
        }
    });
}

fn blue_noise_dither(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let angle = seeded.next() * TAU;
    let (ocx, ocy) = centre_point(&mut seeded, size);
    let seed = seeded.h2();
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let dx = (f64::from(x) - ocx) / s;
        let dy = (f64::from(y) - ocy) / s;
        let radial = (1.0 - (dx * dx + dy * dy).sqrt() * 2.0).max(0.0);
        let t = clamp01((sweep(x, y, size, angle) + radial) / 2.0);
        if t > pixel_hash(x, y, seed) {
            fg
        } else {
            bg
        }
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("atkinson-blob", atkinson_blob),
        Generator::raster("halftone-field", halftone_field),
        Generator::raster("cross-hatch", cross_hatch),
        Generator::raster("spiral-dither", spiral_dither),
        Generator::raster("blue-noise-dither", blue_noise_dither),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn blob_centres_are_lit() {
        let image = testing::render(atkinson_blob, 32, "evilrabbit");
        let mut seeded = Seeded::new("evilrabbit");
        let (fg, _) = seeded.colors(ColorScheme::OklchMono);
        let (cx, cy) = centre_point(&mut seeded, 32);
        let pixel = image.pixel_at(cx as u32, cy as u32);
        assert_eq!([pixel[0], pixel[1], pixel[2]], fg);
    }

    #[test]
    fn vector_variants_leave_background_visible() {
        for generator in [halftone_field as crate::raster::RasterFn, cross_hatch] {
            let image = testing::render(generator, 48, "evilrabbit");
            assert!(testing::distinct_colors(&image) >= 2);
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 24);
        }
    }
}
