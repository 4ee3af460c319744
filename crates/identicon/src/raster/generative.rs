//! Simulations and plotted curves.

use std::f64::consts::PI;

use crate::color::{lerp_rgb, oklch_to_rgb, ColorScheme};
use crate::registry::Generator;
use crate::surface::{LineCap, LineJoin, Path2d, Rgba, Surface};

use super::{paint_pixels, Seeded};

/// Gray-Scott parameters: feed, kill and the two diffusion rates.
const FEED: f64 = 0.055;
const KILL: f64 = 0.062;
const DIFFUSE_A: f64 = 1.0;
const DIFFUSE_B: f64 = 0.5;
const REACTION_STEPS: usize = 200;

/// Two-chemical field on a torus, stored at single precision.
struct GrayScott {
    n: usize,
    a: Vec<f32>,
    b: Vec<f32>,
}

impl GrayScott {
    fn new(n: usize) -> Self {
        Self {
            n,
            a: vec![1.0; n * n],
            b: vec![0.0; n * n],
        }
    }

    /// Fills a 9x9 square of `b` centred on `(sx, sy)`, wrapping at the edges.
    fn seed_spot(&mut self, sx: usize, sy: usize) {
        let n = self.n as isize;
        for dy in -4..=4isize {
            for dx in -4..=4isize {
                let x = (sx as isize + dx).rem_euclid(n) as usize;
                let y = (sy as isize + dy).rem_euclid(n) as usize;
                self.b[y * self.n + x] = 1.0;
            }
        }
    }

    fn laplace(&self, field: &[f32], x: usize, y: usize) -> f64 {
        let n = self.n;
        let at = |x: usize, y: usize| f64::from(field[y * n + x]);
        at((x + n - 1) % n, y) + at((x + 1) % n, y) + at(x, (y + n - 1) % n) + at(x, (y + 1) % n)
            - 4.0 * at(x, y)
    }

    fn step(&mut self) {
        let n = self.n;
        let mut next_a = vec![0.0f32; n * n];
        let mut next_b = vec![0.0f32; n * n];
        for y in 0..n {
            for x in 0..n {
                let i = y * n + x;
                let (a, b) = (f64::from(self.a[i]), f64::from(self.b[i]));
                let abb = a * b * b;
                let da = DIFFUSE_A * self.laplace(&self.a, x, y) - abb + FEED * (1.0 - a);
                let db = DIFFUSE_B * self.laplace(&self.b, x, y) + abb - (KILL + FEED) * b;
                next_a[i] = (a + da).clamp(0.0, 1.0) as f32;
                next_b[i] = (b + db).clamp(0.0, 1.0) as f32;
            }
        }
        self.a = next_a;
        self.b = next_b;
    }
}

fn reaction_diffusion(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let n = size as usize;
    let mut field = GrayScott::new(n);
    for _ in 0..5 + seeded.h1() % 5 {
        let sx = (seeded.next() * n as f64).floor() as usize;
        let sy = (seeded.next() * n as f64).floor() as usize;
        field.seed_spot(sx, sy);
    }
    for _ in 0..REACTION_STEPS {
        field.step();
    }
    paint_pixels(surface, size, |x, y| {
        let i = y as usize * n + x as usize;
        let t = (f64::from(field.a[i]) - f64::from(field.b[i])).clamp(0.0, 1.0);
        lerp_rgb(bg, fg, t)
    });
}

fn ascii_matrix(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let line_height = (size / 24).max(4);
    let block_width = ((f64::from(line_height) * 0.6).floor() as u32).max(2);
    let glyph_height = (f64::from(line_height) * 0.7).floor();
    surface.set_fill_style(fg.into());
    for line in 0..size / line_height {
        let indent = (seeded.next() * s * 0.3).floor();
        let len = (seeded.next() * (s - indent) * 0.8 + s * 0.1).floor();
        let y = f64::from(line * line_height);
        let mut x = indent;
        while x < indent + len && x < s {
            let glyph_width = f64::from(block_width) + (seeded.next() * 2.0).floor();
            if seeded.next() > 0.15 {
                let top = y + ((f64::from(line_height) - glyph_height) / 2.0).floor();
                surface.fill_rect(x, top, glyph_width - 1.0, glyph_height);
            }
            x += glyph_width + 1.0;
        }
    }
}

fn barcode(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    let (mut x, mut bar) = (0.0, false);
    while x < s {
        let width = 1.0 + seeded.next() * 2.5;
        surface.set_fill_style(if bar { fg } else { bg }.into());
        surface.fill_rect(x.round(), 0.0, width.round().max(1.0), s);
        x += width;
        bar = !bar;
    }
}

fn flow_field(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let freq = 0.003 + seeded.next() * 0.005;
    let (phase_x, phase_y) = (f64::from(seeded.h1()) * 0.0001, f64::from(seeded.h2()) * 0.0001);
    let heading =
        |x: f64, y: f64| (x * freq + phase_x).sin() * (y * freq + phase_y).cos() * PI * 4.0;
    let count = 20 + (seeded.next() * 15.0).floor() as u32;

    surface.set_stroke_style(Rgba::new(fg, 0.6));
    surface.set_line_width((s / 200.0).max(0.5));
    surface.set_line_cap(LineCap::Round);
    for _ in 0..count {
        let mut px = seeded.next() * s;
        let mut py = seeded.next() * s;
        let mut streamline = Path2d::new();
        streamline.move_to(px, py);
        for _ in 0..120 {
            let a = heading(px, py);
            px += a.cos() * 2.0;
            py += a.sin() * 2.0;
            if px < 0.0 || px > s || py < 0.0 || py > s {
                break;
            }
            streamline.line_to(px, py);
        }
        surface.stroke_path(&streamline);
    }
}

fn lissajous(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let a = f64::from(1 + seeded.h1() % 5);
    let b = f64::from(1 + seeded.h2() % 5);
    let delta = f64::from(seeded.h1() % 8) * PI / 8.0;
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_stroke_style(fg.into());
    surface.set_line_width((s / 128.0).max(1.0));
    surface.set_line_join(LineJoin::Round);

    let r = s / 2.0 - s * 0.1;
    let steps = 2000;
    let mut curve = Path2d::new();
    for i in 0..=steps {
        let t = f64::from(i) / f64::from(steps) * PI * 2.0;
        curve.line_to(s / 2.0 + r * (a * t + delta).sin(), s / 2.0 + r * (b * t).sin());
    }
    surface.stroke_path(&curve);
}

fn topographic_contours(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let offsets = seeded.rng.take::<3>().map(|v| v * 100.0);
    let layers = [(0.015, 1.0), (0.03, 0.5), (0.055, 0.25)];
    let bands = 5.0;
    paint_pixels(surface, size, |px, py| {
        let (px, py) = (f64::from(px), f64::from(py));
        let height: f64 = layers
            .iter()
            .zip(offsets)
            .map(|(&(freq, amp), offset)| {
                amp * ((px * freq + offset).sin() * (py * freq + offset).cos())
            })
            .sum();
        let band = (((height / 1.75 + 1.0) / 2.0) * bands).floor();
        let t = (band + 0.5) / bands;
        oklch_to_rgb(0.3 + t * 0.5, 0.22, (hue + band * 30.0) % 360.0)
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("reaction-diffusion", reaction_diffusion),
        Generator::raster("ascii-matrix", ascii_matrix),
        Generator::raster("barcode", barcode),
        Generator::raster("flow-field", flow_field),
        Generator::raster("lissajous", lissajous),
        Generator::raster("topographic-contours", topographic_contours),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn gray_scott_stays_in_unit_range() {
        let mut field = GrayScott::new(16);
        field.seed_spot(0, 0);
        // The spot wraps across both edges.
        assert_eq!(field.b[15 * 16 + 15], 1.0);
        for _ in 0..20 {
            field.step();
        }
        assert!(field.a.iter().chain(&field.b).all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn uniform_field_is_unchanged_by_laplacian() {
        let field = GrayScott::new(8);
        assert_eq!(field.laplace(&field.a, 3, 3), 0.0);
    }

    #[test]
    fn barcode_columns_are_solid() {
        let image = testing::render(barcode, 32, "evilrabbit");
        for x in 0..32 {
            let top = image.pixel_at(x, 0);
            assert!((1..32).all(|y| image.pixel_at(x, y) == top));
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
