//! High-contrast geometric pieces: split channels, cells, superformula
//! outlines, and wave fields.

use std::f64::consts::PI;

use crate::color::{hsl, to_channel, ColorScheme, Rgb};
use crate::registry::Generator;
use crate::surface::{Composite, Path2d, Surface};

use super::{paint_pixels, sweep, Seeded};

const GLASS: [Rgb; 8] = [
    [255, 50, 80],
    [50, 200, 255],
    [255, 200, 0],
    [120, 255, 80],
    [200, 80, 255],
    [255, 120, 40],
    [0, 220, 180],
    [255, 40, 200],
];

const LEADING: Rgb = [10, 10, 15];

fn chromatic_aberration(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let seeded = Seeded::new(value);
    let shape = seeded.h1() % 3;
    let s = f64::from(size);
    let (cx, cy, r) = (s / 2.0, s / 2.0, s * 0.35);

    let mut outline = Path2d::new();
    match shape {
        0 => outline.arc(cx, cy, r, 0.0, PI * 2.0),
        1 => {
            let half_width = r * (PI / 6.0).cos();
            outline.move_to(cx, cy - r);
            outline.line_to(cx + half_width, cy + r * 0.5);
            outline.line_to(cx - half_width, cy + r * 0.5);
            outline.close_path();
        }
        _ => outline.round_rect(cx - r, cy - r, r * 2.0, r * 2.0, r * 0.2),
    }

    surface.set_fill_style([0x0a, 0x0a, 0x0f].into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_composite(Composite::Screen);
    let channels: [((f64, f64), Rgb); 3] = [
        ((-3.0, -1.0), [255, 0, 0]),
        ((0.0, 2.0), [0, 255, 0]),
        ((3.0, -1.0), [0, 0, 255]),
    ];
    for ((dx, dy), color) in channels {
        surface.save();
        surface.translate(dx, dy);
        surface.set_fill_style(color.into());
        surface.fill_path(&outline);
        surface.restore();
    }
    surface.set_composite(Composite::SourceOver);
}

fn voronoi_glass(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let s = f64::from(size);
    let sites: Vec<(f64, f64, Rgb)> = (0..8)
        .map(|i| {
            let x = seeded.next() * s;
            let y = seeded.next() * s;
            (x, y, GLASS[i % GLASS.len()])
        })
        .collect();
    paint_pixels(surface, size, |x, y| {
        let (mut nearest, mut second, mut color) = (f64::INFINITY, f64::INFINITY, GLASS[0]);
        for &(sx, sy, site_color) in &sites {
            let (dx, dy) = (f64::from(x) - sx, f64::from(y) - sy);
            let d = dx * dx + dy * dy;
            if d < nearest {
                second = nearest;
                nearest = d;
                color = site_color;
            } else if d < second {
                second = d;
            }
        }
        if second.sqrt() - nearest.sqrt() < 2.0 {
            LEADING
        } else {
            color
        }
    });
}

/// Gielis superformula radius at angle `phi` with `a = b = 1`.
fn superformula(phi: f64, m: f64, n1: f64, n2: f64, n3: f64) -> f64 {
    let t1 = (m * phi / 4.0).cos().abs();
    let t2 = (m * phi / 4.0).sin().abs();
    (t1.powf(n2) + t2.powf(n3)).powf(-1.0 / n1)
}

fn supershape(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let m = f64::from(2 + seeded.h1() % 7);
    let [n1, n2, n3] = seeded.rng.take::<3>().map(|v| 0.3 + v * 4.0);
    let s = f64::from(size);
    let scale = s * 0.45;
    paint_pixels(surface, size, |x, y| {
        let px = (f64::from(x) - s / 2.0) / scale;
        let py = (f64::from(y) - s / 2.0) / scale;
        let r = superformula(py.atan2(px), m, n1, n2, n3);
        if (px * px + py * py).sqrt() <= r {
            fg
        } else {
            bg
        }
    });
}

fn plasma(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let [f1, f2, f3, f4] = seeded.rng.take::<4>().map(|v| 1.0 + v * 3.0);
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let (nx, ny) = (f64::from(x) / s, f64::from(y) / s);
        let v = (nx * f1 * PI * 2.0).sin()
            + (ny * f2 * PI * 2.0).sin()
            + ((nx + ny) * f3 * PI).sin()
            + ((nx * nx + ny * ny).sqrt() * f4 * PI * 2.0).sin();
        let t = (v + 4.0) / 8.0;
        hsl((hue + t * 180.0) % 360.0, 90.0, 40.0 + t * 30.0)
    });
}

fn op_art(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    let cx = s / 2.0 + (seeded.next() - 0.5) * s * 0.15;
    let cy = s / 2.0 + (seeded.next() - 0.5) * s * 0.15;
    let freq = f64::from(4 + seeded.h1() % 5);
    paint_pixels(surface, size, |x, y| {
        let (dx, dy) = (f64::from(x) - cx, f64::from(y) - cy);
        let d = (dx * dx + dy * dy).sqrt();
        if (d * freq * PI / s).sin() > 0.0 {
            fg
        } else {
            bg
        }
    });
}

fn kaleidoscope(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let folds = [4.0, 6.0, 8.0][(seeded.h1() % 3) as usize];
    let offset = seeded.next() * PI;
    let s = f64::from(size);
    let sector = PI * 2.0 / folds;
    paint_pixels(surface, size, |x, y| {
        let (dx, dy) = (f64::from(x) - s / 2.0, f64::from(y) - s / 2.0);
        let mut phi = ((dy.atan2(dx) + offset + PI * 2.0) % (PI * 2.0)) % sector;
        if phi > sector / 2.0 {
            phi = sector - phi;
        }
        let t = (dx * dx + dy * dy).sqrt() / (s * 0.5);
        let h = (hue + phi * (180.0 / PI) * (360.0 / sector) * 0.5) % 360.0;
        let l = 35.0 + (t * PI * 3.0 + phi * folds).sin() * 20.0;
        hsl(h, 85.0, l)
    });
}

fn gradient_bands(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let angle = seeded.next() * PI * 2.0;
    let bands = 4 + seeded.h1() % 2;
    let n = f64::from(bands);
    let palette: Vec<Rgb> = (0..bands)
        .map(|i| {
            let i = f64::from(i);
            hsl((hue + i * (360.0 / n)) % 360.0, 85.0, 40.0 + i * (20.0 / n))
        })
        .collect();
    paint_pixels(surface, size, |x, y| {
        let band = ((sweep(x, y, size, angle) * n).floor() as usize).min(palette.len() - 1);
        palette[band]
    });
}

fn interference(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    let cx1 = s * (0.25 + seeded.next() * 0.2);
    let cy1 = s * (0.25 + seeded.next() * 0.2);
    let cx2 = s * (0.55 + seeded.next() * 0.2);
    let cy2 = s * (0.55 + seeded.next() * 0.2);
    let freq = 5.0 + seeded.next() * 5.0;
    paint_pixels(surface, size, |x, y| {
        let (x, y) = (f64::from(x), f64::from(y));
        let d1 = ((x - cx1).powi(2) + (y - cy1).powi(2)).sqrt();
        let d2 = ((x - cx2).powi(2) + (y - cy2).powi(2)).sqrt();
        let w1 = (d1 * freq * PI / s).sin();
        let w2 = (d2 * freq * PI / s).sin();
        let k = (w1 + w2 + 2.0) / 4.0;
        let mix = |a: u8, b: u8| to_channel((f64::from(a) * k + f64::from(b) * (1.0 - k)).round());
        [mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2])]
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("chromatic-aberration", chromatic_aberration),
        Generator::raster("voronoi-glass", voronoi_glass),
        Generator::raster("supershape", supershape),
        Generator::raster("plasma", plasma),
        Generator::raster("op-art", op_art),
        Generator::raster("kaleidoscope", kaleidoscope),
        Generator::raster("gradient-bands", gradient_bands),
        Generator::raster("interference", interference),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn op_art_rings_use_euclidean_distance() {
        let image = testing::render(op_art, 48, "evilrabbit");
        let mut seeded = Seeded::new("evilrabbit");
        let (fg, bg) = seeded.colors(ColorScheme::OklchMono);
        let s = 48.0;
        let cx = s / 2.0 + (seeded.next() - 0.5) * s * 0.15;
        let cy = s / 2.0 + (seeded.next() - 0.5) * s * 0.15;
        let freq = f64::from(4 + seeded.h1() % 5);
        for y in 0..48u32 {
            for x in 0..48u32 {
                let (dx, dy) = (f64::from(x) - cx, f64::from(y) - cy);
                let d = (dx * dx + dy * dy).sqrt();
                let want = if (d * freq * PI / s).sin() > 0.0 { fg } else { bg };
                let got = image.pixel_at(x, y);
                assert_eq!([got[0], got[1], got[2]], want, "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn superformula_with_unit_exponents_at_zero_angle() {
        // cos(0) = 1, sin(0) = 0, so the radius is 1 whatever m is.
        assert!((superformula(0.0, 5.0, 1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn aberration_centre_is_white_where_channels_overlap() {
        let image = testing::render(chromatic_aberration, 64, "evilrabbit");
        assert_eq!(image.pixel_at(32, 32), [255, 255, 255, 255]);
        assert_eq!(image.pixel_at(0, 63), [10, 10, 15, 255]);
    }

    #[test]
    fn voronoi_uses_glass_palette_or_leading() {
        let image = testing::render(voronoi_glass, 32, "a");
        for pixel in image.data().chunks_exact(4) {
            let rgb = [pixel[0], pixel[1], pixel[2]];
            assert!(rgb == LEADING || GLASS.contains(&rgb));
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
