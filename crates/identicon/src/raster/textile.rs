//! Fabric, craft and plotter-style pieces.

use std::f64::consts::PI;

use crate::color::{lerp_rgb, ColorScheme, Rgb};
use crate::hash::get_bits;
use crate::registry::Generator;
use crate::surface::{ImageData, LineCap, Path2d, Surface};

use super::{paint_pixels, pixel_count, pixel_index, Seeded};

const WEAVE_GAP: Rgb = [20, 20, 20];

/// Writes one grid cell of side `cell` (possibly fractional) into `image`.
/// Local coordinates run over whole pixels while `l < cell`; later cells
/// overwrite earlier ones where fractional cells overlap.
fn paint_cell(
    image: &mut ImageData,
    size: u32,
    cell: f64,
    (col, row): (u32, u32),
    mut shade: impl FnMut(u32, u32) -> Rgb,
) {
    let mut ly = 0u32;
    while f64::from(ly) < cell {
        let mut lx = 0u32;
        while f64::from(lx) < cell {
            let py = (f64::from(row) * cell + f64::from(ly)).floor() as u32;
            let px = (f64::from(col) * cell + f64::from(lx)).floor() as u32;
            if py < size && px < size {
                image.set_pixel(pixel_index(px, py, size), shade(lx, ly));
            }
            lx += 1;
        }
        ly += 1;
    }
}

fn quilt_block(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let bits = get_bits(seeded.digest, 64);
    let grid = 8;
    let cell = f64::from(size) / f64::from(grid);
    let mut image = ImageData::new(size, size);
    for row in 0..grid {
        for col in 0..grid {
            let rising = bits[((row * grid + col) % 64) as usize] == 0;
            paint_cell(&mut image, size, cell, (col, row), |lx, ly| {
                let in_triangle = if rising {
                    lx >= ly
                } else {
                    f64::from(lx + ly) <= cell
                };
                if in_triangle {
                    fg
                } else {
                    bg
                }
            });
        }
    }
    surface.put_image_data(&image, 0, 0);
}

fn sashiko_stitch(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_stroke_style(fg.into());
    surface.set_line_width((s / 96.0).max(1.0));
    let dash = (s / 32.0).max(2.0);
    surface.set_line_dash(&[dash, dash * 0.5]);

    // Spacing never collapses to zero on tiny canvases.
    let sp = i64::from((size / 10).max(1));
    let n = i64::from(size);
    let stroke = |surface: &mut dyn Surface, path: Path2d| surface.stroke_path(&path);
    match seeded.h1() % 3 {
        0 => {
            // Asanoha: crossing diagonals.
            for i in (-n..n * 2).step_by(sp as usize) {
                let i = i as f64;
                let mut down = Path2d::new();
                down.move_to(i, 0.0);
                down.line_to(i + s, s);
                stroke(surface, down);
                let mut back = Path2d::new();
                back.move_to(i, 0.0);
                back.line_to(i - s, s);
                stroke(surface, back);
            }
        }
        1 => {
            // Seigaiha: overlapping upper half circles.
            let mut row = 0;
            while row * sp < n + sp {
                let mut col = -1;
                while col * sp < n + sp {
                    let x = col * sp * 2 + if row % 2 == 1 { sp } else { 0 };
                    let mut wave = Path2d::new();
                    wave.arc(x as f64, (row * sp) as f64, sp as f64, PI, 0.0);
                    stroke(surface, wave);
                    col += 1;
                }
                row += 1;
            }
        }
        _ => {
            // Yabane: zigzag rows.
            let mut row = 0;
            while row * sp < n + sp {
                let mut zigzag = Path2d::new();
                for x in (0..=n).step_by(sp as usize) {
                    let rise = if x % (sp * 2) < sp { x % sp } else { sp - x % sp };
                    zigzag.line_to(x as f64, (row * sp + rise) as f64);
                }
                stroke(surface, zigzag);
                row += 1;
            }
        }
    }
    surface.set_line_dash(&[]);
}

fn woven_fabric(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let bits = get_bits(seeded.digest, 64);
    let grid = 16;
    let cell = f64::from(size) / f64::from(grid);
    let gap = (cell * 0.08).max(0.5);
    let mut image = ImageData::new(size, size);
    for row in 0..grid {
        for col in 0..grid {
            let over = u32::from(bits[((row + col) % 64) as usize]) == (row + col) % 2;
            paint_cell(&mut image, size, cell, (col, row), |lx, ly| {
                if f64::from(ly) < gap || f64::from(lx) < gap {
                    WEAVE_GAP
                } else if over {
                    fg
                } else {
                    bg
                }
            });
        }
    }
    surface.put_image_data(&image, 0, 0);
}

fn kintsugi_crack(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (gold, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let impact_x = s * (0.3 + seeded.next() * 0.4);
    let impact_y = s * (0.3 + seeded.next() * 0.4);
    let cracks = 4 + seeded.h1() % 4;
    surface.set_stroke_style(gold.into());
    surface.set_line_cap(LineCap::Round);
    for c in 0..cracks {
        let c = f64::from(c);
        let base_angle = c / f64::from(cracks) * PI * 2.0 + seeded.next() * 0.5;
        let len = s * (0.25 + seeded.next() * 0.4);
        let trunk_width = (s / 80.0 * (1.0 - c * 0.1)).max(1.0);
        surface.set_line_width(trunk_width);

        let (mut x, mut y) = (impact_x, impact_y);
        let mut trunk = Path2d::new();
        trunk.move_to(x, y);
        let mut angle = base_angle;
        let steps = 8 + (seeded.next() * 6.0).floor() as u32;
        for _ in 0..steps {
            angle += (seeded.next() - 0.5) * 0.5;
            let step_len = len / f64::from(steps) * (0.6 + seeded.next() * 0.8);
            x += angle.cos() * step_len;
            y += angle.sin() * step_len;
            trunk.line_to(x, y);
            if seeded.next() < 0.3 {
                surface.stroke_path(&trunk);
                let side = if seeded.next() > 0.5 { 0.5 } else { -0.5 };
                let branch_angle = angle + side * (0.4 + seeded.next() * 0.4);
                let branch_len = step_len * (0.3 + seeded.next() * 0.4);
                let mut branch = Path2d::new();
                branch.move_to(x, y);
                branch.line_to(
                    x + branch_angle.cos() * branch_len,
                    y + branch_angle.sin() * branch_len,
                );
                surface.set_line_width((trunk_width * 0.6).max(0.5));
                surface.stroke_path(&branch);
                surface.set_line_width(trunk_width);
                trunk = Path2d::new();
                trunk.move_to(x, y);
            }
        }
        surface.stroke_path(&trunk);
    }
}

fn ikat_bleed(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    let stripe_width = s / f64::from(6 + seeded.h1() % 6);
    let noise: Vec<f64> = (0..pixel_count(size)).map(|_| seeded.next() - 0.5).collect();
    paint_pixels(surface, size, |px, py| {
        let bleed = noise[pixel_index(px, py, size)] * stripe_width * 0.6;
        let pos = (f64::from(px) + bleed + s * 10.0) % s;
        if (pos / stripe_width).floor() % 2.0 == 0.0 {
            fg
        } else {
            bg
        }
    });
}

/// Per-position band parity for a sett of random widths rescaled to `size`.
fn tartan_bands(size: u32, seeded: &mut Seeded) -> Vec<u8> {
    let count = 4 + seeded.h1() % 4;
    let s = f64::from(size);
    let widths: Vec<f64> = (0..count)
        .map(|_| (s / f64::from(count) * (0.5 + seeded.next())).floor())
        .collect();
    let total: f64 = widths.iter().sum();
    let scale = if total > 0.0 { s / total } else { 0.0 };

    let mut bands = Vec::with_capacity(size as usize);
    for (i, width) in widths.iter().enumerate() {
        let span = (width * scale).floor() as usize;
        let room = size as usize - bands.len();
        bands.extend(std::iter::repeat((i % 2) as u8).take(span.min(room)));
    }
    bands.resize(size as usize, ((count - 1) % 2) as u8);
    bands
}

fn tartan(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let bands = tartan_bands(size, &mut seeded);
    paint_pixels(surface, size, |px, py| {
        if bands[px as usize] ^ bands[py as usize] == 0 {
            fg
        } else {
            bg
        }
    });
}

const CLIFFORD_ITERATIONS: usize = 200_000;

fn clifford_attractor(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let param = |word: u32, shift: u32| -2.0 + f64::from((word >> shift) & 0xff) / 255.0 * 4.0;
    let (a, b) = (param(seeded.h1(), 0), param(seeded.h1(), 8));
    let (c, d) = (param(seeded.h2(), 0), param(seeded.h2(), 8));

    let s = f64::from(size);
    let mut density = vec![0u32; pixel_count(size)];
    let mut peak = 0u32;
    let (mut px, mut py) = (0.0f64, 0.0f64);
    for i in 0..CLIFFORD_ITERATIONS {
        let nx = (a * py).sin() + c * (a * px).cos();
        let ny = (b * px).sin() + d * (b * py).cos();
        px = nx;
        py = ny;
        if i <= 100 {
            continue;
        }
        let ix = ((px + 3.0) / 6.0 * s).floor();
        let iy = ((py + 3.0) / 6.0 * s).floor();
        if ix >= 0.0 && ix < s && iy >= 0.0 && iy < s {
            let cell = &mut density[iy as usize * size as usize + ix as usize];
            *cell += 1;
            peak = peak.max(*cell);
        }
    }

    let norm = (f64::from(peak) + 1.0).ln();
    paint_pixels(surface, size, |x, y| {
        let hits = density[pixel_index(x, y, size)];
        let t = if hits > 0 {
            (f64::from(hits) + 1.0).ln() / norm
        } else {
            0.0
        };
        lerp_rgb(bg, fg, t)
    });
}

/// Maps a distance along a Hilbert curve of side `n` to grid coordinates.
fn hilbert_xy(n: u32, index: u32) -> (u32, u32) {
    let (mut x, mut y, mut t, mut s) = (0u32, 0u32, index, 1u32);
    while s < n {
        let rx = (t >> 1) & 1;
        let ry = (t ^ rx) & 1;
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t >>= 2;
        s <<= 1;
    }
    (x, y)
}

fn hilbert_curve(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let bits = get_bits(seeded.digest, 64);
    let (fg, bg) = seeded.colors(scheme);
    let order = if seeded.h1() % 2 == 0 { 4 } else { 5 };
    let n = 1u32 << order;
    let cell = f64::from(size) / f64::from(n);
    let mut image = ImageData::new(size, size);
    for index in 0..n * n {
        let color = if bits[(index % 64) as usize] == 1 { fg } else { bg };
        paint_cell(&mut image, size, cell, hilbert_xy(n, index), |_, _| color);
    }
    surface.put_image_data(&image, 0, 0);
}

fn spiral_galaxy(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let arms = 2 + seeded.h1() % 3;
    let twist = 2.0 + seeded.next() * 3.0;
    let s = f64::from(size);
    paint_pixels(surface, size, |px, py| {
        let (dx, dy) = (f64::from(px) - s / 2.0, f64::from(py) - s / 2.0);
        let dist = (dx * dx + dy * dy).sqrt() / (s * 0.5);
        let angle = dy.atan2(dx);
        let nearest = (0..arms)
            .map(|arm| {
                let arm_angle = f64::from(arm) / f64::from(arms) * PI * 2.0 + dist * twist;
                ((((angle - arm_angle) % (PI * 2.0)) + PI * 3.0) % (PI * 2.0) - PI).abs()
            })
            .fold(f64::INFINITY, f64::min);
        if nearest < 0.3 + (1.0 - dist) * 0.4 || dist < 0.1 {
            fg
        } else {
            bg
        }
    });
}

fn sound_ring(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let amps = seeded.rng.take::<64>();
    let s = f64::from(size);
    let (inner, outer) = (s * 0.2, s * 0.42);
    paint_pixels(surface, size, |px, py| {
        let (dx, dy) = (f64::from(px) - s / 2.0, f64::from(py) - s / 2.0);
        let dist = (dx * dx + dy * dy).sqrt();
        let turn = ((dy.atan2(dx) + PI * 2.0) % (PI * 2.0)) / (PI * 2.0);
        let sample = (turn * amps.len() as f64).floor() as usize % amps.len();
        let reach = outer + amps[sample] * (outer - inner);
        if dist >= inner && dist <= reach {
            fg
        } else {
            bg
        }
    });
}

fn erosion_canyon(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (rock, floor) = seeded.colors(scheme);
    let phases = seeded.rng.take::<3>().map(|v| v * PI * 2.0);
    let width_freq = 0.02 + seeded.next() * 0.02;
    let width_phase = seeded.next() * PI * 2.0;
    let meanders = [(0.015, 0.35), (0.03, 0.15), (0.06, 0.07)];
    let s = f64::from(size);
    let rows: Vec<(f64, f64)> = (0..size)
        .map(|py| {
            let y = f64::from(py);
            let drift: f64 = meanders
                .iter()
                .zip(phases)
                .map(|(&(freq, amp), phase)| amp * (y * freq + phase).sin())
                .sum();
            let half_width = s * (0.05 + 0.08 * (0.5 + 0.5 * (y * width_freq + width_phase).sin()));
            (s / 2.0 + s * drift, half_width)
        })
        .collect();
    paint_pixels(surface, size, |px, py| {
        let (centre, half_width) = rows[py as usize];
        if (f64::from(px) - centre).abs() < half_width {
            floor
        } else {
            rock
        }
    });
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("quilt-block", quilt_block),
        Generator::raster("sashiko-stitch", sashiko_stitch),
        Generator::raster("woven-fabric", woven_fabric),
        Generator::raster("kintsugi-crack", kintsugi_crack),
        Generator::raster("ikat-bleed", ikat_bleed),
        Generator::raster("tartan", tartan),
        Generator::raster("clifford-attractor", clifford_attractor),
        Generator::raster("hilbert-curve", hilbert_curve),
        Generator::raster("spiral-galaxy", spiral_galaxy),
        Generator::raster("sound-ring", sound_ring),
        Generator::raster("erosion-canyon", erosion_canyon),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::raster::testing;

    #[test]
    fn hilbert_visits_each_cell_once_with_unit_steps() {
        let n = 16;
        let points: Vec<(u32, u32)> = (0..n * n).map(|i| hilbert_xy(n, i)).collect();
        let unique: HashSet<_> = points.iter().collect();
        assert_eq!(unique.len(), (n * n) as usize);
        assert_eq!(points[0], (0, 0));
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1);
        }
    }

    #[test]
    fn tartan_bands_cover_every_column() {
        for value in ["evilrabbit", "a", ""] {
            let mut seeded = Seeded::new(value);
            let bands = tartan_bands(37, &mut seeded);
            assert_eq!(bands.len(), 37);
            assert!(bands.iter().all(|&b| b <= 1));
        }
    }

    #[test]
    fn tartan_is_symmetric_about_the_diagonal() {
        let image = testing::render(tartan, 32, "evilrabbit");
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(image.pixel_at(x, y), image.pixel_at(y, x));
            }
        }
    }

    #[test]
    fn cells_cover_fractional_grids() {
        for size in [5, 20, 33] {
            let image = testing::render(quilt_block, size, "evilrabbit");
            assert!(image.data().chunks_exact(4).all(|p| p[3] == 255));
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
