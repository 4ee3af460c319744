//! Natural structures: banded minerals, seed heads, standing waves and
//! aggregation.

use std::f64::consts::PI;

use crate::color::{ColorScheme, Rgb};
use crate::registry::Generator;
use crate::surface::{Path2d, Surface};

use super::{clamp01, paint_binary, paint_pixels, pixel_count, Seeded};

/// Sinusoidal perturbation of a ring's radius around its centre.
struct Harmonic {
    freq: f64,
    amp: f64,
    phase: f64,
}

impl Harmonic {
    fn draw(seeded: &mut Seeded, freq_range: f64, amp_base: f64, amp_range: f64) -> Self {
        let freq = 2.0 + (seeded.next() * freq_range).floor();
        let amp = amp_base + seeded.next() * amp_range;
        let phase = seeded.next() * PI * 2.0;
        Self { freq, amp, phase }
    }
}

fn wobble(harmonics: &[Harmonic], angle: f64) -> f64 {
    harmonics
        .iter()
        .fold(0.0, |sum, h| sum + h.amp * (h.freq * angle + h.phase).sin())
}

/// Alternating rings around a centre, distorted by a few harmonics.
struct Rings {
    centre: (f64, f64),
    reach: f64,
    count: f64,
    harmonics: Vec<Harmonic>,
    clamp_outer: bool,
}

impl Rings {
    fn paint(&self, surface: &mut dyn Surface, size: u32, (fg, bg): (Rgb, Rgb)) {
        paint_pixels(surface, size, |px, py| {
            let (dx, dy) = (f64::from(px) - self.centre.0, f64::from(py) - self.centre.1);
            let base = (dx * dx + dy * dy).sqrt() / self.reach;
            let raw = base + wobble(&self.harmonics, dy.atan2(dx));
            let d = if self.clamp_outer { clamp01(raw) } else { raw.max(0.0) };
            if (d * self.count).floor() % 2.0 == 0.0 {
                fg
            } else {
                bg
            }
        });
    }
}

fn agate_slice(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let s = f64::from(size);
    let count = f64::from(5 + seeded.h1() % 4);
    let harmonics = (0..4)
        .map(|_| Harmonic::draw(&mut seeded, 6.0, 0.02, 0.08))
        .collect();
    let rings = Rings {
        centre: (s / 2.0, s / 2.0),
        reach: s * 0.5,
        count,
        harmonics,
        clamp_outer: true,
    };
    rings.paint(surface, size, colors);
}

fn phyllotaxis(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let golden = 137.508 * (PI / 180.0);
    let count = 600 + seeded.h1() % 400;
    let s = f64::from(size);
    let dot_radius = (s / 120.0).max(1.0);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_fill_style(fg.into());

    let scale = s * 0.46 / f64::from(count).sqrt();
    for i in 0..count {
        let i = f64::from(i);
        let r = scale * i.sqrt();
        let theta = i * golden;
        let mut seed = Path2d::new();
        seed.arc(s / 2.0 + r * theta.cos(), s / 2.0 + r * theta.sin(), dot_radius, 0.0, PI * 2.0);
        surface.fill_path(&seed);
    }
}

fn cymatics(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let m = f64::from(1 + seeded.h1() % 5);
    let n = f64::from(1 + seeded.h2() % 5);
    let s = f64::from(size);
    paint_pixels(surface, size, |px, py| {
        let (x, y) = (f64::from(px) / s, f64::from(py) / s);
        if (m * PI * x).cos() * (n * PI * y).cos() > 0.0 {
            fg
        } else {
            bg
        }
    });
}

fn fingerprint(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    let cx = s * (0.4 + seeded.next() * 0.2);
    let cy = s * (0.4 + seeded.next() * 0.2);
    let spacing = s / f64::from(12 + seeded.h1() % 8);
    let twist = 0.3 + seeded.next() * 0.7;
    paint_pixels(surface, size, |px, py| {
        let (dx, dy) = (f64::from(px) - cx, f64::from(py) - cy);
        let dist = (dx * dx + dy * dy).sqrt();
        let ridge = ((dist + dy.atan2(dx) * twist * 2.0) * PI * 2.0 / spacing).sin();
        if ridge > 0.0 {
            fg
        } else {
            bg
        }
    });
}

fn tree_rings(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let colors = seeded.colors(scheme);
    let s = f64::from(size);
    let cx = s * (0.35 + seeded.next() * 0.3);
    let cy = s * (0.35 + seeded.next() * 0.3);
    let count = f64::from(8 + seeded.h1() % 8);
    let harmonics = (0..3)
        .map(|_| Harmonic::draw(&mut seeded, 4.0, 0.03, 0.07))
        .collect();
    let rings = Rings {
        centre: (cx, cy),
        reach: s * 0.7,
        count,
        harmonics,
        clamp_outer: false,
    };
    rings.paint(surface, size, colors);
}

const WALK: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diffusion-limited aggregation from a single centre seed. Each walker
/// gets a bounded number of steps and sticks beside the first occupied
/// neighbour it reaches.
fn aggregate(size: u32, walkers: u32, seeded: &mut Seeded) -> Vec<bool> {
    let n = i64::from(size);
    let mut grid = vec![false; pixel_count(size)];
    let index = |x: i64, y: i64| (y * n + x) as usize;
    grid[index(n / 2, n / 2)] = true;
    for _ in 0..walkers {
        let mut x = (seeded.next() * n as f64).floor() as i64;
        let mut y = (seeded.next() * n as f64).floor() as i64;
        for _ in 0..2000 {
            let (dx, dy) = WALK[(seeded.next() * 4.0).floor() as usize];
            x = (x + dx).clamp(0, n - 1);
            y = (y + dy).clamp(0, n - 1);
            let touching = WALK.iter().any(|&(ndx, ndy)| {
                let (nx, ny) = (x + ndx, y + ndy);
                nx >= 0 && nx < n && ny >= 0 && ny < n && grid[index(nx, ny)]
            });
            if touching {
                grid[index(x, y)] = true;
                break;
            }
        }
    }
    grid
}

fn coral_growth(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let walkers = 250 + seeded.h1() % 250;
    let grid = aggregate(size, walkers, &mut seeded);
    paint_binary(surface, size, &grid, fg, bg);
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("agate-slice", agate_slice),
        Generator::raster("phyllotaxis", phyllotaxis),
        Generator::raster("cymatics", cymatics),
        Generator::raster("fingerprint", fingerprint),
        Generator::raster("tree-rings", tree_rings),
        Generator::raster("coral-growth", coral_growth),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn aggregate_stays_connected_to_the_seed() {
        let mut seeded = Seeded::new("evilrabbit");
        let grid = aggregate(24, 300, &mut seeded);
        let n = 24usize;
        // Flood from the centre; every occupied cell must be reachable.
        let mut seen = vec![false; n * n];
        let mut stack = vec![(12usize, 12usize)];
        while let Some((x, y)) = stack.pop() {
            let i = y * n + x;
            if seen[i] || !grid[i] {
                continue;
            }
            seen[i] = true;
            if x > 0 {
                stack.push((x - 1, y));
            }
            if x + 1 < n {
                stack.push((x + 1, y));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
            if y + 1 < n {
                stack.push((x, y + 1));
            }
        }
        let occupied = grid.iter().filter(|&&c| c).count();
        let reached = seen.iter().filter(|&&c| c).count();
        assert!(occupied > 1);
        assert_eq!(occupied, reached);
    }

    #[test]
    fn cymatics_is_two_tone() {
        let image = testing::render(cymatics, 32, "evilrabbit");
        assert_eq!(testing::distinct_colors(&image), 2);
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
