//! Classic algorithms rendered as two-colour or ramped images: cellular
//! automata, mazes, chaos games, escape-time fractals and L-system curves.

use std::f64::consts::PI;

use crate::color::{oklch_to_rgb, to_channel, ColorScheme};
use crate::hash::get_bits;
use crate::registry::Generator;
use crate::surface::{LineCap, LineJoin, Path2d, Surface};

use super::{paint_binary, paint_pixels, pixel_count, Seeded};

const LIFE_GRID: usize = 40;
const LIFE_GENERATIONS: usize = 8;

/// One generation of Conway's rules on a toroidal grid.
fn life_step(grid: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let rows = grid.len();
    let cols = grid[0].len();
    (0..rows)
        .map(|y| {
            (0..cols)
                .map(|x| {
                    let mut neighbours = 0;
                    for dy in [rows - 1, 0, 1] {
                        for dx in [cols - 1, 0, 1] {
                            if (dy, dx) != (0, 0) && grid[(y + dy) % rows][(x + dx) % cols] {
                                neighbours += 1;
                            }
                        }
                    }
                    neighbours == 3 || (grid[y][x] && neighbours == 2)
                })
                .collect()
        })
        .collect()
}

fn game_of_life(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let mut grid: Vec<Vec<bool>> = (0..LIFE_GRID)
        .map(|_| (0..LIFE_GRID).map(|_| seeded.next() < 0.35).collect())
        .collect();
    for _ in 0..LIFE_GENERATIONS {
        grid = life_step(&grid);
    }
    let cell = f64::from(size) / LIFE_GRID as f64;
    paint_pixels(surface, size, |x, y| {
        let row = (f64::from(y) / cell).floor() as usize;
        let col = (f64::from(x) / cell).floor() as usize;
        if grid[row][col] {
            fg
        } else {
            bg
        }
    });
}

/// Perfect maze carved by a randomised depth-first search. Walls are stored
/// per cell edge: `horizontal[row][col]` is the top edge of `(row, col)`.
struct Maze {
    rows: usize,
    cols: usize,
    horizontal: Vec<Vec<bool>>,
    vertical: Vec<Vec<bool>>,
}

impl Maze {
    fn carve(rows: usize, cols: usize, seeded: &mut Seeded) -> Self {
        let mut maze = Maze {
            rows,
            cols,
            horizontal: vec![vec![true; cols]; rows + 1],
            vertical: vec![vec![true; cols + 1]; rows],
        };
        if rows == 0 || cols == 0 {
            return maze;
        }
        let mut visited = vec![vec![false; cols]; rows];
        let mut stack = vec![(0usize, 0usize)];
        visited[0][0] = true;
        while let Some(&(cy, cx)) = stack.last() {
            let open: Vec<(isize, isize)> = [(0, 1), (0, -1), (1, 0), (-1, 0)]
                .into_iter()
                .filter(|&(dy, dx)| {
                    let (ny, nx) = (cy as isize + dy, cx as isize + dx);
                    ny >= 0
                        && nx >= 0
                        && (ny as usize) < rows
                        && (nx as usize) < cols
                        && !visited[ny as usize][nx as usize]
                })
                .collect();
            if open.is_empty() {
                stack.pop();
                continue;
            }
            let (dy, dx) = open[(seeded.next() * open.len() as f64).floor() as usize];
            let (ny, nx) = ((cy as isize + dy) as usize, (cx as isize + dx) as usize);
            if dy == 0 {
                maze.vertical[cy][cx + usize::from(dx > 0)] = false;
            } else {
                maze.horizontal[cy + usize::from(dy > 0)][cx] = false;
            }
            visited[ny][nx] = true;
            stack.push((ny, nx));
        }
        maze
    }

    fn top_wall(&self, row: usize, col: usize) -> bool {
        let col = col.min(self.cols.saturating_sub(1));
        self.horizontal
            .get(row.min(self.rows))
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    fn left_wall(&self, row: usize, col: usize) -> bool {
        let row = row.min(self.rows.saturating_sub(1));
        self.vertical
            .get(row)
            .and_then(|r| r.get(col.min(self.cols)))
            .copied()
            .unwrap_or(false)
    }
}

fn maze(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (path, wall) = seeded.colors(scheme);
    let cell = if seeded.h1() % 2 == 0 { 3 } else { 2 };
    let n = (size / cell) as usize;
    let maze = Maze::carve(n, n, &mut seeded);
    paint_pixels(surface, size, |x, y| {
        let (row, col) = ((y / cell) as usize, (x / cell) as usize);
        let is_wall = (y % cell == 0 && maze.top_wall(row, col))
            || (x % cell == 0 && maze.left_wall(row, col));
        if is_wall {
            wall
        } else {
            path
        }
    });
}

fn pixel_sprite(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let grid: usize = if seeded.h1() % 2 == 0 { 8 } else { 10 };
    let half = grid.div_ceil(2);
    let mut cells = vec![vec![false; grid]; grid];
    for row in cells.iter_mut() {
        for x in 0..half {
            let on = seeded.next() < 0.45;
            row[x] = on;
            row[grid - 1 - x] = on;
        }
    }
    let cell = f64::from(size) / grid as f64;
    paint_pixels(surface, size, |x, y| {
        let (row, col) = (
            (f64::from(y) / cell).floor() as usize,
            (f64::from(x) / cell).floor() as usize,
        );
        if cells[row][col] {
            fg
        } else {
            bg
        }
    });
}

fn demoscene_fire(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let (w, h) = (size as usize, size as usize);
    let mut heat = vec![0.0f32; w * h];
    for x in 0..w {
        heat[(h - 1) * w + x] = (0.8 + seeded.next() * 0.2) as f32;
        let second = 0.6 + seeded.next() * 0.4;
        if h >= 2 {
            heat[(h - 2) * w + x] = second as f32;
        }
    }
    for y in (0..h.saturating_sub(2)).rev() {
        for x in 0..w {
            let sample = |row: usize, col: usize| f64::from(heat[row * w + col]);
            let below = sample(y + 1, x);
            let left = sample(y + 1, (x + w - 1) % w);
            let right = sample(y + 1, (x + 1) % w);
            let under = sample((y + 2).min(h - 1), x);
            heat[y * w + x] = ((below + left + right + under) / 4.0 - 0.015).max(0.0) as f32;
        }
    }
    paint_pixels(surface, size, |x, y| {
        let t = f64::from(heat[y as usize * w + x as usize]);
        if t < 0.5 {
            oklch_to_rgb(0.4 + t * 0.6, 0.3, hue)
                .map(|c| to_channel((f64::from(c) * t * 2.0).round()))
        } else {
            let tt = (t - 0.5) * 2.0;
            oklch_to_rgb(0.7 + tt * 0.3, 0.3 * (1.0 - tt), hue)
                .map(|c| to_channel((f64::from(c) * (1.0 - tt) + 255.0 * tt).round()))
        }
    });
}

fn sierpinski(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let s = f64::from(size);
    let corners = [(s * 0.5, 0.0), (0.0, s - 1.0), (s - 1.0, s - 1.0)];
    let mut hits = vec![false; pixel_count(size)];
    let mut px = seeded.next() * s;
    let mut py = seeded.next() * s;
    for i in 0..50_000 {
        let (vx, vy) = corners[(seeded.next() * 3.0).floor() as usize];
        px = (px + vx) / 2.0;
        py = (py + vy) / 2.0;
        // Skip the transient before the point settles onto the attractor.
        if i > 20 {
            let (ix, iy) = (px.round(), py.round());
            if ix >= 0.0 && ix < s && iy >= 0.0 && iy < s {
                hits[iy as usize * size as usize + ix as usize] = true;
            }
        }
    }
    paint_binary(surface, size, &hits, fg, bg);
}

fn mandelbrot_slice(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let seeded = Seeded::new(value);
    let hue = seeded.hue();
    let cx = -0.5 + (f64::from(seeded.h1() % 1000) / 1000.0 - 0.5) * 1.5;
    let cy = (f64::from(seeded.h2() % 1000) / 1000.0 - 0.5) * 1.2;
    let zoom = 0.5 + f64::from(seeded.h1() % 500) / 500.0 * 2.0;
    let s = f64::from(size);
    paint_pixels(surface, size, |px, py| {
        let x0 = cx + (f64::from(px) / s - 0.5) * 3.0 / zoom;
        let y0 = cy + (f64::from(py) / s - 0.5) * 3.0 / zoom;
        let (mut x, mut y, mut iter) = (0.0f64, 0.0f64, 0u32);
        while x * x + y * y <= 4.0 && iter < 32 {
            let xt = x * x - y * y + x0;
            y = 2.0 * x * y + y0;
            x = xt;
            iter += 1;
        }
        let t = f64::from(iter) / 32.0;
        oklch_to_rgb(0.3 + t * 0.6, 0.25, (hue + t * 180.0) % 360.0)
    });
}

fn perlin_terrain(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let (sky, ground) = seeded.colors(scheme);
    let offsets = seeded.rng.take::<4>().map(|v| v * 1000.0);
    let octaves = [(1.0, 0.5), (2.0, 0.25), (4.0, 0.125), (8.0, 0.0625)];
    let s = f64::from(size);
    paint_pixels(surface, size, |px, py| {
        let height: f64 = octaves
            .iter()
            .zip(offsets)
            .map(|(&(freq, amp), offset)| {
                amp * (f64::from(px) / s * freq * PI * 2.0 + offset).sin()
            })
            .sum();
        let horizon = (1.0 - (height + 1.0) / 2.0) * s;
        if f64::from(py) > horizon {
            ground
        } else {
            sky
        }
    });
}

fn truchet_tiles(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let bits = get_bits(seeded.digest, 64);
    let s = f64::from(size);
    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let tile = size / 8;
    if tile == 0 {
        return;
    }
    let count = size / tile;
    let t = f64::from(tile);
    surface.set_stroke_style(fg.into());
    surface.set_line_width((t * 0.18).max(1.0));
    surface.set_line_cap(LineCap::Round);
    for row in 0..count {
        for col in 0..count {
            let (x, y) = (f64::from(col) * t, f64::from(row) * t);
            let mut arcs = Path2d::new();
            if bits[((row * count + col) % 64) as usize] == 0 {
                arcs.arc(x, y, t / 2.0, 0.0, PI / 2.0);
                arcs.move_to(x + t, y + t / 2.0);
                arcs.arc(x + t, y + t, t / 2.0, PI, PI * 1.5);
            } else {
                arcs.arc(x + t, y, t / 2.0, PI / 2.0, PI);
                arcs.move_to(x, y + t / 2.0);
                arcs.arc(x, y + t, t / 2.0, PI * 1.5, 0.0);
            }
            surface.stroke_path(&arcs);
        }
    }
}

/// Elementary cellular automaton rule 30 on a ring.
fn rule_30_step(row: &[u8]) -> Vec<u8> {
    let n = row.len();
    (0..n)
        .map(|x| {
            let (l, c, r) = (row[(x + n - 1) % n], row[x], row[(x + 1) % n]);
            (l ^ (c | r)) & 1
        })
        .collect()
}

fn rule_30_history(seed: Vec<u8>, generations: usize) -> Vec<Vec<u8>> {
    let mut rows = Vec::with_capacity(generations);
    let mut current = seed;
    for _ in 0..generations {
        let next = rule_30_step(&current);
        rows.push(current);
        current = next;
    }
    rows
}

fn rule_30(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let seeded = Seeded::new(value);
    let (fg, bg) = seeded.colors(scheme);
    let n = size as usize;
    let mid = n / 2;

    let mut top_seed = vec![0u8; n];
    if let Some(centre) = top_seed.get_mut(mid) {
        *centre = 1;
    }
    let bottom_seed = (0..n).map(|x| ((seeded.h2() >> (x % 32)) & 1) as u8).collect();
    let top = rule_30_history(top_seed, mid);
    let bottom = rule_30_history(bottom_seed, mid);

    // On odd sizes the middle row reads one generation past the history;
    // those reads count as dead cells.
    let cell = |rows: &[Vec<u8>], row: usize, x: usize| rows.get(row).map_or(0, |r| r[x]);
    paint_pixels(surface, size, |px, py| {
        let (x, y) = (px as usize, py as usize);
        let (a, b) = if y < mid {
            (cell(&top, y, x), cell(&bottom, mid - 1 - y, x))
        } else {
            (cell(&bottom, n - 1 - y, x), cell(&top, y - mid, x))
        };
        if (a | b) & 1 == 1 {
            fg
        } else {
            bg
        }
    });
}

/// Unit-step vertices of the Heighway dragon after `iterations` folds.
fn dragon_points(iterations: usize) -> Vec<(i32, i32)> {
    let mut turns = vec![1i8];
    for _ in 1..iterations {
        let mirrored: Vec<i8> = turns.iter().rev().map(|t| -t).collect();
        turns.push(1);
        turns.extend(mirrored);
    }
    const STEPS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
    let (mut x, mut y, mut dir) = (0, 0, 0usize);
    let mut points = vec![(0, 0)];
    for turn in turns {
        dir = (dir + if turn > 0 { 1 } else { 3 }) % 4;
        x += STEPS[dir].0;
        y += STEPS[dir].1;
        points.push((x, y));
    }
    points
}

fn dragon_curve(surface: &mut dyn Surface, size: u32, value: &str, scheme: ColorScheme) {
    let (fg, bg) = Seeded::new(value).colors(scheme);
    let points = dragon_points(12);
    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(a, b, c, d), &(x, y)| (a.min(x), b.max(x), c.min(y), d.max(y)),
    );
    let s = f64::from(size);
    let pad = s * 0.1;
    let span = |lo: i32, hi: i32| match hi - lo {
        0 => 1.0,
        d => f64::from(d),
    };
    let scale = ((s - pad * 2.0) / span(min_x, max_x)).min((s - pad * 2.0) / span(min_y, max_y));
    let off_x = pad + (s - pad * 2.0 - f64::from(max_x - min_x) * scale) / 2.0;
    let off_y = pad + (s - pad * 2.0 - f64::from(max_y - min_y) * scale) / 2.0;

    surface.set_fill_style(bg.into());
    surface.fill_rect(0.0, 0.0, s, s);
    surface.set_stroke_style(fg.into());
    surface.set_line_width((s / 256.0).max(0.5));
    surface.set_line_join(LineJoin::Round);
    let mut curve = Path2d::new();
    for &(x, y) in &points {
        curve.line_to(
            f64::from(x - min_x) * scale + off_x,
            f64::from(y - min_y) * scale + off_y,
        );
    }
    surface.stroke_path(&curve);
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("game-of-life", game_of_life),
        Generator::raster("maze", maze),
        Generator::raster("pixel-sprite", pixel_sprite),
        Generator::raster("demoscene-fire", demoscene_fire),
        Generator::raster("sierpinski", sierpinski),
        Generator::raster("mandelbrot-slice", mandelbrot_slice),
        Generator::raster("perlin-terrain", perlin_terrain),
        Generator::raster("truchet-tiles", truchet_tiles),
        Generator::raster("rule-30", rule_30),
        Generator::raster("dragon-curve", dragon_curve),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn pixel_sprite_is_mirrored() {
        // 40 divides evenly into both the 8 and the 10 cell grids.
        for value in ["evilrabbit", "a", "rauchg"] {
            let image = testing::render(pixel_sprite, 40, value);
            for y in 0..40 {
                for x in 0..20 {
                    let (left, right) = (image.pixel_at(x, y), image.pixel_at(39 - x, y));
                    assert_eq!(left, right, "{value} at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn blinker_oscillates() {
        let mut grid = vec![vec![false; 5]; 5];
        for x in 1..4 {
            grid[2][x] = true;
        }
        let next = life_step(&grid);
        let vertical: Vec<(usize, usize)> = (0..5)
            .flat_map(|y| (0..5).map(move |x| (y, x)))
            .filter(|&(y, x)| next[y][x])
            .collect();
        assert_eq!(vertical, vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(life_step(&next), grid);
    }

    #[test]
    fn rule_30_grows_the_known_triangle() {
        let mut seed = vec![0u8; 7];
        seed[3] = 1;
        let rows = rule_30_history(seed, 3);
        assert_eq!(rows[1], vec![0, 0, 1, 1, 1, 0, 0]);
        assert_eq!(rows[2], vec![0, 1, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn rule_30_tolerates_odd_sizes() {
        for size in [1, 7, 33] {
            testing::render(rule_30, size, "evilrabbit");
        }
    }

    #[test]
    fn dragon_has_one_segment_per_turn() {
        let points = dragon_points(12);
        assert_eq!(points.len(), 1 << 12);
        assert_eq!(points[1], (0, 1));
    }

    #[test]
    fn maze_visits_every_cell() {
        let mut seeded = Seeded::new("evilrabbit");
        let maze = Maze::carve(6, 6, &mut seeded);
        // A spanning tree over 36 cells removes exactly 35 interior walls.
        let closed_h: usize = maze.horizontal.iter().flatten().filter(|w| **w).count();
        let closed_v: usize = maze.vertical.iter().flatten().filter(|w| **w).count();
        let total = 7 * 6 + 6 * 7;
        assert_eq!(total - closed_h - closed_v, 35);
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }

    #[test]
    fn small_sizes_do_not_panic() {
        for generator in generators() {
            let raster = generator.as_raster().unwrap();
            for size in [1, 2, 5] {
                testing::render(raster, size, "tiny");
            }
        }
    }
}
