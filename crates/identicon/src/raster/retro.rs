//! Display and print artefacts: phosphor masks, tape noise, slipped fields.

use std::f64::consts::PI;

use crate::color::{hsl, to_channel, ColorScheme, Rgb};
use crate::hash::get_bits;
use crate::registry::Generator;
use crate::surface::{Path2d, Rgba, Surface};

use super::bayer::BAYER_4;
use super::{paint_pixels, pixel_count, pixel_index, sweep, Seeded};

const LCD_BACKGROUND: Rgb = [0xb8, 0xc4, 0x70];
const LCD_ON: Rgb = [0x2d, 0x3a, 0x0e];
const LCD_OFF: Rgb = [0xaa, 0xb8, 0x60];

fn dim(rgb: Rgb, factor: f64) -> Rgb {
    rgb.map(|c| to_channel((f64::from(c) * factor).round()))
}

fn crt_rgb(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let seeded = Seeded::new(value);
    let base_hue = f64::from(seeded.h1() % 360);
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let scan = if y % 2 == 0 { 1.0 } else { 0.65 };
        let [r, g, b] = hsl((base_hue + f64::from(x) / s * 180.0) % 360.0, 85.0, 50.0);
        // Boost the sub-pixel this column represents, darken the others.
        let channel = x % 3;
        let mask = |value: u8, index: u32| {
            if channel == index {
                value.saturating_add(60)
            } else {
                value.saturating_sub(40)
            }
        };
        dim([mask(r, 0), mask(g, 1), mask(b, 2)], scan)
    });
}

fn vhs_tracking(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let band_height = if size <= 32 { 4 } else { 8 };
    let mut rows = Vec::with_capacity(pixel_count(size));
    for y in 0..size {
        let band = y / band_height;
        let row_offset = ((seeded.next() - 0.5) * 6.0).floor() as i64;
        let lightness = 35.0 + f64::from(band % 3) * 10.0;
        let [br, bg, bb] = hsl((hue + f64::from(band) * 15.0) % 360.0, 80.0, lightness);
        let n = i64::from(size);
        for x in 0..n {
            let sx = (x + row_offset + n) % n;
            let red_sep = if sx < n - 2 { 2 } else { 0 };
            let blue_sep = if sx > 2 { -2 } else { 0 };
            let ri = (sx + red_sep).clamp(0, n - 1);
            let bi = (sx + blue_sep).clamp(0, n - 1);
            let noise = (seeded.next() - 0.5) * 20.0;
            let fringe = |shifted: bool| if shifted { 40.0 } else { 0.0 };
            rows.push([
                to_channel(f64::from(br) + noise + fringe(ri != sx)),
                to_channel(f64::from(bg) + noise),
                to_channel(f64::from(bb) + noise + fringe(bi != sx)),
            ]);
        }
    }
    paint_pixels(surface, size, |x, y| rows[pixel_index(x, y, size)]);
}

fn interlace(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let hue = Seeded::new(value).hue();
    let s = f64::from(size);
    paint_pixels(surface, size, |x, y| {
        let even = y % 2 == 0;
        let phase = if even { 0.0 } else { PI };
        let t = (f64::from(x) / s + (f64::from(y) / s * PI * 2.0 + phase).sin() * 0.15 + 1.0) % 1.0;
        let h = (hue + t * 60.0 + phase * (180.0 / PI)) % 360.0;
        hsl(h, 80.0, if even { 55.0 } else { 40.0 })
    });
}

fn dot_matrix_printer(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let ink = hsl(hue, 70.0, 25.0);
    let paper = hsl((hue + 30.0) % 360.0, 20.0, 92.0);
    let s = f64::from(size);
    surface.set_fill_style(paper.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let spacing = if size <= 32 { 3.0 } else { 5.0 };
    let dot_radius = spacing * 0.35;
    let mut y = dot_radius;
    while y < s {
        let mut x = dot_radius;
        while x < s {
            let jx = (seeded.next() - 0.5) * 0.8;
            let jy = (seeded.next() - 0.5) * 0.8;
            let alpha = 0.6 + seeded.next() * 0.4;
            let mut dot = Path2d::new();
            dot.arc(x + jx, y + jy, dot_radius * (0.7 + seeded.next() * 0.5), 0.0, PI * 2.0);
            surface.set_fill_style(Rgba::new(ink, alpha).into());
            surface.fill_path(&dot);
            x += spacing;
        }
        y += spacing;
    }
}

fn thermal_print(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let s = f64::from(size);
    paint_pixels(surface, size, |_, y| {
        let t = f64::from(y) / s;
        let noise = (seeded.next() - 0.5) * 30.0;
        let v = (t * 200.0 + noise).round().clamp(0.0, 255.0);
        let warm = (v * 0.85).round().max(0.0);
        [
            to_channel(245.0 - v),
            to_channel(235.0 - warm),
            to_channel(220.0 - (v * 1.1).round()),
        ]
    });
    surface.set_fill_style(Rgba::new([0, 0, 0], 0.08).into());
    for y in (0..size).step_by(2) {
        surface.fill_rect(0.0, f64::from(y), s, 1.0);
    }
}

fn lcd_segments(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let bits = get_bits(Seeded::new(value).digest, 64);
    let s = f64::from(size);
    surface.set_fill_style(LCD_BACKGROUND.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let grid = if size <= 32 { 4u32 } else { 8 };
    let cell = s / f64::from(grid);
    let pad = cell * 0.1;
    for row in 0..grid {
        for col in 0..grid {
            let on = bits[(row * grid + col) as usize % bits.len()] == 1;
            surface.set_fill_style(if on { LCD_ON } else { LCD_OFF }.into());
            surface.fill_rect(
                f64::from(col) * cell + pad,
                f64::from(row) * cell + pad,
                cell - pad * 2.0,
                cell - pad * 2.0,
            );
        }
    }
}

fn glitch_bands(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let slice_height = if size <= 32 { 2 } else { 4 };
    let slices = size.div_ceil(slice_height);

    let mut colors = Vec::with_capacity(slices as usize);
    for si in 0..slices {
        // One draw per slice is reserved so the shift pass starts at a fixed
        // stream position.
        seeded.next();
        let lightness = 30.0 + f64::from(si % 4) * 12.0;
        colors.push(hsl((hue + f64::from(si) * 15.0) % 360.0, 85.0, lightness));
    }
    paint_pixels(surface, size, |_, y| colors[(y / slice_height) as usize]);

    for si in 0..slices {
        if seeded.next() >= 0.3 {
            continue;
        }
        let shift = ((seeded.next() - 0.5) * f64::from(size) * 0.25).floor() as i32;
        let y = si * slice_height;
        let height = slice_height * ((slices - 1).min(si + 1) - si);
        let clamped = height.min(size - y);
        if shift.abs() > 2 && clamped > 0 {
            let slice = surface.get_image_data(0, y as i32, size, clamped);
            surface.put_image_data(&slice, shift, y as i32);
            surface.put_image_data(&slice, shift - size as i32, y as i32);
        }
    }
}

fn dithered_scanlines(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let angle = seeded.next() * PI * 2.0;
    let light = hsl(hue, 90.0, 55.0);
    let dark = hsl((hue + 180.0) % 360.0, 90.0, 30.0);
    paint_pixels(surface, size, |x, y| {
        let scan = if y % 2 == 0 { 1.0 } else { 0.7 };
        let threshold = f64::from(BAYER_4[(y % 4) as usize][(x % 4) as usize]) / 16.0;
        let pick = if sweep(x, y, size, angle) > threshold { light } else { dark };
        dim(pick, scan)
    });
}

fn woodcut(surface: &mut dyn Surface, size: u32, value: &str, _: ColorScheme) {
    let mut seeded = Seeded::new(value);
    let hue = seeded.hue();
    let wood = hsl((hue + 25.0) % 360.0, 50.0, 80.0);
    let ink = hsl(hue, 60.0, 20.0);
    let s = f64::from(size);
    surface.set_fill_style(wood.into());
    surface.fill_rect(0.0, 0.0, s, s);

    let angle = seeded.next() * PI * 0.5 - PI * 0.25;
    let spacing = if size <= 32 { 3.0 } else { 5.0 };
    let lines = (s * 2.0 / spacing).ceil();
    surface.save();
    surface.translate(s / 2.0, s / 2.0);
    surface.rotate(angle);
    surface.set_stroke_style(Rgba::opaque(ink));
    let mut i = -lines / 2.0;
    while i < lines / 2.0 {
        let y = i * spacing;
        let t = i / lines + 0.5;
        let thickness = 0.5 + (t * PI).sin() * (spacing * 0.5) * (0.5 + seeded.next() * 0.5);
        let mut stroke = Path2d::new();
        stroke.move_to(-s, y);
        stroke.line_to(s, y);
        surface.set_line_width(thickness);
        surface.stroke_path(&stroke);
        i += 1.0;
    }
    surface.restore();
}

pub(crate) fn generators() -> Vec<Generator> {
    vec![
        Generator::raster("crt-rgb", crt_rgb),
        Generator::raster("vhs-tracking", vhs_tracking),
        Generator::raster("interlace", interlace),
        Generator::raster("dot-matrix-printer", dot_matrix_printer),
        Generator::raster("thermal-print", thermal_print),
        Generator::raster("lcd-segments", lcd_segments),
        Generator::raster("glitch-bands", glitch_bands),
        Generator::raster("dithered-scanlines", dithered_scanlines),
        Generator::raster("woodcut", woodcut),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing;

    #[test]
    fn crt_odd_rows_are_dimmer() {
        let image = testing::render(crt_rgb, 24, "evilrabbit");
        let luma = |y: u32| -> u32 {
            (0..24)
                .map(|x| image.pixel_at(x, y)[..3].iter().map(|&c| u32::from(c)).sum::<u32>())
                .sum()
        };
        assert!(luma(1) < luma(0));
        assert!(luma(3) < luma(2));
    }

    #[test]
    fn lcd_cells_follow_digest_bits() {
        let image = testing::render(lcd_segments, 32, "evilrabbit");
        let bits = get_bits(Seeded::new("evilrabbit").digest, 64);
        // Cell (0, 0) starts 0.8px in, so its edge blends into the corner.
        let corner = image.pixel_at(0, 0);
        for (got, want) in corner.iter().zip(LCD_BACKGROUND) {
            assert!(got.abs_diff(want) <= 4, "corner {corner:?} strays from the background");
        }
        for row in 0..4 {
            for col in 0..4 {
                let expected = if bits[(row * 4 + col) as usize] == 1 { LCD_ON } else { LCD_OFF };
                let pixel = image.pixel_at(col * 8 + 4, row * 8 + 4);
                assert_eq!([pixel[0], pixel[1], pixel[2]], expected);
            }
        }
    }

    #[test]
    fn glitch_pass_keeps_each_row_a_single_slice_colour() {
        // Shifted copies wrap around, so every row still holds only the
        // colour of some slice.
        let image = testing::render(glitch_bands, 32, "evilrabbit");
        for y in 0..32 {
            let first = image.pixel_at(0, y);
            assert!((0..32).all(|x| image.pixel_at(x, y) == first), "row {y} tore");
        }
    }

    #[test]
    fn outputs_are_stable() {
        for generator in generators() {
            testing::assert_deterministic_and_opaque(generator.as_raster().unwrap(), 32);
        }
    }
}
