//! Drawing surface capability consumed by the raster generators.
//!
//! The generators only ever talk to [`Surface`]; the crate ships a software
//! implementation in [`SkiaSurface`], and hosts can provide their own (a
//! browser canvas, a framebuffer, a recording mock in tests).

mod path;
mod skia;

pub use path::{Path2d, PathCommand};
pub use skia::SkiaSurface;

use crate::color::Rgb;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("cannot allocate a {width}x{height} surface")]
    InvalidSize { width: u32, height: u32 },
}

/// Unpremultiplied RGBA8 pixels, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Creates a transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wraps an existing RGBA8 buffer, returning `None` when the length does
    /// not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Writes an opaque colour at linear pixel index `index`.
    pub fn set_pixel(&mut self, index: usize, rgb: Rgb) {
        self.set_rgba(index, [rgb[0], rgb[1], rgb[2], 255]);
    }

    pub fn set_rgba(&mut self, index: usize, rgba: [u8; 4]) {
        let p = index * 4;
        self.data[p..p + 4].copy_from_slice(&rgba);
    }

    pub fn rgba(&self, index: usize) -> [u8; 4] {
        let p = index * 4;
        [
            self.data[p],
            self.data[p + 1],
            self.data[p + 2],
            self.data[p + 3],
        ]
    }

    pub fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        self.rgba(y as usize * self.width as usize + x as usize)
    }
}

/// Colour with a fractional alpha, as used for fills and strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque([0, 0, 0]);

    pub const fn opaque(rgb: Rgb) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 1.0,
        }
    }

    pub const fn new(rgb: Rgb, a: f64) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a,
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Rgba::opaque(rgb)
    }
}

/// Concentric radial gradient between an inner and outer radius.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stops: Vec<(f64, Rgba)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl From<Rgb> for Paint {
    fn from(rgb: Rgb) -> Self {
        Paint::Solid(Rgba::opaque(rgb))
    }
}

impl From<Rgba> for Paint {
    fn from(rgba: Rgba) -> Self {
        Paint::Solid(rgba)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Blend applied by fills and strokes. Pixel region writes ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SourceOver,
    Screen,
}

/// 2D drawing capabilities required by the raster catalog.
///
/// Coordinates are in pixels with the origin at the top-left. Path geometry
/// is interpreted through the current transform; `put_image_data` and
/// `get_image_data` always address device pixels directly.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resizes the backing store. Like a canvas, this clears every pixel and
    /// resets the drawing state.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;
    fn clear(&mut self);

    /// Replaces the pixels under `image` placed at `(dx, dy)`, clipping to the
    /// surface bounds.
    fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32);
    /// Copies a region; pixels outside the surface read as transparent black.
    fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> ImageData;

    fn set_fill_style(&mut self, paint: Paint);
    fn set_stroke_style(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    /// Sets the dash pattern; an empty slice draws solid lines.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_composite(&mut self, mode: Composite);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_path(&mut self, path: &Path2d);
    fn stroke_path(&mut self, path: &Path2d);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    /// Rotates the current transform clockwise by `angle` radians.
    fn rotate(&mut self, angle: f64);

    /// Snapshot of the whole surface.
    fn image_data(&self) -> ImageData {
        self.get_image_data(0, 0, self.width(), self.height())
    }
}
