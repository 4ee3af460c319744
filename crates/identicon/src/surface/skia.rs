use tiny_skia::{
    BlendMode, Color, ColorU8, FillRule, GradientStop, Pixmap, Point, Rect, SpreadMode, Stroke,
    StrokeDash, Transform,
};

use super::{
    Composite, ImageData, LineCap, LineJoin, Paint, Path2d, PathCommand, RadialGradient, Rgba,
    Surface, SurfaceError,
};

#[derive(Debug, Clone)]
struct DrawState {
    fill: Paint,
    stroke: Rgba,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    dash: Vec<f32>,
    composite: Composite,
    transform: Transform,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Paint::Solid(Rgba::BLACK),
            stroke: Rgba::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash: Vec::new(),
            composite: Composite::SourceOver,
            transform: Transform::identity(),
        }
    }
}

/// Software [`Surface`] backed by a tiny-skia pixmap.
pub struct SkiaSurface {
    pixmap: Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn paint(&self, style: &Paint) -> Option<tiny_skia::Paint<'static>> {
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            blend_mode: blend_mode(self.state.composite),
            ..tiny_skia::Paint::default()
        };
        match style {
            Paint::Solid(color) => paint.set_color(skia_color(*color)),
            Paint::Radial(gradient) => paint.shader = radial_shader(gradient)?,
        }
        Some(paint)
    }
}

impl Surface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.pixmap = allocate(width, height)?;
        self.state = DrawState::default();
        self.stack.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32) {
        let (width, height) = (self.width() as i64, self.height() as i64);
        let pixels = self.pixmap.pixels_mut();
        for sy in 0..image.height() {
            let ty = i64::from(dy) + i64::from(sy);
            if ty < 0 || ty >= height {
                continue;
            }
            for sx in 0..image.width() {
                let tx = i64::from(dx) + i64::from(sx);
                if tx < 0 || tx >= width {
                    continue;
                }
                let [r, g, b, a] = image.pixel_at(sx, sy);
                pixels[(ty * width + tx) as usize] = ColorU8::from_rgba(r, g, b, a).premultiply();
            }
        }
    }

    fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> ImageData {
        let mut out = ImageData::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let (sx, sy) = (i64::from(x) + i64::from(col), i64::from(y) + i64::from(row));
                if sx < 0 || sy < 0 {
                    continue;
                }
                if let Some(pixel) = self.pixmap.pixel(sx as u32, sy as u32) {
                    let c = pixel.demultiply();
                    out.set_rgba(
                        (row * width + col) as usize,
                        [c.red(), c.green(), c.blue(), c.alpha()],
                    );
                }
            }
        }
        out
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.state.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width as f32;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        if segments.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return;
        }
        let mut dash: Vec<f32> = segments.iter().map(|&s| s as f32).collect();
        if dash.len() % 2 == 1 {
            dash.extend_from_within(..);
        }
        self.state.dash = dash;
    }

    fn set_composite(&mut self, mode: Composite) {
        self.state.composite = mode;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let Some(paint) = self.paint(&self.state.fill) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint, self.state.transform, None);
    }

    fn fill_path(&mut self, path: &Path2d) {
        let Some(skia_path) = build_path(path) else {
            return;
        };
        let Some(paint) = self.paint(&self.state.fill) else {
            return;
        };
        self.pixmap.fill_path(
            &skia_path,
            &paint,
            FillRule::Winding,
            self.state.transform,
            None,
        );
    }

    fn stroke_path(&mut self, path: &Path2d) {
        let Some(skia_path) = build_path(path) else {
            return;
        };
        let Some(paint) = self.paint(&Paint::Solid(self.state.stroke)) else {
            return;
        };
        let stroke = Stroke {
            width: self.state.line_width,
            line_cap: match self.state.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.state.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: StrokeDash::new(self.state.dash.clone(), 0.0),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, self.state.transform, None);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_translate(x as f32, y as f32));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_rotate(angle.to_degrees() as f32));
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })
}

fn blend_mode(mode: Composite) -> BlendMode {
    match mode {
        Composite::SourceOver => BlendMode::SourceOver,
        Composite::Screen => BlendMode::Screen,
    }
}

fn skia_color(color: Rgba) -> Color {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// tiny-skia radial gradients start at radius zero, so the inner radius is
/// folded into the stop offsets. Inside the inner radius the first stop's
/// colour is held, matching canvas behaviour.
fn radial_shader(gradient: &RadialGradient) -> Option<tiny_skia::Shader<'static>> {
    let outer = gradient.outer_radius;
    if outer.is_nan() || outer <= 0.0 || gradient.stops.is_empty() {
        return None;
    }
    let span = outer - gradient.inner_radius;
    let remap = |offset: f64| ((gradient.inner_radius + offset * span) / outer).clamp(0.0, 1.0);

    let mut stops = Vec::with_capacity(gradient.stops.len() + 1);
    stops.push(GradientStop::new(0.0, skia_color(gradient.stops[0].1)));
    for (offset, color) in &gradient.stops {
        stops.push(GradientStop::new(remap(*offset) as f32, skia_color(*color)));
    }
    let center = Point::from_xy(gradient.cx as f32, gradient.cy as f32);
    tiny_skia::RadialGradient::new(
        center,
        center,
        outer as f32,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}

fn build_path(path: &Path2d) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(x, y) => builder.move_to(x as f32, y as f32),
            PathCommand::LineTo(x, y) => builder.line_to(x as f32, y as f32),
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => builder.cubic_to(
                x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
            ),
            PathCommand::Close => builder.close(),
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(SkiaSurface::new(0, 8).is_err());
        let mut surface = SkiaSurface::new(4, 4).unwrap();
        assert!(surface.resize(4, 0).is_err());
    }

    #[test]
    fn image_data_round_trips_through_pixmap() {
        let mut surface = SkiaSurface::new(3, 2).unwrap();
        let mut image = ImageData::new(3, 2);
        image.set_pixel(4, [10, 20, 30]);
        surface.put_image_data(&image, 0, 0);
        let read = surface.image_data();
        assert_eq!(read.rgba(4), [10, 20, 30, 255]);
        assert_eq!(read.rgba(0), [0, 0, 0, 0]);
    }

    #[test]
    fn put_image_data_clips_offsets() {
        let mut surface = SkiaSurface::new(4, 1).unwrap();
        let mut strip = ImageData::new(4, 1);
        for i in 0..4 {
            strip.set_pixel(i, [i as u8 * 10, 0, 0]);
        }
        surface.put_image_data(&strip, 2, 0);
        surface.put_image_data(&strip, -3, 0);
        let read = surface.image_data();
        assert_eq!(read.rgba(0)[0], 30);
        assert_eq!(read.rgba(2)[0], 0);
        assert_eq!(read.rgba(3)[0], 10);
        assert_eq!(read.rgba(1)[3], 0);
    }

    #[test]
    fn fill_rect_covers_whole_pixels() {
        let mut surface = SkiaSurface::new(4, 4).unwrap();
        surface.set_fill_style(Paint::from([200, 100, 50]));
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        let read = surface.image_data();
        assert_eq!(read.pixel_at(1, 1), [200, 100, 50, 255]);
        assert_eq!(read.pixel_at(2, 2)[3], 0);
    }

    #[test]
    fn screen_composite_adds_channels() {
        let mut surface = SkiaSurface::new(2, 2).unwrap();
        surface.set_fill_style(Paint::from([255, 0, 0]));
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        surface.set_composite(Composite::Screen);
        surface.set_fill_style(Paint::from([0, 0, 255]));
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(surface.image_data().pixel_at(0, 0), [255, 0, 255, 255]);
    }

    #[test]
    fn save_restore_scopes_transform() {
        let mut surface = SkiaSurface::new(8, 8).unwrap();
        surface.set_fill_style(Paint::from([255, 255, 255]));
        surface.save();
        surface.translate(4.0, 4.0);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        surface.restore();
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);
        let read = surface.image_data();
        assert_eq!(read.pixel_at(5, 5)[3], 255);
        assert_eq!(read.pixel_at(0, 0)[3], 255);
        assert_eq!(read.pixel_at(2, 2)[3], 0);
    }

    #[test]
    fn circle_fill_hits_centre_not_corner() {
        let mut surface = SkiaSurface::new(16, 16).unwrap();
        surface.set_fill_style(Paint::from([0, 255, 0]));
        let mut path = Path2d::new();
        path.arc(8.0, 8.0, 5.0, 0.0, TAU);
        surface.fill_path(&path);
        let read = surface.image_data();
        assert_eq!(read.pixel_at(8, 8), [0, 255, 0, 255]);
        assert_eq!(read.pixel_at(0, 0)[3], 0);
    }
}
