use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// One recorded path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CubicTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// Path builder with canvas-style semantics.
///
/// Arcs are always swept clockwise (increasing angle in a y-down space) and
/// are stored as cubic Bézier segments of at most a quarter turn each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path2d {
    commands: Vec<PathCommand>,
    current: Option<(f64, f64)>,
    subpath_start: Option<(f64, f64)>,
}

impl Path2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn current_point(&self) -> Option<(f64, f64)> {
        self.current
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
        self.current = Some((x, y));
        self.subpath_start = Some((x, y));
    }

    /// Adds a straight segment. Without a current point this starts a new
    /// subpath instead.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.commands.push(PathCommand::LineTo(x, y));
        self.current = Some((x, y));
    }

    pub fn close_path(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.commands.push(PathCommand::Close);
        self.current = self.subpath_start;
    }

    /// Appends a clockwise circular arc centred on `(cx, cy)`.
    ///
    /// The start point is connected to the current point with a line, or
    /// begins a new subpath when there is none. A sweep of `2π` or more draws
    /// a full circle. Negative radii are ignored.
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        let sweep = arc_sweep(start, end);
        let (sx, sy) = (cx + radius * start.cos(), cy + radius * start.sin());
        self.line_to(sx, sy);
        if sweep == 0.0 || radius == 0.0 {
            return;
        }

        let segments = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut angle = start;
        for _ in 0..segments {
            let next = angle + step;
            let (cos_a, sin_a) = (angle.cos(), angle.sin());
            let (cos_b, sin_b) = (next.cos(), next.sin());
            let p0 = (cx + radius * cos_a, cy + radius * sin_a);
            let p3 = (cx + radius * cos_b, cy + radius * sin_b);
            let c1 = (p0.0 - k * radius * sin_a, p0.1 + k * radius * cos_a);
            let c2 = (p3.0 + k * radius * sin_b, p3.1 - k * radius * cos_b);
            self.commands
                .push(PathCommand::CubicTo(c1.0, c1.1, c2.0, c2.1, p3.0, p3.1));
            angle = next;
        }
        self.current = Some((cx + radius * end.cos(), cy + radius * end.sin()));
    }

    /// Rectangle with uniformly rounded corners as a closed subpath.
    pub fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
        let r = radius.max(0.0).min(width.abs() / 2.0).min(height.abs() / 2.0);
        self.move_to(x + r, y);
        self.line_to(x + width - r, y);
        self.arc(x + width - r, y + r, r, -FRAC_PI_2, 0.0);
        self.line_to(x + width, y + height - r);
        self.arc(x + width - r, y + height - r, r, 0.0, FRAC_PI_2);
        self.line_to(x + r, y + height);
        self.arc(x + r, y + height - r, r, FRAC_PI_2, PI);
        self.line_to(x, y + r);
        self.arc(x + r, y + r, r, PI, PI + FRAC_PI_2);
        self.close_path();
        self.move_to(x, y);
    }
}

/// Clockwise sweep between two angles, normalised into `[0, 2π]`.
fn arc_sweep(start: f64, end: f64) -> f64 {
    let delta = end - start;
    if delta >= TAU {
        TAU
    } else {
        delta.rem_euclid(TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_point(path: &Path2d) -> (f64, f64) {
        match path.commands().last() {
            Some(PathCommand::CubicTo(.., x, y)) => (*x, *y),
            Some(PathCommand::LineTo(x, y)) | Some(PathCommand::MoveTo(x, y)) => (*x, *y),
            other => panic!("unexpected trailing command {other:?}"),
        }
    }

    #[test]
    fn first_arc_starts_a_subpath() {
        let mut path = Path2d::new();
        path.arc(10.0, 10.0, 5.0, 0.0, TAU);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(15.0, 10.0));
        assert_eq!(path.commands().len(), 5);
        let (x, y) = end_point(&path);
        assert!((x - 15.0).abs() < 1e-9 && (y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn arc_after_move_draws_connecting_line() {
        let mut path = Path2d::new();
        path.move_to(0.0, 0.0);
        path.arc(10.0, 0.0, 2.0, PI, 0.0);
        assert!(matches!(path.commands()[1], PathCommand::LineTo(x, _) if (x - 8.0).abs() < 1e-9));
        // A half turn needs two quarter segments.
        assert_eq!(path.commands().len(), 4);
        let (x, y) = end_point(&path);
        assert!((x - 12.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn sweep_wraps_negative_deltas() {
        assert!((arc_sweep(PI, 0.0) - PI).abs() < 1e-12);
        assert!((arc_sweep(1.5 * PI, 0.0) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(arc_sweep(0.0, 3.0 * TAU), TAU);
        assert_eq!(arc_sweep(1.0, 1.0), 0.0);
    }

    #[test]
    fn quarter_arc_control_points_stay_on_circle_tangents() {
        let mut path = Path2d::new();
        path.arc(0.0, 0.0, 1.0, 0.0, FRAC_PI_2);
        let PathCommand::CubicTo(c1x, c1y, c2x, c2y, x, y) = path.commands()[1] else {
            panic!("expected a cubic segment");
        };
        assert!((c1x - 1.0).abs() < 1e-12 && c1y > 0.5);
        assert!(c2x > 0.5 && (c2y - 1.0).abs() < 1e-12);
        assert!(x.abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn line_without_current_point_moves() {
        let mut path = Path2d::new();
        path.line_to(3.0, 4.0);
        assert_eq!(path.commands(), &[PathCommand::MoveTo(3.0, 4.0)]);
    }
}
