//! Backend-agnostic path geometry

use crate::geom::{Point, Rectangle};
use std::f64::consts::{FRAC_PI_2, PI};

/// Fill rule for self-intersecting paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    EvenOdd,
    #[default]
    NonZero,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, ax: f64, ay: f64 },
    CubicTo { cx1: f64, cy1: f64, cx2: f64, cy2: f64, ax: f64, ay: f64 },
    Close,
}

/// Receives path segments in insertion order.
///
/// Renderers consume geometry only through this trait.
pub trait PathVisitor {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quad_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64);
    fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, ax: f64, ay: f64);
    fn close(&mut self);
}

/// Ordered, append-only list of path segments plus a winding rule
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphicsPath {
    commands: Vec<PathCommand>,
    winding: Winding,
    /// Start of the current subpath, where `close` returns to
    start: Option<Point>,
    current: Option<Point>,
}

impl GraphicsPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_winding(winding: Winding) -> Self {
        GraphicsPath { winding, ..Self::default() }
    }

    pub fn winding(&self) -> Winding {
        self.winding
    }

    pub fn set_winding(&mut self, winding: Winding) {
        self.winding = winding;
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Current pen position, if any segment has been added
    pub fn last_point(&self) -> Option<Point> {
        self.current
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
        self.start = Some(Point::new(x, y));
        self.current = self.start;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.ensure_start(x, y);
        self.commands.push(PathCommand::LineTo { x, y });
        self.current = Some(Point::new(x, y));
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64) {
        self.ensure_start(cx, cy);
        self.commands.push(PathCommand::QuadTo { cx, cy, ax, ay });
        self.current = Some(Point::new(ax, ay));
    }

    pub fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, ax: f64, ay: f64) {
        self.ensure_start(cx1, cy1);
        self.commands.push(PathCommand::CubicTo { cx1, cy1, cx2, cy2, ax, ay });
        self.current = Some(Point::new(ax, ay));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
        self.current = self.start;
    }

    // A drawing segment on an empty path starts a subpath at its first point.
    fn ensure_start(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    /// Circular arc around `(cx, cy)` from angle `start` to `end` (radians).
    ///
    /// Connects from the current point with a line, then emits one cubic per
    /// quarter turn at most. Sweeps are clamped to a full circle.
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64) {
        let sweep = (end - start).clamp(-2.0 * PI, 2.0 * PI);
        let sx = cx + r * start.cos();
        let sy = cy + r * start.sin();
        if self.current.is_some() {
            self.line_to(sx, sy);
        } else {
            self.move_to(sx, sy);
        }
        if sweep == 0.0 || r == 0.0 {
            return;
        }
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut a0 = start;
        for _ in 0..segments {
            let a1 = a0 + step;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();
            self.cubic_to(
                cx + r * (c0 - k * s0),
                cy + r * (s0 + k * c0),
                cx + r * (c1 + k * s1),
                cy + r * (s1 - k * c1),
                cx + r * c1,
                cy + r * s1,
            );
            a0 = a1;
        }
    }

    /// Canvas-style tangent arc: a line towards `(x1, y1)` rounded with radius
    /// `r` into the direction of `(x2, y2)`.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, r: f64) {
        let p0 = match self.current {
            Some(p) => p,
            None => {
                self.move_to(x1, y1);
                return;
            }
        };
        let (v0x, v0y) = (p0.x - x1, p0.y - y1);
        let (v2x, v2y) = (x2 - x1, y2 - y1);
        let len0 = v0x.hypot(v0y);
        let len2 = v2x.hypot(v2y);
        let cross = v0x * v2y - v0y * v2x;
        if r <= 0.0 || len0 == 0.0 || len2 == 0.0 || cross.abs() < 1e-12 {
            self.line_to(x1, y1);
            return;
        }
        let (u0x, u0y) = (v0x / len0, v0y / len0);
        let (u2x, u2y) = (v2x / len2, v2y / len2);
        let cos = (u0x * u2x + u0y * u2y).clamp(-1.0, 1.0);
        let half = cos.acos() / 2.0;
        let dist = r / half.tan();
        let (t0x, t0y) = (x1 + u0x * dist, y1 + u0y * dist);
        let (t2x, t2y) = (x1 + u2x * dist, y1 + u2y * dist);
        let (bx, by) = (u0x + u2x, u0y + u2y);
        let blen = bx.hypot(by);
        let center_dist = r / half.sin();
        let cx = x1 + bx / blen * center_dist;
        let cy = y1 + by / blen * center_dist;
        let start = (t0y - cy).atan2(t0x - cx);
        let mut end = (t2y - cy).atan2(t2x - cx);
        // Sweep the short way round, in the turning direction of the corner.
        if cross < 0.0 {
            while end < start {
                end += 2.0 * PI;
            }
        } else {
            while end > start {
                end -= 2.0 * PI;
            }
        }
        self.arc(cx, cy, r, start, end);
    }

    /// Append every segment of `other`, keeping this path's winding.
    pub fn append(&mut self, other: &GraphicsPath) {
        other.visit(self);
    }

    /// Call back into `visitor` once per segment, in insertion order.
    pub fn visit<V: PathVisitor + ?Sized>(&self, visitor: &mut V) {
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { x, y } => visitor.move_to(x, y),
                PathCommand::LineTo { x, y } => visitor.line_to(x, y),
                PathCommand::QuadTo { cx, cy, ax, ay } => visitor.quad_to(cx, cy, ax, ay),
                PathCommand::CubicTo { cx1, cy1, cx2, cy2, ax, ay } => visitor.cubic_to(cx1, cy1, cx2, cy2, ax, ay),
                PathCommand::Close => visitor.close(),
            }
        }
    }

    /// Bounding box of all points, control points included.
    pub fn bounds(&self) -> Option<Rectangle> {
        let mut b = BoundsVisitor::default();
        self.visit(&mut b);
        b.min.zip(b.max).map(|(min, max)| Rectangle::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}

impl PathVisitor for GraphicsPath {
    fn move_to(&mut self, x: f64, y: f64) {
        GraphicsPath::move_to(self, x, y)
    }

    fn line_to(&mut self, x: f64, y: f64) {
        GraphicsPath::line_to(self, x, y)
    }

    fn quad_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64) {
        GraphicsPath::quad_to(self, cx, cy, ax, ay)
    }

    fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, ax: f64, ay: f64) {
        GraphicsPath::cubic_to(self, cx1, cy1, cx2, cy2, ax, ay)
    }

    fn close(&mut self) {
        GraphicsPath::close(self)
    }
}

#[derive(Default)]
struct BoundsVisitor {
    min: Option<Point>,
    max: Option<Point>,
}

impl BoundsVisitor {
    fn add(&mut self, x: f64, y: f64) {
        let min = self.min.get_or_insert(Point::new(x, y));
        min.x = min.x.min(x);
        min.y = min.y.min(y);
        let max = self.max.get_or_insert(Point::new(x, y));
        max.x = max.x.max(x);
        max.y = max.y.max(y);
    }
}

impl PathVisitor for BoundsVisitor {
    fn move_to(&mut self, x: f64, y: f64) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.add(x, y);
    }

    fn quad_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64) {
        self.add(cx, cy);
        self.add(ax, ay);
    }

    fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, ax: f64, ay: f64) {
        self.add(cx1, cy1);
        self.add(cx2, cy2);
        self.add(ax, ay);
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl PathVisitor for Collect {
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("M{},{}", x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("L{},{}", x, y));
        }
        fn quad_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64) {
            self.0.push(format!("Q{},{} {},{}", cx, cy, ax, ay));
        }
        fn cubic_to(&mut self, _: f64, _: f64, _: f64, _: f64, ax: f64, ay: f64) {
            self.0.push(format!("C{},{}", ax, ay));
        }
        fn close(&mut self) {
            self.0.push("Z".into());
        }
    }

    #[test]
    fn visit_preserves_insertion_order() {
        let mut p = GraphicsPath::new();
        p.move_to(0.0, 0.0);
        p.line_to(1.0, 0.0);
        p.quad_to(2.0, 0.0, 2.0, 1.0);
        p.cubic_to(2.0, 2.0, 1.0, 3.0, 0.0, 3.0);
        p.close();
        let mut c = Collect::default();
        p.visit(&mut c);
        assert_eq!(c.0, vec!["M0,0", "L1,0", "Q2,0 2,1", "C0,3", "Z"]);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = GraphicsPath::with_winding(Winding::EvenOdd);
        a.move_to(1.0, 1.0);
        let mut b = a.clone();
        b.line_to(5.0, 5.0);
        b.set_winding(Winding::NonZero);
        assert_eq!(a.len(), 1);
        assert_eq!(a.winding(), Winding::EvenOdd);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn line_on_empty_path_starts_subpath() {
        let mut p = GraphicsPath::new();
        p.line_to(3.0, 4.0);
        let mut c = Collect::default();
        p.visit(&mut c);
        assert_eq!(c.0, vec!["M3,4", "L3,4"]);
    }

    #[test]
    fn close_returns_pen_to_subpath_start() {
        let mut p = GraphicsPath::new();
        p.rect(1.0, 2.0, 3.0, 4.0);
        assert_eq!(p.last_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(p.bounds(), Some(Rectangle::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn full_circle_is_four_cubics_ending_at_start() {
        let mut p = GraphicsPath::new();
        p.arc(0.0, 0.0, 10.0, 0.0, 2.0 * PI);
        assert_eq!(p.len(), 5);
        let end = p.last_point().unwrap();
        assert!((end.x - 10.0).abs() < 1e-9 && end.y.abs() < 1e-9);
        let b = p.bounds().unwrap();
        // control points of the quarter cubics bulge slightly past the radius
        assert!(b.width >= 20.0 && b.width < 23.0);
    }

    #[test]
    fn arc_to_rounds_a_right_angle() {
        let mut p = GraphicsPath::new();
        p.move_to(0.0, 0.0);
        p.arc_to(10.0, 0.0, 10.0, 10.0, 2.0);
        let mut c = Collect::default();
        p.visit(&mut c);
        assert_eq!(c.0.len(), 3);
        assert_eq!(c.0[0], "M0,0");
        assert!(c.0[1].starts_with('L'));
        assert!(c.0[2].starts_with('C'));
        let b = p.bounds().unwrap();
        assert!(b.right() <= 10.0 + 1e-9);
        let end = p.last_point().unwrap();
        assert!((end.x - 10.0).abs() < 1e-9 && (end.y - 2.0).abs() < 1e-9, "{:?}", end);
    }

    #[test]
    fn arc_to_degenerates_to_line() {
        let mut p = GraphicsPath::new();
        p.move_to(0.0, 0.0);
        p.arc_to(5.0, 0.0, 10.0, 0.0, 3.0);
        p.arc_to(5.0, 5.0, 9.0, 9.0, 0.0);
        let mut c = Collect::default();
        p.visit(&mut c);
        assert_eq!(c.0, vec!["M0,0", "L5,0", "L5,5"]);
    }

    #[test]
    fn append_copies_segments() {
        let mut a = GraphicsPath::new();
        a.move_to(0.0, 0.0);
        let mut b = GraphicsPath::new();
        b.rect(0.0, 0.0, 1.0, 1.0);
        a.append(&b);
        assert_eq!(a.len(), 6);
    }
}
