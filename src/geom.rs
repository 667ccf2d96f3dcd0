//! Small geometry primitives shared by paths, paints and the drawing context

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rectangle { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// 2x3 affine matrix mapping `(x, y)` to
/// `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2d {
    pub const IDENTITY: Matrix2d = Matrix2d { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Matrix2d { a, b, c, d, tx, ty }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn transform_x(&self, x: f64, y: f64) -> f64 {
        self.a * x + self.c * y + self.tx
    }

    pub fn transform_y(&self, x: f64, y: f64) -> f64 {
        self.b * x + self.d * y + self.ty
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(self.transform_x(p.x, p.y), self.transform_y(p.x, p.y))
    }

    /// `self` applied after `first`: the result maps `p` to `self(first(p))`.
    pub fn then_after(&self, first: &Matrix2d) -> Matrix2d {
        let m = self;
        let n = first;
        Matrix2d {
            a: n.a * m.a + n.b * m.c,
            b: n.a * m.b + n.b * m.d,
            c: n.c * m.a + n.d * m.c,
            d: n.c * m.b + n.d * m.d,
            tx: n.tx * m.a + n.ty * m.c + m.tx,
            ty: n.tx * m.b + n.ty * m.d + m.ty,
        }
    }

    /// Insert `m` closest to the geometry: points go through `m` first.
    pub fn premultiply(&mut self, m: &Matrix2d) {
        *self = self.then_after(m);
    }

    pub fn pretranslate(&mut self, tx: f64, ty: f64) {
        self.premultiply(&Self::translation(tx, ty));
    }

    pub fn prescale(&mut self, sx: f64, sy: f64) {
        self.premultiply(&Self::scaling(sx, sy));
    }

    pub fn prerotate(&mut self, angle: f64) {
        self.premultiply(&Self::rotation(angle));
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
