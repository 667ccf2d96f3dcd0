//! Fill and stroke styles

use crate::color::Rgba;
use crate::geom::Matrix2d;

/// A gradient stop: `offset` is caller-controlled and never re-sorted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        LinearGradient { x0, y0, x1, y1, stops: Vec::new() }
    }

    pub fn add_color_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// New gradient with both endpoints mapped through `m`.
    pub fn apply_matrix(&self, m: &Matrix2d) -> LinearGradient {
        LinearGradient {
            x0: m.transform_x(self.x0, self.y0),
            y0: m.transform_y(self.x0, self.y0),
            x1: m.transform_x(self.x1, self.y1),
            y1: m.transform_y(self.x1, self.y1),
            stops: self.stops.clone(),
        }
    }
}

/// Two-circle radial gradient
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub x0: f64,
    pub y0: f64,
    pub r0: f64,
    pub x1: f64,
    pub y1: f64,
    pub r1: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        RadialGradient { x0, y0, r0, x1, y1, r1, stops: Vec::new() }
    }

    pub fn add_color_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// New gradient with both centers mapped through `m`; radii are kept.
    pub fn apply_matrix(&self, m: &Matrix2d) -> RadialGradient {
        RadialGradient {
            x0: m.transform_x(self.x0, self.y0),
            y0: m.transform_y(self.x0, self.y0),
            r0: self.r0,
            x1: m.transform_x(self.x1, self.y1),
            y1: m.transform_y(self.x1, self.y1),
            r1: self.r1,
            stops: self.stops.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Paint {
    /// Disables the corresponding fill or stroke
    #[default]
    None,
    Color(Rgba),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    /// Same paint expressed in the space mapped by `m`.
    pub fn apply_matrix(&self, m: &Matrix2d) -> Paint {
        match self {
            Paint::None => Paint::None,
            Paint::Color(c) => Paint::Color(*c),
            Paint::LinearGradient(g) => Paint::LinearGradient(g.apply_matrix(m)),
            Paint::RadialGradient(g) => Paint::RadialGradient(g.apply_matrix(m)),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Color(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::LinearGradient(g)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::RadialGradient(g)
    }
}
