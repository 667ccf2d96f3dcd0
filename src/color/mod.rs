//! Canonical color value and pixel format conversion

pub mod format;

pub use format::{Channel, ColorFormat, Endian};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical 32-bit color: R in bits 0-7, G 8-15, B 16-23, A 24-31.
///
/// Every `ColorFormat` decodes into and encodes from this value, so any two
/// formats can be converted through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba((r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24))
    }

    /// Opaque color from its three components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::pack(r, g, b, 0xFF)
    }

    pub const fn r(self) -> u8 {
        self.0 as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    pub fn rf(self) -> f32 {
        self.r() as f32 / 255.0
    }

    pub fn gf(self) -> f32 {
        self.g() as f32 / 255.0
    }

    pub fn bf(self) -> f32 {
        self.b() as f32 / 255.0
    }

    pub fn af(self) -> f32 {
        self.a() as f32 / 255.0
    }

    /// Components as an `(r, g, b, a)` tuple
    pub const fn components(self) -> (u8, u8, u8, u8) {
        (self.r(), self.g(), self.b(), self.a())
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r(), self.g(), self.b(), self.a())
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Rgba::pack(r, g, b, a)
    }
}

/// Named colors
pub mod colors {
    use super::Rgba;

    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Rgba = Rgba::rgb(0xFF, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 0xFF, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 0xFF);
    pub const TRANSPARENT: Rgba = Rgba::pack(0, 0, 0, 0);
}
