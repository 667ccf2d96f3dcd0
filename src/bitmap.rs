//! Minimal in-memory pixel containers produced and consumed by codecs.
//!
//! `Bitmap32` stores canonical `Rgba` values row-major, top row first.
//! `Bitmap8` stores palette indices with a 256-entry palette.

use crate::color::{ColorFormat, Endian, Rgba};
use crate::{Error, Result};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap32 {
    width: u32,
    height: u32,
    data: Vec<Rgba>,
}

impl Bitmap32 {
    /// Fully transparent bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::default())
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Bitmap32 { width, height, data: vec![color; width as usize * height as usize] }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<Rgba>) -> Result<Self> {
        let area = width as usize * height as usize;
        if data.len() != area {
            return Err(Error::BufferTooSmall { needed: area, available: data.len() });
        }
        Ok(Bitmap32 { width, height, data })
    }

    /// Decode `bytes` in `format` into a new bitmap.
    pub fn decode(width: u32, height: u32, format: &ColorFormat, bytes: &[u8], endian: Endian) -> Result<Self> {
        let mut out = Self::new(width, height);
        format.decode_into(bytes, 0, &mut out.data, endian)?;
        Ok(out)
    }

    /// Encode every pixel, row-major, in `format`.
    pub fn encode(&self, format: &ColorFormat, endian: Endian) -> Vec<u8> {
        format.encode(&self.data, endian)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.data.len()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Returns false when `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i] = color;
                true
            }
            None => false,
        }
    }

    /// Reverse the row order in place.
    pub fn flip_y(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        if w == 0 {
            return;
        }
        for y in 0..h / 2 {
            let (top, bottom) = self.data.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Lowercase hex SHA-256 of the pixels in canonical little-endian RGBA.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        for c in &self.data {
            hasher.update(c.0.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap8 {
    width: u32,
    height: u32,
    data: Vec<u8>,
    palette: Vec<Rgba>,
}

impl Bitmap8 {
    pub fn new(width: u32, height: u32) -> Self {
        Bitmap8 {
            width,
            height,
            data: vec![0; width as usize * height as usize],
            palette: vec![Rgba::default(); 256],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &[Rgba] {
        &self.palette
    }

    pub fn set_palette_entry(&mut self, index: u8, color: Rgba) {
        self.palette[index as usize] = color;
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.data[y as usize * self.width as usize + x as usize])
    }

    pub fn set(&mut self, x: u32, y: u32, index: u8) -> bool {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = index;
            true
        } else {
            false
        }
    }

    /// Resolved color through the palette
    pub fn get32(&self, x: u32, y: u32) -> Option<Rgba> {
        self.get(x, y).map(|i| self.palette[i as usize])
    }

    pub fn to_bitmap32(&self) -> Bitmap32 {
        Bitmap32 {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&i| self.palette[i as usize]).collect(),
        }
    }
}

/// A decoded image in either direct or indexed storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bitmap {
    Rgba32(Bitmap32),
    Indexed8(Bitmap8),
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        match self {
            Bitmap::Rgba32(b) => b.width(),
            Bitmap::Indexed8(b) => b.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Bitmap::Rgba32(b) => b.height(),
            Bitmap::Indexed8(b) => b.height(),
        }
    }

    pub fn bits_per_pixel(&self) -> u8 {
        match self {
            Bitmap::Rgba32(_) => 32,
            Bitmap::Indexed8(_) => 8,
        }
    }

    pub fn to_bitmap32(&self) -> Bitmap32 {
        match self {
            Bitmap::Rgba32(b) => b.clone(),
            Bitmap::Indexed8(b) => b.to_bitmap32(),
        }
    }
}

impl From<Bitmap32> for Bitmap {
    fn from(b: Bitmap32) -> Self {
        Bitmap::Rgba32(b)
    }
}

impl From<Bitmap8> for Bitmap {
    fn from(b: Bitmap8) -> Self {
        Bitmap::Indexed8(b)
    }
}
