//! Packed pixel formats and bulk conversion to and from canonical `Rgba`.
//!
//! A `ColorFormat` describes where each channel lives inside a 16, 24 or
//! 32-bit packed integer. Channel values are scaled proportionally between
//! their native width and 8 bits, so a 5-bit `31` becomes `255` rather than
//! `248`.

use super::Rgba;
use crate::{Error, Result};

/// Byte order used to assemble a packed pixel from raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Position and width of one channel inside the packed integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Channel {
    pub offset: u8,
    pub size: u8,
}

impl Channel {
    pub const fn new(offset: u8, size: u8) -> Self {
        Channel { offset, size }
    }

    /// A channel that is absent from the format
    pub const NONE: Channel = Channel { offset: 0, size: 0 };

    const fn max(self) -> u32 {
        if self.size == 0 {
            0
        } else {
            (1u32 << self.size) - 1
        }
    }

    fn field_mask(self) -> u64 {
        (self.max() as u64) << self.offset
    }

    /// Extract and scale to 0..=255; `default` is returned for absent channels.
    fn extract(self, packed: u32, default: u8) -> u8 {
        let max = self.max();
        if max == 0 {
            return default;
        }
        let v = (packed >> self.offset) & max;
        ((v * 255 + max / 2) / max) as u8
    }

    /// Scale an 8-bit value down to the channel width and shift it into place.
    fn insert(self, value: u8) -> u32 {
        let max = self.max();
        if max == 0 {
            return 0;
        }
        let v = (value as u32 * max + 127) / 255;
        v << self.offset
    }
}

/// Bit layout of a packed pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFormat {
    bpp: u8,
    r: Channel,
    g: Channel,
    b: Channel,
    a: Channel,
}

impl ColorFormat {
    /// R, G, B, A bytes in memory order (little-endian 32-bit)
    pub const RGBA: ColorFormat = Self::layout(32, (0, 8), (8, 8), (16, 8), (24, 8));
    /// B, G, R, A bytes in memory order
    pub const BGRA: ColorFormat = Self::layout(32, (16, 8), (8, 8), (0, 8), (24, 8));
    /// A, R, G, B bytes in memory order
    pub const ARGB: ColorFormat = Self::layout(32, (8, 8), (16, 8), (24, 8), (0, 8));
    /// A, B, G, R bytes in memory order
    pub const ABGR: ColorFormat = Self::layout(32, (24, 8), (16, 8), (8, 8), (0, 8));
    /// R, G, B bytes in memory order, opaque
    pub const RGB: ColorFormat = Self::layout(24, (0, 8), (8, 8), (16, 8), (0, 0));
    /// B, G, R bytes in memory order, opaque
    pub const BGR: ColorFormat = Self::layout(24, (16, 8), (8, 8), (0, 8), (0, 0));
    pub const RGB_565: ColorFormat = Self::layout(16, (0, 5), (5, 6), (11, 5), (0, 0));
    pub const BGR_565: ColorFormat = Self::layout(16, (11, 5), (5, 6), (0, 5), (0, 0));
    pub const RGBA_4444: ColorFormat = Self::layout(16, (0, 4), (4, 4), (8, 4), (12, 4));
    pub const RGBA_5551: ColorFormat = Self::layout(16, (0, 5), (5, 5), (10, 5), (15, 1));

    const fn layout(bpp: u8, r: (u8, u8), g: (u8, u8), b: (u8, u8), a: (u8, u8)) -> Self {
        ColorFormat {
            bpp,
            r: Channel::new(r.0, r.1),
            g: Channel::new(g.0, g.1),
            b: Channel::new(b.0, b.1),
            a: Channel::new(a.0, a.1),
        }
    }

    /// Build a format from explicit channel positions.
    ///
    /// Fails with `UnsupportedFormat` unless `bpp` is 16, 24 or 32, and with
    /// `InvalidLayout` when fields overlap, exceed `bpp` or are wider than 16
    /// bits. A zero-width alpha channel decodes as fully opaque.
    pub fn new(bpp: u8, r: Channel, g: Channel, b: Channel, a: Channel) -> Result<Self> {
        if !matches!(bpp, 16 | 24 | 32) {
            return Err(Error::UnsupportedFormat(format!("{} bits per pixel", bpp)));
        }
        let mut used = 0u64;
        for (name, ch) in [("red", r), ("green", g), ("blue", b), ("alpha", a)] {
            if ch.size == 0 {
                continue;
            }
            if ch.size > 16 {
                return Err(Error::InvalidLayout(format!("{} channel is {} bits wide", name, ch.size)));
            }
            if ch.offset as u32 + ch.size as u32 > bpp as u32 {
                return Err(Error::InvalidLayout(format!(
                    "{} channel at bit {} (+{}) does not fit in {} bits",
                    name, ch.offset, ch.size, bpp
                )));
            }
            let mask = ch.field_mask();
            if used & mask != 0 {
                return Err(Error::InvalidLayout(format!("{} channel overlaps another channel", name)));
            }
            used |= mask;
        }
        Ok(ColorFormat { bpp, r, g, b, a })
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bpp
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bpp as usize / 8
    }

    pub fn has_alpha(&self) -> bool {
        self.a.size > 0
    }

    pub fn channels(&self) -> [Channel; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Unpack a packed pixel into the canonical color.
    pub fn to_rgba(&self, packed: u32) -> Rgba {
        Rgba::pack(
            self.r.extract(packed, 0),
            self.g.extract(packed, 0),
            self.b.extract(packed, 0),
            self.a.extract(packed, 0xFF),
        )
    }

    /// Pack a canonical color into this format.
    pub fn pack_rgba(&self, color: Rgba) -> u32 {
        self.r.insert(color.r()) | self.g.insert(color.g()) | self.b.insert(color.b()) | self.a.insert(color.a())
    }

    /// Convert a packed pixel of this format into `target`'s packing.
    pub fn convert_to(&self, packed: u32, target: &ColorFormat) -> u32 {
        target.pack_rgba(self.to_rgba(packed))
    }

    fn read_packed(&self, px: &[u8], endian: Endian) -> u32 {
        match (self.bpp, endian) {
            (16, Endian::Little) => u16::from_le_bytes([px[0], px[1]]) as u32,
            (16, Endian::Big) => u16::from_be_bytes([px[0], px[1]]) as u32,
            (24, Endian::Little) => px[0] as u32 | (px[1] as u32) << 8 | (px[2] as u32) << 16,
            (24, Endian::Big) => (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32,
            (_, Endian::Little) => u32::from_le_bytes([px[0], px[1], px[2], px[3]]),
            (_, Endian::Big) => u32::from_be_bytes([px[0], px[1], px[2], px[3]]),
        }
    }

    fn write_packed(&self, value: u32, px: &mut [u8], endian: Endian) {
        match (self.bpp, endian) {
            (16, Endian::Little) => px.copy_from_slice(&(value as u16).to_le_bytes()),
            (16, Endian::Big) => px.copy_from_slice(&(value as u16).to_be_bytes()),
            (24, Endian::Little) => px.copy_from_slice(&value.to_le_bytes()[..3]),
            (24, Endian::Big) => px.copy_from_slice(&value.to_be_bytes()[1..]),
            (_, Endian::Little) => px.copy_from_slice(&value.to_le_bytes()),
            (_, Endian::Big) => px.copy_from_slice(&value.to_be_bytes()),
        }
    }

    /// Decode `count` pixels starting at byte `offset`.
    pub fn decode(&self, data: &[u8], offset: usize, count: usize, endian: Endian) -> Result<Vec<Rgba>> {
        self.check_source(data, offset, count)?;
        let mut out = vec![Rgba::default(); count];
        self.decode_into(data, offset, &mut out, endian)?;
        Ok(out)
    }

    /// Decode `out.len()` pixels starting at byte `offset` into `out`.
    pub fn decode_into(&self, data: &[u8], offset: usize, out: &mut [Rgba], endian: Endian) -> Result<()> {
        let bytes = self.bytes_per_pixel();
        let needed = self.check_source(data, offset, out.len())?;
        for (dst, px) in out.iter_mut().zip(data[offset..needed].chunks_exact(bytes)) {
            *dst = self.to_rgba(self.read_packed(px, endian));
        }
        Ok(())
    }

    /// End of `count` pixels read from `offset`, if `data` holds them all.
    fn check_source(&self, data: &[u8], offset: usize, count: usize) -> Result<usize> {
        count
            .checked_mul(self.bytes_per_pixel())
            .and_then(|len| len.checked_add(offset))
            .filter(|&needed| needed <= data.len())
            .ok_or(Error::BufferTooSmall {
                needed: offset.saturating_add(count.saturating_mul(self.bytes_per_pixel())),
                available: data.len(),
            })
    }

    /// Encode canonical colors into a freshly allocated buffer.
    pub fn encode(&self, colors: &[Rgba], endian: Endian) -> Vec<u8> {
        let bytes = self.bytes_per_pixel();
        let mut out = vec![0u8; colors.len() * bytes];
        for (px, c) in out.chunks_exact_mut(bytes).zip(colors) {
            self.write_packed(self.pack_rgba(*c), px, endian);
        }
        out
    }

    /// Encode canonical colors into the front of `out`.
    pub fn encode_into(&self, colors: &[Rgba], out: &mut [u8], endian: Endian) -> Result<()> {
        let bytes = self.bytes_per_pixel();
        let needed = colors.len() * bytes;
        if out.len() < needed {
            return Err(Error::BufferTooSmall { needed, available: out.len() });
        }
        for (px, c) in out[..needed].chunks_exact_mut(bytes).zip(colors) {
            self.write_packed(self.pack_rgba(*c), px, endian);
        }
        Ok(())
    }

    /// Re-encode a whole buffer of this format into `target`.
    ///
    /// Trailing bytes that do not make up a full pixel are ignored.
    pub fn convert_buffer(&self, data: &[u8], target: &ColorFormat, endian: Endian) -> Result<Vec<u8>> {
        let count = data.len() / self.bytes_per_pixel();
        let colors = self.decode(data, 0, count, endian)?;
        Ok(target.encode(&colors, endian))
    }
}
