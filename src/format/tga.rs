//! Truevision TGA: uncompressed true-color images only.
//!
//! Layout: an 18-byte header, `id_length` bytes of image ID, the color-map
//! region, then `width * height` pixels stored B, G, R(, A). Rows are stored
//! bottom-to-top unless bit 5 of the image descriptor is set.
//!
//! Byte order, color-map skipping (`ceil(entry_bits / 8)` bytes per entry)
//! and the written descriptor (`0x28`, top-down) follow the Truevision
//! layout so files interoperate with other TGA tools.

use super::{ImageFormat, ImageFrame, ImageInfo};
use crate::bitmap::{Bitmap, Bitmap32};
use crate::color::{ColorFormat, Endian};
use crate::{Error, Result};
use std::io::{self, Read, Write};

const HEADER_LEN: usize = 18;
const TYPE_TRUE_COLOR: u8 = 2;
/// Bit 5 of the descriptor: rows stored top-to-bottom
const DESCRIPTOR_TOP_TO_BOTTOM: u8 = 0x20;

/// TGA codec
#[derive(Debug, Default, Clone, Copy)]
pub struct Tga;

/// Parsed TGA header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgaHeader {
    pub id_length: u8,
    pub color_map_type: u8,
    pub image_type: u8,
    pub color_map_first: u16,
    pub color_map_length: u16,
    /// Bits per color-map entry
    pub color_map_entry_size: u8,
    pub x_origin: i16,
    pub y_origin: i16,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u8,
    pub descriptor: u8,
}

impl TgaHeader {
    pub fn parse(raw: &[u8; HEADER_LEN]) -> Result<Self> {
        let u16_at = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]);

        let color_map_type = raw[1];
        if color_map_type > 1 {
            return Err(Error::MalformedHeader(format!("color map type {}", color_map_type)));
        }
        let image_type = raw[2];
        match image_type {
            TYPE_TRUE_COLOR => {}
            1 => return Err(Error::UnsupportedFeature("color-mapped TGA".to_string())),
            3 => return Err(Error::UnsupportedFeature("grayscale TGA".to_string())),
            9 | 10 | 11 => return Err(Error::UnsupportedFeature("RLE-compressed TGA".to_string())),
            other => return Err(Error::UnsupportedFormat(format!("TGA image type {}", other))),
        }
        let width = i16_at(12);
        let height = i16_at(14);
        if width < 0 || height < 0 {
            return Err(Error::MalformedHeader(format!("negative dimensions {}x{}", width, height)));
        }
        let pixel_depth = raw[16];
        if !matches!(pixel_depth, 24 | 32) {
            return Err(Error::UnsupportedFormat(format!("TGA pixel depth {}", pixel_depth)));
        }

        Ok(TgaHeader {
            id_length: raw[0],
            color_map_type,
            image_type,
            color_map_first: u16_at(3),
            color_map_length: u16_at(5),
            color_map_entry_size: raw[7],
            x_origin: i16_at(8),
            y_origin: i16_at(10),
            width: width as u32,
            height: height as u32,
            pixel_depth,
            descriptor: raw[17],
        })
    }

    /// Bytes between the fixed header and the pixel data
    pub fn skip_len(&self) -> u64 {
        let entry_bytes = (self.color_map_entry_size as u64).div_ceil(8);
        self.id_length as u64 + self.color_map_length as u64 * entry_bytes
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.pixel_depth as usize / 8
    }

    /// Rows are stored bottom row first
    pub fn bottom_up(&self) -> bool {
        self.descriptor & DESCRIPTOR_TOP_TO_BOTTOM == 0
    }

    pub fn pixel_format(&self) -> ColorFormat {
        if self.pixel_depth == 32 {
            ColorFormat::BGRA
        } else {
            ColorFormat::BGR
        }
    }

    fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut raw = [0u8; HEADER_LEN];
        raw[0] = self.id_length;
        raw[1] = self.color_map_type;
        raw[2] = self.image_type;
        raw[3..5].copy_from_slice(&self.color_map_first.to_le_bytes());
        raw[5..7].copy_from_slice(&self.color_map_length.to_le_bytes());
        raw[7] = self.color_map_entry_size;
        raw[8..10].copy_from_slice(&self.x_origin.to_le_bytes());
        raw[10..12].copy_from_slice(&self.y_origin.to_le_bytes());
        raw[12..14].copy_from_slice(&(self.width as u16).to_le_bytes());
        raw[14..16].copy_from_slice(&(self.height as u16).to_le_bytes());
        raw[16] = self.pixel_depth;
        raw[17] = self.descriptor;
        raw
    }
}

impl Tga {
    /// Read the fixed header and skip the image ID and color-map bytes.
    pub fn read_header(&self, stream: &mut dyn Read) -> Result<TgaHeader> {
        let mut raw = [0u8; HEADER_LEN];
        stream.read_exact(&mut raw).map_err(|e| Error::from_header_io(e, "TGA header"))?;
        let header = TgaHeader::parse(&raw)?;
        if header.descriptor >> 6 != 0 {
            log::warn!("TGA interleave bits {:#04b} ignored", header.descriptor >> 6);
        }
        let skip = header.skip_len();
        let skipped = io::copy(&mut Read::take(&mut *stream, skip), &mut io::sink())?;
        if skipped != skip {
            return Err(Error::MalformedHeader("truncated image ID or color map".to_string()));
        }
        Ok(header)
    }
}

impl ImageFormat for Tga {
    fn name(&self) -> &'static str {
        "tga"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["tga", "icb", "vda", "vst"]
    }

    fn decode_header(&self, stream: &mut dyn Read) -> Option<ImageInfo> {
        match self.read_header(stream) {
            Ok(h) => Some(ImageInfo { width: h.width, height: h.height, bits_per_pixel: h.pixel_depth }),
            Err(e) => {
                log::debug!("not a supported TGA: {}", e);
                None
            }
        }
    }

    fn read_frames(&self, stream: &mut dyn Read) -> Result<Vec<ImageFrame>> {
        let header = self.read_header(stream)?;
        log::debug!(
            "decoding TGA {}x{} at {} bpp ({})",
            header.width,
            header.height,
            header.pixel_depth,
            if header.bottom_up() { "bottom-up" } else { "top-down" }
        );
        let len = header.width as u64 * header.height as u64 * header.bytes_per_pixel() as u64;
        // grow with the bytes actually present, not the header's claim
        let mut data = Vec::new();
        Read::take(&mut *stream, len).read_to_end(&mut data)?;
        if (data.len() as u64) < len {
            return Err(Error::BufferTooSmall { needed: len as usize, available: data.len() });
        }
        let mut bitmap = Bitmap32::decode(header.width, header.height, &header.pixel_format(), &data, Endian::Little)?;
        if header.bottom_up() {
            bitmap.flip_y();
        }
        Ok(vec![ImageFrame::new(bitmap)])
    }

    /// Writes the first frame as uncompressed 32-bit BGRA, top row first.
    fn write_frames(&self, frames: &[ImageFrame], stream: &mut dyn Write) -> Result<()> {
        let frame = frames.first().ok_or(Error::NoFrames)?;
        let bitmap = match &frame.bitmap {
            Bitmap::Rgba32(b) => b,
            Bitmap::Indexed8(_) => {
                return Err(Error::UnsupportedFeature("encoding indexed bitmaps as TGA".to_string()))
            }
        };
        let max = i16::MAX as u32;
        if bitmap.width() > max || bitmap.height() > max {
            return Err(Error::UnsupportedFormat(format!(
                "{}x{} exceeds TGA dimensions",
                bitmap.width(),
                bitmap.height()
            )));
        }
        let header = TgaHeader {
            id_length: 0,
            color_map_type: 0,
            image_type: TYPE_TRUE_COLOR,
            color_map_first: 0,
            color_map_length: 0,
            color_map_entry_size: 0,
            x_origin: 0,
            y_origin: 0,
            width: bitmap.width(),
            height: bitmap.height(),
            pixel_depth: 32,
            // 8 alpha bits, top-to-bottom rows
            descriptor: DESCRIPTOR_TOP_TO_BOTTOM | 8,
        };
        stream.write_all(&header.to_bytes())?;
        stream.write_all(&bitmap.encode(&ColorFormat::BGRA, Endian::Little))?;
        Ok(())
    }
}
