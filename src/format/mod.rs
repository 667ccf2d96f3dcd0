//! Image container codecs and the format registry
//!
//! Each `ImageFormat` is stateless and registered under a short name. The
//! `ImageFormats` registry dispatches by name or by sniffing headers in
//! priority order.

pub mod tga;

pub use tga::Tga;

use crate::bitmap::Bitmap;
use crate::config::CodecConfig;
use crate::{Error, Result};
use serde::Serialize;
use std::io::{Cursor, Read, Write};
use std::time::Duration;

/// Basic properties read from an image header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
}

/// One decoded image, optionally part of an animation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    pub bitmap: Bitmap,
    /// Display time before the next frame
    pub delay: Option<Duration>,
}

impl ImageFrame {
    pub fn new(bitmap: impl Into<Bitmap>) -> Self {
        ImageFrame { bitmap: bitmap.into(), delay: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A pluggable image container codec
pub trait ImageFormat: Send + Sync {
    /// Short lowercase name used for lookup, e.g. `"tga"`
    fn name(&self) -> &'static str;

    /// File extensions handled by this format, lowercase and without dot
    fn extensions(&self) -> &'static [&'static str];

    /// Parse just the header. `None` means "not this format" and lets the
    /// registry try the next one; it is never an error.
    fn decode_header(&self, stream: &mut dyn Read) -> Option<ImageInfo>;

    fn read_frames(&self, stream: &mut dyn Read) -> Result<Vec<ImageFrame>>;

    fn write_frames(&self, frames: &[ImageFrame], stream: &mut dyn Write) -> Result<()>;

    /// Decode the first frame of `data`.
    fn read_bitmap(&self, data: &[u8]) -> Result<Bitmap> {
        self.read_frames(&mut Cursor::new(data))?
            .into_iter()
            .next()
            .map(|f| f.bitmap)
            .ok_or(Error::NoFrames)
    }

    /// Encode a single bitmap into a new buffer.
    fn encode_bitmap(&self, bitmap: &Bitmap) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_frames(&[ImageFrame::new(bitmap.clone())], &mut out)?;
        Ok(out)
    }
}

/// Registry of formats; registration order is sniffing priority.
pub struct ImageFormats {
    formats: Vec<Box<dyn ImageFormat>>,
    config: CodecConfig,
}

impl Default for ImageFormats {
    fn default() -> Self {
        let mut formats = Self::empty();
        formats.register(Tga);
        formats
    }
}

impl ImageFormats {
    /// Registry with no formats
    pub fn empty() -> Self {
        ImageFormats { formats: Vec::new(), config: CodecConfig::default() }
    }

    /// Built-in formats, reordered and limited by `config`.
    pub fn with_config(config: CodecConfig) -> Result<Self> {
        let mut formats = Self::default();
        formats.apply_config(config)?;
        Ok(formats)
    }

    /// Move the formats named in `config.priority` to the front and adopt
    /// its decode limits.
    pub fn apply_config(&mut self, config: CodecConfig) -> Result<()> {
        config.validate()?;
        for name in config.priority.iter().rev() {
            let idx = self
                .position(name)
                .ok_or_else(|| Error::Config(format!("unknown format in priority list: {}", name)))?;
            let format = self.formats.remove(idx);
            self.formats.insert(0, format);
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Add a format with the lowest priority.
    pub fn register<F: ImageFormat + 'static>(&mut self, format: F) -> &mut Self {
        self.formats.push(Box::new(format));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.formats.iter().position(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn ImageFormat> {
        self.position(name).map(|i| self.formats[i].as_ref())
    }

    pub fn by_extension(&self, ext: &str) -> Option<&dyn ImageFormat> {
        let ext = ext.trim_start_matches('.');
        self.formats
            .iter()
            .find(|f| f.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|f| f.as_ref())
    }

    /// First format, in priority order, that recognizes the header.
    pub fn sniff(&self, data: &[u8]) -> Option<(&dyn ImageFormat, ImageInfo)> {
        for format in &self.formats {
            if let Some(info) = format.decode_header(&mut Cursor::new(data)) {
                log::debug!("sniffed {} ({}x{}, {} bpp)", format.name(), info.width, info.height, info.bits_per_pixel);
                return Some((format.as_ref(), info));
            }
            log::debug!("{} did not recognize header", format.name());
        }
        None
    }

    pub fn decode_header(&self, data: &[u8]) -> Option<ImageInfo> {
        self.sniff(data).map(|(_, info)| info)
    }

    /// Sniff the format, check the decode limits, then decode every frame.
    pub fn read_frames(&self, data: &[u8]) -> Result<Vec<ImageFrame>> {
        let (format, info) = self
            .sniff(data)
            .ok_or_else(|| Error::UnsupportedFormat("no registered format recognizes the data".to_string()))?;
        if !self.config.allows(info.width, info.height) {
            return Err(Error::LimitExceeded { width: info.width, height: info.height });
        }
        format.read_frames(&mut Cursor::new(data))
    }

    pub fn read_bitmap(&self, data: &[u8]) -> Result<Bitmap> {
        self.read_frames(data)?.into_iter().next().map(|f| f.bitmap).ok_or(Error::NoFrames)
    }

    /// Encode with the format registered as `name`.
    pub fn write_frames(&self, name: &str, frames: &[ImageFrame], stream: &mut dyn Write) -> Result<()> {
        let format = self
            .by_name(name)
            .ok_or_else(|| Error::UnsupportedFormat(format!("no format named {}", name)))?;
        format.write_frames(frames, stream)
    }

    pub fn encode(&self, name: &str, frames: &[ImageFrame]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_frames(name, frames, &mut out)?;
        Ok(out)
    }
}
