//! RFox Imaging Core
//!
//! A platform-agnostic 2D imaging library for Rust: pixel format conversion,
//! a canvas-style vector drawing context that delegates rasterization to a
//! pluggable renderer, and a small image codec framework.
//!
//! # Features
//!
//! - **Color formats**: 16/24/32-bit packed layouts decoded to and encoded
//!   from one canonical `Rgba` value, with proportional channel scaling
//! - **Context2d**: paths, transforms, paints and a save/restore stack; all
//!   pixel output goes through a `Renderer` chosen by the caller
//! - **Codecs**: a format registry with header sniffing and a TGA codec
//! - **Async facade** (`async`, default): decode and encode on a worker thread
//!
//! # Example
//!
//! ```
//! use rfimage::{Bitmap32, ImageFormats, ImageFrame, Rgba};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bitmap = Bitmap32::filled(4, 4, Rgba::rgb(255, 0, 0));
//! let formats = ImageFormats::default();
//! let bytes = formats.encode("tga", &[ImageFrame::new(bitmap.clone())])?;
//!
//! let decoded = formats.read_bitmap(&bytes)?;
//! assert_eq!(decoded.to_bitmap32(), bitmap);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod bitmap;
pub mod color;
pub mod config;
pub mod format;
pub mod geom;
pub mod vector;

// Async-friendly codec API (worker-thread backed)
#[cfg(feature = "async")]
pub mod async_api;

#[cfg(feature = "async")]
pub use async_api::AsyncCodec;

pub use bitmap::{Bitmap, Bitmap32, Bitmap8};
pub use color::{colors, ColorFormat, Endian, Rgba};
pub use config::CodecConfig;
pub use format::{ImageFormat, ImageFormats, ImageFrame, ImageInfo, Tga};
pub use geom::{Matrix2d, Point, Rectangle};
pub use vector::{Context2d, GraphicsPath, Paint, Renderer};
