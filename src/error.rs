//! Error types for the imaging core

use thiserror::Error;

/// Result type alias for imaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting pixels, drawing or coding images
#[derive(Error, Debug)]
pub enum Error {
    /// Bit depth, image type or pixel depth outside the supported set
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A recognized sub-feature that is not implemented (RLE, indexed, ...)
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// `restore` called without a matching `save`
    #[error("State stack is empty: restore without matching save")]
    EmptyStack,

    /// Header failed structural parsing or the stream was truncated
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Channel bit-fields overlap or do not fit in the pixel
    #[error("Invalid channel layout: {0}")]
    InvalidLayout(String),

    /// Source or destination buffer is shorter than the operation needs
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Image dimensions exceed the configured decode limits
    #[error("Image of {width}x{height} exceeds configured limits")]
    LimitExceeded { width: u32, height: u32 },

    /// Encoder was handed an empty frame list
    #[error("No frames to encode")]
    NoFrames,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The background codec worker is gone
    #[error("Codec worker unavailable: {0}")]
    Worker(String),

    /// Underlying stream error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map a short read while parsing a header into `MalformedHeader`.
    pub(crate) fn from_header_io(err: std::io::Error, what: &str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::MalformedHeader(format!("truncated {}", what))
        } else {
            Error::Io(err)
        }
    }
}
