//! Codec configuration: decode limits and sniffing priority

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration applied to an `ImageFormats` registry
///
/// The defaults accept images up to 16384 pixels on each side and keep the
/// registration order for sniffing.
///
/// # Examples
///
/// ```
/// let cfg = rfimage::CodecConfig::from_json_str(r#"{ "max_width": 640 }"#).unwrap();
/// assert_eq!(cfg.max_width, 640);
/// assert_eq!(cfg.max_height, 16384);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest accepted image width in pixels
    pub max_width: u32,
    /// Largest accepted image height in pixels
    pub max_height: u32,
    /// Format names tried first when sniffing, in order
    pub priority: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_width: 16384,
            max_height: 16384,
            priority: Vec::new(),
        }
    }
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: CodecConfig = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(Error::Config("decode limits must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Whether an image of the given size is within the limits
    pub fn allows(&self, width: u32, height: u32) -> bool {
        width <= self.max_width && height <= self.max_height
    }
}
