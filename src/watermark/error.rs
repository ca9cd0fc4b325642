//! Watermark error types.
//!
//! Defines errors that can occur while rendering a text watermark.

use std::fmt;

/// Errors that can occur during watermark rendering.
#[derive(Debug)]
pub enum WatermarkError {
    /// The configured color string could not be parsed
    ColorError(String),

    /// Failed to rasterize the watermark text
    RenderError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColorError(msg) => write!(f, "Invalid watermark color: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
