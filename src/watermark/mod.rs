//! Watermark compositing and placement engine.
//!
//! Given a raster surface and a [`WatermarkSettings`] value, this module
//! deterministically computes watermark geometry (anchor, rotation
//! pivot) and paints the text onto the surface. The same code path
//! serves single-image export and batch export, so output is
//! bit-reproducible across both.
//!
//! # Components
//!
//! - [`geometry`] - pure anchor/pivot resolution for the nine grid
//!   positions
//! - [`text`] - embedded-font text measurement and rasterization
//! - [`compositor`] - alpha blending, axis-aligned and rotated overlays
//! - [`renderer`] - ties the above together behind one `render` call
//!
//! [`WatermarkSettings`]: crate::settings::WatermarkSettings

pub mod compositor;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod text;

// Re-export main types for convenience
pub use compositor::{blend, overlay, overlay_rotated};
pub use error::WatermarkError;
pub use geometry::{resolve, rotation_pivot, Anchor};
pub use renderer::render;
pub use text::{measure_text, parse_hex_color, rasterize, Color, TextSprite};
