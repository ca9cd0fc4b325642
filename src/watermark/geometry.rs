//! Anchor and pivot resolution for watermark placement.
//!
//! The resolver is a pure function from (position, surface size, text
//! metrics, spacing) to the text baseline-left anchor in surface
//! coordinates: origin top-left, y increasing downward, x the left edge
//! of the text run, y the text baseline.
//!
//! There is deliberately no clamping. If the text run or the spacing
//! exceeds the surface, the anchor falls outside the surface and the
//! watermark is partially or fully clipped when painted; that is
//! accepted placement behavior, not an error.
//!
//! # Example
//!
//! ```
//! use tidemark::settings::Position;
//! use tidemark::watermark::geometry::resolve;
//!
//! let anchor = resolve(Position::BottomRight, 800, 600, 100.0, 24.0, 10, 10);
//! assert_eq!((anchor.x, anchor.y), (690.0, 590.0)); // 800-100-10, 600-10
//! ```

use crate::settings::Position;

/// The text baseline-left anchor in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Resolve the baseline-left anchor for a text run on a surface.
///
/// # Arguments
///
/// * `position` - The configured anchor class
/// * `width`, `height` - Surface dimensions in pixels
/// * `text_width` - Measured width of the text run
/// * `text_height` - Nominal text height (the configured font size)
/// * `spacing_x`, `spacing_y` - Margins from the relevant edges
pub fn resolve(
    position: Position,
    width: u32,
    height: u32,
    text_width: f32,
    text_height: f32,
    spacing_x: u32,
    spacing_y: u32,
) -> Anchor {
    let w = width as f32;
    let h = height as f32;
    let sx = spacing_x as f32;
    let sy = spacing_y as f32;

    let x = match position {
        Position::TopLeft | Position::Left | Position::BottomLeft => sx,
        Position::Top | Position::Center | Position::Bottom => (w - text_width) / 2.0,
        Position::TopRight | Position::Right | Position::BottomRight => w - text_width - sx,
    };

    let y = match position {
        Position::TopLeft | Position::Top | Position::TopRight => text_height + sy,
        Position::Left | Position::Center | Position::Right => h / 2.0,
        Position::BottomLeft | Position::Bottom | Position::BottomRight => h - sy,
    };

    Anchor { x, y }
}

/// The rotation pivot for a text run anchored at `anchor`.
///
/// Always the geometric center of the `text_width` x `text_height` box
/// above the baseline, independent of the chosen position.
pub fn rotation_pivot(anchor: Anchor, text_width: f32, text_height: f32) -> (f32, f32) {
    (anchor.x + text_width / 2.0, anchor.y - text_height / 2.0)
}
