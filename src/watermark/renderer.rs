//! The watermark renderer.
//!
//! Paints a configured text watermark onto a raster surface: measure the
//! text, resolve the anchor, rasterize the glyphs, composite. The
//! renderer holds no state between calls - fonts are resolved per call
//! and every transform is local to the sprite being painted - so
//! repeated invocation across different surfaces can never accumulate
//! font, alpha, or transform state.
//!
//! Text height is taken as the configured font size rather than the
//! measured glyph ascent/descent. This mirrors the placement behavior
//! of canvas-style renderers and shifts tall scripts slightly; the
//! sprite itself spans the full glyph extents, so nothing is clipped.

use image::RgbaImage;

use crate::settings::WatermarkSettings;

use super::compositor::{overlay, overlay_rotated};
use super::geometry::{self, rotation_pivot};
use super::text::{measure_text, parse_hex_color, rasterize};
use super::WatermarkError;

/// Paint the configured watermark onto `surface`, mutating it in place.
///
/// An empty `settings.text` is a no-op, not an error: the surface is
/// left pixel-identical.
pub fn render(surface: &mut RgbaImage, settings: &WatermarkSettings) -> Result<(), WatermarkError> {
    if settings.text.is_empty() {
        return Ok(());
    }

    let color = parse_hex_color(&settings.font_color)?;
    let alpha = settings.opacity.min(100) as f32 / 100.0;

    let font_size = settings.font_size as f32;
    let text_width = measure_text(&settings.font_family, &settings.text, font_size);
    let text_height = font_size;

    let anchor = geometry::resolve(
        settings.position,
        surface.width(),
        surface.height(),
        text_width,
        text_height,
        settings.spacing_x,
        settings.spacing_y,
    );

    let sprite = rasterize(
        &settings.font_family,
        &settings.text,
        font_size,
        color,
        alpha,
    )?;

    // Place the sprite so its baseline-left sits at the anchor.
    let origin_x = anchor.x;
    let origin_y = anchor.y - sprite.baseline;

    if settings.rotation == 0.0 {
        overlay(
            surface,
            &sprite.image,
            origin_x.round() as i64,
            origin_y.round() as i64,
        );
    } else {
        let (pivot_x, pivot_y) = rotation_pivot(anchor, text_width, text_height);
        overlay_rotated(
            surface,
            &sprite.image,
            origin_x,
            origin_y,
            pivot_x,
            pivot_y,
            settings.rotation,
        );
    }

    Ok(())
}
