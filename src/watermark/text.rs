//! Text rasterization for watermarks.
//!
//! Renders a text run into a transparent RGBA sprite that the
//! compositor blends onto a target surface.
//!
//! # Features
//!
//! - Hex color parsing (#RGB and #RRGGBB formats)
//! - Kerned width measurement matching the painted output
//! - Embedded DejaVu faces (no external font dependencies)
//!
//! Family names are resolved against the embedded catalog: names
//! containing "mono" map to the monospace face, names containing
//! "serif" (but not "sans") to the serif face, and everything else -
//! including the default "Arial" - to the sans face. Unknown families
//! therefore never fail a render; they fall back the way a browser
//! font stack would.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use super::compositor::blend;
use super::WatermarkError;

// Embedded DejaVu faces (Bitstream Vera license, freely redistributable).
const SANS_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");
const MONO_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");
const SERIF_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSerif.ttf");

static SANS_FONT: OnceLock<FontRef<'static>> = OnceLock::new();
static MONO_FONT: OnceLock<FontRef<'static>> = OnceLock::new();
static SERIF_FONT: OnceLock<FontRef<'static>> = OnceLock::new();

fn embedded_face(cell: &'static OnceLock<FontRef<'static>>, data: &'static [u8]) -> &'static FontRef<'static> {
    cell.get_or_init(|| {
        FontRef::try_from_slice(data).expect("Failed to load embedded font - this is a bug")
    })
}

/// Resolve a family name to one of the embedded faces.
pub fn resolve_family(family: &str) -> &'static FontRef<'static> {
    let name = family.to_ascii_lowercase();
    if name.contains("mono") {
        embedded_face(&MONO_FONT, MONO_FONT_DATA)
    } else if name.contains("serif") && !name.contains("sans") {
        embedded_face(&SERIF_FONT, SERIF_FONT_DATA)
    } else {
        embedded_face(&SANS_FONT, SANS_FONT_DATA)
    }
}

/// Parsed RGB color from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::ColorError("Color must start with '#'".to_string()))?;

    match hex.len() {
        3 => {
            // #RGB format - each digit is doubled: 0xF -> 0xFF, 0xA -> 0xAA
            let r = u8::from_str_radix(&hex[0..1], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            let g = u8::from_str_radix(&hex[1..2], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            let b = u8::from_str_radix(&hex[2..3], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            let g = u8::from_str_radix(&hex[2..4], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            let b = u8::from_str_radix(&hex[4..6], 16)
                .map_err(|_| WatermarkError::ColorError("Invalid hex digit".to_string()))?;
            Ok(Color::new(r, g, b))
        }
        _ => Err(WatermarkError::ColorError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

/// Measure the kerned advance width of a text run.
///
/// Matches the horizontal extent the rasterizer paints, without any
/// padding. This is the `text_width` fed into anchor resolution.
pub fn measure_text(family: &str, text: &str, font_size: f32) -> f32 {
    let font = resolve_family(family);
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width
}

/// A rasterized text run.
///
/// The sprite spans the full glyph extents (ascent through descent), so
/// descenders are never clipped even though placement math treats the
/// text box as `font_size` tall. `baseline` is the y offset of the text
/// baseline within the sprite; the left edge of the run is at x = 0.
pub struct TextSprite {
    pub image: RgbaImage,
    pub baseline: f32,
}

/// Rasterize a text run into a transparent RGBA sprite.
///
/// `alpha` is the global opacity fraction in [0, 1]; it is baked into
/// the glyph coverage once here, so compositing applies no further
/// opacity.
pub fn rasterize(
    family: &str,
    text: &str,
    font_size: f32,
    color: Color,
    alpha: f32,
) -> Result<TextSprite, WatermarkError> {
    if text.is_empty() {
        return Err(WatermarkError::RenderError(
            "Cannot rasterize empty text".to_string(),
        ));
    }

    let font = resolve_family(family);
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let width = measure_text(family, text, font_size);
    // Small padding so anti-aliased edges are never cut off at the sprite
    // boundary.
    let padding = 2u32;
    let sprite_w = (width.ceil() as u32 + padding).max(1);
    let sprite_h = (scaled_font.height().ceil() as u32 + padding).max(1);

    let mut image = RgbaImage::new(sprite_w, sprite_h);

    let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    let baseline = scaled_font.ascent();

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < sprite_w as i32 && y < sprite_h as i32 {
                    let pixel_alpha = (coverage * alpha as f32) as u8;
                    let pixel = Rgba([color.r, color.g, color.b, pixel_alpha]);

                    // Blend with existing coverage (overlapping glyph edges)
                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = blend(*existing, pixel);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok(TextSprite { image, baseline })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test: Hex color parsing (#RGB, #RRGGBB)
    #[test]
    fn test_parse_hex_color_rrggbb() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), Color::new(255, 0, 0));
        assert_eq!(parse_hex_color("#00FF00").unwrap(), Color::new(0, 255, 0));
        assert_eq!(parse_hex_color("#0000FF").unwrap(), Color::new(0, 0, 255));
        assert_eq!(parse_hex_color("#000000").unwrap(), Color::new(0, 0, 0));
    }

    #[test]
    fn test_parse_hex_color_rgb() {
        assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255));
        // A=10*17=170, B=11*17=187, C=12*17=204
        assert_eq!(parse_hex_color("#ABC").unwrap(), Color::new(170, 187, 204));
    }

    #[test]
    fn test_parse_hex_color_lowercase() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Color::new(255, 0, 0));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert!(parse_hex_color("FF0000").is_err()); // missing '#'
        assert!(parse_hex_color("#FF00").is_err()); // wrong length
        assert!(parse_hex_color("#GGGGGG").is_err()); // invalid hex
    }

    #[test]
    fn test_resolve_family_mapping() {
        // Same face pointer for equivalent names
        assert!(std::ptr::eq(resolve_family("Arial"), resolve_family("Helvetica")));
        assert!(std::ptr::eq(
            resolve_family("DejaVu Sans Mono"),
            resolve_family("monospace")
        ));
        assert!(std::ptr::eq(resolve_family("serif"), resolve_family("DejaVu Serif")));
        // sans-serif resolves to the sans face, not serif
        assert!(std::ptr::eq(resolve_family("sans-serif"), resolve_family("Arial")));
    }

    #[test]
    fn test_measure_text_scales_with_font_size() {
        let w1 = measure_text("Arial", "Hello", 12.0);
        let w2 = measure_text("Arial", "Hello", 24.0);
        let w3 = measure_text("Arial", "Hello", 48.0);
        assert!(w1 > 0.0);
        assert!(w2 > w1);
        assert!(w3 > w2);
    }

    #[test]
    fn test_measure_text_empty_is_zero() {
        assert_eq!(measure_text("Arial", "", 24.0), 0.0);
    }

    #[test]
    fn test_rasterize_produces_visible_pixels() {
        let sprite = rasterize("Arial", "Hello", 24.0, Color::new(255, 255, 255), 1.0).unwrap();
        assert!(sprite.image.width() > 0);
        assert!(sprite.image.height() > 0);
        assert!(sprite.baseline > 0.0);
        assert!(
            sprite.image.pixels().any(|p| p[3] > 0),
            "rasterized text should have visible pixels"
        );
    }

    #[test]
    fn test_rasterize_opacity_scales_alpha() {
        let full = rasterize("Arial", "Test", 24.0, Color::new(255, 255, 255), 1.0).unwrap();
        let half = rasterize("Arial", "Test", 24.0, Color::new(255, 255, 255), 0.5).unwrap();

        let max_full = full.image.pixels().map(|p| p[3]).max().unwrap_or(0);
        let max_half = half.image.pixels().map(|p| p[3]).max().unwrap_or(0);
        assert!(max_half < max_full);
    }

    #[test]
    fn test_rasterize_empty_text_error() {
        assert!(rasterize("Arial", "", 24.0, Color::new(0, 0, 0), 1.0).is_err());
    }

    #[test]
    fn test_sprite_width_tracks_measurement() {
        let text = "SAMPLE";
        let measured = measure_text("Arial", text, 24.0);
        let sprite = rasterize("Arial", text, 24.0, Color::new(0, 0, 0), 1.0).unwrap();
        assert_eq!(sprite.image.width(), measured.ceil() as u32 + 2);
    }
}
