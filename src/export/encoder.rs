//! Image encoder abstraction.
//!
//! Provides a trait-based encoder system so the export sequencer does
//! not care which codec produces the bytes. PNG (lossless) is the
//! default export format; JPEG is available for smaller output.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;

/// Output raster format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// File extension for this format (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(format!("unknown output format '{}' (expected png or jpeg)", other)),
        }
    }
}

/// Failure to turn a surface into encoded bytes.
#[derive(Debug)]
pub struct EncodeError {
    pub format: &'static str,
    pub message: String,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to encode to {}: {}", self.format, self.message)
    }
}

impl std::error::Error for EncodeError {}

/// Trait for image encoders.
///
/// Implementations encode an RGBA surface to one output format. The
/// trait is object-safe so the sequencer can take any encoder through a
/// `&dyn` seam (which is also where tests inject failing encoders).
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces.
    fn format(&self) -> OutputFormat;

    /// Encode an RGBA surface to the target format.
    fn encode(&self, surface: &RgbaImage, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

/// PNG encoder using the image crate. Lossless; quality is ignored.
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, surface: &RgbaImage, _quality: u8) -> Result<Vec<u8>, EncodeError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(
                surface.as_raw(),
                surface.width(),
                surface.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| EncodeError {
                format: "png",
                message: e.to_string(),
            })?;

        Ok(output.into_inner())
    }
}

/// JPEG encoder using the image crate. Alpha is dropped.
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, surface: &RgbaImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(surface.as_raw());

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));

        encoder
            .write_image(
                &rgb_data,
                surface.width(),
                surface.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| EncodeError {
                format: "jpeg",
                message: e.to_string(),
            })?;

        Ok(output.into_inner())
    }
}

/// Create the encoder for a format.
pub fn encoder_for(format: OutputFormat) -> Box<dyn ImageEncoder> {
    match format {
        OutputFormat::Png => Box::new(PngEncoder),
        OutputFormat::Jpeg => Box::new(JpegEncoder),
    }
}

/// Strip the alpha channel from interleaved RGBA data.
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample_surface() -> RgbaImage {
        let mut img = RgbaImage::new(32, 24);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 8) as u8, (y * 10) as u8, 99, 255]);
        }
        img
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_str("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_str("JPG").unwrap(), OutputFormat::Jpeg);
        assert!(OutputFormat::from_str("bmp").is_err());
    }

    #[test]
    fn test_png_round_trips_pixels() {
        let surface = sample_surface();
        let bytes = PngEncoder.encode(&surface, 0).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, surface);
    }

    #[test]
    fn test_jpeg_encodes_and_preserves_dimensions() {
        let surface = sample_surface();
        let bytes = JpegEncoder.encode(&surface, 90).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 24);
    }

    #[test]
    fn test_encoder_for_matches_format() {
        assert_eq!(encoder_for(OutputFormat::Png).format(), OutputFormat::Png);
        assert_eq!(encoder_for(OutputFormat::Jpeg).format(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_rgba_to_rgb_drops_alpha() {
        let rgba = [1u8, 2, 3, 255, 4, 5, 6, 128];
        assert_eq!(rgba_to_rgb(&rgba), vec![1, 2, 3, 4, 5, 6]);
    }
}
