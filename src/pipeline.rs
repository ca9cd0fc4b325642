//! The image render pipeline.
//!
//! For a given source image, allocate a surface at the image's native
//! resolution, paint the source raster, then hand the surface to the
//! watermark renderer. Single export and batch export both go through
//! this one function, so their pixel output is identical for identical
//! inputs.

use image::RgbaImage;

use crate::session::SourceImage;
use crate::settings::WatermarkSettings;
use crate::watermark::{self, WatermarkError};

/// Render one image through the watermark pipeline.
///
/// The returned surface is exactly `source.image` sized; the base
/// raster is painted unscaled at the origin before the watermark goes
/// on. Deterministic: the same (image, settings) pair always produces
/// pixel-identical output.
pub fn render_image(
    source: &SourceImage,
    settings: &WatermarkSettings,
) -> Result<RgbaImage, WatermarkError> {
    // The surface starts as a copy of the unscaled source raster.
    let mut surface = source.image.clone();
    watermark::render(&mut surface, settings)?;
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn source(width: u32, height: u32) -> SourceImage {
        let image = RgbaImage::from_pixel(width, height, Rgba([250, 250, 250, 255]));
        SourceImage {
            name: "test.png".to_string(),
            byte_size: 0,
            thumbnail: image.clone(),
            image,
        }
    }

    #[test]
    fn test_surface_matches_source_dimensions() {
        let src = source(321, 123);
        let settings = WatermarkSettings {
            text: "Mark".to_string(),
            ..Default::default()
        };

        let surface = render_image(&src, &settings).unwrap();
        assert_eq!(surface.dimensions(), (321, 123));
    }

    #[test]
    fn test_source_is_untouched() {
        let src = source(100, 100);
        let settings = WatermarkSettings {
            text: "Mark".to_string(),
            ..Default::default()
        };

        let _ = render_image(&src, &settings).unwrap();
        assert!(src.image.pixels().all(|p| *p == Rgba([250, 250, 250, 255])));
    }

    #[test]
    fn test_empty_text_reproduces_source() {
        let src = source(64, 48);
        let surface = render_image(&src, &WatermarkSettings::default()).unwrap();
        assert_eq!(surface, src.image);
    }
}
