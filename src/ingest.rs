//! Image ingestion: path expansion, decoding, and thumbnail creation.
//!
//! Input paths may be files or directories. Directories are walked
//! iteratively (no call-stack recursion) and candidates are filtered by
//! raster extension before any decode is attempted. Decode failures are
//! isolated per file: the file is logged and skipped, and the rest of
//! the batch continues. Nothing here aborts ingestion.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::RgbaImage;
use walkdir::WalkDir;

use crate::constants::THUMBNAIL_MAX_DIM;
use crate::session::SourceImage;

/// Expand input paths into an ordered list of candidate image files.
///
/// Plain files are kept when their extension names a supported raster
/// format; directories contribute their contents in sorted traversal
/// order. Paths that do not exist are logged and skipped.
pub fn collect_image_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_image_path(entry.path()) {
                    paths.push(entry.path().to_path_buf());
                }
            }
        } else if input.is_file() {
            if is_image_path(input) {
                paths.push(input.clone());
            } else {
                tracing::warn!(path = %input.display(), "skipping non-image file");
            }
        } else {
            tracing::warn!(path = %input.display(), "input path does not exist");
        }
    }

    paths
}

/// Load and decode every candidate under `inputs`.
///
/// Returns the successfully decoded images in traversal order; files
/// that fail to decode are logged and skipped.
pub fn load_images(inputs: &[PathBuf]) -> Vec<SourceImage> {
    let paths = collect_image_paths(inputs);
    let mut images = Vec::with_capacity(paths.len());

    for path in &paths {
        match load_image(path) {
            Ok(source) => {
                tracing::debug!(
                    path = %path.display(),
                    width = source.image.width(),
                    height = source.image.height(),
                    "loaded image"
                );
                images.push(source);
            }
            Err(message) => {
                tracing::warn!(path = %path.display(), error = %message, "failed to load image");
            }
        }
    }

    tracing::info!(loaded = images.len(), candidates = paths.len(), "ingestion complete");
    images
}

/// Load a single image file into a [`SourceImage`].
pub fn load_image(path: &Path) -> Result<SourceImage, String> {
    let image = decode_image(path)?;

    let byte_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let thumbnail = make_thumbnail(&image)?;

    Ok(SourceImage {
        name,
        byte_size,
        image,
        thumbnail,
    })
}

/// Whether the path's extension names a raster format the decoder
/// understands.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| image::ImageFormat::from_extension(ext).is_some())
        .unwrap_or(false)
}

fn decode_image(path: &Path) -> Result<RgbaImage, String> {
    let decoded = ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;
    Ok(decoded.to_rgba8())
}

/// Build the cached thumbnail: max edge [`THUMBNAIL_MAX_DIM`], aspect
/// preserving, never enlarged.
pub fn make_thumbnail(image: &RgbaImage) -> Result<RgbaImage, String> {
    let (width, height) = image.dimensions();

    if width <= THUMBNAIL_MAX_DIM && height <= THUMBNAIL_MAX_DIM {
        return Ok(image.clone());
    }

    let (target_w, target_h) = if width > height {
        let h = (height as f64 * THUMBNAIL_MAX_DIM as f64 / width as f64).round() as u32;
        (THUMBNAIL_MAX_DIM, h.max(1))
    } else {
        let w = (width as f64 * THUMBNAIL_MAX_DIM as f64 / height as f64).round() as u32;
        (w.max(1), THUMBNAIL_MAX_DIM)
    };

    resize_rgba(image, target_w, target_h)
}

/// Resize using fast-image-resize with a Lanczos3 filter.
fn resize_rgba(image: &RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage, String> {
    let src_width = NonZeroU32::new(image.width()).ok_or("Source width is 0")?;
    let src_height = NonZeroU32::new(image.height()).ok_or("Source height is 0")?;
    let dst_width = NonZeroU32::new(target_w).ok_or("Target width is 0")?;
    let dst_height = NonZeroU32::new(target_h).ok_or("Target height is 0")?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| format!("Failed to create source image: {:?}", e))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| format!("Resize operation failed: {:?}", e))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| "Failed to create thumbnail buffer".to_string())
}
