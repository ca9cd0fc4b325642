// Constants module - centralized default values for the watermarking pipeline
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Thumbnail defaults
// =============================================================================

/// Maximum edge length of cached thumbnails, in pixels
pub const THUMBNAIL_MAX_DIM: u32 = 100;

// =============================================================================
// Export defaults
// =============================================================================

/// Prefix prepended to every exported file name
pub const OUTPUT_PREFIX: &str = "watermark_";

/// File name of the batch export archive
pub const ARCHIVE_NAME: &str = "watermarked_images.zip";

/// Default JPEG quality when exporting lossy output
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

// =============================================================================
// Preview zoom bounds
// =============================================================================

/// Minimum preview zoom level, in percent
pub const ZOOM_MIN: u32 = 25;

/// Maximum preview zoom level, in percent
pub const ZOOM_MAX: u32 = 400;

/// Zoom increment per zoom intent, in percent
pub const ZOOM_STEP: u32 = 25;
