//! Export sequencing: single-image and batch watermark export.
//!
//! The sequencer walks the session's export selection in ascending
//! index order, renders each image through the shared pipeline, encodes
//! it, reports progress after every item, and hands the accumulated
//! named buffers to the archiving collaborator. Images are processed
//! strictly sequentially so at most one full-resolution surface is live
//! at a time and progress counts are strictly increasing.
//!
//! Failure policy: any render or encode failure aborts the whole batch
//! with a single error and no partial archive. An export over zero
//! images is a silent no-op (`Ok(None)`), not an error.

pub mod encoder;
pub mod error;

pub use encoder::{encoder_for, EncodeError, ImageEncoder, JpegEncoder, OutputFormat, PngEncoder};
pub use error::ExportError;

use crate::archive;
use crate::constants::{ARCHIVE_NAME, DEFAULT_JPEG_QUALITY, OUTPUT_PREFIX};
use crate::pipeline;
use crate::session::Session;

/// Receives `(completed, total)` after each exported item.
///
/// Implementations own whatever UI resource displays the progress; the
/// sequencer only reports counts.
pub trait ProgressObserver {
    fn on_progress(&mut self, completed: usize, total: usize);
}

/// An observer that ignores all progress reports.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Options controlling the encoded output.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// One named, encoded export product.
#[derive(Debug)]
pub struct ExportedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// The output file name for a source image: prefixed stem with the
/// extension rewritten to match the encoded format.
pub fn output_name(original: &str, format: OutputFormat) -> String {
    let stem = std::path::Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original.to_string());
    format!("{}{}.{}", OUTPUT_PREFIX, stem, format.extension())
}

/// Export a single image as one encoded file.
pub fn export_image(
    session: &Session,
    index: usize,
    options: &ExportOptions,
) -> Result<ExportedFile, ExportError> {
    let encoder = encoder_for(options.format);
    encode_one_with(session, index, encoder.as_ref(), options.quality)
}

/// Export the session's selection (or all images when nothing is
/// selected) as a zip archive.
///
/// Returns `Ok(None)` when there is nothing to export.
pub fn export_batch(
    session: &Session,
    options: &ExportOptions,
    progress: &mut dyn ProgressObserver,
) -> Result<Option<ExportedFile>, ExportError> {
    let encoder = encoder_for(options.format);
    export_batch_with(session, encoder.as_ref(), options.quality, progress)
}

/// Batch export through an explicit encoder.
///
/// This is the seam `export_batch` goes through; tests use it to inject
/// failing encoders.
pub fn export_batch_with(
    session: &Session,
    encoder: &dyn ImageEncoder,
    quality: u8,
    progress: &mut dyn ProgressObserver,
) -> Result<Option<ExportedFile>, ExportError> {
    let indices = session.export_indices();
    if indices.is_empty() {
        tracing::info!("nothing to export");
        return Ok(None);
    }

    let total = indices.len();
    let mut entries = Vec::with_capacity(total);

    for (completed, index) in indices.into_iter().enumerate() {
        let entry = encode_one_with(session, index, encoder, quality)?;
        entries.push((entry.name, entry.data));
        progress.on_progress(completed + 1, total);
    }

    let data = archive::write_archive(&entries).map_err(|e| ExportError::Archive(e.to_string()))?;

    tracing::info!(images = total, bytes = data.len(), "batch export complete");

    Ok(Some(ExportedFile {
        name: ARCHIVE_NAME.to_string(),
        data,
    }))
}

fn encode_one_with(
    session: &Session,
    index: usize,
    encoder: &dyn ImageEncoder,
    quality: u8,
) -> Result<ExportedFile, ExportError> {
    let source = session
        .image(index)
        .ok_or(ExportError::NoSuchImage(index))?;

    let surface = pipeline::render_image(source, session.settings()).map_err(|e| {
        ExportError::Render {
            name: source.name.clone(),
            source: e,
        }
    })?;

    let data = encoder
        .encode(&surface, quality)
        .map_err(|e| ExportError::Encode {
            name: source.name.clone(),
            format: e.format,
            message: e.message,
        })?;

    Ok(ExportedFile {
        name: output_name(&source.name, encoder.format()),
        data,
    })
}
