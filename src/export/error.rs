//! Export error types.
//!
//! Any failure here is terminal for the export operation it occurred
//! in: the batch aborts and no partial archive is produced.

use crate::watermark::WatermarkError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No image at index {0}")]
    NoSuchImage(usize),

    #[error("Failed to render '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: WatermarkError,
    },

    #[error("Failed to encode '{name}' to {format}: {message}")]
    Encode {
        name: String,
        format: &'static str,
        message: String,
    },

    #[error("Failed to build archive: {0}")]
    Archive(String),
}
