//! Zip archiving for batch exports.
//!
//! Takes the accumulated (name, bytes) outputs and produces one
//! compressed archive buffer in memory. The writer never touches the
//! filesystem; persisting the buffer is the caller's business.

use std::io::{Cursor, Write};

use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a zip archive from named byte buffers.
///
/// Entries appear in the order given. Already-compressed raster data
/// gains little from deflate, but the container stays standard and
/// readable everywhere.
pub fn write_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        writer.start_file(name, options)?;
        writer.write_all(data)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_archive_round_trip() {
        let entries = vec![
            ("watermark_a.png".to_string(), vec![1u8, 2, 3, 4]),
            ("watermark_b.png".to_string(), vec![9u8, 8, 7]),
        ];

        let bytes = write_archive(&entries).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 2);

        for (name, data) in &entries {
            let mut file = archive.by_name(name).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            assert_eq!(&contents, data);
        }
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = write_archive(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_entry_order_is_preserved() {
        let entries = vec![
            ("z.png".to_string(), vec![0u8]),
            ("a.png".to_string(), vec![1u8]),
        ];

        let bytes = write_archive(&entries).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let first = archive.by_index(0).unwrap().name().to_string();
        assert_eq!(first, "z.png");
    }
}
