//! ZIP container access for document analysis.
//!
//! Wraps the `zip` crate behind a small surface: metadata lookups that never
//! decompress payloads, and per-entry streaming readers so large PDFs are not
//! buffered before the classifier asks for them. Encrypted and
//! unknown-compression entries surface as [`EntryError::Unsupported`] so the
//! caller can skip them without aborting the run.

pub mod error;

pub use error::{ArchiveError, EntryError};

use std::io::{Read, Seek};

use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Entry metadata from the central directory. No payload access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub path: String,
    /// Uncompressed size as declared by the central directory.
    pub size: u64,
    pub is_dir: bool,
}

impl EntryMeta {
    /// Filename component of the entry path, lowercased extension check.
    pub fn is_pdf(&self) -> bool {
        !self.is_dir && self.path.to_ascii_lowercase().ends_with(".pdf")
    }

    /// Last path component, for display and classification.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Streaming reader over one entry's decompressed bytes.
pub struct ArchiveEntry<'a> {
    path: String,
    size: u64,
    file: zip::read::ZipFile<'a>,
}

impl ArchiveEntry<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

/// Re-iterable view over a ZIP container.
#[derive(Debug)]
pub struct ZipReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> ZipReader<R> {
    /// Open the container, failing with [`ArchiveError::Corrupt`] when the
    /// end-of-central-directory record or the directory itself is unreadable.
    pub fn open(reader: R) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(reader).map_err(|e| match e {
            ZipError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::Corrupt(other.to_string()),
        })?;
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Central-directory metadata for one entry, without decompressing it.
    pub fn entry_meta(&mut self, index: usize) -> Result<EntryMeta, ArchiveError> {
        let file = self
            .archive
            .by_index_raw(index)
            .map_err(|e| ArchiveError::Corrupt(e.to_string()))?;
        Ok(EntryMeta {
            path: file.name().to_string(),
            size: file.size(),
            is_dir: file.is_dir(),
        })
    }

    /// Open a streaming reader over one entry's decompressed bytes.
    pub fn entry(&mut self, index: usize) -> Result<ArchiveEntry<'_>, EntryError> {
        let path = self
            .archive
            .name_for_index(index)
            .unwrap_or("<unnamed>")
            .to_string();

        match self.archive.by_index(index) {
            Ok(file) => {
                let size = file.size();
                Ok(ArchiveEntry { path, size, file })
            }
            Err(ZipError::UnsupportedArchive(reason)) => {
                debug!(entry = %path, reason, "unsupported entry");
                Err(EntryError::Unsupported {
                    path,
                    reason: reason.to_string(),
                })
            }
            Err(ZipError::InvalidPassword) => {
                debug!(entry = %path, "encrypted entry");
                Err(EntryError::Unsupported {
                    path,
                    reason: "entry is encrypted".to_string(),
                })
            }
            Err(other) => Err(EntryError::Unreadable {
                path,
                reason: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn sample_zip() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let stored = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            let deflated = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);

            writer.add_directory("filing/", stored).unwrap();
            writer.start_file("filing/Schedule_1.pdf", stored).unwrap();
            writer.write_all(b"%PDF-1.4 stored payload").unwrap();
            writer.start_file("filing/notes.txt", deflated).unwrap();
            writer.write_all(b"not a pdf").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn open_lists_all_entries() {
        let reader = ZipReader::open(Cursor::new(sample_zip())).unwrap();
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn entry_meta_reports_path_size_and_dir_flag() {
        let mut reader = ZipReader::open(Cursor::new(sample_zip())).unwrap();
        let dir = reader.entry_meta(0).unwrap();
        assert!(dir.is_dir);
        assert!(!dir.is_pdf());

        let pdf = reader.entry_meta(1).unwrap();
        assert_eq!(pdf.path, "filing/Schedule_1.pdf");
        assert_eq!(pdf.filename(), "Schedule_1.pdf");
        assert!(pdf.is_pdf());
        assert_eq!(pdf.size, b"%PDF-1.4 stored payload".len() as u64);
    }

    #[test]
    fn entry_streams_decompressed_bytes() {
        let mut reader = ZipReader::open(Cursor::new(sample_zip())).unwrap();
        let mut entry = reader.entry(2).unwrap();
        assert_eq!(entry.path(), "filing/notes.txt");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"not a pdf");
    }

    #[test]
    fn garbage_bytes_fail_as_corrupt() {
        let err = ZipReader::open(Cursor::new(b"this is not a zip file".to_vec())).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt(_)));
    }

    #[test]
    fn truncated_archive_fails_as_corrupt() {
        let mut bytes = sample_zip();
        bytes.truncate(bytes.len() / 2);
        let err = ZipReader::open(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt(_)));
    }

    #[test]
    fn reader_is_reiterable() {
        let mut reader = ZipReader::open(Cursor::new(sample_zip())).unwrap();
        for _ in 0..2 {
            let mut entry = reader.entry(1).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            assert_eq!(content, b"%PDF-1.4 stored payload");
        }
    }
}
