//! Source document extraction
//!
//! Resolves a Takeout source path to the raw watch history document and the
//! parser that should read it. Dispatch is by file extension; archives are
//! scanned member by member.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::constants::{
    MAX_MEMBER_PREALLOCATION, NARRATIVE_MEMBER_SUFFIX, STRUCTURED_MEMBER_SUFFIX, extensions,
};
use crate::{Error, Result};

/// Source type, determined by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Takeout zip archive holding one of the documents below
    Archive,
    /// HTML export
    Narrative,
    /// JSON export
    Structured,
    /// Anything else
    Unsupported,
}

impl SourceFormat {
    /// Detect the format from a path's extension, ignoring case
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some(extensions::ARCHIVE) => SourceFormat::Archive,
            Some(extensions::NARRATIVE) => SourceFormat::Narrative,
            Some(extensions::STRUCTURED) => SourceFormat::Structured,
            _ => SourceFormat::Unsupported,
        }
    }
}

/// Which parser a raw document goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Narrative,
    Structured,
}

impl DocumentKind {
    /// Kind selected by an archive member name, if any
    fn from_member_name(name: &str) -> Option<Self> {
        if name.ends_with(NARRATIVE_MEMBER_SUFFIX) {
            Some(DocumentKind::Narrative)
        } else if name.ends_with(STRUCTURED_MEMBER_SUFFIX) {
            Some(DocumentKind::Structured)
        } else {
            None
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Narrative => write!(f, "HTML"),
            DocumentKind::Structured => write!(f, "JSON"),
        }
    }
}

/// Raw document ready for parsing
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    /// File name, or archive member name
    pub name: String,
    pub content: Vec<u8>,
}

/// Resolve a source path to its watch history document
///
/// For archives every member is checked in archive order and a later match
/// replaces an earlier one, so when both an HTML and a JSON member are
/// present the one listed last is used.
pub fn extract_document(source: &Path) -> Result<ExtractedDocument> {
    match SourceFormat::from_path(source) {
        SourceFormat::Archive => extract_from_archive(source),
        SourceFormat::Narrative => read_plain(source, DocumentKind::Narrative),
        SourceFormat::Structured => read_plain(source, DocumentKind::Structured),
        SourceFormat::Unsupported => Err(Error::unsupported_format(
            source,
            "unrecognized file type (expected zip, html or json)",
        )),
    }
}

fn read_plain(source: &Path, kind: DocumentKind) -> Result<ExtractedDocument> {
    let content = std::fs::read(source)
        .map_err(|e| Error::extraction(source, format!("failed to read file: {}", e)))?;

    Ok(ExtractedDocument {
        kind,
        name: display_name(source),
        content,
    })
}

fn extract_from_archive(source: &Path) -> Result<ExtractedDocument> {
    let file = File::open(source)
        .map_err(|e| Error::extraction(source, format!("failed to open archive: {}", e)))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| Error::extraction(source, format!("malformed archive: {}", e)))?;

    let mut selected: Option<ExtractedDocument> = None;

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| Error::extraction(source, format!("unreadable member {}: {}", index, e)))?;

        let Some(kind) = DocumentKind::from_member_name(member.name()) else {
            continue;
        };

        let name = member.name().to_string();
        let hint = member.size().min(MAX_MEMBER_PREALLOCATION);
        let mut content = Vec::with_capacity(usize::try_from(hint).unwrap_or_default());
        member
            .read_to_end(&mut content)
            .map_err(|e| Error::extraction(source, format!("failed to read '{}': {}", name, e)))?;

        if let Some(previous) = &selected {
            debug!(
                "Archive member '{}' replaces earlier match '{}'",
                name, previous.name
            );
        }
        selected = Some(ExtractedDocument {
            kind,
            name,
            content,
        });
    }

    selected.ok_or_else(|| {
        Error::unsupported_format(
            source,
            format!(
                "archive has no member ending in '{}' or '{}'",
                NARRATIVE_MEMBER_SUFFIX, STRUCTURED_MEMBER_SUFFIX
            ),
        )
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_archive(dir: &TempDir, name: &str, members: &[(&str, &str)]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (member, body) in members {
            writer
                .start_file(*member, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_format_from_extension_ignores_case() {
        assert_eq!(
            SourceFormat::from_path(Path::new("takeout.ZIP")),
            SourceFormat::Archive
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("watch-history.Html")),
            SourceFormat::Narrative
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("watch-history.json")),
            SourceFormat::Structured
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("notes.txt")),
            SourceFormat::Unsupported
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("no_extension")),
            SourceFormat::Unsupported
        );
    }

    #[test]
    fn test_unsupported_extension_is_error() {
        let err = extract_document(Path::new("history.csv")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_plain_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watch-history.json");
        std::fs::write(&path, "[]").unwrap();

        let doc = extract_document(&path).unwrap();
        assert_eq!(doc.kind, DocumentKind::Structured);
        assert_eq!(doc.name, "watch-history.json");
        assert_eq!(doc.content, b"[]");
    }

    #[test]
    fn test_archive_selects_matching_member() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "takeout.zip",
            &[
                ("Takeout/archive_browser.html", "<html></html>"),
                ("Takeout/YouTube/history/watch-history.html", "<html>x</html>"),
                ("Takeout/YouTube/history/search-history.html", "<html></html>"),
            ],
        );

        let doc = extract_document(&path).unwrap();
        assert_eq!(doc.kind, DocumentKind::Narrative);
        assert_eq!(doc.name, "Takeout/YouTube/history/watch-history.html");
        assert_eq!(doc.content, b"<html>x</html>");
    }

    #[test]
    fn test_archive_later_member_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "takeout.zip",
            &[
                ("Takeout/watch-history.html", "<html></html>"),
                ("Takeout/watch-history.json", "[]"),
            ],
        );
        let doc = extract_document(&path).unwrap();
        assert_eq!(doc.kind, DocumentKind::Structured);

        let path = write_archive(
            &dir,
            "reversed.zip",
            &[
                ("Takeout/watch-history.json", "[]"),
                ("Takeout/watch-history.html", "<html></html>"),
            ],
        );
        let doc = extract_document(&path).unwrap();
        assert_eq!(doc.kind, DocumentKind::Narrative);
    }

    #[test]
    fn test_archive_without_history_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, "takeout.zip", &[("Takeout/other.json", "[]")]);

        let err = extract_document(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_malformed_archive_is_extraction_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"this is not a zip file").unwrap();

        let err = extract_document(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
    }

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for byte in data {
            crc ^= u32::from(*byte);
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        !crc
    }

    /// Single stored member whose directory entry declares `declared_size`
    /// through a zip64 extra field
    fn archive_with_declared_size(name: &str, body: &[u8], declared_size: u64) -> Vec<u8> {
        let crc = crc32(body);
        let len = body.len() as u32;
        let mut bytes = Vec::new();

        // Local file header
        bytes.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&20u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0x0021u16.to_le_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(body);

        // Central directory header with the uncompressed size in zip64 form
        let directory_start = bytes.len() as u32;
        bytes.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&45u16.to_le_bytes());
        bytes.extend_from_slice(&45u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0x0021u16.to_le_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&12u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(&0x0001u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&declared_size.to_le_bytes());
        let directory_size = bytes.len() as u32 - directory_start;

        // End of central directory
        bytes.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&directory_size.to_le_bytes());
        bytes.extend_from_slice(&directory_start.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    #[test]
    fn test_oversized_member_declaration_does_not_preallocate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("takeout.zip");
        let bytes =
            archive_with_declared_size("Takeout/watch-history.json", b"[]", 0x7FFF_FFFF_FFFF_FF00);
        std::fs::write(&path, bytes).unwrap();

        // Reaching either arm means the declared size never drove an allocation
        match extract_document(&path) {
            Ok(doc) => assert_eq!(doc.content, b"[]"),
            Err(err) => assert!(matches!(err, Error::Extraction { .. })),
        }
    }
}
