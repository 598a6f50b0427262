use std::io::{Cursor, Read};

use crate::error::{ExtractionError, ValidationError};

pub const DEFAULT_TEXT_SUFFIX: &str = ".txt";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Pulls the first text entry out of an in-memory ZIP archive.
#[derive(Debug, Clone)]
pub struct ArchiveTextExtractor {
    suffix: String,
}

impl Default for ArchiveTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_SUFFIX)
    }
}

impl ArchiveTextExtractor {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Entries are scanned in central-directory order; the first name ending in
    /// the suffix wins and scanning stops there.
    pub fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::CorruptArchive(e.to_string()))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| ExtractionError::CorruptArchive(e.to_string()))?;
            if !entry.is_file() || !entry.name().ends_with(&self.suffix) {
                continue;
            }

            let name = entry.name().to_string();
            let mut buf = Vec::new();
            entry
                .read_to_end(&mut buf)
                .map_err(|e| ExtractionError::CorruptArchive(format!("{}: {}", name, e)))?;
            let text = String::from_utf8_lossy(&buf).into_owned();

            if text.is_empty() {
                // An empty first match reads the same as no match at all.
                log::info!("Archive entry {} is empty", name);
                break;
            }
            log::debug!("Extracted {} ({} bytes)", name, buf.len());
            return Ok(text);
        }

        Err(ExtractionError::NoTextEntry {
            suffix: self.suffix.clone(),
        })
    }
}

/// Accept `.zip` names (any case) or an `application/zip` content type.
pub fn validate_upload(file_name: &str, content_type: Option<&str>) -> Result<(), ValidationError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase());
    if extension.as_deref() == Some("zip") || content_type == Some(ZIP_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(ValidationError {
            file_name: file_name.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Build an archive in memory with entries in the given order.
    pub(crate) fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn first_text_entry_wins() {
        let bytes = zip_of(&[("a.txt", "first"), ("b.txt", "second")]);
        assert_eq!(ArchiveTextExtractor::default().extract(&bytes).unwrap(), "first");
    }

    #[test]
    fn non_text_entries_are_skipped() {
        let bytes = zip_of(&[
            ("docs/", ""),
            ("image.png", "not really a png"),
            ("docs/notes.txt", "hello"),
        ]);
        assert_eq!(ArchiveTextExtractor::default().extract(&bytes).unwrap(), "hello");
    }

    #[test]
    fn no_text_entry() {
        let bytes = zip_of(&[("readme.md", "# hi"), ("data.csv", "a,b")]);
        assert_eq!(
            ArchiveTextExtractor::default().extract(&bytes),
            Err(ExtractionError::NoTextEntry {
                suffix: ".txt".to_string()
            })
        );
    }

    #[test]
    fn empty_archive_has_no_text_entry() {
        let bytes = zip_of(&[]);
        assert!(matches!(
            ArchiveTextExtractor::default().extract(&bytes),
            Err(ExtractionError::NoTextEntry { .. })
        ));
    }

    #[test]
    fn empty_first_match_stops_the_scan() {
        let bytes = zip_of(&[("a.txt", ""), ("b.txt", "second")]);
        assert!(matches!(
            ArchiveTextExtractor::default().extract(&bytes),
            Err(ExtractionError::NoTextEntry { .. })
        ));
    }

    #[test]
    fn suffix_is_case_sensitive() {
        let bytes = zip_of(&[("NOTES.TXT", "upper")]);
        assert!(ArchiveTextExtractor::default().extract(&bytes).is_err());
        assert_eq!(ArchiveTextExtractor::new(".TXT").extract(&bytes).unwrap(), "upper");
    }

    #[test]
    fn garbage_is_corrupt() {
        let result = ArchiveTextExtractor::default().extract(b"definitely not a zip file");
        assert!(matches!(result, Err(ExtractionError::CorruptArchive(_))));
        assert!(matches!(
            ArchiveTextExtractor::default().extract(&[]),
            Err(ExtractionError::CorruptArchive(_))
        ));
    }

    #[test]
    fn upload_validation() {
        assert!(validate_upload("notes.zip", None).is_ok());
        assert!(validate_upload("NOTES.ZIP", None).is_ok());
        assert!(validate_upload("blob", Some("application/zip")).is_ok());
        assert!(validate_upload("notes.txt", Some("text/plain")).is_err());
        assert!(validate_upload("zip", None).is_err());
        assert_eq!(
            validate_upload("notes.tar.gz", None).unwrap_err().to_string(),
            "Please upload a ZIP file."
        );
    }
}
