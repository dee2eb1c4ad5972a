//! Types for staging and observing invoice uploads

use std::path::Path;

use crate::error::Error;

/// Media types the inference endpoint accepts
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["application/pdf", "application/xml", "text/xml"];

/// A file staged for processing
#[derive(Debug, Clone)]
pub struct InvoiceFile {
    /// File name, including extension
    pub name: String,

    /// Declared media type
    pub media_type: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl InvoiceFile {
    /// Stage a file from raw bytes and a declared media type
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Stage a file from disk, deriving the media type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let media_type = media_type_for(&name)
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// Whether the declared media type (or, failing that, the extension)
    /// is accepted for processing
    pub fn is_supported(&self) -> bool {
        ACCEPTED_MEDIA_TYPES.contains(&self.media_type.as_str())
            || media_type_for(&self.name).is_some()
    }

    pub(crate) fn ensure_supported(&self) -> Result<(), Error> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::UnsupportedFileType(self.media_type.clone()))
        }
    }
}

fn media_type_for(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        Some("application/pdf")
    } else if lower.ends_with(".xml") {
        Some("application/xml")
    } else {
        None
    }
}

/// Lifecycle of a single upload, observable while it runs.
///
/// The progress value is synthesized for feedback only and has no relation
/// to actual transfer progress. After a settled state (`Succeeded` or
/// `Failed`) is published the controller re-arms to `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// No upload in flight
    Idle,

    /// An upload is in flight; `progress` runs 0..=100
    Uploading {
        /// Synthesized progress, held at 90 until the response arrives
        progress: u8,
        /// Name of the file being processed
        file_name: String,
    },

    /// The last upload completed and its payload was delivered
    Succeeded,

    /// The last upload failed with the given message
    Failed {
        /// Human-readable failure description
        message: String,
    },
}

impl UploadState {
    /// Whether an upload is currently in flight
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }

    /// The synthesized progress value, when uploading
    pub fn progress(&self) -> Option<u8> {
        match self {
            UploadState::Uploading { progress, .. } => Some(*progress),
            _ => None,
        }
    }
}

impl Default for UploadState {
    fn default() -> Self {
        UploadState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_pdf_and_xml() {
        assert!(InvoiceFile::from_bytes("a.pdf", "application/pdf", vec![]).is_supported());
        assert!(InvoiceFile::from_bytes("a.xml", "text/xml", vec![]).is_supported());
        // extension rescues a generic declared type
        assert!(InvoiceFile::from_bytes("a.XML", "application/octet-stream", vec![]).is_supported());
    }

    #[test]
    fn rejects_other_types() {
        let file = InvoiceFile::from_bytes("notes.txt", "text/plain", vec![]);
        assert!(!file.is_supported());
        assert!(matches!(
            file.ensure_supported(),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn stages_from_disk_with_derived_media_type() {
        let mut tmp = tempfile::Builder::new()
            .prefix("invoice")
            .suffix(".pdf")
            .tempfile()
            .unwrap();
        tmp.write_all(b"%PDF-1.4").unwrap();

        let file = tokio_test::block_on(InvoiceFile::from_path(tmp.path())).unwrap();
        assert_eq!(file.media_type, "application/pdf");
        assert!(file.name.ends_with(".pdf"));
        assert_eq!(file.bytes, b"%PDF-1.4");
    }
}
