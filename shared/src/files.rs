use strum_macros::{EnumIter, IntoStaticStr};

use crate::error::ValidationError;
use crate::urls::file_name_from_url;

pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// MIME types browsers report for the accepted video containers.
pub const VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/avi",
    "video/x-msvideo",
    "video/mkv",
    "video/x-matroska",
    "video/mov",
    "video/quicktime",
    "video/webm",
];

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];
const RESUME_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Extensions served as downloads instead of being opened in a tab.
const DOWNLOAD_EXTENSIONS: &[&str] = &["doc", "docx", "txt", "rtf"];

/// What the browser told us about a picked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn limit_mb(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    Photo,
    IdProof,
    Resume,
}

impl DocumentKind {
    /// Multipart part name, e.g. `id_proof`.
    pub fn field_name(&self) -> &'static str {
        (*self).into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Photo => "Photo",
            DocumentKind::IdProof => "ID Proof",
            DocumentKind::Resume => "CV (PDF/DOC/DOCX)",
        }
    }

    /// Value for the `accept` attribute of the file input.
    pub fn accept(&self) -> &'static str {
        match self {
            DocumentKind::Photo | DocumentKind::IdProof => "image/jpeg, image/png",
            DocumentKind::Resume => ".pdf,.doc,.docx",
        }
    }

    fn allowed_description(&self) -> &'static str {
        match self {
            DocumentKind::Photo | DocumentKind::IdProof => "JPEG, PNG",
            DocumentKind::Resume => "PDF, DOC, DOCX",
        }
    }

    fn accepts_type(&self, file: &FileMeta) -> bool {
        match self {
            DocumentKind::Photo | DocumentKind::IdProof => {
                IMAGE_MIME_TYPES.contains(&file.mime.as_str())
            }
            DocumentKind::Resume => {
                RESUME_MIME_TYPES.contains(&file.mime.as_str())
                    || file
                        .extension()
                        .is_some_and(|ext| RESUME_EXTENSIONS.contains(&ext.as_str()))
            }
        }
    }

    pub fn check(&self, file: &FileMeta) -> Result<(), ValidationError> {
        if !self.accepts_type(file) {
            return Err(ValidationError::UnsupportedDocumentType {
                label: self.label(),
                allowed: self.allowed_description(),
            });
        }
        if file.size > MAX_DOCUMENT_BYTES {
            return Err(ValidationError::FileTooLarge {
                limit_mb: limit_mb(MAX_DOCUMENT_BYTES),
            });
        }
        Ok(())
    }
}

pub fn check_video(file: &FileMeta) -> Result<(), ValidationError> {
    if !VIDEO_MIME_TYPES.contains(&file.mime.as_str()) {
        return Err(ValidationError::UnsupportedVideoType);
    }
    if file.size > MAX_VIDEO_BYTES {
        return Err(ValidationError::FileTooLarge {
            limit_mb: limit_mb(MAX_VIDEO_BYTES),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Open,
    Download,
}

pub fn link_mode(url: &str) -> LinkMode {
    match file_name_from_url(url).and_then(extension_of) {
        Some(ext) if DOWNLOAD_EXTENSIONS.contains(&ext.as_str()) => LinkMode::Download,
        _ => LinkMode::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn part_names_match_backend_fields() {
        let names: Vec<&str> = DocumentKind::iter().map(|k| k.field_name()).collect();
        assert_eq!(names, vec!["photo", "id_proof", "resume"]);
    }

    #[test]
    fn documents_over_five_megabytes_are_rejected() {
        let photo = FileMeta::new("me.png", "image/png", MAX_DOCUMENT_BYTES + 1);
        assert_eq!(
            DocumentKind::Photo.check(&photo),
            Err(ValidationError::FileTooLarge { limit_mb: 5 })
        );

        let exact = FileMeta::new("me.png", "image/png", MAX_DOCUMENT_BYTES);
        assert!(DocumentKind::Photo.check(&exact).is_ok());
    }

    #[test]
    fn resume_accepts_extension_when_mime_is_blank() {
        let cv = FileMeta::new("CV.DOCX", "", 10_000);
        assert!(DocumentKind::Resume.check(&cv).is_ok());

        let png = FileMeta::new("cv.png", "image/png", 10_000);
        assert!(matches!(
            DocumentKind::Resume.check(&png),
            Err(ValidationError::UnsupportedDocumentType { .. })
        ));
    }

    #[test]
    fn video_whitelist_and_size() {
        assert!(check_video(&FileMeta::new("v.webm", "video/webm", 1024)).is_ok());
        assert_eq!(
            check_video(&FileMeta::new("v.gif", "image/gif", 1024)),
            Err(ValidationError::UnsupportedVideoType)
        );
        assert_eq!(
            check_video(&FileMeta::new("v.mp4", "video/mp4", MAX_VIDEO_BYTES + 1)),
            Err(ValidationError::FileTooLarge { limit_mb: 100 })
        );
    }

    #[test]
    fn word_documents_download_and_pdfs_open() {
        assert_eq!(link_mode("https://os/o/cv.DOCX"), LinkMode::Download);
        assert_eq!(link_mode("https://os/o/cv.pdf"), LinkMode::Open);
        assert_eq!(link_mode("https://os/o/noext"), LinkMode::Open);
    }
}
