//! File intake validation, run before anything is sent to the server

use crate::constants::ACCEPTED_MIME_TYPES;
use crate::error::{ClientError, Result};
use std::path::{Path, PathBuf};

/// A file the user picked or dropped, not yet validated
#[derive(Clone, Debug, PartialEq)]
pub struct FileCandidate {
    pub path: PathBuf,
    /// MIME type reported by the drop source, if any
    pub mime: Option<String>,
    pub size: u64,
}

impl FileCandidate {
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let size = std::fs::metadata(&path)?.len();
        Ok(Self { path, mime: None, size })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string())
    }

    /// Reported MIME type, falling back to one inferred from the extension
    pub fn mime_type(&self) -> String {
        match self.mime.as_deref() {
            Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
            _ => mime_from_extension(&self.path),
        }
    }
}

/// Infer a MIME type from the file extension; empty when unknown
pub fn mime_from_extension(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_default()
}

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// Accept or reject a candidate. Rejection means no request is sent.
pub fn validate(candidate: &FileCandidate, max_bytes: u64) -> Result<()> {
    let mime = candidate.mime_type();
    if !is_accepted_mime(&mime) {
        return Err(ClientError::InvalidFileType { mime });
    }
    if candidate.size > max_bytes {
        return Err(ClientError::FileTooLarge {
            size: candidate.size,
            max_mb: max_bytes / (1024 * 1024),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;

    fn candidate(name: &str, mime: Option<&str>) -> FileCandidate {
        FileCandidate { path: PathBuf::from(name), mime: mime.map(String::from), size: 1024 }
    }

    #[test]
    fn test_accepts_supported_extensions() {
        for name in ["a.jpg", "a.jpeg", "a.png", "a.bmp", "a.tiff", "a.tif", "a.webp", "A.PNG"] {
            assert!(validate(&candidate(name, None), DEFAULT_MAX_UPLOAD_BYTES).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_rejects_gif() {
        let err = validate(&candidate("anim.gif", None), DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, ClientError::InvalidFileType { ref mime } if mime == "image/gif"));
        assert!(err.to_string().starts_with("Please select a valid image file"));
    }

    #[test]
    fn test_rejects_unknown_and_missing_extension() {
        assert!(validate(&candidate("notes.txt", None), DEFAULT_MAX_UPLOAD_BYTES).is_err());
        assert!(validate(&candidate("noext", None), DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_reported_mime_wins_over_extension() {
        assert!(validate(&candidate("photo.png", Some("image/gif")), DEFAULT_MAX_UPLOAD_BYTES).is_err());
        assert!(validate(&candidate("blob", Some("image/jpg")), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        // An empty reported type is treated as unknown
        assert!(validate(&candidate("photo.webp", Some("")), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_rejects_oversize() {
        let mut c = candidate("big.png", None);
        c.size = DEFAULT_MAX_UPLOAD_BYTES + 1;
        let err = validate(&c, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "File is too large (max 16 MB).");
    }
}
