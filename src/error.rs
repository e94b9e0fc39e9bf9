//! Client error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please select a valid image file (JPG, PNG, BMP, TIFF, or WEBP).")]
    InvalidFileType { mime: String },

    #[error("File is too large (max {max_mb} MB).")]
    FileTooLarge { size: u64, max_mb: u64 },

    #[error("No image available to download.")]
    NoImageToDownload,

    #[error("Upload an image first.")]
    NoSession,

    /// Message taken verbatim from the server's `error` field
    #[error("{0}")]
    Server(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Could not decode image: {0}")]
    Decode(String),
}

impl ClientError {
    /// Server-reported errors are shown as-is; everything that failed on the
    /// way there is shown with the action-specific fallback text.
    pub fn user_message(&self, transport_fallback: &str) -> String {
        match self {
            ClientError::Http(_) | ClientError::Io(_) | ClientError::Decode(_) => {
                transport_fallback.to_string()
            }
            other => other.to_string(),
        }
    }
}
