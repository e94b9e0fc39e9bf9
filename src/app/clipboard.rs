//! Copy extracted text to the system clipboard

use super::App;
use crate::error::{ClientError, Result};
use tracing::warn;

fn write_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ClientError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| ClientError::Clipboard(e.to_string()))
}

impl App {
    pub fn copy_text(&mut self) {
        let text = self.session.extracted_text().unwrap_or_default().to_owned();
        match write_clipboard(&text) {
            Ok(()) => self.notifier.success("Text copied to clipboard!"),
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                self.notifier.error("Failed to copy text.");
            }
        }
    }
}
