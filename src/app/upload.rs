//! File intake and upload

use super::{App, TaskEvent};
use crate::error::Result;
use crate::types::{NotificationKind, UploadResponse};
use crate::validation::{self, FileCandidate};
use eframe::egui;
use tracing::{debug, info, warn};

const UPLOAD_FAILED: &str = "An error occurred while processing your image. Please try again.";
const READ_FAILED: &str = "Could not read the selected file.";

impl App {
    pub fn open_file_dialog(&mut self, ctx: &egui::Context) {
        if self.uploading {
            return;
        }
        let picked = rfd::FileDialog::new()
            .set_title("Select an image")
            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"])
            .add_filter("All files", &["*"])
            .pick_file();

        if let Some(path) = picked {
            match FileCandidate::from_path(path) {
                Ok(candidate) => self.submit_file(ctx, candidate),
                Err(e) => {
                    warn!(error = %e, "Failed to stat picked file");
                    self.notifier.error(e.user_message(READ_FAILED));
                }
            }
        }
    }

    /// Track OS drag-over and take the first dropped file
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped, dropped_count) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
                i.raw.dropped_files.len(),
            )
        });
        self.files_hovering = hovering;

        let Some(file) = dropped else { return };
        if self.uploading {
            return;
        }
        let Some(path) = file.path else {
            self.notifier.error(READ_FAILED);
            return;
        };
        let mime = Some(file.mime).filter(|m| !m.is_empty());
        match FileCandidate::from_path(path) {
            Ok(candidate) => {
                self.submit_file(ctx, FileCandidate { mime, ..candidate });
                if dropped_count > 1 && self.uploading {
                    self.notifier.show(
                        "Only the first dropped file is uploaded.",
                        NotificationKind::Warning,
                    );
                }
            }
            Err(e) => self.notifier.error(e.user_message(READ_FAILED)),
        }
    }

    /// Validate and upload. A rejected file leaves every bit of state untouched.
    pub(crate) fn submit_file(&mut self, ctx: &egui::Context, candidate: FileCandidate) {
        if let Err(e) = validation::validate(&candidate, self.settings.max_upload_bytes) {
            info!(path = %candidate.path.display(), error = %e, "Rejected file");
            self.notifier.error(e.to_string());
            return;
        }

        self.uploading = true;
        let api = self.api.clone();
        self.spawn_task(ctx, async move {
            TaskEvent::UploadFinished(api.upload(&candidate).await)
        });
    }

    pub(crate) fn on_upload_finished(&mut self, result: Result<UploadResponse>) {
        self.uploading = false;
        match result {
            Ok(response) => {
                info!(original = %response.original, variants = response.variants.len(), "Upload processed");
                self.session.load(response);
                // Results of the previous image are never shown again
                debug!(textures = self.textures.len(), "Releasing previous textures");
                self.textures.clear();
                self.notifier
                    .success("Image processed successfully! Choose your transformation tools.");
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                self.notifier.error(e.user_message(UPLOAD_FAILED));
            }
        }
    }
}
