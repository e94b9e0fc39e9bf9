//! Download logic

use super::{App, DownloadStatus, TaskEvent};
use crate::error::Result;
use crate::utils::format_bytes;
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    /// Ask where to save, then stream the displayed image in the chosen
    /// format and quality.
    pub fn download_displayed(&mut self, ctx: &egui::Context) {
        let download_url = match self.session.download_url(self.output_format, self.quality) {
            Ok(url) => url,
            Err(e) => {
                self.notifier.error(e.to_string());
                return;
            }
        };

        std::fs::create_dir_all(&self.download_path).ok();
        let file_name = format!("converted_image.{}", self.output_format.extension());
        let Some(dest) = rfd::FileDialog::new()
            .set_directory(&self.download_path)
            .set_file_name(&file_name)
            .save_file()
        else {
            return;
        };

        if let Some(dir) = dest.parent() {
            self.download_path = dir.to_path_buf();
            self.download_path_str = self.download_path.to_string_lossy().to_string();
        }

        info!(url = %download_url, dest = %dest.display(), "Starting download");
        self.download_status = Some(DownloadStatus::Downloading(0, 0));
        self.notifier.success("Download started!");
        self.spawn_download(ctx, download_url, dest);
    }

    fn spawn_download(&self, ctx: &egui::Context, download_url: String, dest: PathBuf) {
        let api = self.api.clone();
        let token = self.shutdown.clone();
        let progress_tx = self.events_tx.clone();
        let progress_ctx = ctx.clone();

        self.spawn_task(ctx, async move {
            let mut last_repaint = std::time::Instant::now();
            let result = api
                .download_to(&download_url, &dest, &token, |done, total| {
                    progress_tx.send(TaskEvent::DownloadProgress(done, total)).ok();
                    if last_repaint.elapsed() >= std::time::Duration::from_millis(100) {
                        progress_ctx.request_repaint();
                        last_repaint = std::time::Instant::now();
                    }
                })
                .await;
            TaskEvent::DownloadFinished { dest, result }
        });
    }

    pub(crate) fn on_download_finished(&mut self, dest: PathBuf, result: Result<u64>) {
        match result {
            Ok(bytes) => {
                let name = dest
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.notifier
                    .success(format!("Saved {} ({})", name, format_bytes(bytes)));
                self.download_status = Some(DownloadStatus::Complete(dest));
            }
            Err(e) => {
                warn!(error = %e, dest = %dest.display(), "Download failed");
                let message = e.user_message("Download failed.");
                self.notifier.error(message.clone());
                self.download_status = Some(DownloadStatus::Failed(message));
            }
        }
    }

    /// Reveal the folder of the last finished download
    pub fn open_download_folder(&self) {
        let folder = match &self.download_status {
            Some(DownloadStatus::Complete(dest)) => {
                dest.parent().map(PathBuf::from).unwrap_or_else(|| self.download_path.clone())
            }
            _ => self.download_path.clone(),
        };
        if let Err(e) = open::that(&folder) {
            warn!(error = %e, folder = %folder.display(), "Failed to open folder");
        }
    }
}
