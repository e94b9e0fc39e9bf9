//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_QUALITY, DEFAULT_SERVER_URL};
use crate::types::{Model, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Server
    pub server_url: String,
    pub max_upload_bytes: u64,

    // Defaults for the tool panels
    pub default_model: Model,
    pub output_format: OutputFormat,
    pub quality: u8,

    // Paths
    pub download_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_model: Model::default(),
            output_format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            download_path: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<Settings>(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings.sanitized()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Clamp hand-edited values back into range
    fn sanitized(mut self) -> Self {
        self.quality = self.quality.clamp(1, 100);
        if self.server_url.trim().is_empty() {
            self.server_url = DEFAULT_SERVER_URL.to_string();
        }
        if self.max_upload_bytes == 0 {
            self.max_upload_bytes = DEFAULT_MAX_UPLOAD_BYTES;
        }
        self
    }

    pub fn download_path_or_default(&self) -> PathBuf {
        self.download_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::download_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."))
            })
    }
}
