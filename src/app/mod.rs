//! App module - contains the main application state and logic

mod adjust;
mod clipboard;
mod downloads;
mod images;
mod upload;

pub(crate) use adjust::ConversionAction;
use images::TextureCache;

use crate::api::ApiClient;
use crate::constants::*;
use crate::error::Result;
use crate::notifications::Notifier;
use crate::session::Session;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Results coming back from background tasks
pub(crate) enum TaskEvent {
    UploadFinished(Result<UploadResponse>),
    ConversionFinished {
        action: ConversionAction,
        result: Result<ConvertResponse>,
    },
    ImageFetched {
        url: String,
        result: Result<egui::ColorImage>,
    },
    DownloadProgress(u64, u64),
    DownloadFinished {
        dest: PathBuf,
        result: Result<u64>,
    },
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) api: ApiClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) events_tx: UnboundedSender<TaskEvent>,
    pub(crate) events_rx: UnboundedReceiver<TaskEvent>,
    /// Cancelled on exit so streaming downloads stop writing
    pub(crate) shutdown: CancellationToken,
    // Session & feedback
    pub(crate) session: Session,
    pub(crate) notifier: Notifier,
    pub(crate) uploading: bool,
    pub(crate) files_hovering: bool,
    // Adjustment sliders (percent)
    pub(crate) hue: u32,
    pub(crate) saturation: u32,
    pub(crate) brightness: u32,
    pub(crate) enhance: u32,
    // Download options
    pub(crate) output_format: OutputFormat,
    pub(crate) quality: u8,
    pub(crate) download_status: Option<DownloadStatus>,
    pub(crate) download_path: PathBuf,
    pub(crate) download_path_str: String,
    pub(crate) textures: TextureCache<egui::TextureHandle>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) server_url_str: String,
    pub(crate) show_settings: bool,
    pub(crate) data_dir: PathBuf,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) started_at: Instant,
}

/// State of the most recent download
#[derive(Clone, Debug, PartialEq)]
pub enum DownloadStatus {
    Downloading(u64, u64), // (downloaded_bytes, total_bytes)
    Complete(PathBuf),
    Failed(String),
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let api = match ApiClient::new(&settings.server_url) {
            Ok(api) => api,
            Err(e) => {
                warn!(error = %e, url = %settings.server_url, "Bad server URL, using default");
                ApiClient::new(DEFAULT_SERVER_URL).expect("default server URL is valid")
            }
        };
        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
        let (events_tx, events_rx) = unbounded_channel();
        let download_path = settings.download_path_or_default();

        Self {
            api,
            runtime,
            events_tx,
            events_rx,
            shutdown: CancellationToken::new(),
            session: Session::new(settings.default_model),
            notifier: Notifier::default(),
            uploading: false,
            files_hovering: false,
            hue: 100,
            saturation: 100,
            brightness: 100,
            enhance: 100,
            output_format: settings.output_format,
            quality: settings.quality,
            download_status: None,
            download_path_str: download_path.to_string_lossy().to_string(),
            download_path,
            textures: TextureCache::default(),
            server_url_str: settings.server_url.clone(),
            settings,
            show_settings: false,
            data_dir,
            window_pos: None,
            window_size: None,
            needs_center: false,
            started_at: Instant::now(),
        }
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.output_format = self.output_format;
        self.settings.quality = self.quality;
        self.settings.default_model = self.session.selection.model;
        self.settings.download_path = Some(self.download_path_str.clone());
        self.settings.save(&self.data_dir);
    }

    /// Point the client at a new server. Textures from the old one are dropped.
    /// Returns false, leaving everything as it was, when the URL does not parse.
    pub fn apply_server_url(&mut self) -> bool {
        match ApiClient::new(&self.server_url_str) {
            Ok(api) => {
                debug!(url = %api.base_url(), "Server URL changed");
                self.api = api;
                self.settings.server_url = self.server_url_str.trim().to_string();
                self.textures.clear();
                self.save_settings();
                true
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                false
            }
        }
    }

    /// Run `task` on the runtime and post its result back to the UI thread
    pub(crate) fn spawn_task<F>(&self, ctx: &egui::Context, task: F)
    where
        F: std::future::Future<Output = TaskEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            tx.send(event).ok();
            ctx.request_repaint();
        });
    }

    /// Apply every finished background result, in arrival order
    pub fn poll_tasks(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                TaskEvent::UploadFinished(result) => self.on_upload_finished(result),
                TaskEvent::ConversionFinished { action, result } => {
                    self.on_conversion_finished(action, result)
                }
                TaskEvent::ImageFetched { url, result } => self.on_image_fetched(ctx, url, result),
                TaskEvent::DownloadProgress(done, total) => {
                    self.download_status = Some(DownloadStatus::Downloading(done, total));
                }
                TaskEvent::DownloadFinished { dest, result } => self.on_download_finished(dest, result),
            }
        }
    }

    /// Splash overlay opacity: 1.0 while visible, fading to 0.0
    pub fn splash_opacity(&self) -> f32 {
        let elapsed = self.started_at.elapsed().as_secs_f32();
        if elapsed < SPLASH_VISIBLE_SECS {
            1.0
        } else {
            (1.0 - (elapsed - SPLASH_VISIBLE_SECS) / SPLASH_FADE_SECS).max(0.0)
        }
    }
}
