#![windows_subsystem = "windows"]
//! Image Studio - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod constants;
mod error;
mod notifications;
mod session;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;
mod validation;

use app::{App, DownloadStatus};
use constants::*;
use eframe::egui;
use std::time::Instant;
use tracing::info;
use types::*;
use ui::components::{drop_zone, image_card, option_button, percent_slider};
use utils::{format_bytes, get_data_dir};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, EnvFilter, prelude::*};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "image-studio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,image_studio=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Image Studio starting");

    let settings = settings::Settings::load(&data_dir);
    info!(server = %settings.server_url, "Using conversion server");

    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1200.0, 860.0)))
        .with_min_inner_size([900.0, 640.0])
        .with_drag_and_drop(true)
        .with_title(APP_NAME);

    let needs_center = win_pos.is_none();
    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.poll_tasks(ctx);
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(theme::BG_ELEVATED).inner_margin(egui::Margin::symmetric(16, 10)))
            .show(ctx, |ui| self.render_header(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin::same(16)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.set_max_width(1100.0);
                        self.render_upload_section(ui, ctx);
                        if self.session.has_images() {
                            ui.add_space(theme::SPACING_XL);
                            self.render_tools_section(ui, ctx);
                            ui.add_space(theme::SPACING_XL);
                            self.render_results_section(ui, ctx);
                            ui.add_space(theme::SPACING_XL);
                            self.render_download_section(ui, ctx);
                        }
                    });
            });

        self.render_settings_modal(ctx);
        self.render_notification(ctx);
        self.render_splash(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.shutdown.cancel();
        self.save_settings();
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}  {}", egui_phosphor::regular::IMAGE, APP_NAME))
                    .size(theme::FONT_TITLE)
                    .color(theme::ACCENT_LIGHT)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(theme::button(format!("{}  Settings", egui_phosphor::regular::GEAR)))
                    .clicked()
                {
                    self.server_url_str = self.settings.server_url.clone();
                    self.show_settings = true;
                }
                ui.label(
                    egui::RichText::new(self.api.base_url().as_str())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
            });
        });
    }

    fn render_upload_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.uploading {
            theme::card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.add_space(theme::SPACING_LG);
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Processing your image...")
                            .size(theme::FONT_HEADING)
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.label(
                        egui::RichText::new("Generating styles, color modes and extracting text")
                            .color(theme::TEXT_MUTED),
                    );
                    ui.add_space(theme::SPACING_LG);
                });
            });
            return;
        }

        if self.session.has_images() {
            ui.horizontal(|ui| {
                let label = format!("{}  Upload another image", egui_phosphor::regular::UPLOAD_SIMPLE);
                if ui.add(theme::button(label)).clicked() {
                    self.open_file_dialog(ctx);
                }
                if self.files_hovering {
                    ui.label(egui::RichText::new("Release to upload").color(theme::ACCENT_LIGHT));
                }
            });
            return;
        }

        ui.vertical_centered(|ui| {
            ui.add_space(theme::SPACING_XL);
            ui.label(
                egui::RichText::new("Transform your images")
                    .size(theme::FONT_HERO)
                    .color(theme::TEXT_PRIMARY)
                    .strong(),
            );
            ui.label(
                egui::RichText::new("Anime styles, color modes, HSV adjustments and text extraction")
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            );
            ui.add_space(theme::SPACING_XL);
        });
        if drop_zone(ui, self.files_hovering).clicked() {
            self.open_file_dialog(ctx);
        }
    }

    fn render_tools_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    let active = self.session.selection.tool == tool;
                    let label = format!("{}  {}", tool.icon(), tool.label());
                    if option_button(ui, active, &label).clicked() {
                        self.session.select_tool(tool);
                    }
                }
            });
            ui.add_space(theme::SPACING_MD);
            ui.separator();
            ui.add_space(theme::SPACING_MD);

            match self.session.selection.tool {
                Tool::Anime => {
                    ui.label(egui::RichText::new("Model").color(theme::TEXT_MUTED));
                    ui.horizontal_wrapped(|ui| {
                        for model in Model::ALL {
                            let active = self.session.selection.model == model;
                            if option_button(ui, active, model.display_name()).clicked() {
                                self.session.select_model(model);
                            }
                        }
                    });
                }
                Tool::Color => {
                    ui.label(egui::RichText::new("Color mode").color(theme::TEXT_MUTED));
                    ui.horizontal_wrapped(|ui| {
                        for mode in ColorMode::ALL {
                            let active = self.session.selection.color_mode == Some(mode);
                            if option_button(ui, active, &mode.title_case()).clicked() {
                                self.session.select_color_mode(mode);
                            }
                        }
                    });
                }
                Tool::Adjust => self.render_adjust_panel(ui, ctx),
                Tool::Ocr => self.render_ocr_panel(ui),
            }
        });
    }

    fn render_adjust_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        percent_slider(ui, "Hue", &mut self.hue, 0..=200);
        percent_slider(ui, "Saturation", &mut self.saturation, 0..=200);
        percent_slider(ui, "Brightness", &mut self.brightness, 0..=200);
        ui.add_space(theme::SPACING_SM);
        ui.horizontal(|ui| {
            let label = format!("{}  Apply Adjustments", egui_phosphor::regular::CHECK);
            if ui.add(theme::button_accent(label)).clicked() {
                self.apply_adjustments(ctx);
            }
            if ui.add(theme::button("Reset")).clicked() {
                self.reset_adjustments();
            }
        });

        ui.add_space(theme::SPACING_LG);
        percent_slider(ui, "Enhance", &mut self.enhance, 0..=300);
        let label = format!("{}  Apply Enhancement", egui_phosphor::regular::SPARKLE);
        if ui.add(theme::button_accent(label)).clicked() {
            self.apply_enhance(ctx);
        }
    }

    fn render_ocr_panel(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Extracted text").color(theme::TEXT_MUTED));
        let mut text = self.session.extracted_text().unwrap_or_default().to_string();
        egui::Frame::new()
            .fill(theme::BG_BASE)
            .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
            .corner_radius(theme::RADIUS_DEFAULT)
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .desired_width(f32::INFINITY)
                            .interactive(false)
                            .font(egui::TextStyle::Monospace),
                    );
                });
            });
        ui.add_space(theme::SPACING_SM);
        let label = format!("{}  Copy Text", egui_phosphor::regular::COPY);
        if ui.add(theme::button(label)).clicked() {
            self.copy_text();
        }
    }

    fn render_results_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use egui_extras::{Size, StripBuilder};

        let original_url = self
            .session
            .images()
            .map(|i| i.original.clone())
            .unwrap_or_default();
        let displayed = self.session.displayed().cloned();

        let original_tex = self.image_texture(ctx, &original_url);
        let original_loading = self.is_image_loading(&original_url);
        let (converted_tex, converted_loading, title) = match &displayed {
            Some(d) => (
                self.image_texture(ctx, &d.url),
                self.is_image_loading(&d.url),
                d.title.clone(),
            ),
            None => (None, false, String::new()),
        };

        let height = theme::RESULT_IMAGE_MAX_HEIGHT + 80.0;
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            StripBuilder::new(ui)
                .size(Size::remainder())
                .size(Size::exact(theme::SPACING_XL))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        image_card(ui, "Original Image", original_tex.as_ref(), original_loading);
                    });
                    strip.empty();
                    strip.cell(|ui| {
                        image_card(ui, &title, converted_tex.as_ref(), converted_loading);
                    });
                });
        });
    }

    fn render_download_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new("Download")
                    .size(theme::FONT_HEADING)
                    .color(theme::TEXT_PRIMARY)
                    .strong(),
            );
            ui.add_space(theme::SPACING_SM);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Format").color(theme::TEXT_MUTED));
                for format in OutputFormat::ALL {
                    ui.radio_value(&mut self.output_format, format, format.as_str());
                }
            });
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Quality").color(theme::TEXT_MUTED));
                ui.add(egui::Slider::new(&mut self.quality, 1..=100));
            });
            ui.add_space(theme::SPACING_SM);
            ui.horizontal(|ui| {
                let downloading = matches!(self.download_status, Some(DownloadStatus::Downloading(..)));
                let label = format!("{}  Download Image", egui_phosphor::regular::DOWNLOAD_SIMPLE);
                if ui.add_enabled(!downloading, theme::button_accent(label)).clicked() {
                    self.download_displayed(ctx);
                }
                if matches!(self.download_status, Some(DownloadStatus::Complete(_))) {
                    let label = format!("{}  Open Folder", egui_phosphor::regular::FOLDER_OPEN);
                    if ui.add(theme::button(label)).clicked() {
                        self.open_download_folder();
                    }
                }
            });
            self.render_download_status(ui);
        });
    }

    fn render_download_status(&self, ui: &mut egui::Ui) {
        match &self.download_status {
            Some(DownloadStatus::Downloading(done, total)) => {
                let (progress, text) = if *total > 0 {
                    let p = *done as f32 / *total as f32;
                    (p, format!("{} / {}", format_bytes(*done), format_bytes(*total)))
                } else {
                    (0.0, format_bytes(*done))
                };
                ui.add(
                    egui::ProgressBar::new(progress)
                        .text(text)
                        .corner_radius(3.0)
                        .fill(theme::ACCENT)
                        .animate(*total == 0),
                );
            }
            Some(DownloadStatus::Complete(dest)) => {
                ui.label(
                    egui::RichText::new(format!("Saved to {}", dest.display()))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_MUTED),
                );
            }
            Some(DownloadStatus::Failed(message)) => {
                ui.label(
                    egui::RichText::new(message)
                        .size(theme::FONT_SMALL)
                        .color(theme::NOTIFY_ERROR),
                );
            }
            None => {}
        }
    }

    // ========================================================================
    // OVERLAYS
    // ========================================================================

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(360.0);
                ui.label(egui::RichText::new("Settings").size(theme::FONT_HEADING).strong());
                ui.add_space(theme::SPACING_MD);

                ui.label(egui::RichText::new("Server URL").color(theme::TEXT_MUTED));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.server_url_str)
                        .desired_width(f32::INFINITY),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.apply_server_url();
                }

                ui.add_space(theme::SPACING_MD);
                ui.label(egui::RichText::new("Download folder").color(theme::TEXT_MUTED));
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.download_path_str)
                            .desired_width(260.0),
                    );
                    if ui.add(theme::button(egui_phosphor::regular::FOLDER_OPEN)).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(&self.download_path)
                            .pick_folder()
                        {
                            self.download_path_str = path.to_string_lossy().to_string();
                        }
                    }
                });

                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    if ui.add(theme::button_accent("Save")).clicked() && self.apply_server_url() {
                        self.download_path = std::path::PathBuf::from(&self.download_path_str);
                        self.save_settings();
                        self.show_settings = false;
                    }
                    if ui.add(theme::button("Close")).clicked() {
                        self.show_settings = false;
                    }
                });
            });
        if modal.should_close() {
            self.show_settings = false;
        }
    }

    fn render_notification(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let Some(notification) = self.notifier.current(now).cloned() else {
            return;
        };

        let slide = notification.slide_progress(now);
        let offset_x = slide * (theme::NOTIFICATION_MAX_WIDTH + theme::NOTIFICATION_MARGIN);
        let opacity = 1.0 - slide;
        let response = egui::Area::new(egui::Id::new("notification"))
            .order(egui::Order::Foreground)
            .anchor(
                egui::Align2::RIGHT_TOP,
                egui::vec2(-theme::NOTIFICATION_MARGIN + offset_x, theme::NOTIFICATION_MARGIN),
            )
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme::with_opacity(theme::notification_color(notification.kind), opacity))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::symmetric(25, 15))
                    .shadow(egui::epaint::Shadow {
                        offset: [0, 5],
                        blur: 15,
                        spread: 0,
                        color: egui::Color32::from_black_alpha((50.0 * opacity) as u8),
                    })
                    .show(ui, |ui| {
                        ui.set_max_width(theme::NOTIFICATION_MAX_WIDTH);
                        ui.horizontal(|ui| {
                            let color = theme::with_opacity(theme::TEXT_PRIMARY, opacity);
                            ui.label(egui::RichText::new(notification.kind.icon()).size(18.0).color(color));
                            ui.add(
                                egui::Label::new(egui::RichText::new(&notification.message).color(color))
                                    .wrap(),
                            );
                        });
                    });
            });

        // Pause timer while hovering, click to dismiss
        if response.response.hovered() {
            self.notifier.hold(now);
        }
        if response.response.clicked() {
            self.notifier.dismiss();
        }
        ctx.request_repaint();
    }

    fn render_splash(&mut self, ctx: &egui::Context) {
        let opacity = self.splash_opacity();
        if opacity <= 0.0 {
            return;
        }
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("splash"))
            .order(egui::Order::Tooltip)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
                let painter = ui.painter();
                painter.rect_filled(rect, 0.0, theme::with_opacity(theme::BG_BASE, opacity));
                painter.text(
                    rect.center() - egui::vec2(0.0, 24.0),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::IMAGE,
                    egui::FontId::proportional(64.0),
                    theme::with_opacity(theme::ACCENT_LIGHT, opacity),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 36.0),
                    egui::Align2::CENTER_CENTER,
                    APP_NAME,
                    egui::FontId::proportional(theme::FONT_HERO),
                    theme::with_opacity(theme::TEXT_PRIMARY, opacity),
                );
            });
        ctx.request_repaint();
    }
}
