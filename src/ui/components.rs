//! Reusable UI components
//!
//! Standalone widgets shared by the tool panels in main.rs.

use crate::theme;
use eframe::egui;

/// Toggle-style button that stays highlighted while `active`
pub fn option_button(ui: &mut egui::Ui, active: bool, label: &str) -> egui::Response {
    let (fill, text_color) = if active {
        (theme::ACCENT, theme::TEXT_PRIMARY)
    } else {
        (theme::BTN_DEFAULT, theme::TEXT_SECONDARY)
    };
    let button = egui::Button::new(egui::RichText::new(label).color(text_color))
        .fill(fill)
        .corner_radius(theme::RADIUS_DEFAULT)
        .min_size(egui::vec2(0.0, theme::BUTTON_HEIGHT));
    let response = ui.add(button);
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Labeled slider showing its value as `<n>%`
pub fn percent_slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut u32,
    range: std::ops::RangeInclusive<u32>,
) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [90.0, 20.0],
            egui::Label::new(egui::RichText::new(label).color(theme::TEXT_MUTED)),
        );
        ui.add(egui::Slider::new(value, range).show_value(false));
        ui.label(egui::RichText::new(format!("{}%", value)).color(theme::TEXT_PRIMARY));
    });
}

/// Dashed drop zone. Clicking it opens the file picker.
pub fn drop_zone(ui: &mut egui::Ui, hovering: bool) -> egui::Response {
    let size = egui::vec2(ui.available_width(), theme::UPLOAD_AREA_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let fill = if hovering || response.hovered() {
            theme::BG_DROP_TARGET
        } else {
            theme::BG_ELEVATED
        };
        painter.rect_filled(rect, theme::RADIUS_LARGE, fill);

        let stroke_color = if hovering { theme::ACCENT_LIGHT } else { theme::BORDER_DEFAULT };
        let corners = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(
            &corners,
            egui::Stroke::new(theme::STROKE_DASHED, stroke_color),
            8.0,
            6.0,
        ));

        let center = rect.center();
        painter.text(
            center - egui::vec2(0.0, 28.0),
            egui::Align2::CENTER_CENTER,
            egui_phosphor::regular::CLOUD_ARROW_UP,
            egui::FontId::proportional(40.0),
            theme::ACCENT_LIGHT,
        );
        painter.text(
            center + egui::vec2(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            "Drop an image here or click to browse",
            egui::FontId::proportional(theme::FONT_HEADING),
            theme::TEXT_PRIMARY,
        );
        painter.text(
            center + egui::vec2(0.0, 38.0),
            egui::Align2::CENTER_CENTER,
            "JPG, PNG, BMP, TIFF or WEBP",
            egui::FontId::proportional(theme::FONT_SMALL),
            theme::TEXT_DIM,
        );
    }
    response
}

/// Titled image card; shows a placeholder while the texture is missing
pub fn image_card(
    ui: &mut egui::Ui,
    title: &str,
    texture: Option<&egui::TextureHandle>,
    loading: bool,
) {
    theme::card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(
            egui::RichText::new(title)
                .size(theme::FONT_HEADING)
                .color(theme::TEXT_PRIMARY)
                .strong(),
        );
        ui.add_space(theme::SPACING_MD);
        match texture {
            Some(tex) => {
                let max = egui::vec2(ui.available_width(), theme::RESULT_IMAGE_MAX_HEIGHT);
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(tex))
                        .max_size(max)
                        .maintain_aspect_ratio(true)
                        .corner_radius(theme::RADIUS_DEFAULT),
                );
            }
            None => {
                ui.allocate_ui(egui::vec2(ui.available_width(), 160.0), |ui| {
                    ui.centered_and_justified(|ui| {
                        if loading {
                            ui.spinner();
                        } else {
                            ui.label(egui::RichText::new("Image not available").color(theme::TEXT_DIM));
                        }
                    });
                });
            }
        }
    });
}
