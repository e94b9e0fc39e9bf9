//! Centralized theme constants for Image Studio
//! Colors, sizes and frame helpers used by the panels in main.rs

use crate::types::NotificationKind;
use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x0f, 0x0c, 0x1d);
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x1a, 0x16, 0x2e);
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x26, 0x21, 0x40);
pub const BG_DROP_TARGET: Color32 = Color32::from_rgb(0x2b, 0x22, 0x52);

// =============================================================================
// COLORS - Accent (Violet)
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0x8b, 0x5c, 0xf6); // violet-500
pub const ACCENT_LIGHT: Color32 = Color32::from_rgb(0xc4, 0xb5, 0xfd); // violet-300
pub const ACCENT_DARK: Color32 = Color32::from_rgb(0x4c, 0x1d, 0x95); // violet-900

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa);
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x2e, 0x28, 0x4a);
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x45, 0x3d, 0x6b);

// =============================================================================
// COLORS - Notifications (toast background per kind)
// =============================================================================
pub const NOTIFY_SUCCESS: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);
pub const NOTIFY_ERROR: Color32 = Color32::from_rgb(0xf4, 0x43, 0x36);
pub const NOTIFY_INFO: Color32 = Color32::from_rgb(0x21, 0x96, 0xf3);
pub const NOTIFY_WARNING: Color32 = Color32::from_rgb(0xff, 0x98, 0x00);

pub fn notification_color(kind: NotificationKind) -> Color32 {
    match kind {
        NotificationKind::Success => NOTIFY_SUCCESS,
        NotificationKind::Error => NOTIFY_ERROR,
        NotificationKind::Info => NOTIFY_INFO,
        NotificationKind::Warning => NOTIFY_WARNING,
    }
}

// =============================================================================
// COLORS - Buttons
// =============================================================================
pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0x33, 0x2d, 0x52);
pub const BTN_ACCENT: Color32 = ACCENT;

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_HERO: f32 = 28.0;
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_HEADING: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_SMALL: f32 = 12.0;

// =============================================================================
// DIMENSIONS
// =============================================================================
pub const UPLOAD_AREA_HEIGHT: f32 = 180.0;
pub const RESULT_IMAGE_MAX_HEIGHT: f32 = 420.0;
pub const NOTIFICATION_MAX_WIDTH: f32 = 400.0;
pub const NOTIFICATION_MARGIN: f32 = 20.0;
pub const BUTTON_HEIGHT: f32 = 28.0;

pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 10.0;
pub const STROKE_DEFAULT: f32 = 1.0;
pub const STROKE_DASHED: f32 = 2.0;

// =============================================================================
// SPACING
// =============================================================================
pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    let widget = |bg_fill: Color32, weak_bg_fill: Color32, fg: Color32| egui::style::WidgetVisuals {
        bg_fill,
        weak_bg_fill,
        bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
        fg_stroke: egui::Stroke::new(STROKE_DEFAULT, fg),
        corner_radius: RADIUS_DEFAULT.into(),
        expansion: 0.0,
    };

    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: BG_ELEVATED,
        extreme_bg_color: BG_BASE,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT_LIGHT,
        selection: egui::style::Selection {
            bg_fill: ACCENT_DARK,
            stroke: egui::Stroke::new(STROKE_DEFAULT, ACCENT_LIGHT),
        },
        widgets: egui::style::Widgets {
            noninteractive: widget(BG_ELEVATED, BG_SURFACE, TEXT_PRIMARY),
            inactive: widget(BTN_DEFAULT, BTN_DEFAULT, TEXT_SECONDARY),
            hovered: widget(BG_SURFACE, lighten(BTN_DEFAULT, 0.1), TEXT_PRIMARY),
            active: widget(ACCENT_DARK, ACCENT_DARK, TEXT_PRIMARY),
            open: widget(BG_SURFACE, BG_ELEVATED, TEXT_PRIMARY),
        },
        slider_trailing_fill: true,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_corner_radius: egui::CornerRadius::same(8),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.slider_width = 220.0;
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_XL as i8))
}

pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(20))
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default button
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(text.into())
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
        .min_size(egui::vec2(0.0, BUTTON_HEIGHT))
}

/// Accent button for primary actions (Apply, Download)
pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY).strong())
        .fill(BTN_ACCENT)
        .corner_radius(RADIUS_DEFAULT)
        .min_size(egui::vec2(0.0, BUTTON_HEIGHT))
}

pub fn lighten(c: Color32, amount: f32) -> Color32 {
    let r = (c.r() as f32 + (255.0 - c.r() as f32) * amount) as u8;
    let g = (c.g() as f32 + (255.0 - c.g() as f32) * amount) as u8;
    let b = (c.b() as f32 + (255.0 - c.b() as f32) * amount) as u8;
    Color32::from_rgb(r, g, b)
}

/// Same color with alpha scaled by `opacity` (0.0..=1.0)
pub fn with_opacity(c: Color32, opacity: f32) -> Color32 {
    let a = (c.a() as f32 * opacity.clamp(0.0, 1.0)) as u8;
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), a)
}
