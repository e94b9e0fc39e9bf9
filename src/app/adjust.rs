//! HSV adjustment and color enhancement requests

use super::{App, TaskEvent};
use crate::error::{ClientError, Result};
use crate::types::{Conversion, ConvertResponse};
use eframe::egui;
use tracing::{info, warn};

/// Which button started a `/convert` request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConversionAction {
    Adjust,
    Enhance,
}

impl ConversionAction {
    fn pending_message(self) -> &'static str {
        match self {
            ConversionAction::Adjust => "Applying adjustments...",
            ConversionAction::Enhance => "Applying enhancement...",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            ConversionAction::Adjust => "Adjustments applied successfully!",
            ConversionAction::Enhance => "Enhancement applied successfully!",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            ConversionAction::Adjust => "Error applying adjustments.",
            ConversionAction::Enhance => "Error applying enhancement.",
        }
    }
}

impl App {
    pub fn apply_adjustments(&mut self, ctx: &egui::Context) {
        let conversion = Conversion::hsv_from_percent(self.hue, self.saturation, self.brightness);
        self.request_conversion(ctx, ConversionAction::Adjust, conversion);
    }

    pub fn apply_enhance(&mut self, ctx: &egui::Context) {
        let conversion = Conversion::enhance_from_percent(self.enhance);
        self.request_conversion(ctx, ConversionAction::Enhance, conversion);
    }

    pub fn reset_adjustments(&mut self) {
        self.hue = 100;
        self.saturation = 100;
        self.brightness = 100;
        self.enhance = 100;
    }

    fn request_conversion(
        &mut self,
        ctx: &egui::Context,
        action: ConversionAction,
        conversion: Conversion,
    ) {
        if !self.session.has_images() {
            self.notifier.error(ClientError::NoSession.to_string());
            return;
        }

        self.notifier.info(action.pending_message());
        let api = self.api.clone();
        let filename = self.session.filename().to_string();
        info!(?action, %filename, ?conversion, "Requesting conversion");
        self.spawn_task(ctx, async move {
            let result = api.convert(&filename, conversion).await;
            TaskEvent::ConversionFinished { action, result }
        });
    }

    pub(crate) fn on_conversion_finished(
        &mut self,
        action: ConversionAction,
        result: Result<ConvertResponse>,
    ) {
        match result {
            Ok(response) => {
                info!(?action, converted = %response.converted, "Conversion done");
                self.session.show_converted(response.converted);
                self.notifier.success(action.success_message());
            }
            Err(e) => {
                warn!(?action, error = %e, "Conversion failed");
                self.notifier.error(e.user_message(action.failure_message()));
            }
        }
    }
}
