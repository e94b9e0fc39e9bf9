//! Common types and data structures

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Tool panel, decides which variant the result pane shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Anime,
    Color,
    Adjust,
    Ocr,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Anime, Tool::Color, Tool::Adjust, Tool::Ocr];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Anime => "Anime Style",
            Tool::Color => "Color Modes",
            Tool::Adjust => "Adjustments",
            Tool::Ocr => "Extract Text",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Anime => egui_phosphor::regular::MAGIC_WAND,
            Tool::Color => egui_phosphor::regular::PALETTE,
            Tool::Adjust => egui_phosphor::regular::SLIDERS_HORIZONTAL,
            Tool::Ocr => egui_phosphor::regular::TEXT_AA,
        }
    }
}

/// Anime-style model the server renders a variant for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    #[default]
    Celeba,
    Facev1,
    Facev2,
    Paprika,
}

impl Model {
    pub const ALL: [Model; 4] = [Model::Celeba, Model::Facev1, Model::Facev2, Model::Paprika];

    /// Key of this model's variant in the upload response
    pub fn key(self) -> &'static str {
        match self {
            Model::Celeba => "celeba",
            Model::Facev1 => "facev1",
            Model::Facev2 => "facev2",
            Model::Paprika => "paprika",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Model::Celeba => "CelebA",
            Model::Facev1 => "Face V1",
            Model::Facev2 => "Face V2",
            Model::Paprika => "Paprika",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Sepia,
    Invert,
    Cmyk,
    Hsv,
    Hsl,
}

impl ColorMode {
    pub const ALL: [ColorMode; 6] = [
        ColorMode::Grayscale,
        ColorMode::Sepia,
        ColorMode::Invert,
        ColorMode::Cmyk,
        ColorMode::Hsv,
        ColorMode::Hsl,
    ];

    /// Key of this mode in the `converted` mapping
    pub fn key(self) -> &'static str {
        match self {
            ColorMode::Grayscale => "grayscale",
            ColorMode::Sepia => "sepia",
            ColorMode::Invert => "invert",
            ColorMode::Cmyk => "cmyk",
            ColorMode::Hsv => "hsv",
            ColorMode::Hsl => "hsl",
        }
    }

    /// Key with its first letter upper-cased ("grayscale" -> "Grayscale")
    pub fn title_case(self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Encoding requested from `/download`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "WEBP")]
    Webp,
    #[serde(rename = "BMP")]
    Bmp,
    #[serde(rename = "TIFF")]
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Bmp,
        OutputFormat::Tiff,
    ];

    /// Name understood by the server's encoder
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Tiff => "TIFF",
        }
    }

    pub fn extension(self) -> String {
        self.as_str().to_lowercase()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => egui_phosphor::regular::CHECK_CIRCLE,
            NotificationKind::Error => egui_phosphor::regular::WARNING_CIRCLE,
            NotificationKind::Info => egui_phosphor::regular::INFO,
            NotificationKind::Warning => egui_phosphor::regular::WARNING,
        }
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Any reply from the server: either `{error}` or the route's payload
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ServerReply<T> {
    Error { error: String },
    Ok(T),
}

/// Variant mapping returned by `POST /upload`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub original: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub converted: HashMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Per-model variants (`celeba`, `facev1`, ...) and any other top-level keys
    #[serde(flatten)]
    pub variants: HashMap<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UploadResponse {
    pub fn variant(&self, key: &str) -> Option<&str> {
        self.variants.get(key).and_then(|v| v.as_str())
    }

    pub fn converted(&self, key: &str) -> Option<&str> {
        self.converted.get(key).map(String::as_str)
    }

    /// Stored filename, the last path segment of `original`
    pub fn filename(&self) -> &str {
        self.original.rsplit('/').next().unwrap_or(&self.original)
    }
}

/// Body of `POST /convert`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConvertRequest {
    pub filename: String,
    #[serde(flatten)]
    pub conversion: Conversion,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Conversion {
    HsvAdjust { h: f32, s: f32, v: f32 },
    Enhance { factor: f32 },
}

impl Conversion {
    /// Build an HSV adjustment from slider percentages
    pub fn hsv_from_percent(hue: u32, saturation: u32, brightness: u32) -> Self {
        Conversion::HsvAdjust {
            h: hue as f32 / 100.0,
            s: saturation as f32 / 100.0,
            v: brightness as f32 / 100.0,
        }
    }

    pub fn enhance_from_percent(factor: u32) -> Self {
        Conversion::Enhance { factor: factor as f32 / 100.0 }
    }
}

/// Payload of a successful `POST /convert`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConvertResponse {
    pub converted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_with_models() {
        let json = r#"{
            "original": "/static/images/abc.png",
            "converted": {"grayscale": "/static/images/grayscale_abc.png"},
            "text": "hello",
            "celeba": "/static/images/celeba_abc.png",
            "paprika": "/static/images/paprika_abc.png"
        }"#;
        let reply: ServerReply<UploadResponse> = serde_json::from_str(json).unwrap();
        let ServerReply::Ok(resp) = reply else { panic!("expected payload") };

        assert_eq!(resp.filename(), "abc.png");
        assert_eq!(resp.variant("celeba"), Some("/static/images/celeba_abc.png"));
        assert_eq!(resp.variant("facev1"), None);
        assert_eq!(resp.converted("grayscale"), Some("/static/images/grayscale_abc.png"));
        assert_eq!(resp.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_upload_response_minimal() {
        let reply: ServerReply<UploadResponse> =
            serde_json::from_str(r#"{"original": "/static/images/x.jpg"}"#).unwrap();
        let ServerReply::Ok(resp) = reply else { panic!("expected payload") };
        assert!(resp.converted.is_empty());
        assert!(resp.text.is_none());
    }

    #[test]
    fn test_upload_response_null_fields() {
        let json = r#"{"original": "/static/images/x.jpg", "converted": null, "text": null}"#;
        let reply: ServerReply<UploadResponse> = serde_json::from_str(json).unwrap();
        let ServerReply::Ok(resp) = reply else { panic!("expected payload") };
        assert_eq!(resp.original, "/static/images/x.jpg");
        assert!(resp.converted.is_empty());
        assert_eq!(resp.converted("grayscale"), None);
    }

    #[test]
    fn test_error_reply() {
        let reply: ServerReply<UploadResponse> =
            serde_json::from_str(r#"{"error": "No file selected"}"#).unwrap();
        assert!(matches!(reply, ServerReply::Error { error } if error == "No file selected"));
    }

    #[test]
    fn test_convert_request_shape() {
        let req = ConvertRequest {
            filename: "abc.png".into(),
            conversion: Conversion::hsv_from_percent(150, 100, 50),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "filename": "abc.png",
                "type": "hsv_adjust",
                "params": {"h": 1.5, "s": 1.0, "v": 0.5}
            })
        );
    }

    #[test]
    fn test_enhance_request_shape() {
        let req = ConvertRequest {
            filename: "abc.png".into(),
            conversion: Conversion::enhance_from_percent(200),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "enhance");
        assert_eq!(value["params"]["factor"], 2.0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(ColorMode::Grayscale.title_case(), "Grayscale");
        assert_eq!(ColorMode::Cmyk.title_case(), "Cmyk");
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::Webp.as_str(), "WEBP");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
    }
}
