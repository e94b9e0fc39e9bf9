//! Session record for one uploaded image and the display state derived from it

use crate::constants::IMAGE_PATH_PREFIX;
use crate::error::{ClientError, Result};
use crate::types::{ColorMode, Model, OutputFormat, Tool, UploadResponse};

/// What the result pane currently shows
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayedImage {
    pub url: String,
    pub title: String,
}

/// Tool/model/mode selection. Survives uploads, like the active buttons do.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Selection {
    pub tool: Tool,
    pub model: Model,
    pub color_mode: Option<ColorMode>,
}

#[derive(Debug, Default)]
pub struct Session {
    pub selection: Selection,
    images: Option<UploadResponse>,
    filename: String,
    displayed: Option<DisplayedImage>,
}

impl Session {
    pub fn new(model: Model) -> Self {
        Self {
            selection: Selection { model, ..Selection::default() },
            ..Self::default()
        }
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }

    pub fn images(&self) -> Option<&UploadResponse> {
        self.images.as_ref()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn displayed(&self) -> Option<&DisplayedImage> {
        self.displayed.as_ref()
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.images.as_ref().and_then(|i| i.text.as_deref())
    }

    /// Replace the record with a fresh server response
    pub fn load(&mut self, response: UploadResponse) {
        self.filename = response.filename().to_string();
        self.images = Some(response);
        self.refresh_display();
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.selection.tool = tool;
        self.refresh_display();
    }

    pub fn select_model(&mut self, model: Model) {
        self.selection.model = model;
        self.refresh_display();
    }

    pub fn select_color_mode(&mut self, mode: ColorMode) {
        self.selection.color_mode = Some(mode);
        self.refresh_display();
    }

    /// Show a server-converted image in place of the resolved variant
    pub fn show_converted(&mut self, url: String) {
        let title = self
            .displayed
            .as_ref()
            .map(|d| d.title.clone())
            .unwrap_or_else(|| "Adjusted Image".to_string());
        self.displayed = Some(DisplayedImage { url, title });
    }

    fn refresh_display(&mut self) {
        self.displayed = self
            .images
            .as_ref()
            .map(|images| resolve_display(images, &self.selection));
    }

    /// `/download/<path>?format=<FMT>&quality=<Q>` for the displayed image
    pub fn download_url(&self, format: OutputFormat, quality: u8) -> Result<String> {
        let displayed = self.displayed.as_ref().ok_or(ClientError::NoImageToDownload)?;
        download_url(&displayed.url, format, quality)
    }
}

/// Pick the variant URL and pane title for a selection, falling back to `original`
pub fn resolve_display(images: &UploadResponse, selection: &Selection) -> DisplayedImage {
    let original = images.original.as_str();
    let (url, title) = match selection.tool {
        Tool::Anime => (
            images.variant(selection.model.key()).unwrap_or(original),
            format!("{} Style", selection.model.display_name()),
        ),
        Tool::Color => match selection.color_mode {
            Some(mode) => (
                images.converted(mode.key()).unwrap_or(original),
                format!("{} Mode", mode.title_case()),
            ),
            None => (original, "Original Image".to_string()),
        },
        Tool::Adjust => (original, "Adjusted Image".to_string()),
        Tool::Ocr => (original, "Original Image".to_string()),
    };
    DisplayedImage { url: url.to_string(), title }
}

/// Build the download URL from an image URL. Only images published under
/// `/static/images/` can be downloaded.
pub fn download_url(image_url: &str, format: OutputFormat, quality: u8) -> Result<String> {
    let path = image_url
        .split_once(IMAGE_PATH_PREFIX)
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
        .ok_or(ClientError::NoImageToDownload)?;
    Ok(format!(
        "/download/{}?format={}&quality={}",
        path,
        format.as_str(),
        quality
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(models: &[&str], modes: &[&str]) -> UploadResponse {
        let mut resp = UploadResponse {
            original: "/static/images/abc.png".into(),
            text: Some("Hello".into()),
            ..Default::default()
        };
        for m in models {
            resp.variants.insert(
                m.to_string(),
                serde_json::Value::String(format!("/static/images/{m}_abc.png")),
            );
        }
        for m in modes {
            resp.converted.insert(m.to_string(), format!("/static/images/{m}_abc.png"));
        }
        resp
    }

    #[test]
    fn test_empty_session_shows_nothing() {
        let session = Session::new(Model::Celeba);
        assert!(session.displayed().is_none());
        assert!(matches!(
            session.download_url(OutputFormat::Png, 90),
            Err(ClientError::NoImageToDownload)
        ));
    }

    #[test]
    fn test_load_shows_selected_model() {
        let mut session = Session::new(Model::Celeba);
        session.load(response(&["celeba", "facev1"], &[]));

        assert_eq!(session.filename(), "abc.png");
        let shown = session.displayed().unwrap();
        assert_eq!(shown.url, "/static/images/celeba_abc.png");
        assert_eq!(shown.title, "CelebA Style");

        session.select_model(Model::Facev1);
        assert_eq!(session.displayed().unwrap().url, "/static/images/facev1_abc.png");
        assert_eq!(session.displayed().unwrap().title, "Face V1 Style");
    }

    #[test]
    fn test_missing_model_falls_back_to_original() {
        let mut session = Session::new(Model::Paprika);
        session.load(response(&["celeba"], &[]));
        assert_eq!(session.displayed().unwrap().url, "/static/images/abc.png");
        assert_eq!(session.displayed().unwrap().title, "Paprika Style");
    }

    #[test]
    fn test_color_modes() {
        let mut session = Session::new(Model::Celeba);
        session.load(response(&[], &["grayscale"]));
        session.select_tool(Tool::Color);

        // No mode picked yet
        assert_eq!(session.displayed().unwrap().url, "/static/images/abc.png");
        assert_eq!(session.displayed().unwrap().title, "Original Image");

        session.select_color_mode(ColorMode::Grayscale);
        assert_eq!(session.displayed().unwrap().url, "/static/images/grayscale_abc.png");
        assert_eq!(session.displayed().unwrap().title, "Grayscale Mode");

        session.select_color_mode(ColorMode::Sepia);
        assert_eq!(session.displayed().unwrap().url, "/static/images/abc.png");
        assert_eq!(session.displayed().unwrap().title, "Sepia Mode");
    }

    #[test]
    fn test_adjust_and_ocr_show_original() {
        let mut session = Session::new(Model::Celeba);
        session.load(response(&["celeba"], &[]));

        session.select_tool(Tool::Adjust);
        assert_eq!(
            session.displayed(),
            Some(&DisplayedImage {
                url: "/static/images/abc.png".into(),
                title: "Adjusted Image".into()
            })
        );

        session.select_tool(Tool::Ocr);
        assert_eq!(session.displayed().unwrap().title, "Original Image");
        assert_eq!(session.extracted_text(), Some("Hello"));
    }

    #[test]
    fn test_converted_replaces_display_until_next_switch() {
        let mut session = Session::new(Model::Celeba);
        session.load(response(&[], &[]));
        session.select_tool(Tool::Adjust);
        session.show_converted("/static/images/converted_1.jpg".into());
        assert_eq!(session.displayed().unwrap().url, "/static/images/converted_1.jpg");
        assert_eq!(session.displayed().unwrap().title, "Adjusted Image");

        session.select_tool(Tool::Adjust);
        assert_eq!(session.displayed().unwrap().url, "/static/images/abc.png");
    }

    #[test]
    fn test_selection_survives_new_upload() {
        let mut session = Session::new(Model::Celeba);
        session.select_tool(Tool::Color);
        session.select_color_mode(ColorMode::Invert);
        session.load(response(&[], &["invert"]));
        assert_eq!(session.displayed().unwrap().url, "/static/images/invert_abc.png");
    }

    #[test]
    fn test_download_url_shape() {
        let url = download_url("/static/images/celeba_abc.png", OutputFormat::Png, 80).unwrap();
        assert_eq!(url, "/download/celeba_abc.png?format=PNG&quality=80");

        let url = download_url(
            "http://127.0.0.1:5000/static/images/sub/x.jpg",
            OutputFormat::Jpeg,
            95,
        )
        .unwrap();
        assert_eq!(url, "/download/sub/x.jpg?format=JPEG&quality=95");
    }

    #[test]
    fn test_download_url_requires_image_path() {
        assert!(download_url("/elsewhere/x.png", OutputFormat::Png, 80).is_err());
        assert!(download_url("/static/images/", OutputFormat::Png, 80).is_err());
    }
}
