//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Image Studio";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Path prefix under which the server publishes every generated image
pub const IMAGE_PATH_PREFIX: &str = "/static/images/";

/// MIME types the server knows how to process
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

/// Matches the server's MAX_CONTENT_LENGTH
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const NOTIFICATION_VISIBLE_SECS: f32 = 5.0;
pub const NOTIFICATION_SLIDE_SECS: f32 = 0.3;

pub const SPLASH_VISIBLE_SECS: f32 = 2.5;
pub const SPLASH_FADE_SECS: f32 = 0.5;

pub const DEFAULT_QUALITY: u8 = 95;
