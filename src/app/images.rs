//! Result image loading

use super::{App, TaskEvent};
use crate::error::{ClientError, Result};
use crate::utils::decode_color_image;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Textures keyed by server URL. `None` marks a fetch that failed.
#[derive(Debug)]
pub(crate) struct TextureCache<T> {
    entries: HashMap<String, Option<T>>,
    loading: HashSet<String>,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self { entries: HashMap::new(), loading: HashSet::new() }
    }
}

impl<T: Clone> TextureCache<T> {
    pub fn get(&self, url: &str) -> Option<Option<T>> {
        self.entries.get(url).cloned()
    }

    /// Mark `url` as in flight. False if it already is.
    pub fn begin(&mut self, url: &str) -> bool {
        self.loading.insert(url.to_string())
    }

    pub fn is_loading(&self, url: &str) -> bool {
        self.loading.contains(url)
    }

    /// Store a finished fetch. Results nobody is waiting for any more
    /// (the cache was cleared meanwhile) are dropped.
    pub fn finish(&mut self, url: String, texture: Option<T>) -> bool {
        if !self.loading.remove(&url) {
            return false;
        }
        self.entries.insert(url, texture);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.loading.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl App {
    /// Texture for a server image URL. Starts a fetch on first request and
    /// returns `None` until it lands (or for good, if it failed).
    pub fn image_texture(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.get(url) {
            return cached;
        }
        if self.textures.begin(url) {
            debug!(%url, "Fetching image");
            let api = self.api.clone();
            let url = url.to_string();
            self.spawn_task(ctx, async move {
                let result = match api.fetch_image(&url).await {
                    Ok(bytes) => decode_color_image(&bytes).map_err(|e| ClientError::Decode(e.to_string())),
                    Err(e) => Err(e),
                };
                TaskEvent::ImageFetched { url, result }
            });
        }
        None
    }

    pub fn is_image_loading(&self, url: &str) -> bool {
        self.textures.is_loading(url)
    }

    pub(crate) fn on_image_fetched(
        &mut self,
        ctx: &egui::Context,
        url: String,
        result: Result<egui::ColorImage>,
    ) {
        if !self.textures.is_loading(&url) {
            debug!(%url, "Dropping stale image");
            return;
        }
        let texture = match result {
            Ok(image) => Some(ctx.load_texture(url.clone(), image, egui::TextureOptions::LINEAR)),
            Err(e) => {
                warn!(%url, error = %e, "Failed to load image");
                None
            }
        };
        self.textures.finish(url, texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_lifecycle() {
        let mut cache: TextureCache<u32> = TextureCache::default();
        assert_eq!(cache.get("/static/images/a.png"), None);
        assert!(cache.begin("/static/images/a.png"));
        assert!(!cache.begin("/static/images/a.png"));
        assert!(cache.is_loading("/static/images/a.png"));

        assert!(cache.finish("/static/images/a.png".to_string(), Some(7)));
        assert!(!cache.is_loading("/static/images/a.png"));
        assert_eq!(cache.get("/static/images/a.png"), Some(Some(7)));
    }

    #[test]
    fn test_failed_fetch_is_remembered() {
        let mut cache: TextureCache<u32> = TextureCache::default();
        cache.begin("/static/images/gone.png");
        cache.finish("/static/images/gone.png".to_string(), None);
        assert_eq!(cache.get("/static/images/gone.png"), Some(None));
        assert!(!cache.is_loading("/static/images/gone.png"));
    }

    #[test]
    fn test_clear_drops_entries_and_late_results() {
        let mut cache: TextureCache<u32> = TextureCache::default();
        for (i, url) in ["/static/images/a.png", "/static/images/celeba_a.png"].iter().enumerate() {
            cache.begin(url);
            cache.finish(url.to_string(), Some(i as u32));
        }
        cache.begin("/static/images/paprika_a.png");
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(!cache.finish("/static/images/paprika_a.png".to_string(), Some(9)));
        assert_eq!(cache.get("/static/images/paprika_a.png"), None);
    }
}
