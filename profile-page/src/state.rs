//! Application-wide state owned by the iced runtime

use iced::widget::image::Handle;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::common::Route;
use crate::domains::profile::{PreviewTicket, ProfileDomain};
use crate::infra::config::Config;
use crate::infra::services::ProfileService;

/// Remote image bytes, keyed by URL, ready for the image widget
#[derive(Debug, Default)]
pub struct RemoteImageCache {
    loaded: HashMap<String, Handle>,
    in_flight: HashSet<String>,
    failed: HashSet<String>,
}

impl RemoteImageCache {
    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.loaded.get(url)
    }

    /// Mark `url` as requested; false when it's already loaded, loading, or
    /// known to fail
    pub fn begin(&mut self, url: &str) -> bool {
        if self.loaded.contains_key(url)
            || self.in_flight.contains(url)
            || self.failed.contains(url)
        {
            return false;
        }
        self.in_flight.insert(url.to_string())
    }

    pub fn finish(&mut self, url: &str, bytes: Option<Vec<u8>>) {
        self.in_flight.remove(url);
        match bytes {
            Some(bytes) => {
                self.loaded
                    .insert(url.to_string(), Handle::from_bytes(bytes));
            }
            None => {
                self.failed.insert(url.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

pub struct State {
    pub config: Config,
    pub route: Route,
    pub profile: ProfileDomain,
    pub profile_service: Arc<dyn ProfileService>,
    pub image_cache: RemoteImageCache,
    /// Rendered handles for local previews, dropped with their edit session
    pub preview_handles: HashMap<PreviewTicket, Handle>,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("server_url", &self.config.server_url)
            .field("route", &self.route)
            .field("profile", &self.profile.state.name())
            .field("cached_images", &self.image_cache.len())
            .field("preview_handles", &self.preview_handles.len())
            .finish()
    }
}

impl State {
    pub fn new(config: Config, profile_service: Arc<dyn ProfileService>) -> Self {
        Self {
            config,
            route: Route::Profile,
            profile: ProfileDomain::new(),
            profile_service,
            image_cache: RemoteImageCache::default(),
            preview_handles: HashMap::new(),
        }
    }

    /// Keep only the preview handles the current edit buffer still points at
    pub fn prune_preview_handles(&mut self) {
        let live: HashSet<PreviewTicket> = self
            .profile
            .state
            .buffer()
            .map(|buffer| buffer.tickets().collect())
            .unwrap_or_default();
        self.preview_handles.retain(|ticket, _| live.contains(ticket));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_requests_each_url_once() {
        let mut cache = RemoteImageCache::default();
        assert!(cache.begin("http://x/a.png"));
        assert!(!cache.begin("http://x/a.png"));

        cache.finish("http://x/a.png", Some(vec![1, 2, 3]));
        assert!(cache.get("http://x/a.png").is_some());
        assert!(!cache.begin("http://x/a.png"));
    }

    #[test]
    fn failed_urls_are_not_retried() {
        let mut cache = RemoteImageCache::default();
        assert!(cache.begin("http://x/missing.png"));
        cache.finish("http://x/missing.png", None);
        assert!(cache.get("http://x/missing.png").is_none());
        assert!(!cache.begin("http://x/missing.png"));
        assert!(cache.is_empty());
    }
}
