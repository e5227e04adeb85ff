use crate::auth::AuthService;
use crate::cache::UrlCache;
use crate::config::UrlConfig;
use crate::services::{ShortCodeGenerator, ShortenerService};
use crate::store::{UrlStore, UserStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This struct is wrapped in `Arc` and shared across all request handlers
/// via Axum's State extraction.
pub struct AppState {
    /// Short URL orchestration over the durable store and the cache
    pub shortener: ShortenerService,

    /// Durable URL store, also probed by the health check
    pub urls: Arc<dyn UrlStore>,

    /// Registered users
    pub users: Arc<dyn UserStore>,

    /// Cache shared with the shortener, also probed by the health check
    pub cache: Arc<dyn UrlCache>,

    /// JWT authentication service for token generation and validation
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(
        urls: Arc<dyn UrlStore>,
        users: Arc<dyn UserStore>,
        cache: Arc<dyn UrlCache>,
        generator: ShortCodeGenerator,
        url_config: UrlConfig,
        auth_service: AuthService,
    ) -> Self {
        let shortener = ShortenerService::new(urls.clone(), cache.clone(), generator, url_config);

        Self {
            shortener,
            urls,
            users,
            cache,
            auth_service,
        }
    }
}
