use gn_core::{ApiKey, NewsProvider};
use gn_provider::newsapi::DEFAULT_BASE_URL;
use gn_provider::{ArticleDetailService, CachedProvider, ContentExtractor, NewsApiClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub news: Arc<dyn NewsProvider>,
    pub details: ArticleDetailService,
}

impl AppState {
    pub fn new(news: Arc<dyn NewsProvider>, details: ArticleDetailService) -> Self {
        Self { news, details }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub api_key: Option<ApiKey>,
    pub base_url: String,
    /// Zero disables the response cache.
    pub cache_ttl: Duration,
    pub extract_content: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: gn_provider::cache::DEFAULT_TTL,
            extract_content: false,
        }
    }
}

impl ServerConfig {
    pub fn build_state(&self) -> AppState {
        let client = NewsApiClient::new(self.api_key.clone()).with_base_url(self.base_url.clone());
        let details = if self.extract_content {
            ArticleDetailService::with_extractor(ContentExtractor::new())
        } else {
            ArticleDetailService::placeholder()
        };

        AppState::new(Arc::new(CachedProvider::new(client, self.cache_ttl)), details)
    }
}
