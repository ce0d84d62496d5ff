pub mod cache;
pub mod detail;
pub mod extract;
pub mod newsapi;

pub use cache::CachedProvider;
pub use detail::{ArticleDetailService, DetailRequest};
pub use extract::ContentExtractor;
pub use newsapi::NewsApiClient;

pub mod prelude {
    pub use super::{ArticleDetailService, CachedProvider, ContentExtractor, DetailRequest, NewsApiClient};
    pub use gn_core::{Article, Error, NewsProvider, NewsQuery, Result};
}
