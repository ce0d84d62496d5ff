pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod types;

pub use config::ApiKey;
pub use error::{Error, Result};
pub use normalize::normalize_article;
pub use provider::NewsProvider;
pub use types::{Article, ArticleSource, ErrorPayload, NewsCategory, NewsPage, NewsQuery, RawArticle, RawSource};

pub mod prelude {
    pub use super::{Article, Error, NewsCategory, NewsPage, NewsProvider, NewsQuery, Result};
}
