use gn_core::{Article, NewsCategory, NewsQuery};
use std::sync::Arc;
use tracing::warn;

use crate::api::{DetailQuery, NewsApi};

pub const RELATED_LIMIT: usize = 4;

const NOT_FOUND: &str = "Article not found";
const LOAD_FAILED: &str = "Failed to load article. Please try again later.";

/// What the article page was opened with. `source` is the article's
/// canonical URL; `slug` is the path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleParams {
    pub slug: String,
    pub source: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub source_name: Option<String>,
    pub category: Option<String>,
}

impl ArticleParams {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.slug.replace('-', " "))
    }

    fn detail_query(&self, url: &str) -> DetailQuery {
        DetailQuery {
            url: url.to_string(),
            title: self.display_title(),
            image: self.image.clone().unwrap_or_default(),
            author: self.author.clone().unwrap_or_default(),
            published_at: self.published_at.clone().unwrap_or_default(),
            source: self.source_name.clone().unwrap_or_default(),
            category: self
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| NewsCategory::General.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleViewState {
    Loading,
    NotFound { message: String },
    Loaded { article: Article, related: Vec<Article> },
}

/// Up to [`RELATED_LIMIT`] articles other than `current_url`, in upstream order.
pub fn select_related(articles: Vec<Article>, current_url: &str) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| article.url != current_url)
        .take(RELATED_LIMIT)
        .collect()
}

pub struct ArticleViewController {
    api: Arc<dyn NewsApi>,
    state: ArticleViewState,
}

impl ArticleViewController {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self {
            api,
            state: ArticleViewState::Loading,
        }
    }

    pub fn state(&self) -> &ArticleViewState {
        &self.state
    }

    /// Loads the article, then its related articles. A failure to load
    /// related articles leaves the article itself on screen.
    pub async fn open(&mut self, params: &ArticleParams) -> &ArticleViewState {
        let source_url = match params.source.as_deref().filter(|s| !s.is_empty()) {
            Some(url) => url.to_string(),
            None => {
                self.state = ArticleViewState::NotFound {
                    message: NOT_FOUND.to_string(),
                };
                return &self.state;
            }
        };

        self.state = ArticleViewState::Loading;

        let article = match self.api.fetch_article(&params.detail_query(&source_url)).await {
            Ok(article) => article,
            Err(e) => {
                warn!(url = %source_url, error = %e, "Failed to fetch article");
                self.state = ArticleViewState::NotFound {
                    message: LOAD_FAILED.to_string(),
                };
                return &self.state;
            }
        };

        let related = match self
            .api
            .fetch_news(&NewsQuery::headlines(Some(article.category), 1))
            .await
        {
            Ok(page) => select_related(page.articles, &source_url),
            Err(e) => {
                warn!(category = %article.category, error = %e, "Failed to fetch related articles");
                Vec::new()
            }
        };

        self.state = ArticleViewState::Loaded { article, related };
        &self.state
    }
}
