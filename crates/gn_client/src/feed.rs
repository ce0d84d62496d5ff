use gn_core::{Article, NewsCategory, NewsQuery};
use std::sync::Arc;
use tracing::warn;

use crate::api::NewsApi;
use crate::view::{FeedView, ViewConfig};

/// Everything the homepage feed renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    /// `None` browses all categories.
    pub category: Option<NewsCategory>,
    /// An empty string means category browsing.
    pub search_query: String,
    pub page: u32,
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_api_key_error: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            category: None,
            search_query: String::new(),
            page: 1,
            articles: Vec::new(),
            total_results: 0,
            is_loading: false,
            error: None,
            is_api_key_error: false,
        }
    }
}

impl FeedState {
    pub fn has_more(&self) -> bool {
        (self.articles.len() as u64) < self.total_results
    }

    pub fn can_load_more(&self) -> bool {
        !self.is_loading && self.has_more()
    }

    /// The proxy request for the current filter and page.
    pub fn query(&self) -> NewsQuery {
        if self.search_query.is_empty() {
            NewsQuery::headlines(self.category, self.page)
        } else {
            NewsQuery {
                category: self.category,
                query: Some(self.search_query.clone()),
                page: self.page,
            }
        }
    }
}

/// Owns the feed state and is the only thing that changes it.
///
/// Every operation that fetches takes `&mut self`, so one controller never
/// has two requests in flight. Share a controller between tasks through a
/// `tokio::sync::Mutex`.
pub struct FeedController {
    api: Arc<dyn NewsApi>,
    state: FeedState,
}

impl FeedController {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self {
            api,
            state: FeedState::default(),
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn view(&self, config: ViewConfig) -> FeedView<'_> {
        FeedView::from_state(&self.state, config)
    }

    /// Loads the first page for the current filter.
    pub async fn refresh(&mut self) {
        self.reset_and_fetch().await;
    }

    /// Switches category. `all` is the same as no category.
    pub async fn set_category(&mut self, category: Option<NewsCategory>) {
        self.state.category = category.and_then(NewsCategory::filter);
        self.reset_and_fetch().await;
    }

    /// Starts a new search; an empty query returns to category browsing.
    pub async fn search(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into().trim().to_string();
        self.reset_and_fetch().await;
    }

    /// Appends the next page. Returns `false` without fetching when a fetch
    /// is already pending or everything has been loaded.
    pub async fn load_more(&mut self) -> bool {
        if !self.state.can_load_more() {
            return false;
        }
        self.state.page += 1;
        self.fetch().await;
        true
    }

    async fn reset_and_fetch(&mut self) {
        self.state.page = 1;
        self.state.articles.clear();
        self.state.total_results = 0;
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
        self.state.is_api_key_error = false;

        let query = self.state.query();
        let result = self.api.fetch_news(&query).await;
        self.state.is_loading = false;

        match result {
            Ok(page) => {
                if query.page == 1 {
                    self.state.articles = page.articles;
                } else {
                    self.state.articles.extend(page.articles);
                }
                self.state.total_results = page.total_results;
            }
            Err(e) => {
                warn!(page = query.page, error = %e, "Error loading news");
                self.state.is_api_key_error = e.is_api_key_error();
                self.state.error = Some(e.to_string());
                if query.page > 1 {
                    self.state.page = query.page - 1;
                }
            }
        }
    }
}
