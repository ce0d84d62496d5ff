use async_trait::async_trait;

use crate::types::{NewsPage, NewsQuery};
use crate::Result;

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Returns the name of the upstream provider
    fn name(&self) -> &str;

    /// Fetches one page of normalized articles for the given query
    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage>;
}
