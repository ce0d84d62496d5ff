use async_trait::async_trait;
use gn_core::{Article, ErrorPayload, NewsPage, NewsQuery};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Parameters of the article detail route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    pub url: String,
    pub title: String,
    pub image: String,
    pub author: String,
    pub published_at: String,
    pub source: String,
    pub category: String,
}

/// The two proxy routes as seen from a client.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage>;

    async fn fetch_article(&self, query: &DetailQuery) -> Result<Article>;
}

/// [`NewsApi`] over HTTP against a running proxy.
#[derive(Debug, Clone)]
pub struct HttpNewsApi {
    client: Client,
    base_url: String,
}

impl HttpNewsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/api/{}", self.base_url, route)
    }

    async fn get_json<T, Q>(&self, route: &str, params: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.client.get(self.endpoint(route)).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<ErrorPayload>().await.ok();
            return Err(ClientError::from_payload(status.as_u16(), payload));
        }
        Ok(response.json::<T>().await?)
    }
}

/// Query pairs for `/api/news`: searches send only the term, headlines
/// send the category unless it is `all`.
pub fn news_params(query: &NewsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", query.page.to_string())];
    match query.search_term() {
        Some(term) => params.push(("query", term.to_string())),
        None => {
            if let Some(category) = query.category_filter() {
                params.push(("category", category.to_string()));
            }
        }
    }
    params
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        let params = news_params(query);
        debug!(?params, "requesting news");
        self.get_json("news", &params).await
    }

    async fn fetch_article(&self, query: &DetailQuery) -> Result<Article> {
        debug!(url = %query.url, "requesting article");
        self.get_json("article", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::NewsCategory;

    #[test]
    fn test_search_params_omit_category() {
        let query = NewsQuery {
            category: Some(NewsCategory::Business),
            query: Some("earnings".to_string()),
            page: 2,
        };
        assert_eq!(
            news_params(&query),
            vec![("page", "2".to_string()), ("query", "earnings".to_string())]
        );
    }

    #[test]
    fn test_headline_params() {
        assert_eq!(
            news_params(&NewsQuery::headlines(Some(NewsCategory::All), 1)),
            vec![("page", "1".to_string())]
        );
        assert_eq!(
            news_params(&NewsQuery::headlines(Some(NewsCategory::Health), 3)),
            vec![("page", "3".to_string()), ("category", "health".to_string())]
        );
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let api = HttpNewsApi::new("http://localhost:3000/");
        assert_eq!(api.endpoint("news"), "http://localhost:3000/api/news");
    }
}
