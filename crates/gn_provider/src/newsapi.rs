use async_trait::async_trait;
use chrono::Utc;
use gn_core::{normalize_article, ApiKey, Error, NewsPage, NewsProvider, NewsQuery, RawArticle, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::{error, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

/// The upstream call for a [`NewsQuery`], without the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// Client for the newsapi.org v2 API.
pub struct NewsApiClient {
    client: Client,
    api_key: Option<ApiKey>,
    base_url: String,
    country: String,
    language: String,
}

impl NewsApiClient {
    /// A client without a key still constructs; every fetch then fails
    /// with [`Error::MissingApiKey`].
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches go to `everything` whatever the category; headlines are
    /// filtered by category unless it is `all`.
    pub fn build_request(&self, query: &NewsQuery) -> UpstreamRequest {
        let mut params = vec![
            ("language", self.language.clone()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("page", query.page.to_string()),
        ];

        let endpoint = match query.search_term() {
            Some(term) => {
                params.push(("q", term.to_string()));
                Endpoint::Everything
            }
            None => {
                params.push(("country", self.country.clone()));
                if let Some(category) = query.category_filter() {
                    params.push(("category", category.as_str().to_string()));
                }
                Endpoint::TopHeadlines
            }
        };

        UpstreamRequest { endpoint, params }
    }

    fn request_url(&self, request: &UpstreamRequest, api_key: &str) -> Result<Url> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.endpoint.path()
        );
        let params = request
            .params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .chain(std::iter::once(("apiKey", api_key)));

        Url::parse_with_params(&endpoint, params)
            .map_err(|e| Error::Config(format!("upstream base URL {}: {}", endpoint, e)))
    }

    /// The request URL as it may appear in logs.
    fn loggable_url(&self, request: &UpstreamRequest) -> Result<Url> {
        self.request_url(request, "HIDDEN")
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            error!("News API key is missing");
            Error::MissingApiKey
        })?;

        let request = self.build_request(query);
        info!("Fetching news from: {}", self.loggable_url(&request)?);

        let response = self
            .client
            .get(self.request_url(&request, api_key.expose())?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "API error");
            if status == StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication);
            }
            return Err(Error::Upstream { status: status.as_u16() });
        }

        let data = response.json::<UpstreamResponse>().await?;
        let category = query.effective_category();
        let now = Utc::now();

        Ok(NewsPage {
            articles: data
                .articles
                .into_iter()
                .map(|raw| normalize_article(raw, category, now))
                .collect(),
            total_results: data.total_results,
        })
    }
}
