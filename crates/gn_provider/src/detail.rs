use chrono::{DateTime, Utc};
use gn_core::normalize::{timestamp, DEFAULT_AUTHOR, DEFAULT_DESCRIPTION};
use gn_core::{Article, ArticleSource, Error, NewsCategory, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::extract::ContentExtractor;

pub const PLACEHOLDER_CONTENT: &str = "This is a placeholder for the article content. In a real implementation, you would fetch and parse the actual content from the source.";
pub const DEFAULT_DETAIL_TITLE: &str = "Article Title";
pub const DEFAULT_DETAIL_SOURCE: &str = "News Source";
pub const DEFAULT_DETAIL_IMAGE: &str = "/placeholder.svg?height=600&width=1200&text=Article+Image";

/// Article metadata supplied by the caller. Only `url` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Builds the article record for the detail view.
///
/// Without an extractor the content is placeholder text. With one, the
/// publisher page is fetched and its text replaces the placeholder when
/// extraction succeeds.
#[derive(Debug, Clone, Default)]
pub struct ArticleDetailService {
    extractor: Option<ContentExtractor>,
}

impl ArticleDetailService {
    pub fn placeholder() -> Self {
        Self { extractor: None }
    }

    pub fn with_extractor(extractor: ContentExtractor) -> Self {
        Self {
            extractor: Some(extractor),
        }
    }

    pub fn extracts_content(&self) -> bool {
        self.extractor.is_some()
    }

    pub async fn resolve(&self, request: &DetailRequest) -> Result<Article> {
        let url = present(&request.url).ok_or(Error::MissingParameter("URL"))?;
        let mut article = placeholder_article(url, request, Utc::now());

        if let Some(extractor) = &self.extractor {
            match extractor.extract(url).await {
                Ok(extracted) => {
                    article.content = extracted.body;
                    if let Some(description) = extracted.description {
                        article.description = description;
                    }
                    if article.author == DEFAULT_AUTHOR {
                        if let Some(author) = extracted.author {
                            article.author = author;
                        }
                    }
                }
                Err(e) => warn!(url, error = %e, "Falling back to placeholder content"),
            }
        }

        Ok(article)
    }
}

/// The record returned when no real content is available.
pub fn placeholder_article(url: &str, request: &DetailRequest, now: DateTime<Utc>) -> Article {
    let category = match present(&request.category) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            debug!(category = value, "Unknown category, using general");
            NewsCategory::General
        }),
        None => NewsCategory::General,
    };

    Article {
        title: present(&request.title).unwrap_or(DEFAULT_DETAIL_TITLE).to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
        content: PLACEHOLDER_CONTENT.to_string(),
        url: url.to_string(),
        url_to_image: present(&request.image).unwrap_or(DEFAULT_DETAIL_IMAGE).to_string(),
        published_at: present(&request.published_at)
            .map(str::to_string)
            .unwrap_or_else(|| timestamp(now)),
        source: ArticleSource {
            id: None,
            name: present(&request.source).unwrap_or(DEFAULT_DETAIL_SOURCE).to_string(),
        },
        author: present(&request.author).unwrap_or(DEFAULT_AUTHOR).to_string(),
        category,
    }
}
