use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A news article in the shape served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub url_to_image: String,
    /// ISO-8601 timestamp, kept as received.
    pub published_at: String,
    pub source: ArticleSource,
    pub author: String,
    pub category: NewsCategory,
}

impl Article {
    pub fn published_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
    All,
}

impl NewsCategory {
    /// Navigation order.
    pub const NAVIGATION: [NewsCategory; 8] = [
        NewsCategory::All,
        NewsCategory::General,
        NewsCategory::Business,
        NewsCategory::Technology,
        NewsCategory::Entertainment,
        NewsCategory::Sports,
        NewsCategory::Science,
        NewsCategory::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
            NewsCategory::All => "all",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NewsCategory::All => "All News",
            NewsCategory::General => "General",
            NewsCategory::Business => "Business",
            NewsCategory::Entertainment => "Entertainment",
            NewsCategory::Health => "Health",
            NewsCategory::Science => "Science",
            NewsCategory::Sports => "Sports",
            NewsCategory::Technology => "Technology",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NewsCategory::All => "View all news articles across all categories",
            NewsCategory::General => "General news from around the world",
            NewsCategory::Business => "Business and financial news",
            NewsCategory::Entertainment => "Entertainment and celebrity news",
            NewsCategory::Health => "Health and wellness news",
            NewsCategory::Science => "Science news and discoveries",
            NewsCategory::Sports => "Sports news and updates",
            NewsCategory::Technology => "Latest technology news and innovations",
        }
    }

    /// The category slug with its first letter capitalized, e.g. `Sports`.
    pub fn title(&self) -> String {
        let slug = self.as_str();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// `None` for `all`, which means "no filter" upstream.
    pub fn filter(self) -> Option<NewsCategory> {
        match self {
            NewsCategory::All => None,
            other => Some(other),
        }
    }
}

impl Default for NewsCategory {
    fn default() -> Self {
        NewsCategory::General
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(NewsCategory::General),
            "business" => Ok(NewsCategory::Business),
            "entertainment" => Ok(NewsCategory::Entertainment),
            "health" => Ok(NewsCategory::Health),
            "science" => Ok(NewsCategory::Science),
            "sports" => Ok(NewsCategory::Sports),
            "technology" => Ok(NewsCategory::Technology),
            "all" => Ok(NewsCategory::All),
            other => Err(Error::InvalidParameter(format!("unknown category: {}", other))),
        }
    }
}

/// A request for one page of articles, either headlines or a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewsQuery {
    pub category: Option<NewsCategory>,
    pub query: Option<String>,
    pub page: u32,
}

impl NewsQuery {
    pub fn headlines(category: Option<NewsCategory>, page: u32) -> Self {
        Self {
            category,
            query: None,
            page,
        }
    }

    pub fn search(query: impl Into<String>, page: u32) -> Self {
        Self {
            category: None,
            query: Some(query.into()),
            page,
        }
    }

    /// The trimmed search term, if this is a search. A blank term is not a search.
    pub fn search_term(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// The category forwarded upstream on headline requests.
    pub fn category_filter(&self) -> Option<NewsCategory> {
        self.category.and_then(NewsCategory::filter)
    }

    /// The category stamped on every article of the response.
    pub fn effective_category(&self) -> NewsCategory {
        self.category_filter().unwrap_or_default()
    }
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self::headlines(None, 1)
    }
}

/// One page of normalized articles plus the upstream total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    pub articles: Vec<Article>,
    pub total_results: u64,
}

/// JSON body of every failed proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An article record as the upstream provider returns it. Every field may
/// be missing or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawArticle {
    pub source: Option<RawSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}
