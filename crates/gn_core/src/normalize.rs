//! Mapping from upstream records to [`Article`].
//!
//! Normalization is total: any [`RawArticle`], however sparse, yields a
//! complete article. Missing, null and empty fields are replaced with the
//! defaults below.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{Article, ArticleSource, NewsCategory, RawArticle};

pub const DEFAULT_TITLE: &str = "Untitled Article";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_CONTENT: &str = "No content available";
pub const DEFAULT_URL: &str = "#";
pub const DEFAULT_IMAGE: &str = "/placeholder.svg?height=400&width=600&text=No+Image";
pub const DEFAULT_SOURCE_NAME: &str = "Unknown Source";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Formats a timestamp the way `publishedAt` defaults are written.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Normalizes one upstream record. `category` always wins over anything
/// upstream might carry; `now` fills a missing `publishedAt`.
pub fn normalize_article(raw: RawArticle, category: NewsCategory, now: DateTime<Utc>) -> Article {
    let description = present(raw.description);
    let content = present(raw.content)
        .or_else(|| description.clone())
        .unwrap_or_else(|| DEFAULT_CONTENT.to_string());
    let source = raw.source.unwrap_or_default();

    Article {
        title: present(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        content,
        url: present(raw.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
        url_to_image: present(raw.url_to_image).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        published_at: present(raw.published_at).unwrap_or_else(|| timestamp(now)),
        source: ArticleSource {
            id: present(source.id),
            name: present(source.name).unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string()),
        },
        author: present(raw.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawSource;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_record_gets_every_default() {
        let article = normalize_article(RawArticle::default(), NewsCategory::General, fixed_now());

        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.description, DEFAULT_DESCRIPTION);
        assert_eq!(article.content, DEFAULT_CONTENT);
        assert_eq!(article.url, "#");
        assert_eq!(article.url_to_image, DEFAULT_IMAGE);
        assert_eq!(article.published_at, "2024-03-09T12:30:00.000Z");
        assert_eq!(article.source.id, None);
        assert_eq!(article.source.name, "Unknown Source");
        assert_eq!(article.author, "Unknown Author");
        assert_eq!(article.category, NewsCategory::General);
    }

    #[test]
    fn test_empty_strings_are_treated_as_missing() {
        let raw = RawArticle {
            title: Some(String::new()),
            author: Some(String::new()),
            source: Some(RawSource { id: Some(String::new()), name: Some(String::new()) }),
            ..Default::default()
        };
        let article = normalize_article(raw, NewsCategory::Health, fixed_now());

        assert_eq!(article.title, "Untitled Article");
        assert_eq!(article.author, "Unknown Author");
        assert_eq!(article.source.id, None);
        assert_eq!(article.source.name, "Unknown Source");
    }

    #[test]
    fn test_content_falls_back_to_description() {
        let raw = RawArticle {
            description: Some("Short summary".to_string()),
            ..Default::default()
        };
        let article = normalize_article(raw, NewsCategory::General, fixed_now());

        assert_eq!(article.description, "Short summary");
        assert_eq!(article.content, "Short summary");
    }

    #[test]
    fn test_present_fields_are_kept_and_category_is_forced() {
        let raw = RawArticle {
            source: Some(RawSource { id: Some("bbc-news".to_string()), name: Some("BBC News".to_string()) }),
            author: Some("Jane Doe".to_string()),
            title: Some("Headline".to_string()),
            description: Some("Summary".to_string()),
            url: Some("https://bbc.co.uk/1".to_string()),
            url_to_image: Some("https://bbc.co.uk/1.jpg".to_string()),
            published_at: Some("2024-03-01T08:00:00Z".to_string()),
            content: Some("Body".to_string()),
        };
        let article = normalize_article(raw, NewsCategory::Sports, fixed_now());

        assert_eq!(article.title, "Headline");
        assert_eq!(article.content, "Body");
        assert_eq!(article.url, "https://bbc.co.uk/1");
        assert_eq!(article.published_at, "2024-03-01T08:00:00Z");
        assert_eq!(article.source.id.as_deref(), Some("bbc-news"));
        assert_eq!(article.source.name, "BBC News");
        assert_eq!(article.author, "Jane Doe");
        assert_eq!(article.category, NewsCategory::Sports);
    }

    #[test]
    fn test_null_fields_deserialize_as_missing() {
        let raw: RawArticle = serde_json::from_str(
            r#"{"source":{"id":null,"name":"Wire"},"author":null,"title":"T","urlToImage":null}"#,
        )
        .unwrap();
        let article = normalize_article(raw, NewsCategory::General, fixed_now());

        assert_eq!(article.source.name, "Wire");
        assert_eq!(article.author, DEFAULT_AUTHOR);
        assert_eq!(article.url_to_image, DEFAULT_IMAGE);
    }
}
