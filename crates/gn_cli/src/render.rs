use chrono::{DateTime, Utc};
use gn_client::view::{byline, FeedListing, LoadMore};
use gn_client::{ArticleViewState, FeedView};
use gn_core::{Article, NewsCategory};

pub fn categories() -> String {
    NewsCategory::NAVIGATION
        .iter()
        .map(|c| format!("{:<14} {:<14} {}", c.as_str(), c.display_name(), c.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn configuration_error() -> String {
    [
        "API Key Configuration Error",
        "",
        "The News API rejected the request or no key is configured. This usually means:",
        "  - the API key is invalid or has expired",
        "  - the request quota has been exceeded",
        "  - the key has no access to the requested endpoint",
        "",
        "Sign up at https://newsapi.org, copy your key, and set NEWS_API_KEY",
        "(or NEXT_PUBLIC_NEWS_API_KEY) in the proxy's environment or .env file,",
        "then restart the proxy.",
    ]
    .join("\n")
}

fn card(index: usize, article: &Article, now: DateTime<Utc>) -> String {
    format!(
        "{:>3}. {}\n     {}\n     {}",
        index + 1,
        article.title,
        byline(article, now),
        article.url
    )
}

fn listing(listing: &FeedListing<'_>, pages: u32, now: DateTime<Utc>) -> String {
    let mut lines = Vec::new();

    if let Some(breadcrumb) = &listing.breadcrumb {
        lines.push(breadcrumb.clone());
    }
    lines.push(format!("== {} ==", listing.title));

    if let Some(error) = listing.error {
        lines.push(format!("⚠️ Error loading news: {}", error));
        if error.contains("API key") {
            lines.push("Please make sure your News API key is correctly set in the environment variables.".to_string());
        }
    }

    if listing.show_spinner {
        lines.push("Loading...".to_string());
    } else if listing.is_empty {
        lines.push("No articles found".to_string());
        lines.push("Try selecting a different category or check back later for new content.".to_string());
    }

    lines.extend(
        listing
            .articles
            .iter()
            .enumerate()
            .map(|(i, article)| card(i, article, now)),
    );

    match listing.load_more {
        LoadMore::Available => lines.push(format!("More articles available: rerun with --pages {}", pages + 1)),
        LoadMore::Loading => lines.push("Loading...".to_string()),
        LoadMore::Hidden => {}
    }

    lines.join("\n")
}

pub fn feed(view: &FeedView<'_>, pages: u32, now: DateTime<Utc>) -> String {
    match view {
        FeedView::ConfigurationError => configuration_error(),
        FeedView::Listing(l) => listing(l, pages, now),
    }
}

pub fn article(state: &ArticleViewState, now: DateTime<Utc>) -> String {
    match state {
        ArticleViewState::Loading => "Loading...".to_string(),
        ArticleViewState::NotFound { message } => format!("🤔 Article Not Found\n{}", message),
        ArticleViewState::Loaded { article, related } => {
            let mut lines = vec![
                format!("[{}]", article.category.title()),
                byline(article, now),
                String::new(),
                article.title.clone(),
                String::new(),
                article.description.clone(),
                String::new(),
                article.content.clone(),
                String::new(),
            ];

            let published = article
                .published_date()
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| article.published_at.clone());
            lines.push(format!(
                "This article was originally published on {} ({}) on {}.",
                article.source.name, article.url, published
            ));

            if !related.is_empty() {
                lines.push(String::new());
                lines.push("Related Articles".to_string());
                lines.extend(related.iter().enumerate().map(|(i, a)| card(i, a, now)));
            }

            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gn_client::{FeedState, ViewConfig};
    use gn_core::ArticleSource;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample() -> Article {
        Article {
            title: "Rover finds water".to_string(),
            description: "Summary".to_string(),
            content: "Body".to_string(),
            url: "https://news.example/rover".to_string(),
            url_to_image: "https://news.example/rover.png".to_string(),
            published_at: "2024-06-01T09:00:00Z".to_string(),
            source: ArticleSource { id: None, name: "Space Daily".to_string() },
            author: "Ana".to_string(),
            category: NewsCategory::Science,
        }
    }

    #[test]
    fn test_feed_listing() {
        let state = FeedState {
            category: Some(NewsCategory::Science),
            articles: vec![sample()],
            total_results: 30,
            ..Default::default()
        };
        let out = feed(&FeedView::from_state(&state, ViewConfig { interactive: true }), 1, now());

        assert!(out.contains("Home / Science"));
        assert!(out.contains("== Science =="));
        assert!(out.contains("Rover finds water"));
        assert!(out.contains("Ana | 3 hours ago | Space Daily"));
        assert!(out.contains("--pages 2"));
    }

    #[test]
    fn test_configuration_error_screen() {
        let state = FeedState {
            is_api_key_error: true,
            ..Default::default()
        };
        let out = feed(&FeedView::from_state(&state, ViewConfig::default()), 1, now());
        assert!(out.starts_with("API Key Configuration Error"));
    }

    #[test]
    fn test_article_page() {
        let state = ArticleViewState::Loaded {
            article: sample(),
            related: vec![],
        };
        let out = article(&state, now());

        assert!(out.starts_with("[Science]"));
        assert!(out.contains("originally published on Space Daily (https://news.example/rover) on June 1, 2024."));
        assert!(!out.contains("Related Articles"));
    }

    #[test]
    fn test_categories_list_every_entry() {
        assert_eq!(categories().lines().count(), NewsCategory::NAVIGATION.len());
    }
}
