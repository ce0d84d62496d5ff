//! Pure view models derived from controller state.
//!
//! Views never hold state of their own; they are rebuilt from the owning
//! controller after every change.

use chrono::{DateTime, Utc};
use gn_core::Article;

use crate::feed::FeedState;

/// What the rendering surface can do, decided once by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewConfig {
    /// Whether the surface can react to a "load more" action.
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Hidden,
    Available,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView<'a> {
    /// Missing or rejected API key; replaces the whole feed.
    ConfigurationError,
    Listing(FeedListing<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedListing<'a> {
    pub title: String,
    pub breadcrumb: Option<String>,
    pub error: Option<&'a str>,
    pub highlights: &'a [Article],
    pub articles: &'a [Article],
    pub load_more: LoadMore,
    pub is_empty: bool,
    pub show_spinner: bool,
}

const HIGHLIGHTS: usize = 3;

pub fn feed_title(state: &FeedState) -> String {
    if !state.search_query.is_empty() {
        return format!("Search Results: {}", state.search_query);
    }
    match state.category {
        Some(category) => category.title(),
        None => "Latest News".to_string(),
    }
}

impl<'a> FeedView<'a> {
    pub fn from_state(state: &'a FeedState, config: ViewConfig) -> Self {
        if state.is_api_key_error {
            return FeedView::ConfigurationError;
        }

        let title = feed_title(state);
        let breadcrumb = state.category.map(|_| format!("Home / {}", title));
        let load_more = if !config.interactive || state.articles.is_empty() || !state.has_more() {
            LoadMore::Hidden
        } else if state.is_loading {
            LoadMore::Loading
        } else {
            LoadMore::Available
        };

        FeedView::Listing(FeedListing {
            title,
            breadcrumb,
            error: state.error.as_deref(),
            highlights: &state.articles[..state.articles.len().min(HIGHLIGHTS)],
            articles: &state.articles,
            load_more,
            is_empty: state.articles.is_empty() && !state.is_loading,
            show_spinner: state.is_loading && state.page == 1,
        })
    }
}

/// "5 minutes ago" style age of a publication date.
pub fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    let (amount, unit) = if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    } else if elapsed.num_minutes() < 60 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_hours() < 24 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 30 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_days() < 365 {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

/// One-line byline: author, age, source.
pub fn byline(article: &Article, now: DateTime<Utc>) -> String {
    let age = article
        .published_date()
        .map(|published| time_ago(published, now))
        .unwrap_or_else(|| article.published_at.clone());
    format!("{} | {} | {}", article.author, age, article.source.name)
}
