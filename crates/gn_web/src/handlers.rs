use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use gn_core::{Article, Error, NewsCategory, NewsQuery, Result};
use gn_provider::DetailRequest;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Pages may be reused by shared caches for ten minutes.
pub const NEWS_CACHE_CONTROL: &str = "public, max-age=600";

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub category: Option<String>,
    pub query: Option<String>,
    pub page: Option<String>,
}

impl NewsParams {
    pub fn into_query(self) -> Result<NewsQuery> {
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(value) => Some(value.parse::<NewsCategory>()?),
        };

        let page = match self.page.as_deref() {
            None | Some("") => 1,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| Error::InvalidParameter(format!("page must be a positive integer, got {}", value)))?,
        };

        Ok(NewsQuery {
            category,
            query: self.query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            page,
        })
    }
}

fn malformed(rejection: QueryRejection) -> Error {
    Error::InvalidParameter(rejection.body_text())
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<NewsParams>, QueryRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|r| ApiError::news(malformed(r)))?;
    let query = params.into_query().map_err(ApiError::news)?;
    let page = state.news.fetch_news(&query).await.map_err(ApiError::news)?;

    Ok(([(header::CACHE_CONTROL, NEWS_CACHE_CONTROL)], Json(page)))
}

pub async fn article(
    State(state): State<Arc<AppState>>,
    request: std::result::Result<Query<DetailRequest>, QueryRejection>,
) -> std::result::Result<Json<Article>, ApiError> {
    let Query(request) = request.map_err(|r| ApiError::article(malformed(r)))?;
    let article = state.details.resolve(&request).await.map_err(ApiError::article)?;
    Ok(Json(article))
}
