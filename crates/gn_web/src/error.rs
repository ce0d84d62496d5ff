use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gn_core::{Error, ErrorPayload};
use tracing::error;

/// Which route failed; selects the generic error label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    News,
    Article,
}

impl Route {
    fn failure_label(&self) -> &'static str {
        match self {
            Route::News => "Failed to fetch news",
            Route::Article => "Failed to fetch article",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    route: Route,
    source: Error,
}

impl ApiError {
    pub fn news(source: Error) -> Self {
        Self { route: Route::News, source }
    }

    pub fn article(source: Error) -> Self {
        Self { route: Route::Article, source }
    }

    pub fn status(&self) -> StatusCode {
        match &self.source {
            Error::Authentication => StatusCode::UNAUTHORIZED,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        let message = Some(self.source.to_string());
        match &self.source {
            Error::MissingApiKey => ErrorPayload {
                error: "API configuration error".to_string(),
                message,
            },
            Error::Authentication => ErrorPayload {
                error: "API authentication error".to_string(),
                message,
            },
            Error::MissingParameter(_) => ErrorPayload {
                error: self.source.to_string(),
                message: None,
            },
            e if e.is_client_error() => ErrorPayload {
                error: "Invalid request".to_string(),
                message,
            },
            _ => ErrorPayload {
                error: self.route.failure_label().to_string(),
                message,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(route = ?self.route, "{}: {}", self.route.failure_label(), self.source);
        }
        (status, Json(self.payload())).into_response()
    }
}
