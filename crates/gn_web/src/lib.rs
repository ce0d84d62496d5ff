use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, ServerConfig};

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/news", get(handlers::news))
        .route("/api/article", get(handlers::article))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if config.api_key.is_none() {
        warn!("News API key is missing; /api/news will answer with a configuration error");
    }

    let app = create_app(config.build_state());
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("🗞️ Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState, ServerConfig};
    pub use gn_core::{Article, Error, Result};
}
