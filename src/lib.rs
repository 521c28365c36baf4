pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod db;
pub mod models;
pub mod media;
pub mod routes;
pub mod submission;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::PgStore;
use crate::media::http::HttpMediaManager;
use crate::media::MediaError;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Result<Router, MediaError> {
    let store = Arc::new(PgStore::new(pool));
    let media = Arc::new(HttpMediaManager::new(&config.media_url, config.media_timeout)?);
    tracing::info!("Media service at {}", config.media_url);

    if config.api_token.is_none() {
        tracing::warn!("FORMDESK_API_TOKEN not set, API is unauthenticated");
    }

    let state: SharedState = Arc::new(AppState {
        config,
        dynamics: store.clone(),
        forms: store,
        media,
    });

    Ok(router(state))
}

/// Router over an already assembled state.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
