//! HTTP API module - redirect endpoints, index page and health check

mod release;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::db::Database;
use crate::resolver::Resolver;

/// Static landing page
const INDEX_PAGE: &str = include_str!("../../templates/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub resolver: Arc<Resolver>,
}

/// Build the API router
pub fn router(db: Arc<Database>, config: &Config) -> Router {
    let catalog = CatalogStore::new(db.pool().clone());
    let resolver = Arc::new(Resolver::new(catalog, config.download_prefix.clone()));

    let state = AppState { db, resolver };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(release::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found\n")
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}
