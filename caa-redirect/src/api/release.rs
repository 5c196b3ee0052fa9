//! Release redirect endpoints
//!
//! GET /release/{mbid}/        - index document of the release
//! GET /release/{mbid}/{file}  - front, back or numbered image, see `resolver::route`

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::error;

use super::AppState;
use crate::resolver::{Redirect, ResolveError};

/// Build the release router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/release/{mbid}/", get(release_index))
        .route("/release/{mbid}/{file}", get(release_image))
}

/// Redirect to the index document of a release
async fn release_index(
    Path(mbid): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, ResolveError> {
    state.resolver.resolve_index(&mbid).await
}

/// Redirect to a single image of a release
async fn release_image(
    Path((mbid, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Redirect, ResolveError> {
    state.resolver.resolve_segment(&mbid, &file).await
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let body = self.body();
        (
            StatusCode::TEMPORARY_REDIRECT,
            [(header::LOCATION, self.location)],
            body,
        )
            .into_response()
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        if let ResolveError::Catalog(e) = &self {
            error!("Catalog query failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error\n",
            )
                .into_response();
        }

        let status = if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, format!("{}\n", self)).into_response()
    }
}
