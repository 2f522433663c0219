//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /tracking`                       – record one user action
//! - `GET  /tracking?bonusId=…`             – same-day usage count for a bonus
//! - `GET  /analytics`                      – multi-timeframe rollup
//! - `GET  /casinos/{id_or_slug}/analytics` – one casino's dashboard data
//! - `GET  /statistics`                     – global site statistics
//! - `GET  /notifications/stream`           – live notification stream (SSE)

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

mod analytics;
mod casinos;
mod statistics;
mod stream;
mod tracking;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tracking", post(tracking::track).get(tracking::usage))
        .route("/analytics", get(analytics::get_analytics))
        .route(
            "/casinos/{id_or_slug}/analytics",
            get(casinos::casino_analytics),
        )
        .route("/statistics", get(statistics::get_statistics))
        .route("/notifications/stream", get(stream::notification_stream))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
enum ApiError {
    /// A database query failed.
    Database(sqlx::Error),
    /// The request is malformed or incomplete; client-fixable.
    Validation(String),
    /// The referenced casino was not found.
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "API database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "casino not found" })),
            )
                .into_response(),
        }
    }
}
