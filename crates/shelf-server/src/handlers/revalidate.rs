//! Cache invalidation endpoint.
//!
//! Content editors call this from a store webhook after publishing, so the
//! next visit renders fresh pages.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Query string for GET /api/clear-cache.
#[derive(Debug, Deserialize)]
pub(crate) struct ClearCacheQuery {
    token: Option<String>,
}

/// Response for GET /api/clear-cache.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ClearCacheResponse {
    Cleared { revalidated: bool, now: i64 },
    Rejected { revalidated: bool, message: &'static str },
}

/// Handle GET /api/clear-cache?token=...
pub(crate) async fn clear_cache(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClearCacheQuery>,
) -> Response {
    let authorized = match (&state.revalidate_token, &query.token) {
        (Some(expected), Some(given)) => constant_time_eq(expected, given),
        _ => false,
    };

    if !authorized {
        tracing::warn!("Rejected cache invalidation with invalid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ClearCacheResponse::Rejected {
                revalidated: false,
                message: "Invalid token",
            }),
        )
            .into_response();
    }

    let removed = state.clear_pages();
    tracing::info!(removed, "Page cache cleared");

    Json(ClearCacheResponse::Cleared {
        revalidated: true,
        now: Utc::now().timestamp_millis(),
    })
    .into_response()
}

/// Compare two secrets without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
