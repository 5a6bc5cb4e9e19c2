// SPDX-License-Identifier: MIT

//! Actor analytics route.

use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/at/{handle}", get(get_actor_stats))
}

/// Aggregate analytics for one handle.
///
/// All-or-nothing: any resolution or fetch failure answers with a 307
/// to the fallback listing route instead of a partial view.
async fn get_actor_stats(
    State(state): State<Arc<AppState>>,
    Path(handle): Path<String>,
) -> Response {
    match state.aggregator.aggregate(&handle).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            tracing::error!(error = %err, %handle, "Aggregation failed, redirecting");
            Redirect::temporary(&state.config.fallback_route).into_response()
        }
    }
}
