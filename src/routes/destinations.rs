use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{middleware::request_id::RequestId, models::RecommendationSnapshot, routes::AppState};

/// Handler returning the latest top-destination snapshot
pub async fn top_destinations(State(state): State<AppState>) -> Json<RecommendationSnapshot> {
    Json(state.recommendations.snapshot())
}

/// Handler that queues a refresh in the background
///
/// Responds immediately; progress is visible through the snapshot's
/// `isLoading` flag. Triggers arriving while a refresh is already queued are
/// folded into it.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<Value>) {
    let scheduled = state.recommendations.trigger_refresh();
    tracing::info!(request_id = %request_id, scheduled, "Top destination refresh requested");

    let status = if scheduled { "refreshing" } else { "queued" };
    (StatusCode::ACCEPTED, Json(json!({ "status": status })))
}
