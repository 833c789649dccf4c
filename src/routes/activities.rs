use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::Activity, routes::AppState,
    services::activity_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for activity search endpoint
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Activity>>> {
    let activities = activity_search::search_activities(state.provider.clone(), &params.q).await?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        results = activities.len(),
        "Activity search served"
    );

    Ok(Json(activities))
}
