use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{providers::ActivityProvider, RecommendationService},
};

pub mod activities;
pub mod destinations;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ActivityProvider>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn ActivityProvider>,
        recommendations: Arc<RecommendationService>,
    ) -> Self {
        Self {
            provider,
            recommendations,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/destinations/top", get(destinations::top_destinations))
        .route("/destinations/top/refresh", post(destinations::refresh))
        .route("/activities/search", get(activities::search))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
