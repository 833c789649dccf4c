use crate::{
    error::{AppError, AppResult},
    models::Activity,
    services::providers::ActivityProvider,
};
use std::sync::Arc;

/// Service function for activity search
///
/// Validates the query and delegates to the configured ActivityProvider,
/// keeping HTTP routing separate from the provider.
pub async fn search_activities(
    provider: Arc<dyn ActivityProvider>,
    query: &str,
) -> AppResult<Vec<Activity>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    provider.search_activities(query).await
}
