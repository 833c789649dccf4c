/// Coco backend provider
///
/// API Flow:
/// 1. Top destinations: GET /destinations/top → `[{id, name}]`
/// 2. Activity search: POST /activities/search with `{"searchText": ...}` → `[Activity]`
use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{Activity, ActivitySearchRequest, Destination},
    services::providers::ActivityProvider,
};

const USER_AGENT: &str = concat!("coco-api/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct CocoApiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl CocoApiProvider {
    /// Creates a provider for the backend rooted at `api_url`
    pub fn new(api_url: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Attaches the API key, when configured, both as `apikey` and as bearer token
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Coco API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, response = %body, "Failed to deserialize Coco response");
            AppError::ExternalApi(format!("Failed to parse Coco response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl ActivityProvider for CocoApiProvider {
    async fn fetch_top_destinations(&self) -> AppResult<Vec<Destination>> {
        let response = self
            .authorize(self.http_client.get(self.endpoint("destinations/top")))
            .send()
            .await?;

        let destinations: Vec<Destination> = Self::read_json(response).await?;

        tracing::info!(
            results = destinations.len(),
            provider = self.name(),
            "Top destinations fetched"
        );

        Ok(destinations)
    }

    async fn search_activities(&self, search_text: &str) -> AppResult<Vec<Activity>> {
        let response = self
            .authorize(self.http_client.post(self.endpoint("activities/search")))
            .json(&ActivitySearchRequest { search_text })
            .send()
            .await?;

        let activities: Vec<Activity> = Self::read_json(response).await?;

        tracing::info!(
            query = %search_text,
            results = activities.len(),
            provider = self.name(),
            "Activity search completed"
        );

        Ok(activities)
    }

    fn name(&self) -> &'static str {
        "coco"
    }
}
