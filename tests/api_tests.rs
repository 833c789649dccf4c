use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;

use coco_api::{
    error::{AppError, AppResult},
    models::{Activity, Destination, Package},
    routes::{create_router, AppState},
    services::{providers::ActivityProvider, MatchOptions, RecommendationService},
};

/// Provider serving canned data; searches not listed fail like a network error
struct StubProvider {
    destinations: Option<Vec<Destination>>,
    searches: HashMap<String, Vec<Activity>>,
}

#[async_trait::async_trait]
impl ActivityProvider for StubProvider {
    async fn fetch_top_destinations(&self) -> AppResult<Vec<Destination>> {
        self.destinations
            .clone()
            .ok_or_else(|| AppError::ExternalApi("destination list unavailable".to_string()))
    }

    async fn search_activities(&self, search_text: &str) -> AppResult<Vec<Activity>> {
        self.searches
            .get(search_text)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("search failed: {}", search_text)))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Provider whose destination fetch is slow and counted
#[derive(Default)]
struct SlowCountingProvider {
    fetches: AtomicUsize,
}

#[async_trait::async_trait]
impl ActivityProvider for SlowCountingProvider {
    async fn fetch_top_destinations(&self) -> AppResult<Vec<Destination>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(vec![])
    }

    async fn search_activities(&self, _search_text: &str) -> AppResult<Vec<Activity>> {
        Ok(vec![])
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

fn activity(id: i64, title: &str, location: &str, prices: &[f64]) -> Activity {
    Activity {
        id,
        title: title.to_string(),
        description: String::new(),
        location: location.to_string(),
        packages: prices
            .iter()
            .enumerate()
            .map(|(i, price)| Package {
                id: i as i64,
                price_per_person: *price,
                name: None,
                min_participants: None,
                max_participants: None,
            })
            .collect(),
        images: vec![],
    }
}

fn bali_provider() -> StubProvider {
    let mut searches = HashMap::new();
    searches.insert(
        "Ubud, Bali".to_string(),
        vec![activity(
            100,
            "Ubud Rice Terrace Tour",
            "Ubud, Gianyar",
            &[300000.0, 300000.0],
        )],
    );
    searches.insert("Ubud".to_string(), vec![]);
    searches.insert(
        "Nusa Penida".to_string(),
        vec![activity(
            200,
            "Nusa Penida Snorkeling",
            "Nusa Penida",
            &[450000.0, 250000.0],
        )],
    );
    // "Raja Ampat" is missing on purpose: its search fails

    StubProvider {
        destinations: Some(vec![
            Destination::new(7, "Ubud, Bali"),
            Destination::new(8, "Raja Ampat"),
            Destination::new(9, "Nusa Penida"),
        ]),
        searches,
    }
}

fn create_test_server(provider: StubProvider) -> (TestServer, Arc<RecommendationService>) {
    let provider: Arc<dyn ActivityProvider> = Arc::new(provider);
    let recommendations = Arc::new(RecommendationService::with_rng(
        provider.clone(),
        MatchOptions::default(),
        StdRng::seed_from_u64(1),
    ));
    let app = create_router(AppState::new(provider, recommendations.clone()));
    (TestServer::new(app).unwrap(), recommendations)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server(bali_provider());
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_top_destinations_empty_before_refresh() {
    let (server, _) = create_test_server(bali_provider());
    let response = server.get("/api/v1/destinations/top").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["isLoading"], false);
    assert_eq!(body["topDestinations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_top_destinations_after_refresh() {
    let (server, recommendations) = create_test_server(bali_provider());
    recommendations.refresh().await;

    let response = server.get("/api/v1/destinations/top").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["isLoading"], false);
    assert!(body["refreshedAt"].is_string());

    let cards = body["topDestinations"].as_array().unwrap();
    assert_eq!(cards.len(), 3);

    assert_eq!(cards[0]["id"], 7);
    assert_eq!(cards[0]["title"], "Ubud Rice Terrace Tour");
    assert_eq!(cards[0]["priceText"], "IDR 300,000");

    assert_eq!(cards[1]["id"], 8);
    assert_eq!(cards[1]["title"], "Raja Ampat");
    assert_eq!(cards[1]["priceText"], "Price unavailable");
    assert!(cards[1]["imageUrl"].is_null());

    assert_eq!(cards[2]["id"], 9);
    assert_eq!(cards[2]["priceText"], "IDR 250,000 - IDR 450,000");
}

#[tokio::test]
async fn test_refresh_with_failing_destination_list() {
    let (server, recommendations) = create_test_server(StubProvider {
        destinations: None,
        searches: HashMap::new(),
    });
    let snapshot = recommendations.refresh().await;
    assert!(snapshot.top_destinations.is_empty());

    let body: Value = server.get("/api/v1/destinations/top").await.json();
    assert_eq!(body["isLoading"], false);
    assert_eq!(body["topDestinations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_refresh_endpoint_accepts() {
    let (server, _) = create_test_server(bali_provider());
    let response = server.post("/api/v1/destinations/top/refresh").await;
    response.assert_status(StatusCode::ACCEPTED);

    let body: Value = response.json();
    assert_eq!(body["status"], "refreshing");
}

#[tokio::test]
async fn test_refresh_burst_runs_at_most_two_refreshes() {
    let provider = Arc::new(SlowCountingProvider::default());
    let recommendations = Arc::new(RecommendationService::new(
        provider.clone(),
        MatchOptions::default(),
    ));
    let app = create_router(AppState::new(provider.clone(), recommendations.clone()));
    let server = TestServer::new(app).unwrap();

    for _ in 0..20 {
        server
            .post("/api/v1/destinations/top/refresh")
            .await
            .assert_status(StatusCode::ACCEPTED);
    }

    tokio::time::sleep(Duration::from_millis(800)).await;

    let fetches = provider.fetches.load(Ordering::SeqCst);
    assert!((1..=2).contains(&fetches), "fetches = {}", fetches);
    assert!(!recommendations.snapshot().is_loading);
}

#[tokio::test]
async fn test_activity_search_passthrough() {
    let (server, _) = create_test_server(bali_provider());
    let response = server
        .get("/api/v1/activities/search")
        .add_query_param("q", "Nusa Penida")
        .await;
    response.assert_status_ok();

    let activities: Vec<Value> = response.json();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["title"], "Nusa Penida Snorkeling");
    assert_eq!(activities[0]["packages"][0]["pricePerPerson"], 450000.0);
}

#[tokio::test]
async fn test_activity_search_rejects_blank_query() {
    let (server, _) = create_test_server(bali_provider());
    let response = server
        .get("/api/v1/activities/search")
        .add_query_param("q", "  ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Search query cannot be empty");
}

#[tokio::test]
async fn test_activity_search_upstream_failure_is_bad_gateway() {
    let (server, _) = create_test_server(bali_provider());
    let response = server
        .get("/api/v1/activities/search")
        .add_query_param("q", "Raja Ampat")
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = create_test_server(bali_provider());
    let request_id = "0b6f7a3e-5c1d-4f3e-9a59-6a1f2d3c4b5e";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(request_id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (server, _) = create_test_server(bali_provider());
    let response = server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
