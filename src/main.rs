use std::sync::Arc;

use coco_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        providers::{ActivityProvider, CocoApiProvider},
        RecommendationService,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coco_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn ActivityProvider> = Arc::new(CocoApiProvider::new(
        config.coco_api_url.clone(),
        config.coco_api_key.clone(),
        config.request_timeout(),
    )?);
    let recommendations = Arc::new(RecommendationService::new(
        provider.clone(),
        config.match_options(),
    ));

    if config.refresh_on_startup {
        recommendations.trigger_refresh();
    }

    let app = create_router(AppState::new(provider, recommendations));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, backend = %config.coco_api_url, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
