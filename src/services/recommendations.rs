use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::watch;

use crate::{
    error::AppResult,
    models::{Activity, Destination, EnrichedCard, RecommendationSnapshot},
    services::{
        matcher::{self, MatchOptions},
        providers::ActivityProvider,
    },
};

/// Produces the "Top Destination" cards
///
/// Fetches the top destinations, publishes basic cards for them right away,
/// then enriches each destination with a representative activity, one
/// destination at a time. Every state change goes out as a whole
/// [`RecommendationSnapshot`] on a watch channel.
///
/// Refreshes are serialized: a second trigger waits for the running one and
/// then starts over with fresh data. Background triggers keep at most one
/// refresh queued behind the running one.
pub struct RecommendationService {
    provider: Arc<dyn ActivityProvider>,
    options: MatchOptions,
    rng: Mutex<StdRng>,
    refresh_lock: tokio::sync::Mutex<()>,
    refresh_queued: AtomicBool,
    snapshot_tx: watch::Sender<RecommendationSnapshot>,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn ActivityProvider>, options: MatchOptions) -> Self {
        Self::with_rng(provider, options, StdRng::from_entropy())
    }

    /// Same as [`RecommendationService::new`] with a caller-supplied random source
    pub fn with_rng(provider: Arc<dyn ActivityProvider>, options: MatchOptions, rng: StdRng) -> Self {
        let (snapshot_tx, _) = watch::channel(RecommendationSnapshot::default());
        Self {
            provider,
            options,
            rng: Mutex::new(rng),
            refresh_lock: tokio::sync::Mutex::new(()),
            refresh_queued: AtomicBool::new(false),
            snapshot_tx,
        }
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<RecommendationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> RecommendationSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Runs the full fetch → match → publish cycle and returns the final snapshot
    ///
    /// A failure fetching the destination list publishes an empty, non-loading
    /// snapshot. Failures for a single destination only affect that card.
    pub async fn refresh(&self) -> RecommendationSnapshot {
        let _guard = self.refresh_lock.lock().await;
        self.run_refresh().await
    }

    /// Queues a refresh on a background task
    ///
    /// Returns `false` when a queued refresh that has not started yet already
    /// covers this trigger.
    pub fn trigger_refresh(self: &Arc<Self>) -> bool {
        if self.refresh_queued.swap(true, Ordering::AcqRel) {
            tracing::debug!("Refresh already queued, folding trigger into it");
            return false;
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = service.refresh_lock.lock().await;
            service.refresh_queued.store(false, Ordering::Release);
            let snapshot = service.run_refresh().await;
            tracing::debug!(
                cards = snapshot.top_destinations.len(),
                "Background refresh finished"
            );
        });
        true
    }

    async fn run_refresh(&self) -> RecommendationSnapshot {
        let previous = self.snapshot();
        self.publish(RecommendationSnapshot {
            is_loading: true,
            ..previous.clone()
        });

        tracing::info!(provider = self.provider.name(), "Refreshing top destinations");

        let destinations = match self.provider.fetch_top_destinations().await {
            Ok(destinations) => destinations,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    provider = self.provider.name(),
                    "Failed to fetch top destinations"
                );
                let empty = RecommendationSnapshot {
                    is_loading: false,
                    top_destinations: Vec::new(),
                    refreshed_at: previous.refreshed_at,
                };
                self.publish(empty.clone());
                return empty;
            }
        };

        self.publish(RecommendationSnapshot {
            is_loading: true,
            top_destinations: destinations.iter().map(EnrichedCard::placeholder).collect(),
            refreshed_at: previous.refreshed_at,
        });

        let mut cards = Vec::with_capacity(destinations.len());
        for destination in &destinations {
            cards.push(self.enrich_destination(destination).await);
        }

        let enriched = cards
            .iter()
            .filter(|card| card.image_url.is_some())
            .count();
        tracing::info!(
            destinations = destinations.len(),
            enriched,
            "Top destinations refreshed"
        );

        let snapshot = RecommendationSnapshot {
            is_loading: false,
            top_destinations: cards,
            refreshed_at: Some(Utc::now()),
        };
        self.publish(snapshot.clone());
        snapshot
    }

    /// Builds the card for one destination
    ///
    /// Never fails: a search error yields the "price unavailable" card.
    pub async fn enrich_destination(&self, destination: &Destination) -> EnrichedCard {
        match self.search_candidates(destination).await {
            Ok(candidates) => self.select_card(destination, &candidates),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    destination_id = destination.id,
                    destination = %destination.name,
                    "Activity lookup failed, using placeholder card"
                );
                EnrichedCard::unavailable(destination)
            }
        }
    }

    /// Runs the destination's searches in order and merges the results
    async fn search_candidates(&self, destination: &Destination) -> AppResult<Vec<Activity>> {
        let mut merged = Vec::new();
        for query in matcher::search_queries(destination) {
            let results = self.provider.search_activities(&query).await?;
            tracing::debug!(
                destination_id = destination.id,
                query = %query,
                results = results.len(),
                "Search results received"
            );
            merged.extend(results);
        }
        Ok(matcher::dedup_by_id(merged))
    }

    fn select_card(&self, destination: &Destination, candidates: &[Activity]) -> EnrichedCard {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        matcher::match_and_select(destination, candidates, &self.options, &mut *rng)
    }

    fn publish(&self, snapshot: RecommendationSnapshot) {
        self.snapshot_tx.send_replace(snapshot);
    }
}
