//! Activity data provider abstraction
//!
//! The recommendation pipeline only talks to the Coco backend through
//! [`ActivityProvider`], so tests and alternative backends can stand in for
//! the HTTP client.

use crate::{
    error::AppResult,
    models::{Activity, Destination},
};

pub mod coco;

pub use coco::CocoApiProvider;

/// Source of destinations and activities
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ActivityProvider: Send + Sync {
    /// Fetch the destinations highlighted as top destinations
    async fn fetch_top_destinations(&self) -> AppResult<Vec<Destination>>;

    /// Search activities by free text
    ///
    /// Results come back in the backend's relevance order and may contain
    /// the same activity more than once across separate searches.
    async fn search_activities(&self, search_text: &str) -> AppResult<Vec<Activity>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
