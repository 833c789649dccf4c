pub mod activity_search;
pub mod matcher;
pub mod pricing;
pub mod providers;
pub mod recommendations;

pub use matcher::MatchOptions;
pub use recommendations::RecommendationService;
