use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price text shown when a destination has no priced activity
pub const NO_PRICE_TEXT: &str = "-";

/// Price text shown when the activity lookup for a destination failed
pub const PRICE_UNAVAILABLE_TEXT: &str = "Price unavailable";

// ============================================================================
// Coco API Types
// ============================================================================

/// A place of interest used as a search seed for recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: i64,
    pub name: String,
}

impl Destination {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Text before the first comma, e.g. "Ubud" for "Ubud, Bali"
    pub fn main_location(&self) -> &str {
        self.name
            .split_once(',')
            .map_or(self.name.as_str(), |(head, _)| head)
            .trim()
    }
}

/// A bookable travel experience returned by activity search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub images: Vec<ActivityImage>,
}

impl Activity {
    /// Lowest and highest per-person price across all packages
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.packages.iter().map(|p| p.price_per_person);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        }))
    }

    pub fn primary_image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.image_url.as_str())
    }
}

/// A specific bookable offer within an activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i64,
    pub price_per_person: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_participants: Option<u32>,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityImage {
    pub id: i64,
    pub image_url: String,
}

/// Request body for the activity search endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySearchRequest<'a> {
    pub search_text: &'a str,
}

// ============================================================================
// Recommendation Output
// ============================================================================

/// Display-ready projection of a destination and its representative activity
///
/// `id` is always the destination's id, never the matched activity's.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCard {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub price_text: String,
    pub image_url: Option<String>,
}

impl EnrichedCard {
    /// Card built from the destination alone, before or without a matched activity
    pub fn placeholder(destination: &Destination) -> Self {
        Self::basic(destination, NO_PRICE_TEXT)
    }

    /// Card used when the activity lookup for the destination failed
    pub fn unavailable(destination: &Destination) -> Self {
        Self::basic(destination, PRICE_UNAVAILABLE_TEXT)
    }

    fn basic(destination: &Destination, price_text: &str) -> Self {
        Self {
            id: destination.id,
            title: destination.name.clone(),
            location: destination.name.clone(),
            price_text: price_text.to_string(),
            image_url: None,
        }
    }
}

/// Published state of the top-destination recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    pub is_loading: bool,
    pub top_destinations: Vec<EnrichedCard>,
    pub refreshed_at: Option<DateTime<Utc>>,
}
