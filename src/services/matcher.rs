//! Destination matching
//!
//! Picks one representative activity for a destination out of the activities
//! returned by searching for its name. Everything here is pure so it can be
//! exercised without the fetch orchestration in `recommendations`.

use std::borrow::Borrow;
use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::{
    models::{Activity, Destination, EnrichedCard},
    services::pricing::{self, PriceStyle},
};

/// Number of search results used when nothing matches the destination
pub const DEFAULT_FALLBACK_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// How many leading search results to choose from when no activity matches
    pub fallback_limit: usize,
    pub price_style: PriceStyle,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            price_style: PriceStyle::default(),
        }
    }
}

/// Search texts issued for a destination, in order
///
/// The full name always comes first. The text before the first comma is added
/// when it differs from the full name.
pub fn search_queries(destination: &Destination) -> Vec<String> {
    let full = destination.name.trim();
    let main = destination.main_location();

    let mut queries = vec![full.to_string()];
    if !main.is_empty() && main != full {
        queries.push(main.to_string());
    }
    queries
}

/// Removes repeated activity ids, keeping the first occurrence
pub fn dedup_by_id<I>(activities: I) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<Activity>,
{
    let mut seen = HashSet::new();
    activities
        .into_iter()
        .filter(|activity| seen.insert(activity.borrow().id))
        .collect()
}

/// Activities whose title, description or location mentions the keyword
pub fn keyword_matches<'a>(activities: &[&'a Activity], keyword: &str) -> Vec<&'a Activity> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }

    activities
        .iter()
        .copied()
        .filter(|activity| {
            [&activity.title, &activity.description, &activity.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
        })
        .collect()
}

/// Activities whose location shares a token with the destination's main location
///
/// Tokens match when either one contains the other.
pub fn token_matches<'a>(activities: &[&'a Activity], main_location: &str) -> Vec<&'a Activity> {
    let wanted = tokens(main_location);
    if wanted.is_empty() {
        return Vec::new();
    }

    activities
        .iter()
        .copied()
        .filter(|activity| {
            tokens(&activity.location).iter().any(|candidate| {
                wanted
                    .iter()
                    .any(|token| candidate.contains(token.as_str()) || token.contains(candidate.as_str()))
            })
        })
        .collect()
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| c == ',' || c == '.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Activities eligible to represent the destination
///
/// Keyword matches followed by token matches, without repeats. When neither
/// finds anything, the first `fallback_limit` search results are used instead.
pub fn candidate_pool<'a>(
    destination: &Destination,
    activities: &'a [Activity],
    fallback_limit: usize,
) -> Vec<&'a Activity> {
    let unique = dedup_by_id(activities.iter());
    let main = destination.main_location();

    let matched = dedup_by_id(
        keyword_matches(&unique, main)
            .into_iter()
            .chain(token_matches(&unique, main)),
    );

    if matched.is_empty() {
        unique.into_iter().take(fallback_limit).collect()
    } else {
        matched
    }
}

/// Projects a chosen activity into the card shown for a destination
pub fn project_card(destination: &Destination, activity: &Activity, style: PriceStyle) -> EnrichedCard {
    let location = if activity.location.trim().is_empty() {
        destination.name.clone()
    } else {
        activity.location.clone()
    };

    EnrichedCard {
        id: destination.id,
        title: activity.title.clone(),
        location,
        price_text: pricing::price_text(activity, style),
        image_url: activity.primary_image_url().map(str::to_string),
    }
}

/// Builds the card for a destination from its merged search results
///
/// Returns the placeholder card when there are no candidates; otherwise one
/// activity from the candidate pool is chosen uniformly at random.
pub fn match_and_select<R>(
    destination: &Destination,
    candidates: &[Activity],
    options: &MatchOptions,
    rng: &mut R,
) -> EnrichedCard
where
    R: Rng + ?Sized,
{
    let pool = candidate_pool(destination, candidates, options.fallback_limit);

    match pool.choose(rng) {
        Some(activity) => {
            tracing::debug!(
                destination_id = destination.id,
                pool_size = pool.len(),
                activity_id = activity.id,
                "Selected representative activity"
            );
            project_card(destination, activity, options.price_style)
        }
        None => EnrichedCard::placeholder(destination),
    }
}
