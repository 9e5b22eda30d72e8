//! Region filtering, scoring and ranking in one pass

use crate::reference::ReferenceData;
use crate::region::filter_locations;
use crate::scorer::{score_locations, ScorerConfig};
use crate::{RecommendationRequest, RecommendationResult};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Rank results by score descending and keep the top `limit`
///
/// The sort is stable, so equal scores keep their filtered order.
pub fn rank(mut scored: Vec<RecommendationResult>, limit: usize) -> Vec<RecommendationResult> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Recommend locations with the default scoring configuration
pub fn recommend(
    request: &RecommendationRequest,
    data: &ReferenceData,
) -> Vec<RecommendationResult> {
    recommend_with(request, data, &ScorerConfig::default())
}

/// Recommend locations for a request
///
/// Pure and deterministic: the reference data is only read, and an empty
/// candidate set yields an empty list rather than an error.
pub fn recommend_with(
    request: &RecommendationRequest,
    data: &ReferenceData,
    config: &ScorerConfig,
) -> Vec<RecommendationResult> {
    let candidates = filter_locations(&request.selected_regions, data.regions(), data.locations());

    info!(
        "Scoring {} of {} locations for {} ({} agents)",
        candidates.len(),
        data.locations().len(),
        request.service_type,
        request.agent_count
    );

    if candidates.is_empty() {
        debug!("No locations match regions {:?}", request.selected_regions);
        return Vec::new();
    }

    let scored = score_locations(&candidates, request, data, config);
    rank(scored, config.max_results)
}
