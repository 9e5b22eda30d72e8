//! Location scoring and cost projection
//!
//! Implements the additive scoring model:
//! Score(loc) = base + strength + english + max(0, ceiling − r̄) + k·infra + nearshore
//!
//! Each bonus that applies may contribute a match reason. Reasons are then
//! backfilled from the location's own pros up to `max_reasons`.

use crate::reference::ReferenceData;
use crate::{
    round_half_up, CostRange, EnglishProficiency, Location, RecommendationRequest,
    RecommendationResult, MAX_RESULTS, MONTHLY_HOURS,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Starting score for every candidate
pub const BASE_SCORE: f64 = 50.0;
/// Bonus for a top performer in the requested service
pub const STRENGTH_BONUS: f64 = 25.0;
pub const NATIVE_ENGLISH_BONUS: f64 = 20.0;
pub const HIGH_ENGLISH_BONUS: f64 = 15.0;
/// Rate midpoint at which the cost bonus reaches zero
pub const COST_CEILING: f64 = 25.0;
/// Minimum savings percentage that earns a savings reason
pub const SAVINGS_REASON_THRESHOLD: f64 = 50.0;
pub const INFRASTRUCTURE_MULTIPLIER: f64 = 3.0;
pub const NEARSHORE_BONUS: f64 = 10.0;
pub const MAX_REASONS: usize = 4;

const NEARSHORE_REASON: &str = "Nearshore location with US timezone alignment";

/// Scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub base_score: f64,
    pub strength_bonus: f64,
    pub native_english_bonus: f64,
    pub high_english_bonus: f64,
    pub cost_ceiling: f64,
    pub savings_reason_threshold: f64,
    pub infrastructure_multiplier: f64,
    pub nearshore_bonus: f64,
    /// Free-text location regions that qualify as nearshore
    pub nearshore_regions: Vec<String>,
    /// Service types that receive the nearshore bonus
    pub nearshore_services: Vec<String>,
    pub max_reasons: usize,
    pub max_results: usize,
    pub monthly_hours: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            base_score: BASE_SCORE,
            strength_bonus: STRENGTH_BONUS,
            native_english_bonus: NATIVE_ENGLISH_BONUS,
            high_english_bonus: HIGH_ENGLISH_BONUS,
            cost_ceiling: COST_CEILING,
            savings_reason_threshold: SAVINGS_REASON_THRESHOLD,
            infrastructure_multiplier: INFRASTRUCTURE_MULTIPLIER,
            nearshore_bonus: NEARSHORE_BONUS,
            nearshore_regions: vec![
                "Latin America".to_string(),
                "Central America".to_string(),
                "Caribbean".to_string(),
            ],
            nearshore_services: vec!["sales".to_string(), "customer-service".to_string()],
            max_reasons: MAX_REASONS,
            max_results: MAX_RESULTS,
            monthly_hours: MONTHLY_HOURS,
        }
    }
}

impl ScorerConfig {
    fn is_nearshore(&self, service: &str, location: &Location) -> bool {
        self.nearshore_services.iter().any(|s| s == service)
            && self.nearshore_regions.iter().any(|r| *r == location.region)
    }
}

/// Values computed once per request and shared by every candidate
struct RequestContext<'a> {
    service: &'a str,
    service_label: &'a str,
    agents: f64,
    us_midpoint: f64,
    us_monthly_midpoint: f64,
}

/// Score every candidate, preserving input order
pub fn score_locations(
    candidates: &[&Location],
    request: &RecommendationRequest,
    data: &ReferenceData,
    config: &ScorerConfig,
) -> Vec<RecommendationResult> {
    let baseline = data.baseline_for(&request.service_type);
    let agents = f64::from(request.agent_count);
    let ctx = RequestContext {
        service: &request.service_type,
        service_label: data.service_label(&request.service_type),
        agents,
        us_midpoint: baseline.midpoint,
        us_monthly_midpoint: baseline.midpoint * config.monthly_hours * agents,
    };

    candidates
        .iter()
        .map(|location| {
            let strength = data.is_strength(ctx.service, &location.id);
            score_location(location, strength, &ctx, config)
        })
        .collect()
}

/// Score a single location
fn score_location(
    location: &Location,
    strength: bool,
    ctx: &RequestContext<'_>,
    config: &ScorerConfig,
) -> RecommendationResult {
    let mut score = config.base_score;
    let mut reasons: Vec<String> = Vec::new();

    if strength {
        score += config.strength_bonus;
        reasons.insert(0, format!("Top performer for {}", ctx.service_label));
    }

    match location.english_proficiency {
        EnglishProficiency::Native => {
            score += config.native_english_bonus;
            reasons.push("Native English speakers".to_string());
        }
        EnglishProficiency::High => {
            score += config.high_english_bonus;
            reasons.push("High English proficiency".to_string());
        }
        _ => {}
    }

    let rate_midpoint = location.rate_range.midpoint();
    let cost_score = (config.cost_ceiling - rate_midpoint).max(0.0);
    score += cost_score;

    let savings_vs_us = round_half_up((ctx.us_midpoint - rate_midpoint) / ctx.us_midpoint * 100.0);
    if savings_vs_us >= config.savings_reason_threshold {
        reasons.push(format!("{}% cost savings vs US rates", savings_vs_us as i64));
    }

    let infrastructure_score =
        f64::from(location.infrastructure_rating) * config.infrastructure_multiplier;
    score += infrastructure_score;

    let nearshore = config.is_nearshore(ctx.service, location);
    if nearshore {
        score += config.nearshore_bonus;
        if !reasons.iter().any(|r| mentions_time_zone(r)) {
            reasons.push(NEARSHORE_REASON.to_string());
        }
    }

    for pro in &location.pros {
        if reasons.len() >= config.max_reasons {
            break;
        }
        if !reasons.contains(pro) {
            reasons.push(pro.clone());
        }
    }
    reasons.truncate(config.max_reasons);

    let hours_agents = config.monthly_hours * ctx.agents;
    let monthly_min = location.rate_range.min * hours_agents;
    let monthly_max = location.rate_range.max * hours_agents;
    let monthly_midpoint = rate_midpoint * hours_agents;
    let savings_percentage = round_half_up(
        (ctx.us_monthly_midpoint - monthly_midpoint) / ctx.us_monthly_midpoint * 100.0,
    );

    let us_annual = ctx.us_monthly_midpoint * 12.0;

    debug!(
        "Scored {}: {:.2} (strength={}, english={}, cost={:.2}, infra={:.0}, nearshore={})",
        location.id,
        score,
        strength,
        location.english_proficiency,
        cost_score,
        infrastructure_score,
        nearshore
    );

    RecommendationResult {
        location: location.clone(),
        score,
        match_reasons: reasons,
        estimated_monthly_cost_range: CostRange {
            min: monthly_min,
            max: monthly_max,
        },
        estimated_annual_savings_range: CostRange {
            min: us_annual - monthly_max * 12.0,
            max: us_annual - monthly_min * 12.0,
        },
        savings_percentage: savings_percentage as i64,
        rate_midpoint,
    }
}

fn mentions_time_zone(reason: &str) -> bool {
    let lower = reason.to_ascii_lowercase();
    lower.contains("time zone") || lower.contains("timezone")
}
