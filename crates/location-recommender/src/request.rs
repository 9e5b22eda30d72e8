//! Recommendation request and input-boundary coercion

use crate::DEFAULT_AGENT_COUNT;
use serde::{Deserialize, Serialize};

/// A single submission: headcount, service type and region selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub agent_count: u32,
    pub service_type: String,
    /// Empty, or containing [`crate::ALL_REGIONS`], means no filtering
    #[serde(default)]
    pub selected_regions: Vec<String>,
}

impl RecommendationRequest {
    pub fn new(
        agent_count: u32,
        service_type: impl Into<String>,
        selected_regions: Vec<String>,
    ) -> Self {
        Self {
            agent_count,
            service_type: service_type.into(),
            selected_regions,
        }
    }
}

/// Parse a free-form headcount, defaulting to [`DEFAULT_AGENT_COUNT`]
///
/// Reads the leading integer (`"12 agents"` → 12). Empty, non-numeric,
/// zero or negative input yields the default.
pub fn parse_agent_count(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(count) if count > 0 => count,
        _ => DEFAULT_AGENT_COUNT,
    }
}
