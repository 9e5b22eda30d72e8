//! In-house vs outsourced ROI comparison for the top recommendation
//!
//! ```text
//! in_house_annual   = us_midpoint · H · n · 12
//! benefits_savings  = round(in_house_annual · benefits_loading)
//! infra_savings     = n · infra_cost_per_agent · 12
//! labor_savings     = in_house_annual − top_midpoint · H · n · 12
//! total             = labor_savings + benefits_savings + infra_savings
//! ```

use crate::reference::ReferenceData;
use crate::{
    round_half_up, CostRange, RateRange, RecommendationRequest, RecommendationResult,
    MONTHLY_HOURS,
};
use serde::{Deserialize, Serialize};

/// Share of in-house wages added for benefits
pub const BENEFITS_LOADING: f64 = 0.25;

/// Monthly in-house infrastructure cost per agent (USD)
pub const INFRASTRUCTURE_COST_PER_AGENT: f64 = 500.0;

/// ROI calculator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub benefits_loading: f64,
    pub infrastructure_cost_per_agent: f64,
    /// Must match the scorer's monthly hours
    pub monthly_hours: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            benefits_loading: BENEFITS_LOADING,
            infrastructure_cost_per_agent: INFRASTRUCTURE_COST_PER_AGENT,
            monthly_hours: MONTHLY_HOURS,
        }
    }
}

/// Side-by-side cost of staffing in-house vs the top-ranked location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiComparison {
    pub agent_count: u32,
    pub service_label: String,
    pub us_rate: RateRange,

    pub in_house_monthly: f64,
    pub in_house_benefits_monthly: f64,
    pub in_house_infrastructure_monthly: f64,
    pub in_house_annual: f64,
    pub in_house_total_annual: f64,

    pub outsourced_country: String,
    pub outsourced_rate: RateRange,
    pub outsourced_monthly: CostRange,
    pub outsourced_annual: CostRange,

    pub labor_savings: f64,
    pub benefits_savings: f64,
    pub infrastructure_savings: f64,
    pub total_potential_savings: f64,
    pub savings_percent: i64,
}

impl RoiComparison {
    /// Compare against the first result; `None` when there are no results
    pub fn from_top_result(
        request: &RecommendationRequest,
        data: &ReferenceData,
        results: &[RecommendationResult],
        config: &RoiConfig,
    ) -> Option<Self> {
        let top = results.first()?;
        let baseline = data.baseline_for(&request.service_type);
        let agents = f64::from(request.agent_count);
        let hours_agents = config.monthly_hours * agents;

        let in_house_monthly = baseline.midpoint * hours_agents;
        let in_house_annual = in_house_monthly * 12.0;
        let benefits_savings = round_half_up(in_house_annual * config.benefits_loading);
        let infrastructure_monthly = agents * config.infrastructure_cost_per_agent;
        let infrastructure_savings = infrastructure_monthly * 12.0;

        let rate = top.location.rate_range;
        let outsourced_monthly = CostRange {
            min: rate.min * hours_agents,
            max: rate.max * hours_agents,
        };
        let outsourced_annual_midpoint = top.rate_midpoint * hours_agents * 12.0;

        let labor_savings = in_house_annual - outsourced_annual_midpoint;

        Some(Self {
            agent_count: request.agent_count,
            service_label: data.service_label(&request.service_type).to_string(),
            us_rate: RateRange::new(baseline.min, baseline.max),
            in_house_monthly,
            in_house_benefits_monthly: in_house_monthly * config.benefits_loading,
            in_house_infrastructure_monthly: infrastructure_monthly,
            in_house_annual,
            in_house_total_annual: in_house_annual + benefits_savings + infrastructure_savings,
            outsourced_country: top.location.country.clone(),
            outsourced_rate: rate,
            outsourced_monthly,
            outsourced_annual: CostRange {
                min: outsourced_monthly.min * 12.0,
                max: outsourced_monthly.max * 12.0,
            },
            labor_savings,
            benefits_savings,
            infrastructure_savings,
            total_potential_savings: labor_savings + benefits_savings + infrastructure_savings,
            savings_percent: round_half_up(labor_savings / in_house_annual * 100.0) as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{recommend, EnglishProficiency, Location, ServiceType, UsHourlyRate};
    use std::collections::HashMap;

    fn make_data() -> ReferenceData {
        let location = Location {
            id: "manila".to_string(),
            country: "Philippines".to_string(),
            region: "Southeast Asia".to_string(),
            flag: String::new(),
            timezone: String::new(),
            english_proficiency: EnglishProficiency::High,
            infrastructure_rating: 4,
            rate_range: RateRange::new(4.0, 6.0),
            pros: vec![],
            specializations: vec![],
            description: String::new(),
        };
        let rates = HashMap::from([(
            "customer-service".to_string(),
            UsHourlyRate {
                min: 22.0,
                max: 34.0,
                midpoint: 28.0,
            },
        )]);
        let service_types = vec![ServiceType {
            value: "customer-service".to_string(),
            label: "Customer Service".to_string(),
        }];
        ReferenceData::new(vec![location], service_types, rates, HashMap::new(), vec![]).unwrap()
    }

    #[test]
    fn test_roi_breakdown() {
        let data = make_data();
        let request = RecommendationRequest::new(10, "customer-service", vec![]);
        let results = recommend(&request, &data);
        let roi = RoiComparison::from_top_result(&request, &data, &results, &RoiConfig::default())
            .unwrap();

        assert_eq!(roi.service_label, "Customer Service");
        assert_eq!(roi.in_house_monthly, 48440.0);
        assert_eq!(roi.in_house_annual, 581280.0);
        assert_eq!(roi.in_house_benefits_monthly, 12110.0);
        assert_eq!(roi.benefits_savings, 145320.0);
        assert_eq!(roi.in_house_infrastructure_monthly, 5000.0);
        assert_eq!(roi.infrastructure_savings, 60000.0);
        assert_eq!(roi.in_house_total_annual, 786600.0);

        assert_eq!(roi.outsourced_country, "Philippines");
        assert_eq!(
            roi.outsourced_monthly,
            CostRange {
                min: 6920.0,
                max: 10380.0
            }
        );
        assert_eq!(
            roi.outsourced_annual,
            CostRange {
                min: 83040.0,
                max: 124560.0
            }
        );

        // 581280 − 8650·12
        assert_eq!(roi.labor_savings, 477480.0);
        assert_eq!(roi.total_potential_savings, 682800.0);
        assert_eq!(roi.savings_percent, 82);
    }

    #[test]
    fn test_roi_matches_engine_projection() {
        let data = make_data();
        let request = RecommendationRequest::new(37, "customer-service", vec![]);
        let results = recommend(&request, &data);
        let roi = RoiComparison::from_top_result(&request, &data, &results, &RoiConfig::default())
            .unwrap();

        assert_eq!(roi.outsourced_monthly, results[0].estimated_monthly_cost_range);
        assert_eq!(roi.savings_percent, results[0].savings_percentage);
    }

    #[test]
    fn test_roi_requires_results() {
        let data = make_data();
        let request = RecommendationRequest::new(10, "customer-service", vec![]);
        let roi = RoiComparison::from_top_result(&request, &data, &[], &RoiConfig::default());
        assert!(roi.is_none());
    }
}
