//! Immutable reference tables shared by every recommendation request

use crate::{
    Location, RecommenderError, Region, Result, ServiceType, UsHourlyRate, DEFAULT_SERVICE_TYPE,
};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// The five reference tables, validated once at construction
#[derive(Debug, Clone)]
pub struct ReferenceData {
    locations: Vec<Location>,
    service_types: Vec<ServiceType>,
    us_hourly_rates: HashMap<String, UsHourlyRate>,
    service_location_strengths: HashMap<String, HashSet<String>>,
    regions: Vec<Region>,
    default_baseline: UsHourlyRate,
}

impl ReferenceData {
    /// Validate and assemble the reference tables
    ///
    /// Fails when the default baseline is missing, a baseline is not strictly
    /// positive, or two locations share an id.
    pub fn new(
        locations: Vec<Location>,
        service_types: Vec<ServiceType>,
        us_hourly_rates: HashMap<String, UsHourlyRate>,
        service_location_strengths: HashMap<String, Vec<String>>,
        regions: Vec<Region>,
    ) -> Result<Self> {
        for (service, rate) in &us_hourly_rates {
            let valid = rate.midpoint.is_finite()
                && rate.midpoint > 0.0
                && rate.min > 0.0
                && rate.min <= rate.max;
            if !valid {
                return Err(RecommenderError::InvalidBaseline {
                    service: service.clone(),
                    min: rate.min,
                    max: rate.max,
                    midpoint: rate.midpoint,
                });
            }
        }

        let default_baseline = *us_hourly_rates
            .get(DEFAULT_SERVICE_TYPE)
            .ok_or_else(|| {
                RecommenderError::MissingDefaultBaseline(DEFAULT_SERVICE_TYPE.to_string())
            })?;

        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.id.as_str()) {
                return Err(RecommenderError::DuplicateLocation(location.id.clone()));
            }
        }

        let grouped: HashSet<&str> = regions
            .iter()
            .flat_map(|r| r.location_ids.iter().map(String::as_str))
            .collect();
        for location in &locations {
            if !grouped.contains(location.id.as_str()) {
                warn!("Location {} is not part of any region grouping", location.id);
            }
        }

        let service_location_strengths = service_location_strengths
            .into_iter()
            .map(|(service, ids)| (service, ids.into_iter().collect()))
            .collect();

        Ok(Self {
            locations,
            service_types,
            us_hourly_rates,
            service_location_strengths,
            regions,
            default_baseline,
        })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn service_types(&self) -> &[ServiceType] {
        &self.service_types
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Whether the service type has its own baseline rate
    pub fn is_known_service(&self, service: &str) -> bool {
        self.us_hourly_rates.contains_key(service)
    }

    /// Display label for a service type, or the raw key if unknown
    pub fn service_label<'a>(&'a self, service: &'a str) -> &'a str {
        self.service_types
            .iter()
            .find(|s| s.value == service)
            .map(|s| s.label.as_str())
            .unwrap_or(service)
    }

    /// US baseline for a service type, falling back to customer service
    pub fn baseline_for(&self, service: &str) -> &UsHourlyRate {
        self.us_hourly_rates
            .get(service)
            .unwrap_or(&self.default_baseline)
    }

    /// Whether the location is a top performer for the service type
    pub fn is_strength(&self, service: &str, location_id: &str) -> bool {
        self.service_location_strengths
            .get(service)
            .is_some_and(|ids| ids.contains(location_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnglishProficiency, RateRange};

    fn location(id: &str) -> Location {
        Location {
            id: id.to_string(),
            country: id.to_string(),
            region: "Southeast Asia".to_string(),
            flag: String::new(),
            timezone: String::new(),
            english_proficiency: EnglishProficiency::High,
            infrastructure_rating: 3,
            rate_range: RateRange::new(5.0, 8.0),
            pros: vec![],
            specializations: vec![],
            description: String::new(),
        }
    }

    fn rates() -> HashMap<String, UsHourlyRate> {
        HashMap::from([
            (
                "customer-service".to_string(),
                UsHourlyRate {
                    min: 22.0,
                    max: 34.0,
                    midpoint: 28.0,
                },
            ),
            (
                "sales".to_string(),
                UsHourlyRate {
                    min: 25.0,
                    max: 45.0,
                    midpoint: 35.0,
                },
            ),
        ])
    }

    fn service_types() -> Vec<ServiceType> {
        vec![ServiceType {
            value: "sales".to_string(),
            label: "Sales".to_string(),
        }]
    }

    #[test]
    fn test_baseline_fallback() {
        let data = ReferenceData::new(vec![location("a")], vec![], rates(), HashMap::new(), vec![])
            .unwrap();
        assert_eq!(data.baseline_for("sales").midpoint, 35.0);
        assert_eq!(data.baseline_for("unknown").midpoint, 28.0);
        assert!(!data.is_known_service("unknown"));
    }

    #[test]
    fn test_service_label_fallback() {
        let data =
            ReferenceData::new(vec![], service_types(), rates(), HashMap::new(), vec![]).unwrap();
        assert_eq!(data.service_label("sales"), "Sales");
        assert_eq!(data.service_label("data-entry"), "data-entry");
    }

    #[test]
    fn test_missing_default_baseline() {
        let mut rates = rates();
        rates.remove("customer-service");
        let err = ReferenceData::new(vec![], vec![], rates, HashMap::new(), vec![]).unwrap_err();
        assert!(matches!(err, RecommenderError::MissingDefaultBaseline(_)));
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let mut rates = rates();
        rates.insert(
            "sales".to_string(),
            UsHourlyRate {
                min: 0.0,
                max: 0.0,
                midpoint: 0.0,
            },
        );
        let err = ReferenceData::new(vec![], vec![], rates, HashMap::new(), vec![]).unwrap_err();
        assert!(matches!(err, RecommenderError::InvalidBaseline { .. }));
    }

    #[test]
    fn test_duplicate_location_rejected() {
        let err = ReferenceData::new(
            vec![location("a"), location("a")],
            vec![],
            rates(),
            HashMap::new(),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RecommenderError::DuplicateLocation(id) if id == "a"));
    }

    #[test]
    fn test_strength_lookup() {
        let strengths = HashMap::from([("sales".to_string(), vec!["a".to_string()])]);
        let data = ReferenceData::new(vec![location("a")], vec![], rates(), strengths, vec![])
            .unwrap();
        assert!(data.is_strength("sales", "a"));
        assert!(!data.is_strength("sales", "b"));
        assert!(!data.is_strength("tech-support", "a"));
    }
}
