//! Outsourcing Location Recommender
//!
//! Scores candidate outsourcing locations for a service type and headcount,
//! ranks them, and projects their cost against an in-house US baseline.
//!
//! # Scoring Model
//!
//! ```text
//! Score(loc) = 50 + S + E + max(0, 25 − r̄) + 3·I + N
//! ```
//!
//! | Factor | Points | Description |
//! |--------|--------|-------------|
//! | S      | 25     | Location is a top performer for the service type |
//! | E      | 20/15  | Native / High English proficiency |
//! | r̄      | 0-25   | Cost bonus from the hourly rate midpoint |
//! | I      | 3-15   | Infrastructure rating (1-5) × 3 |
//! | N      | 10     | Nearshore bonus (sales / customer-service only) |
//!
//! # Cost Projection
//!
//! All monthly figures assume [`MONTHLY_HOURS`] hours per agent. Savings are
//! measured against the US baseline midpoint for the requested service type,
//! falling back to [`DEFAULT_SERVICE_TYPE`] when the service has no baseline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod loader;
pub mod reference;
pub mod region;
pub mod report;
pub mod request;
pub mod roi;
pub mod scorer;
pub mod selector;
pub mod session;

pub use reference::ReferenceData;
pub use request::{parse_agent_count, RecommendationRequest};
pub use roi::{RoiComparison, RoiConfig};
pub use scorer::ScorerConfig;
pub use selector::{recommend, recommend_with};

/// Working hours per agent per month
pub const MONTHLY_HOURS: f64 = 173.0;

/// Region selector token meaning "no region filtering"
pub const ALL_REGIONS: &str = "all";

/// Service type whose baseline is used when the requested one has none
pub const DEFAULT_SERVICE_TYPE: &str = "customer-service";

/// Headcount substituted for unparseable agent counts at the input boundary
pub const DEFAULT_AGENT_COUNT: u32 = 50;

/// Maximum number of ranked results returned
pub const MAX_RESULTS: usize = 4;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read {file}: {source}")]
    Table {
        file: String,
        #[source]
        source: Box<RecommenderError>,
    },
    #[error("No usable locations in reference data")]
    NoLocations,
    #[error("Missing baseline rate for default service type {0:?}")]
    MissingDefaultBaseline(String),
    #[error("Invalid baseline rate for {service:?}: min={min}, max={max}, midpoint={midpoint}")]
    InvalidBaseline {
        service: String,
        min: f64,
        max: f64,
        midpoint: f64,
    },
    #[error("Duplicate location id {0:?}")]
    DuplicateLocation(String),
}

pub type Result<T> = std::result::Result<T, RecommenderError>;

/// English proficiency tier of a location's workforce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnglishProficiency {
    Native,
    High,
    Moderate,
    /// Any other label, preserved verbatim
    Other(String),
}

impl EnglishProficiency {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Native => "Native",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EnglishProficiency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Native" => Self::Native,
            "High" => Self::High,
            "Moderate" => Self::Moderate,
            _ => Self::Other(value),
        }
    }
}

impl From<EnglishProficiency> for String {
    fn from(value: EnglishProficiency) -> Self {
        match value {
            EnglishProficiency::Other(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EnglishProficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hourly rate range in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    pub min: f64,
    pub max: f64,
}

impl RateRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Arithmetic mean of min and max
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Both bounds positive and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

/// An outsourcing candidate location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub country: String,
    /// Free-text geographic region, independent of [`Region`] groupings
    pub region: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub timezone: String,
    pub english_proficiency: EnglishProficiency,
    /// 1-5
    pub infrastructure_rating: u8,
    pub rate_range: RateRange,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Business function offered for outsourcing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub value: String,
    pub label: String,
}

/// In-house US hourly rate for one service type
///
/// Only `midpoint` takes part in comparisons; `min`/`max` are for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsHourlyRate {
    pub min: f64,
    pub max: f64,
    pub midpoint: f64,
}

/// Named grouping of locations used for filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_ids: Vec<String>,
}

/// Min/max money range in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

/// A scored location with its cost projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    #[serde(flatten)]
    pub location: Location,
    pub score: f64,
    /// Up to four reasons; displays show the first three
    pub match_reasons: Vec<String>,
    pub estimated_monthly_cost_range: CostRange,
    /// Lower bound comes from the location's max rate and may be negative
    pub estimated_annual_savings_range: CostRange,
    pub savings_percentage: i64,
    pub rate_midpoint: f64,
}

/// Round half toward positive infinity (`-2.5` → `-2`, `2.5` → `3`)
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_range_midpoint() {
        assert_eq!(RateRange::new(4.0, 6.0).midpoint(), 5.0);
        assert_eq!(RateRange::new(7.0, 12.0).midpoint(), 9.5);
    }

    #[test]
    fn test_rate_range_validity() {
        assert!(RateRange::new(4.0, 6.0).is_valid());
        assert!(RateRange::new(5.0, 5.0).is_valid());
        assert!(!RateRange::new(6.0, 4.0).is_valid());
        assert!(!RateRange::new(0.0, 4.0).is_valid());
        assert!(!RateRange::new(f64::NAN, 4.0).is_valid());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(82.14), 82.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_english_proficiency_labels() {
        let native: EnglishProficiency = serde_json::from_str("\"Native\"").unwrap();
        assert_eq!(native, EnglishProficiency::Native);

        let other: EnglishProficiency = serde_json::from_str("\"Basic\"").unwrap();
        assert_eq!(other, EnglishProficiency::Other("Basic".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"Basic\"");
    }

    #[test]
    fn test_result_serializes_flat() {
        let location = Location {
            id: "manila".to_string(),
            country: "Philippines".to_string(),
            region: "Southeast Asia".to_string(),
            flag: String::new(),
            timezone: "GMT+8".to_string(),
            english_proficiency: EnglishProficiency::High,
            infrastructure_rating: 4,
            rate_range: RateRange::new(4.0, 6.0),
            pros: vec![],
            specializations: vec![],
            description: String::new(),
        };
        let result = RecommendationResult {
            location,
            score: 100.0,
            match_reasons: vec![],
            estimated_monthly_cost_range: CostRange { min: 1.0, max: 2.0 },
            estimated_annual_savings_range: CostRange { min: 3.0, max: 4.0 },
            savings_percentage: 82,
            rate_midpoint: 5.0,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "manila");
        assert_eq!(json["englishProficiency"], "High");
        assert_eq!(json["savingsPercentage"], 82);
        assert_eq!(json["estimatedAnnualSavingsRange"]["max"], 4.0);
    }
}
