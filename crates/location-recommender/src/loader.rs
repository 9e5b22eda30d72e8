//! Reference data loading from JSON files

use crate::reference::ReferenceData;
use crate::{
    EnglishProficiency, Location, RateRange, RecommenderError, Region, Result, ServiceType,
    UsHourlyRate,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

pub const LOCATIONS_FILE: &str = "locations.json";
pub const SERVICE_TYPES_FILE: &str = "service-types.json";
pub const US_HOURLY_RATES_FILE: &str = "us-hourly-rates.json";
pub const STRENGTHS_FILE: &str = "service-location-strengths.json";
pub const REGIONS_FILE: &str = "regions.json";

/// Sanitize ID (alphanumeric, dash, underscore only)
fn sanitize_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(128)
        .collect()
}

/// Raw rate range; either bound may be absent
#[derive(Debug, Deserialize)]
struct RawRateRange {
    min: Option<f64>,
    max: Option<f64>,
}

/// Raw location from JSON
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    id: Option<String>,
    country: Option<String>,
    region: Option<String>,
    flag: Option<String>,
    timezone: Option<String>,
    english_proficiency: Option<String>,
    infrastructure_rating: Option<f64>,
    rate_range: Option<RawRateRange>,
    pros: Option<Vec<String>>,
    specializations: Option<Vec<String>>,
    description: Option<String>,
}

impl RawLocation {
    /// Convert into a validated location, or the reason it was rejected
    fn into_location(self) -> std::result::Result<Location, String> {
        let id = self
            .id
            .as_deref()
            .map(sanitize_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "missing id".to_string())?;

        let rate_range = match self.rate_range {
            Some(RawRateRange {
                min: Some(min),
                max: Some(max),
            }) => RateRange::new(min, max),
            Some(_) => return Err(format!("{}: incomplete rate range", id)),
            None => return Err(format!("{}: missing rate range", id)),
        };
        if !rate_range.is_valid() {
            return Err(format!(
                "{}: invalid rate range {}-{}",
                id, rate_range.min, rate_range.max
            ));
        }

        let infrastructure_rating = match self.infrastructure_rating {
            Some(r) if r.fract() == 0.0 && (1.0..=5.0).contains(&r) => r as u8,
            Some(r) => {
                return Err(format!(
                    "{}: infrastructure rating {} is not a whole number in 1-5",
                    id, r
                ))
            }
            None => return Err(format!("{}: missing infrastructure rating", id)),
        };

        Ok(Location {
            country: self.country.unwrap_or_else(|| id.clone()),
            region: self.region.unwrap_or_default(),
            flag: self.flag.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_default(),
            english_proficiency: EnglishProficiency::from(
                self.english_proficiency.unwrap_or_default(),
            ),
            infrastructure_rating,
            rate_range,
            pros: self.pros.unwrap_or_default(),
            specializations: self.specializations.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            id,
        })
    }
}

/// Raw region grouping from JSON
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRegion {
    id: Option<String>,
    label: Option<String>,
    name: Option<String>,
    flag: Option<String>,
    description: Option<String>,
    location_ids: Option<Vec<String>>,
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let wrap = |source: RecommenderError| RecommenderError::Table {
        file: path.display().to_string(),
        source: Box::new(source),
    };

    let reader = BufReader::new(File::open(&path).map_err(|e| wrap(e.into()))?);
    serde_json::from_reader(reader).map_err(|e| wrap(e.into()))
}

/// Load locations, skipping entries that fail validation
///
/// Rows are decoded one at a time, so a row of the wrong shape is skipped
/// like any other invalid row. Only a file that is not a JSON array fails.
pub fn load_locations(dir: impl AsRef<Path>) -> Result<Vec<Location>> {
    let dir = dir.as_ref();
    info!("Loading locations from {:?}", dir.join(LOCATIONS_FILE));

    let rows: Vec<serde_json::Value> = read_table(dir, LOCATIONS_FILE)?;
    let mut locations = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawLocation>(row)
            .map_err(|e| format!("row {}: {}", index, e))
            .and_then(RawLocation::into_location);
        match parsed {
            Ok(location) => locations.push(location),
            Err(reason) => {
                warn!("Skipping location: {}", reason);
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} locations ({} skipped as invalid)",
        locations.len(),
        skipped
    );

    if locations.is_empty() {
        return Err(RecommenderError::NoLocations);
    }
    Ok(locations)
}

pub fn load_service_types(dir: impl AsRef<Path>) -> Result<Vec<ServiceType>> {
    let service_types: Vec<ServiceType> = read_table(dir.as_ref(), SERVICE_TYPES_FILE)?;
    info!("Loaded {} service types", service_types.len());
    Ok(service_types)
}

pub fn load_us_hourly_rates(dir: impl AsRef<Path>) -> Result<HashMap<String, UsHourlyRate>> {
    let rates: HashMap<String, UsHourlyRate> = read_table(dir.as_ref(), US_HOURLY_RATES_FILE)?;
    info!("Loaded US baselines for {} service types", rates.len());
    Ok(rates)
}

pub fn load_strengths(dir: impl AsRef<Path>) -> Result<HashMap<String, Vec<String>>> {
    let strengths: HashMap<String, Vec<String>> = read_table(dir.as_ref(), STRENGTHS_FILE)?;
    Ok(strengths
        .into_iter()
        .map(|(service, ids)| (service, ids.iter().map(|id| sanitize_id(id)).collect()))
        .collect())
}

/// Load region groupings; entries without an id are dropped
pub fn load_regions(dir: impl AsRef<Path>) -> Result<Vec<Region>> {
    let raw: Vec<RawRegion> = read_table(dir.as_ref(), REGIONS_FILE)?;
    let mut skipped = 0;

    let regions: Vec<Region> = raw
        .into_iter()
        .filter_map(|r| {
            let id = r.id.as_deref().map(sanitize_id).filter(|id| !id.is_empty());
            let Some(id) = id else {
                skipped += 1;
                return None;
            };
            Some(Region {
                label: r.label.or(r.name).unwrap_or_else(|| id.clone()),
                flag: r.flag.unwrap_or_default(),
                description: r.description.unwrap_or_default(),
                location_ids: r
                    .location_ids
                    .unwrap_or_default()
                    .iter()
                    .map(|id| sanitize_id(id))
                    .collect(),
                id,
            })
        })
        .collect();

    info!("Loaded {} regions ({} skipped without id)", regions.len(), skipped);
    Ok(regions)
}

/// Load and validate all five reference tables from `dir`
pub fn load_reference_data(dir: impl AsRef<Path>) -> Result<ReferenceData> {
    let dir = dir.as_ref();
    let data = ReferenceData::new(
        load_locations(dir)?,
        load_service_types(dir)?,
        load_us_hourly_rates(dir)?,
        load_strengths(dir)?,
        load_regions(dir)?,
    )?;

    info!(
        "Reference data ready: {} locations, {} regions, {} service types",
        data.locations().len(),
        data.regions().len(),
        data.service_types().len()
    );

    Ok(data)
}
