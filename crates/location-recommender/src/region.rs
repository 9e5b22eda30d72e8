//! Region selection to allowed location ids

use crate::{Location, Region, ALL_REGIONS};
use std::collections::HashSet;
use tracing::debug;

/// Whether the selection means "no region filtering"
pub fn selects_all(selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|token| token == ALL_REGIONS)
}

/// Resolve region selector tokens into the set of allowed location ids
///
/// An empty selection, or one containing [`ALL_REGIONS`], allows every
/// location without consulting the region groupings. Otherwise the member
/// ids of each known region are unioned; unknown tokens are ignored, so a
/// selection of only unknown tokens allows nothing.
pub fn allowed_location_ids<'a>(
    selected: &[String],
    regions: &'a [Region],
    locations: &'a [Location],
) -> HashSet<&'a str> {
    if selects_all(selected) {
        return locations.iter().map(|l| l.id.as_str()).collect();
    }

    let mut allowed = HashSet::new();
    for token in selected {
        match regions.iter().find(|r| &r.id == token) {
            Some(region) => allowed.extend(region.location_ids.iter().map(String::as_str)),
            None => debug!("Ignoring unknown region selector {:?}", token),
        }
    }
    allowed
}

/// Locations allowed by the selection, in reference table order
pub fn filter_locations<'a>(
    selected: &[String],
    regions: &'a [Region],
    locations: &'a [Location],
) -> Vec<&'a Location> {
    let allowed = allowed_location_ids(selected, regions, locations);
    locations
        .iter()
        .filter(|l| allowed.contains(l.id.as_str()))
        .collect()
}
