use std::collections::HashMap;

use crate::model::{CountryComposerCount, CountryLocation, LocationCount, LocationJoinOutput};

/// Inner join of per-country counts with the location table on exact country name.
///
/// Counts keep their input order. A count with no location row goes to
/// `unlocated` instead of failing. If the location table lists a country
/// twice, the first row is used.
pub fn join_locations(
    counts: &[CountryComposerCount],
    locations: &[CountryLocation],
) -> LocationJoinOutput {
    let mut by_name: HashMap<&str, &CountryLocation> = HashMap::new();
    for loc in locations {
        by_name.entry(loc.name.as_str()).or_insert(loc);
    }

    let mut out = LocationJoinOutput::default();

    for count in counts {
        match by_name.get(count.country.as_str()) {
            Some(loc) => out.located.push(LocationCount {
                country: count.country.clone(),
                country_code: loc.country_code.clone(),
                composer_count: count.composer_count,
                latitude: loc.latitude,
                longitude: loc.longitude,
            }),
            None => out.unlocated.push(count.clone()),
        }
    }

    out
}
