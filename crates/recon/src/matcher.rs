use std::collections::HashMap;

use crate::config::DuplicatePolicy;
use crate::error::ReconError;
use crate::model::{AmbiguousMapping, ComposerCountry, ComposerCountryEntry, ComposerMatchOutput};

/// Distinct countries per composer name, in mapping-table order.
fn index_mapping(entries: &[ComposerCountryEntry]) -> HashMap<&str, Vec<&str>> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for entry in entries {
        let countries = index.entry(entry.composer_or_artist_name.as_str()).or_default();
        if !countries.contains(&entry.country.as_str()) {
            countries.push(entry.country.as_str());
        }
    }
    index
}

/// Match each unique composer to at most one country by exact name equality.
///
/// Every input composer lands in exactly one of `matched` or `unmatched`, in
/// input order. A name listed with conflicting countries fails the match under
/// [`DuplicatePolicy::Reject`]; under [`DuplicatePolicy::First`] the first
/// listed country is used and the conflict is reported in `ambiguous`.
pub fn match_composer_countries(
    unique_composers: &[String],
    entries: &[ComposerCountryEntry],
    policy: DuplicatePolicy,
) -> Result<ComposerMatchOutput, ReconError> {
    let index = index_mapping(entries);

    let mut out = ComposerMatchOutput::default();

    for composer in unique_composers {
        let Some(countries) = index.get(composer.as_str()) else {
            out.unmatched.push(composer.clone());
            continue;
        };

        if countries.len() > 1 {
            let conflict = AmbiguousMapping {
                composer: composer.clone(),
                countries: countries.iter().map(|c| c.to_string()).collect(),
            };
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ReconError::AmbiguousMapping {
                        composer: conflict.composer,
                        countries: conflict.countries,
                    });
                }
                DuplicatePolicy::First => {
                    tracing::warn!(
                        composer = %conflict.composer,
                        countries = ?conflict.countries,
                        "ambiguous composer mapping, using first country"
                    );
                    out.ambiguous.push(conflict);
                }
            }
        }

        out.matched.push(ComposerCountry {
            composer: composer.clone(),
            country: countries[0].to_string(),
        });
    }

    Ok(out)
}
