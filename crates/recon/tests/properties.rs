// Property-based tests for the reconciliation stages.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use scorelit_recon::aggregate::{count_by_country, unique_composers};
use scorelit_recon::config::DuplicatePolicy;
use scorelit_recon::locations::join_locations;
use scorelit_recon::matcher::match_composer_countries;
use scorelit_recon::model::{ComposerCountryEntry, CountryLocation, PerformanceRecord};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Small name alphabet so collisions between tables are common.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[A-D][a-c]{0,2}",
        1 => r"[a-d ]{1,3}",
        1 => Just("Dvořák".to_string()),
    ]
}

fn arb_country() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Germany".to_string()),
        Just("France".to_string()),
        Just("Czechia".to_string()),
        Just("Atlantis".to_string()),
    ]
}

fn arb_performances() -> impl Strategy<Value = Vec<PerformanceRecord>> {
    prop::collection::vec(
        (arb_name(), r"[a-z]{1,5}", any::<bool>()).prop_map(|(composer, title, problematic)| {
            PerformanceRecord {
                composer,
                title,
                problematic,
            }
        }),
        0..30,
    )
}

/// Mapping table with at most one country per name.
fn arb_mapping() -> impl Strategy<Value = Vec<ComposerCountryEntry>> {
    prop::collection::btree_map(arb_name(), arb_country(), 0..12).prop_map(|m| {
        m.into_iter()
            .map(|(composer_or_artist_name, country)| ComposerCountryEntry {
                composer_or_artist_name,
                country,
            })
            .collect()
    })
}

/// Mapping table where a name may repeat with the same or a different country.
fn arb_mapping_with_conflicts() -> impl Strategy<Value = Vec<ComposerCountryEntry>> {
    prop::collection::vec(
        (arb_name(), arb_country()).prop_map(|(composer_or_artist_name, country)| {
            ComposerCountryEntry {
                composer_or_artist_name,
                country,
            }
        }),
        0..20,
    )
}

/// Distinct countries per name, in table order.
fn distinct_countries(mapping: &[ComposerCountryEntry]) -> BTreeMap<&str, Vec<&str>> {
    let mut index: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for e in mapping {
        let countries = index.entry(e.composer_or_artist_name.as_str()).or_default();
        if !countries.contains(&e.country.as_str()) {
            countries.push(e.country.as_str());
        }
    }
    index
}

fn locations() -> Vec<CountryLocation> {
    vec![
        CountryLocation {
            name: "Germany".into(),
            country_code: "DE".into(),
            latitude: 51.0,
            longitude: 9.0,
        },
        CountryLocation {
            name: "France".into(),
            country_code: "FR".into(),
            latitude: 46.0,
            longitude: 2.0,
        },
        CountryLocation {
            name: "Czechia".into(),
            country_code: "CZ".into(),
            latitude: 49.8,
            longitude: 15.5,
        },
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn unique_composers_distinct_and_sorted(perfs in arb_performances()) {
        let unique = unique_composers(&perfs);

        for pair in unique.windows(2) {
            prop_assert!(pair[0] < pair[1], "not strictly ascending: {:?}", pair);
        }
        let expected: HashSet<&str> = perfs.iter().map(|p| p.composer.as_str()).collect();
        let got: HashSet<&str> = unique.iter().map(String::as_str).collect();
        prop_assert_eq!(expected, got);
    }

    #[test]
    fn every_composer_matched_or_unmatched(perfs in arb_performances(), mapping in arb_mapping()) {
        let unique = unique_composers(&perfs);
        let out = match_composer_countries(&unique, &mapping, DuplicatePolicy::Reject).unwrap();

        prop_assert_eq!(out.matched.len() + out.unmatched.len(), unique.len());

        let matched: HashSet<&str> = out.matched.iter().map(|m| m.composer.as_str()).collect();
        let unmatched: HashSet<&str> = out.unmatched.iter().map(String::as_str).collect();
        prop_assert!(matched.is_disjoint(&unmatched));

        let all: HashSet<&str> = matched.union(&unmatched).copied().collect();
        let expected: HashSet<&str> = unique.iter().map(String::as_str).collect();
        prop_assert_eq!(all, expected);
    }

    #[test]
    fn first_policy_partitions_and_reports_conflicts(
        perfs in arb_performances(),
        mapping in arb_mapping_with_conflicts(),
    ) {
        let unique = unique_composers(&perfs);
        let out = match_composer_countries(&unique, &mapping, DuplicatePolicy::First).unwrap();
        let index = distinct_countries(&mapping);

        prop_assert_eq!(out.matched.len() + out.unmatched.len(), unique.len());
        let matched: HashSet<&str> = out.matched.iter().map(|m| m.composer.as_str()).collect();
        let unmatched: HashSet<&str> = out.unmatched.iter().map(String::as_str).collect();
        prop_assert!(matched.is_disjoint(&unmatched));

        for m in &out.matched {
            let countries = &index[m.composer.as_str()];
            prop_assert_eq!(m.country.as_str(), countries[0]);
        }
        for name in &out.unmatched {
            prop_assert!(!index.contains_key(name.as_str()));
        }

        let expected_ambiguous: Vec<&str> = unique
            .iter()
            .map(String::as_str)
            .filter(|c| index.get(c).is_some_and(|cs| cs.len() > 1))
            .collect();
        let ambiguous: Vec<&str> = out.ambiguous.iter().map(|a| a.composer.as_str()).collect();
        prop_assert_eq!(ambiguous, expected_ambiguous);

        for a in &out.ambiguous {
            prop_assert!(matched.contains(a.composer.as_str()));
            let expected: Vec<&str> = index[a.composer.as_str()].clone();
            let got: Vec<&str> = a.countries.iter().map(String::as_str).collect();
            prop_assert_eq!(got, expected);
        }
    }

    #[test]
    fn reject_policy_fails_exactly_on_conflict(
        perfs in arb_performances(),
        mapping in arb_mapping_with_conflicts(),
    ) {
        let unique = unique_composers(&perfs);
        let index = distinct_countries(&mapping);
        let conflicted = unique
            .iter()
            .any(|c| index.get(c.as_str()).is_some_and(|cs| cs.len() > 1));

        let result = match_composer_countries(&unique, &mapping, DuplicatePolicy::Reject);
        prop_assert_eq!(result.is_err(), conflicted);
        if let Ok(out) = result {
            prop_assert!(out.ambiguous.is_empty());
        }
    }

    #[test]
    fn country_counts_sum_to_matched(perfs in arb_performances(), mapping in arb_mapping()) {
        let unique = unique_composers(&perfs);
        let out = match_composer_countries(&unique, &mapping, DuplicatePolicy::Reject).unwrap();
        let counts = count_by_country(&out.matched);

        let total: usize = counts.iter().map(|c| c.composer_count).sum();
        prop_assert_eq!(total, out.matched.len());
        prop_assert!(total <= unique.len());
        prop_assert!(counts.iter().all(|c| c.composer_count > 0));
    }

    #[test]
    fn located_is_filtered_subset_of_counts(perfs in arb_performances(), mapping in arb_mapping()) {
        let unique = unique_composers(&perfs);
        let out = match_composer_countries(&unique, &mapping, DuplicatePolicy::Reject).unwrap();
        let counts = count_by_country(&out.matched);
        let locs = locations();
        let joined = join_locations(&counts, &locs);

        let by_country: BTreeMap<&str, usize> = counts
            .iter()
            .map(|c| (c.country.as_str(), c.composer_count))
            .collect();
        let known: HashSet<&str> = locs.iter().map(|l| l.name.as_str()).collect();

        for lc in &joined.located {
            prop_assert_eq!(by_country.get(lc.country.as_str()).copied(), Some(lc.composer_count));
        }
        let expected_located = counts.iter().filter(|c| known.contains(c.country.as_str())).count();
        prop_assert_eq!(joined.located.len(), expected_located);
        prop_assert_eq!(joined.located.len() + joined.unlocated.len(), counts.len());
    }

    #[test]
    fn pipeline_is_deterministic(perfs in arb_performances(), mapping in arb_mapping()) {
        let run = || {
            let unique = unique_composers(&perfs);
            let out = match_composer_countries(&unique, &mapping, DuplicatePolicy::Reject).unwrap();
            let counts = count_by_country(&out.matched);
            let joined = join_locations(&counts, &locations());
            (unique, out, counts, joined)
        };
        prop_assert_eq!(run(), run());
    }
}
