use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ComposerCountry, ComposerInstanceCount, CountryComposerCount, PerformanceRecord};

/// Distinct composer names, sorted by codepoint order.
pub fn unique_composers(performances: &[PerformanceRecord]) -> Vec<String> {
    performances
        .iter()
        .map(|p| p.composer.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Group matched composers by country and count them. Ordered by country name.
pub fn count_by_country(matched: &[ComposerCountry]) -> Vec<CountryComposerCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();

    for m in matched {
        *groups.entry(m.country.as_str()).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|(country, composer_count)| CountryComposerCount {
            country: country.to_string(),
            composer_count,
        })
        .collect()
}

/// Performance rows per composer, most performed first; ties by composer name.
pub fn composer_instances(performances: &[PerformanceRecord]) -> Vec<ComposerInstanceCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for p in performances {
        *groups.entry(p.composer.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<ComposerInstanceCount> = groups
        .into_iter()
        .map(|(composer, performances)| ComposerInstanceCount {
            composer: composer.to_string(),
            performances,
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order within equal counts
    counts.sort_by(|a, b| b.performances.cmp(&a.performances));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(composer: &str, title: &str) -> PerformanceRecord {
        PerformanceRecord {
            composer: composer.into(),
            title: title.into(),
            problematic: false,
        }
    }

    fn cc(composer: &str, country: &str) -> ComposerCountry {
        ComposerCountry {
            composer: composer.into(),
            country: country.into(),
        }
    }

    #[test]
    fn unique_is_deduplicated_and_sorted() {
        let perfs = vec![
            perf("Glass", "Etude"),
            perf("Bach", "Mass"),
            perf("Bach", "Fugue"),
        ];
        assert_eq!(unique_composers(&perfs), vec!["Bach", "Glass"]);
    }

    #[test]
    fn unique_uses_codepoint_order() {
        // Uppercase sorts before lowercase, accented after ASCII
        let perfs = vec![perf("dvořák", "x"), perf("Éluard", "y"), perf("Zappa", "z")];
        assert_eq!(unique_composers(&perfs), vec!["Zappa", "dvořák", "Éluard"]);
    }

    #[test]
    fn unique_keeps_case_variants_distinct() {
        let perfs = vec![perf("bach", "a"), perf("Bach", "b")];
        assert_eq!(unique_composers(&perfs), vec!["Bach", "bach"]);
    }

    #[test]
    fn unique_empty() {
        assert!(unique_composers(&[]).is_empty());
    }

    #[test]
    fn count_groups_by_country() {
        let matched = vec![
            cc("Bach", "Germany"),
            cc("Berlioz", "France"),
            cc("Brahms", "Germany"),
        ];
        let counts = count_by_country(&matched);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].country, "France");
        assert_eq!(counts[0].composer_count, 1);
        assert_eq!(counts[1].country, "Germany");
        assert_eq!(counts[1].composer_count, 2);
    }

    #[test]
    fn count_empty() {
        assert!(count_by_country(&[]).is_empty());
    }

    #[test]
    fn instances_ordered_by_count_then_name() {
        let perfs = vec![
            perf("Glass", "a"),
            perf("Bach", "b"),
            perf("Adams", "c"),
            perf("Bach", "d"),
            perf("Glass", "e"),
            perf("Bach", "f"),
        ];
        let counts = composer_instances(&perfs);
        let pairs: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.composer.as_str(), c.performances))
            .collect();
        assert_eq!(pairs, vec![("Bach", 3), ("Glass", 2), ("Adams", 1)]);
    }
}
