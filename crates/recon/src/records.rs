//! Row-level views over the performance table.

use std::collections::BTreeMap;

use crate::model::PerformanceRecord;

/// Rows flagged problematic, in original order.
pub fn problematic_records(performances: &[PerformanceRecord]) -> Vec<PerformanceRecord> {
    performances.iter().filter(|p| p.problematic).cloned().collect()
}

/// Rows whose composer equals `composer` exactly. Empty when nothing matches.
pub fn records_by_composer(performances: &[PerformanceRecord], composer: &str) -> Vec<PerformanceRecord> {
    performances
        .iter()
        .filter(|p| p.composer == composer)
        .cloned()
        .collect()
}

/// Composer → rows lookup for interactive selection, keyed in composer order.
/// Rows under each key keep their original order.
pub fn composer_lookup(performances: &[PerformanceRecord]) -> BTreeMap<String, Vec<PerformanceRecord>> {
    let mut lookup: BTreeMap<String, Vec<PerformanceRecord>> = BTreeMap::new();
    for p in performances {
        lookup.entry(p.composer.clone()).or_default().push(p.clone());
    }
    lookup
}
