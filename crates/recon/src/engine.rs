use crate::aggregate::{composer_instances, count_by_country, unique_composers};
use crate::config::PipelineConfig;
use crate::error::ReconError;
use crate::locations::join_locations;
use crate::matcher::match_composer_countries;
use crate::model::{ReconMeta, ReconResult, Reconciliation, SourceTables};
use crate::records::problematic_records;
use crate::summary::compute_summary;

/// Run every reconciliation stage over the loaded tables.
///
/// Pure: the same tables and config always yield the same output.
pub fn reconcile(config: &PipelineConfig, tables: &SourceTables) -> Result<Reconciliation, ReconError> {
    let unique = unique_composers(&tables.performances);
    let matches =
        match_composer_countries(&unique, &tables.composers, config.matching.on_duplicate)?;
    let country_counts = count_by_country(&matches.matched);
    let joined = join_locations(&country_counts, &tables.locations);

    tracing::debug!(
        unique = unique.len(),
        matched = matches.matched.len(),
        unmatched = matches.unmatched.len(),
        countries = country_counts.len(),
        located = joined.located.len(),
        "reconciled composers"
    );
    if !joined.unlocated.is_empty() {
        tracing::debug!(count = joined.unlocated.len(), "countries without geocoordinates");
    }

    Ok(Reconciliation {
        composer_instances: composer_instances(&tables.performances),
        unique_composers: unique,
        matched: matches.matched,
        unmatched: matches.unmatched,
        ambiguous: matches.ambiguous,
        country_counts,
        locations: joined.located,
        unlocated: joined.unlocated,
        problematic: problematic_records(&tables.performances),
    })
}

/// Reconcile per config. Returns derived outputs + summary + run metadata.
pub fn run(config: &PipelineConfig, tables: &SourceTables) -> Result<ReconResult, ReconError> {
    let reconciliation = reconcile(config, tables)?;
    let summary = compute_summary(tables.performances.len(), &reconciliation);

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        reconciliation,
    })
}
