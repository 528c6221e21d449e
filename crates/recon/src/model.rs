use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One music performance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceRecord {
    pub composer: String,
    pub title: String,
    pub problematic: bool,
}

/// Composer/artist name → home country, as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerCountryEntry {
    pub composer_or_artist_name: String,
    pub country: String,
}

/// Canonical country reference row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLocation {
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The three loaded tables handed from the loader to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTables {
    pub performances: Vec<PerformanceRecord>,
    pub composers: Vec<ComposerCountryEntry>,
    pub locations: Vec<CountryLocation>,
}

// ---------------------------------------------------------------------------
// Composer matching
// ---------------------------------------------------------------------------

/// A composer resolved to a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerCountry {
    pub composer: String,
    pub country: String,
}

/// A composer name that appears in the mapping table with conflicting countries.
/// Countries are listed in table order; the first is the one used under `first`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousMapping {
    pub composer: String,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerMatchOutput {
    pub matched: Vec<ComposerCountry>,
    pub unmatched: Vec<String>,
    pub ambiguous: Vec<AmbiguousMapping>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryComposerCount {
    pub country: String,
    pub composer_count: usize,
}

/// Number of performance rows per composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerInstanceCount {
    pub composer: String,
    pub performances: usize,
}

// ---------------------------------------------------------------------------
// Location join
// ---------------------------------------------------------------------------

/// Per-country aggregate with known geocoordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub country: String,
    pub country_code: String,
    pub composer_count: usize,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationJoinOutput {
    pub located: Vec<LocationCount>,
    /// Counts whose country has no row in the location table.
    pub unlocated: Vec<CountryComposerCount>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Every derived output of one pipeline pass. Contains no run-specific state,
/// so two passes over the same tables compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub unique_composers: Vec<String>,
    pub composer_instances: Vec<ComposerInstanceCount>,
    pub matched: Vec<ComposerCountry>,
    pub unmatched: Vec<String>,
    pub ambiguous: Vec<AmbiguousMapping>,
    pub country_counts: Vec<CountryComposerCount>,
    pub locations: Vec<LocationCount>,
    pub unlocated: Vec<CountryComposerCount>,
    pub problematic: Vec<PerformanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub performances: usize,
    pub unique_composers: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub ambiguous: usize,
    pub countries: usize,
    pub located: usize,
    pub unlocated: usize,
    pub problematic: usize,
}

impl ReconSummary {
    /// True when every composer resolved to a country and every country to a location.
    pub fn is_complete(&self) -> bool {
        self.unmatched == 0 && self.unlocated == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    #[serde(flatten)]
    pub reconciliation: Reconciliation,
}
