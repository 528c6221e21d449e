// CSV table loading for the three pipeline sources

use std::io::Read;
use std::path::{Path, PathBuf};

use scorelit_recon::config::{
    ColumnsConfig, ComposerColumns, LocationColumns, PerformanceColumns, SourcesConfig,
};
use scorelit_recon::model::{ComposerCountryEntry, CountryLocation, PerformanceRecord, SourceTables};
use scorelit_recon::{ReconError, TableKind};

/// Header spelling accepted for the country code when the configured one is absent.
const COUNTRY_CODE_ALIASES: &[&str] = &["country_code", "countryCode"];

const IN_MEMORY: &str = "<memory>";

/// Resolved locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePaths {
    pub performances: PathBuf,
    pub composers: PathBuf,
    pub locations: PathBuf,
}

impl SourcePaths {
    /// Resolve config paths relative to `base_dir` (usually the config file's directory).
    pub fn resolve(base_dir: &Path, sources: &SourcesConfig) -> Self {
        Self {
            performances: base_dir.join(&sources.performances),
            composers: base_dir.join(&sources.composers),
            locations: base_dir.join(&sources.locations),
        }
    }
}

/// Load all three tables. Fails fast on the first unreadable source or schema problem.
pub fn load_tables(
    paths: &SourcePaths,
    max_rows: Option<usize>,
    columns: &ColumnsConfig,
) -> Result<SourceTables, ReconError> {
    let tables = SourceTables {
        performances: load_performances(&paths.performances, &columns.performances, max_rows)?,
        composers: load_composer_countries(&paths.composers, &columns.composers)?,
        locations: load_country_locations(&paths.locations, &columns.locations)?,
    };
    tracing::info!(
        performances = tables.performances.len(),
        composers = tables.composers.len(),
        locations = tables.locations.len(),
        "loaded source tables"
    );
    Ok(tables)
}

// ---------------------------------------------------------------------------
// Per-table loaders
// ---------------------------------------------------------------------------

pub fn load_performances(
    path: &Path,
    columns: &PerformanceColumns,
    max_rows: Option<usize>,
) -> Result<Vec<PerformanceRecord>, ReconError> {
    let content = read_file_as_utf8(path, TableKind::Performances)?;
    parse_performances(&content, &path.display().to_string(), columns, max_rows)
}

pub fn performances_from_str(
    data: &str,
    columns: &PerformanceColumns,
    max_rows: Option<usize>,
) -> Result<Vec<PerformanceRecord>, ReconError> {
    parse_performances(data, IN_MEMORY, columns, max_rows)
}

pub fn load_composer_countries(
    path: &Path,
    columns: &ComposerColumns,
) -> Result<Vec<ComposerCountryEntry>, ReconError> {
    let content = read_file_as_utf8(path, TableKind::Composers)?;
    parse_composer_countries(&content, &path.display().to_string(), columns)
}

pub fn composer_countries_from_str(
    data: &str,
    columns: &ComposerColumns,
) -> Result<Vec<ComposerCountryEntry>, ReconError> {
    parse_composer_countries(data, IN_MEMORY, columns)
}

pub fn load_country_locations(
    path: &Path,
    columns: &LocationColumns,
) -> Result<Vec<CountryLocation>, ReconError> {
    let content = read_file_as_utf8(path, TableKind::Locations)?;
    parse_country_locations(&content, &path.display().to_string(), columns)
}

pub fn country_locations_from_str(
    data: &str,
    columns: &LocationColumns,
) -> Result<Vec<CountryLocation>, ReconError> {
    parse_country_locations(data, IN_MEMORY, columns)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_performances(
    data: &str,
    location: &str,
    columns: &PerformanceColumns,
    max_rows: Option<usize>,
) -> Result<Vec<PerformanceRecord>, ReconError> {
    let table = TableKind::Performances;
    let mut reader = reader_for(data);
    let headers = HeaderIndex::read(&mut reader, table, location)?;

    let composer_idx = headers.require(table, &columns.composer)?;
    let title_idx = headers.require(table, &columns.title)?;
    let problematic_idx = headers.require(table, &columns.problematic)?;

    // The row limit counts source rows, including ones skipped below
    let limit = max_rows.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records().take(limit) {
        let record = record.map_err(|e| unavailable(table, location, e))?;
        let composer = cell(table, &columns.composer, &record, composer_idx)?;
        let title = cell(table, &columns.title, &record, title_idx)?;
        let raw_flag = cell(table, &columns.problematic, &record, problematic_idx)?;

        if composer.trim().is_empty() {
            tracing::debug!(line = line_of(&record), "skipping performance without composer");
            skipped += 1;
            continue;
        }

        let problematic = parse_flag(raw_flag).ok_or_else(|| {
            bad_value(table, &columns.problematic, &record, raw_flag, "0/1 or true/false")
        })?;

        rows.push(PerformanceRecord {
            composer: composer.to_string(),
            title: title.to_string(),
            problematic,
        });
    }

    if skipped > 0 {
        tracing::info!(skipped, location, "performances without composer ignored");
    }
    Ok(rows)
}

fn parse_composer_countries(
    data: &str,
    location: &str,
    columns: &ComposerColumns,
) -> Result<Vec<ComposerCountryEntry>, ReconError> {
    let table = TableKind::Composers;
    let mut reader = reader_for(data);
    let headers = HeaderIndex::read(&mut reader, table, location)?;

    let name_idx = headers.require(table, &columns.name)?;
    let country_idx = headers.require(table, &columns.country)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unavailable(table, location, e))?;
        rows.push(ComposerCountryEntry {
            composer_or_artist_name: cell(table, &columns.name, &record, name_idx)?.to_string(),
            country: cell(table, &columns.country, &record, country_idx)?.to_string(),
        });
    }

    Ok(rows)
}

fn parse_country_locations(
    data: &str,
    location: &str,
    columns: &LocationColumns,
) -> Result<Vec<CountryLocation>, ReconError> {
    let table = TableKind::Locations;
    let mut reader = reader_for(data);
    let headers = HeaderIndex::read(&mut reader, table, location)?;

    let name_idx = headers.require(table, &columns.name)?;
    let code_idx = match headers.position(&columns.country_code) {
        Some(idx) => idx,
        None => COUNTRY_CODE_ALIASES
            .iter()
            .find_map(|alias| headers.position(alias))
            .ok_or_else(|| ReconError::missing_column(table, &columns.country_code))?,
    };
    let lat_idx = headers.require(table, &columns.latitude)?;
    let lon_idx = headers.require(table, &columns.longitude)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unavailable(table, location, e))?;

        let coordinate = |idx: usize, column: &str| -> Result<f64, ReconError> {
            let raw = cell(table, column, &record, idx)?;
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(bad_value(table, column, &record, raw, "a finite number")),
            }
        };

        rows.push(CountryLocation {
            name: cell(table, &columns.name, &record, name_idx)?.to_string(),
            country_code: cell(table, &columns.country_code, &record, code_idx)?.to_string(),
            latitude: coordinate(lat_idx, &columns.latitude)?,
            longitude: coordinate(lon_idx, &columns.longitude)?,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn reader_for(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes())
}

/// Column lookup over a normalized header row (BOM and padding stripped).
struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    fn read(
        reader: &mut csv::Reader<&[u8]>,
        table: TableKind,
        location: &str,
    ) -> Result<Self, ReconError> {
        let names = reader
            .headers()
            .map_err(|e| unavailable(table, location, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Ok(Self { names })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    fn require(&self, table: TableKind, name: &str) -> Result<usize, ReconError> {
        self.position(name)
            .ok_or_else(|| ReconError::missing_column(table, name))
    }
}

/// Value at `idx`. A row too short to reach the column is a schema error.
fn cell<'r>(
    table: TableKind,
    column: &str,
    record: &'r csv::StringRecord,
    idx: usize,
) -> Result<&'r str, ReconError> {
    record.get(idx).ok_or_else(|| ReconError::SchemaMismatch {
        table,
        column: column.to_string(),
        detail: format!(
            "line {}: row has {} field(s), column is #{}",
            line_of(record),
            record.len(),
            idx + 1
        ),
    })
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Accepts 0/1 (also as 0.0/1.0) and true/false in any case. Empty means false.
fn parse_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(false);
    }
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match value.parse::<f64>() {
        Ok(n) if n == 1.0 => Some(true),
        Ok(n) if n == 0.0 => Some(false),
        _ => None,
    }
}

fn unavailable(table: TableKind, location: &str, err: impl std::fmt::Display) -> ReconError {
    ReconError::DataUnavailable {
        table,
        location: location.to_string(),
        reason: err.to_string(),
    }
}

fn bad_value(
    table: TableKind,
    column: &str,
    record: &csv::StringRecord,
    raw: &str,
    expected: &str,
) -> ReconError {
    ReconError::SchemaMismatch {
        table,
        column: column.to_string(),
        detail: format!("line {}: cannot read '{raw}' as {expected}", line_of(record)),
    }
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path, table: TableKind) -> Result<String, ReconError> {
    let location = path.display().to_string();
    let mut file = std::fs::File::open(path).map_err(|e| unavailable(table, &location, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| unavailable(table, &location, e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            tracing::warn!(%table, path = %location, "source is not UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
