use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Locations of the three input tables. Relative paths are resolved by the
/// caller against the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub performances: String,
    pub composers: String,
    pub locations: String,
    /// Read only the first N performance rows.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub performances: PerformanceColumns,
    #[serde(default)]
    pub composers: ComposerColumns,
    #[serde(default)]
    pub locations: LocationColumns,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct PerformanceColumns {
    pub composer: String,
    pub title: String,
    pub problematic: String,
}

impl Default for PerformanceColumns {
    fn default() -> Self {
        Self {
            composer: "Composer".into(),
            title: "Title".into(),
            problematic: "Problematic".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct ComposerColumns {
    pub name: String,
    pub country: String,
}

impl Default for ComposerColumns {
    fn default() -> Self {
        Self {
            name: "composer_or_artist".into(),
            country: "country".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct LocationColumns {
    pub name: String,
    pub country_code: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for LocationColumns {
    fn default() -> Self {
        Self {
            name: "name".into(),
            country_code: "country_code".into(),
            latitude: "latitude".into(),
            longitude: "longitude".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching + Output
// ---------------------------------------------------------------------------

/// What to do when one composer name maps to several different countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the run with `AmbiguousMapping`.
    #[default]
    Reject,
    /// First occurrence in table order wins; the conflict is still reported.
    First,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::First => write!(f, "first"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        for (label, path) in [
            ("performances", &self.sources.performances),
            ("composers", &self.sources.composers),
            ("locations", &self.sources.locations),
        ] {
            if path.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "sources.{label}: path must not be empty"
                )));
            }
        }

        if self.sources.max_rows == Some(0) {
            return Err(ReconError::ConfigValidation(
                "sources.max_rows must be at least 1".into(),
            ));
        }

        let cols = &self.columns;
        let named = [
            ("performances.composer", &cols.performances.composer),
            ("performances.title", &cols.performances.title),
            ("performances.problematic", &cols.performances.problematic),
            ("composers.name", &cols.composers.name),
            ("composers.country", &cols.composers.country),
            ("locations.name", &cols.locations.name),
            ("locations.country_code", &cols.locations.country_code),
            ("locations.latitude", &cols.locations.latitude),
            ("locations.longitude", &cols.locations.longitude),
        ];
        for (label, column) in named {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{label}: column name must not be empty"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "Score-lit"

[sources]
performances = "music.csv"
composers = "composers.csv"
locations = "countries.csv"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = PipelineConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "Score-lit");
        assert_eq!(config.sources.max_rows, None);
        assert_eq!(config.columns.performances.composer, "Composer");
        assert_eq!(config.columns.composers.name, "composer_or_artist");
        assert_eq!(config.columns.locations.country_code, "country_code");
        assert_eq!(config.matching.on_duplicate, DuplicatePolicy::Reject);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn column_overrides_and_policy() {
        let toml = r#"
name = "custom"

[sources]
performances = "p.csv"
composers = "c.csv"
locations = "l.csv"
max_rows = 10

[columns.performances]
composer = "Author"

[columns.locations]
country_code = "countryCode"

[matching]
on_duplicate = "first"
"#;
        let config = PipelineConfig::from_toml(toml).unwrap();
        assert_eq!(config.sources.max_rows, Some(10));
        assert_eq!(config.columns.performances.composer, "Author");
        assert_eq!(config.columns.performances.title, "Title");
        assert_eq!(config.columns.locations.country_code, "countryCode");
        assert_eq!(config.matching.on_duplicate, DuplicatePolicy::First);
    }

    #[test]
    fn zero_max_rows_rejected() {
        let toml = MINIMAL.replace("locations = \"countries.csv\"", "locations = \"countries.csv\"\nmax_rows = 0");
        let err = PipelineConfig::from_toml(&toml).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn empty_source_path_rejected() {
        let toml = MINIMAL.replace("\"composers.csv\"", "\"\"");
        let err = PipelineConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("sources.composers"));
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let toml = format!("{MINIMAL}\n[matching]\non_duplicate = \"fuzzy\"\n");
        let err = PipelineConfig::from_toml(&toml).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn missing_sources_is_parse_error() {
        let err = PipelineConfig::from_toml("name = \"x\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
