use std::fmt;

/// Which of the three source tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Performances,
    Composers,
    Locations,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Performances => write!(f, "performances"),
            Self::Composers => write!(f, "composers"),
            Self::Locations => write!(f, "locations"),
        }
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// Source could not be read (missing file, permission, malformed CSV framing).
    DataUnavailable { table: TableKind, location: String, reason: String },
    /// Expected column absent, or a value in it cannot be interpreted.
    SchemaMismatch { table: TableKind, column: String, detail: String },
    /// Same composer mapped to more than one country under the `reject` policy.
    AmbiguousMapping { composer: String, countries: Vec<String> },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, zero row limit, etc.).
    ConfigValidation(String),
}

/// Coarse classification used by callers to pick an exit status or error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataUnavailable,
    SchemaMismatch,
    AmbiguousMapping,
    Config,
}

impl ReconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            Self::AmbiguousMapping { .. } => ErrorKind::AmbiguousMapping,
            Self::ConfigParse(_) | Self::ConfigValidation(_) => ErrorKind::Config,
        }
    }

    pub fn missing_column(table: TableKind, column: &str) -> Self {
        Self::SchemaMismatch {
            table,
            column: column.into(),
            detail: "column not found".into(),
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { table, location, reason } => {
                write!(f, "{table} table unavailable ({location}): {reason}")
            }
            Self::SchemaMismatch { table, column, detail } => {
                write!(f, "{table} table, column '{column}': {detail}")
            }
            Self::AmbiguousMapping { composer, countries } => {
                write!(
                    f,
                    "composer '{composer}' maps to {} countries: {}",
                    countries.len(),
                    countries.join(", ")
                )
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
