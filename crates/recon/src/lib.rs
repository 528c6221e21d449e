//! `scorelit-recon`: composer/location reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns derived outputs.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod locations;
pub mod matcher;
pub mod model;
pub mod records;
pub mod summary;

pub use config::{DuplicatePolicy, PipelineConfig};
pub use engine::{reconcile, run};
pub use error::{ErrorKind, ReconError, TableKind};
pub use model::{
    ComposerCountryEntry, CountryLocation, PerformanceRecord, Reconciliation, ReconResult,
    SourceTables,
};
