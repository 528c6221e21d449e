//! Explicit cache of loaded source tables.
//!
//! Entries are keyed by source identity: the three resolved paths plus the
//! read parameters that change what gets loaded. Nothing is invalidated
//! automatically; callers that know a file changed call [`TableCache::invalidate`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use scorelit_recon::config::{ColumnsConfig, PipelineConfig};
use scorelit_recon::model::SourceTables;
use scorelit_recon::ReconError;

use crate::loader::{load_tables, SourcePaths};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub paths: SourcePaths,
    pub max_rows: Option<usize>,
    pub columns: ColumnsConfig,
}

impl SourceKey {
    pub fn from_config(config: &PipelineConfig, base_dir: &Path) -> Self {
        Self {
            paths: SourcePaths::resolve(base_dir, &config.sources),
            max_rows: config.sources.max_rows,
            columns: config.columns.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<SourceKey, SourceTables>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached tables for `key`, loading them on first use.
    /// A failed load leaves the cache unchanged.
    pub fn get_or_load(&mut self, key: &SourceKey) -> Result<&SourceTables, ReconError> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!(performances = %key.paths.performances.display(), "table cache hit");
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let tables = load_tables(&key.paths, key.max_rows, &key.columns)?;
                Ok(&*entry.insert(tables))
            }
        }
    }

    pub fn contains(&self, key: &SourceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop the entry for `key`. Returns whether one was present.
    pub fn invalidate(&mut self, key: &SourceKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
