//! Model metadata documents and an explicit metadata cache.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::store::ModelStore;
use crate::{Error, Result};

/// Metadata written alongside every trained artifact
///
/// Fields this crate does not interpret are kept in `extra` so a promoted
/// copy is faithful to the original document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub training_date: String,
    /// Ordered; the order is the serving contract
    pub feature_schema: Vec<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    pub dataset: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ModelMetadata {
    /// Load metadata for `version` from `path`
    ///
    /// A missing file is [`Error::MetadataMissing`]; anything unreadable or
    /// malformed is [`Error::MetadataCorrupt`].
    pub fn load(path: &Path, version: &str) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MetadataMissing {
                version: version.to_string(),
                path: path.to_path_buf(),
            });
        }
        let corrupt = |reason: String| Error::MetadataCorrupt { path: path.to_path_buf(), reason };

        let file = File::open(path).map_err(|e| corrupt(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| corrupt(e.to_string()))
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Whatever currently occupies the production slot
    Production,
    /// An experiment directory; immutable once written
    Version(String),
}

/// Loaded metadata, keyed by experiment version or the production slot
///
/// Experiment entries never go stale. The production entry must be
/// invalidated after every slot swap.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: HashMap<CacheKey, ModelMetadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata of an experiment version, loading it on first use
    pub fn experiment(&mut self, store: &ModelStore, version: &str) -> Result<ModelMetadata> {
        let key = CacheKey::Version(version.to_string());
        if let Some(meta) = self.entries.get(&key) {
            return Ok(meta.clone());
        }
        let meta = ModelMetadata::load(&store.metadata_path(version), version)?;
        self.entries.insert(key, meta.clone());
        Ok(meta)
    }

    /// Metadata of the production slot, or `None` if the slot is empty
    pub fn production(&mut self, store: &ModelStore) -> Result<Option<ModelMetadata>> {
        if let Some(meta) = self.entries.get(&CacheKey::Production) {
            return Ok(Some(meta.clone()));
        }
        let path = store.production_metadata_path();
        if !path.exists() {
            return Ok(None);
        }
        let meta = ModelMetadata::load(&path, "production")?;
        self.entries.insert(CacheKey::Production, meta.clone());
        Ok(Some(meta))
    }

    /// Drop the production entry; call after any change to the slot
    pub fn invalidate_production(&mut self) {
        if self.entries.remove(&CacheKey::Production).is_some() {
            tracing::debug!("production metadata cache invalidated");
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
