//! Promotion of an experiment version into the production slot.

use std::path::{Path, PathBuf};

use crate::config::LifecycleConfig;
use crate::data::FeatureTable;
use crate::registry::{FeatureContract, MetadataCache, ModelMetadata, ModelStore};
use crate::{Error, Result};

use super::lineage::{LineageLedger, LineageRecord, Trigger};
use super::lock::SlotLock;
use super::slot;

/// Writes new versions into the production slot and records them
#[derive(Debug, Clone)]
pub struct Promoter {
    store: ModelStore,
    ledger: LineageLedger,
    lock_path: PathBuf,
    reference_data: PathBuf,
}

impl Promoter {
    pub fn new(
        store: ModelStore,
        ledger: LineageLedger,
        lock_path: impl Into<PathBuf>,
        reference_data: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            ledger,
            lock_path: lock_path.into(),
            reference_data: reference_data.into(),
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(
            ModelStore::from_config(config),
            LineageLedger::new(&config.paths.lineage_file),
            &config.paths.lock_file,
            &config.paths.reference_data,
        )
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn ledger(&self) -> &LineageLedger {
        &self.ledger
    }

    /// Promote `version` and append exactly one lineage record
    ///
    /// Fails with [`Error::VersionNotFound`] when the experiment or its
    /// artifact is absent, [`Error::MetadataMissing`] when it has no
    /// metadata and [`Error::AlreadyInProduction`] when the slot already
    /// serves it. Nothing observable changes unless the slot swap succeeds,
    /// and the ledger is written only after it has.
    pub fn promote(
        &self,
        version: &str,
        trigger: Trigger,
        cache: &mut MetadataCache,
    ) -> Result<LineageRecord> {
        if !self.store.has_artifact(version) {
            return Err(Error::VersionNotFound(version.to_string()));
        }
        let metadata = ModelMetadata::load(&self.store.metadata_path(version), version)?;

        let mut lock = SlotLock::open(&self.lock_path)?;
        let _guard = lock.write()?;

        let parent = self.store.current_version()?;
        if parent.as_deref() == Some(version) {
            tracing::info!(version, "already in production, nothing promoted");
            return Err(Error::AlreadyInProduction(version.to_string()));
        }
        let reference = load_reference(&self.reference_data);
        let contract = FeatureContract::generate(version, &metadata, reference.as_ref());

        slot::install(&self.store, version, &contract)?;
        cache.invalidate_production();

        let record = LineageRecord::new(version, &metadata, trigger, parent);
        if let Err(e) = self.ledger.append(&record) {
            tracing::error!(version, error = %e, "slot swapped but lineage append failed");
            return Err(e);
        }

        tracing::info!(
            version,
            %trigger,
            parent = ?record.parent_model,
            "model promoted to production"
        );
        Ok(record)
    }
}

/// Reference data used to type the feature contract; optional
pub(crate) fn load_reference(path: &Path) -> Option<FeatureTable> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no reference data, contract fields default to categorical");
        return None;
    }
    match FeatureTable::from_csv(path) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "reference data unreadable");
            None
        }
    }
}
