//! Reverting the production slot to the previously promoted version.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::LifecycleConfig;
use crate::data::FeatureTable;
use crate::monitor::predictions::split_probabilities_at;
use crate::monitor::psi::calculate_psi;
use crate::monitor::HealthReport;
use crate::registry::{FeatureContract, MetadataCache, ModelMetadata, ModelStore};
use crate::{Error, Result};

use super::lineage::{active_history, LineageLedger, LineageRecord, Trigger};
use super::lock::SlotLock;
use super::promote::load_reference;
use super::slot;

/// What counts as evidence that the serving model should be reverted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollbackTrigger {
    /// Never roll back automatically
    Disabled,
    /// Treat a retraining recommendation as a rollback signal
    Drift,
    /// Compare prediction probabilities served since the last slot change
    /// with those served before it
    PredictionShift { threshold: f64, min_samples: usize },
}

impl Default for RollbackTrigger {
    fn default() -> Self {
        RollbackTrigger::PredictionShift { threshold: 0.2, min_samples: 20 }
    }
}

#[derive(Debug, Clone)]
pub struct RollbackManager {
    store: ModelStore,
    ledger: LineageLedger,
    lock_path: PathBuf,
    reference_data: PathBuf,
    prediction_log: PathBuf,
    trigger: RollbackTrigger,
    bins: usize,
}

impl RollbackManager {
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self {
            store: ModelStore::from_config(config),
            ledger: LineageLedger::new(&config.paths.lineage_file),
            lock_path: config.paths.lock_file.clone(),
            reference_data: config.paths.reference_data.clone(),
            prediction_log: config.paths.prediction_log.clone(),
            trigger: config.rollback.trigger.clone(),
            bins: config.drift.bins,
        }
    }

    pub fn with_trigger(mut self, trigger: RollbackTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn trigger(&self) -> &RollbackTrigger {
        &self.trigger
    }

    /// Roll back if the configured trigger fires
    ///
    /// Returns the rollback record, or `None` when the model is considered
    /// healthy.
    pub fn rollback_if_needed(
        &self,
        report: Option<&HealthReport>,
        cache: &mut MetadataCache,
    ) -> Result<Option<LineageRecord>> {
        if !self.should_rollback(report)? {
            tracing::debug!("no rollback required");
            return Ok(None);
        }
        self.rollback(cache).map(Some)
    }

    /// Evaluate the trigger without acting on it
    pub fn should_rollback(&self, report: Option<&HealthReport>) -> Result<bool> {
        match &self.trigger {
            RollbackTrigger::Disabled => Ok(false),
            RollbackTrigger::Drift => Ok(report.is_some_and(|r| r.retraining_recommended)),
            RollbackTrigger::PredictionShift { threshold, min_samples } => {
                match self.prediction_shift(*min_samples)? {
                    Some(shift) if shift > *threshold => {
                        tracing::warn!(shift, threshold, "prediction distribution shifted since promotion");
                        Ok(true)
                    }
                    Some(shift) => {
                        tracing::debug!(shift, threshold, "prediction distribution stable");
                        Ok(false)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// PSI of probabilities served since the last slot change against those
    /// served by the version it replaced
    ///
    /// The baseline covers only the window between the previous and the
    /// latest ledger records. `None` when the latest change was itself a
    /// rollback, the ledger is empty, there is no log, or there is too little
    /// data on either side.
    pub fn prediction_shift(&self, min_samples: usize) -> Result<Option<f64>> {
        let records = self.ledger.load()?;
        let Some((last_change, earlier)) = records.split_last() else {
            return Ok(None);
        };
        if last_change.trigger == Trigger::Rollback {
            tracing::debug!(
                restored = %last_change.model_version,
                "latest change was a rollback, no baseline to compare against"
            );
            return Ok(None);
        }
        if !self.prediction_log.exists() {
            return Ok(None);
        }

        let log = FeatureTable::from_csv(&self.prediction_log)?;
        let since = earlier.last().map(|r| r.timestamp);
        let Some((before, after)) = split_probabilities_at(&log, since, last_change.timestamp) else {
            tracing::debug!("prediction log lacks probability or timestamp column");
            return Ok(None);
        };
        if before.len() < min_samples || after.len() < min_samples {
            tracing::debug!(
                before = before.len(),
                after = after.len(),
                min_samples,
                "not enough predictions around the promotion"
            );
            return Ok(None);
        }

        match calculate_psi(&before, &after, self.bins) {
            Ok(psi) => Ok(Some(psi)),
            Err(Error::DegenerateReference(_)) => {
                tracing::debug!("pre-promotion predictions have no spread");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Restore the version promoted before the current one
    ///
    /// Needs at least two promotions in the active history; otherwise fails
    /// with [`Error::NoRollbackTarget`] and leaves the slot alone. Appends a
    /// `rollback` record naming the restored version.
    pub fn rollback(&self, cache: &mut MetadataCache) -> Result<LineageRecord> {
        let mut lock = SlotLock::open(&self.lock_path)?;
        let _guard = lock.write()?;

        let records = self.ledger.load()?;
        let active = active_history(&records);
        if active.len() < 2 {
            tracing::error!(entries = active.len(), "no previous model available for rollback");
            return Err(Error::NoRollbackTarget(active.len()));
        }
        let current = &active[active.len() - 1].model_version;
        let target = &active[active.len() - 2].model_version;

        if !self.store.has_artifact(target) {
            return Err(Error::ArtifactMissing {
                version: target.clone(),
                path: self.store.artifact_path(target),
            });
        }
        let metadata = ModelMetadata::load(&self.store.metadata_path(target), target)?;
        let reference = load_reference(&self.reference_data);
        let contract = FeatureContract::generate(target, &metadata, reference.as_ref());

        slot::install(&self.store, target, &contract)?;
        cache.invalidate_production();

        let record = LineageRecord::new(target, &metadata, Trigger::Rollback, Some(current.clone()));
        self.ledger.append(&record)?;

        tracing::warn!(restored = %target, replaced = %current, "rollback completed");
        Ok(record)
    }
}
