//! The periodic lifecycle loop.

use std::thread;
use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::monitor::{HealthEvaluator, PredictionMonitor};
use crate::registry::{DecisionReason, MetadataCache, ModelSelector, ModelStore};
use crate::{Error, Result};

use super::lineage::Trigger;
use super::promote::Promoter;
use super::retrain::{retrainer_from_config, Retrainer};
use super::rollback::RollbackManager;

/// What a single tick did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No health report could be produced; nothing was decided
    Skipped,
    /// Health report present and no retraining recommended
    Healthy,
    /// The slot was reverted to this version
    RolledBack(String),
    /// The candidate replaced the incumbent
    Promoted(String),
    /// The candidate was evaluated and rejected
    Retained { candidate: String, reason: DecisionReason },
}

/// Counters over a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub failures: u64,
    pub promotions: u64,
    pub rollbacks: u64,
}

/// Drives evaluate, decide, retrain, compare, promote or roll back, sleep
pub struct LifecycleScheduler {
    evaluator: HealthEvaluator,
    predictions: PredictionMonitor,
    rollback: RollbackManager,
    selector: ModelSelector,
    promoter: Promoter,
    store: ModelStore,
    retrainer: Box<dyn Retrainer>,
    cache: MetadataCache,
    interval: Duration,
}

impl LifecycleScheduler {
    pub fn from_config(config: &LifecycleConfig) -> Result<Self> {
        Ok(Self {
            evaluator: HealthEvaluator::from_config(config),
            predictions: PredictionMonitor::from_config(config),
            rollback: RollbackManager::from_config(config),
            selector: ModelSelector::new(&config.selection.metric),
            promoter: Promoter::from_config(config),
            store: ModelStore::from_config(config),
            retrainer: retrainer_from_config(config)?,
            cache: MetadataCache::new(),
            interval: Duration::from_secs(config.scheduler.interval_seconds),
        })
    }

    pub fn with_retrainer(mut self, retrainer: Box<dyn Retrainer>) -> Self {
        self.retrainer = retrainer;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One pass of the loop
    ///
    /// Without a health report nothing is decided, not even a rollback. A
    /// rollback ends the tick.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let report = self.evaluator.evaluate()?;
        if let Err(e) = self.predictions.generate() {
            tracing::warn!(error = %e, "prediction report failed");
        }

        let Some(report) = report else {
            tracing::info!("no health report, skipping tick");
            return Ok(TickOutcome::Skipped);
        };

        match self.rollback.rollback_if_needed(Some(&report), &mut self.cache) {
            Ok(Some(record)) => return Ok(TickOutcome::RolledBack(record.model_version)),
            Ok(None) => {}
            Err(Error::NoRollbackTarget(entries)) => {
                tracing::warn!(entries, "rollback wanted but no earlier version to restore");
            }
            Err(e) => return Err(e),
        }

        if !report.retraining_recommended {
            tracing::info!(drifting = report.drifting_feature_count, "model healthy, no retraining");
            return Ok(TickOutcome::Healthy);
        }

        tracing::warn!(
            drifting = report.drifting_feature_count,
            "drift detected, retraining recommended"
        );
        let candidate = self.retrainer.retrain()?;
        let decision = self.selector.select_from_store(&self.store, &mut self.cache, &candidate);
        if !decision.promote {
            tracing::info!(%candidate, reason = %decision.reason, "champion retained");
            return Ok(TickOutcome::Retained { candidate, reason: decision.reason });
        }

        let record = self.promoter.promote(&candidate, Trigger::DriftRetraining, &mut self.cache)?;
        Ok(TickOutcome::Promoted(record.model_version))
    }

    /// Tick until `max_ticks` is reached, or forever with `None`
    ///
    /// Tick errors are logged and counted; they never stop the loop.
    pub fn run(&mut self, max_ticks: Option<u64>) -> RunStats {
        let mut stats = RunStats::default();
        tracing::info!(interval_secs = self.interval.as_secs(), ?max_ticks, "lifecycle scheduler started");

        loop {
            tracing::info!(tick = stats.ticks + 1, "running lifecycle check");
            match self.tick() {
                Ok(outcome) => {
                    match &outcome {
                        TickOutcome::Promoted(_) => stats.promotions += 1,
                        TickOutcome::RolledBack(_) => stats.rollbacks += 1,
                        _ => {}
                    }
                    tracing::info!(?outcome, "lifecycle check finished");
                }
                Err(e) => {
                    stats.failures += 1;
                    tracing::error!(error = %e, "lifecycle check failed");
                }
            }
            stats.ticks += 1;

            if max_ticks.is_some_and(|max| stats.ticks >= max) {
                break;
            }
            tracing::debug!(secs = self.interval.as_secs(), "sleeping");
            thread::sleep(self.interval);
        }

        tracing::info!(
            ticks = stats.ticks,
            failures = stats.failures,
            promotions = stats.promotions,
            rollbacks = stats.rollbacks,
            "lifecycle scheduler stopped"
        );
        stats
    }
}
