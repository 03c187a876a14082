//! Status command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::LifecycleConfig;
use crate::lifecycle::{LineageLedger, SlotLock};
use crate::monitor::{HealthReport, PredictionReport};
use crate::registry::ModelStore;

/// Snapshot of everything an operator wants at a glance
#[derive(Debug, Default)]
pub struct Status {
    pub current_version: Option<String>,
    pub ledger_active: Option<String>,
    pub ledger_entries: usize,
    pub experiments: usize,
    pub health: Option<HealthReport>,
    pub predictions: Option<PredictionReport>,
}

impl Status {
    /// Read the slot and ledger under the shared lock
    pub fn collect(config: &LifecycleConfig) -> crate::Result<Self> {
        let store = ModelStore::from_config(config);
        let ledger = LineageLedger::new(&config.paths.lineage_file);

        let lock = SlotLock::open(&config.paths.lock_file)?;
        let _guard = lock.read()?;
        let records = ledger.load()?;

        Ok(Self {
            current_version: store.current_version()?,
            ledger_active: ledger.active_version()?,
            ledger_entries: records.len(),
            experiments: store.list_experiments()?.len(),
            health: HealthReport::load(&config.paths.health_report)?,
            predictions: PredictionReport::load(&config.paths.prediction_report)?,
        })
    }

    /// Slot and ledger disagree about what is serving
    pub fn is_inconsistent(&self) -> bool {
        self.ledger_active.is_some() && self.current_version != self.ledger_active
    }

    pub fn format(&self) -> String {
        let mut lines = vec![
            format!("  Production: {}", self.current_version.as_deref().unwrap_or("(empty)")),
            format!("  Experiments: {}", self.experiments),
            format!("  Lineage records: {}", self.ledger_entries),
        ];
        if self.is_inconsistent() {
            lines.push(format!(
                "  WARNING: ledger says {} is active",
                self.ledger_active.as_deref().unwrap_or("-")
            ));
        }
        match &self.health {
            Some(h) => lines.push(format!(
                "  Health ({}): {} drifting of {} evaluated, retraining {}",
                h.timestamp.format("%Y-%m-%d %H:%M"),
                h.drifting_feature_count,
                h.evaluated_features,
                if h.retraining_recommended { "recommended" } else { "not needed" }
            )),
            None => lines.push("  Health: no report".to_string()),
        }
        if let Some(p) = &self.predictions {
            lines.push(format!(
                "  Predictions: {} logged, mean probability {:.4}",
                p.total_predictions, p.avg_probability
            ));
        }
        lines.join("\n")
    }
}

pub fn run_status(config: &LifecycleConfig, level: LogLevel) -> Result<(), String> {
    let status = Status::collect(config).map_err(|e| format!("Failed to read status: {e}"))?;
    log(level, LogLevel::Normal, "Lifecycle status:");
    log(level, LogLevel::Normal, &status.format());
    Ok(())
}
