//! Rollback command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LifecycleConfig, RollbackArgs};
use crate::lifecycle::RollbackManager;
use crate::monitor::HealthReport;
use crate::registry::MetadataCache;

pub fn run_rollback(
    args: RollbackArgs,
    config: &LifecycleConfig,
    level: LogLevel,
) -> Result<(), String> {
    let manager = RollbackManager::from_config(config);
    let mut cache = MetadataCache::new();

    let record = if args.force {
        Some(manager.rollback(&mut cache).map_err(|e| format!("Rollback failed: {e}"))?)
    } else {
        let report = HealthReport::load(&config.paths.health_report)
            .map_err(|e| format!("Failed to read health report: {e}"))?;
        manager
            .rollback_if_needed(report.as_ref(), &mut cache)
            .map_err(|e| format!("Rollback failed: {e}"))?
    };

    match record {
        Some(record) => log(
            level,
            LogLevel::Normal,
            &format!(
                "Rolled back to {} (replaced {})",
                record.model_version,
                record.parent_model.as_deref().unwrap_or("unknown")
            ),
        ),
        None => log(level, LogLevel::Normal, "Rollback trigger did not fire; no change"),
    }
    Ok(())
}
