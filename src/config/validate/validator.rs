//! Configuration validation logic
//!
//! Validates a lifecycle configuration before any component is built from it.

use super::error::ValidationError;
use crate::config::schema::LifecycleConfig;
use crate::lifecycle::RollbackTrigger;
use crate::monitor::health::RetrainPolicy;

/// Upper bound on PSI bins; each score allocates one counter per bin
const MAX_BINS: usize = 1000;

/// Validate a lifecycle configuration
///
/// Checks numeric ranges, non-empty names and policy parameters. Paths are
/// not required to exist: data and experiments appear over the life of the
/// loop, and a missing source is a skipped cycle, not a bad config.
pub fn validate_config(config: &LifecycleConfig) -> Result<(), ValidationError> {
    let drift = &config.drift;
    if !drift.psi_threshold.is_finite() || drift.psi_threshold <= 0.0 {
        return Err(ValidationError::InvalidPsiThreshold(drift.psi_threshold));
    }
    if drift.bins == 0 || drift.bins > MAX_BINS {
        return Err(ValidationError::InvalidBins(drift.bins));
    }
    if drift.min_live_samples == 0 {
        return Err(ValidationError::InvalidMinLiveSamples(drift.min_live_samples));
    }

    match &drift.policy {
        RetrainPolicy::FeatureCount { count } if *count == 0 => {
            return Err(ValidationError::InvalidFeatureCount(*count));
        }
        RetrainPolicy::CriticalFeature { names } if names.is_empty() => {
            return Err(ValidationError::EmptyCriticalFeatures);
        }
        RetrainPolicy::DriftPercentage { threshold }
            if !(*threshold > 0.0 && *threshold <= 100.0) =>
        {
            return Err(ValidationError::InvalidDriftPercentage(*threshold));
        }
        _ => {}
    }

    if config.selection.metric.trim().is_empty() {
        return Err(ValidationError::EmptyMetric);
    }

    if let RollbackTrigger::PredictionShift { threshold, min_samples } = config.rollback.trigger {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ValidationError::InvalidShiftThreshold(threshold));
        }
        if min_samples == 0 {
            return Err(ValidationError::InvalidShiftMinSamples(min_samples));
        }
    }

    if config.scheduler.interval_seconds == 0 {
        return Err(ValidationError::InvalidInterval(config.scheduler.interval_seconds));
    }

    let files = [
        ("artifact", &config.model.artifact_file),
        ("metadata", &config.model.metadata_file),
        ("contract", &config.model.contract_file),
    ];
    for (i, &(label, name)) in files.iter().enumerate() {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ValidationError::InvalidFileName(label));
        }
        // the slot holds all three side by side
        if let Some(&(first, _)) = files[..i].iter().find(|(_, earlier)| *earlier == name) {
            return Err(ValidationError::DuplicateFileName { first, second: label });
        }
    }

    if config.retrain.command.first().is_some_and(|p| p.trim().is_empty()) {
        return Err(ValidationError::EmptyRetrainProgram);
    }

    if let Some(filter) = &config.logging.filter {
        if tracing_subscriber::EnvFilter::try_new(filter).is_err() {
            return Err(ValidationError::InvalidLogFilter(filter.clone()));
        }
    }

    Ok(())
}
