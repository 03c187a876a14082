//! Health evaluation over reference and live feature tables.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::report::{DriftScore, HealthReport, SkipReason, SkippedFeature};
use crate::config::{DriftConfig, LifecycleConfig};
use crate::data::FeatureTable;
use crate::monitor::psi::calculate_psi;
use crate::{Error, Result};

/// Runs PSI across every numeric feature shared by reference and live data
#[derive(Clone, Debug)]
pub struct HealthEvaluator {
    reference_path: PathBuf,
    live_path: PathBuf,
    report_path: PathBuf,
    drift: DriftConfig,
}

impl HealthEvaluator {
    pub fn new(
        reference_path: impl Into<PathBuf>,
        live_path: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
        drift: DriftConfig,
    ) -> Self {
        Self {
            reference_path: reference_path.into(),
            live_path: live_path.into(),
            report_path: report_path.into(),
            drift,
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(
            &config.paths.reference_data,
            &config.paths.prediction_log,
            &config.paths.health_report,
            config.drift.clone(),
        )
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Evaluate and persist a fresh health report
    ///
    /// Returns `Ok(None)` without writing anything when either data source is
    /// missing: the caller cannot decide and must not treat that as healthy.
    pub fn evaluate(&self) -> Result<Option<HealthReport>> {
        if let Err(e) = self.check_sources() {
            tracing::info!(reason = %e, "skipping health evaluation");
            return Ok(None);
        }

        let reference = FeatureTable::from_csv(&self.reference_path)?;
        let live = FeatureTable::from_csv(&self.live_path)?;
        let report = self.assess(&reference, &live)?;
        report.save(&self.report_path)?;

        tracing::info!(
            drifting = report.drifting_feature_count,
            evaluated = report.evaluated_features,
            skipped = report.skipped_features.len(),
            retraining_recommended = report.retraining_recommended,
            "health report written"
        );
        Ok(Some(report))
    }

    /// Fails with [`Error::DataUnavailable`] naming the first absent source
    pub fn check_sources(&self) -> Result<()> {
        for (what, path) in [("reference data", &self.reference_path), ("live data", &self.live_path)] {
            if !path.exists() {
                return Err(Error::DataUnavailable(format!("{what} not found at {}", path.display())));
            }
        }
        Ok(())
    }

    /// Score already-loaded tables without touching the filesystem
    pub fn assess(&self, reference: &FeatureTable, live: &FeatureTable) -> Result<HealthReport> {
        let mut drifting = Vec::new();
        let mut skipped = Vec::new();
        let mut evaluated = 0;

        for feature in reference.numeric_columns() {
            if !live.contains(feature) {
                tracing::debug!(feature, "feature absent from live data");
                continue;
            }

            let Some(live_values) = live.numeric_values(feature) else {
                tracing::warn!(feature, "live column is not numeric, skipping");
                skipped.push(skip(feature, SkipReason::NonNumericLive));
                continue;
            };

            let psi = match self.score(feature, reference, &live_values) {
                Ok(psi) => psi,
                Err(Error::InsufficientSamples { count, required, .. }) => {
                    tracing::info!(feature, count, required, "insufficient live samples");
                    skipped.push(skip(feature, SkipReason::InsufficientSamples { count, required }));
                    continue;
                }
                Err(Error::DegenerateReference(_) | Error::EmptySample("reference")) => {
                    tracing::warn!(feature, "reference column has no spread, skipping");
                    skipped.push(skip(feature, SkipReason::DegenerateReference));
                    continue;
                }
                Err(e) => return Err(e),
            };

            evaluated += 1;
            tracing::debug!(feature, psi, "feature scored");
            if psi > self.drift.psi_threshold {
                drifting.push(DriftScore { feature: feature.to_string(), psi: round4(psi) });
            }
        }

        let retraining_recommended = self.drift.policy.should_retrain(&drifting, evaluated);
        Ok(HealthReport {
            drifting_feature_count: drifting.len(),
            drifting_features: drifting,
            retraining_recommended,
            timestamp: Utc::now(),
            evaluated_features: evaluated,
            skipped_features: skipped,
        })
    }

    /// PSI for one feature, or [`Error::InsufficientSamples`] when the live
    /// side is below `min_live_samples`
    fn score(&self, feature: &str, reference: &FeatureTable, live: &[f64]) -> Result<f64> {
        let required = self.drift.min_live_samples;
        if live.len() < required {
            return Err(Error::InsufficientSamples {
                feature: feature.to_string(),
                count: live.len(),
                required,
            });
        }
        let reference_values = reference.numeric_values(feature).unwrap_or_default();
        calculate_psi(&reference_values, live, self.drift.bins)
    }
}

fn skip(feature: &str, reason: SkipReason) -> SkippedFeature {
    SkippedFeature { feature: feature.to_string(), reason }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
