//! Retraining recommendation policies.

use serde::{Deserialize, Serialize};

use super::report::DriftScore;

/// When a set of drifting features warrants retraining
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrainPolicy {
    /// Retrain if >= N features drift
    FeatureCount { count: usize },
    /// Retrain if any feature with these names drifts
    CriticalFeature { names: Vec<String> },
    /// Retrain if the percentage of evaluated features drifting reaches threshold
    DriftPercentage { threshold: f64 },
}

impl Default for RetrainPolicy {
    fn default() -> Self {
        RetrainPolicy::FeatureCount { count: 2 }
    }
}

impl RetrainPolicy {
    /// Whether the drifting set triggers retraining
    ///
    /// `evaluated` is the number of features that were actually scored this
    /// cycle; skipped features never count toward either side.
    pub fn should_retrain(&self, drifting: &[DriftScore], evaluated: usize) -> bool {
        match self {
            RetrainPolicy::FeatureCount { count } => drifting.len() >= *count,

            RetrainPolicy::CriticalFeature { names } => {
                drifting.iter().any(|d| names.contains(&d.feature))
            }

            RetrainPolicy::DriftPercentage { threshold } => {
                if evaluated == 0 {
                    return false;
                }
                let pct = 100.0 * drifting.len() as f64 / evaluated as f64;
                pct >= *threshold
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RetrainPolicy::FeatureCount { .. } => "feature_count",
            RetrainPolicy::CriticalFeature { .. } => "critical_feature",
            RetrainPolicy::DriftPercentage { .. } => "drift_percentage",
        }
    }
}
