//! Health report document.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::io::{read_json_opt, write_json_atomic};
use crate::Result;

/// PSI score for one feature
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftScore {
    pub feature: String,
    pub psi: f64,
}

/// Why a feature was left out of a cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer live values than the configured minimum
    InsufficientSamples { count: usize, required: usize },
    /// Every reference value is identical
    DegenerateReference,
    /// The live column exists but holds non-numeric data
    NonNumericLive,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientSamples { count, required } => {
                write!(f, "insufficient samples ({count} < {required})")
            }
            SkipReason::DegenerateReference => write!(f, "degenerate reference"),
            SkipReason::NonNumericLive => write!(f, "non-numeric live column"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub feature: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Snapshot of model health for one evaluation cycle
///
/// Overwritten in place on every evaluation; there is only ever one current
/// report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub drifting_feature_count: usize,
    /// Features with PSI above the threshold, in reference column order
    pub drifting_features: Vec<DriftScore>,
    pub retraining_recommended: bool,
    pub timestamp: DateTime<Utc>,
    /// Number of features that received a score
    #[serde(default)]
    pub evaluated_features: usize,
    #[serde(default)]
    pub skipped_features: Vec<SkippedFeature>,
}

impl HealthReport {
    /// Load the current report, if one has been written
    pub fn load(path: &Path) -> Result<Option<Self>> {
        read_json_opt(path)
    }

    /// Persist the report, replacing any previous one
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }

    pub fn is_healthy(&self) -> bool {
        !self.retraining_recommended
    }
}
