//! YAML schema for the lifecycle configuration
//!
//! Every field has a default, so an empty document is a valid configuration
//! that uses the conventional `data/` and `models/` layout relative to the
//! working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lifecycle::RollbackTrigger;
use crate::monitor::health::RetrainPolicy;
use crate::monitor::psi::DEFAULT_BINS;
use crate::registry::DEFAULT_METRIC;

/// Complete lifecycle configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub paths: PathsConfig,
    pub model: ModelConfig,
    pub drift: DriftConfig,
    pub selection: SelectionConfig,
    pub rollback: RollbackConfig,
    pub scheduler: SchedulerConfig,
    pub retrain: RetrainConfig,
    pub logging: LoggingConfig,
}

/// File-system locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Training-time reference features (CSV)
    pub reference_data: PathBuf,
    /// Append-only serving log (CSV)
    pub prediction_log: PathBuf,
    pub experiments_dir: PathBuf,
    /// Parent of the production slot directory
    pub production_dir: PathBuf,
    pub lineage_file: PathBuf,
    pub health_report: PathBuf,
    pub prediction_report: PathBuf,
    /// Guards the production slot and the lineage ledger
    pub lock_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::rooted(Path::new(""))
    }
}

impl PathsConfig {
    /// The default layout placed under `root`
    pub fn rooted(root: &Path) -> Self {
        Self {
            reference_data: root.join("data/training_reference.csv"),
            prediction_log: root.join("data/inference_logs/predictions.csv"),
            experiments_dir: root.join("models/experiments"),
            production_dir: root.join("models/production"),
            lineage_file: root.join("models/lineage/lineage.json"),
            health_report: root.join("models/monitoring/health_report.json"),
            prediction_report: root.join("models/monitoring/prediction_report.json"),
            lock_file: root.join("models/.lifecycle.lock"),
        }
    }

    /// Resolve relative paths against `base` (typically the config file's directory)
    pub fn resolve_against(&mut self, base: &Path) {
        for path in [
            &mut self.reference_data,
            &mut self.prediction_log,
            &mut self.experiments_dir,
            &mut self.production_dir,
            &mut self.lineage_file,
            &mut self.health_report,
            &mut self.prediction_report,
            &mut self.lock_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Names of the files inside an experiment directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_file: String,
    pub metadata_file: String,
    /// Written into the production slot at promotion
    pub contract_file: String,
    /// Only experiment directories starting with this are candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_prefix: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_file: "model.pkl".to_string(),
            metadata_file: "metadata.json".to_string(),
            contract_file: "contract.json".to_string(),
            experiment_prefix: None,
        }
    }
}

/// Drift detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// A feature drifts when its PSI is strictly above this
    pub psi_threshold: f64,
    pub bins: usize,
    /// Live samples below this leave a feature unscored for the cycle
    pub min_live_samples: usize,
    pub policy: RetrainPolicy,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            psi_threshold: 0.2,
            bins: DEFAULT_BINS,
            min_live_samples: 20,
            policy: RetrainPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Metric that must strictly improve for a candidate to win
    pub metric: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { metric: DEFAULT_METRIC.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RollbackConfig {
    pub trigger: RollbackTrigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_seconds: 3600 }
    }
}

/// External retraining command
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainConfig {
    /// Program and arguments; empty disables retraining
    pub command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `relevo=debug`; overrides -v/-q
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}
