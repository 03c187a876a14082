//! On-disk layout of experiments and the production slot.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{LifecycleConfig, ModelConfig, PathsConfig};
use crate::Result;

use super::contract::FeatureContract;
use super::metadata::ModelMetadata;

/// Name of the directory inside `production_dir` that serving reads from
pub const SLOT_DIR: &str = "current";

/// Resolves experiment and production paths
///
/// An experiment lives at `<experiments_dir>/<version>/`; the directory name
/// is the version key used everywhere else.
#[derive(Debug, Clone)]
pub struct ModelStore {
    experiments_dir: PathBuf,
    production_dir: PathBuf,
    model: ModelConfig,
}

impl ModelStore {
    pub fn new(paths: &PathsConfig, model: &ModelConfig) -> Self {
        Self {
            experiments_dir: paths.experiments_dir.clone(),
            production_dir: paths.production_dir.clone(),
            model: model.clone(),
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(&config.paths, &config.model)
    }

    pub fn experiments_dir(&self) -> &Path {
        &self.experiments_dir
    }

    pub fn production_dir(&self) -> &Path {
        &self.production_dir
    }

    pub fn artifact_file(&self) -> &str {
        &self.model.artifact_file
    }

    pub fn metadata_file(&self) -> &str {
        &self.model.metadata_file
    }

    pub fn contract_file(&self) -> &str {
        &self.model.contract_file
    }

    pub fn experiment_dir(&self, version: &str) -> PathBuf {
        self.experiments_dir.join(version)
    }

    pub fn artifact_path(&self, version: &str) -> PathBuf {
        self.experiment_dir(version).join(&self.model.artifact_file)
    }

    pub fn metadata_path(&self, version: &str) -> PathBuf {
        self.experiment_dir(version).join(&self.model.metadata_file)
    }

    /// An experiment exists when its directory holds an artifact
    pub fn has_artifact(&self, version: &str) -> bool {
        self.artifact_path(version).is_file()
    }

    pub fn slot_dir(&self) -> PathBuf {
        self.production_dir.join(SLOT_DIR)
    }

    pub fn production_artifact_path(&self) -> PathBuf {
        self.slot_dir().join(&self.model.artifact_file)
    }

    pub fn production_metadata_path(&self) -> PathBuf {
        self.slot_dir().join(&self.model.metadata_file)
    }

    pub fn production_contract_path(&self) -> PathBuf {
        self.slot_dir().join(&self.model.contract_file)
    }

    /// Experiment versions in lexicographic order, filtered by the configured prefix
    pub fn list_experiments(&self) -> Result<Vec<String>> {
        if !self.experiments_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = self.model.experiment_prefix.as_deref().unwrap_or("");
        let mut versions = Vec::new();
        for entry in fs::read_dir(&self.experiments_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(prefix) {
                versions.push(name);
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Newest experiment by name order
    pub fn latest_experiment(&self) -> Result<Option<String>> {
        Ok(self.list_experiments()?.pop())
    }

    /// Version key of the model in the production slot
    ///
    /// Read from the slot's feature contract. A slot populated without one
    /// falls back to the `model_version` field of its metadata.
    pub fn current_version(&self) -> Result<Option<String>> {
        let contract_path = self.production_contract_path();
        if contract_path.exists() {
            return Ok(Some(FeatureContract::load(&contract_path)?.model_version));
        }

        let metadata_path = self.production_metadata_path();
        if metadata_path.exists() {
            let meta = ModelMetadata::load(&metadata_path, "production")?;
            tracing::warn!(
                version = %meta.model_version,
                "production slot has no contract, using metadata version"
            );
            return Ok(Some(meta.model_version));
        }
        Ok(None)
    }
}
