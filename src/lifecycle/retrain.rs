//! Retraining collaborator.
//!
//! The loop never trains anything itself. A [`Retrainer`] produces (or
//! locates) a candidate experiment and hands back its version key.

use std::path::PathBuf;
use std::process::Command;

use crate::config::LifecycleConfig;
use crate::registry::ModelStore;
use crate::{Error, Result};

/// Produces a candidate version for champion/challenger selection
pub trait Retrainer {
    /// Run retraining and return the candidate's version key
    fn retrain(&self) -> Result<String>;
}

/// Runs an external training command, then picks the newest experiment
#[derive(Debug, Clone)]
pub struct CommandRetrainer {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    store: ModelStore,
}

impl CommandRetrainer {
    /// `command` is the program followed by its arguments
    pub fn new(command: &[String], working_dir: Option<PathBuf>, store: ModelStore) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::ConfigError("retrain command is empty".to_string()))?;
        Ok(Self { program: program.clone(), args: args.to_vec(), working_dir, store })
    }
}

impl Retrainer for CommandRetrainer {
    fn retrain(&self) -> Result<String> {
        tracing::info!(program = %self.program, args = ?self.args, "starting retraining");

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let status = command
            .status()
            .map_err(|e| Error::RetrainFailed(format!("failed to start '{}': {e}", self.program)))?;
        if !status.success() {
            return Err(Error::RetrainFailed(format!("'{}' exited with {status}", self.program)));
        }

        let version = self
            .store
            .latest_experiment()?
            .ok_or_else(|| Error::RetrainFailed("no experiment found after retraining".to_string()))?;
        tracing::info!(%version, "retraining produced candidate");
        Ok(version)
    }
}

/// Uses the newest existing experiment, for setups where training runs on
/// its own schedule outside the loop
#[derive(Debug, Clone)]
pub struct LatestExperiment {
    store: ModelStore,
}

impl LatestExperiment {
    pub fn new(store: ModelStore) -> Self {
        Self { store }
    }
}

impl Retrainer for LatestExperiment {
    fn retrain(&self) -> Result<String> {
        self.store
            .latest_experiment()?
            .ok_or_else(|| Error::RetrainFailed("no experiments available".to_string()))
    }
}

/// The retrainer a configuration asks for
pub fn retrainer_from_config(config: &LifecycleConfig) -> Result<Box<dyn Retrainer>> {
    let store = ModelStore::from_config(config);
    if config.retrain.command.is_empty() {
        tracing::debug!("no retrain command configured, using latest experiment");
        return Ok(Box::new(LatestExperiment::new(store)));
    }
    Ok(Box::new(CommandRetrainer::new(
        &config.retrain.command,
        config.retrain.working_dir.clone(),
        store,
    )?))
}
