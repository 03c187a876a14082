//! Validate-record command implementation

use std::fs;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LifecycleConfig, ValidateRecordArgs};
use crate::lifecycle::SlotLock;
use crate::registry::{FeatureContract, ModelStore, Record};

pub fn run_validate_record(
    args: ValidateRecordArgs,
    config: &LifecycleConfig,
    level: LogLevel,
) -> Result<(), String> {
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read {}: {e}", args.file.display()))?;
    let record = Record::from_json(&text).map_err(|e| format!("Invalid record: {e}"))?;

    let store = ModelStore::from_config(config);
    let contract = {
        let lock = SlotLock::open(&config.paths.lock_file).map_err(|e| e.to_string())?;
        let _guard = lock.read().map_err(|e| e.to_string())?;
        FeatureContract::load(&store.production_contract_path())
            .map_err(|e| format!("No production contract: {e}"))?
    };

    match contract.validate(&record) {
        Ok(()) => {
            log(
                level,
                LogLevel::Normal,
                &format!("Record matches contract of {}", contract.model_version),
            );
            Ok(())
        }
        Err(violations) => {
            let details: Vec<String> = violations.iter().map(|v| format!("  {v}")).collect();
            Err(format!(
                "Record violates contract of {}:\n{}",
                contract.model_version,
                details.join("\n")
            ))
        }
    }
}
