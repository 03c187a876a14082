//! Promote command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LifecycleConfig, PromoteArgs};
use crate::lifecycle::{Promoter, Trigger};
use crate::registry::{MetadataCache, ModelSelector, ModelStore};
use crate::Error;

/// Trigger recorded for a hand-run promotion
pub fn manual_trigger(store: &ModelStore) -> Result<Trigger, String> {
    let current = store
        .current_version()
        .map_err(|e| format!("Failed to read production slot: {e}"))?;
    Ok(if current.is_some() { Trigger::Manual } else { Trigger::Bootstrap })
}

pub fn run_promote(
    args: PromoteArgs,
    config: &LifecycleConfig,
    level: LogLevel,
) -> Result<(), String> {
    let promoter = Promoter::from_config(config);
    let mut cache = MetadataCache::new();

    if args.skip_compare {
        log(level, LogLevel::Verbose, "Skipping champion/challenger comparison");
    } else {
        let selector = ModelSelector::new(&config.selection.metric);
        let decision = selector.select_from_store(promoter.store(), &mut cache, &args.version);
        if !decision.promote {
            return Err(format!(
                "{} not promoted: {} (use --skip-compare to force)",
                args.version, decision.reason
            ));
        }
    }

    let trigger = manual_trigger(promoter.store())?;
    let record = match promoter.promote(&args.version, trigger, &mut cache) {
        Ok(record) => record,
        Err(Error::AlreadyInProduction(version)) => {
            log(level, LogLevel::Normal, &format!("{version} is already in production; nothing to do"));
            return Ok(());
        }
        Err(e) => return Err(format!("Promotion failed: {e}")),
    };

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Promoted {} (replaced {})",
            record.model_version,
            record.parent_model.as_deref().unwrap_or("nothing")
        ),
    );
    Ok(())
}
