//! Integration tests for promotion, lineage and rollback through the public API

use std::fs;

use relevo::config::{parse_config, LifecycleConfig};
use relevo::lifecycle::{
    active_history, LifecycleScheduler, LineageLedger, Promoter, RollbackManager, TickOutcome,
    Trigger,
};
use relevo::registry::{DecisionReason, MetadataCache, ModelSelector, ModelStore};
use relevo::Error;
use tempfile::TempDir;

fn setup() -> (TempDir, LifecycleConfig) {
    let dir = TempDir::new().unwrap();
    let yaml = "rollback:\n  trigger:\n    kind: disabled\nselection:\n  metric: roc_auc\n";
    let mut config = parse_config(yaml).unwrap();
    config.paths.resolve_against(dir.path());
    (dir, config)
}

fn add_experiment(config: &LifecycleConfig, version: &str, schema: &[&str], auc: f64) {
    let store = ModelStore::from_config(config);
    fs::create_dir_all(store.experiment_dir(version)).unwrap();
    fs::write(store.artifact_path(version), version.as_bytes()).unwrap();
    let meta = serde_json::json!({
        "model_version": version,
        "training_date": "2025-03-01",
        "feature_schema": schema,
        "metrics": {"roc_auc": auc, "f1": 0.5},
        "dataset": "data/churn.csv",
        "framework": "sklearn",
    });
    fs::write(store.metadata_path(version), serde_json::to_vec_pretty(&meta).unwrap()).unwrap();
}

#[test]
fn test_champion_challenger_then_rollback() {
    let (_dir, config) = setup();
    let store = ModelStore::from_config(&config);
    let selector = ModelSelector::new(&config.selection.metric);
    let promoter = Promoter::from_config(&config);
    let mut cache = MetadataCache::new();

    add_experiment(&config, "churn_model_v1", &["tenure", "charges"], 0.80);
    let decision = selector.select_from_store(&store, &mut cache, "churn_model_v1");
    assert_eq!(decision.reason, DecisionReason::Bootstrap);
    promoter.promote("churn_model_v1", Trigger::Bootstrap, &mut cache).unwrap();

    add_experiment(&config, "churn_model_v2", &["tenure", "charges", "contract"], 0.83);
    let decision = selector.select_from_store(&store, &mut cache, "churn_model_v2");
    assert!(decision.promote);
    assert_eq!(decision.schema_diff.unwrap().added.len(), 1);
    promoter.promote("churn_model_v2", Trigger::DriftRetraining, &mut cache).unwrap();

    add_experiment(&config, "churn_model_v3", &["tenure"], 0.99);
    let decision = selector.select_from_store(&store, &mut cache, "churn_model_v3");
    assert!(!decision.promote);
    assert_eq!(decision.reason, DecisionReason::BreakingSchemaChange);

    // unknown metadata fields survive promotion
    let slot_meta: serde_json::Value =
        serde_json::from_slice(&fs::read(store.production_metadata_path()).unwrap()).unwrap();
    assert_eq!(slot_meta["framework"], "sklearn");

    let manager = RollbackManager::from_config(&config);
    let record = manager.rollback(&mut cache).unwrap();
    assert_eq!(record.model_version, "churn_model_v1");
    assert_eq!(store.current_version().unwrap().as_deref(), Some("churn_model_v1"));
    assert_eq!(fs::read(store.production_artifact_path()).unwrap(), b"churn_model_v1");

    let records = LineageLedger::new(&config.paths.lineage_file).load().unwrap();
    let triggers: Vec<Trigger> = records.iter().map(|r| r.trigger).collect();
    assert_eq!(triggers, [Trigger::Bootstrap, Trigger::DriftRetraining, Trigger::Rollback]);
    assert_eq!(active_history(&records).len(), 1);

    assert!(matches!(manager.rollback(&mut cache), Err(Error::NoRollbackTarget(1))));
}

#[test]
fn test_legacy_ledger_field_is_read() {
    let (_dir, config) = setup();
    add_experiment(&config, "v1", &["a"], 0.7);
    add_experiment(&config, "v2", &["a"], 0.8);

    let legacy = serde_json::json!([
        {"model_version": "v1", "timestamp": "2025-01-01T00:00:00Z", "dataset": "d",
         "trigger": "bootstrap", "parents_model": null, "metrics": {}},
        {"model_version": "v2", "timestamp": "2025-02-01T00:00:00Z", "dataset": "d",
         "trigger": "drift_retraining", "parents_model": "v1", "metrics": {}},
    ]);
    fs::create_dir_all(config.paths.lineage_file.parent().unwrap()).unwrap();
    fs::write(&config.paths.lineage_file, legacy.to_string()).unwrap();

    let ledger = LineageLedger::new(&config.paths.lineage_file);
    let records = ledger.load().unwrap();
    assert_eq!(records[1].parent_model.as_deref(), Some("v1"));

    let restored = RollbackManager::from_config(&config).rollback(&mut MetadataCache::new()).unwrap();
    assert_eq!(restored.model_version, "v1");
    assert_eq!(ledger.load().unwrap().len(), 3);
}

#[test]
fn test_scheduler_bootstraps_empty_slot() {
    let (dir, config) = setup();
    let mut reference = String::from("tenure,charges\n");
    let mut live = String::from("tenure,charges\n");
    for i in 0..100 {
        reference.push_str(&format!("{},{}\n", i % 50, 20 + i % 80));
        live.push_str(&format!("{},{}\n", 400 + i % 50, 900 + i % 80));
    }
    fs::create_dir_all(dir.path().join("data/inference_logs")).unwrap();
    fs::write(&config.paths.reference_data, reference).unwrap();
    fs::write(&config.paths.prediction_log, live).unwrap();
    add_experiment(&config, "churn_model_v1", &["tenure", "charges"], 0.8);

    let mut scheduler = LifecycleScheduler::from_config(&config).unwrap();
    assert_eq!(scheduler.tick().unwrap(), TickOutcome::Promoted("churn_model_v1".into()));

    let latest = LineageLedger::new(&config.paths.lineage_file).latest().unwrap().unwrap();
    assert_eq!(latest.trigger, Trigger::DriftRetraining);
    assert_eq!(latest.parent_model, None);
}
