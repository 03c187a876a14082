//! CLI command tests
//!
//! Drive `run_command` end to end against a temporary model tree.

use super::*;
use crate::config::parse_args;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a config file whose relative paths resolve inside `dir`
fn create_test_config(dir: &TempDir) -> PathBuf {
    let config_path = dir.path().join("relevo.yaml");
    fs::write(&config_path, "rollback:\n  trigger:\n    kind: disabled\n").unwrap();
    config_path
}

fn add_experiment(dir: &TempDir, version: &str, auc: f64) {
    let exp = dir.path().join("models/experiments").join(version);
    fs::create_dir_all(&exp).unwrap();
    fs::write(exp.join("model.pkl"), format!("artifact-{version}")).unwrap();
    let meta = serde_json::json!({
        "model_version": version,
        "training_date": "2025-03-01",
        "feature_schema": ["tenure", "contract"],
        "metrics": {"roc_auc": auc},
        "dataset": "data/train.csv",
    });
    fs::write(exp.join("metadata.json"), meta.to_string()).unwrap();
}

fn run(config: &PathBuf, args: &[&str]) -> Result<(), String> {
    let mut argv = vec!["relevo", "-q", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    run_command(parse_args(argv).unwrap())
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");
    let err = run(&missing, &["status"]).unwrap_err();
    assert!(err.contains("Config error"));
}

#[test]
fn test_status_on_empty_tree() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    assert!(run(&config, &["status"]).is_ok());
}

#[test]
fn test_evaluate_without_data_is_ok() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    assert!(run(&config, &["evaluate"]).is_ok());
    assert!(!dir.path().join("models/monitoring/health_report.json").exists());
}

#[test]
fn test_evaluate_writes_report() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let mut csv = String::from("tenure\n");
    for i in 0..50 {
        csv.push_str(&format!("{i}\n"));
    }
    fs::create_dir_all(dir.path().join("data/inference_logs")).unwrap();
    fs::write(dir.path().join("data/training_reference.csv"), &csv).unwrap();
    fs::write(dir.path().join("data/inference_logs/predictions.csv"), &csv).unwrap();

    assert!(run(&config, &["evaluate"]).is_ok());
    assert!(dir.path().join("models/monitoring/health_report.json").exists());
}

#[test]
fn test_promote_compare_and_rollback() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    add_experiment(&dir, "churn_model_v1", 0.80);
    add_experiment(&dir, "churn_model_v2", 0.78);

    assert!(run(&config, &["promote", "churn_model_v1"]).is_ok());
    assert!(run(&config, &["compare"]).is_ok());

    let err = run(&config, &["promote", "churn_model_v2"]).unwrap_err();
    assert!(err.contains("not_improved"));

    assert!(run(&config, &["promote", "churn_model_v2", "--skip-compare"]).is_ok());
    assert!(run(&config, &["lineage", "--json"]).is_ok());

    assert!(run(&config, &["rollback"]).is_ok());
    assert!(run(&config, &["rollback", "--force"]).is_ok());
    let err = run(&config, &["rollback", "--force"]).unwrap_err();
    assert!(err.contains("Rollback failed"));

    let slot = dir.path().join("models/production/current/model.pkl");
    assert_eq!(fs::read_to_string(slot).unwrap(), "artifact-churn_model_v1");
}

#[test]
fn test_promote_current_version_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    add_experiment(&dir, "churn_model_v1", 0.80);

    run(&config, &["promote", "churn_model_v1"]).unwrap();
    assert!(run(&config, &["promote", "churn_model_v1", "--skip-compare"]).is_ok());

    let ledger: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("models/lineage/lineage.json")).unwrap()).unwrap();
    assert_eq!(ledger.as_array().unwrap().len(), 1);
}

#[test]
fn test_validate_record() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    add_experiment(&dir, "churn_model_v1", 0.80);

    let record = dir.path().join("record.json");
    fs::write(&record, r#"{"tenure": "12", "contract": "Two Year"}"#).unwrap();
    assert!(run(&config, &["validate-record", record.to_str().unwrap()]).is_err());

    run(&config, &["promote", "churn_model_v1"]).unwrap();
    assert!(run(&config, &["validate-record", record.to_str().unwrap()]).is_ok());

    fs::write(&record, r#"{"contract": "Two Year", "tenure": "12"}"#).unwrap();
    let err = run(&config, &["validate-record", record.to_str().unwrap()]).unwrap_err();
    assert!(err.contains("violates contract"));
}

#[test]
fn test_run_once_without_data() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    assert!(run(&config, &["run", "--once"]).is_ok());
}
