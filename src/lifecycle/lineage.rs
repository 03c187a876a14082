//! Append-only lineage ledger of production slot changes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::io::{read_json_opt, write_json_atomic};
use crate::registry::ModelMetadata;
use crate::{Error, Result};

/// Why the production slot changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Scheduler retrained after drift and the candidate won
    DriftRetraining,
    /// Operator promotion
    Manual,
    /// First model into an empty slot
    Bootstrap,
    /// Previous version restored
    Rollback,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::DriftRetraining => "drift_retraining",
            Trigger::Manual => "manual",
            Trigger::Bootstrap => "bootstrap",
            Trigger::Rollback => "rollback",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Version key now in the slot
    pub model_version: String,
    pub timestamp: DateTime<Utc>,
    pub dataset: String,
    pub trigger: Trigger,
    /// Version key the slot held before this change
    #[serde(default, alias = "parents_model")]
    pub parent_model: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl LineageRecord {
    pub fn new(
        version: &str,
        metadata: &ModelMetadata,
        trigger: Trigger,
        parent_model: Option<String>,
    ) -> Self {
        Self {
            model_version: version.to_string(),
            timestamp: Utc::now(),
            dataset: metadata.dataset.clone(),
            trigger,
            parent_model,
            metrics: metadata.metrics.clone(),
        }
    }
}

/// Promotions still in effect, oldest first
///
/// Every promotion pushes onto the history and every rollback pops the
/// version it replaced, so the last entry is what the slot should hold and
/// the one before it is the rollback target.
pub fn active_history(records: &[LineageRecord]) -> Vec<&LineageRecord> {
    let mut stack: Vec<&LineageRecord> = Vec::new();
    for record in records {
        if record.trigger == Trigger::Rollback {
            stack.pop();
            if stack.last().map(|r| r.model_version.as_str()) != Some(record.model_version.as_str()) {
                tracing::warn!(
                    version = %record.model_version,
                    "rollback record does not match the restored promotion"
                );
            }
        } else {
            stack.push(record);
        }
    }
    stack
}

/// JSON-array ledger on disk
///
/// Records are only ever appended. The whole array is rewritten through a
/// temp file and rename, so readers see either the old or the new ledger.
#[derive(Debug, Clone)]
pub struct LineageLedger {
    path: PathBuf,
}

impl LineageLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order; empty if the ledger does not exist yet
    pub fn load(&self) -> Result<Vec<LineageRecord>> {
        match read_json_opt(&self.path) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(Error::Serialization(msg)) => Err(Error::Ledger(msg)),
            Err(e) => Err(e),
        }
    }

    pub fn append(&self, record: &LineageRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record.clone());
        write_json_atomic(&self.path, &records)?;
        tracing::info!(
            version = %record.model_version,
            trigger = %record.trigger,
            parent = ?record.parent_model,
            entries = records.len(),
            "lineage recorded"
        );
        Ok(())
    }

    pub fn latest(&self) -> Result<Option<LineageRecord>> {
        Ok(self.load()?.pop())
    }

    /// Version the ledger says is serving, if any
    pub fn active_version(&self) -> Result<Option<String>> {
        let records = self.load()?;
        Ok(active_history(&records).last().map(|r| r.model_version.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, trigger: Trigger, parent: Option<&str>) -> LineageRecord {
        LineageRecord {
            model_version: version.to_string(),
            timestamp: Utc::now(),
            dataset: "data/telco.csv".to_string(),
            trigger,
            parent_model: parent.map(String::from),
            metrics: BTreeMap::from([("roc_auc".to_string(), 0.8)]),
        }
    }

    fn versions(records: &[LineageRecord]) -> Vec<&str> {
        active_history(records).iter().map(|r| r.model_version.as_str()).collect()
    }

    #[test]
    fn test_active_history_without_rollbacks() {
        let records = vec![
            record("v1", Trigger::Bootstrap, None),
            record("v2", Trigger::DriftRetraining, Some("v1")),
            record("v3", Trigger::Manual, Some("v2")),
        ];
        assert_eq!(versions(&records), vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_active_history_pops_on_rollback() {
        let records = vec![
            record("v1", Trigger::Bootstrap, None),
            record("v2", Trigger::DriftRetraining, Some("v1")),
            record("v3", Trigger::DriftRetraining, Some("v2")),
            record("v2", Trigger::Rollback, Some("v3")),
            record("v1", Trigger::Rollback, Some("v2")),
        ];
        assert_eq!(versions(&records), vec!["v1"]);
    }

    #[test]
    fn test_active_history_promotion_after_rollback() {
        let records = vec![
            record("v1", Trigger::Bootstrap, None),
            record("v2", Trigger::DriftRetraining, Some("v1")),
            record("v1", Trigger::Rollback, Some("v2")),
            record("v4", Trigger::DriftRetraining, Some("v1")),
        ];
        assert_eq!(versions(&records), vec!["v1", "v4"]);
    }

    #[test]
    fn test_ledger_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LineageLedger::new(dir.path().join("lineage/lineage.json"));
        assert!(ledger.load().unwrap().is_empty());
        assert_eq!(ledger.active_version().unwrap(), None);

        ledger.append(&record("v1", Trigger::Bootstrap, None)).unwrap();
        ledger.append(&record("v2", Trigger::Manual, Some("v1"))).unwrap();

        let records = ledger.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_model.as_deref(), Some("v1"));
        assert_eq!(ledger.latest().unwrap().unwrap().model_version, "v2");
        assert_eq!(ledger.active_version().unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_ledger_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LineageLedger::new(dir.path().join("lineage.json"));
        ledger.append(&record("v1", Trigger::DriftRetraining, None)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(ledger.path()).unwrap()).unwrap();
        let entry = &raw.as_array().unwrap()[0];
        assert_eq!(entry["trigger"], "drift_retraining");
        assert!(entry["parent_model"].is_null());
        assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_ledger_reads_legacy_parent_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.json");
        std::fs::write(
            &path,
            r#"[{"model_version": "churn_model_v2", "timestamp": "2025-01-01T00:00:00+00:00",
                 "dataset": "d.csv", "trigger": "manual", "parents_model": "churn_model_v1",
                 "metrics": {"roc_auc": 0.8}}]"#,
        )
        .unwrap();

        let records = LineageLedger::new(&path).load().unwrap();
        assert_eq!(records[0].parent_model.as_deref(), Some("churn_model_v1"));
    }

    #[test]
    fn test_ledger_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.json");
        std::fs::write(&path, "[{").unwrap();
        assert!(matches!(LineageLedger::new(&path).load(), Err(Error::Ledger(_))));
    }
}
