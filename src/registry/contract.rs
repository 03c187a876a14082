//! Static per-version feature contract for the serving boundary.
//!
//! Generated once at promotion time from the candidate's ordered feature
//! schema and the reference data, then written into the production slot.
//! Serving validates each request structurally against it instead of
//! deriving a schema at request time.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::metadata::ModelMetadata;
use crate::data::FeatureTable;
use crate::io::{read_json, write_json_atomic};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Must be a JSON number
    Numeric,
    /// Must be a JSON string
    Categorical,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Categorical => write!(f, "categorical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractField {
    pub name: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    Missing { field: String },
    Unexpected { field: String },
    Duplicate { field: String },
    WrongType { field: String, expected: FieldKind, found: &'static str },
    /// Shared fields appear in a different order than the contract's
    Misordered { expected: Vec<String>, found: Vec<String> },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::Missing { field } => write!(f, "missing field '{field}'"),
            ContractViolation::Unexpected { field } => write!(f, "unexpected field '{field}'"),
            ContractViolation::Duplicate { field } => write!(f, "duplicate field '{field}'"),
            ContractViolation::WrongType { field, expected, found } => {
                write!(f, "field '{field}' must be {expected}, got {found}")
            }
            ContractViolation::Misordered { expected, found } => {
                write!(f, "fields out of order: expected {expected:?}, got {found:?}")
            }
        }
    }
}

/// A request record with its field order preserved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::Serialization(format!("record must be a JSON object: {e}")))
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Record, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    entries.push((key, value));
                }
                Ok(Record { entries })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContract {
    /// Version key of the model this contract belongs to
    pub model_version: String,
    pub generated_at: DateTime<Utc>,
    pub fields: Vec<ContractField>,
}

impl FeatureContract {
    /// Build the contract for `version` from its metadata
    ///
    /// A field is numeric when the reference data holds it as a numeric
    /// column; otherwise it is categorical.
    pub fn generate(version: &str, metadata: &ModelMetadata, reference: Option<&FeatureTable>) -> Self {
        let fields = metadata
            .feature_schema
            .iter()
            .map(|name| {
                let numeric = reference
                    .and_then(|t| t.column(name))
                    .is_some_and(|c| c.is_numeric());
                if reference.is_some_and(|t| !t.contains(name)) {
                    tracing::warn!(field = %name, "feature absent from reference data, typed as categorical");
                }
                let kind = if numeric { FieldKind::Numeric } else { FieldKind::Categorical };
                ContractField { name: name.clone(), kind }
            })
            .collect();

        Self { model_version: version.to_string(), generated_at: Utc::now(), fields }
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Check a record against the contract; all violations are reported
    pub fn validate(&self, record: &Record) -> std::result::Result<(), Vec<ContractViolation>> {
        let mut violations = Vec::new();
        let expected: HashSet<&str> = self.field_names().collect();

        let mut seen = HashSet::new();
        for (name, _) in record.entries() {
            if !seen.insert(name.as_str()) {
                violations.push(ContractViolation::Duplicate { field: name.clone() });
            } else if !expected.contains(name.as_str()) {
                violations.push(ContractViolation::Unexpected { field: name.clone() });
            }
        }

        for field in &self.fields {
            let Some((_, value)) = record.entries().iter().find(|(n, _)| *n == field.name) else {
                violations.push(ContractViolation::Missing { field: field.name.clone() });
                continue;
            };
            let ok = match field.kind {
                FieldKind::Numeric => value.is_number(),
                FieldKind::Categorical => value.is_string(),
            };
            if !ok {
                violations.push(ContractViolation::WrongType {
                    field: field.name.clone(),
                    expected: field.kind,
                    found: json_type(value),
                });
            }
        }

        let found_order: Vec<String> = record
            .entries()
            .iter()
            .map(|(n, _)| n.clone())
            .filter(|n| expected.contains(n.as_str()))
            .collect();
        let present: HashSet<&str> = found_order.iter().map(String::as_str).collect();
        let expected_order: Vec<String> = self
            .field_names()
            .filter(|n| present.contains(n))
            .map(String::from)
            .collect();
        if found_order.len() == expected_order.len() && found_order != expected_order {
            violations.push(ContractViolation::Misordered { expected: expected_order, found: found_order });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn contract() -> FeatureContract {
        FeatureContract {
            model_version: "churn_model_v2".to_string(),
            generated_at: Utc::now(),
            fields: vec![
                ContractField { name: "tenure".into(), kind: FieldKind::Numeric },
                ContractField { name: "contract".into(), kind: FieldKind::Categorical },
                ContractField { name: "charges".into(), kind: FieldKind::Numeric },
            ],
        }
    }

    fn record(text: &str) -> Record {
        Record::from_json(text).expect("record should parse")
    }

    #[test]
    fn test_valid_record() {
        let r = record(r#"{"tenure": 12, "contract": "Two Year", "charges": 70.5}"#);
        assert_eq!(contract().validate(&r), Ok(()));
    }

    #[test]
    fn test_missing_and_extra() {
        let r = record(r#"{"tenure": 12, "contract": "Two Year", "gender": "F"}"#);
        let violations = contract().validate(&r).unwrap_err();
        assert!(violations.contains(&ContractViolation::Missing { field: "charges".into() }));
        assert!(violations.contains(&ContractViolation::Unexpected { field: "gender".into() }));
    }

    #[test]
    fn test_misordered() {
        let r = record(r#"{"contract": "Two Year", "tenure": 12, "charges": 70.5}"#);
        let violations = contract().validate(&r).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(matches!(&violations[0], ContractViolation::Misordered { found, .. } if found[0] == "contract"));
    }

    #[test]
    fn test_mistyped() {
        let r = record(r#"{"tenure": "12", "contract": "Two Year", "charges": null}"#);
        let violations = contract().validate(&r).unwrap_err();
        assert_eq!(
            violations,
            vec![
                ContractViolation::WrongType {
                    field: "tenure".into(),
                    expected: FieldKind::Numeric,
                    found: "string"
                },
                ContractViolation::WrongType {
                    field: "charges".into(),
                    expected: FieldKind::Numeric,
                    found: "null"
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_field() {
        let r = record(r#"{"tenure": 1, "tenure": 2, "contract": "x", "charges": 1.0}"#);
        let violations = contract().validate(&r).unwrap_err();
        assert!(violations.contains(&ContractViolation::Duplicate { field: "tenure".into() }));
    }

    #[test]
    fn test_record_must_be_object() {
        assert!(Record::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_generate_from_reference() {
        let meta: ModelMetadata = serde_json::from_value(serde_json::json!({
            "model_version": "v2",
            "training_date": "2025-03-01",
            "feature_schema": ["tenure", "contract"],
            "metrics": {"roc_auc": 0.8},
            "dataset": "telco.csv",
        }))
        .unwrap();
        let reference = FeatureTable::from_columns(vec![
            ("tenure".into(), Column::Numeric(vec![Some(1.0)])),
            ("contract".into(), Column::Text(vec![Some("Two Year".into())])),
        ])
        .unwrap();

        let contract = FeatureContract::generate("churn_model_v2", &meta, Some(&reference));
        assert_eq!(contract.model_version, "churn_model_v2");
        assert_eq!(contract.fields[0].kind, FieldKind::Numeric);
        assert_eq!(contract.fields[1].kind, FieldKind::Categorical);
        assert_eq!(contract.field_names().collect::<Vec<_>>(), vec!["tenure", "contract"]);
    }
}
