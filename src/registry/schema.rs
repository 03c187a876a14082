//! Feature schema comparison between incumbent and candidate models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Classification of a schema change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaChange {
    Identical,
    /// Only new features; the incumbent's callers still supply everything
    Additive,
    /// At least one incumbent feature is gone
    Breaking,
}

impl SchemaChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaChange::Identical => "identical",
            SchemaChange::Additive => "additive",
            SchemaChange::Breaking => "breaking",
        }
    }
}

/// Membership difference between two feature schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDiff {
    /// In the candidate but not the incumbent
    pub added: BTreeSet<String>,
    /// In the incumbent but not the candidate
    pub removed: BTreeSet<String>,
    pub is_identical: bool,
}

impl SchemaDiff {
    pub fn change(&self) -> SchemaChange {
        if !self.removed.is_empty() {
            SchemaChange::Breaking
        } else if !self.added.is_empty() {
            SchemaChange::Additive
        } else {
            SchemaChange::Identical
        }
    }

    pub fn is_breaking(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Diff two schemas by membership only; order and duplicates are ignored
pub fn compare<I, C>(incumbent: I, candidate: C) -> SchemaDiff
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let incumbent: BTreeSet<String> =
        incumbent.into_iter().map(|f| f.as_ref().to_string()).collect();
    let candidate: BTreeSet<String> =
        candidate.into_iter().map(|f| f.as_ref().to_string()).collect();

    let added: BTreeSet<String> = candidate.difference(&incumbent).cloned().collect();
    let removed: BTreeSet<String> = incumbent.difference(&candidate).cloned().collect();
    let is_identical = added.is_empty() && removed.is_empty();

    SchemaDiff { added, removed, is_identical }
}
