//! Champion/challenger selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::{MetadataCache, ModelMetadata};
use super::schema::{compare, SchemaChange, SchemaDiff};
use super::store::ModelStore;
use crate::{Error, Result};

/// Default metric compared between incumbent and candidate
pub const DEFAULT_METRIC: &str = "roc_auc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// No incumbent; the first model is always promoted
    Bootstrap,
    Improved,
    /// Tie or regression; the incumbent stays
    NotImproved,
    BreakingSchemaChange,
    /// Metadata could not be read or compared
    ComparisonError,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::Bootstrap => "bootstrap",
            DecisionReason::Improved => "improved",
            DecisionReason::NotImproved => "not_improved",
            DecisionReason::BreakingSchemaChange => "breaking_schema_change",
            DecisionReason::ComparisonError => "comparison_error",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionDecision {
    pub promote: bool,
    pub reason: DecisionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_diff: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incumbent_metric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_metric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PromotionDecision {
    fn new(promote: bool, reason: DecisionReason) -> Self {
        Self {
            promote,
            reason,
            schema_diff: None,
            incumbent_metric: None,
            candidate_metric: None,
            detail: None,
        }
    }

    /// Identical, additive or breaking; `None` when no schemas were compared
    pub fn schema_change(&self) -> Option<SchemaChange> {
        self.schema_diff.as_ref().map(SchemaDiff::change)
    }

    /// Fail-closed rejection
    pub fn comparison_error(detail: impl Into<String>) -> Self {
        Self { detail: Some(detail.into()), ..Self::new(false, DecisionReason::ComparisonError) }
    }
}

/// Decides whether a candidate replaces the incumbent
#[derive(Debug, Clone)]
pub struct ModelSelector {
    metric: String,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC)
    }
}

impl ModelSelector {
    pub fn new(metric: impl Into<String>) -> Self {
        Self { metric: metric.into() }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Pure decision over loaded metadata
    ///
    /// In order: bootstrap when there is no incumbent, reject any removed
    /// feature, then require a strictly greater metric. A candidate without
    /// the metric cannot be compared and is rejected; an incumbent without
    /// it scores 0.
    pub fn select(
        &self,
        incumbent: Option<&ModelMetadata>,
        candidate: &ModelMetadata,
    ) -> PromotionDecision {
        let Some(incumbent) = incumbent else {
            return PromotionDecision {
                candidate_metric: candidate.metric(&self.metric),
                ..PromotionDecision::new(true, DecisionReason::Bootstrap)
            };
        };

        let diff = compare(&incumbent.feature_schema, &candidate.feature_schema);
        if diff.is_breaking() {
            return PromotionDecision {
                schema_diff: Some(diff),
                ..PromotionDecision::new(false, DecisionReason::BreakingSchemaChange)
            };
        }

        let Some(candidate_metric) = candidate.metric(&self.metric) else {
            return PromotionDecision {
                schema_diff: Some(diff),
                ..PromotionDecision::comparison_error(format!(
                    "candidate has no '{}' metric",
                    self.metric
                ))
            };
        };
        let incumbent_metric = incumbent.metric(&self.metric).unwrap_or(0.0);

        let (promote, reason) = if candidate_metric > incumbent_metric {
            (true, DecisionReason::Improved)
        } else {
            (false, DecisionReason::NotImproved)
        };
        PromotionDecision {
            schema_diff: Some(diff),
            incumbent_metric: Some(incumbent_metric),
            candidate_metric: Some(candidate_metric),
            ..PromotionDecision::new(promote, reason)
        }
    }

    /// Load metadata for `candidate_version` and the production slot, then decide
    ///
    /// Never fails: unreadable or corrupt metadata on either side is a
    /// `comparison_error` rejection.
    pub fn select_from_store(
        &self,
        store: &ModelStore,
        cache: &mut MetadataCache,
        candidate_version: &str,
    ) -> PromotionDecision {
        let decision = match load_pair(store, cache, candidate_version) {
            Ok((incumbent, candidate)) => self.select(incumbent.as_ref(), &candidate),
            Err(e) => PromotionDecision::comparison_error(e.to_string()),
        };
        log_decision(candidate_version, &self.metric, &decision);
        decision
    }
}

/// Incumbent (if any) and candidate metadata; load failures become
/// [`Error::ComparisonError`]
fn load_pair(
    store: &ModelStore,
    cache: &mut MetadataCache,
    candidate_version: &str,
) -> Result<(Option<ModelMetadata>, ModelMetadata)> {
    let candidate = cache
        .experiment(store, candidate_version)
        .map_err(|e| Error::ComparisonError(format!("candidate: {e}")))?;
    let incumbent = cache
        .production(store)
        .map_err(|e| Error::ComparisonError(format!("incumbent: {e}")))?;
    Ok((incumbent, candidate))
}

fn log_decision(version: &str, metric: &str, decision: &PromotionDecision) {
    match decision.reason {
        DecisionReason::BreakingSchemaChange => {
            let removed = decision.schema_diff.as_ref().map(|d| d.removed.len()).unwrap_or(0);
            tracing::warn!(version, removed, "breaking schema change, promotion blocked");
        }
        DecisionReason::ComparisonError => {
            tracing::error!(version, detail = ?decision.detail, "comparison failed, promotion blocked");
        }
        reason => tracing::info!(
            version,
            metric,
            schema = decision.schema_change().map(|c| c.as_str()).unwrap_or("none"),
            incumbent = ?decision.incumbent_metric,
            candidate = ?decision.candidate_metric,
            promote = decision.promote,
            %reason,
            "champion/challenger decision"
        ),
    }
}
