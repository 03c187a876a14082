//! Compare command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CompareArgs, LifecycleConfig};
use crate::registry::{MetadataCache, ModelSelector, ModelStore, PromotionDecision};

/// Format a champion/challenger decision as a string
pub fn format_decision(candidate: &str, metric: &str, decision: &PromotionDecision) -> String {
    let mut lines = vec![
        format!("  Candidate: {candidate}"),
        format!("  Decision: {}", if decision.promote { "promote" } else { "retain incumbent" }),
        format!("  Reason: {}", decision.reason),
    ];
    if let Some(m) = decision.incumbent_metric {
        lines.push(format!("  Incumbent {metric}: {m:.4}"));
    }
    if let Some(m) = decision.candidate_metric {
        lines.push(format!("  Candidate {metric}: {m:.4}"));
    }
    if let Some(change) = decision.schema_change() {
        lines.push(format!("  Schema change: {}", change.as_str()));
    }
    if let Some(diff) = &decision.schema_diff {
        if !diff.added.is_empty() {
            lines.push(format!("  Added features: {:?}", diff.added));
        }
        if !diff.removed.is_empty() {
            lines.push(format!("  Removed features: {:?}", diff.removed));
        }
    }
    if let Some(detail) = &decision.detail {
        lines.push(format!("  Detail: {detail}"));
    }
    lines.join("\n")
}

/// The explicit version, or the newest experiment
pub(super) fn candidate_version(
    store: &ModelStore,
    explicit: Option<String>,
) -> Result<String, String> {
    if let Some(version) = explicit {
        return Ok(version);
    }
    store
        .latest_experiment()
        .map_err(|e| format!("Failed to list experiments: {e}"))?
        .ok_or_else(|| "No experiments found".to_string())
}

pub fn run_compare(
    args: CompareArgs,
    config: &LifecycleConfig,
    level: LogLevel,
) -> Result<(), String> {
    let store = ModelStore::from_config(config);
    let candidate = candidate_version(&store, args.version)?;
    let selector = ModelSelector::new(&config.selection.metric);

    let decision = selector.select_from_store(&store, &mut MetadataCache::new(), &candidate);
    log(level, LogLevel::Normal, "Champion/challenger comparison:");
    log(level, LogLevel::Normal, &format_decision(&candidate, selector.metric(), &decision));
    Ok(())
}
