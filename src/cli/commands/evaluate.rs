//! Evaluate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::LifecycleConfig;
use crate::monitor::{HealthEvaluator, HealthReport};

/// Format a health report as a string
pub fn format_health_report(report: &HealthReport) -> String {
    let mut lines = vec![
        format!("  Evaluated features: {}", report.evaluated_features),
        format!("  Drifting features: {}", report.drifting_feature_count),
    ];
    for score in &report.drifting_features {
        lines.push(format!("    {}: PSI {:.4}", score.feature, score.psi));
    }
    for skipped in &report.skipped_features {
        lines.push(format!("  Skipped {}: {}", skipped.feature, skipped.reason));
    }
    lines.push(format!(
        "  Retraining recommended: {}",
        if report.retraining_recommended { "yes" } else { "no" }
    ));
    lines.join("\n")
}

pub fn run_evaluate(config: &LifecycleConfig, level: LogLevel) -> Result<(), String> {
    let evaluator = HealthEvaluator::from_config(config);
    let report = evaluator.evaluate().map_err(|e| format!("Health evaluation failed: {e}"))?;

    match report {
        Some(report) => {
            log(level, LogLevel::Normal, "Model health:");
            log(level, LogLevel::Normal, &format_health_report(&report));
            log(
                level,
                LogLevel::Verbose,
                &format!("Report written to {}", evaluator.report_path().display()),
            );
        }
        None => {
            let reason = evaluator
                .check_sources()
                .err()
                .map_or_else(|| "no data".to_string(), |e| e.to_string());
            log(level, LogLevel::Normal, &format!("Skipped: {reason}; no health report written"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{DriftScore, SkipReason, SkippedFeature};
    use chrono::Utc;

    #[test]
    fn test_format_health_report() {
        let report = HealthReport {
            drifting_feature_count: 1,
            drifting_features: vec![DriftScore { feature: "tenure".into(), psi: 0.4123 }],
            retraining_recommended: false,
            timestamp: Utc::now(),
            evaluated_features: 3,
            skipped_features: vec![SkippedFeature {
                feature: "charges".into(),
                reason: SkipReason::DegenerateReference,
            }],
        };
        let text = format_health_report(&report);
        assert!(text.contains("tenure: PSI 0.4123"));
        assert!(text.contains("Skipped charges"));
        assert!(text.contains("Retraining recommended: no"));
    }
}
