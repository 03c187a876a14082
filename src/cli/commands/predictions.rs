//! Predictions command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::LifecycleConfig;
use crate::monitor::{PredictionMonitor, PredictionReport};

pub fn format_prediction_report(report: &PredictionReport) -> String {
    [
        format!("  Total predictions: {}", report.total_predictions),
        format!(
            "  Probability: mean {:.4}, std {:.4}, range [{:.4}, {:.4}]",
            report.avg_probability,
            report.std_probability,
            report.min_probability,
            report.max_probability
        ),
        format!("  High risk: {:.1}%", report.high_risk_ratio * 100.0),
        format!("  Low risk: {:.1}%", report.low_risk_ratio * 100.0),
    ]
    .join("\n")
}

pub fn run_predictions(config: &LifecycleConfig, level: LogLevel) -> Result<(), String> {
    let report = PredictionMonitor::from_config(config)
        .generate()
        .map_err(|e| format!("Prediction report failed: {e}"))?;

    match report {
        Some(report) => {
            log(level, LogLevel::Normal, "Prediction summary:");
            log(level, LogLevel::Normal, &format_prediction_report(&report));
        }
        None => log(level, LogLevel::Normal, "No usable predictions logged"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prediction_report() {
        let report = PredictionReport::from_probabilities(&[0.1, 0.5, 0.9, 0.8], 5).unwrap();
        let text = format_prediction_report(&report);
        assert!(text.contains("Total predictions: 5"));
        assert!(text.contains("High risk: 50.0%"));
        assert!(text.contains("Low risk: 25.0%"));
    }
}
