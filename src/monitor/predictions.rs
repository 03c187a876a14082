//! Prediction monitoring over the serving log.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LifecycleConfig;
use crate::data::{Column, FeatureTable};
use crate::io::{read_json_opt, write_json_atomic};
use crate::Result;

/// Log column holding the model's positive-class probability
pub const PROBABILITY_COLUMN: &str = "prediction_probability";
/// Log column holding the RFC 3339 time the prediction was served
pub const TIMESTAMP_COLUMN: &str = "timestamp";

pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
pub const LOW_RISK_THRESHOLD: f64 = 0.3;

/// Summary statistics over logged prediction probabilities
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub timestamp: DateTime<Utc>,
    pub total_predictions: usize,
    pub avg_probability: f64,
    /// Sample standard deviation; 0 with fewer than two values
    pub std_probability: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    pub high_risk_ratio: f64,
    pub low_risk_ratio: f64,
}

impl PredictionReport {
    /// Summarize `probabilities` out of `total` logged rows
    ///
    /// Returns `None` when there is nothing to summarize.
    pub fn from_probabilities(probabilities: &[f64], total: usize) -> Option<Self> {
        if probabilities.is_empty() {
            return None;
        }
        let n = probabilities.len() as f64;
        let mean = probabilities.iter().sum::<f64>() / n;
        let std = if probabilities.len() > 1 {
            let var = probabilities.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        let ratio = |pred: fn(f64) -> bool| {
            probabilities.iter().filter(|&&p| pred(p)).count() as f64 / n
        };

        Some(Self {
            timestamp: Utc::now(),
            total_predictions: total,
            avg_probability: mean,
            std_probability: std,
            min_probability: probabilities.iter().copied().fold(f64::INFINITY, f64::min),
            max_probability: probabilities.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            high_risk_ratio: ratio(|p| p > HIGH_RISK_THRESHOLD),
            low_risk_ratio: ratio(|p| p < LOW_RISK_THRESHOLD),
        })
    }

    pub fn load(path: &Path) -> Result<Option<Self>> {
        read_json_opt(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }
}

/// Produces [`PredictionReport`]s from the serving log
#[derive(Clone, Debug)]
pub struct PredictionMonitor {
    log_path: PathBuf,
    report_path: PathBuf,
}

impl PredictionMonitor {
    pub fn new(log_path: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        Self { log_path: log_path.into(), report_path: report_path.into() }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(&config.paths.prediction_log, &config.paths.prediction_report)
    }

    /// Generate and persist a prediction report
    ///
    /// A missing or empty log, or one without a probability column, is not
    /// an error: it yields `Ok(None)` and leaves any previous report alone.
    pub fn generate(&self) -> Result<Option<PredictionReport>> {
        if !self.log_path.exists() {
            tracing::warn!(path = %self.log_path.display(), "no prediction log found");
            return Ok(None);
        }

        let log = FeatureTable::from_csv(&self.log_path)?;
        if log.is_empty() {
            tracing::warn!("prediction log is empty");
            return Ok(None);
        }
        let Some(probabilities) = log.numeric_values(PROBABILITY_COLUMN) else {
            tracing::warn!(column = PROBABILITY_COLUMN, "probability column missing");
            return Ok(None);
        };
        let Some(report) = PredictionReport::from_probabilities(&probabilities, log.num_rows())
        else {
            tracing::warn!("no usable probabilities in prediction log");
            return Ok(None);
        };

        report.save(&self.report_path)?;
        tracing::info!(
            total = report.total_predictions,
            avg = report.avg_probability,
            high_risk = report.high_risk_ratio,
            "prediction report written"
        );
        Ok(Some(report))
    }
}

/// Split logged probabilities into those served in `[since, at)` and at-or-after `at`
///
/// With `since` of `None` the first window is open on the left. Rows older
/// than `since`, with an unparseable timestamp or a missing probability are
/// dropped. Returns `None` if the log lacks either column.
pub fn split_probabilities_at(
    log: &FeatureTable,
    since: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let Column::Numeric(probabilities) = log.column(PROBABILITY_COLUMN)? else {
        return None;
    };
    let Column::Text(timestamps) = log.column(TIMESTAMP_COLUMN)? else {
        return None;
    };

    let mut before = Vec::new();
    let mut after = Vec::new();
    for (prob, ts) in probabilities.iter().zip(timestamps) {
        let (Some(prob), Some(ts)) = (prob, ts) else {
            continue;
        };
        let Ok(ts) = DateTime::parse_from_rfc3339(ts) else {
            continue;
        };
        if !prob.is_finite() {
            continue;
        }
        let ts = ts.with_timezone(&Utc);
        if since.is_some_and(|since| ts < since) {
            continue;
        }
        if ts < at {
            before.push(*prob);
        } else {
            after.push(*prob);
        }
    }
    Some((before, after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_report_statistics() {
        let report = PredictionReport::from_probabilities(&[0.1, 0.5, 0.9, 0.8], 4).unwrap();
        assert_eq!(report.total_predictions, 4);
        assert_relative_eq!(report.avg_probability, 0.575);
        assert_relative_eq!(report.min_probability, 0.1);
        assert_relative_eq!(report.max_probability, 0.9);
        assert_relative_eq!(report.high_risk_ratio, 0.5);
        assert_relative_eq!(report.low_risk_ratio, 0.25);
        assert!(report.std_probability > 0.0);
    }

    #[test]
    fn test_report_single_value_has_zero_std() {
        let report = PredictionReport::from_probabilities(&[0.4], 1).unwrap();
        assert_eq!(report.std_probability, 0.0);
    }

    #[test]
    fn test_report_empty_is_none() {
        assert!(PredictionReport::from_probabilities(&[], 0).is_none());
    }

    #[test]
    fn test_generate_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let monitor =
            PredictionMonitor::new(dir.path().join("predictions.csv"), dir.path().join("r.json"));
        assert!(monitor.generate().unwrap().is_none());
    }

    #[test]
    fn test_generate_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("predictions.csv");
        std::fs::write(&log, "tenure,charges\n1,2\n").unwrap();
        let report_path = dir.path().join("r.json");

        let monitor = PredictionMonitor::new(&log, &report_path);
        assert!(monitor.generate().unwrap().is_none());
        assert!(!report_path.exists());
    }

    #[test]
    fn test_generate_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("predictions.csv");
        std::fs::write(
            &log,
            "prediction,prediction_probability,tenure\n1,0.9,3\n0,0.2,40\n0,0.1,50\n",
        )
        .unwrap();
        let report_path = dir.path().join("monitoring/prediction_report.json");

        let monitor = PredictionMonitor::new(&log, &report_path);
        let report = monitor.generate().unwrap().expect("report should be generated");
        assert_eq!(report.total_predictions, 3);
        assert_eq!(PredictionReport::load(&report_path).unwrap(), Some(report));
    }

    #[test]
    fn test_split_probabilities_at() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("predictions.csv");
        std::fs::write(
            &log,
            "prediction_probability,timestamp\n\
             0.1,2025-01-01T00:00:00+00:00\n\
             0.2,2025-01-02T00:00:00+00:00\n\
             0.9,2025-01-03T00:00:00+00:00\n\
             0.8,not-a-time\n",
        )
        .unwrap();
        let table = FeatureTable::from_csv(&log).unwrap();

        let at = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let (before, after) = split_probabilities_at(&table, None, at).unwrap();
        assert_eq!(before, vec![0.1]);
        assert_eq!(after, vec![0.2, 0.9]);

        let since = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
        let (before, after) = split_probabilities_at(&table, Some(since), at).unwrap();
        assert_eq!(before, vec![0.2]);
        assert_eq!(after, vec![0.9]);
    }
}
