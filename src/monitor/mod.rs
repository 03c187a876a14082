//! Production monitoring
//!
//! - [`psi`]: Population Stability Index for a single feature
//! - [`health`]: per-feature drift aggregated into a [`HealthReport`]
//! - [`predictions`]: summary statistics over the serving log

pub mod health;
pub mod predictions;
pub mod psi;

pub use health::{DriftScore, HealthEvaluator, HealthReport, RetrainPolicy, SkipReason, SkippedFeature};
pub use predictions::{PredictionMonitor, PredictionReport};
pub use psi::calculate_psi;
