//! Model health evaluation
//!
//! Turns per-feature PSI scores into a single verdict the scheduler acts on:
//! a [`HealthReport`] whose `retraining_recommended` flag follows the
//! configured [`RetrainPolicy`].

mod evaluator;
mod policy;
mod report;


pub use evaluator::HealthEvaluator;
pub use policy::RetrainPolicy;
pub use report::{DriftScore, HealthReport, SkipReason, SkippedFeature};
