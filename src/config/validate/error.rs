//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid PSI threshold: {0} (must be finite and > 0.0)")]
    InvalidPsiThreshold(f64),

    #[error("Invalid bin count: {0} (must be between 1 and 1000)")]
    InvalidBins(usize),

    #[error("Invalid minimum live samples: {0} (must be > 0)")]
    InvalidMinLiveSamples(usize),

    #[error("Invalid feature count: {0} (must be > 0)")]
    InvalidFeatureCount(usize),

    #[error("Critical feature list cannot be empty")]
    EmptyCriticalFeatures,

    #[error("Invalid drift percentage: {0} (must be > 0.0 and <= 100.0)")]
    InvalidDriftPercentage(f64),

    #[error("Selection metric cannot be empty")]
    EmptyMetric,

    #[error("Invalid prediction shift threshold: {0} (must be finite and > 0.0)")]
    InvalidShiftThreshold(f64),

    #[error("Invalid prediction shift minimum samples: {0} (must be > 0)")]
    InvalidShiftMinSamples(usize),

    #[error("Invalid scheduler interval: {0} (must be > 0 seconds)")]
    InvalidInterval(u64),

    #[error("File name for {0} cannot be empty or contain a path separator")]
    InvalidFileName(&'static str),

    #[error("File names for {first} and {second} must differ")]
    DuplicateFileName { first: &'static str, second: &'static str },

    #[error("Retrain command has an empty program name")]
    EmptyRetrainProgram,

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),
}
