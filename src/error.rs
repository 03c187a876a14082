//! Error types for Relevo

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient samples for '{feature}': {count} < {required}")]
    InsufficientSamples {
        feature: String,
        count: usize,
        required: usize,
    },

    #[error("Empty {0} sample")]
    EmptySample(&'static str),

    #[error("Invalid bin count: {0} (must be > 0)")]
    InvalidBins(usize),

    #[error("Degenerate reference distribution: all values equal {0}")]
    DegenerateReference(f64),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Version {0} is already in production")]
    AlreadyInProduction(String),

    #[error("Metadata missing for version {version}: {}", path.display())]
    MetadataMissing { version: String, path: PathBuf },

    #[error("Metadata corrupt at {}: {reason}", path.display())]
    MetadataCorrupt { path: PathBuf, reason: String },

    #[error("Artifact missing for version {version}: {}", path.display())]
    ArtifactMissing { version: String, path: PathBuf },

    #[error("No rollback target: {0} promotion(s) in active history, need at least 2")]
    NoRollbackTarget(usize),

    #[error("Comparison failed: {0}")]
    ComparisonError(String),

    #[error("Retraining failed: {0}")]
    RetrainFailed(String),

    #[error("Integrity mismatch for {}: expected {expected}, got {actual}", path.display())]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Lineage ledger error: {0}")]
    Ledger(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<arrow::error::ArrowError> for Error {
    fn from(e: arrow::error::ArrowError) -> Self {
        Error::Data(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
