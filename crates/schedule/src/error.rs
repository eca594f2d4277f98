//! Error types for the fee schedule crate.
//!
//! All failure modes of loading and validating reference data are represented
//! here. Lookups themselves never fail: a missing key is an `Option::None`,
//! not an error, because absent reference rows are an expected data-driven
//! condition that callers turn into per-line diagnostics.

use std::path::PathBuf;

/// Errors produced while constructing or loading a [`crate::FeeSchedule`].
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("reference data directory not found: {0}")]
    DataDirNotFound(PathBuf),
    #[error("required data file missing: {0}")]
    MissingDataFile(PathBuf),
    #[error("failed to read data file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid record in {file} (key {key}): {reason}")]
    InvalidRecord {
        file: &'static str,
        key: String,
        reason: String,
    },
    #[error("conversion factor must be a positive finite amount, got {0}")]
    InvalidConversionFactor(f64),
    #[error("gpci_data.json must contain the national average locality \"00\"")]
    MissingNationalGpci,
}

/// Type alias for Results that can fail with [`ScheduleError`].
pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
