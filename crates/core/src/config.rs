//! Engine runtime configuration.
//!
//! Configuration is resolved once at construction and then passed into the
//! engine; nothing re-reads the environment or the data directory during
//! claim pricing. This keeps behaviour consistent when one engine instance
//! is shared across worker threads.

use crate::error::{RepricerError, RepricerResult};
use std::path::{Path, PathBuf};

/// Configuration for constructing a [`crate::Repricer`].
///
/// Holds the reference data directory (the nine normalized JSON files) and
/// an optional conversion factor override for the Physician Fee Schedule.
#[derive(Clone, Debug)]
pub struct RepricerConfig {
    data_directory: PathBuf,
    conversion_factor: Option<f64>,
}

impl RepricerConfig {
    /// Create a configuration pointing at a reference data directory, using
    /// the default plan-year conversion factor.
    pub fn new(data_directory: impl Into<PathBuf>) -> Self {
        Self {
            data_directory: data_directory.into(),
            conversion_factor: None,
        }
    }

    /// Override the Physician Fee Schedule conversion factor.
    ///
    /// # Errors
    ///
    /// Returns `RepricerError::InvalidConfig` unless the factor is positive
    /// and finite.
    pub fn with_conversion_factor(mut self, conversion_factor: f64) -> RepricerResult<Self> {
        if !conversion_factor.is_finite() || conversion_factor <= 0.0 {
            return Err(RepricerError::InvalidConfig(format!(
                "conversion factor must be a positive finite amount, got {conversion_factor}"
            )));
        }
        self.conversion_factor = Some(conversion_factor);
        Ok(self)
    }

    /// Directory containing the reference data files.
    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    /// Conversion factor override, if one was set.
    pub fn conversion_factor(&self) -> Option<f64> {
        self.conversion_factor
    }
}
