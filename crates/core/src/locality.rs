//! ZIP code to Medicare locality resolution.
//!
//! GPCI factors are keyed by Medicare locality, but claims usually carry a
//! service-location ZIP instead. This module maps ZIP prefixes to locality
//! codes: the 3-digit prefix is tried first, then the 2-digit prefix for
//! broader regions, and unmapped ZIPs fall back to the national average
//! locality `"00"` with a warning.

use crate::error::{LineWarning, LineWarningKind};
use fee_schedule::NATIONAL_LOCALITY;
use std::collections::HashMap;

/// Sample prefix table covering the demonstration localities. Production
/// deployments supply the full CMS mapping via [`LocalityResolver::with_mappings`].
#[rustfmt::skip]
const SAMPLE_ZIP_PREFIXES: &[(&str, &str)] = &[
    // New York: Manhattan, then NYC suburbs
    ("100", "01"), ("101", "01"), ("102", "01"),
    ("103", "02"), ("104", "02"), ("105", "02"),
    ("110", "02"), ("111", "02"), ("112", "02"), ("113", "02"),
    ("114", "02"), ("115", "02"), ("116", "02"),
    // California: Los Angeles area, then rest of state
    ("900", "18"), ("901", "18"), ("902", "18"), ("903", "18"),
    ("904", "18"), ("905", "18"), ("906", "18"), ("907", "18"),
    ("910", "13"), ("911", "13"), ("912", "13"), ("913", "13"),
    ("914", "13"), ("915", "13"), ("916", "13"), ("917", "13"),
    ("918", "13"), ("919", "13"), ("920", "13"), ("921", "13"),
    // Texas: Dallas area
    ("750", "23"), ("751", "23"), ("752", "23"),
    ("753", "23"), ("754", "23"), ("755", "23"),
    // Florida
    ("320", "03"), ("321", "03"), ("322", "03"), ("323", "03"),
    ("324", "03"), ("325", "03"), ("326", "03"), ("327", "03"),
    ("328", "03"), ("329", "03"), ("330", "03"), ("331", "03"),
    ("332", "03"), ("333", "03"), ("334", "03"),
    // Illinois: Chicago area
    ("600", "16"), ("601", "16"), ("602", "16"), ("603", "16"),
    ("604", "16"), ("605", "16"), ("606", "16"), ("607", "16"),
    ("608", "16"),
    // Pennsylvania
    ("150", "42"), ("151", "42"), ("152", "42"), ("153", "42"),
    ("154", "42"), ("155", "42"), ("156", "42"),
    // Massachusetts
    ("010", "24"), ("011", "24"), ("012", "24"), ("013", "24"),
    ("014", "24"), ("015", "24"), ("016", "24"), ("017", "24"),
    ("018", "24"), ("019", "24"), ("020", "24"), ("021", "24"),
    ("022", "24"), ("023", "24"), ("024", "24"), ("025", "24"),
    ("026", "24"), ("027", "24"),
];

/// Result of resolving a ZIP code to a locality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZipResolution {
    pub locality: String,
    /// Warning emitted when the ZIP was unmapped and the national average
    /// locality was substituted.
    pub warning: Option<LineWarning>,
}

/// ZIP-prefix to Medicare locality map.
#[derive(Clone, Debug)]
pub struct LocalityResolver {
    zip_to_locality: HashMap<String, String>,
}

impl Default for LocalityResolver {
    fn default() -> Self {
        let zip_to_locality = SAMPLE_ZIP_PREFIXES
            .iter()
            .map(|(prefix, locality)| ((*prefix).to_string(), (*locality).to_string()))
            .collect();
        Self { zip_to_locality }
    }
}

impl LocalityResolver {
    /// Build a resolver from a complete prefix table (2- or 3-digit prefixes).
    pub fn with_mappings(zip_to_locality: HashMap<String, String>) -> Self {
        Self { zip_to_locality }
    }

    /// Add or replace one prefix mapping.
    pub fn add_mapping(&mut self, zip_prefix: impl Into<String>, locality: impl Into<String>) {
        self.zip_to_locality.insert(zip_prefix.into(), locality.into());
    }

    /// Map a ZIP code to a locality, if a prefix mapping exists.
    ///
    /// Accepts ZIP+4 (`"10001-1234"`); the extension is ignored. Returns
    /// `None` for malformed ZIPs and unmapped prefixes.
    pub fn locality_for_zip(&self, zip: &str) -> Option<&str> {
        let zip = zip.trim().split('-').next().unwrap_or_default();
        if zip.len() != 5 || !zip.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.zip_to_locality
            .get(&zip[..3])
            .or_else(|| self.zip_to_locality.get(&zip[..2]))
            .map(String::as_str)
    }

    /// Resolve a ZIP code, substituting the national average locality with a
    /// warning when no mapping exists.
    pub fn resolve_zip(&self, zip: &str) -> ZipResolution {
        match self.locality_for_zip(zip) {
            Some(locality) => ZipResolution {
                locality: locality.to_string(),
                warning: None,
            },
            None => ZipResolution {
                locality: NATIONAL_LOCALITY.to_string(),
                warning: Some(LineWarning::new(
                    LineWarningKind::LocalityDefaulted,
                    "locality defaulted to national average",
                )),
            },
        }
    }
}
