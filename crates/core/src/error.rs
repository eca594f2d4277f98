//! Error types and per-line diagnostics for the repricing engine.
//!
//! Two layers of failure exist and they are deliberately different types:
//!
//! - [`RepricerError`] — claim-level failures (malformed claim shape,
//!   reference data that could not be loaded). These fail the whole call and
//!   no partial output is returned.
//! - [`LineError`] / [`LineWarning`] — structured per-line diagnostics.
//!   These are *values* carried on output lines, never propagated as `Err`:
//!   a fatal line error zeroes that line's allowed amount and the claim keeps
//!   going.

use serde::{Deserialize, Serialize};

/// Claim-level errors. A claim that fails validation produces one of these
/// and no repriced output at all.
#[derive(Debug, thiserror::Error)]
pub enum RepricerError {
    #[error("invalid claim: {0}")]
    InvalidClaim(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Schedule(#[from] fee_schedule::ScheduleError),
}

/// Type alias for Results that can fail with [`RepricerError`].
pub type RepricerResult<T> = std::result::Result<T, RepricerError>;

/// Fatal per-line error kinds. A line carrying one of these reports a $0
/// allowed amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineErrorKind {
    ProcedureCodeNotFound,
    LocalityOrZipRequired,
    UnsupportedServiceType,
    DrgNotFound,
    HospitalNotFound,
    WageIndexNotFound,
    GpciNotFound,
    GrouperUngroupable,
}

impl LineErrorKind {
    /// Stable snake_case tag, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            LineErrorKind::ProcedureCodeNotFound => "procedure_code_not_found",
            LineErrorKind::LocalityOrZipRequired => "locality_or_zip_required",
            LineErrorKind::UnsupportedServiceType => "unsupported_service_type",
            LineErrorKind::DrgNotFound => "drg_not_found",
            LineErrorKind::HospitalNotFound => "hospital_not_found",
            LineErrorKind::WageIndexNotFound => "wage_index_not_found",
            LineErrorKind::GpciNotFound => "gpci_not_found",
            LineErrorKind::GrouperUngroupable => "grouper_ungroupable",
        }
    }
}

/// Non-fatal per-line warning kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineWarningKind {
    LocalityDefaulted,
    UnknownModifier,
    SeveritySlotFallback,
}

impl LineWarningKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            LineWarningKind::LocalityDefaulted => "locality_defaulted",
            LineWarningKind::UnknownModifier => "unknown_modifier",
            LineWarningKind::SeveritySlotFallback => "severity_slot_fallback",
        }
    }
}

/// A fatal, structured per-line error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    pub kind: LineErrorKind,
    pub message: String,
}

impl LineError {
    pub fn new(kind: LineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// A non-fatal, structured per-line warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWarning {
    pub kind: LineWarningKind,
    pub message: String,
}

impl LineWarning {
    pub fn new(kind: LineWarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_serialize_as_snake_case_tags() {
        let json = serde_json::to_string(&LineErrorKind::ProcedureCodeNotFound)
            .expect("serialize kind");
        assert_eq!(json, "\"procedure_code_not_found\"");
        assert_eq!(
            LineErrorKind::UnsupportedServiceType.as_str(),
            "unsupported_service_type"
        );
    }

    #[test]
    fn warning_display_includes_kind_tag() {
        let warning = LineWarning::new(
            LineWarningKind::LocalityDefaulted,
            "locality defaulted to national average",
        );
        assert_eq!(
            warning.to_string(),
            "locality_defaulted: locality defaulted to national average"
        );
    }
}
