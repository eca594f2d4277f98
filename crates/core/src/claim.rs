//! Claim data model.
//!
//! Input claims and repriced output claims. Input values are immutable once
//! constructed and are never mutated by the engine; the repriced claim is a
//! new value carrying the full derivation trail per line.
//!
//! Claim-level shape rules live in [`Claim::validate`]; everything data-driven
//! (unknown codes, missing reference rows) is a per-line diagnostic instead.

use crate::error::{LineError, LineWarning, RepricerError, RepricerResult};
use crate::ipps::IppsDerivation;
use crate::pfs::PfsDerivation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sentinel procedure code accepted on inpatient lines, which are priced by
/// MS-DRG rather than by CPT/HCPCS code.
pub const INPATIENT_CODE: &str = "INPATIENT";

fn default_units() -> u32 {
    1
}

/// One line item on an input claim.
///
/// PFS lines carry a procedure code plus exactly one of {locality, ZIP}.
/// IPPS lines carry `ms_drg_code` and `provider_number` (the procedure code
/// may be the `"INPATIENT"` sentinel) plus optional charge and stay data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimLine {
    pub line_number: u32,
    pub procedure_code: String,
    /// Two-digit place of service code (11 = office, 22 = outpatient, ...).
    pub place_of_service: String,
    /// Up to two procedure modifiers (e.g. 26, TC, 50).
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default = "default_units")]
    pub units: u32,
    // Inpatient (IPPS) fields
    #[serde(default)]
    pub ms_drg_code: Option<String>,
    #[serde(default)]
    pub provider_number: Option<String>,
    #[serde(default)]
    pub total_charges: Option<f64>,
    #[serde(default)]
    pub covered_days: Option<u32>,
}

impl ClaimLine {
    /// Minimal constructor for a professional (PFS) line with an explicit
    /// locality; remaining fields take their defaults.
    pub fn pfs(
        line_number: u32,
        procedure_code: impl Into<String>,
        place_of_service: impl Into<String>,
        locality: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            procedure_code: procedure_code.into(),
            place_of_service: place_of_service.into(),
            modifiers: Vec::new(),
            locality: Some(locality.into()),
            zip_code: None,
            units: 1,
            ms_drg_code: None,
            provider_number: None,
            total_charges: None,
            covered_days: None,
        }
    }

    /// Minimal constructor for an inpatient (IPPS) line.
    pub fn ipps(
        line_number: u32,
        ms_drg_code: impl Into<String>,
        provider_number: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            procedure_code: INPATIENT_CODE.to_string(),
            place_of_service: "21".to_string(),
            modifiers: Vec::new(),
            locality: None,
            zip_code: None,
            units: 1,
            ms_drg_code: Some(ms_drg_code.into()),
            provider_number: Some(provider_number.into()),
            total_charges: None,
            covered_days: None,
        }
    }
}

/// A complete input claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    /// ICD-10-CM diagnosis codes, informational for professional claims.
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
    pub lines: Vec<ClaimLine>,
}

impl Claim {
    /// Validate the claim shape.
    ///
    /// Checks the invariants that make a claim processable at all: a
    /// non-empty claim id, at least one line, unique line numbers ≥ 1,
    /// units ≥ 1, 2-digit numeric place of service, at most two modifiers,
    /// and at most one of {locality, zip} per line.
    ///
    /// # Errors
    ///
    /// Returns `RepricerError::InvalidClaim` naming the first violation.
    pub fn validate(&self) -> RepricerResult<()> {
        if self.claim_id.trim().is_empty() {
            return Err(RepricerError::InvalidClaim("claim_id is required".into()));
        }
        if self.lines.is_empty() {
            return Err(RepricerError::InvalidClaim(
                "at least one claim line is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for line in &self.lines {
            if line.line_number == 0 {
                return Err(RepricerError::InvalidClaim(
                    "line numbers start at 1".into(),
                ));
            }
            if !seen.insert(line.line_number) {
                return Err(RepricerError::InvalidClaim(format!(
                    "duplicate line number {}",
                    line.line_number
                )));
            }
            if line.units == 0 {
                return Err(RepricerError::InvalidClaim(format!(
                    "line {}: units must be at least 1",
                    line.line_number
                )));
            }
            let pos = line.place_of_service.trim();
            if pos.len() != 2 || !pos.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RepricerError::InvalidClaim(format!(
                    "line {}: place of service must be a 2-digit code",
                    line.line_number
                )));
            }
            if line.modifiers.len() > 2 {
                return Err(RepricerError::InvalidClaim(format!(
                    "line {}: at most two modifiers are allowed",
                    line.line_number
                )));
            }
            if line.locality.is_some() && line.zip_code.is_some() {
                return Err(RepricerError::InvalidClaim(format!(
                    "line {}: provide locality or zip_code, not both",
                    line.line_number
                )));
            }
        }
        Ok(())
    }
}

/// Payment system a line was priced under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "PFS")]
    Pfs,
    #[serde(rename = "IPPS")]
    Ipps,
}

impl ServiceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ServiceType::Pfs => "PFS",
            ServiceType::Ipps => "IPPS",
        }
    }
}

/// One repriced output line: echoed identifiers, the Medicare allowed
/// amount, the derivation for whichever payment system priced the line, and
/// structured diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepricedLine {
    pub line_number: u32,
    pub procedure_code: String,
    pub place_of_service: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Resolved locality (PFS lines only).
    #[serde(default)]
    pub locality: Option<String>,
    pub units: u32,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    /// Final allowed amount in dollars, rounded to cents. Zero when the line
    /// carries a fatal error.
    pub medicare_allowed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfs: Option<PfsDerivation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipps: Option<IppsDerivation>,
    /// Human-readable derivation trail (modifier effects, adjustments).
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<LineWarning>,
    #[serde(default)]
    pub errors: Vec<LineError>,
}

impl RepricedLine {
    /// True when the line priced successfully and counts toward the claim
    /// total.
    pub fn is_payable(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A fully repriced claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepricedClaim {
    pub claim_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
    /// Repriced lines, in input order.
    pub lines: Vec<RepricedLine>,
    /// Sum of allowed amounts over lines without a fatal error.
    pub total_allowed: f64,
    #[serde(default)]
    pub notes: Vec<String>,
    pub repriced_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_claim() -> Claim {
        Claim {
            claim_id: "CLM-001".to_string(),
            patient_id: Some("PAT-1".to_string()),
            diagnosis_codes: vec!["M54.50".to_string()],
            lines: vec![ClaimLine::pfs(1, "99213", "11", "01")],
        }
    }

    #[test]
    fn accepts_a_well_formed_claim() {
        valid_claim().validate().expect("claim should validate");
    }

    #[test]
    fn rejects_blank_claim_id() {
        let mut claim = valid_claim();
        claim.claim_id = "   ".to_string();
        let err = claim.validate().expect_err("blank claim id");
        assert!(matches!(err, RepricerError::InvalidClaim(msg) if msg.contains("claim_id")));
    }

    #[test]
    fn rejects_empty_line_list() {
        let mut claim = valid_claim();
        claim.lines.clear();
        let err = claim.validate().expect_err("no lines");
        assert!(matches!(err, RepricerError::InvalidClaim(_)));
    }

    #[test]
    fn rejects_duplicate_line_numbers() {
        let mut claim = valid_claim();
        claim.lines.push(ClaimLine::pfs(1, "99214", "11", "01"));
        let err = claim.validate().expect_err("duplicate line numbers");
        assert!(matches!(err, RepricerError::InvalidClaim(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_zero_units() {
        let mut claim = valid_claim();
        claim.lines[0].units = 0;
        let err = claim.validate().expect_err("zero units");
        assert!(matches!(err, RepricerError::InvalidClaim(msg) if msg.contains("units")));
    }

    #[test]
    fn rejects_malformed_place_of_service() {
        let mut claim = valid_claim();
        claim.lines[0].place_of_service = "1".to_string();
        assert!(claim.validate().is_err());
        claim.lines[0].place_of_service = "1A".to_string();
        assert!(claim.validate().is_err());
    }

    #[test]
    fn rejects_locality_and_zip_together() {
        let mut claim = valid_claim();
        claim.lines[0].zip_code = Some("10001".to_string());
        let err = claim.validate().expect_err("both locality and zip");
        assert!(matches!(err, RepricerError::InvalidClaim(msg) if msg.contains("not both")));
    }

    #[test]
    fn rejects_more_than_two_modifiers() {
        let mut claim = valid_claim();
        claim.lines[0].modifiers = vec!["26".into(), "59".into(), "76".into()];
        assert!(claim.validate().is_err());
    }

    #[test]
    fn claim_line_deserializes_with_defaults() {
        let line: ClaimLine = serde_json::from_str(
            r#"{"line_number": 1, "procedure_code": "99213", "place_of_service": "11",
                "locality": "01"}"#,
        )
        .expect("deserialize line");
        assert_eq!(line.units, 1);
        assert!(line.modifiers.is_empty());
        assert!(line.ms_drg_code.is_none());
    }
}
