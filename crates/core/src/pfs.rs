//! Physician Fee Schedule (PFS) calculator.
//!
//! Implements the RBRVS payment formula:
//!
//! ```text
//! payment = [(work RVU × work GPCI) + (PE RVU × PE GPCI) + (MP RVU × MP GPCI)] × CF
//! ```
//!
//! with facility/non-facility RVU selection by place of service, modifier
//! effects, Multiple Procedure Payment Reduction, and units. Component
//! modifiers 26/TC zero parts of the RVU triple *before* the base is formed;
//! the remaining payment modifiers (50, 52, 53) multiply the formed base in
//! the order given.
//!
//! MPPR ranking is cross-line state and is assigned by the orchestrator; the
//! calculator only honours the rank it is handed (rank 1 = primary, never
//! reduced).

use crate::error::{LineError, LineErrorKind, LineWarning, LineWarningKind};
use crate::round_cents;
use fee_schedule::{FeeSchedule, NATIONAL_LOCALITY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Place-of-service codes priced at facility RVU rates.
pub const FACILITY_POS: &[&str] = &[
    "21", "22", "23", "24", "26", "31", "34", "51", "52", "53", "56", "61",
];

/// Whether a two-digit place-of-service code is a facility setting.
pub fn is_facility_pos(place_of_service: &str) -> bool {
    FACILITY_POS.contains(&place_of_service.trim())
}

/// Full derivation record for one PFS-priced line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PfsDerivation {
    pub procedure_code: String,
    /// Work RVU after any component-modifier zeroing.
    pub work_rvu: f64,
    pub pe_rvu: f64,
    pub mp_rvu: f64,
    pub work_gpci: f64,
    pub pe_gpci: f64,
    pub mp_gpci: f64,
    pub conversion_factor: f64,
    pub is_facility: bool,
    pub locality: String,
    pub locality_name: String,
    /// Geographically adjusted payment before payment modifiers, MPPR and
    /// units.
    pub base_payment: f64,
    /// MPPR rank this line was priced at (1 = primary).
    pub mppr_rank: u32,
    pub mppr_applied: bool,
    pub units: u32,
}

/// Successful PFS pricing result.
#[derive(Clone, Debug, PartialEq)]
pub struct PfsOutcome {
    /// Allowed amount in dollars, rounded to cents.
    pub allowed: f64,
    pub derivation: PfsDerivation,
    pub notes: Vec<String>,
    pub warnings: Vec<LineWarning>,
}

/// Per-line PFS pricing service holding a read-only fee schedule handle.
#[derive(Clone, Debug)]
pub struct PfsCalculator {
    schedule: Arc<FeeSchedule>,
}

impl PfsCalculator {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        Self { schedule }
    }

    /// Price one professional service line.
    ///
    /// # Arguments
    ///
    /// * `procedure_code` - CPT/HCPCS code.
    /// * `modifiers` - Up to two modifiers, applied in the order given.
    /// * `place_of_service` - Two-digit POS code selecting the RVU setting.
    /// * `locality` - Medicare locality for GPCI; unknown localities fall
    ///   back to the national average with a warning.
    /// * `units` - Units billed (≥ 1).
    /// * `rank` - MPPR rank assigned by the orchestrator (1 = primary).
    ///
    /// # Errors
    ///
    /// Returns a fatal [`LineError`] when the procedure code has no RVU row,
    /// or when neither the requested locality nor the national average GPCI
    /// row exists.
    pub fn calculate(
        &self,
        procedure_code: &str,
        modifiers: &[String],
        place_of_service: &str,
        locality: &str,
        units: u32,
        rank: u32,
    ) -> Result<PfsOutcome, LineError> {
        let code = procedure_code.trim().to_ascii_uppercase();
        let is_facility = is_facility_pos(place_of_service);
        let mut notes = Vec::new();
        let mut warnings = Vec::new();

        let first_modifier = modifiers.first().map(|m| m.trim().to_ascii_uppercase());
        let rvu = self
            .schedule
            .get_rvu(&code, first_modifier.as_deref())
            .ok_or_else(|| {
                LineError::new(
                    LineErrorKind::ProcedureCodeNotFound,
                    format!("procedure code {code} not found in fee schedule"),
                )
            })?;

        let gpci = match self.schedule.get_gpci(locality) {
            Some(gpci) => gpci,
            None => {
                let national = self.schedule.get_gpci(NATIONAL_LOCALITY).ok_or_else(|| {
                    LineError::new(
                        LineErrorKind::GpciNotFound,
                        format!("locality {locality} not found and no national average loaded"),
                    )
                })?;
                warnings.push(LineWarning::new(
                    LineWarningKind::LocalityDefaulted,
                    "locality defaulted to national average",
                ));
                national
            }
        };

        let mut triple = rvu.triple(is_facility);
        let mut payment_factor = 1.0;
        for modifier in modifiers {
            let modifier = modifier.trim().to_ascii_uppercase();
            match modifier.as_str() {
                "26" => {
                    triple.practice_expense = 0.0;
                    notes.push("professional component only (modifier 26)".to_string());
                }
                "TC" => {
                    triple.work = 0.0;
                    triple.malpractice = 0.0;
                    notes.push("technical component only (modifier TC)".to_string());
                }
                "50" => {
                    payment_factor *= 1.5;
                    notes.push("bilateral procedure (modifier 50), 150% payment".to_string());
                }
                "52" => {
                    payment_factor *= 0.5;
                    notes.push("reduced services (modifier 52), 50% payment".to_string());
                }
                "53" => {
                    payment_factor *= 0.5;
                    notes.push("discontinued procedure (modifier 53), 50% payment".to_string());
                }
                "76" | "77" => {
                    notes.push(format!("repeat procedure (modifier {modifier}), full payment"));
                }
                "59" | "XE" | "XS" | "XU" | "XP" => {
                    notes.push(format!("distinct procedural service (modifier {modifier})"));
                }
                "" => {}
                other => {
                    warnings.push(LineWarning::new(
                        LineWarningKind::UnknownModifier,
                        format!("unknown modifier {other} ignored"),
                    ));
                }
            }
        }

        let conversion_factor = self.schedule.conversion_factor();
        let base_payment = (triple.work * gpci.work
            + triple.practice_expense * gpci.practice_expense
            + triple.malpractice * gpci.malpractice)
            * conversion_factor;

        let mut amount = base_payment * payment_factor;

        let mppr_applied = rvu.mppr_indicator.is_subject() && rank >= 2;
        if mppr_applied {
            amount *= 0.5;
            notes.push("MPPR applied (50%)".to_string());
        }

        amount *= f64::from(units.max(1));
        let allowed = round_cents(amount);

        let derivation = PfsDerivation {
            procedure_code: code,
            work_rvu: triple.work,
            pe_rvu: triple.practice_expense,
            mp_rvu: triple.malpractice,
            work_gpci: gpci.work,
            pe_gpci: gpci.practice_expense,
            mp_gpci: gpci.malpractice,
            conversion_factor,
            is_facility,
            locality: gpci.locality.clone(),
            locality_name: gpci.locality_name.clone(),
            base_payment,
            mppr_rank: rank.max(1),
            mppr_applied,
            units: units.max(1),
        };

        Ok(PfsOutcome {
            allowed,
            derivation,
            notes,
            warnings,
        })
    }
}
