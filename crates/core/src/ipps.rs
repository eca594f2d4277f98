//! Inpatient Prospective Payment System (IPPS) calculator.
//!
//! Prices an inpatient stay from its MS-DRG and billing hospital:
//!
//! 1. operating payment — wage-adjusted standardized amount × DRG weight,
//! 2. capital payment — capital standardized amount × capital GAF × weight,
//! 3. IME adjustment for teaching hospitals,
//! 4. DSH adjustment for disproportionate-share hospitals,
//! 5. outlier payment when the estimated case cost exceeds the adjusted base
//!    by more than the fixed-loss threshold.
//!
//! Covered days are carried through for reporting only; transfer-case
//! proration is not part of this engine.

use crate::error::{LineError, LineErrorKind};
use crate::round_cents;
use fee_schedule::FeeSchedule;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Full derivation record for one IPPS-priced line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IppsDerivation {
    pub ms_drg: String,
    pub drg_description: String,
    pub relative_weight: f64,
    pub wage_index: f64,
    pub capital_gaf: f64,
    pub operating_payment: f64,
    pub capital_payment: f64,
    /// operating + capital, before adjustments.
    pub base_payment: f64,
    pub ime_adjustment: f64,
    pub dsh_adjustment: f64,
    pub outlier_payment: f64,
    pub provider_number: String,
    pub hospital_name: String,
    pub is_teaching_hospital: bool,
    pub is_dsh_hospital: bool,
    pub is_rural: bool,
    #[serde(default)]
    pub total_charges: Option<f64>,
    #[serde(default)]
    pub covered_days: Option<u32>,
    pub geometric_mean_los: f64,
}

/// Successful IPPS pricing result.
#[derive(Clone, Debug, PartialEq)]
pub struct IppsOutcome {
    /// Allowed amount in dollars, rounded to cents.
    pub allowed: f64,
    pub derivation: IppsDerivation,
    pub notes: Vec<String>,
}

/// Per-stay IPPS pricing service holding a read-only fee schedule handle.
#[derive(Clone, Debug)]
pub struct IppsCalculator {
    schedule: Arc<FeeSchedule>,
}

impl IppsCalculator {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        Self { schedule }
    }

    /// Price one inpatient stay.
    ///
    /// # Arguments
    ///
    /// * `ms_drg` - MS-DRG code the stay grouped to.
    /// * `provider_number` - Billing hospital's provider number.
    /// * `total_charges` - Billed charges, used only for outlier screening.
    /// * `covered_days` - Covered days, reported but not priced.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`LineError`] when the DRG or hospital is unknown, or
    /// when no wage index can be resolved for the hospital's CBSA.
    pub fn calculate(
        &self,
        ms_drg: &str,
        provider_number: &str,
        total_charges: Option<f64>,
        covered_days: Option<u32>,
    ) -> Result<IppsOutcome, LineError> {
        let drg = self.schedule.get_ms_drg(ms_drg.trim()).ok_or_else(|| {
            LineError::new(
                LineErrorKind::DrgNotFound,
                format!("MS-DRG {ms_drg} not found in fee schedule"),
            )
        })?;
        let hospital = self
            .schedule
            .get_hospital(provider_number.trim())
            .ok_or_else(|| {
                LineError::new(
                    LineErrorKind::HospitalNotFound,
                    format!("hospital {provider_number} not found"),
                )
            })?;

        let cbsa = self.schedule.get_wage_index(&hospital.cbsa_code);
        let wage_index = hospital
            .wage_index
            .or_else(|| cbsa.map(|record| record.wage_index))
            .ok_or_else(|| {
                LineError::new(
                    LineErrorKind::WageIndexNotFound,
                    format!(
                        "no wage index for provider {} (CBSA {})",
                        hospital.provider_number, hospital.cbsa_code
                    ),
                )
            })?;
        let capital_gaf = cbsa
            .and_then(|record| record.capital_wage_index)
            .unwrap_or(wage_index);

        let rates = self.schedule.ipps_rates();
        let mut notes = Vec::new();

        let operating_payment = (rates.operating_standard_amount * rates.labor_share * wage_index
            + rates.operating_standard_amount * (1.0 - rates.labor_share))
            * drg.relative_weight;
        let capital_payment =
            rates.capital_standard_amount * capital_gaf * drg.relative_weight;
        let base_payment = operating_payment + capital_payment;

        let ime_adjustment = match hospital.teaching_ratio() {
            Some(irb) => {
                let multiplier =
                    rates.ime_factor * ((irb + rates.irb_shift).powf(rates.ime_exponent) - 1.0);
                notes.push(format!(
                    "IME adjustment applied ({:.2}% of base)",
                    multiplier * 100.0
                ));
                base_payment * multiplier
            }
            None => 0.0,
        };

        let dsh_adjustment = match hospital.dsh_percentage() {
            Some(percentage) => {
                let multiplier = (percentage / 100.0).sqrt() * rates.dsh_factor;
                notes.push(format!(
                    "DSH adjustment applied ({:.2}% of base)",
                    multiplier * 100.0
                ));
                base_payment * multiplier
            }
            None => 0.0,
        };

        let adjusted_base = base_payment + ime_adjustment + dsh_adjustment;

        let outlier_payment = match total_charges {
            Some(charges) => {
                let estimated_cost = charges * rates.cost_to_charge_ratio;
                let excess = estimated_cost - adjusted_base;
                if excess > rates.outlier_threshold {
                    let payment = (excess - rates.outlier_threshold) * rates.outlier_payment_rate;
                    notes.push(format!("Outlier payment applied (${payment:.2})"));
                    payment
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        if hospital.is_rural {
            notes.push("Rural hospital".to_string());
        }

        let allowed = round_cents(adjusted_base + outlier_payment);

        let derivation = IppsDerivation {
            ms_drg: drg.ms_drg.clone(),
            drg_description: drg.description.clone(),
            relative_weight: drg.relative_weight,
            wage_index,
            capital_gaf,
            operating_payment,
            capital_payment,
            base_payment,
            ime_adjustment,
            dsh_adjustment,
            outlier_payment,
            provider_number: hospital.provider_number.clone(),
            hospital_name: hospital.hospital_name.clone(),
            is_teaching_hospital: hospital.is_teaching_hospital,
            is_dsh_hospital: hospital.is_dsh_hospital,
            is_rural: hospital.is_rural,
            total_charges,
            covered_days,
            geometric_mean_los: drg.geometric_mean_los,
        };

        Ok(IppsOutcome {
            allowed,
            derivation,
            notes,
        })
    }
}
