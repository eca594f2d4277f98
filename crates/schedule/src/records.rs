//! Reference data record types.
//!
//! These are the domain-level rows held by the [`crate::FeeSchedule`] store.
//! They are immutable after load; calculators and the grouper receive shared
//! read-only references and never mutate them.

use serde::{Deserialize, Serialize};

/// Work / practice-expense / malpractice relative value units for one
/// pricing setting (facility or non-facility).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RvuTriple {
    pub work: f64,
    pub practice_expense: f64,
    pub malpractice: f64,
}

impl RvuTriple {
    pub fn new(work: f64, practice_expense: f64, malpractice: f64) -> Self {
        Self {
            work,
            practice_expense,
            malpractice,
        }
    }

    /// Sum of the three components, used for MPPR candidacy ranking.
    pub fn total(&self) -> f64 {
        self.work + self.practice_expense + self.malpractice
    }
}

/// Multiple Procedure Payment Reduction indicator carried on an RVU row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MpprIndicator {
    /// Indicator 0: the procedure is never reduced.
    NotSubject,
    /// Indicator 2: standard MPPR, 50% reduction for second and subsequent
    /// ranked procedures.
    Standard,
}

impl MpprIndicator {
    /// Parse the numeric indicator used in `rvu_data.json`.
    pub fn from_wire(value: i64) -> Option<Self> {
        match value {
            0 => Some(MpprIndicator::NotSubject),
            2 => Some(MpprIndicator::Standard),
            _ => None,
        }
    }

    pub fn is_subject(self) -> bool {
        matches!(self, MpprIndicator::Standard)
    }
}

/// Relative value units for one procedure code (optionally one modifier row).
///
/// Modifier-specific rows exist only where payment differs (e.g. `26`/`TC`
/// component splits); lookups fall back to the unmodified row otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RvuRecord {
    pub procedure_code: String,
    pub modifier: Option<String>,
    pub description: String,
    pub non_facility: RvuTriple,
    pub facility: RvuTriple,
    pub mppr_indicator: MpprIndicator,
}

impl RvuRecord {
    /// Select the facility or non-facility triple.
    pub fn triple(&self, facility: bool) -> RvuTriple {
        if facility {
            self.facility
        } else {
            self.non_facility
        }
    }
}

/// Geographic Practice Cost Index factors for one Medicare locality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpciRecord {
    pub locality: String,
    pub locality_name: String,
    pub work: f64,
    pub practice_expense: f64,
    pub malpractice: f64,
}

/// One MS-DRG row: payment weight and expected lengths of stay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsDrgRecord {
    pub ms_drg: String,
    pub description: String,
    pub relative_weight: f64,
    pub geometric_mean_los: f64,
    pub arithmetic_mean_los: f64,
}

/// Wage index factors for one Core-Based Statistical Area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WageIndexRecord {
    pub cbsa_code: String,
    pub area_name: String,
    pub wage_index: f64,
    /// Capital geographic adjustment factor. Defaults to the operating wage
    /// index when absent.
    pub capital_wage_index: Option<f64>,
}

impl WageIndexRecord {
    /// The capital GAF, falling back to the operating wage index.
    pub fn capital_gaf(&self) -> f64 {
        self.capital_wage_index.unwrap_or(self.wage_index)
    }
}

/// Hospital-specific attributes used by the IPPS adjustments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub provider_number: String,
    pub hospital_name: String,
    pub cbsa_code: String,
    /// Resolved operating wage index. When absent the CBSA table is
    /// consulted instead.
    pub wage_index: Option<f64>,
    pub is_teaching_hospital: bool,
    pub intern_resident_to_bed_ratio: Option<f64>,
    pub is_dsh_hospital: bool,
    pub dsh_patient_percentage: Option<f64>,
    pub is_rural: bool,
    pub bed_count: Option<u32>,
}

impl HospitalRecord {
    /// Intern/resident-to-bed ratio, present only for teaching hospitals.
    pub fn teaching_ratio(&self) -> Option<f64> {
        if self.is_teaching_hospital {
            self.intern_resident_to_bed_ratio
        } else {
            None
        }
    }

    /// DSH patient percentage, present only for DSH hospitals.
    pub fn dsh_percentage(&self) -> Option<f64> {
        if self.is_dsh_hospital {
            self.dsh_patient_percentage
        } else {
            None
        }
    }
}

/// ICD-10-CM diagnosis entry, keyed in the store by the dot-stripped code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    pub code: String,
    pub description: String,
    /// Two-digit Major Diagnostic Category tag ("00"–"25").
    pub mdc: String,
    pub is_cc: bool,
    pub is_mcc: bool,
}

/// ICD-10-PCS procedure entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcedureEntry {
    pub code: String,
    pub description: String,
    pub is_or_procedure: bool,
    pub is_non_or_procedure: bool,
}

/// Major Diagnostic Category definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MdcDefinition {
    pub code: String,
    pub name: String,
    pub body_system: Option<String>,
}

/// Severity-to-DRG mapping inside one grouping rule family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityDrgs {
    pub with_mcc: Option<String>,
    pub with_cc: Option<String>,
    pub without_cc_mcc: Option<String>,
}

/// One DRG family rule: a code pattern plus the severity split.
///
/// The pattern is a procedure-code pattern for surgical families and a
/// diagnosis-code pattern for medical families. Patterns are prefix or
/// wildcard tokens (`"0SR9*"`, `"A41*"`, or an exact code).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupingRule {
    pub pattern: String,
    pub description: String,
    pub drgs: SeverityDrgs,
}

/// Ordered rule families for one MDC. Declared order is match order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MdcRuleSet {
    pub surgical: Vec<GroupingRule>,
    pub medical: Vec<GroupingRule>,
}

/// Year-specific IPPS payment parameters (FY 2026 values by default).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IppsRates {
    /// Operating standardized amount per discharge.
    pub operating_standard_amount: f64,
    /// Labor-related share of the operating amount.
    pub labor_share: f64,
    /// Capital standardized amount per discharge.
    pub capital_standard_amount: f64,
    /// IME multiplier coefficient `c` in `c × ((IRB + shift)^exp − 1)`.
    pub ime_factor: f64,
    pub ime_exponent: f64,
    pub irb_shift: f64,
    /// Simplified DSH factor applied to `√(DSH% / 100)`.
    pub dsh_factor: f64,
    /// Fixed-loss outlier threshold.
    pub outlier_threshold: f64,
    /// Assumed cost-to-charge ratio for estimating case cost.
    pub cost_to_charge_ratio: f64,
    /// Share of above-threshold cost paid out as an outlier payment.
    pub outlier_payment_rate: f64,
}

impl Default for IppsRates {
    fn default() -> Self {
        Self {
            operating_standard_amount: 6690.00,
            labor_share: 0.676,
            capital_standard_amount: 488.59,
            ime_factor: 1.34,
            ime_exponent: 0.405,
            irb_shift: 0.4,
            dsh_factor: 0.35,
            outlier_threshold: 46217.00,
            cost_to_charge_ratio: 0.25,
            outlier_payment_rate: 0.80,
        }
    }
}
