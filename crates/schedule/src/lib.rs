//! # Fee Schedule
//!
//! Reference data store for Medicare repricing.
//!
//! This crate owns the read-only tables the pricing engine consults: RVU and
//! GPCI rows for the Physician Fee Schedule, MS-DRG weights, wage indexes and
//! hospital attributes for IPPS, and the ICD-10/MDC/rule tables that drive
//! the MS-DRG grouper.
//!
//! Responsibilities:
//! - Strict wire models for the nine normalized JSON data files and a
//!   directory loader with load-time invariant validation ([`load`] module).
//! - O(1) keyed lookups returning `Option<&T>`; a missing key is a data-driven
//!   condition, never an error.
//! - Year-specific scalar parameters (conversion factor, IPPS rates).
//!
//! **No pricing logic**: payment formulas, modifier semantics and grouping
//! decisions live in `repricer-core`. This crate only answers "what does the
//! published schedule say about this key".
//!
//! Tables are populated once, either from a data directory or through the
//! `add_*` builder methods, and are never mutated afterwards; one
//! `FeeSchedule` instance may be shared across threads.

pub mod error;
pub mod load;
pub mod records;
pub mod sample;

pub use error::{ScheduleError, ScheduleResult};
pub use records::{
    DiagnosisEntry, GpciRecord, GroupingRule, HospitalRecord, IppsRates, MdcDefinition,
    MdcRuleSet, MpprIndicator, MsDrgRecord, ProcedureEntry, RvuRecord, RvuTriple, SeverityDrgs,
    WageIndexRecord,
};

use std::collections::HashMap;

/// Physician Fee Schedule conversion factor for plan year 2025, in dollars
/// per relative value unit.
pub const DEFAULT_CONVERSION_FACTOR: f64 = 32.35;

/// MS-DRG grouper version implemented by the rule tables (FY 2026).
pub const GROUPING_VERSION: &str = "43.0";

/// National average locality code, the documented GPCI fallback.
pub const NATIONAL_LOCALITY: &str = "00";

/// Normalize an ICD-10 or procedure code for table lookup: trim, strip the
/// decimal point, upper-case.
pub fn normalize_code(code: &str) -> String {
    code.trim().replace('.', "").to_ascii_uppercase()
}

/// In-memory Medicare fee schedule.
///
/// Holds every reference table the repricing engine needs, keyed for O(1)
/// lookup. Construct with [`FeeSchedule::load_from_directory`] for the
/// normalized JSON data files, or build programmatically with the `add_*`
/// methods (builder callers are responsible for the record invariants the
/// loader enforces).
#[derive(Clone, Debug)]
pub struct FeeSchedule {
    conversion_factor: f64,
    ipps_rates: IppsRates,
    rvu: HashMap<(String, Option<String>), RvuRecord>,
    gpci: HashMap<String, GpciRecord>,
    ms_drg: HashMap<String, MsDrgRecord>,
    wage_index: HashMap<String, WageIndexRecord>,
    hospitals: HashMap<String, HospitalRecord>,
    diagnoses: HashMap<String, DiagnosisEntry>,
    procedures: HashMap<String, ProcedureEntry>,
    mdcs: HashMap<String, MdcDefinition>,
    rules: HashMap<String, MdcRuleSet>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl FeeSchedule {
    /// Create an empty schedule with the plan-year 2025 conversion factor.
    pub fn new() -> Self {
        Self {
            conversion_factor: DEFAULT_CONVERSION_FACTOR,
            ipps_rates: IppsRates::default(),
            rvu: HashMap::new(),
            gpci: HashMap::new(),
            ms_drg: HashMap::new(),
            wage_index: HashMap::new(),
            hospitals: HashMap::new(),
            diagnoses: HashMap::new(),
            procedures: HashMap::new(),
            mdcs: HashMap::new(),
            rules: HashMap::new(),
        }
    }

    /// Create an empty schedule with an overridden conversion factor.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConversionFactor`] unless the factor
    /// is positive and finite.
    pub fn with_conversion_factor(conversion_factor: f64) -> ScheduleResult<Self> {
        if !conversion_factor.is_finite() || conversion_factor <= 0.0 {
            return Err(ScheduleError::InvalidConversionFactor(conversion_factor));
        }
        Ok(Self {
            conversion_factor,
            ..Self::new()
        })
    }

    /// Dollars per relative value unit for this plan year.
    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    /// Year-specific IPPS payment parameters.
    pub fn ipps_rates(&self) -> &IppsRates {
        &self.ipps_rates
    }

    // ------------------------------------------------------------------
    // Builder methods
    // ------------------------------------------------------------------

    /// Add an RVU row, keyed by (procedure code, optional modifier).
    pub fn add_rvu(&mut self, record: RvuRecord) {
        let key = (
            record.procedure_code.to_ascii_uppercase(),
            record.modifier.as_deref().map(str::to_ascii_uppercase),
        );
        self.rvu.insert(key, record);
    }

    pub fn add_gpci(&mut self, record: GpciRecord) {
        self.gpci.insert(record.locality.clone(), record);
    }

    pub fn add_ms_drg(&mut self, record: MsDrgRecord) {
        self.ms_drg.insert(record.ms_drg.clone(), record);
    }

    pub fn add_wage_index(&mut self, record: WageIndexRecord) {
        self.wage_index.insert(record.cbsa_code.clone(), record);
    }

    pub fn add_hospital(&mut self, record: HospitalRecord) {
        self.hospitals.insert(record.provider_number.clone(), record);
    }

    /// Add a diagnosis entry, keyed by the dot-stripped upper-case code.
    pub fn add_diagnosis(&mut self, entry: DiagnosisEntry) {
        self.diagnoses.insert(normalize_code(&entry.code), entry);
    }

    pub fn add_procedure(&mut self, entry: ProcedureEntry) {
        self.procedures.insert(normalize_code(&entry.code), entry);
    }

    pub fn add_mdc(&mut self, definition: MdcDefinition) {
        self.mdcs.insert(definition.code.clone(), definition);
    }

    /// Replace the ordered rule families for one MDC.
    pub fn add_mdc_rules(&mut self, mdc: impl Into<String>, rules: MdcRuleSet) {
        self.rules.insert(mdc.into(), rules);
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Get the RVU row for a procedure code.
    ///
    /// Tries the (code, modifier) key first, then falls back to
    /// (code, none) — modifier-specific rows are stored only when payment
    /// differs.
    pub fn get_rvu(&self, procedure_code: &str, modifier: Option<&str>) -> Option<&RvuRecord> {
        let code = procedure_code.to_ascii_uppercase();
        if let Some(modifier) = modifier {
            let key = (code.clone(), Some(modifier.to_ascii_uppercase()));
            if let Some(record) = self.rvu.get(&key) {
                return Some(record);
            }
        }
        self.rvu.get(&(code, None))
    }

    /// Get the GPCI row for a locality code.
    pub fn get_gpci(&self, locality: &str) -> Option<&GpciRecord> {
        self.gpci.get(locality)
    }

    /// Get one MS-DRG row by its 3-digit code.
    pub fn get_ms_drg(&self, ms_drg: &str) -> Option<&MsDrgRecord> {
        self.ms_drg.get(ms_drg)
    }

    /// Get the wage index row for a CBSA code.
    pub fn get_wage_index(&self, cbsa_code: &str) -> Option<&WageIndexRecord> {
        self.wage_index.get(cbsa_code)
    }

    /// Get a hospital by its 6-character provider number.
    pub fn get_hospital(&self, provider_number: &str) -> Option<&HospitalRecord> {
        self.hospitals.get(provider_number)
    }

    /// Look up an ICD-10-CM diagnosis; the code is normalized first.
    pub fn lookup_diagnosis(&self, code: &str) -> Option<&DiagnosisEntry> {
        self.diagnoses.get(&normalize_code(code))
    }

    /// Look up an ICD-10-PCS procedure; the code is normalized first.
    pub fn lookup_procedure(&self, code: &str) -> Option<&ProcedureEntry> {
        self.procedures.get(&normalize_code(code))
    }

    /// Get the definition of a Major Diagnostic Category.
    pub fn mdc_definition(&self, mdc: &str) -> Option<&MdcDefinition> {
        self.mdcs.get(mdc)
    }

    /// Get the ordered grouping rule families for an MDC.
    pub fn rules_for_mdc(&self, mdc: &str) -> Option<&MdcRuleSet> {
        self.rules.get(mdc)
    }

    // ------------------------------------------------------------------
    // Table sizes, used for load-time reporting
    // ------------------------------------------------------------------

    pub fn rvu_count(&self) -> usize {
        self.rvu.len()
    }

    pub fn gpci_count(&self) -> usize {
        self.gpci.len()
    }

    pub fn ms_drg_count(&self) -> usize {
        self.ms_drg.len()
    }

    pub fn diagnosis_count(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn procedure_count(&self) -> usize {
        self.procedures.len()
    }
}
