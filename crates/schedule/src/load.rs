//! Directory loader for the normalized JSON reference files.
//!
//! Responsibilities:
//! - Define strict wire models for each data file (`deny_unknown_fields` on
//!   the tabular rows, tolerant nested parsing for the generated ICD-10
//!   files, which may carry `_`-prefixed metadata entries).
//! - Translate wire rows into domain records with load-time validation of
//!   the record invariants (non-negative RVUs, positive GPCI factors and DRG
//!   weights, a national `"00"` GPCI row).
//!
//! Every file is required; a missing file is a structured error rather than
//! a silently empty table.

use crate::error::{ScheduleError, ScheduleResult};
use crate::records::{
    DiagnosisEntry, GpciRecord, GroupingRule, HospitalRecord, MdcDefinition, MdcRuleSet,
    MpprIndicator, MsDrgRecord, ProcedureEntry, RvuRecord, RvuTriple, SeverityDrgs,
    WageIndexRecord,
};
use crate::{FeeSchedule, NATIONAL_LOCALITY};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const RVU_FILE: &str = "rvu_data.json";
pub const GPCI_FILE: &str = "gpci_data.json";
pub const MS_DRG_FILE: &str = "ms_drg_data.json";
pub const WAGE_INDEX_FILE: &str = "wage_index_data.json";
pub const HOSPITAL_FILE: &str = "hospital_data.json";
pub const ICD10_CM_FILE: &str = "icd10_cm_data.json";
pub const ICD10_PCS_FILE: &str = "icd10_pcs_data.json";
pub const MDC_FILE: &str = "mdc_definitions.json";
pub const RULES_FILE: &str = "drg_grouping_rules.json";

impl FeeSchedule {
    /// Load a complete fee schedule from a directory of normalized JSON
    /// files, using the default conversion factor.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the directory or any required file is
    /// missing, a file fails to parse, or a record violates its invariants.
    pub fn load_from_directory(dir: impl AsRef<Path>) -> ScheduleResult<Self> {
        Self::load_from_directory_with(dir, None)
    }

    /// Load from a directory with an optional conversion factor override.
    pub fn load_from_directory_with(
        dir: impl AsRef<Path>,
        conversion_factor: Option<f64>,
    ) -> ScheduleResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ScheduleError::DataDirNotFound(dir.to_path_buf()));
        }

        let mut schedule = match conversion_factor {
            Some(factor) => FeeSchedule::with_conversion_factor(factor)?,
            None => FeeSchedule::new(),
        };

        for row in read_file::<Vec<RvuWire>>(dir, RVU_FILE)? {
            schedule.add_rvu(row.into_record()?);
        }
        for row in read_file::<Vec<GpciWire>>(dir, GPCI_FILE)? {
            schedule.add_gpci(row.into_record()?);
        }
        if schedule.get_gpci(NATIONAL_LOCALITY).is_none() {
            return Err(ScheduleError::MissingNationalGpci);
        }
        for row in read_file::<Vec<MsDrgWire>>(dir, MS_DRG_FILE)? {
            schedule.add_ms_drg(row.into_record()?);
        }
        for row in read_file::<Vec<WageIndexWire>>(dir, WAGE_INDEX_FILE)? {
            schedule.add_wage_index(row.into_record()?);
        }
        for row in read_file::<Vec<HospitalWire>>(dir, HOSPITAL_FILE)? {
            schedule.add_hospital(row.into_record()?);
        }

        let cm = read_file::<Icd10CmWire>(dir, ICD10_CM_FILE)?;
        for (code, wire) in flatten_sections::<DiagnosisWire>(cm.codes, ICD10_CM_FILE)? {
            schedule.add_diagnosis(DiagnosisEntry {
                code,
                description: wire.description,
                mdc: wire.mdc,
                is_cc: wire.is_cc,
                is_mcc: wire.is_mcc,
            });
        }

        let pcs = read_file::<Icd10PcsWire>(dir, ICD10_PCS_FILE)?;
        for (code, wire) in flatten_sections::<ProcedureWire>(pcs.procedures, ICD10_PCS_FILE)? {
            schedule.add_procedure(ProcedureEntry {
                code,
                description: wire.description,
                is_or_procedure: wire.is_or_procedure,
                is_non_or_procedure: wire.is_non_or_procedure,
            });
        }

        let mdcs = read_file::<MdcFileWire>(dir, MDC_FILE)?;
        for (code, wire) in flatten_entries::<MdcWire>(mdcs.mdcs, MDC_FILE)? {
            schedule.add_mdc(MdcDefinition {
                code,
                name: wire.name,
                body_system: wire.body_system,
            });
        }

        let rules = read_file::<RulesFileWire>(dir, RULES_FILE)?;
        for (mdc, wire) in rules.grouping_rules {
            if mdc.starts_with('_') {
                continue;
            }
            schedule.add_mdc_rules(mdc, wire.into_rule_set());
        }

        tracing::info!(
            rvu_rows = schedule.rvu_count(),
            gpci_rows = schedule.gpci_count(),
            ms_drg_rows = schedule.ms_drg_count(),
            diagnoses = schedule.diagnosis_count(),
            procedures = schedule.procedure_count(),
            "loaded fee schedule from {}",
            dir.display()
        );

        Ok(schedule)
    }
}

fn read_file<T: DeserializeOwned>(dir: &Path, name: &'static str) -> ScheduleResult<T> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(ScheduleError::MissingDataFile(path));
    }
    let file = File::open(&path).map_err(|source| ScheduleError::FileRead {
        path: path.clone(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ScheduleError::Parse { path, source })
}

/// Flatten `{section: {code: entry}}` into `(code, entry)` pairs, skipping
/// `_`-prefixed metadata keys at both levels.
fn flatten_sections<T: DeserializeOwned>(
    sections: HashMap<String, serde_json::Value>,
    file: &'static str,
) -> ScheduleResult<Vec<(String, T)>> {
    let mut out = Vec::new();
    for (section, value) in sections {
        if section.starts_with('_') {
            continue;
        }
        let entries: HashMap<String, serde_json::Value> =
            serde_json::from_value(value).map_err(|source| ScheduleError::InvalidRecord {
                file,
                key: section.clone(),
                reason: format!("section is not an object of code entries: {source}"),
            })?;
        out.extend(flatten_entries(entries, file)?);
    }
    Ok(out)
}

/// Parse `{code: entry}` pairs, skipping `_`-prefixed metadata keys.
fn flatten_entries<T: DeserializeOwned>(
    entries: HashMap<String, serde_json::Value>,
    file: &'static str,
) -> ScheduleResult<Vec<(String, T)>> {
    let mut out = Vec::new();
    for (code, value) in entries {
        if code.starts_with('_') {
            continue;
        }
        let entry = serde_json::from_value(value).map_err(|source| ScheduleError::InvalidRecord {
            file,
            key: code.clone(),
            reason: source.to_string(),
        })?;
        out.push((code, entry));
    }
    Ok(out)
}

fn ensure(file: &'static str, key: &str, condition: bool, reason: &str) -> ScheduleResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ScheduleError::InvalidRecord {
            file,
            key: key.to_string(),
            reason: reason.to_string(),
        })
    }
}

// ----------------------------------------------------------------------
// Wire models
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RvuWire {
    procedure_code: String,
    #[serde(default)]
    modifier: Option<String>,
    description: String,
    work_rvu_nf: f64,
    pe_rvu_nf: f64,
    mp_rvu_nf: f64,
    work_rvu_f: f64,
    pe_rvu_f: f64,
    mp_rvu_f: f64,
    mp_indicator: i64,
}

impl RvuWire {
    fn into_record(self) -> ScheduleResult<RvuRecord> {
        let values = [
            self.work_rvu_nf,
            self.pe_rvu_nf,
            self.mp_rvu_nf,
            self.work_rvu_f,
            self.pe_rvu_f,
            self.mp_rvu_f,
        ];
        ensure(
            RVU_FILE,
            &self.procedure_code,
            values.iter().all(|v| v.is_finite() && *v >= 0.0),
            "RVU components must be non-negative",
        )?;
        let mppr_indicator =
            MpprIndicator::from_wire(self.mp_indicator).ok_or(ScheduleError::InvalidRecord {
                file: RVU_FILE,
                key: self.procedure_code.clone(),
                reason: format!("mp_indicator must be 0 or 2, got {}", self.mp_indicator),
            })?;
        Ok(RvuRecord {
            procedure_code: self.procedure_code,
            modifier: self.modifier,
            description: self.description,
            non_facility: RvuTriple::new(self.work_rvu_nf, self.pe_rvu_nf, self.mp_rvu_nf),
            facility: RvuTriple::new(self.work_rvu_f, self.pe_rvu_f, self.mp_rvu_f),
            mppr_indicator,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GpciWire {
    locality: String,
    locality_name: String,
    work_gpci: f64,
    pe_gpci: f64,
    mp_gpci: f64,
}

impl GpciWire {
    fn into_record(self) -> ScheduleResult<GpciRecord> {
        ensure(
            GPCI_FILE,
            &self.locality,
            [self.work_gpci, self.pe_gpci, self.mp_gpci]
                .iter()
                .all(|v| v.is_finite() && *v > 0.0),
            "GPCI factors must be positive",
        )?;
        Ok(GpciRecord {
            locality: self.locality,
            locality_name: self.locality_name,
            work: self.work_gpci,
            practice_expense: self.pe_gpci,
            malpractice: self.mp_gpci,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MsDrgWire {
    ms_drg: String,
    description: String,
    relative_weight: f64,
    geometric_mean_los: f64,
    arithmetic_mean_los: f64,
}

impl MsDrgWire {
    fn into_record(self) -> ScheduleResult<MsDrgRecord> {
        ensure(
            MS_DRG_FILE,
            &self.ms_drg,
            self.relative_weight.is_finite() && self.relative_weight > 0.0,
            "relative weight must be positive",
        )?;
        ensure(
            MS_DRG_FILE,
            &self.ms_drg,
            self.geometric_mean_los > 0.0 && self.arithmetic_mean_los > 0.0,
            "mean lengths of stay must be positive",
        )?;
        Ok(MsDrgRecord {
            ms_drg: self.ms_drg,
            description: self.description,
            relative_weight: self.relative_weight,
            geometric_mean_los: self.geometric_mean_los,
            arithmetic_mean_los: self.arithmetic_mean_los,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WageIndexWire {
    cbsa_code: String,
    area_name: String,
    wage_index: f64,
    #[serde(default)]
    capital_wage_index: Option<f64>,
}

impl WageIndexWire {
    fn into_record(self) -> ScheduleResult<WageIndexRecord> {
        ensure(
            WAGE_INDEX_FILE,
            &self.cbsa_code,
            self.wage_index.is_finite() && self.wage_index > 0.0,
            "operating wage index must be positive",
        )?;
        Ok(WageIndexRecord {
            cbsa_code: self.cbsa_code,
            area_name: self.area_name,
            wage_index: self.wage_index,
            capital_wage_index: self.capital_wage_index,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HospitalWire {
    provider_number: String,
    hospital_name: String,
    cbsa_code: String,
    #[serde(default)]
    wage_index: Option<f64>,
    #[serde(default)]
    is_teaching_hospital: bool,
    #[serde(default)]
    intern_resident_to_bed_ratio: Option<f64>,
    #[serde(default)]
    is_dsh_hospital: bool,
    #[serde(default)]
    dsh_patient_percentage: Option<f64>,
    #[serde(default)]
    is_rural: bool,
    #[serde(default)]
    bed_count: Option<u32>,
}

impl HospitalWire {
    fn into_record(self) -> ScheduleResult<HospitalRecord> {
        if let Some(pct) = self.dsh_patient_percentage {
            ensure(
                HOSPITAL_FILE,
                &self.provider_number,
                (0.0..=100.0).contains(&pct),
                "DSH patient percentage must be between 0 and 100",
            )?;
        }
        if let Some(irb) = self.intern_resident_to_bed_ratio {
            ensure(
                HOSPITAL_FILE,
                &self.provider_number,
                irb.is_finite() && irb >= 0.0,
                "intern/resident-to-bed ratio must be non-negative",
            )?;
        }
        Ok(HospitalRecord {
            provider_number: self.provider_number,
            hospital_name: self.hospital_name,
            cbsa_code: self.cbsa_code,
            wage_index: self.wage_index,
            is_teaching_hospital: self.is_teaching_hospital,
            intern_resident_to_bed_ratio: self.intern_resident_to_bed_ratio,
            is_dsh_hospital: self.is_dsh_hospital,
            dsh_patient_percentage: self.dsh_patient_percentage,
            is_rural: self.is_rural,
            bed_count: self.bed_count,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Icd10CmWire {
    #[allow(dead_code)]
    version: Option<String>,
    codes: HashMap<String, serde_json::Value>,
}

/// Nested diagnosis entries tolerate extra generator metadata fields.
#[derive(Debug, Deserialize)]
struct DiagnosisWire {
    description: String,
    mdc: String,
    #[serde(default)]
    is_cc: bool,
    #[serde(default)]
    is_mcc: bool,
}

#[derive(Debug, Deserialize)]
struct Icd10PcsWire {
    #[allow(dead_code)]
    version: Option<String>,
    procedures: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProcedureWire {
    description: String,
    #[serde(default)]
    is_or_procedure: bool,
    #[serde(default)]
    is_non_or_procedure: bool,
}

#[derive(Debug, Deserialize)]
struct MdcFileWire {
    mdcs: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MdcWire {
    name: String,
    #[serde(default)]
    body_system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RulesFileWire {
    grouping_rules: HashMap<String, MdcRulesWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MdcRulesWire {
    #[serde(default)]
    surgical: Vec<RuleWire>,
    #[serde(default)]
    medical: Vec<RuleWire>,
}

impl MdcRulesWire {
    fn into_rule_set(self) -> MdcRuleSet {
        MdcRuleSet {
            surgical: self.surgical.into_iter().map(RuleWire::into_rule).collect(),
            medical: self.medical.into_iter().map(RuleWire::into_rule).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleWire {
    pattern: String,
    description: String,
    drgs: SeverityWire,
}

impl RuleWire {
    fn into_rule(self) -> GroupingRule {
        GroupingRule {
            pattern: self.pattern,
            description: self.description,
            drgs: SeverityDrgs {
                with_mcc: self.drgs.with_mcc,
                with_cc: self.drgs.with_cc,
                without_cc_mcc: self.drgs.without_cc_mcc,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeverityWire {
    #[serde(default)]
    with_mcc: Option<String>,
    #[serde(default)]
    with_cc: Option<String>,
    #[serde(default)]
    without_cc_mcc: Option<String>,
}
