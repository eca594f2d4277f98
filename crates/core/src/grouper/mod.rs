//! MS-DRG grouper.
//!
//! Classifies an inpatient stay into a Medicare Severity Diagnosis Related
//! Group. The decision tree is fixed in code; every clinical fact it consults
//! (MDC tags, CC/MCC flags, OR-procedure flags, rule families, severity
//! splits) lives in the reference data tables:
//!
//! 1. normalize and validate the input,
//! 2. assign the Major Diagnostic Category from the principal diagnosis,
//! 3. detect CC/MCC severity from the secondary diagnoses,
//! 4. branch surgical/medical on the presence of an OR procedure,
//! 5. match the MDC's rule families in declared order,
//! 6. pick the DRG for the detected severity, falling back one severity step
//!    when the requested slot is absent,
//! 7. resolve the DRG's weight and lengths of stay.
//!
//! A case that fails validation or matches no rule returns the UNGROUPABLE
//! sentinel; the grouper never guesses a DRG.

pub mod models;

pub use models::{DrgType, GrouperInput, GrouperOutput, Sex, UNGROUPABLE_DRG};

use fee_schedule::{normalize_code, FeeSchedule, SeverityDrgs, GROUPING_VERSION};
use std::sync::Arc;

/// Pre-MDC / unassigned category tag.
const PRE_MDC: &str = "00";

/// MS-DRG grouping service holding a read-only fee schedule handle.
#[derive(Clone, Debug)]
pub struct MsDrgGrouper {
    schedule: Arc<FeeSchedule>,
}

impl MsDrgGrouper {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        Self { schedule }
    }

    /// Assign an MS-DRG to one inpatient stay.
    ///
    /// Never fails: validation problems and unmatched cases are reported on
    /// the returned output with `drg_type` UNGROUPABLE.
    pub fn assign_drg(&self, input: &GrouperInput) -> GrouperOutput {
        let mut warnings: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        let pdx = normalize_code(&input.principal_diagnosis);
        if pdx.is_empty() {
            errors.push("principal diagnosis is required".to_string());
        }
        if input.age > 120 {
            errors.push(format!("age {} is outside the valid range 0-120", input.age));
        }
        if !errors.is_empty() {
            return GrouperOutput::ungroupable(PRE_MDC, "Ungroupable", warnings, errors);
        }

        // MDC from the principal diagnosis; unknown codes fall to pre-MDC.
        let mdc = match self.schedule.lookup_diagnosis(&pdx) {
            Some(entry) => entry.mdc.clone(),
            None => {
                warnings.push(format!(
                    "principal diagnosis {pdx} not found; case left unassigned (pre-MDC)"
                ));
                PRE_MDC.to_string()
            }
        };
        let mdc_description = self
            .schedule
            .mdc_definition(&mdc)
            .map(|definition| definition.name.clone())
            .unwrap_or_else(|| format!("MDC {mdc}"));

        // CC/MCC severity from the secondary diagnoses, MCC taking
        // precedence over CC for any single code.
        let mut mcc_list = Vec::new();
        let mut cc_list = Vec::new();
        for secondary in &input.secondary_diagnoses {
            let code = normalize_code(secondary);
            match self.schedule.lookup_diagnosis(&code) {
                Some(entry) if entry.is_mcc => mcc_list.push(code),
                Some(entry) if entry.is_cc => cc_list.push(code),
                Some(_) => {}
                None => {
                    warnings.push(format!("secondary diagnosis {code} not found; ignored"));
                }
            }
        }
        let has_mcc = !mcc_list.is_empty();
        let has_cc = !cc_list.is_empty();

        // Surgical when any procedure carries the OR flag; unknown
        // procedures are treated as non-OR.
        let mut or_procedures = Vec::new();
        for procedure in &input.procedures {
            let code = normalize_code(procedure);
            match self.schedule.lookup_procedure(&code) {
                Some(entry) if entry.is_or_procedure => or_procedures.push(code),
                Some(_) => {}
                None => {
                    warnings.push(format!("procedure {code} not found; treated as non-OR"));
                }
            }
        }
        let surgical = !or_procedures.is_empty();

        let Some(rule_set) = self.schedule.rules_for_mdc(&mdc) else {
            errors.push(format!("no grouping rules defined for MDC {mdc}"));
            return GrouperOutput::ungroupable(mdc, mdc_description, warnings, errors);
        };

        // First family whose pattern matches wins; declared order is match
        // order. Surgical families match against the OR procedures, medical
        // families against the principal diagnosis.
        let families = if surgical {
            &rule_set.surgical
        } else {
            &rule_set.medical
        };
        let matched = families.iter().find(|family| {
            if surgical {
                or_procedures
                    .iter()
                    .any(|code| pattern_matches(&family.pattern, code))
            } else {
                pattern_matches(&family.pattern, &pdx)
            }
        });

        let Some(family) = matched else {
            let branch = if surgical { "surgical" } else { "medical" };
            errors.push(format!("no {branch} rule matched for MDC {mdc}"));
            return GrouperOutput::ungroupable(mdc, mdc_description, warnings, errors);
        };

        let Some(selection) = select_severity(&family.drgs, has_mcc, has_cc) else {
            errors.push(format!(
                "rule \"{}\" defines no DRG for any severity level",
                family.description
            ));
            return GrouperOutput::ungroupable(mdc, mdc_description, warnings, errors);
        };
        if selection.fell_back {
            warnings.push(format!(
                "severity slot unavailable for \"{}\"; assigned lower-severity DRG {}",
                family.description, selection.ms_drg
            ));
        }

        let drg_type = if mdc == PRE_MDC {
            DrgType::PreMdc
        } else if surgical {
            DrgType::Surgical
        } else {
            DrgType::Medical
        };

        let record = self.schedule.get_ms_drg(&selection.ms_drg);
        if record.is_none() {
            errors.push(format!(
                "assigned MS-DRG {} has no fee schedule record",
                selection.ms_drg
            ));
        }

        GrouperOutput {
            ms_drg: selection.ms_drg,
            drg_description: record
                .map(|r| r.description.clone())
                .unwrap_or_else(|| family.description.clone()),
            mdc,
            mdc_description,
            drg_type,
            has_mcc,
            has_cc,
            mcc_list,
            cc_list,
            relative_weight: record.map(|r| r.relative_weight),
            geometric_mean_los: record.map(|r| r.geometric_mean_los),
            arithmetic_mean_los: record.map(|r| r.arithmetic_mean_los),
            grouping_version: GROUPING_VERSION.to_string(),
            warnings,
            errors,
        }
    }
}

struct SeveritySelection {
    ms_drg: String,
    /// True when the requested severity slot was absent and a lower one was
    /// used instead.
    fell_back: bool,
}

/// Pick the DRG for the detected severity: `with_mcc` if an MCC is present,
/// else `with_cc` if a CC is present, else `without_cc_mcc`; absent slots
/// fall through to the next-lower severity.
fn select_severity(drgs: &SeverityDrgs, has_mcc: bool, has_cc: bool) -> Option<SeveritySelection> {
    let slots = [
        (has_mcc, drgs.with_mcc.as_ref()),
        (has_mcc || has_cc, drgs.with_cc.as_ref()),
        (true, drgs.without_cc_mcc.as_ref()),
    ];
    let mut fell_back = false;
    for (applies, slot) in slots {
        if !applies {
            continue;
        }
        match slot {
            Some(ms_drg) => {
                return Some(SeveritySelection {
                    ms_drg: ms_drg.clone(),
                    fell_back,
                })
            }
            None => fell_back = true,
        }
    }
    None
}

/// Match a rule pattern against a normalized code. Patterns are normalized
/// the same way codes are; a trailing `*` makes the token a prefix match,
/// anything else is an exact match.
fn pattern_matches(pattern: &str, code: &str) -> bool {
    let pattern = normalize_code(pattern);
    match pattern.strip_suffix('*') {
        Some(prefix) => code.starts_with(prefix),
        None => code == pattern,
    }
}
