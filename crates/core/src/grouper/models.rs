//! MS-DRG grouper input and output types.

use fee_schedule::GROUPING_VERSION;
use serde::{Deserialize, Serialize};

/// Sentinel MS-DRG code returned when a case cannot be grouped. Callers must
/// never price against it.
pub const UNGROUPABLE_DRG: &str = "UNGROUPABLE";

/// Patient sex as reported on the inpatient stay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    pub const fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            "U" => Ok(Sex::Unknown),
            other => Err(format!("sex must be M, F or U, got {other:?}")),
        }
    }
}

/// How the assigned DRG was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrgType {
    #[serde(rename = "SURGICAL")]
    Surgical,
    #[serde(rename = "MEDICAL")]
    Medical,
    #[serde(rename = "PRE-MDC")]
    PreMdc,
    #[serde(rename = "UNGROUPABLE")]
    Ungroupable,
}

impl DrgType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DrgType::Surgical => "SURGICAL",
            DrgType::Medical => "MEDICAL",
            DrgType::PreMdc => "PRE-MDC",
            DrgType::Ungroupable => "UNGROUPABLE",
        }
    }
}

/// Clinical and demographic input for one inpatient stay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrouperInput {
    /// Principal ICD-10-CM diagnosis, with or without the decimal point.
    pub principal_diagnosis: String,
    #[serde(default)]
    pub secondary_diagnoses: Vec<String>,
    /// ICD-10-PCS procedure codes performed during the stay.
    #[serde(default)]
    pub procedures: Vec<String>,
    /// Age in years at admission (0–120).
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub discharge_status: Option<String>,
    #[serde(default)]
    pub length_of_stay: Option<u32>,
}

impl GrouperInput {
    /// Convenience constructor for the common diagnosis-only case.
    pub fn new(principal_diagnosis: impl Into<String>, age: u32, sex: Sex) -> Self {
        Self {
            principal_diagnosis: principal_diagnosis.into(),
            secondary_diagnoses: Vec::new(),
            procedures: Vec::new(),
            age,
            sex,
            discharge_status: None,
            length_of_stay: None,
        }
    }
}

/// Result of grouping one inpatient stay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrouperOutput {
    /// Assigned MS-DRG, or [`UNGROUPABLE_DRG`].
    pub ms_drg: String,
    pub drg_description: String,
    /// Major Diagnostic Category ("00"–"25").
    pub mdc: String,
    pub mdc_description: String,
    pub drg_type: DrgType,
    pub has_mcc: bool,
    pub has_cc: bool,
    /// Secondary diagnoses that qualified as MCCs (normalized codes).
    #[serde(default)]
    pub mcc_list: Vec<String>,
    #[serde(default)]
    pub cc_list: Vec<String>,
    #[serde(default)]
    pub relative_weight: Option<f64>,
    #[serde(default)]
    pub geometric_mean_los: Option<f64>,
    #[serde(default)]
    pub arithmetic_mean_los: Option<f64>,
    pub grouping_version: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl GrouperOutput {
    /// True when the case could not be grouped and must not be priced.
    pub fn is_ungroupable(&self) -> bool {
        self.drg_type == DrgType::Ungroupable
    }

    pub(crate) fn ungroupable(
        mdc: impl Into<String>,
        mdc_description: impl Into<String>,
        warnings: Vec<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            ms_drg: UNGROUPABLE_DRG.to_string(),
            drg_description: "Ungroupable".to_string(),
            mdc: mdc.into(),
            mdc_description: mdc_description.into(),
            drg_type: DrgType::Ungroupable,
            has_mcc: false,
            has_cc: false,
            mcc_list: Vec::new(),
            cc_list: Vec::new(),
            relative_weight: None,
            geometric_mean_los: None,
            arithmetic_mean_los: None,
            grouping_version: GROUPING_VERSION.to_string(),
            warnings,
            errors,
        }
    }
}
