//! Shared test fixtures: a fee schedule with PFS, IPPS and grouper tables
//! populated with realistic reference rows.

use fee_schedule::sample::sample_fee_schedule;
use fee_schedule::{
    DiagnosisEntry, FeeSchedule, GroupingRule, HospitalRecord, MdcDefinition, MdcRuleSet,
    MsDrgRecord, ProcedureEntry, SeverityDrgs, WageIndexRecord,
};

fn drg(ms_drg: &str, description: &str, weight: f64, gmlos: f64, alos: f64) -> MsDrgRecord {
    MsDrgRecord {
        ms_drg: ms_drg.to_string(),
        description: description.to_string(),
        relative_weight: weight,
        geometric_mean_los: gmlos,
        arithmetic_mean_los: alos,
    }
}

fn diagnosis(code: &str, description: &str, mdc: &str, is_cc: bool, is_mcc: bool) -> DiagnosisEntry {
    DiagnosisEntry {
        code: code.to_string(),
        description: description.to_string(),
        mdc: mdc.to_string(),
        is_cc,
        is_mcc,
    }
}

fn rule(pattern: &str, description: &str, drgs: SeverityDrgs) -> GroupingRule {
    GroupingRule {
        pattern: pattern.to_string(),
        description: description.to_string(),
        drgs,
    }
}

fn severity(
    with_mcc: Option<&str>,
    with_cc: Option<&str>,
    without_cc_mcc: Option<&str>,
) -> SeverityDrgs {
    SeverityDrgs {
        with_mcc: with_mcc.map(str::to_string),
        with_cc: with_cc.map(str::to_string),
        without_cc_mcc: without_cc_mcc.map(str::to_string),
    }
}

/// The sample PFS schedule extended with IPPS and grouper tables.
pub(crate) fn full_schedule() -> FeeSchedule {
    let mut schedule = sample_fee_schedule();

    for record in [
        drg("001", "Heart transplant or implant of heart assist system w MCC", 26.1234, 28.7, 35.2),
        drg("469", "Major hip and knee joint replacement w MCC", 3.0412, 5.1, 6.3),
        drg("470", "Major hip and knee joint replacement w/o MCC", 1.7845, 2.1, 2.5),
        drg("553", "Bone diseases and arthropathies w MCC", 1.4218, 4.3, 5.4),
        drg("554", "Bone diseases and arthropathies w/o MCC", 0.8132, 2.9, 3.6),
        drg("871", "Septicemia or severe sepsis w/o MV >96 hours w MCC", 1.8527, 4.8, 5.9),
        drg("872", "Septicemia or severe sepsis w/o MV >96 hours w/o MCC", 1.0237, 3.7, 4.4),
    ] {
        schedule.add_ms_drg(record);
    }

    for record in [
        WageIndexRecord {
            cbsa_code: "38060".to_string(),
            area_name: "Phoenix-Mesa-Chandler, AZ".to_string(),
            wage_index: 1.0123,
            capital_wage_index: None,
        },
        WageIndexRecord {
            cbsa_code: "35620".to_string(),
            area_name: "New York-Newark-Jersey City, NY-NJ".to_string(),
            wage_index: 1.0123,
            capital_wage_index: Some(1.0),
        },
        WageIndexRecord {
            cbsa_code: "12060".to_string(),
            area_name: "Atlanta-Sandy Springs-Roswell, GA".to_string(),
            wage_index: 0.9456,
            capital_wage_index: Some(0.93),
        },
        WageIndexRecord {
            cbsa_code: "32820".to_string(),
            area_name: "Memphis, TN-MS-AR".to_string(),
            wage_index: 0.7123,
            capital_wage_index: None,
        },
    ] {
        schedule.add_wage_index(record);
    }

    for record in [
        HospitalRecord {
            provider_number: "300001".to_string(),
            hospital_name: "Scottsdale Surgical Hospital".to_string(),
            cbsa_code: "38060".to_string(),
            wage_index: Some(1.0123),
            is_teaching_hospital: false,
            intern_resident_to_bed_ratio: None,
            is_dsh_hospital: false,
            dsh_patient_percentage: None,
            is_rural: false,
            bed_count: Some(120),
        },
        HospitalRecord {
            provider_number: "100007".to_string(),
            hospital_name: "NewYork-Presbyterian Hospital".to_string(),
            cbsa_code: "35620".to_string(),
            wage_index: Some(1.0123),
            is_teaching_hospital: true,
            intern_resident_to_bed_ratio: Some(0.85),
            is_dsh_hospital: true,
            dsh_patient_percentage: Some(22.3),
            is_rural: false,
            bed_count: Some(2600),
        },
        HospitalRecord {
            provider_number: "200001".to_string(),
            hospital_name: "Atlanta Regional Medical Center".to_string(),
            cbsa_code: "12060".to_string(),
            wage_index: None,
            is_teaching_hospital: false,
            intern_resident_to_bed_ratio: None,
            is_dsh_hospital: true,
            dsh_patient_percentage: Some(28.3),
            is_rural: false,
            bed_count: Some(480),
        },
        HospitalRecord {
            provider_number: "400002".to_string(),
            hospital_name: "Mississippi Delta Regional Hospital".to_string(),
            cbsa_code: "32820".to_string(),
            wage_index: Some(0.7123),
            is_teaching_hospital: false,
            intern_resident_to_bed_ratio: None,
            is_dsh_hospital: true,
            dsh_patient_percentage: Some(38.2),
            is_rural: true,
            bed_count: Some(85),
        },
        // No cached wage index and an unknown CBSA.
        HospitalRecord {
            provider_number: "500001".to_string(),
            hospital_name: "Orphaned Provider".to_string(),
            cbsa_code: "00000".to_string(),
            wage_index: None,
            is_teaching_hospital: false,
            intern_resident_to_bed_ratio: None,
            is_dsh_hospital: false,
            dsh_patient_percentage: None,
            is_rural: false,
            bed_count: None,
        },
    ] {
        schedule.add_hospital(record);
    }

    for entry in [
        diagnosis("M1611", "Unilateral primary osteoarthritis, right hip", "08", false, false),
        diagnosis("M1612", "Unilateral primary osteoarthritis, left hip", "08", false, false),
        diagnosis("A419", "Sepsis, unspecified organism", "18", false, false),
        diagnosis("R6520", "Severe sepsis without septic shock", "18", false, true),
        diagnosis("N179", "Acute kidney failure, unspecified", "18", false, true),
        diagnosis("D62", "Acute posthemorrhagic anemia", "16", true, false),
        diagnosis("I10", "Essential (primary) hypertension", "05", false, false),
    ] {
        schedule.add_diagnosis(entry);
    }

    for entry in [
        ProcedureEntry {
            code: "0SR9019".to_string(),
            description: "Replacement of right hip joint with metal synthetic substitute"
                .to_string(),
            is_or_procedure: true,
            is_non_or_procedure: false,
        },
        ProcedureEntry {
            code: "0SRC0J9".to_string(),
            description: "Replacement of right knee joint with synthetic substitute".to_string(),
            is_or_procedure: true,
            is_non_or_procedure: false,
        },
        ProcedureEntry {
            code: "02HV33Z".to_string(),
            description: "Insertion of infusion device into superior vena cava".to_string(),
            is_or_procedure: false,
            is_non_or_procedure: true,
        },
    ] {
        schedule.add_procedure(entry);
    }

    for definition in [
        MdcDefinition {
            code: "05".to_string(),
            name: "Diseases and disorders of the circulatory system".to_string(),
            body_system: Some("Circulatory".to_string()),
        },
        MdcDefinition {
            code: "08".to_string(),
            name: "Diseases and disorders of the musculoskeletal system and connective tissue"
                .to_string(),
            body_system: Some("Musculoskeletal".to_string()),
        },
        MdcDefinition {
            code: "16".to_string(),
            name: "Diseases and disorders of blood and blood-forming organs".to_string(),
            body_system: Some("Hematologic".to_string()),
        },
        MdcDefinition {
            code: "18".to_string(),
            name: "Infectious and parasitic diseases".to_string(),
            body_system: Some("Systemic".to_string()),
        },
    ] {
        schedule.add_mdc(definition);
    }

    schedule.add_mdc_rules(
        "08",
        MdcRuleSet {
            surgical: vec![rule(
                "0SR*",
                "Major hip and knee joint replacement",
                severity(Some("469"), None, Some("470")),
            )],
            medical: vec![rule(
                "M16*",
                "Bone diseases and arthropathies",
                severity(Some("553"), None, Some("554")),
            )],
        },
    );
    schedule.add_mdc_rules(
        "18",
        MdcRuleSet {
            surgical: Vec::new(),
            medical: vec![rule(
                "A41*",
                "Septicemia or severe sepsis",
                severity(Some("871"), None, Some("872")),
            )],
        },
    );

    schedule
}
