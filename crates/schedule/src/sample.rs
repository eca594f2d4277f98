//! Built-in demonstration fee schedule.
//!
//! A small schedule covering common office visits, labs, imaging and minor
//! procedures at realistic 2025 RVU values, with GPCI rows for a handful of
//! large localities. Used by tests and examples; production deployments load
//! the full published tables from a data directory instead.

use crate::records::{GpciRecord, MpprIndicator, RvuRecord, RvuTriple};
use crate::FeeSchedule;

struct SampleRvu(&'static str, Option<&'static str>, &'static str, [f64; 6], i64);

#[rustfmt::skip]
const SAMPLE_RVUS: &[SampleRvu] = &[
    // Office visits, established patient
    SampleRvu("99211", None, "Office visit, established patient, minimal",
              [0.18, 0.61, 0.02, 0.18, 0.45, 0.02], 0),
    SampleRvu("99212", None, "Office visit, established patient, low",
              [0.48, 0.98, 0.04, 0.48, 0.73, 0.04], 0),
    SampleRvu("99213", None, "Office visit, established patient, moderate",
              [0.97, 1.57, 0.09, 0.97, 1.18, 0.09], 0),
    SampleRvu("99214", None, "Office visit, established patient, high",
              [1.50, 2.13, 0.14, 1.50, 1.60, 0.14], 0),
    SampleRvu("99215", None, "Office visit, established patient, comprehensive",
              [2.11, 2.80, 0.20, 2.11, 2.10, 0.20], 0),
    // Office visits, new patient
    SampleRvu("99202", None, "Office visit, new patient, low",
              [0.93, 1.57, 0.09, 0.93, 1.18, 0.09], 0),
    SampleRvu("99203", None, "Office visit, new patient, moderate",
              [1.42, 2.13, 0.14, 1.42, 1.60, 0.14], 0),
    SampleRvu("99204", None, "Office visit, new patient, high",
              [2.43, 2.94, 0.23, 2.43, 2.20, 0.23], 0),
    SampleRvu("99205", None, "Office visit, new patient, comprehensive",
              [3.17, 3.69, 0.30, 3.17, 2.77, 0.30], 0),
    // Laboratory
    SampleRvu("80053", None, "Comprehensive metabolic panel",
              [0.00, 1.13, 0.05, 0.00, 0.85, 0.05], 0),
    SampleRvu("85025", None, "Complete blood count (CBC) with differential",
              [0.00, 0.85, 0.04, 0.00, 0.64, 0.04], 0),
    SampleRvu("80061", None, "Lipid panel",
              [0.00, 0.92, 0.04, 0.00, 0.69, 0.04], 0),
    SampleRvu("84443", None, "Thyroid stimulating hormone (TSH)",
              [0.00, 0.68, 0.03, 0.00, 0.51, 0.03], 0),
    // Imaging
    SampleRvu("71045", None, "Chest X-ray, single view",
              [0.17, 4.92, 0.15, 0.17, 0.82, 0.15], 2),
    SampleRvu("71046", None, "Chest X-ray, 2 views",
              [0.22, 6.41, 0.19, 0.22, 1.07, 0.19], 2),
    SampleRvu("73030", None, "Shoulder X-ray, 2 views",
              [0.18, 4.25, 0.13, 0.18, 0.71, 0.13], 2),
    // Component splits stored as modifier-specific rows
    SampleRvu("71046", Some("26"), "Chest X-ray, 2 views - professional component",
              [0.22, 0.00, 0.19, 0.22, 0.00, 0.19], 0),
    SampleRvu("71046", Some("TC"), "Chest X-ray, 2 views - technical component",
              [0.00, 6.41, 0.00, 0.00, 1.07, 0.00], 2),
    // Minor procedures
    SampleRvu("12001", None, "Simple repair, superficial wounds, 2.5 cm or less",
              [1.19, 4.82, 0.23, 1.19, 2.54, 0.23], 2),
    SampleRvu("12002", None, "Simple repair, superficial wounds, 2.6 to 7.5 cm",
              [1.48, 5.67, 0.29, 1.48, 2.99, 0.29], 2),
    SampleRvu("17000", None, "Destruction, benign or premalignant lesion, first",
              [0.76, 2.94, 0.10, 0.76, 1.55, 0.10], 2),
    SampleRvu("17003", None, "Destruction, benign lesion, each additional",
              [0.14, 0.42, 0.02, 0.14, 0.22, 0.02], 2),
    // Injections
    SampleRvu("96372", None, "Therapeutic injection, subcutaneous or intramuscular",
              [0.17, 0.98, 0.03, 0.17, 0.52, 0.03], 0),
    SampleRvu("20610", None, "Arthrocentesis, major joint",
              [1.01, 4.67, 0.25, 1.01, 2.46, 0.25], 2),
];

#[rustfmt::skip]
const SAMPLE_GPCIS: &[(&str, &str, f64, f64, f64)] = &[
    ("01", "Manhattan, NY",     1.094, 1.385, 1.797),
    ("05", "Los Angeles, CA",   1.037, 1.189, 0.681),
    ("26", "Dallas, TX",        1.003, 0.987, 0.917),
    ("03", "Miami, FL",         1.000, 1.038, 2.168),
    ("16", "Chicago, IL",       1.004, 1.041, 1.306),
    ("00", "National Average",  1.000, 1.000, 1.000),
    ("99", "Rest of US",        1.000, 1.000, 1.000),
];

/// Build the demonstration fee schedule with the default conversion factor.
///
/// Covers the Physician Fee Schedule tables only; IPPS and grouper tables
/// start empty and can be populated with the `add_*` builders.
pub fn sample_fee_schedule() -> FeeSchedule {
    let mut schedule = FeeSchedule::new();
    for SampleRvu(code, modifier, description, v, indicator) in SAMPLE_RVUS {
        schedule.add_rvu(RvuRecord {
            procedure_code: (*code).to_string(),
            modifier: (*modifier).map(str::to_string),
            description: (*description).to_string(),
            non_facility: RvuTriple::new(v[0], v[1], v[2]),
            facility: RvuTriple::new(v[3], v[4], v[5]),
            mppr_indicator: MpprIndicator::from_wire(*indicator)
                .unwrap_or(MpprIndicator::NotSubject),
        });
    }
    for (locality, name, work, pe, mp) in SAMPLE_GPCIS {
        schedule.add_gpci(GpciRecord {
            locality: (*locality).to_string(),
            locality_name: (*name).to_string(),
            work: *work,
            practice_expense: *pe,
            malpractice: *mp,
        });
    }
    schedule
}
