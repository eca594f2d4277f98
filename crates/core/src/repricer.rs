//! Claim repricing orchestrator.
//!
//! The [`Repricer`] is the engine facade: it owns the loaded fee schedule and
//! the per-system calculators, classifies each claim line by payment system,
//! runs the two-pass MPPR ranking over the professional lines, and assembles
//! the repriced claim.
//!
//! Per-line failures never abort a claim: an erroring line reports a $0
//! allowed amount with its structured error list and the remaining lines are
//! priced normally. Claim-level shape violations fail the whole call with no
//! partial output.

use crate::claim::{Claim, ClaimLine, RepricedClaim, RepricedLine, ServiceType, INPATIENT_CODE};
use crate::config::RepricerConfig;
use crate::error::{LineError, LineErrorKind, RepricerResult};
use crate::grouper::{GrouperInput, GrouperOutput, MsDrgGrouper};
use crate::ipps::{IppsCalculator, IppsOutcome};
use crate::locality::LocalityResolver;
use crate::pfs::{is_facility_pos, PfsCalculator, PfsOutcome};
use crate::round_cents;
use chrono::Utc;
use fee_schedule::{FeeSchedule, GpciRecord, MsDrgRecord, RvuRecord};
use std::collections::HashMap;
use std::sync::Arc;

/// Medicare claims repricing engine.
///
/// Construct once (loading the reference data), then price any number of
/// claims. The engine is stateless across claims and may be shared across
/// threads without synchronization.
#[derive(Clone, Debug)]
pub struct Repricer {
    schedule: Arc<FeeSchedule>,
    resolver: LocalityResolver,
    pfs: PfsCalculator,
    ipps: IppsCalculator,
    grouper: MsDrgGrouper,
}

impl Repricer {
    /// Build an engine by loading reference data per the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::RepricerError`] when the data directory or any
    /// required file is missing or invalid.
    pub fn new(config: RepricerConfig) -> RepricerResult<Self> {
        let schedule = FeeSchedule::load_from_directory_with(
            config.data_directory(),
            config.conversion_factor(),
        )?;
        tracing::info!(
            data_directory = %config.data_directory().display(),
            conversion_factor = schedule.conversion_factor(),
            "repricing engine initialised"
        );
        Ok(Self::with_schedule(schedule))
    }

    /// Build an engine around an already-populated fee schedule.
    pub fn with_schedule(schedule: FeeSchedule) -> Self {
        let schedule = Arc::new(schedule);
        Self {
            pfs: PfsCalculator::new(Arc::clone(&schedule)),
            ipps: IppsCalculator::new(Arc::clone(&schedule)),
            grouper: MsDrgGrouper::new(Arc::clone(&schedule)),
            resolver: LocalityResolver::default(),
            schedule,
        }
    }

    /// Replace the ZIP-to-locality mapping.
    pub fn with_locality_resolver(mut self, resolver: LocalityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Reprice one claim to Medicare allowed amounts.
    ///
    /// # Errors
    ///
    /// Returns `RepricerError::InvalidClaim` for claim-shape violations
    /// (empty claim, duplicate line numbers, malformed fields); in that case
    /// no partial output is produced.
    pub fn reprice_claim(&self, claim: &Claim) -> RepricerResult<RepricedClaim> {
        claim.validate()?;

        let classes: Vec<Result<ServiceType, LineError>> =
            claim.lines.iter().map(classify_line).collect();
        let ranks = self.assign_mppr_ranks(claim, &classes);

        let mut lines = Vec::with_capacity(claim.lines.len());
        for (line, class) in claim.lines.iter().zip(&classes) {
            let repriced = match class {
                Err(error) => error_line(line, None, error.clone()),
                Ok(ServiceType::Ipps) => self.price_ipps_line(line),
                Ok(ServiceType::Pfs) => {
                    let rank = ranks.get(&line.line_number).copied().unwrap_or(1);
                    self.price_pfs_line(line, rank)
                }
            };
            lines.push(repriced);
        }

        let total_allowed = round_cents(
            lines
                .iter()
                .filter(|line| line.is_payable())
                .map(|line| line.medicare_allowed)
                .sum(),
        );

        let mut notes = vec![format!(
            "repriced with Medicare conversion factor ${:.2}",
            self.schedule.conversion_factor()
        )];
        if ranks.len() > 1 {
            notes.push(format!("MPPR ranking applied to {} procedures", ranks.len()));
        }

        Ok(RepricedClaim {
            claim_id: claim.claim_id.clone(),
            patient_id: claim.patient_id.clone(),
            diagnosis_codes: claim.diagnosis_codes.clone(),
            lines,
            total_allowed,
            notes,
            repriced_at: Utc::now(),
        })
    }

    /// Reprice a batch of claims; each claim succeeds or fails independently.
    pub fn reprice_claims(&self, claims: &[Claim]) -> Vec<RepricerResult<RepricedClaim>> {
        claims.iter().map(|claim| self.reprice_claim(claim)).collect()
    }

    /// Assign an MS-DRG to an inpatient stay. See [`MsDrgGrouper::assign_drg`].
    pub fn assign_drg(&self, input: &GrouperInput) -> GrouperOutput {
        self.grouper.assign_drg(input)
    }

    /// Price one professional line directly. See [`PfsCalculator::calculate`].
    pub fn calculate_pfs_allowed(
        &self,
        procedure_code: &str,
        modifiers: &[String],
        place_of_service: &str,
        locality: &str,
        units: u32,
        rank: u32,
    ) -> Result<PfsOutcome, LineError> {
        self.pfs
            .calculate(procedure_code, modifiers, place_of_service, locality, units, rank)
    }

    /// Price one inpatient stay directly. See [`IppsCalculator::calculate`].
    pub fn calculate_ipps_allowed(
        &self,
        ms_drg: &str,
        provider_number: &str,
        total_charges: Option<f64>,
        covered_days: Option<u32>,
    ) -> Result<IppsOutcome, LineError> {
        self.ipps
            .calculate(ms_drg, provider_number, total_charges, covered_days)
    }

    /// Group an inpatient stay and price the resulting MS-DRG in one call,
    /// for callers that do not carry a pre-computed DRG.
    ///
    /// # Errors
    ///
    /// Returns `grouper_ungroupable` when the stay cannot be grouped, or the
    /// IPPS pricing error otherwise.
    pub fn reprice_inpatient_stay(
        &self,
        input: &GrouperInput,
        provider_number: &str,
        total_charges: Option<f64>,
        covered_days: Option<u32>,
    ) -> Result<(GrouperOutput, IppsOutcome), LineError> {
        let grouping = self.grouper.assign_drg(input);
        if grouping.is_ungroupable() {
            return Err(LineError::new(
                LineErrorKind::GrouperUngroupable,
                grouping.errors.join("; "),
            ));
        }
        let outcome =
            self.ipps
                .calculate(&grouping.ms_drg, provider_number, total_charges, covered_days)?;
        Ok((grouping, outcome))
    }

    /// Read-through RVU accessor for tooling.
    pub fn get_rvu(&self, procedure_code: &str, modifier: Option<&str>) -> Option<&RvuRecord> {
        self.schedule.get_rvu(procedure_code, modifier)
    }

    /// Read-through GPCI accessor for tooling.
    pub fn get_gpci(&self, locality: &str) -> Option<&GpciRecord> {
        self.schedule.get_gpci(locality)
    }

    /// Read-through MS-DRG accessor for tooling.
    pub fn get_ms_drg(&self, ms_drg: &str) -> Option<&MsDrgRecord> {
        self.schedule.get_ms_drg(ms_drg)
    }

    /// The loaded reference data store.
    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Pass 1: rank MPPR-subject professional lines by their summed selected
    /// RVU triple, highest first, ties broken by ascending line number.
    fn assign_mppr_ranks(
        &self,
        claim: &Claim,
        classes: &[Result<ServiceType, LineError>],
    ) -> HashMap<u32, u32> {
        let mut candidates: Vec<(u32, f64)> = Vec::new();
        for (line, class) in claim.lines.iter().zip(classes) {
            if !matches!(class, Ok(ServiceType::Pfs)) {
                continue;
            }
            let code = line.procedure_code.trim().to_ascii_uppercase();
            let first_modifier = line.modifiers.first().map(|m| m.trim().to_ascii_uppercase());
            let Some(rvu) = self.schedule.get_rvu(&code, first_modifier.as_deref()) else {
                continue;
            };
            if !rvu.mppr_indicator.is_subject() {
                continue;
            }
            let score = rvu.triple(is_facility_pos(&line.place_of_service)).total();
            candidates.push((line.line_number, score));
        }
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates
            .into_iter()
            .enumerate()
            .map(|(index, (line_number, _))| (line_number, index as u32 + 1))
            .collect()
    }

    fn price_pfs_line(&self, line: &ClaimLine, rank: u32) -> RepricedLine {
        let (locality, zip_warning) = match (&line.locality, &line.zip_code) {
            (Some(locality), _) => (locality.clone(), None),
            (None, Some(zip)) => {
                let resolved = self.resolver.resolve_zip(zip);
                (resolved.locality, resolved.warning)
            }
            (None, None) => {
                return error_line(
                    line,
                    Some(ServiceType::Pfs),
                    LineError::new(
                        LineErrorKind::LocalityOrZipRequired,
                        "locality or zip required",
                    ),
                );
            }
        };

        match self.pfs.calculate(
            &line.procedure_code,
            &line.modifiers,
            &line.place_of_service,
            &locality,
            line.units,
            rank,
        ) {
            Ok(outcome) => {
                let mut warnings = outcome.warnings;
                if let Some(warning) = zip_warning {
                    warnings.insert(0, warning);
                }
                RepricedLine {
                    line_number: line.line_number,
                    procedure_code: line.procedure_code.clone(),
                    place_of_service: line.place_of_service.clone(),
                    modifiers: line.modifiers.clone(),
                    locality: Some(outcome.derivation.locality.clone()),
                    units: line.units,
                    service_type: Some(ServiceType::Pfs),
                    medicare_allowed: outcome.allowed,
                    pfs: Some(outcome.derivation),
                    ipps: None,
                    notes: outcome.notes,
                    warnings,
                    errors: Vec::new(),
                }
            }
            Err(error) => {
                let mut repriced = error_line(line, Some(ServiceType::Pfs), error);
                repriced.locality = Some(locality);
                repriced
            }
        }
    }

    fn price_ipps_line(&self, line: &ClaimLine) -> RepricedLine {
        let (Some(ms_drg), Some(provider_number)) =
            (line.ms_drg_code.as_deref(), line.provider_number.as_deref())
        else {
            // Classification guarantees both are present.
            return error_line(
                line,
                Some(ServiceType::Ipps),
                LineError::new(
                    LineErrorKind::DrgNotFound,
                    "ms_drg_code and provider_number are required for inpatient lines",
                ),
            );
        };

        match self
            .ipps
            .calculate(ms_drg, provider_number, line.total_charges, line.covered_days)
        {
            Ok(outcome) => RepricedLine {
                line_number: line.line_number,
                procedure_code: line.procedure_code.clone(),
                place_of_service: line.place_of_service.clone(),
                modifiers: line.modifiers.clone(),
                locality: None,
                units: line.units,
                service_type: Some(ServiceType::Ipps),
                medicare_allowed: outcome.allowed,
                pfs: None,
                ipps: Some(outcome.derivation),
                notes: outcome.notes,
                warnings: Vec::new(),
                errors: Vec::new(),
            },
            Err(error) => error_line(line, Some(ServiceType::Ipps), error),
        }
    }
}

/// Classify a claim line by payment system, surfacing unsupported service
/// families as structured errors rather than mispricing them.
fn classify_line(line: &ClaimLine) -> Result<ServiceType, LineError> {
    let code = line.procedure_code.trim().to_ascii_uppercase();
    let inpatient_intent =
        line.ms_drg_code.is_some() || line.provider_number.is_some() || code == INPATIENT_CODE;
    if inpatient_intent {
        if line.ms_drg_code.is_none() {
            return Err(LineError::new(
                LineErrorKind::DrgNotFound,
                "ms_drg_code is required for inpatient lines",
            ));
        }
        if line.provider_number.is_none() {
            return Err(LineError::new(
                LineErrorKind::HospitalNotFound,
                "provider_number is required for inpatient lines",
            ));
        }
        return Ok(ServiceType::Ipps);
    }

    if let Some(family) = unsupported_family(&code) {
        return Err(LineError::new(
            LineErrorKind::UnsupportedServiceType,
            format!("{family} services are not priced by this engine (code {code})"),
        ));
    }
    Ok(ServiceType::Pfs)
}

/// Service families present in published data but not priced by this engine.
fn unsupported_family(code: &str) -> Option<&'static str> {
    let (head, tail) = match code.len() {
        5 => (code.as_bytes()[0], &code[1..]),
        _ => return None,
    };
    let numeric_tail = tail.bytes().all(|b| b.is_ascii_digit());
    match head {
        b'D' if numeric_tail => Some("dental"),
        b'E' | b'K' if numeric_tail => Some("durable medical equipment"),
        b'0'..=b'9' => {
            if !code.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // Anesthesia CPT range 00100-01999.
            match code.parse::<u32>() {
                Ok(n) if (100..=1999).contains(&n) => Some("anesthesia"),
                _ => None,
            }
        }
        _ => None,
    }
}

fn error_line(
    line: &ClaimLine,
    service_type: Option<ServiceType>,
    error: LineError,
) -> RepricedLine {
    RepricedLine {
        line_number: line.line_number,
        procedure_code: line.procedure_code.clone(),
        place_of_service: line.place_of_service.clone(),
        modifiers: line.modifiers.clone(),
        locality: line.locality.clone(),
        units: line.units,
        service_type,
        medicare_allowed: 0.0,
        pfs: None,
        ipps: None,
        notes: Vec::new(),
        warnings: Vec::new(),
        errors: vec![error],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LineWarningKind, RepricerError};
    use crate::grouper::Sex;
    use crate::testdata::full_schedule;

    fn engine() -> Repricer {
        Repricer::with_schedule(full_schedule())
    }

    fn claim(lines: Vec<ClaimLine>) -> Claim {
        Claim {
            claim_id: "CLM-TEST".to_string(),
            patient_id: Some("PAT-1".to_string()),
            diagnosis_codes: vec!["M54.50".to_string()],
            lines,
        }
    }

    #[test]
    fn office_visit_claim_prices_on_the_pfs_path() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![ClaimLine::pfs(1, "99213", "11", "01")]))
            .expect("claim should price");

        let line = &repriced.lines[0];
        assert_eq!(line.service_type, Some(ServiceType::Pfs));
        let derivation = line.pfs.as_ref().expect("pfs derivation");
        assert!(!derivation.is_facility);
        assert!(!derivation.mppr_applied);
        assert!(line.medicare_allowed > 0.0);
        assert_eq!(repriced.total_allowed, line.medicare_allowed);
    }

    #[test]
    fn zip_code_resolves_to_locality() {
        let engine = engine();
        let mut line = ClaimLine::pfs(1, "99213", "11", "01");
        line.locality = None;
        line.zip_code = Some("10001".to_string());

        let repriced = engine.reprice_claim(&claim(vec![line])).expect("claim");
        assert_eq!(repriced.lines[0].locality.as_deref(), Some("01"));
        assert!(repriced.lines[0].warnings.is_empty());
    }

    #[test]
    fn unmapped_zip_defaults_with_warning() {
        let engine = engine();
        let mut line = ClaimLine::pfs(1, "99213", "11", "01");
        line.locality = None;
        line.zip_code = Some("99950".to_string());

        let repriced = engine.reprice_claim(&claim(vec![line])).expect("claim");
        let repriced_line = &repriced.lines[0];
        assert_eq!(repriced_line.locality.as_deref(), Some("00"));
        assert!(repriced_line
            .warnings
            .iter()
            .any(|w| w.kind == LineWarningKind::LocalityDefaulted));
        assert!(repriced_line.is_payable());
    }

    #[test]
    fn missing_locality_and_zip_is_a_fatal_line_error() {
        let engine = engine();
        let mut line = ClaimLine::pfs(1, "99213", "11", "01");
        line.locality = None;

        let repriced = engine.reprice_claim(&claim(vec![line])).expect("claim");
        let repriced_line = &repriced.lines[0];
        assert_eq!(repriced_line.medicare_allowed, 0.0);
        assert_eq!(
            repriced_line.errors[0].kind,
            LineErrorKind::LocalityOrZipRequired
        );
    }

    #[test]
    fn mppr_reduces_the_lower_valued_procedure_only() {
        let engine = engine();
        // 71046 (RVU sum 6.82) outranks 71045 (RVU sum 5.24); both carry
        // MPPR indicator 2.
        let repriced = engine
            .reprice_claim(&claim(vec![
                ClaimLine::pfs(1, "71045", "11", "01"),
                ClaimLine::pfs(2, "71046", "11", "01"),
            ]))
            .expect("claim should price");

        let first = repriced.lines[0].pfs.as_ref().expect("derivation");
        let second = repriced.lines[1].pfs.as_ref().expect("derivation");
        assert_eq!(first.mppr_rank, 2);
        assert!(first.mppr_applied);
        assert_eq!(second.mppr_rank, 1);
        assert!(!second.mppr_applied);

        let solo_71045 = engine
            .calculate_pfs_allowed("71045", &[], "11", "01", 1, 1)
            .expect("solo price")
            .allowed;
        assert!((repriced.lines[0].medicare_allowed - solo_71045 * 0.5).abs() < 0.01);
    }

    #[test]
    fn mppr_tie_breaks_by_ascending_line_number() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![
                ClaimLine::pfs(3, "71046", "11", "01"),
                ClaimLine::pfs(5, "71046", "11", "01"),
            ]))
            .expect("claim should price");

        assert_eq!(repriced.lines[0].pfs.as_ref().expect("d").mppr_rank, 1);
        assert_eq!(repriced.lines[1].pfs.as_ref().expect("d").mppr_rank, 2);
    }

    #[test]
    fn mppr_exempt_lines_are_never_ranked() {
        let engine = engine();
        // 99213 and 96372 carry MPPR indicator 0.
        let repriced = engine
            .reprice_claim(&claim(vec![
                ClaimLine::pfs(1, "99213", "11", "01"),
                ClaimLine::pfs(2, "96372", "11", "01"),
            ]))
            .expect("claim should price");

        for line in &repriced.lines {
            let derivation = line.pfs.as_ref().expect("derivation");
            assert_eq!(derivation.mppr_rank, 1);
            assert!(!derivation.mppr_applied);
        }
    }

    #[test]
    fn inpatient_line_routes_to_ipps() {
        let engine = engine();
        let mut line = ClaimLine::ipps(1, "470", "100007");
        line.total_charges = Some(120_000.0);
        line.covered_days = Some(3);

        let repriced = engine.reprice_claim(&claim(vec![line])).expect("claim");
        let repriced_line = &repriced.lines[0];
        assert_eq!(repriced_line.service_type, Some(ServiceType::Ipps));
        let derivation = repriced_line.ipps.as_ref().expect("ipps derivation");
        assert_eq!(derivation.ms_drg, "470");
        assert_eq!(derivation.hospital_name, "NewYork-Presbyterian Hospital");
        assert!(repriced_line.medicare_allowed > 0.0);
    }

    #[test]
    fn mixed_claim_prices_both_paths_and_sums_payable_lines() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![
                ClaimLine::ipps(1, "470", "300001"),
                ClaimLine::pfs(2, "99213", "11", "01"),
                ClaimLine::pfs(3, "99999", "11", "01"), // unknown code: fatal
            ]))
            .expect("claim should price");

        assert_eq!(repriced.lines.len(), 3);
        assert_eq!(repriced.lines[0].service_type, Some(ServiceType::Ipps));
        assert_eq!(repriced.lines[1].service_type, Some(ServiceType::Pfs));
        assert!(!repriced.lines[2].is_payable());
        assert_eq!(repriced.lines[2].medicare_allowed, 0.0);

        let expected: f64 = repriced.lines[..2]
            .iter()
            .map(|line| line.medicare_allowed)
            .sum();
        assert!((repriced.total_allowed - expected).abs() < 0.01);
    }

    #[test]
    fn inpatient_line_missing_drg_errors_without_aborting() {
        let engine = engine();
        let mut line = ClaimLine::ipps(1, "470", "100007");
        line.ms_drg_code = None;

        let repriced = engine.reprice_claim(&claim(vec![line])).expect("claim");
        assert_eq!(repriced.lines[0].errors[0].kind, LineErrorKind::DrgNotFound);
        assert_eq!(repriced.total_allowed, 0.0);
    }

    #[test]
    fn unknown_drg_is_a_line_error_not_a_claim_error() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![ClaimLine::ipps(1, "998", "100007")]))
            .expect("claim should succeed");
        assert_eq!(repriced.lines[0].errors[0].kind, LineErrorKind::DrgNotFound);
    }

    #[test]
    fn dental_codes_are_unsupported() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![ClaimLine::pfs(1, "D0120", "11", "01")]))
            .expect("claim should succeed");
        let error = &repriced.lines[0].errors[0];
        assert_eq!(error.kind, LineErrorKind::UnsupportedServiceType);
        assert!(error.message.contains("dental"));
    }

    #[test]
    fn anesthesia_codes_are_unsupported() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![ClaimLine::pfs(1, "00170", "22", "01")]))
            .expect("claim should succeed");
        assert_eq!(
            repriced.lines[0].errors[0].kind,
            LineErrorKind::UnsupportedServiceType
        );
    }

    #[test]
    fn dme_codes_are_unsupported() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![ClaimLine::pfs(1, "E0110", "12", "01")]))
            .expect("claim should succeed");
        assert_eq!(
            repriced.lines[0].errors[0].kind,
            LineErrorKind::UnsupportedServiceType
        );
    }

    #[test]
    fn duplicate_line_numbers_fail_the_whole_claim() {
        let engine = engine();
        let err = engine
            .reprice_claim(&claim(vec![
                ClaimLine::pfs(1, "99213", "11", "01"),
                ClaimLine::pfs(1, "99214", "11", "01"),
            ]))
            .expect_err("duplicate line numbers");
        assert!(matches!(err, RepricerError::InvalidClaim(_)));
    }

    #[test]
    fn total_equals_sum_of_payable_lines() {
        let engine = engine();
        let repriced = engine
            .reprice_claim(&claim(vec![
                ClaimLine::pfs(1, "99213", "11", "01"),
                ClaimLine::pfs(2, "71046", "11", "01"),
                ClaimLine::pfs(3, "20610", "11", "01"),
            ]))
            .expect("claim should price");

        let expected: f64 = repriced
            .lines
            .iter()
            .filter(|line| line.is_payable())
            .map(|line| line.medicare_allowed)
            .sum();
        assert!((repriced.total_allowed - expected).abs() < 0.01);
    }

    #[test]
    fn batch_repricing_isolates_claim_failures() {
        let engine = engine();
        let good = claim(vec![ClaimLine::pfs(1, "99213", "11", "01")]);
        let mut bad = claim(vec![ClaimLine::pfs(1, "99213", "11", "01")]);
        bad.claim_id = String::new();

        let results = engine.reprice_claims(&[good, bad]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn grouper_feeds_ipps_for_stays_without_a_drg() {
        let engine = engine();
        let mut stay = GrouperInput::new("M16.11", 72, Sex::Female);
        stay.procedures = vec!["0SR9019".to_string()];

        let (grouping, outcome) = engine
            .reprice_inpatient_stay(&stay, "300001", None, None)
            .expect("stay should group and price");

        assert_eq!(grouping.ms_drg, "470");
        assert_eq!(outcome.derivation.ms_drg, "470");
        assert!(outcome.allowed > 0.0);
    }

    #[test]
    fn ungroupable_stay_is_not_priced() {
        let engine = engine();
        let stay = GrouperInput::new("Z99.99", 40, Sex::Unknown);
        let err = engine
            .reprice_inpatient_stay(&stay, "300001", None, None)
            .expect_err("ungroupable");
        assert_eq!(err.kind, LineErrorKind::GrouperUngroupable);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Repricer>();
    }

    #[test]
    fn classify_detects_inpatient_sentinel_code() {
        let mut line = ClaimLine::pfs(1, INPATIENT_CODE, "21", "01");
        line.locality = None;
        let err = classify_line(&line).expect_err("sentinel without drg");
        assert_eq!(err.kind, LineErrorKind::DrgNotFound);
    }

    #[test]
    fn unsupported_family_detection() {
        assert_eq!(unsupported_family("D0120"), Some("dental"));
        assert_eq!(unsupported_family("00170"), Some("anesthesia"));
        assert_eq!(unsupported_family("01999"), Some("anesthesia"));
        assert_eq!(
            unsupported_family("E0110"),
            Some("durable medical equipment")
        );
        assert_eq!(
            unsupported_family("K0001"),
            Some("durable medical equipment")
        );
        assert_eq!(unsupported_family("99213"), None);
        assert_eq!(unsupported_family("02100"), None);
        assert_eq!(unsupported_family("G0008"), None);
    }
}
