//! # Repricer Core
//!
//! Medicare claims repricing engine for plan year 2025 / FY 2026.
//!
//! Transforms healthcare claims into Medicare-equivalent allowed amounts
//! using published fee schedules and payment methodologies:
//!
//! - **PFS** — RBRVS pricing with geographic adjustment, facility selection,
//!   modifier effects and Multiple Procedure Payment Reduction ([`pfs`]).
//! - **IPPS** — MS-DRG weighted inpatient payment with wage-index, teaching
//!   (IME), disproportionate-share (DSH) and outlier components ([`ipps`]).
//! - **MS-DRG grouper** — rule-driven classification of an inpatient stay
//!   into a severity-adjusted DRG ([`grouper`]).
//! - **Orchestrator** — per-claim pipeline dispatching lines to the right
//!   calculator and applying cross-line MPPR ranking ([`repricer`]).
//!
//! **No transport concerns**: CLIs, services and raw CMS file parsing live
//! outside this crate. Reference data arrives as normalized JSON via the
//! `fee-schedule` crate.
//!
//! The engine performs no I/O after construction, never mutates its loaded
//! tables, and prices claims without shared mutable state, so one instance
//! may serve many threads concurrently.
//!
//! ```rust
//! use repricer_core::{Claim, ClaimLine, Repricer};
//!
//! let engine = Repricer::with_schedule(fee_schedule::sample::sample_fee_schedule());
//! let claim = Claim {
//!     claim_id: "CLM-1001".to_string(),
//!     patient_id: None,
//!     diagnosis_codes: vec![],
//!     lines: vec![ClaimLine::pfs(1, "99213", "11", "01")],
//! };
//! let repriced = engine.reprice_claim(&claim).expect("claim prices");
//! assert!(repriced.total_allowed > 0.0);
//! ```

pub mod claim;
pub mod config;
pub mod error;
pub mod grouper;
pub mod ipps;
pub mod locality;
pub mod pfs;
pub mod repricer;

pub use claim::{Claim, ClaimLine, RepricedClaim, RepricedLine, ServiceType, INPATIENT_CODE};
pub use config::RepricerConfig;
pub use error::{
    LineError, LineErrorKind, LineWarning, LineWarningKind, RepricerError, RepricerResult,
};
pub use grouper::{DrgType, GrouperInput, GrouperOutput, MsDrgGrouper, Sex, UNGROUPABLE_DRG};
pub use ipps::{IppsCalculator, IppsDerivation, IppsOutcome};
pub use locality::{LocalityResolver, ZipResolution};
pub use pfs::{PfsCalculator, PfsDerivation, PfsOutcome};
pub use repricer::Repricer;

// Re-export the data store for embedders constructing schedules directly.
pub use fee_schedule;

/// Round a dollar amount to cents, half away from zero (half-up for the
/// non-negative amounts produced here). Applied only to final per-line
/// amounts and claim totals; intermediate arithmetic stays unrounded.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod testdata;
