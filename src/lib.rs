//! # emi-engine
//!
//! Deterministic EMI (equated monthly installment) plan computation.
//!
//! Given a purchase amount and a catalog of lending providers, this engine
//! computes exact monthly installments, ranks candidate plans across
//! providers, applies retail eligibility rules and compares the cost of
//! financing against paying in full.
//!
//! ## Architecture
//!
//! - **core** — Provider identity, provider records and catalogs
//! - **calculation** — Reducing-balance amortization and repayment schedules
//! - **plans** — Plan generation and ranking, eligibility, cost comparison
//! - **simulation** — Demo and randomized catalogs
//!
//! Every operation is a pure function of its inputs. There is no global
//! state; catalogs are passed in by the caller.

pub mod calculation;
pub mod core;
pub mod plans;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::calculation::amortization::{
        AmortizationCalculator, CalculationError, CalculationRequest, CalculationResult,
    };
    pub use crate::calculation::schedule::AmortizationSchedule;
    pub use crate::core::catalog::{CatalogError, ProviderCatalog};
    pub use crate::core::provider::{Provider, ProviderId};
    pub use crate::plans::comparison::CostComparison;
    pub use crate::plans::eligibility::{EligibilityPolicy, EligibilityVerdict, RejectionReason};
    pub use crate::plans::generator::{PlanError, PlanGenerator};
    pub use crate::plans::plan::Plan;
}
