use crate::calculation::amortization::{
    AmortizationCalculator, CalculationError, CalculationRequest,
};
use crate::core::catalog::{CatalogError, ProviderCatalog};
use crate::core::provider::{Provider, ProviderId};
use crate::plans::comparison::CostComparison;
use crate::plans::eligibility::{EligibilityPolicy, EligibilityVerdict};
use crate::plans::plan::{rank_plans, Plan};
use log::{debug, trace};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from operations that both look up providers and price plans.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// The plan generation engine.
///
/// Stateless: every operation depends only on its arguments. The catalog is
/// supplied by the caller per request and only read.
///
/// An empty plan list is a normal outcome, returned when the amount falls
/// outside every provider's bounds or no tenure carries a rate.
pub struct PlanGenerator;

impl PlanGenerator {
    /// Price every rated tenure of one provider for `amount`.
    ///
    /// Returns an empty list when `amount` is outside the provider's
    /// inclusive bounds. Tenures without a rate entry are skipped, as are
    /// tenures whose installment rounds to zero. The result
    /// is in ranking order (see [`Plan::rank_cmp`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use emi_engine::core::provider::Provider;
    /// use emi_engine::plans::generator::PlanGenerator;
    /// use rust_decimal_macros::dec;
    ///
    /// let provider = Provider::new("HDFC-CC", "HDFC Bank", dec!(1000), dec!(50000))
    ///     .with_tenure(3, dec!(10))
    ///     .with_tenure(6, dec!(12))
    ///     .with_tenure(12, dec!(14))
    ///     .with_processing_fee(dec!(99));
    ///
    /// let plans = PlanGenerator::generate_plans(dec!(10000), &provider).unwrap();
    /// assert_eq!(plans.len(), 3);
    /// assert_eq!(plans[0].tenure, 12);
    /// assert_eq!(plans[0].monthly_installment, dec!(897.87));
    /// ```
    pub fn generate_plans(
        amount: Decimal,
        provider: &Provider,
    ) -> Result<Vec<Plan>, CalculationError> {
        if !provider.accepts_amount(amount) {
            debug!(
                "{}: amount {} outside [{}, {}]",
                provider.id, amount, provider.min_amount, provider.max_amount
            );
            return Ok(Vec::new());
        }

        let mut plans = Vec::with_capacity(provider.supported_tenures.len());
        for &tenure in &provider.supported_tenures {
            let Some(rate) = provider.rate_for(tenure) else {
                debug!("{}: no rate for {} month tenure, skipping", provider.id, tenure);
                continue;
            };
            let request = CalculationRequest::new(amount, tenure, rate)
                .with_processing_fee(provider.processing_fee);
            let result = AmortizationCalculator::compute_installment(&request)?;
            if result.monthly_installment <= Decimal::ZERO {
                debug!(
                    "{}: {} month installment on {} rounds to {}, skipping",
                    provider.id, tenure, amount, result.monthly_installment
                );
                continue;
            }
            trace!(
                "{}: {} months @ {}% -> {}",
                provider.id,
                tenure,
                rate,
                result.monthly_installment
            );
            plans.push(Plan::from_calculation(provider, tenure, rate, result));
        }

        rank_plans(&mut plans);
        Ok(plans)
    }

    /// Price `amount` with every enabled provider and rank the combined list.
    pub fn generate_plans_across_providers(
        amount: Decimal,
        catalog: &ProviderCatalog,
    ) -> Result<Vec<Plan>, CalculationError> {
        let mut plans = Vec::new();
        for provider in catalog.enabled() {
            plans.extend(Self::generate_plans(amount, provider)?);
        }
        rank_plans(&mut plans);
        debug!(
            "{} plans for amount {} across {} enabled providers",
            plans.len(),
            amount,
            catalog.enabled().count()
        );
        Ok(plans)
    }

    /// Plans for a request that may name a provider.
    ///
    /// With `provider_id`, only that provider is priced; an unknown id is an
    /// error and a disabled provider yields no plans. Without it, every
    /// enabled provider is priced.
    pub fn plans_for(
        amount: Decimal,
        catalog: &ProviderCatalog,
        provider_id: Option<&ProviderId>,
    ) -> Result<Vec<Plan>, PlanError> {
        match provider_id {
            Some(id) => {
                let provider = catalog.require(id)?;
                if !provider.enabled {
                    debug!("{}: provider disabled, no plans", id);
                    return Ok(Vec::new());
                }
                Ok(Self::generate_plans(amount, provider)?)
            }
            None => Ok(Self::generate_plans_across_providers(amount, catalog)?),
        }
    }

    /// The cheapest plan of each enabled provider, ranked.
    pub fn best_plan_per_provider(
        amount: Decimal,
        catalog: &ProviderCatalog,
    ) -> Result<Vec<Plan>, CalculationError> {
        let mut best = Vec::new();
        for provider in catalog.enabled() {
            let plans = Self::generate_plans(amount, provider)?;
            if let Some(plan) = Self::select_best_plan(&plans) {
                best.push(plan.clone());
            }
        }
        rank_plans(&mut best);
        Ok(best)
    }

    /// Best plans for a request that may name a provider.
    ///
    /// With `provider_id`, the cheapest plan of that provider (if any);
    /// otherwise the cheapest plan of each enabled provider.
    pub fn best_plans_for(
        amount: Decimal,
        catalog: &ProviderCatalog,
        provider_id: Option<&ProviderId>,
    ) -> Result<Vec<Plan>, PlanError> {
        match provider_id {
            Some(_) => {
                let plans = Self::plans_for(amount, catalog, provider_id)?;
                Ok(Self::select_best_plan(&plans).cloned().into_iter().collect())
            }
            None => Ok(Self::best_plan_per_provider(amount, catalog)?),
        }
    }

    /// The plan with the lowest monthly installment, or `None` for no plans.
    ///
    /// Does not assume the input is sorted; ties resolve by ranking order.
    pub fn select_best_plan(plans: &[Plan]) -> Option<&Plan> {
        plans.iter().min_by(|a, b| a.rank_cmp(b))
    }

    /// Evaluate the retail eligibility rules with the default thresholds.
    pub fn check_eligibility(
        amount: Decimal,
        credit_score: Option<u32>,
        monthly_income: Option<Decimal>,
    ) -> EligibilityVerdict {
        EligibilityPolicy::default().check(amount, credit_score, monthly_income)
    }

    /// Compare paying `amount` up front with financing it through `plan`.
    pub fn compare_cost(amount: Decimal, plan: &Plan) -> Result<CostComparison, CalculationError> {
        CostComparison::between(amount, plan)
    }
}
