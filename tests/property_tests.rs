use emi_engine::calculation::amortization::{
    round_currency, AmortizationCalculator, CalculationRequest,
};
use emi_engine::calculation::schedule::AmortizationSchedule;
use emi_engine::core::catalog::ProviderCatalog;
use emi_engine::core::provider::Provider;
use emi_engine::plans::generator::PlanGenerator;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Amount in whole currency units, 1,000 to 1,000,000.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1_000u64..1_000_000u64).prop_map(Decimal::from)
}

/// Amount with paise, 0.01 to 1,000,000.00.
fn arb_precise_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Annual rate 0.00% to 36.00% in quarter-point steps.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=144i64).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

fn arb_fee() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A valid provider with a random subset of tenures, some of them unpriced.
fn arb_provider() -> impl Strategy<Value = Provider> {
    (
        "[A-Z]{3,6}",
        1_000u64..20_000u64,
        2u64..50u64,
        prop::sample::subsequence(vec![3u32, 6, 9, 12, 18, 24, 36], 1..7),
        prop::collection::vec(prop::option::weighted(0.85, arb_rate()), 7),
        arb_fee(),
        prop::bool::weighted(0.8),
    )
        .prop_map(|(id, min, factor, tenures, rates, fee, enabled)| {
            let min_amount = Decimal::from(min);
            let mut provider = Provider::new(
                id.clone(),
                format!("{} Finance", id),
                min_amount,
                min_amount * Decimal::from(factor),
            )
            .with_processing_fee(fee);
            for (tenure, rate) in tenures.into_iter().zip(rates) {
                provider = match rate {
                    Some(rate) => provider.with_tenure(tenure, rate),
                    None => provider.with_unpriced_tenure(tenure),
                };
            }
            if !enabled {
                provider = provider.disabled();
            }
            provider
        })
}

fn arb_catalog() -> impl Strategy<Value = ProviderCatalog> {
    prop::collection::btree_map("[A-Z]{3,6}", arb_provider(), 0..8).prop_map(|by_id| {
        let providers = by_id.into_iter().map(|(id, mut p)| {
            p.id = id.as_str().into();
            p
        });
        ProviderCatalog::from_providers(providers).expect("generated providers are valid")
    })
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Totals reconstruct from the rounded installment.
    //
    // total_amount == installment * tenure + fee, exactly, and the
    // breakdown sums to the total.
    // ===================================================================
    #[test]
    fn totals_reconstruct_from_installment(
        amount in arb_precise_amount(),
        tenure in 1u32..=120,
        rate in arb_rate(),
        fee in arb_fee(),
    ) {
        let request = CalculationRequest::new(amount, tenure, rate).with_processing_fee(fee);
        let result = AmortizationCalculator::compute_installment(&request).unwrap();
        let tenure = Decimal::from(tenure);

        prop_assert_eq!(
            result.total_amount,
            round_currency(result.monthly_installment * tenure) + fee
        );
        prop_assert_eq!(result.total_interest, result.monthly_installment * tenure - amount);
        prop_assert_eq!(result.breakdown.total(), result.total_amount);
        prop_assert_eq!(result.monthly_installment, round_currency(result.monthly_installment));
    }

    // ===================================================================
    // INVARIANT 2: Zero-rate identity.
    //
    // With no interest the installment is amount / tenure (rounded) and
    // the only interest is the rounding residue.
    // ===================================================================
    #[test]
    fn zero_rate_identity(amount in arb_precise_amount(), tenure in 1u32..=60) {
        let request = CalculationRequest::new(amount, tenure, Decimal::ZERO);
        let result = AmortizationCalculator::compute_installment(&request).unwrap();
        let tenure = Decimal::from(tenure);

        prop_assert_eq!(result.monthly_installment, round_currency(amount / tenure));
        prop_assert!(result.total_interest.abs() <= Decimal::new(5, 3) * tenure);
    }

    // ===================================================================
    // INVARIANT 3: Longer tenure → smaller installment, more interest.
    // ===================================================================
    #[test]
    fn tenure_monotonicity(
        amount in (10_000u64..1_000_000u64).prop_map(Decimal::from),
        rate in (1u32..=36).prop_map(Decimal::from),
        tenure in 1u32..60,
    ) {
        let shorter = AmortizationCalculator::compute_installment(
            &CalculationRequest::new(amount, tenure, rate),
        ).unwrap();
        let longer = AmortizationCalculator::compute_installment(
            &CalculationRequest::new(amount, tenure + 1, rate),
        ).unwrap();

        prop_assert!(longer.monthly_installment < shorter.monthly_installment);
        prop_assert!(longer.total_interest > shorter.total_interest);
    }

    // ===================================================================
    // INVARIANT 4: Out-of-bounds amounts produce no plans.
    // ===================================================================
    #[test]
    fn bounds_filtering(provider in arb_provider(), offset in 1u64..10_000u64) {
        let below = provider.min_amount - Decimal::from(offset).min(provider.min_amount - Decimal::ONE);
        let above = provider.max_amount + Decimal::from(offset);

        prop_assert!(PlanGenerator::generate_plans(below, &provider).unwrap().is_empty());
        prop_assert!(PlanGenerator::generate_plans(above, &provider).unwrap().is_empty());
    }

    // ===================================================================
    // INVARIANT 5: In-bounds amounts get one plan per rated tenure, and
    // no plan ever carries a zero installment.
    // ===================================================================
    #[test]
    fn one_plan_per_rated_tenure(
        provider in arb_provider(),
        small in arb_precise_amount(),
    ) {
        let rated = provider
            .supported_tenures
            .iter()
            .filter(|t| provider.rate_for(**t).is_some())
            .count();

        let amount = provider.min_amount;
        let plans = PlanGenerator::generate_plans(amount, &provider).unwrap();
        prop_assert_eq!(plans.len(), rated);
        for plan in &plans {
            prop_assert!(plan.is_consistent());
            prop_assert_eq!(plan.processing_fee, provider.processing_fee);
        }

        // With no lower bound, sub-unit amounts may round some
        // installments to zero; those tenures are dropped, never priced.
        let mut open = provider.clone();
        open.min_amount = Decimal::ZERO;
        let small = small.min(open.max_amount);
        let plans = PlanGenerator::generate_plans(small, &open).unwrap();
        prop_assert!(plans.len() <= rated);
        for plan in &plans {
            prop_assert!(plan.monthly_installment > Decimal::ZERO);
            prop_assert!(plan.is_consistent());
        }
    }

    // ===================================================================
    // INVARIANT 6: Cross-provider output is ranked and skips disabled
    // providers.
    // ===================================================================
    #[test]
    fn cross_provider_ranking(catalog in arb_catalog(), amount in arb_amount()) {
        let plans = PlanGenerator::generate_plans_across_providers(amount, &catalog).unwrap();

        for pair in plans.windows(2) {
            prop_assert!(pair[0].monthly_installment <= pair[1].monthly_installment);
            prop_assert!(pair[0].rank_cmp(&pair[1]).is_le());
        }
        for plan in &plans {
            prop_assert!(catalog.get(&plan.provider_id).unwrap().enabled);
        }

        let expected: usize = catalog
            .enabled()
            .map(|p| PlanGenerator::generate_plans(amount, p).unwrap().len())
            .sum();
        prop_assert_eq!(plans.len(), expected);
    }

    // ===================================================================
    // INVARIANT 7: The best plan is the minimum, whatever the input order.
    // ===================================================================
    #[test]
    fn best_plan_is_minimum(catalog in arb_catalog(), amount in arb_amount(), seed in any::<u64>()) {
        let mut plans = PlanGenerator::generate_plans_across_providers(amount, &catalog).unwrap();
        let expected = plans.first().cloned();
        if !plans.is_empty() {
            let len = plans.len();
            plans.rotate_left((seed % len as u64) as usize);
        }
        prop_assert_eq!(PlanGenerator::select_best_plan(&plans).cloned(), expected);
    }

    // ===================================================================
    // INVARIANT 8: extra_cost == plan total - amount, never negative for
    // positive rates.
    // ===================================================================
    #[test]
    fn cost_comparison_consistency(catalog in arb_catalog(), amount in arb_amount()) {
        let plans = PlanGenerator::generate_plans_across_providers(amount, &catalog).unwrap();
        for plan in &plans {
            let c = PlanGenerator::compare_cost(amount, plan).unwrap();
            prop_assert_eq!(c.extra_cost, plan.total_amount - amount);
            prop_assert_eq!(c.savings_percentage, c.extra_cost / amount * Decimal::from(100));
            if plan.interest_rate > Decimal::ZERO {
                prop_assert!(c.extra_cost >= Decimal::ZERO);
            }
        }
    }

    // ===================================================================
    // INVARIANT 9: Schedule rows repay exactly the principal.
    // ===================================================================
    #[test]
    fn schedule_repays_principal(
        amount in arb_precise_amount(),
        tenure in 1u32..=60,
        rate in arb_rate(),
    ) {
        let schedule =
            AmortizationSchedule::generate(&CalculationRequest::new(amount, tenure, rate)).unwrap();
        prop_assert_eq!(schedule.rows.len(), tenure as usize);
        prop_assert_eq!(schedule.total_principal(), amount);
        prop_assert_eq!(schedule.total_interest(), schedule.summary.total_interest);
    }

    // ===================================================================
    // INVARIANT 10: Eligibility is deterministic and rejects with a
    // reason exactly when ineligible.
    // ===================================================================
    #[test]
    fn eligibility_reason_iff_ineligible(
        amount in (1u64..1_000_000u64).prop_map(Decimal::from),
        score in prop::option::of(300u32..900),
        income in prop::option::of((1u64..500_000u64).prop_map(Decimal::from)),
    ) {
        let v1 = PlanGenerator::check_eligibility(amount, score, income);
        let v2 = PlanGenerator::check_eligibility(amount, score, income);
        prop_assert_eq!(v1, v2);
        prop_assert_eq!(v1.eligible, v1.reason.is_none());
    }
}
