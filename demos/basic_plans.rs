//! Basic plan generation example.
//!
//! Prices a purchase against the demo catalog, picks the cheapest plan per
//! month and shows what financing costs over paying in full.

use emi_engine::calculation::amortization::CalculationRequest;
use emi_engine::calculation::schedule::AmortizationSchedule;
use emi_engine::plans::generator::PlanGenerator;
use emi_engine::simulation::catalog_generator::demo_catalog;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  emi-engine: Basic Plan Example          ║");
    println!("╚══════════════════════════════════════════╝\n");

    let amount = dec!(25000);
    let catalog = demo_catalog()?;

    // --- Step 1: Eligibility ---
    println!("━━━ Step 1: Eligibility ━━━\n");
    let verdict = PlanGenerator::check_eligibility(amount, Some(760), Some(dec!(55000)));
    println!("Amount {} → {}\n", amount, verdict);

    // --- Step 2: Ranked plans across providers ---
    println!("━━━ Step 2: Plans across {} enabled providers ━━━\n", catalog.enabled().count());
    let plans = PlanGenerator::generate_plans_across_providers(amount, &catalog)?;
    for (i, plan) in plans.iter().enumerate() {
        println!("{:>3}. {}", i + 1, plan);
    }
    println!();

    // --- Step 3: Best plan and its cost ---
    println!("━━━ Step 3: Cheapest per month ━━━\n");
    let Some(best) = PlanGenerator::select_best_plan(&plans) else {
        println!("No provider finances this amount.");
        return Ok(());
    };
    println!("{}\n", best);
    println!("{}", PlanGenerator::compare_cost(amount, best)?);

    // --- Step 4: Repayment schedule ---
    let request = CalculationRequest::new(amount, best.tenure, best.interest_rate)
        .with_processing_fee(best.processing_fee);
    println!("{}", AmortizationSchedule::generate(&request)?);

    Ok(())
}
