//! emi-engine CLI
//!
//! Price EMI plans from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Single installment computation
//! emi-engine calculate --amount 10000 --tenure 12 --rate 12 --fee 100
//!
//! # Ranked plans across every enabled provider in a catalog
//! emi-engine plans --catalog providers.json --amount 25000
//!
//! # Eligibility gate
//! emi-engine eligibility --amount 10000 --credit-score 750 --income 15000
//! ```
//!
//! Set `RUST_LOG=debug` to trace provider filtering decisions.

use chrono::NaiveDate;
use emi_engine::calculation::amortization::{AmortizationCalculator, CalculationRequest};
use emi_engine::calculation::schedule::AmortizationSchedule;
use emi_engine::core::catalog::ProviderCatalog;
use emi_engine::core::provider::ProviderId;
use emi_engine::plans::generator::PlanGenerator;
use emi_engine::plans::plan::Plan;
use emi_engine::simulation::catalog_generator::{demo_catalog, generate_random_catalog, CatalogConfig};
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::process;
use std::str::FromStr;

fn print_usage() {
    eprintln!(
        r#"emi-engine — EMI plan computation, ranking and eligibility

USAGE:
    emi-engine <COMMAND> [OPTIONS]

COMMANDS:
    calculate     Compute the installment for one amount, tenure and rate
    plans         Generate ranked plans from a provider catalog
    eligibility   Evaluate the retail eligibility rules
    compare       Compare a plan's total cost with paying in full
    generate      Generate a random provider catalog (for testing)
    demo-catalog  Print the built-in demo catalog
    help          Show this message

OPTIONS (calculate):
    --amount <A>        Principal
    --tenure <N>        Number of monthly installments
    --rate <R>          Annual interest rate in percent
    --fee <F>           One-time processing fee (default: 0)
    --schedule          Print the month-by-month schedule
    --start <DATE>      First due date (YYYY-MM-DD), with --schedule

OPTIONS (plans, compare):
    --catalog <FILE>    JSON provider catalog (default: demo catalog)
    --amount <A>        Purchase amount
    --provider <ID>     Restrict to one provider (required for compare)
    --tenure <N>        Tenure to compare (compare only)
    --best              Only the cheapest plan per provider, or of --provider (plans only)

OPTIONS (eligibility):
    --amount <A>        Purchase amount
    --credit-score <S>  Credit score, if known
    --income <I>        Monthly income, if known

OPTIONS (generate):
    --providers <N>     Number of providers (default: 10)
    --output <FILE>     Write to file instead of stdout

COMMON:
    --format <FORMAT>   Output format: text (default) or json

EXAMPLES:
    emi-engine calculate --amount 10000 --tenure 12 --rate 12 --fee 100
    emi-engine calculate --amount 10000 --tenure 6 --rate 14 --schedule --start 2025-01-05
    emi-engine plans --catalog providers.json --amount 25000 --format json
    emi-engine compare --amount 10000 --provider HDFC-CC --tenure 12
    emi-engine generate --providers 50 --output providers.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Parsed `--key value` options and bare `--flag`s.
struct Options {
    values: HashMap<String, String>,
}

impl Options {
    fn parse(args: &[String], flags: &[&str]) -> Self {
        let mut values = HashMap::new();
        let mut i = 0;
        while i < args.len() {
            let key = args[i]
                .strip_prefix("--")
                .unwrap_or_else(|| fail(format!("unexpected argument '{}'", args[i])));
            if flags.contains(&key) {
                values.insert(key.to_string(), String::new());
            } else {
                i += 1;
                let value = args
                    .get(i)
                    .unwrap_or_else(|| fail(format!("--{} requires a value", key)));
                values.insert(key.to_string(), value.clone());
            }
            i += 1;
        }
        Self { values }
    }

    fn flag(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get<T: FromStr>(&self, key: &str) -> Option<T>
    where
        T::Err: std::fmt::Display,
    {
        self.values.get(key).map(|raw| {
            raw.parse()
                .unwrap_or_else(|e| fail(format!("invalid --{} '{}': {}", key, raw, e)))
        })
    }

    fn require<T: FromStr>(&self, key: &str) -> T
    where
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .unwrap_or_else(|| fail(format!("--{} is required", key)))
    }

    fn json(&self) -> bool {
        match self.values.get("format").map(String::as_str) {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => fail(format!("--format must be 'text' or 'json', got '{}'", other)),
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fail(format!("failed to serialize output: {}", e)));
    println!("{}", json);
}

fn load_catalog(opts: &Options) -> ProviderCatalog {
    match opts.get::<String>("catalog") {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));
            let catalog = ProviderCatalog::from_json(&content).unwrap_or_else(|e| {
                eprintln!("Expected format:");
                eprintln!(
                    r#"{{
  "providers": [
    {{ "id": "HDFC-CC", "name": "HDFC Bank", "min_amount": "1000", "max_amount": "50000",
       "supported_tenures": [3, 6, 12], "interest_rates": {{ "3": "10", "6": "12", "12": "14" }},
       "processing_fee": "99" }}
  ]
}}"#
                );
                fail(e)
            });
            info!("loaded {} providers from {}", catalog.len(), path);
            catalog
        }
        None => demo_catalog().unwrap_or_else(|e| fail(e)),
    }
}

fn cmd_calculate(args: &[String]) {
    let opts = Options::parse(args, &["schedule"]);
    let request = CalculationRequest::new(
        opts.require::<Decimal>("amount"),
        opts.require::<u32>("tenure"),
        opts.require::<Decimal>("rate"),
    )
    .with_processing_fee(opts.get::<Decimal>("fee").unwrap_or(Decimal::ZERO));

    if opts.flag("schedule") {
        let mut schedule = AmortizationSchedule::generate(&request).unwrap_or_else(|e| fail(e));
        if let Some(start) = opts.get::<NaiveDate>("start") {
            schedule = schedule.with_first_due_date(start);
        }
        if opts.json() {
            print_json(&schedule);
        } else {
            print!("{}", schedule);
        }
        return;
    }

    let result = AmortizationCalculator::compute_installment(&request).unwrap_or_else(|e| fail(e));
    if opts.json() {
        print_json(&result);
    } else {
        println!("=== EMI Calculation ===");
        println!("Monthly installment: {}", result.monthly_installment);
        println!("Total interest:      {}", result.total_interest);
        println!("Processing fee:      {}", result.processing_fee);
        println!("Total payable:       {}", result.total_amount);
    }
}

fn print_plans(plans: &[Plan], json: bool) {
    if json {
        print_json(&plans);
    } else if plans.is_empty() {
        println!("No plans available for this amount.");
    } else {
        for (i, plan) in plans.iter().enumerate() {
            println!("{:>3}. {}", i + 1, plan);
        }
    }
}

fn cmd_plans(args: &[String]) {
    let opts = Options::parse(args, &["best"]);
    let catalog = load_catalog(&opts);
    let amount = opts.require::<Decimal>("amount");
    let provider = opts.get::<String>("provider").map(ProviderId::new);

    let plans = if opts.flag("best") {
        PlanGenerator::best_plans_for(amount, &catalog, provider.as_ref())
            .unwrap_or_else(|e| fail(e))
    } else {
        PlanGenerator::plans_for(amount, &catalog, provider.as_ref()).unwrap_or_else(|e| fail(e))
    };
    print_plans(&plans, opts.json());
}

#[derive(Serialize)]
struct EligibilityOutput {
    eligible: bool,
    reason: Option<String>,
}

fn cmd_eligibility(args: &[String]) {
    let opts = Options::parse(args, &[]);
    let verdict = PlanGenerator::check_eligibility(
        opts.require::<Decimal>("amount"),
        opts.get::<u32>("credit-score"),
        opts.get::<Decimal>("income"),
    );
    if opts.json() {
        print_json(&EligibilityOutput {
            eligible: verdict.eligible,
            reason: verdict.reason.map(|r| r.to_string()),
        });
    } else {
        println!("{}", verdict);
    }
}

fn cmd_compare(args: &[String]) {
    let opts = Options::parse(args, &[]);
    let catalog = load_catalog(&opts);
    let amount = opts.require::<Decimal>("amount");
    let provider = ProviderId::new(opts.require::<String>("provider"));
    let tenure = opts.require::<u32>("tenure");

    let plans = PlanGenerator::plans_for(amount, &catalog, Some(&provider))
        .unwrap_or_else(|e| fail(e));
    let plan = plans
        .iter()
        .find(|p| p.tenure == tenure)
        .unwrap_or_else(|| {
            fail(format!(
                "{} offers no {} month plan for amount {}",
                provider, tenure, amount
            ))
        });
    let comparison = PlanGenerator::compare_cost(amount, plan).unwrap_or_else(|e| fail(e));

    if opts.json() {
        print_json(&comparison);
    } else {
        println!("{}", plan);
        print!("{}", comparison);
    }
}

fn cmd_generate(args: &[String]) {
    let opts = Options::parse(args, &[]);
    let config = CatalogConfig {
        provider_count: opts.get::<usize>("providers").unwrap_or(10),
        ..Default::default()
    };
    let catalog = generate_random_catalog(&config).unwrap_or_else(|e| fail(e));
    let json = catalog.to_json_pretty().unwrap_or_else(|e| fail(e));

    if let Some(path) = opts.get::<String>("output") {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!("Generated {} providers → {}", catalog.len(), path);
    } else {
        println!("{}", json);
    }
}

fn cmd_demo_catalog() {
    let catalog = demo_catalog().unwrap_or_else(|e| fail(e));
    println!("{}", catalog.to_json_pretty().unwrap_or_else(|e| fail(e)));
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "calculate" => cmd_calculate(rest),
        "plans" => cmd_plans(rest),
        "eligibility" => cmd_eligibility(rest),
        "compare" => cmd_compare(rest),
        "generate" => cmd_generate(rest),
        "demo-catalog" => cmd_demo_catalog(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
