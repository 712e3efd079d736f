//! Catalog fixtures for demos, benchmarks and load testing.
//!
//! The demo catalog is deterministic. Random catalogs draw bounds, tenures
//! and rates from [`CatalogConfig`] and are always valid.

use crate::core::catalog::{CatalogError, ProviderCatalog};
use crate::core::provider::Provider;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configuration for generating a random provider catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Number of providers in the catalog.
    pub provider_count: usize,
    /// Tenures a provider may offer; each provider takes a random subset.
    pub tenure_pool: Vec<u32>,
    /// Annual rate range in whole percent, inclusive.
    pub min_rate: u32,
    pub max_rate: u32,
    /// Chance that an offered tenure is promotional (0%).
    pub zero_rate_probability: f64,
    /// Chance that a provider is disabled.
    pub disabled_probability: f64,
    /// Largest processing fee, in whole currency units.
    pub max_processing_fee: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            provider_count: 10,
            tenure_pool: vec![3, 6, 9, 12, 18, 24, 36],
            min_rate: 9,
            max_rate: 24,
            zero_rate_probability: 0.1,
            disabled_probability: 0.1,
            max_processing_fee: 499,
        }
    }
}

/// Generate a random provider catalog.
pub fn generate_random_catalog(config: &CatalogConfig) -> Result<ProviderCatalog, CatalogError> {
    let mut rng = rand::thread_rng();
    let mut catalog = ProviderCatalog::new();

    for i in 0..config.provider_count {
        let min_amount = Decimal::from(rng.gen_range(1..=10u32) * 500);
        let max_amount = min_amount * Decimal::from(rng.gen_range(10..=200u32));

        let mut provider = Provider::new(
            format!("LENDER-{:03}", i),
            format!("Lender {}", i),
            min_amount,
            max_amount,
        )
        .with_processing_fee(Decimal::from(rng.gen_range(0..=config.max_processing_fee)));

        let offered = rng.gen_range(1..=config.tenure_pool.len().max(1));
        let mut tenures: Vec<u32> = config
            .tenure_pool
            .choose_multiple(&mut rng, offered)
            .copied()
            .collect();
        tenures.sort_unstable();

        for tenure in tenures {
            let rate = if rng.gen_bool(config.zero_rate_probability) {
                Decimal::ZERO
            } else {
                Decimal::from(rng.gen_range(config.min_rate..=config.max_rate))
            };
            provider = provider.with_tenure(tenure, rate);
        }

        if rng.gen_bool(config.disabled_probability) {
            provider = provider.disabled();
        }
        catalog.insert(provider)?;
    }

    Ok(catalog)
}

/// A small fixed catalog of card and consumer-finance lenders.
pub fn demo_catalog() -> Result<ProviderCatalog, CatalogError> {
    ProviderCatalog::from_providers(vec![
        Provider::new("HDFC-CC", "HDFC Bank Credit Card", dec!(1000), dec!(50000))
            .with_tenure(3, dec!(10))
            .with_tenure(6, dec!(12))
            .with_tenure(12, dec!(14))
            .with_processing_fee(dec!(99)),
        Provider::new("ICICI-CC", "ICICI Bank Credit Card", dec!(2500), dec!(100000))
            .with_tenure(6, dec!(13))
            .with_tenure(9, dec!(13.5))
            .with_tenure(12, dec!(15))
            .with_tenure(24, dec!(16))
            .with_processing_fee(dec!(199)),
        Provider::new("BAJAJ-FIN", "Bajaj Finserv EMI Card", dec!(5000), dec!(200000))
            .with_tenure(3, Decimal::ZERO)
            .with_tenure(6, Decimal::ZERO)
            .with_tenure(12, dec!(13))
            .with_unpriced_tenure(18)
            .with_processing_fee(dec!(499)),
        Provider::new("SBI-CC", "SBI Card", dec!(2000), dec!(75000))
            .with_tenure(3, dec!(14))
            .with_tenure(6, dec!(14))
            .with_processing_fee(dec!(149))
            .disabled(),
    ])
}
