use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a lending provider.
///
/// A provider can be a bank, an NBFC, a card network's installment program
/// or any lender that offers equated monthly installment plans.
///
/// # Examples
///
/// ```
/// use emi_engine::core::provider::ProviderId;
///
/// let hdfc = ProviderId::new("HDFC-CC");
/// let bajaj = ProviderId::new("BAJAJ-FINSERV");
/// assert_ne!(hdfc, bajaj);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this provider ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Reasons a provider record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider id must not be empty")]
    EmptyId,
    #[error("provider {id}: min amount {min} exceeds max amount {max}")]
    InvertedBounds {
        id: ProviderId,
        min: Decimal,
        max: Decimal,
    },
    #[error("provider {id}: amount bounds must not be negative")]
    NegativeBounds { id: ProviderId },
    #[error("provider {id}: processing fee must not be negative, got {fee}")]
    NegativeFee { id: ProviderId, fee: Decimal },
    #[error("provider {id}: tenure must be at least one month")]
    ZeroTenure { id: ProviderId },
    #[error("provider {id}: tenure {tenure} listed more than once")]
    DuplicateTenure { id: ProviderId, tenure: u32 },
    #[error("provider {id}: interest rate for tenure {tenure} must not be negative, got {rate}")]
    NegativeRate {
        id: ProviderId,
        tenure: u32,
        rate: Decimal,
    },
}

fn default_enabled() -> bool {
    true
}

/// A lender's EMI offering.
///
/// Providers are static catalog entries: the plan generator only reads them.
/// Amount bounds are inclusive. Every supported tenure needs a matching entry
/// in `interest_rates`; tenures without one are skipped during generation.
///
/// # Examples
///
/// ```
/// use emi_engine::core::provider::Provider;
/// use rust_decimal_macros::dec;
///
/// let provider = Provider::new("HDFC-CC", "HDFC Bank Credit Card", dec!(1000), dec!(50000))
///     .with_tenure(3, dec!(10))
///     .with_tenure(6, dec!(12))
///     .with_processing_fee(dec!(99));
///
/// assert!(provider.accepts_amount(dec!(10000)));
/// assert_eq!(provider.rate_for(6), Some(dec!(12)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    /// Smallest amount this provider finances (inclusive).
    pub min_amount: Decimal,
    /// Largest amount this provider finances (inclusive).
    pub max_amount: Decimal,
    /// Offered installment counts, in months.
    pub supported_tenures: Vec<u32>,
    /// Annual nominal rate in percent, keyed by tenure.
    #[serde(default)]
    pub interest_rates: BTreeMap<u32, Decimal>,
    /// One-time fee charged regardless of tenure.
    #[serde(default)]
    pub processing_fee: Decimal,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Provider {
    /// Create an enabled provider with no tenures and no processing fee.
    pub fn new(
        id: impl Into<ProviderId>,
        name: impl Into<String>,
        min_amount: Decimal,
        max_amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_amount,
            max_amount,
            supported_tenures: Vec::new(),
            interest_rates: BTreeMap::new(),
            processing_fee: Decimal::ZERO,
            enabled: true,
        }
    }

    /// Offer `tenure` months at `annual_rate` percent.
    pub fn with_tenure(mut self, tenure: u32, annual_rate: Decimal) -> Self {
        self.supported_tenures.push(tenure);
        self.interest_rates.insert(tenure, annual_rate);
        self
    }

    /// Offer `tenure` months without a rate entry.
    ///
    /// Such tenures are listed but never produce a plan.
    pub fn with_unpriced_tenure(mut self, tenure: u32) -> Self {
        self.supported_tenures.push(tenure);
        self
    }

    pub fn with_processing_fee(mut self, fee: Decimal) -> Self {
        self.processing_fee = fee;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether `amount` falls within the inclusive bounds.
    pub fn accepts_amount(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    pub fn rate_for(&self, tenure: u32) -> Option<Decimal> {
        self.interest_rates.get(&tenure).copied()
    }

    /// Check the record for internal consistency.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ProviderError::EmptyId);
        }
        if self.min_amount < Decimal::ZERO || self.max_amount < Decimal::ZERO {
            return Err(ProviderError::NegativeBounds {
                id: self.id.clone(),
            });
        }
        if self.min_amount > self.max_amount {
            return Err(ProviderError::InvertedBounds {
                id: self.id.clone(),
                min: self.min_amount,
                max: self.max_amount,
            });
        }
        if self.processing_fee < Decimal::ZERO {
            return Err(ProviderError::NegativeFee {
                id: self.id.clone(),
                fee: self.processing_fee,
            });
        }

        let mut seen = BTreeSet::new();
        for &tenure in &self.supported_tenures {
            if tenure == 0 {
                return Err(ProviderError::ZeroTenure {
                    id: self.id.clone(),
                });
            }
            if !seen.insert(tenure) {
                return Err(ProviderError::DuplicateTenure {
                    id: self.id.clone(),
                    tenure,
                });
            }
        }

        for (&tenure, &rate) in &self.interest_rates {
            if rate < Decimal::ZERO {
                return Err(ProviderError::NegativeRate {
                    id: self.id.clone(),
                    tenure,
                    rate,
                });
            }
        }
        Ok(())
    }
}
