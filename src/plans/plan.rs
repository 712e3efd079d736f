use crate::calculation::amortization::CalculationResult;
use crate::core::provider::{Provider, ProviderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A priced installment offer: one provider, one tenure.
///
/// Plans are value objects. They are built fresh for every request and never
/// mutated, since the amount or the catalog may change between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub tenure: u32,
    /// Annual nominal rate in percent.
    pub interest_rate: Decimal,
    pub monthly_installment: Decimal,
    /// Installments plus processing fee.
    pub total_amount: Decimal,
    pub total_interest: Decimal,
    pub processing_fee: Decimal,
}

impl Plan {
    pub fn from_calculation(
        provider: &Provider,
        tenure: u32,
        interest_rate: Decimal,
        result: CalculationResult,
    ) -> Self {
        Self {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            tenure,
            interest_rate,
            monthly_installment: result.monthly_installment,
            total_amount: result.total_amount,
            total_interest: result.total_interest,
            processing_fee: result.processing_fee,
        }
    }

    /// Ranking order: cheaper installment first, then shorter tenure, then
    /// provider id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.monthly_installment
            .cmp(&other.monthly_installment)
            .then(self.tenure.cmp(&other.tenure))
            .then_with(|| self.provider_id.cmp(&other.provider_id))
    }

    /// Whether `total_amount == monthly_installment * tenure + processing_fee`.
    pub fn is_consistent(&self) -> bool {
        self.tenure > 0
            && self.monthly_installment > Decimal::ZERO
            && self.total_amount
                == self.monthly_installment * Decimal::from(self.tenure) + self.processing_fee
    }
}

/// Sort plans into ranking order.
pub fn rank_plans(plans: &mut [Plan]) {
    plans.sort_by(Plan::rank_cmp);
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:>3} mo @ {:>5}%  EMI {:>12}  total {:>12}  interest {:>10}  fee {:>8}",
            self.provider_name,
            self.tenure,
            self.interest_rate,
            self.monthly_installment,
            self.total_amount,
            self.total_interest,
            self.processing_fee
        )
    }
}
