use crate::calculation::amortization::CalculationError;
use crate::plans::plan::Plan;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost of financing a purchase through a plan versus paying up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComparison {
    pub full_payment_cost: Decimal,
    pub emi_total_cost: Decimal,
    /// `emi_total_cost - full_payment_cost`.
    pub extra_cost: Decimal,
    /// `extra_cost / full_payment_cost * 100`.
    ///
    /// Despite the name this is the premium paid for financing, not a
    /// saving. The field name is part of the public contract.
    pub savings_percentage: Decimal,
}

impl CostComparison {
    /// Compare paying `amount` in full against the total of `plan`.
    pub fn between(amount: Decimal, plan: &Plan) -> Result<Self, CalculationError> {
        if amount <= Decimal::ZERO {
            return Err(CalculationError::invalid(
                "amount",
                format!("must be positive, got {}", amount),
            ));
        }
        let extra_cost = plan.total_amount - amount;
        Ok(Self {
            full_payment_cost: amount,
            emi_total_cost: plan.total_amount,
            extra_cost,
            savings_percentage: extra_cost / amount * Decimal::from(100),
        })
    }

    /// The premium percentage as a float, for display.
    pub fn savings_percent(&self) -> f64 {
        self.savings_percentage
            .to_string()
            .parse::<f64>()
            .unwrap_or(0.0)
    }
}

impl std::fmt::Display for CostComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Cost Comparison ===")?;
        writeln!(f, "Pay in full:     {}", self.full_payment_cost)?;
        writeln!(f, "Pay via EMI:     {}", self.emi_total_cost)?;
        writeln!(f, "Extra cost:      {}", self.extra_cost)?;
        writeln!(f, "Premium:         {:.2}%", self.savings_percent())
    }
}
