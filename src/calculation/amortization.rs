use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places kept on the monthly installment.
pub const CURRENCY_DP: u32 = 2;

/// Errors arising from installment arithmetic.
///
/// These are caller contract violations. Every operation is a pure function
/// of its inputs, so retrying never changes the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
    #[error("compound factor overflowed for rate {monthly_rate} over {tenure} months")]
    Overflow { monthly_rate: Decimal, tenure: u32 },
}

impl CalculationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Round a currency amount to two places, midpoint away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an annual nominal percentage to a monthly fraction.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(12) / dec!(100)
}

/// Compute (1 + r)^n by repeated squaring.
fn compound(rate: Decimal, tenure: u32) -> Result<Decimal, CalculationError> {
    let overflow = CalculationError::Overflow {
        monthly_rate: rate,
        tenure,
    };
    let mut base = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    let mut n = tenure;
    while n > 0 {
        if n & 1 == 1 {
            result = result.checked_mul(base).ok_or_else(|| overflow.clone())?;
        }
        n >>= 1;
        if n > 0 {
            base = base.checked_mul(base).ok_or_else(|| overflow.clone())?;
        }
    }
    Ok(result)
}

/// Inputs to a single installment computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Principal being financed.
    pub amount: Decimal,
    /// Number of monthly installments.
    pub tenure: u32,
    /// Annual nominal rate in percent.
    pub interest_rate: Decimal,
    /// One-time fee added on top of the installments.
    #[serde(default)]
    pub processing_fee: Decimal,
}

impl CalculationRequest {
    pub fn new(amount: Decimal, tenure: u32, interest_rate: Decimal) -> Self {
        Self {
            amount,
            tenure,
            interest_rate,
            processing_fee: Decimal::ZERO,
        }
    }

    pub fn with_processing_fee(mut self, fee: Decimal) -> Self {
        self.processing_fee = fee;
        self
    }

    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.amount <= Decimal::ZERO {
            return Err(CalculationError::invalid(
                "amount",
                format!("must be positive, got {}", self.amount),
            ));
        }
        if self.tenure == 0 {
            return Err(CalculationError::invalid(
                "tenure",
                "must be at least one month",
            ));
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(CalculationError::invalid(
                "interest_rate",
                format!("must not be negative, got {}", self.interest_rate),
            ));
        }
        if self.processing_fee < Decimal::ZERO {
            return Err(CalculationError::invalid(
                "processing_fee",
                format!("must not be negative, got {}", self.processing_fee),
            ));
        }
        Ok(())
    }
}

/// Where the total cost of a plan goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub principal: Decimal,
    pub interest: Decimal,
    pub fee: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        self.principal + self.interest + self.fee
    }
}

/// Output of [`AmortizationCalculator::compute_installment`].
///
/// All totals are derived from the rounded installment, so
/// `total_amount == monthly_installment * tenure + processing_fee` holds
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub monthly_installment: Decimal,
    pub total_amount: Decimal,
    pub total_interest: Decimal,
    pub processing_fee: Decimal,
    pub breakdown: CostBreakdown,
}

/// Reducing-balance amortization.
///
/// Stateless; safe to call from any number of threads.
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// Compute the equated monthly installment and the totals derived from it.
    ///
    /// # Algorithm
    ///
    /// 1. `r = annual_rate / 12 / 100`.
    /// 2. If `r == 0`, `installment = amount / tenure`.
    /// 3. Otherwise `installment = P * r * (1 + r)^n / ((1 + r)^n - 1)`.
    /// 4. Round the installment to 2 places, half-up. Nothing else is rounded.
    /// 5. `total_interest = installment * n - P`,
    ///    `total_amount = installment * n + fee`.
    ///
    /// # Examples
    ///
    /// ```
    /// use emi_engine::calculation::amortization::{AmortizationCalculator, CalculationRequest};
    /// use rust_decimal_macros::dec;
    ///
    /// let request = CalculationRequest::new(dec!(10000), 12, dec!(12))
    ///     .with_processing_fee(dec!(100));
    /// let result = AmortizationCalculator::compute_installment(&request).unwrap();
    ///
    /// assert_eq!(result.monthly_installment, dec!(888.49));
    /// assert_eq!(result.total_amount, dec!(10761.88));
    /// assert_eq!(result.total_interest, dec!(661.88));
    /// ```
    pub fn compute_installment(
        request: &CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        request.validate()?;

        let tenure = Decimal::from(request.tenure);
        let r = monthly_rate(request.interest_rate);

        let raw_installment = if r.is_zero() {
            request.amount / tenure
        } else {
            let growth = compound(r, request.tenure)?;
            // A rate too small to move the compound factor is promotional financing.
            if growth == Decimal::ONE {
                request.amount / tenure
            } else {
                request
                    .amount
                    .checked_mul(r)
                    .and_then(|v| v.checked_mul(growth))
                    .and_then(|v| v.checked_div(growth - Decimal::ONE))
                    .ok_or(CalculationError::Overflow {
                        monthly_rate: r,
                        tenure: request.tenure,
                    })?
            }
        };
        let monthly_installment = round_currency(raw_installment);

        let total_emi_amount = monthly_installment * tenure;
        let total_interest = total_emi_amount - request.amount;
        let total_amount = total_emi_amount + request.processing_fee;

        Ok(CalculationResult {
            monthly_installment,
            total_amount,
            total_interest,
            processing_fee: request.processing_fee,
            breakdown: CostBreakdown {
                principal: request.amount,
                interest: total_interest,
                fee: request.processing_fee,
            },
        })
    }
}
