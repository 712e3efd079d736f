//! Retail eligibility gate.
//!
//! Eligibility is independent of plan generation: a request can be well
//! formed, priced by every provider and still be ineligible. The gate never
//! fails; it returns a verdict.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of rejection causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    AmountBelowMinimum,
    AmountAboveMaximum,
    CreditScoreTooLow,
    IncomeRatioExceeded,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AmountBelowMinimum => "amount below minimum",
            Self::AmountAboveMaximum => "amount above maximum for retail customers",
            Self::CreditScoreTooLow => "credit score too low",
            Self::IncomeRatioExceeded => "EMI exceeds affordable income ratio",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    /// Present exactly when `eligible` is false.
    pub reason: Option<RejectionReason>,
}

impl EligibilityVerdict {
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

impl fmt::Display for EligibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            None => write!(f, "eligible"),
            Some(reason) => write!(f, "ineligible: {}", reason),
        }
    }
}

/// Thresholds applied by the eligibility gate.
///
/// The defaults are the retail limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub min_credit_score: u32,
    /// Largest share of monthly income a single installment may take.
    pub max_income_ratio: Decimal,
    /// Tenure used to estimate a representative installment (`amount / n`).
    pub proxy_tenure: u32,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_amount: dec!(1000),
            max_amount: dec!(500000),
            min_credit_score: 650,
            max_income_ratio: dec!(0.5),
            proxy_tenure: 12,
        }
    }
}

impl EligibilityPolicy {
    /// Evaluate the rules in fixed order, stopping at the first failure.
    ///
    /// 1. amount below the minimum
    /// 2. amount above the maximum
    /// 3. credit score below the floor, if a score is supplied
    /// 4. estimated installment above the income ratio, if income is supplied
    ///
    /// Rules whose data is absent are skipped.
    pub fn check(
        &self,
        amount: Decimal,
        credit_score: Option<u32>,
        monthly_income: Option<Decimal>,
    ) -> EligibilityVerdict {
        if amount < self.min_amount {
            return self.reject(amount, RejectionReason::AmountBelowMinimum);
        }
        if amount > self.max_amount {
            return self.reject(amount, RejectionReason::AmountAboveMaximum);
        }
        if let Some(score) = credit_score {
            if score < self.min_credit_score {
                return self.reject(amount, RejectionReason::CreditScoreTooLow);
            }
        }
        if let Some(income) = monthly_income {
            let estimated_emi = amount / Decimal::from(self.proxy_tenure.max(1));
            if estimated_emi > self.max_income_ratio * income {
                return self.reject(amount, RejectionReason::IncomeRatioExceeded);
            }
        }
        EligibilityVerdict::eligible()
    }

    fn reject(&self, amount: Decimal, reason: RejectionReason) -> EligibilityVerdict {
        debug!("amount {} rejected: {}", amount, reason);
        EligibilityVerdict::rejected(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(amount: Decimal, score: Option<u32>, income: Option<Decimal>) -> EligibilityVerdict {
        EligibilityPolicy::default().check(amount, score, income)
    }

    #[test]
    fn test_below_minimum() {
        let v = check(dec!(500), None, None);
        assert!(!v.eligible);
        assert!(v.reason.unwrap().message().contains("minimum"));
    }

    #[test]
    fn test_above_maximum() {
        let v = check(dec!(600000), None, None);
        assert_eq!(v.reason, Some(RejectionReason::AmountAboveMaximum));
        assert!(v.to_string().contains("maximum"));
    }

    #[test]
    fn test_limits_inclusive() {
        assert!(check(dec!(1000), None, None).eligible);
        assert!(check(dec!(500000), None, None).eligible);
    }

    #[test]
    fn test_credit_score() {
        let v = check(dec!(10000), Some(600), None);
        assert_eq!(v.reason, Some(RejectionReason::CreditScoreTooLow));
        assert!(v.reason.unwrap().message().contains("credit score"));
        assert!(check(dec!(10000), Some(650), None).eligible);
    }

    #[test]
    fn test_amount_rule_wins_over_score() {
        let v = check(dec!(500), Some(300), Some(dec!(10)));
        assert_eq!(v.reason, Some(RejectionReason::AmountBelowMinimum));
    }

    #[test]
    fn test_income_ratio() {
        assert!(check(dec!(10000), Some(750), Some(dec!(15000))).eligible);
        // 120000 / 12 = 10000 > 0.5 * 15000
        let v = check(dec!(120000), Some(750), Some(dec!(15000)));
        assert_eq!(v.reason, Some(RejectionReason::IncomeRatioExceeded));
        // Exactly at the ratio is affordable.
        assert!(check(dec!(90000), None, Some(dec!(15000))).eligible);
    }

    #[test]
    fn test_missing_data_skips_rules() {
        let v = check(dec!(400000), None, None);
        assert_eq!(v, EligibilityVerdict::eligible());
    }

    #[test]
    fn test_custom_policy() {
        let policy = EligibilityPolicy {
            min_credit_score: 700,
            ..Default::default()
        };
        assert!(!policy.check(dec!(10000), Some(680), None).eligible);
    }
}
