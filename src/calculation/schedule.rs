//! Month-by-month repayment schedules.
//!
//! A schedule splits each installment into interest on the outstanding
//! balance and principal repaid. The last period absorbs the residue left by
//! rounding the installment, so the rows always reconcile with the
//! [`CalculationResult`] they were derived from.

use crate::calculation::amortization::{
    monthly_rate, round_currency, AmortizationCalculator, CalculationError, CalculationRequest,
    CalculationResult,
};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One installment of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based installment number.
    pub period: u32,
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Decimal,
    pub installment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub summary: CalculationResult,
    pub rows: Vec<ScheduleRow>,
}

impl AmortizationSchedule {
    /// Build the schedule for `request`, without due dates.
    pub fn generate(request: &CalculationRequest) -> Result<Self, CalculationError> {
        let summary = AmortizationCalculator::compute_installment(request)?;
        let r = monthly_rate(request.interest_rate);
        let installment = summary.monthly_installment;

        let mut rows = Vec::with_capacity(request.tenure as usize);
        let mut balance = request.amount;
        for period in 1..=request.tenure {
            let (interest, principal) = if period == request.tenure {
                (installment - balance, balance)
            } else {
                let interest = round_currency(balance * r);
                (interest, installment - interest)
            };
            let closing_balance = balance - principal;
            rows.push(ScheduleRow {
                period,
                due_date: None,
                opening_balance: balance,
                installment,
                interest,
                principal,
                closing_balance,
            });
            balance = closing_balance;
        }

        Ok(Self { summary, rows })
    }

    /// Attach due dates, one calendar month apart, starting at `first_due`.
    ///
    /// Month-end dates clamp (Jan 31 is followed by Feb 28/29).
    pub fn with_first_due_date(mut self, first_due: NaiveDate) -> Self {
        for row in &mut self.rows {
            row.due_date = first_due.checked_add_months(Months::new(row.period - 1));
        }
        self
    }

    pub fn total_interest(&self) -> Decimal {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_principal(&self) -> Decimal {
        self.rows.iter().map(|r| r.principal).sum()
    }

    pub fn total_installments(&self) -> Decimal {
        self.rows.iter().map(|r| r.installment).sum()
    }
}

impl std::fmt::Display for AmortizationSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Repayment Schedule ===")?;
        writeln!(
            f,
            "{:>6}  {:>10}  {:>14}  {:>12}  {:>12}  {:>12}  {:>14}",
            "Period", "Due", "Opening", "Installment", "Interest", "Principal", "Closing"
        )?;
        for row in &self.rows {
            let due = row
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:>6}  {:>10}  {:>14}  {:>12}  {:>12}  {:>12}  {:>14}",
                row.period,
                due,
                row.opening_balance,
                row.installment,
                row.interest,
                row.principal,
                row.closing_balance
            )?;
        }
        writeln!(f, "Total interest:  {}", self.total_interest())?;
        writeln!(f, "Processing fee:  {}", self.summary.processing_fee)?;
        writeln!(f, "Total payable:   {}", self.summary.total_amount)
    }
}
