//! Installment arithmetic: the amortization calculator and repayment schedules.

pub mod amortization;
pub mod schedule;
