//! Plan generation, ranking, eligibility and cost comparison.

pub mod comparison;
pub mod eligibility;
pub mod generator;
pub mod plan;
