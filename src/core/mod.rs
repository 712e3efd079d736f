//! Foundational types: provider identity, provider records and catalogs.

pub mod catalog;
pub mod provider;
