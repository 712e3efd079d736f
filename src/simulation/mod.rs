//! Demo and randomized provider catalogs.

pub mod catalog_generator;
