//! Transformation module.
//!
//! - Aggregate: observations to yearly totals to province averages
//! - Classify: averages to GREEN / ORANGE / RED tiers and their tally
//! - Pipeline: the start-up run producing a [`WasteReport`]

pub mod aggregate;
pub mod classify;
pub mod pipeline;

pub use aggregate::{mean, province_averages, yearly_totals, AverageSet};
pub use classify::{categorize, classify, tally, GREEN_MAX, ORANGE_MAX};
pub use pipeline::{derive_tables, DerivedTables, LoadInfo, RowCounts, WasteReport};
