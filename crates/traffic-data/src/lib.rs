//! Data layer for the daily traffic averages tool.
//!
//! Responsible for loading the raw counts export, normalizing its records,
//! and running the two-stage site-day / day aggregation.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use traffic_core as core;
