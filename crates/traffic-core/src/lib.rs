//! Core domain layer for the daily traffic averages tool.
//!
//! Holds the record types shared by every crate, the error type, the
//! record normalizer, summary statistics, display formatting and the CLI
//! settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod normalizer;
pub mod settings;
pub mod stats;
