//! Reporting layer: summary output and the daily line chart.

pub mod chart;
pub mod reporter;
pub mod summary;

pub use reporter::{ReportOutcome, Reporter};
