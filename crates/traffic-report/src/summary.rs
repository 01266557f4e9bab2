//! Summary rendering for the text and JSON output formats.

use chrono::NaiveDate;
use serde::Serialize;
use traffic_core::formatting::{format_decimal, month_header, round_to};
use traffic_core::models::{DayAverage, TargetMonth};
use traffic_core::stats::SummaryStats;

/// Printed instead of a report when no record matched the month.
pub const NO_DATA_NOTICE: &str = "No site-day averages found for the specified month.";

/// Decimal places used for every displayed average.
const DISPLAY_DECIMALS: usize = 2;

/// The statistics block of the text report, one line per entry.
pub fn summary_lines(target: TargetMonth, stats: &SummaryStats) -> Vec<String> {
    let fmt = |v: f64| format_decimal(v, DISPLAY_DECIMALS);
    vec![
        month_header(target),
        format!("Site-days: {}", stats.site_days),
        format!("Mean avg/hour (site-day): {}", fmt(stats.mean)),
        format!("Median avg/hour (site-day): {}", fmt(stats.median)),
        format!(
            "Min/Max avg/hour (site-day): {} / {}",
            fmt(stats.min),
            fmt(stats.max)
        ),
    ]
}

/// Final line of the text report once the chart is on disk.
pub fn saved_chart_line(path: &std::path::Path) -> String {
    format!("Saved line chart to {}", path.display())
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: NaiveDate,
    pub day: u32,
    pub sites: usize,
    pub average: f64,
}

/// Machine-readable form of the whole report.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub month: String,
    pub site_days: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub days: Vec<JsonDay>,
    pub chart: Option<String>,
}

impl JsonSummary {
    /// Build the summary; every average is rounded to two places.
    pub fn new(
        target: TargetMonth,
        stats: &SummaryStats,
        days: &[DayAverage],
        chart: Option<&std::path::Path>,
    ) -> Self {
        let round = |v: f64| round_to(v, DISPLAY_DECIMALS as u32);
        Self {
            month: target.label(),
            site_days: stats.site_days,
            mean: round(stats.mean),
            median: round(stats.median),
            min: round(stats.min),
            max: round(stats.max),
            days: days
                .iter()
                .map(|d| JsonDay {
                    date: d.date,
                    day: d.day_of_month(),
                    sites: d.sites,
                    average: round(d.average),
                })
                .collect(),
            chart: chart.map(|p| p.display().to_string()),
        }
    }
}
