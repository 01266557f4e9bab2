//! Terminal stage of the pipeline.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;
use traffic_core::error::Result;
use traffic_core::formatting::chart_file_name;
use traffic_core::models::TargetMonth;
use traffic_core::settings::OutputFormat;
use traffic_core::stats::SummaryStats;
use traffic_data::analysis::MonthAnalysis;

use crate::chart::render_line_chart;
use crate::summary::{saved_chart_line, summary_lines, JsonSummary, NO_DATA_NOTICE};

/// What a report run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Nothing matched the month; only the notice was written.
    NoData,
    Reported {
        stats: SummaryStats,
        chart: Option<PathBuf>,
    },
}

/// Writes the summary and renders the chart for one [`MonthAnalysis`].
#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: Option<PathBuf>,
    format: OutputFormat,
    render_chart: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: OutputFormat::Text,
            render_chart: true,
        }
    }
}

impl Reporter {
    pub fn new(output_dir: Option<PathBuf>, format: OutputFormat, render_chart: bool) -> Self {
        Self {
            output_dir,
            format,
            render_chart,
        }
    }

    /// Where the chart for `target` is written.
    ///
    /// Without an output directory this is the bare file name, i.e. the
    /// current working directory.
    pub fn chart_path(&self, target: TargetMonth) -> PathBuf {
        let name = chart_file_name(target);
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Write the report for `analysis` to `out`.
    ///
    /// An empty analysis short-circuits with [`NO_DATA_NOTICE`]: no
    /// statistics are computed and no image is written.
    pub fn report<W: Write>(&self, analysis: &MonthAnalysis, out: &mut W) -> Result<ReportOutcome> {
        let values = analysis.aggregate.site_day_values();
        let Some(stats) = SummaryStats::from_values(&values) else {
            writeln!(out, "{}", NO_DATA_NOTICE)?;
            return Ok(ReportOutcome::NoData);
        };
        debug!(?stats, "Summary statistics computed");

        match self.format {
            OutputFormat::Text => {
                for line in summary_lines(analysis.target, &stats) {
                    writeln!(out, "{}", line)?;
                }
                let chart = self.write_chart(analysis)?;
                if let Some(path) = &chart {
                    writeln!(out, "{}", saved_chart_line(path))?;
                }
                Ok(ReportOutcome::Reported { stats, chart })
            }
            OutputFormat::Json => {
                let chart = self.write_chart(analysis)?;
                let summary = JsonSummary::new(
                    analysis.target,
                    &stats,
                    &analysis.aggregate.days,
                    chart.as_deref(),
                );
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
                Ok(ReportOutcome::Reported { stats, chart })
            }
        }
    }

    fn write_chart(&self, analysis: &MonthAnalysis) -> Result<Option<PathBuf>> {
        if !self.render_chart {
            return Ok(None);
        }
        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
        }
        let path = self.chart_path(analysis.target);
        render_line_chart(&path, analysis.target, &analysis.aggregate.days)?;
        Ok(Some(path))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
