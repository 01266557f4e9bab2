//! Main analysis pipeline.
//!
//! Loads the export, normalizes its records for the target month and runs
//! the aggregation, returning a [`MonthAnalysis`] ready for the reporter.

use std::path::Path;

use serde_json::Value;
use tracing::info;
use traffic_core::error::Result;
use traffic_core::models::TargetMonth;
use traffic_core::normalizer::{NormalizeStats, RecordNormalizer};

use crate::aggregator::{MonthAggregate, TrafficAggregator};
use crate::reader::load_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// The complete output of one pipeline run.
#[derive(Debug, Clone)]
pub struct MonthAnalysis {
    pub target: TargetMonth,
    /// How the input records were accepted or rejected.
    pub normalize_stats: NormalizeStats,
    pub aggregate: MonthAggregate,
}

impl MonthAnalysis {
    /// `true` when nothing matched the target month.
    pub fn is_empty(&self) -> bool {
        self.aggregate.is_empty()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline against the export at `path`.
///
/// 1. Load the JSON array.
/// 2. Normalize each record, dropping the ones that do not qualify.
/// 3. Aggregate into site-day and day averages.
///
/// # Errors
///
/// Propagates I/O and JSON errors from [`load_records`]. Bad individual
/// records are never an error.
pub fn analyze_month(path: &Path, target: TargetMonth) -> Result<MonthAnalysis> {
    let load_start = std::time::Instant::now();
    let records = load_records(path)?;
    info!(
        path = %path.display(),
        records = records.len(),
        load_time_seconds = load_start.elapsed().as_secs_f64(),
        "Export loaded"
    );

    Ok(analyze_records(&records, target))
}

/// Run normalization and aggregation over records already in memory.
pub fn analyze_records(records: &[Value], target: TargetMonth) -> MonthAnalysis {
    let normalizer = RecordNormalizer::new(target);
    let (samples, normalize_stats) = normalizer.normalize_all(records);
    let aggregate = TrafficAggregator::aggregate(&samples);

    info!(
        target_month = %target,
        accepted = normalize_stats.accepted,
        rejected = normalize_stats.rejected(),
        site_days = aggregate.site_days.len(),
        days = aggregate.days.len(),
        "Month analysed"
    );

    MonthAnalysis {
        target,
        normalize_stats,
        aggregate,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use serde_json::json;
    use tempfile::TempDir;

    fn scenario_records() -> Vec<Value> {
        vec![
            json!({"site_id": "A", "timestamp": "2022-07-01T00:00:00Z", "count": 10}),
            json!({"site_id": "A", "timestamp": "2022-07-01T01:00:00Z", "count": 20}),
            json!({"site_id": "B", "timestamp": "2022-07-01T00:00:00Z", "count": 100}),
        ]
    }

    #[test]
    fn test_analyze_records_reference_scenario() {
        let analysis = analyze_records(&scenario_records(), TargetMonth::new(2022, 7));

        let mut values = analysis.aggregate.site_day_values();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![15.0, 100.0]);

        assert_eq!(analysis.aggregate.days.len(), 1);
        assert_eq!(
            analysis.aggregate.days[0].date,
            NaiveDate::from_ymd_opt(2022, 7, 1).unwrap()
        );
        assert_eq!(analysis.aggregate.days[0].average, 57.5);
    }

    #[test]
    fn test_analyze_records_only_target_month_contributes() {
        let mut records = scenario_records();
        records.push(json!({"site_id": "A", "timestamp": "2022-08-01T00:00:00Z", "count": 999}));
        records.push(json!({"site_id": "C", "timestamp": 1625097600, "count": 5}));

        let analysis = analyze_records(&records, TargetMonth::new(2022, 7));

        assert_eq!(analysis.normalize_stats.outside_month, 2);
        assert!(analysis
            .aggregate
            .site_days
            .iter()
            .all(|s| s.date.year() == 2022 && s.date.month() == 7));
        assert_eq!(analysis.aggregate.site_days.len(), 2);
    }

    #[test]
    fn test_analyze_records_non_positive_counts_excluded() {
        let mut records = scenario_records();
        records.push(json!({"site_id": "B", "timestamp": "2022-07-01T02:00:00Z", "count": 0}));
        records.push(json!({"site_id": "B", "timestamp": "2022-07-01T03:00:00Z", "count": -5}));

        let analysis = analyze_records(&records, TargetMonth::new(2022, 7));
        assert_eq!(analysis.aggregate.days[0].average, 57.5);
        assert_eq!(analysis.normalize_stats.invalid_count, 2);
    }

    #[test]
    fn test_analyze_records_integer_and_float_site_ids_group_together() {
        let records = vec![
            json!({"site_id": 7, "timestamp": "2022-07-15T00:00:00Z", "count": 10}),
            json!({"site_id": 7.0, "timestamp": 1657843200000_i64, "count": 30}),
            json!({"site_id": "x", "timestamp": "2022-07-15T05:00:00Z", "count": 4}),
        ];

        let analysis = analyze_records(&records, TargetMonth::new(2022, 7));

        let mut values = analysis.aggregate.site_day_values();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![4.0, 20.0]);
        assert_eq!(analysis.aggregate.days.len(), 1);
        assert_eq!(analysis.aggregate.days[0].sites, 2);
        assert_eq!(analysis.aggregate.days[0].average, 12.0);
    }

    #[test]
    fn test_analyze_records_no_match_is_empty() {
        let analysis = analyze_records(&scenario_records(), TargetMonth::new(2021, 7));
        assert!(analysis.is_empty());
        assert!(analysis.aggregate.days.is_empty());
    }

    #[test]
    fn test_analyze_records_is_repeatable() {
        let first = analyze_records(&scenario_records(), TargetMonth::new(2022, 7));
        let second = analyze_records(&scenario_records(), TargetMonth::new(2022, 7));
        assert_eq!(first.aggregate.site_days, second.aggregate.site_days);
        assert_eq!(first.aggregate.days, second.aggregate.days);
    }

    #[test]
    fn test_analyze_month_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("full_raw_counts.json");
        std::fs::write(&path, Value::Array(scenario_records()).to_string()).unwrap();

        let analysis = analyze_month(&path, TargetMonth::new(2022, 7)).unwrap();
        assert_eq!(analysis.normalize_stats.read, 3);
        assert_eq!(analysis.aggregate.site_days.len(), 2);
    }

    #[test]
    fn test_analyze_month_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = analyze_month(&dir.path().join("missing.json"), TargetMonth::new(2022, 7));
        assert!(result.is_err());
    }
}
