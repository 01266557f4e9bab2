//! Two-stage aggregation: samples → site-day averages → per-day averages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use traffic_core::models::{DayAverage, NormalizedSample, SiteDayAverage, SiteDayKey};
use traffic_core::stats::mean;

// ── RunningTotal ──────────────────────────────────────────────────────────────

/// Sum and number of samples accumulated for one site-day key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningTotal {
    pub sum: f64,
    pub observations: u32,
}

impl RunningTotal {
    /// Add a single sample's count to the running totals.
    pub fn add(&mut self, count: f64) {
        self.sum += count;
        self.observations += 1;
    }
}

// ── MonthAggregate ────────────────────────────────────────────────────────────

/// Everything the reporter needs for one month.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthAggregate {
    /// One entry per (site, day) with at least one sample, sorted by key.
    pub site_days: Vec<SiteDayAverage>,
    /// One entry per day with data, ascending by date.
    pub days: Vec<DayAverage>,
}

impl MonthAggregate {
    /// `true` when no sample was accepted for the month.
    pub fn is_empty(&self) -> bool {
        self.site_days.is_empty()
    }

    /// The site-day averages, flattened across all sites and days.
    pub fn site_day_values(&self) -> Vec<f64> {
        self.site_days.iter().map(SiteDayAverage::average).collect()
    }
}

// ── TrafficAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups normalized samples.
pub struct TrafficAggregator;

impl TrafficAggregator {
    /// Run both stages over `samples`.
    pub fn aggregate(samples: &[NormalizedSample]) -> MonthAggregate {
        let site_days = Self::site_day_averages(samples);
        let days = Self::day_series(&site_days);

        debug!(
            samples = samples.len(),
            site_days = site_days.len(),
            days = days.len(),
            "Aggregation finished"
        );

        MonthAggregate { site_days, days }
    }

    /// Stage 1: mean count per observed sample for every (site, day).
    ///
    /// A key is created only when a sample arrives, so every result has at
    /// least one observation.
    pub fn site_day_averages(samples: &[NormalizedSample]) -> Vec<SiteDayAverage> {
        let mut totals: BTreeMap<SiteDayKey, RunningTotal> = BTreeMap::new();

        for sample in samples {
            let key = SiteDayKey {
                site_id: sample.site_id.clone(),
                date: sample.date,
            };
            totals.entry(key).or_default().add(sample.count);
        }

        totals
            .into_iter()
            .map(|(key, total)| SiteDayAverage {
                site_id: key.site_id,
                date: key.date,
                total: total.sum,
                observations: total.observations,
            })
            .collect()
    }

    /// Stage 2: unweighted mean of the site-day averages sharing a date.
    ///
    /// Each site contributes one value per day no matter how many samples it
    /// reported. Returns days in ascending order.
    pub fn day_series(site_days: &[SiteDayAverage]) -> Vec<DayAverage> {
        let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

        for site_day in site_days {
            by_day
                .entry(site_day.date)
                .or_default()
                .push(site_day.average());
        }

        by_day
            .into_iter()
            .map(|(date, averages)| DayAverage {
                date,
                sites: averages.len(),
                average: mean(&averages),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
