use serde::Serialize;

// ── Basic helpers ─────────────────────────────────────────────────────────────

/// Arithmetic mean of `values`. Returns `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a **sorted** slice: the middle value, or the mean of the two
/// middle values for an even length. Returns `0.0` for an empty slice.
pub fn median(sorted_data: &[f64]) -> f64 {
    let len = sorted_data.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        sorted_data[mid]
    } else {
        (sorted_data[mid - 1] + sorted_data[mid]) / 2.0
    }
}

// ── SummaryStats ──────────────────────────────────────────────────────────────

/// Descriptive statistics over the site-day averages of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Number of (site, day) keys the statistics were computed over.
    pub site_days: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Summarise `values`; `None` when there is nothing to summarise.
    ///
    /// Values are expected to be finite. Order does not matter.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            site_days: sorted.len(),
            mean: mean(&sorted),
            median: median(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── mean ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_mean_empty_returns_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[15.0, 100.0]), 57.5);
        assert_eq!(mean(&[3.0]), 3.0);
    }

    // ── median ────────────────────────────────────────────────────────────────

    #[test]
    fn test_median_empty_and_single() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[42.0]), 42.0);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[1.0, 5.0, 9.0]), 5.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[15.0, 100.0]), 57.5);
    }

    // ── SummaryStats ─────────────────────────────────────────────────────────

    #[test]
    fn test_summary_empty_is_none() {
        assert!(SummaryStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_summary_two_sites_one_day() {
        let stats = SummaryStats::from_values(&[100.0, 15.0]).unwrap();
        assert_eq!(stats.site_days, 2);
        assert_eq!(stats.mean, 57.5);
        assert_eq!(stats.median, 57.5);
        assert_eq!(stats.min, 15.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_summary_unsorted_input() {
        let stats = SummaryStats::from_values(&[9.0, 1.0, 4.0, 7.0, 2.0]).unwrap();
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.mean - 4.6).abs() < 1e-9);
    }
}
