use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a counting site as found in the export.
///
/// Exports carry the identifier either as a string or as a bare number; the
/// two spellings are kept apart so `"7"` and `7` never collapse into one site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteId {
    /// Site identifier given as a JSON string.
    Text(String),
    /// Site identifier given as a JSON number, kept as its canonical text.
    Number(String),
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteId::Text(s) | SiteId::Number(s) => f.write_str(s),
        }
    }
}

/// The calendar month a run is restricted to.
///
/// `month` is deliberately not range-checked: a month such as `13` matches
/// no record and the run ends with the empty-result notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMonth {
    pub year: i32,
    pub month: u32,
}

impl TargetMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// `true` when `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// `"YYYY-MM"` with a zero-padded month, as shown in titles and headers.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One accepted observation: a site, the UTC calendar day and its count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSample {
    pub site_id: SiteId,
    pub date: NaiveDate,
    pub count: f64,
}

/// Grouping key for the first aggregation stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteDayKey {
    pub site_id: SiteId,
    pub date: NaiveDate,
}

/// Mean count per observed sample for one site on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDayAverage {
    pub site_id: SiteId,
    pub date: NaiveDate,
    /// Sum of all counts seen for the key.
    pub total: f64,
    /// Number of samples seen for the key; never zero.
    pub observations: u32,
}

impl SiteDayAverage {
    /// `total / observations`.
    ///
    /// Hours with no sample are simply absent, so they do not pull the
    /// average toward zero.
    pub fn average(&self) -> f64 {
        self.total / f64::from(self.observations)
    }
}

/// Cross-site mean for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAverage {
    pub date: NaiveDate,
    /// Number of sites that reported on this day.
    pub sites: usize,
    /// Unweighted mean of the sites' site-day averages.
    pub average: f64,
}

impl DayAverage {
    /// Day of the month, used as the x coordinate when plotting.
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }
}
