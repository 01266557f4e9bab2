//! Record normalization for loosely-keyed traffic exports.
//!
//! Every export in the dataset family names its fields a little differently,
//! so each logical field is resolved through an ordered alias table. A record
//! that cannot yield all three fields, or that falls outside the requested
//! month, is rejected; rejections are values, never errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::models::{NormalizedSample, SiteId, TargetMonth};

// ── Alias tables ──────────────────────────────────────────────────────────────

/// Candidate keys for the observed count, in lookup order.
pub const COUNT_KEYS: &[&str] = &["counts", "count", "COUNT", "value"];

/// Candidate keys for the observation timestamp, in lookup order.
pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "Timestamp", "TIMESTAMP", "date", "DATE"];

/// Candidate keys for the site identifier, in lookup order.
pub const SITE_KEYS: &[&str] = &["site_id", "siteID", "site", "SITE_ID", "id"];

/// Epoch values above this magnitude are milliseconds, not seconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// Return the value of the first key in `keys` present in `record`.
///
/// Presence is what counts: a present key with an unusable value still wins
/// over later aliases.
pub fn find_field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|&key| record.get(key))
}

// ── Rejection ─────────────────────────────────────────────────────────────────

/// Why a raw record was excluded from aggregation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("no count field")]
    MissingCount,
    #[error("count is not a positive number")]
    InvalidCount,
    #[error("no timestamp field")]
    MissingTimestamp,
    #[error("timestamp could not be parsed")]
    InvalidTimestamp,
    #[error("timestamp outside the requested month")]
    OutsideMonth,
    #[error("no site field")]
    MissingSite,
    #[error("site is neither a string nor a number")]
    InvalidSite,
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the timestamp shapes found in raw count exports.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a JSON value into a UTC [`DateTime`].
    ///
    /// * JSON number → Unix epoch. Magnitudes above `1e12` are milliseconds,
    ///   anything else is seconds (fractions allowed).
    /// * JSON string → ISO 8601. A strict parse is tried first; when it fails
    ///   the string is cut at the first `.` and parsed again, which drops
    ///   fractional seconds of unusual precision.
    /// * anything else → `None`.
    pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Number(n) => {
                let raw = n.as_f64()?;
                let secs = if raw.abs() > EPOCH_MILLIS_THRESHOLD {
                    raw / 1000.0
                } else {
                    raw
                };
                Self::from_epoch_seconds(secs)
            }
            Value::String(s) => Self::parse_str(s),
            _ => None,
        }
    }

    /// Parse an ISO 8601 string, retrying once with the fraction removed.
    pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        Self::parse_iso(s).or_else(|| {
            let (base, _) = s.split_once('.')?;
            Self::parse_iso(base)
        })
    }

    fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
        if !secs.is_finite() {
            return None;
        }
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
        if nanos >= 1_000_000_000 {
            DateTime::from_timestamp(whole as i64 + 1, 0)
        } else {
            DateTime::from_timestamp(whole as i64, nanos)
        }
    }

    fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
        if s.is_empty() {
            return None;
        }

        // Trailing 'Z' means UTC.
        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        const OFFSET_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f%:z",
            "%Y-%m-%d %H:%M:%S%.f%:z",
            "%Y-%m-%dT%H:%M%:z",
            "%Y-%m-%d %H:%M%:z",
            "%Y-%m-%dT%H:%M:%S%.f%z",
            "%Y-%m-%d %H:%M:%S%.f%z",
        ];
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalised, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        // No offset: the wall-clock time is taken as UTC.
        const NAIVE_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }
}

// ── RecordNormalizer ──────────────────────────────────────────────────────────

/// Turns raw JSON records into [`NormalizedSample`]s for one target month.
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer {
    target: TargetMonth,
}

impl RecordNormalizer {
    pub fn new(target: TargetMonth) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetMonth {
        self.target
    }

    /// Normalize one record.
    ///
    /// Fields are checked in the order count, timestamp, month, site; the
    /// first failing check decides the [`Rejection`].
    pub fn normalize(&self, record: &Value) -> Result<NormalizedSample, Rejection> {
        let fields = record.as_object().ok_or(Rejection::NotAnObject)?;

        let count = Self::extract_count(fields)?;

        let ts_value = find_field(fields, TIMESTAMP_KEYS).ok_or(Rejection::MissingTimestamp)?;
        let timestamp = TimestampParser::parse(ts_value).ok_or(Rejection::InvalidTimestamp)?;
        let date = timestamp.date_naive();
        if !self.target.contains(date) {
            return Err(Rejection::OutsideMonth);
        }

        let site_id = Self::extract_site(fields)?;

        Ok(NormalizedSample {
            site_id,
            date,
            count,
        })
    }

    /// Normalize a batch, keeping accepted samples in input order.
    pub fn normalize_all(&self, records: &[Value]) -> (Vec<NormalizedSample>, NormalizeStats) {
        let mut stats = NormalizeStats::default();
        let mut samples = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            stats.read += 1;
            match self.normalize(record) {
                Ok(sample) => {
                    stats.accepted += 1;
                    samples.push(sample);
                }
                Err(reason) => {
                    trace!(index, %reason, "Record skipped");
                    stats.reject(reason);
                }
            }
        }

        debug!(
            target_month = %self.target,
            read = stats.read,
            accepted = stats.accepted,
            rejected = stats.rejected(),
            "Normalization finished"
        );

        (samples, stats)
    }

    fn extract_count(fields: &Map<String, Value>) -> Result<f64, Rejection> {
        let value = find_field(fields, COUNT_KEYS).ok_or(Rejection::MissingCount)?;
        match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|c| c.is_finite() && *c > 0.0)
                .ok_or(Rejection::InvalidCount),
            _ => Err(Rejection::InvalidCount),
        }
    }

    fn extract_site(fields: &Map<String, Value>) -> Result<SiteId, Rejection> {
        match find_field(fields, SITE_KEYS).ok_or(Rejection::MissingSite)? {
            Value::String(s) => Ok(SiteId::Text(s.clone())),
            Value::Number(n) => Ok(SiteId::Number(canonical_number(n))),
            _ => Err(Rejection::InvalidSite),
        }
    }
}

/// Text form of a numeric site id under which equal numbers group together:
/// `7` and `7.0` both become `"7"`.
fn canonical_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            format!("{}", v as i64)
        }
        _ => n.to_string(),
    }
}

// ── NormalizeStats ────────────────────────────────────────────────────────────

/// Tally of how a batch of records was normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub read: usize,
    pub accepted: usize,
    pub not_an_object: usize,
    pub missing_count: usize,
    pub invalid_count: usize,
    pub missing_timestamp: usize,
    pub invalid_timestamp: usize,
    pub outside_month: usize,
    pub missing_site: usize,
    pub invalid_site: usize,
}

impl NormalizeStats {
    fn reject(&mut self, reason: Rejection) {
        let slot = match reason {
            Rejection::NotAnObject => &mut self.not_an_object,
            Rejection::MissingCount => &mut self.missing_count,
            Rejection::InvalidCount => &mut self.invalid_count,
            Rejection::MissingTimestamp => &mut self.missing_timestamp,
            Rejection::InvalidTimestamp => &mut self.invalid_timestamp,
            Rejection::OutsideMonth => &mut self.outside_month,
            Rejection::MissingSite => &mut self.missing_site,
            Rejection::InvalidSite => &mut self.invalid_site,
        };
        *slot += 1;
    }

    /// Total number of records excluded for any reason.
    pub fn rejected(&self) -> usize {
        self.read - self.accepted
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
