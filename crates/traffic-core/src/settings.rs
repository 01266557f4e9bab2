use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::models::TargetMonth;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// How the summary is written to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary lines
    Text,
    /// One pretty-printed JSON document
    Json,
}

/// Daily average hourly traffic across sites for one month
#[derive(Parser, Debug, Clone)]
#[command(
    name = "traffic-chart",
    about = "Daily average hourly traffic across sites for one month",
    version
)]
pub struct Settings {
    /// Raw counts export (JSON array of records)
    #[arg(value_name = "FULL_RAW_COUNTS_JSON")]
    pub input: PathBuf,

    /// Four-digit year
    pub year: i32,

    /// Month number (1-12)
    pub month: u32,

    /// Directory the chart image is written to (default: current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print statistics only, do not render the chart
    #[arg(long)]
    pub no_chart: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse an explicit argument list (first item is the program name).
    ///
    /// `--debug` is folded into `log_level` here so callers only look at one
    /// field.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut settings = Settings::try_parse_from(args)?;
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        Ok(settings)
    }

    /// The month this run is restricted to.
    pub fn target(&self) -> TargetMonth {
        TargetMonth::new(self.year, self.month)
    }
}

/// One-line usage shown when positional arguments are missing.
pub fn usage_line() -> &'static str {
    "usage: traffic-chart <full_raw_counts.json> <year> <month>"
}

/// `true` when `err` means "not enough positional arguments", which is
/// reported with [`usage_line`] instead of clap's own diagnostic.
pub fn is_missing_arguments(err: &clap::Error) -> bool {
    err.kind() == ErrorKind::MissingRequiredArgument
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_positional_arguments() {
        let settings = Settings::from_args(["traffic-chart", "counts.json", "2022", "7"]).unwrap();

        assert_eq!(settings.input, PathBuf::from("counts.json"));
        assert_eq!(settings.target(), TargetMonth::new(2022, 7));
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::from_args(["traffic-chart", "counts.json", "2022", "7"]).unwrap();

        assert!(settings.output_dir.is_none());
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(!settings.no_chart);
        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_missing_positionals_is_usage_error() {
        for args in [
            vec!["traffic-chart"],
            vec!["traffic-chart", "counts.json"],
            vec!["traffic-chart", "counts.json", "2022"],
        ] {
            let err = Settings::from_args(args).unwrap_err();
            assert!(is_missing_arguments(&err));
        }
    }

    #[test]
    fn test_settings_non_numeric_year_is_not_usage_error() {
        let err = Settings::from_args(["traffic-chart", "counts.json", "twenty", "7"]).unwrap_err();
        assert!(!is_missing_arguments(&err));
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_settings_month_not_range_checked() {
        let settings = Settings::from_args(["traffic-chart", "counts.json", "2022", "13"]).unwrap();
        assert_eq!(settings.month, 13);
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings =
            Settings::from_args(["traffic-chart", "counts.json", "2022", "7", "--debug"]).unwrap();
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_settings_options() {
        let settings = Settings::from_args([
            "traffic-chart",
            "counts.json",
            "2022",
            "7",
            "--output-dir",
            "/tmp/charts",
            "--format",
            "json",
            "--no-chart",
            "--log-level",
            "INFO",
        ])
        .unwrap();

        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/charts")));
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.no_chart);
        assert_eq!(settings.log_level, "INFO");
    }
}
