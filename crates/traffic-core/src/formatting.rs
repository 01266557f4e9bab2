//! Display helpers shared by the text report and the chart.

use crate::models::TargetMonth;

/// Format `value` with exactly `decimals` digits after the point and no
/// thousands grouping.
///
/// # Examples
///
/// ```
/// use traffic_core::formatting::format_decimal;
///
/// assert_eq!(format_decimal(57.5, 2), "57.50");
/// assert_eq!(format_decimal(100.0, 2), "100.00");
/// assert_eq!(format_decimal(1.0 / 3.0, 2), "0.33");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    format!("{:.prec$}", value, prec = decimals)
}

/// Round `value` to `decimals` places for machine-readable output.
///
/// # Examples
///
/// ```
/// use traffic_core::formatting::round_to;
///
/// assert_eq!(round_to(12.345678, 2), 12.35);
/// assert_eq!(round_to(57.5, 2), 57.5);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Name of the chart image for `target`.
///
/// The month is written without zero padding.
///
/// # Examples
///
/// ```
/// use traffic_core::formatting::chart_file_name;
/// use traffic_core::models::TargetMonth;
///
/// assert_eq!(
///     chart_file_name(TargetMonth::new(2022, 7)),
///     "daily_avg_hourly_across_sites_2022_7.png"
/// );
/// ```
pub fn chart_file_name(target: TargetMonth) -> String {
    format!(
        "daily_avg_hourly_across_sites_{}_{}.png",
        target.year, target.month
    )
}

/// Header line of the text report, e.g. `"Month 2022-07"`.
pub fn month_header(target: TargetMonth) -> String {
    format!("Month {}", target.label())
}
