//! PNG line chart of the cross-site daily averages.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;
use traffic_core::error::{Result, TrafficError};
use traffic_core::models::{DayAverage, TargetMonth};

/// 9 × 5 inches at 150 dpi.
pub const CHART_SIZE: (u32, u32) = (1350, 750);

const LINE_COLOR: RGBColor = RGBColor(0x3b, 0x82, 0xf6);
const MARKER_RADIUS: i32 = 5;

/// Chart title for `target`.
pub fn chart_title(target: TargetMonth) -> String {
    format!(
        "Average Hourly Traffic Across Sites by Day ({})",
        target.label()
    )
}

/// `(day_of_month, average)` points in plotting order.
pub fn series_points(days: &[DayAverage]) -> Vec<(u32, f64)> {
    days.iter().map(|d| (d.day_of_month(), d.average)).collect()
}

/// X axis range with one day of padding on each side.
pub fn x_range(points: &[(u32, f64)]) -> Range<u32> {
    let first = points.iter().map(|p| p.0).min().unwrap_or(1);
    let last = points.iter().map(|p| p.0).max().unwrap_or(1);
    first.saturating_sub(1)..last + 1
}

/// Y axis range padded by 5% of the span, or of the value when flat.
pub fn y_range(points: &[(u32, f64)]) -> Range<f64> {
    let lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else if hi.abs() > 0.0 {
        hi.abs() * 0.05
    } else {
        1.0
    };
    (lo - pad)..(hi + pad)
}

/// X tick label for `x`: the day number when a point sits on it, blank otherwise.
pub fn day_tick_label(points: &[(u32, f64)], x: u32) -> String {
    if points.iter().any(|p| p.0 == x) {
        x.to_string()
    } else {
        String::new()
    }
}

fn chart_err<E: std::error::Error>(err: E) -> TrafficError {
    TrafficError::Chart(err.to_string())
}

/// Draw the day series as a line with circle markers and write it to `path`.
///
/// # Errors
///
/// [`TrafficError::Chart`] when `days` is empty or the backend fails.
pub fn render_line_chart(path: &Path, target: TargetMonth, days: &[DayAverage]) -> Result<()> {
    if days.is_empty() {
        return Err(TrafficError::Chart("no days to plot".to_string()));
    }

    let points = series_points(days);
    let x = x_range(&points);
    let x_labels = (x.end - x.start + 1) as usize;
    let x_label_formatter = |day: &u32| day_tick_label(&points, *day);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(target), ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x, y_range(&points))
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(x_labels)
        .x_label_formatter(&x_label_formatter)
        .x_desc("Day of month")
        .y_desc("Average hourly traffic (counts/hour)")
        .bold_line_style(BLACK.mix(0.25))
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.clone(), LINE_COLOR.stroke_width(2)))
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), MARKER_RADIUS, LINE_COLOR.filled())),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!(path = %path.display(), points = points.len(), "Chart written");
    Ok(())
}
