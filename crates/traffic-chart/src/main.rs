mod bootstrap;

use anyhow::{Context, Result};
use traffic_core::settings::{is_missing_arguments, usage_line, Settings};
use traffic_data::analysis::analyze_month;
use traffic_report::Reporter;

fn main() -> Result<()> {
    let settings = match Settings::from_args(std::env::args_os()) {
        Ok(settings) => settings,
        Err(err) if is_missing_arguments(&err) => {
            println!("{}", usage_line());
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("traffic-chart v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        input = %settings.input.display(),
        target_month = %settings.target(),
        "Analysing export"
    );

    let analysis = analyze_month(&settings.input, settings.target())
        .with_context(|| format!("Failed to analyse {}", settings.input.display()))?;

    let reporter = Reporter::new(
        settings.output_dir.clone(),
        settings.format,
        !settings.no_chart,
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    reporter
        .report(&analysis, &mut out)
        .context("Failed to write report")?;

    Ok(())
}
