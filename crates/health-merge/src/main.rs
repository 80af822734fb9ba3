mod bootstrap;
mod report;

use anyhow::{Context, Result};
use merge_core::settings::Settings;
use merge_data::output::{build_output, write_output};
use merge_data::pipeline::run_pipeline;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("health-merge v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.pipeline_config()?;
    tracing::info!(
        "Sleep thresholds: low < {}h, good >= {}h",
        config.thresholds.low_below,
        config.thresholds.good_at_least
    );

    let result = run_pipeline(&config).context("failed to merge health data")?;

    if settings.wants_boundaries() {
        println!(
            "{}",
            report::format_boundary_analysis(&result.workouts.accepted)
        );
    }
    if settings.wants_summary() {
        println!("{}", report::format_merged_summary(&result.merge));
    }
    if settings.wants_correlations() {
        println!(
            "{}",
            report::format_correlations(&result.correlations, &config.thresholds)
        );
    }

    let rejections = report::format_rejections(&result.sleep.rejected, &result.workouts.rejected);
    if !rejections.is_empty() {
        println!("{}", rejections);
    }

    let output = build_output(&result);
    write_output(&settings.output, &output)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;

    println!(
        "Merged {} days from {} sleep sessions and {} workouts into {}",
        result.merge.len(),
        result.sleep.accepted.len(),
        result.workouts.accepted.len(),
        settings.output.display()
    );

    Ok(())
}
