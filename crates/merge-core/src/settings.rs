use clap::Parser;
use std::path::PathBuf;

use crate::error::{MergeError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Merge sleep and workout logs onto a single UTC day axis
#[derive(Parser, Debug, Clone)]
#[command(
    name = "health-merge",
    about = "Merge sleep and workout logs onto a single UTC day axis",
    version
)]
pub struct Settings {
    /// Path to the sleep data JSON file
    #[arg(long, default_value = "data/sleep.json")]
    pub sleep: PathBuf,

    /// Path to the workout data JSON file
    #[arg(long, default_value = "data/workouts.json")]
    pub workouts: PathBuf,

    /// Output file path for the merged JSON data
    #[arg(long, default_value = "merged_health_data.json")]
    pub output: PathBuf,

    /// Print a per-day summary to the console
    #[arg(long)]
    pub show_summary: bool,

    /// Print the day-boundary crossing analysis
    #[arg(long)]
    pub show_boundaries: bool,

    /// Print the sleep/exercise correlation summary
    #[arg(long)]
    pub show_correlations: bool,

    /// Show all console reports (boundaries, summary, correlations)
    #[arg(long)]
    pub verbose: bool,

    /// Days with less sleep than this (hours) count as low-sleep days
    #[arg(long, default_value = "6.0")]
    pub low_sleep_hours: f64,

    /// Days with at least this much sleep (hours) count as good-sleep days
    #[arg(long, default_value = "7.0")]
    pub good_sleep_hours: f64,

    /// Logging level
    #[arg(
        long,
        env = "HEALTH_MERGE_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Log file path (logs go to stderr when omitted)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Derived configuration ─────────────────────────────────────────────────────

/// Sleep-hour cut-offs for the low / good correlation buckets.
///
/// `low` is `hours < low_below`, `good` is `hours >= good_at_least`; anything
/// in between is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepThresholds {
    pub low_below: f64,
    pub good_at_least: f64,
}

impl Default for SleepThresholds {
    fn default() -> Self {
        Self {
            low_below: 6.0,
            good_at_least: 7.0,
        }
    }
}

impl SleepThresholds {
    /// Build thresholds, requiring `0 <= low_below <= good_at_least <= 24`.
    pub fn new(low_below: f64, good_at_least: f64) -> Result<Self> {
        if !low_below.is_finite() || !good_at_least.is_finite() {
            return Err(MergeError::Config(
                "sleep thresholds must be finite numbers".to_string(),
            ));
        }
        if !(0.0..=24.0).contains(&low_below) || !(0.0..=24.0).contains(&good_at_least) {
            return Err(MergeError::Config(format!(
                "sleep thresholds must be between 0 and 24 hours, got {} and {}",
                low_below, good_at_least
            )));
        }
        if low_below > good_at_least {
            return Err(MergeError::Config(format!(
                "low-sleep threshold ({}) must not exceed good-sleep threshold ({})",
                low_below, good_at_least
            )));
        }
        Ok(Self {
            low_below,
            good_at_least,
        })
    }
}

/// Everything a pipeline run needs to locate and interpret its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub sleep_path: PathBuf,
    pub workouts_path: PathBuf,
    pub thresholds: SleepThresholds,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::parse().resolved()
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args).resolved()
    }

    fn resolved(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    pub fn wants_boundaries(&self) -> bool {
        self.verbose || self.show_boundaries
    }

    pub fn wants_summary(&self) -> bool {
        self.verbose || self.show_summary
    }

    pub fn wants_correlations(&self) -> bool {
        self.verbose || self.show_correlations
    }

    pub fn sleep_thresholds(&self) -> Result<SleepThresholds> {
        SleepThresholds::new(self.low_sleep_hours, self.good_sleep_hours)
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            sleep_path: self.sleep.clone(),
            workouts_path: self.workouts.clone(),
            thresholds: self.sleep_thresholds()?,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
