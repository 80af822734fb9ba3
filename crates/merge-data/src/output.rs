//! Serializable view of a pipeline run, written as the merged JSON file.
//!
//! Instants become ISO 8601 strings with a `Z` designator here and nowhere
//! earlier. The document carries no run timestamps, so the same inputs always
//! render to the same bytes.

use std::path::Path;

use merge_core::error::{MergeError, Result};
use merge_core::formatting::round_to;
use merge_core::models::{DailyAggregate, WorkoutEvent};
use merge_core::time_utils::format_instant;
use merge_core::validation::{Rejection, ValidationReport};
use serde::Serialize;
use tracing::info;

use crate::analysis::{BucketStats, CorrelationReport};
use crate::pipeline::PipelineResult;

/// Decimal places kept for the averages in the output document.
const AVG_DECIMALS: u32 = 2;

// ── Output document ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedOutput {
    pub metadata: OutputMetadata,
    pub record_counts: RecordCounts,
    pub daily_summary: Vec<DaySummary>,
    pub correlations: CorrelationSummary,
    pub rejections: RejectionLists,
    /// Dates where a later sleep session replaced an earlier one.
    pub sleep_overwrites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputMetadata {
    pub total_days: usize,
    /// `null` when no day has any data.
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputCounts {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl<T> From<&ValidationReport<T>> for InputCounts {
    fn from(report: &ValidationReport<T>) -> Self {
        Self {
            total: report.total(),
            accepted: report.accepted.len(),
            rejected: report.rejected.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub sleep: InputCounts,
    pub workouts: InputCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub sleep_hours: Option<f64>,
    pub sleep_quality: Option<u8>,
    pub workouts: Vec<WorkoutSummary>,
    pub workout_count: usize,
    pub total_calories: u64,
    pub total_workout_minutes: u64,
}

impl From<&DailyAggregate> for DaySummary {
    fn from(day: &DailyAggregate) -> Self {
        Self {
            date: day.date().format("%Y-%m-%d").to_string(),
            sleep_hours: day.sleep_hours(),
            sleep_quality: day.sleep_quality(),
            workouts: day.workouts().iter().map(WorkoutSummary::from).collect(),
            workout_count: day.workouts().len(),
            total_calories: day.total_calories(),
            total_workout_minutes: day.total_workout_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub id: String,
    pub timestamp_utc: String,
    pub original_timestamp: String,
    pub original_timezone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_min: u32,
    pub calories: u64,
    pub crossed_day_boundary: bool,
}

impl From<&WorkoutEvent> for WorkoutSummary {
    fn from(w: &WorkoutEvent) -> Self {
        Self {
            id: w.id().to_string(),
            timestamp_utc: format_instant(&w.utc_instant()),
            original_timestamp: w.original_timestamp().to_string(),
            original_timezone: w.original_zone().to_string(),
            kind: w.kind().to_string(),
            duration_min: w.duration_minutes(),
            calories: w.calories(),
            crossed_day_boundary: w.crossed_day_boundary(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketSummary {
    pub count: usize,
    pub avg_calories_burned: f64,
    pub avg_workout_minutes: f64,
    pub workout_rate: f64,
}

impl From<&BucketStats> for BucketSummary {
    fn from(stats: &BucketStats) -> Self {
        Self {
            count: stats.count,
            avg_calories_burned: round_to(stats.avg_calories_burned, AVG_DECIMALS),
            avg_workout_minutes: round_to(stats.avg_workout_minutes, AVG_DECIMALS),
            workout_rate: round_to(stats.workout_rate, AVG_DECIMALS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationSummary {
    pub low_sleep_days: BucketSummary,
    pub good_sleep_days: BucketSummary,
    pub neutral_sleep_days: usize,
    pub days_without_sleep: usize,
    pub day_boundary_crossings: usize,
}

impl From<&CorrelationReport> for CorrelationSummary {
    fn from(report: &CorrelationReport) -> Self {
        Self {
            low_sleep_days: BucketSummary::from(&report.low),
            good_sleep_days: BucketSummary::from(&report.good),
            neutral_sleep_days: report.neutral_count,
            days_without_sleep: report.days_without_sleep,
            day_boundary_crossings: report.boundary_crossing_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionEntry {
    pub index: usize,
    pub reason: String,
}

impl From<&Rejection> for RejectionEntry {
    fn from(rejection: &Rejection) -> Self {
        Self {
            index: rejection.index,
            reason: rejection.reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionLists {
    pub sleep: Vec<RejectionEntry>,
    pub workouts: Vec<RejectionEntry>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Build the output document for a finished pipeline run.
pub fn build_output(result: &PipelineResult) -> MergedOutput {
    MergedOutput {
        metadata: OutputMetadata {
            total_days: result.merge.len(),
            date_range: result.merge.date_range().map(|(start, end)| DateRange {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            }),
        },
        record_counts: RecordCounts {
            sleep: InputCounts::from(&result.sleep),
            workouts: InputCounts::from(&result.workouts),
        },
        daily_summary: result.merge.days().map(DaySummary::from).collect(),
        correlations: CorrelationSummary::from(&result.correlations),
        rejections: RejectionLists {
            sleep: result.sleep.rejected.iter().map(RejectionEntry::from).collect(),
            workouts: result
                .workouts
                .rejected
                .iter()
                .map(RejectionEntry::from)
                .collect(),
        },
        sleep_overwrites: result
            .merge
            .sleep_overwrites()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
    }
}

/// Pretty-printed JSON for `output`.
pub fn render_json(output: &MergedOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Write `output` to `path` as pretty-printed JSON.
pub fn write_output(path: &Path, output: &MergedOutput) -> Result<()> {
    let json = render_json(output)?;
    std::fs::write(path, json).map_err(|source| MergeError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("JSON output saved to {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
