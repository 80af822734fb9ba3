//! End-to-end merge pipeline.
//!
//! Extract record lists, validate each record, aggregate by UTC date and
//! run the correlation analysis, returning a [`PipelineResult`] for the
//! reporting layer.

use merge_core::error::Result;
use merge_core::models::{RecordKind, SleepSession, WorkoutEvent};
use merge_core::settings::{PipelineConfig, SleepThresholds};
use merge_core::validation::ValidationReport;
use serde_json::Value;
use tracing::info;

use crate::aggregator::{DailyAggregator, DailyMerge};
use crate::analysis::{CorrelationAnalyzer, CorrelationReport};
use crate::reader::{
    extract_records, load_document, validate_sleep_records, validate_workout_records,
};

/// Everything a single run produces.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub sleep: ValidationReport<SleepSession>,
    pub workouts: ValidationReport<WorkoutEvent>,
    pub merge: DailyMerge,
    pub correlations: CorrelationReport,
}

/// Run the pipeline over already-parsed documents.
///
/// Both documents are checked for their record lists before any record is
/// validated, so a document-level error yields no partial result.
pub fn process_documents(
    sleep_doc: &Value,
    workout_doc: &Value,
    thresholds: SleepThresholds,
) -> Result<PipelineResult> {
    let sleep_records = extract_records(sleep_doc, RecordKind::Sleep.document_key())?;
    let workout_records = extract_records(workout_doc, RecordKind::Workout.document_key())?;

    let sleep = validate_sleep_records(sleep_records);
    let workouts = validate_workout_records(workout_records);

    let merge = DailyAggregator::aggregate(&sleep.accepted, &workouts.accepted);
    info!("Created {} daily aggregates", merge.len());

    let correlations = CorrelationAnalyzer::analyze(&merge, &thresholds);

    Ok(PipelineResult {
        sleep,
        workouts,
        merge,
        correlations,
    })
}

/// Load both input files named by `config` and run the pipeline.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineResult> {
    info!(
        "Loading sleep data from {} and workouts from {}",
        config.sleep_path.display(),
        config.workouts_path.display()
    );
    let sleep_doc = load_document(&config.sleep_path)?;
    let workout_doc = load_document(&config.workouts_path)?;
    process_documents(&sleep_doc, &workout_doc, config.thresholds)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
