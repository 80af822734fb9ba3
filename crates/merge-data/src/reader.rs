//! JSON document loading for health-merge.
//!
//! Reads the sleep and workout documents, pulls out their record lists and
//! runs every record through the validator. Only file- and document-level
//! problems are errors here; bad records come back as rejections.

use std::path::Path;

use merge_core::error::{json_type_name, MergeError, Result};
use merge_core::models::{RecordKind, SleepSession, WorkoutEvent};
use merge_core::validation::{RecordValidator, Rejection, ValidationReport};
use serde_json::Value;
use tracing::{debug, info, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and parse a JSON document from `path`.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| MergeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content)?;
    debug!("Parsed {} ({} bytes)", path.display(), content.len());
    Ok(document)
}

/// Return the record list stored under `key` at the top level of `document`.
pub fn extract_records<'a>(document: &'a Value, key: &str) -> Result<&'a [Value]> {
    let object = document
        .as_object()
        .ok_or_else(|| MergeError::InvalidDocument(json_type_name(document).to_string()))?;

    match object.get(key) {
        None => Err(MergeError::MissingKey {
            key: key.to_string(),
        }),
        Some(Value::Array(records)) => Ok(records.as_slice()),
        Some(other) => Err(MergeError::InvalidRecordList {
            key: key.to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

/// Validate a sleep document's `records` list, logging every rejection.
pub fn validate_sleep_records(records: &[Value]) -> ValidationReport<SleepSession> {
    let report = RecordValidator::validate_sleep_batch(records);
    log_report(RecordKind::Sleep, report.accepted.len(), &report.rejected);
    report
}

/// Validate a workout document's `workout_log` list, logging every rejection.
pub fn validate_workout_records(records: &[Value]) -> ValidationReport<WorkoutEvent> {
    let report = RecordValidator::validate_workout_batch(records);
    log_report(RecordKind::Workout, report.accepted.len(), &report.rejected);

    let crossings = report
        .accepted
        .iter()
        .filter(|w| w.crossed_day_boundary())
        .count();
    debug!("{} workouts crossed a day boundary after UTC conversion", crossings);

    report
}

/// Load and validate the sleep document at `path`.
pub fn load_sleep_sessions(path: &Path) -> Result<ValidationReport<SleepSession>> {
    let document = load_document(path)?;
    let records = extract_records(&document, RecordKind::Sleep.document_key())?;
    Ok(validate_sleep_records(records))
}

/// Load and validate the workout document at `path`.
pub fn load_workout_events(path: &Path) -> Result<ValidationReport<WorkoutEvent>> {
    let document = load_document(path)?;
    let records = extract_records(&document, RecordKind::Workout.document_key())?;
    Ok(validate_workout_records(records))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn log_report(kind: RecordKind, accepted: usize, rejected: &[Rejection]) {
    for rejection in rejected {
        warn!("Skipping {}", rejection);
    }
    info!(
        "Validated {} {} records: {} accepted, {} rejected",
        accepted + rejected.len(),
        kind,
        accepted,
        rejected.len()
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── load_document ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_document_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_document(&dir.path().join("absent.json")).unwrap_err();
        match err {
            MergeError::FileRead { path, .. } => assert!(path.ends_with("absent.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_document_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_json(dir.path(), "bad.json", "{ \"records\": [");
        assert!(matches!(
            load_document(&path).unwrap_err(),
            MergeError::JsonParse(_)
        ));
    }

    // ── extract_records ───────────────────────────────────────────────────────

    #[test]
    fn test_extract_records_present() {
        let doc = json!({ "records": [ {"a": 1}, {"a": 2} ] });
        assert_eq!(extract_records(&doc, "records").unwrap().len(), 2);
    }

    #[test]
    fn test_extract_records_missing_key() {
        let doc = json!({ "entries": [] });
        assert!(matches!(
            extract_records(&doc, "workout_log").unwrap_err(),
            MergeError::MissingKey { key } if key == "workout_log"
        ));
    }

    #[test]
    fn test_extract_records_not_a_list() {
        let doc = json!({ "records": { "sleep_start": "x" } });
        match extract_records(&doc, "records").unwrap_err() {
            MergeError::InvalidRecordList { key, found } => {
                assert_eq!(key, "records");
                assert_eq!(found, "object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_records_top_level_array() {
        let doc = json!([1, 2, 3]);
        assert!(matches!(
            extract_records(&doc, "records").unwrap_err(),
            MergeError::InvalidDocument(found) if found == "list"
        ));
    }

    // ── load_sleep_sessions / load_workout_events ─────────────────────────────

    #[test]
    fn test_load_sleep_sessions_partial_failure() {
        let dir = TempDir::new().unwrap();
        let content = json!({
            "records": [
                {
                    "sleep_start": "2023-10-01T00:30:00Z",
                    "sleep_end": "2023-10-01T08:30:00Z",
                    "duration_hours": 8.0,
                    "quality_score": 85
                },
                {
                    "sleep_start": "2023-10-02T00:30:00Z",
                    "sleep_end": "2023-10-02T05:00:00Z",
                    "duration_hours": 4.5,
                    "quality_score": 150
                }
            ]
        })
        .to_string();
        let path = write_json(dir.path(), "sleep.json", &content);

        let report = load_sleep_sessions(&path).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert!(report.rejected[0]
            .reason
            .to_string()
            .contains("quality_score"));
    }

    #[test]
    fn test_load_workout_events_wrong_key_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_json(dir.path(), "workouts.json", r#"{ "records": [] }"#);
        assert!(matches!(
            load_workout_events(&path).unwrap_err(),
            MergeError::MissingKey { .. }
        ));
    }

    #[test]
    fn test_load_workout_events_all_valid() {
        let dir = TempDir::new().unwrap();
        let content = json!({
            "workout_log": [
                {
                    "id": "w1",
                    "timestamp": "2023-10-01 23:15:00",
                    "tz": "America/Los_Angeles",
                    "type": "run",
                    "duration_min": 30,
                    "calories": 300
                }
            ]
        })
        .to_string();
        let path = write_json(dir.path(), "workouts.json", &content);

        let report = load_workout_events(&path).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert!(!report.has_rejections());
        assert!(report.accepted[0].crossed_day_boundary());
    }

    #[test]
    fn test_validate_records_empty_list() {
        assert_eq!(validate_sleep_records(&[]).total(), 0);
        assert_eq!(validate_workout_records(&[]).total(), 0);
    }
}
