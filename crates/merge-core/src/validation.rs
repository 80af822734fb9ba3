//! Per-record validation for sleep and workout input documents.
//!
//! Every record produces a [`ValidationOutcome`]; a bad record is rejected
//! with its input index and a reason, and never stops the rest of a batch.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::json_type_name;
use crate::models::{RecordKind, SleepSession, WorkoutEvent};
use crate::time_utils::{TemporalNormalizer, TimeError, ZoneResolver};

/// Fields every sleep record must carry, in reporting order.
pub const SLEEP_REQUIRED_FIELDS: &[&str] =
    &["sleep_start", "sleep_end", "duration_hours", "quality_score"];

/// Fields every workout record must carry, in reporting order.
pub const WORKOUT_REQUIRED_FIELDS: &[&str] =
    &["id", "timestamp", "tz", "type", "duration_min", "calories"];

pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_QUALITY_SCORE: i64 = 100;
/// 24 hours.
pub const MAX_WORKOUT_MINUTES: i64 = 1440;
/// Upper bound for a single workout's calories. Keeps every daily and
/// dataset total far below `u64::MAX`.
pub const MAX_WORKOUT_CALORIES: i64 = 100_000;

// ── Outcome types ─────────────────────────────────────────────────────────────

/// Why a single record was rejected. `Display` is the reported reason.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectReason {
    #[error("record is not a JSON object (got {0})")]
    NotAnObject(String),

    #[error("missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<String> },

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("sleep_end ({end}) is before sleep_start ({start})")]
    EndBeforeStart { start: String, end: String },

    #[error("invalid value for {field}: expected {expected}, got {actual}")]
    InvalidValue {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        actual: String,
    },

    #[error("{field} must be non-negative, got {actual}")]
    Negative { field: String, actual: String },
}

/// A rejected record: where it was in its input list and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub kind: RecordKind,
    /// 0-based position in the input record list.
    pub index: usize,
    pub reason: RejectReason,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} record {}: {}", self.kind, self.index, self.reason)
    }
}

/// Result of validating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> ValidationOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }
}

/// Accepted and rejected records of one input list, both in input order.
///
/// `accepted.len() + rejected.len()` always equals the number of outcomes
/// pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Default for ValidationReport<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> ValidationReport<T> {
    pub fn push(&mut self, outcome: ValidationOutcome<T>) {
        match outcome {
            ValidationOutcome::Accepted(value) => self.accepted.push(value),
            ValidationOutcome::Rejected(rejection) => self.rejected.push(rejection),
        }
    }

    /// Number of records seen, accepted or not.
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

impl<T> FromIterator<ValidationOutcome<T>> for ValidationReport<T> {
    fn from_iter<I: IntoIterator<Item = ValidationOutcome<T>>>(iter: I) -> Self {
        let mut report = Self::default();
        for outcome in iter {
            report.push(outcome);
        }
        report
    }
}

// ── RecordValidator ───────────────────────────────────────────────────────────

/// Stateless validator. Pure: no I/O and no logging.
pub struct RecordValidator;

impl RecordValidator {
    pub fn validate_sleep(record: &Value, index: usize) -> ValidationOutcome<SleepSession> {
        outcome(RecordKind::Sleep, index, check_sleep(record))
    }

    pub fn validate_workout(record: &Value, index: usize) -> ValidationOutcome<WorkoutEvent> {
        outcome(RecordKind::Workout, index, check_workout(record))
    }

    /// Validate every element of a sleep `records` list.
    pub fn validate_sleep_batch(records: &[Value]) -> ValidationReport<SleepSession> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| Self::validate_sleep(record, index))
            .collect()
    }

    /// Validate every element of a `workout_log` list.
    pub fn validate_workout_batch(records: &[Value]) -> ValidationReport<WorkoutEvent> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| Self::validate_workout(record, index))
            .collect()
    }
}

fn outcome<T>(
    kind: RecordKind,
    index: usize,
    result: Result<T, RejectReason>,
) -> ValidationOutcome<T> {
    match result {
        Ok(value) => ValidationOutcome::Accepted(value),
        Err(reason) => ValidationOutcome::Rejected(Rejection {
            kind,
            index,
            reason,
        }),
    }
}

// ── Per-kind checks ───────────────────────────────────────────────────────────

fn check_sleep(record: &Value) -> Result<SleepSession, RejectReason> {
    let obj = as_object(record)?;
    require_fields(obj, SLEEP_REQUIRED_FIELDS)?;

    let start_text = utc_text(&obj["sleep_start"])?;
    let end_text = utc_text(&obj["sleep_end"])?;
    let start = TemporalNormalizer::parse_utc(start_text)?;
    let end = TemporalNormalizer::parse_utc(end_text)?;
    if end < start {
        return Err(RejectReason::EndBeforeStart {
            start: start_text.to_string(),
            end: end_text.to_string(),
        });
    }

    let duration_hours = number_field(obj, "duration_hours")?;
    if !(0.0..=MAX_SLEEP_HOURS).contains(&duration_hours) {
        return Err(out_of_range("duration_hours", 0, MAX_SLEEP_HOURS, duration_hours));
    }

    let quality = integer_field(obj, "quality_score")?;
    if !(0..=MAX_QUALITY_SCORE).contains(&quality) {
        return Err(out_of_range("quality_score", 0, MAX_QUALITY_SCORE, quality));
    }

    Ok(SleepSession::new(start, end, duration_hours, quality as u8))
}

fn check_workout(record: &Value) -> Result<WorkoutEvent, RejectReason> {
    let obj = as_object(record)?;
    require_fields(obj, WORKOUT_REQUIRED_FIELDS)?;

    let zone_id = match &obj["tz"] {
        Value::String(s) => s.as_str(),
        other => return Err(TimeError::UnknownZone(other.to_string()).into()),
    };
    let tz = ZoneResolver::resolve(zone_id)?;

    let timestamp = match &obj["timestamp"] {
        Value::String(s) => s.as_str(),
        other => {
            return Err(TimeError::InvalidLocalTimestamp {
                value: other.to_string(),
                detail: format!("expected a string, got {}", json_type_name(other)),
            }
            .into())
        }
    };
    let normalized = TemporalNormalizer::normalize(timestamp, tz)?;

    let duration = integer_field(obj, "duration_min")?;
    if !(0..=MAX_WORKOUT_MINUTES).contains(&duration) {
        return Err(out_of_range("duration_min", 0, MAX_WORKOUT_MINUTES, duration));
    }

    let calories = integer_field(obj, "calories")?;
    if calories < 0 {
        return Err(RejectReason::Negative {
            field: "calories".to_string(),
            actual: calories.to_string(),
        });
    }
    if calories > MAX_WORKOUT_CALORIES {
        return Err(out_of_range("calories", 0, MAX_WORKOUT_CALORIES, calories));
    }

    let id = text_field(obj, "id")?;
    let kind = text_field(obj, "type")?;

    Ok(WorkoutEvent::new(
        id,
        normalized,
        timestamp,
        zone_id,
        kind,
        duration as u32,
        calories as u64,
    ))
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn as_object(record: &Value) -> Result<&Map<String, Value>, RejectReason> {
    record
        .as_object()
        .ok_or_else(|| RejectReason::NotAnObject(json_type_name(record).to_string()))
}

/// Report every absent field at once. `null` counts as absent.
fn require_fields(obj: &Map<String, Value>, required: &[&str]) -> Result<(), RejectReason> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| obj.get(**field).map_or(true, Value::is_null))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RejectReason::MissingFields { missing })
    }
}

fn utc_text(value: &Value) -> Result<&str, TimeError> {
    value.as_str().ok_or_else(|| TimeError::InvalidUtcTimestamp {
        value: value.to_string(),
        detail: format!("expected a string, got {}", json_type_name(value)),
    })
}

/// A finite number, given either as a JSON number or a numeric string.
fn number_field(obj: &Map<String, Value>, field: &str) -> Result<f64, RejectReason> {
    let value = &obj[field];
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid_value(field, "a number", value))
}

/// An integer; integral floats (`85.0`) and numeric strings are accepted.
fn integer_field(obj: &Map<String, Value>, field: &str) -> Result<i64, RejectReason> {
    let value = &obj[field];
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    parsed.ok_or_else(|| invalid_value(field, "an integer", value))
}

fn integral(f: f64) -> Option<i64> {
    let in_range = f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64;
    in_range.then_some(f as i64)
}

/// Free-form text; numbers are rendered as their JSON text.
fn text_field(obj: &Map<String, Value>, field: &str) -> Result<String, RejectReason> {
    match &obj[field] {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid_value(field, "a string or number", other)),
    }
}

fn invalid_value(field: &str, expected: &str, actual: &Value) -> RejectReason {
    RejectReason::InvalidValue {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn out_of_range(
    field: &str,
    min: impl ToString,
    max: impl ToString,
    actual: impl ToString,
) -> RejectReason {
    RejectReason::OutOfRange {
        field: field.to_string(),
        min: min.to_string(),
        max: max.to_string(),
        actual: actual.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sleep_record() -> Value {
        json!({
            "sleep_start": "2023-10-01T00:30:00Z",
            "sleep_end": "2023-10-01T08:30:00Z",
            "duration_hours": 8.0,
            "quality_score": 85
        })
    }

    fn workout_record() -> Value {
        json!({
            "id": "w1",
            "timestamp": "2023-10-01 08:30:00",
            "tz": "America/Los_Angeles",
            "type": "run",
            "duration_min": 45,
            "calories": 420
        })
    }

    fn with(mut record: Value, field: &str, value: Value) -> Value {
        record[field] = value;
        record
    }

    fn without(mut record: Value, field: &str) -> Value {
        record.as_object_mut().unwrap().remove(field);
        record
    }

    fn sleep_reason(record: &Value) -> RejectReason {
        match RecordValidator::validate_sleep(record, 0) {
            ValidationOutcome::Rejected(r) => r.reason,
            ValidationOutcome::Accepted(s) => panic!("expected rejection, got {s:?}"),
        }
    }

    fn workout_reason(record: &Value) -> RejectReason {
        match RecordValidator::validate_workout(record, 0) {
            ValidationOutcome::Rejected(r) => r.reason,
            ValidationOutcome::Accepted(w) => panic!("expected rejection, got {w:?}"),
        }
    }

    // ── sleep ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_sleep_is_accepted() {
        match RecordValidator::validate_sleep(&sleep_record(), 0) {
            ValidationOutcome::Accepted(s) => {
                assert_eq!(
                    s.attribution_date(),
                    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()
                );
                assert_eq!(s.duration_hours(), 8.0);
                assert_eq!(s.quality_score(), 85);
            }
            ValidationOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_sleep_missing_fields_lists_all() {
        let record = json!({ "sleep_start": "2023-10-01T00:30:00Z" });
        let reason = sleep_reason(&record);
        assert_eq!(
            reason.to_string(),
            "missing required fields: sleep_end, duration_hours, quality_score"
        );
    }

    #[test]
    fn test_sleep_null_field_counts_as_missing() {
        let record = with(sleep_record(), "quality_score", Value::Null);
        assert_eq!(
            sleep_reason(&record),
            RejectReason::MissingFields {
                missing: vec!["quality_score".to_string()]
            }
        );
    }

    #[test]
    fn test_sleep_timestamp_without_designator() {
        let record = with(sleep_record(), "sleep_end", json!("2023-10-01T08:30:00"));
        let reason = sleep_reason(&record);
        assert!(reason.to_string().starts_with("invalid timestamp format"));
    }

    #[test]
    fn test_sleep_timestamp_not_a_string() {
        let record = with(sleep_record(), "sleep_start", json!(1696120200));
        assert!(matches!(
            sleep_reason(&record),
            RejectReason::Time(TimeError::InvalidUtcTimestamp { .. })
        ));
    }

    #[test]
    fn test_sleep_end_before_start() {
        let record = with(sleep_record(), "sleep_end", json!("2023-09-30T23:00:00Z"));
        assert!(matches!(
            sleep_reason(&record),
            RejectReason::EndBeforeStart { .. }
        ));
    }

    #[test]
    fn test_sleep_zero_length_is_accepted() {
        let record = with(sleep_record(), "sleep_end", json!("2023-10-01T00:30:00Z"));
        assert!(RecordValidator::validate_sleep(&record, 0).is_accepted());
    }

    #[test]
    fn test_sleep_duration_out_of_range() {
        let record = with(sleep_record(), "duration_hours", json!(25.5));
        assert_eq!(
            sleep_reason(&record).to_string(),
            "duration_hours must be between 0 and 24, got 25.5"
        );
        let record = with(sleep_record(), "duration_hours", json!(-1));
        assert!(matches!(
            sleep_reason(&record),
            RejectReason::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_sleep_duration_boundaries_accepted() {
        for hours in [json!(0), json!(24), json!(23.99)] {
            let record = with(sleep_record(), "duration_hours", hours);
            assert!(RecordValidator::validate_sleep(&record, 0).is_accepted());
        }
    }

    #[test]
    fn test_sleep_duration_numeric_string_accepted() {
        let record = with(sleep_record(), "duration_hours", json!("7.5"));
        match RecordValidator::validate_sleep(&record, 0) {
            ValidationOutcome::Accepted(s) => assert_eq!(s.duration_hours(), 7.5),
            ValidationOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_sleep_duration_not_numeric() {
        let record = with(sleep_record(), "duration_hours", json!("eight"));
        assert_eq!(
            sleep_reason(&record).to_string(),
            "invalid value for duration_hours: expected a number, got \"eight\""
        );
    }

    #[test]
    fn test_sleep_quality_out_of_range() {
        let record = with(sleep_record(), "quality_score", json!(101));
        assert_eq!(
            sleep_reason(&record).to_string(),
            "quality_score must be between 0 and 100, got 101"
        );
    }

    #[test]
    fn test_sleep_quality_must_be_integral() {
        let record = with(sleep_record(), "quality_score", json!(85.5));
        assert!(matches!(
            sleep_reason(&record),
            RejectReason::InvalidValue { .. }
        ));
        let record = with(sleep_record(), "quality_score", json!(85.0));
        assert!(RecordValidator::validate_sleep(&record, 0).is_accepted());
    }

    #[test]
    fn test_sleep_non_object_rejected() {
        assert_eq!(
            sleep_reason(&json!([1, 2, 3])).to_string(),
            "record is not a JSON object (got list)"
        );
    }

    // ── workout ───────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_workout_is_accepted() {
        match RecordValidator::validate_workout(&workout_record(), 3) {
            ValidationOutcome::Accepted(w) => {
                assert_eq!(w.id(), "w1");
                assert_eq!(w.kind(), "run");
                assert_eq!(w.original_timestamp(), "2023-10-01 08:30:00");
                assert_eq!(w.original_zone(), "America/Los_Angeles");
                assert_eq!(w.duration_minutes(), 45);
                assert_eq!(w.calories(), 420);
                assert!(!w.crossed_day_boundary());
            }
            ValidationOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_workout_missing_fields_lists_all() {
        let record = without(without(workout_record(), "tz"), "calories");
        assert_eq!(
            workout_reason(&record).to_string(),
            "missing required fields: tz, calories"
        );
    }

    #[test]
    fn test_workout_bad_timezone_reports_zone() {
        let record = with(workout_record(), "tz", json!("Bad/Timezone"));
        let reason = workout_reason(&record);
        assert!(reason.to_string().contains("'Bad/Timezone'"));
        assert_eq!(
            reason,
            RejectReason::Time(TimeError::UnknownZone("Bad/Timezone".to_string()))
        );
    }

    #[test]
    fn test_workout_timezone_checked_before_timestamp() {
        let record = with(
            with(workout_record(), "tz", json!("Nowhere/City")),
            "timestamp",
            json!("garbage"),
        );
        assert!(matches!(
            workout_reason(&record),
            RejectReason::Time(TimeError::UnknownZone(_))
        ));
    }

    #[test]
    fn test_workout_timestamp_with_offset_rejected() {
        let record = with(workout_record(), "timestamp", json!("2023-10-01T08:30:00-07:00"));
        assert!(matches!(
            workout_reason(&record),
            RejectReason::Time(TimeError::InvalidLocalTimestamp { .. })
        ));
    }

    #[test]
    fn test_workout_spring_forward_gap_rejected() {
        let record = with(workout_record(), "timestamp", json!("2024-03-10 02:30:00"));
        let reason = workout_reason(&record);
        assert!(matches!(
            reason,
            RejectReason::Time(TimeError::NonexistentLocalTime { .. })
        ));
        assert!(reason.to_string().contains("does not exist"));
    }

    #[test]
    fn test_workout_duration_out_of_range() {
        let record = with(workout_record(), "duration_min", json!(1441));
        assert_eq!(
            workout_reason(&record).to_string(),
            "duration_min must be between 0 and 1440, got 1441"
        );
    }

    #[test]
    fn test_workout_calories_above_cap() {
        let record = with(workout_record(), "calories", json!(i64::MAX));
        assert_eq!(
            workout_reason(&record).to_string(),
            format!("calories must be between 0 and 100000, got {}", i64::MAX)
        );

        let at_cap = with(workout_record(), "calories", json!(MAX_WORKOUT_CALORIES));
        assert!(RecordValidator::validate_workout(&at_cap, 0).is_accepted());
    }

    #[test]
    fn test_workout_negative_calories() {
        let record = with(workout_record(), "calories", json!(-5));
        assert_eq!(
            workout_reason(&record).to_string(),
            "calories must be non-negative, got -5"
        );
    }

    #[test]
    fn test_workout_numeric_id_rendered_as_text() {
        let record = with(workout_record(), "id", json!(17));
        match RecordValidator::validate_workout(&record, 0) {
            ValidationOutcome::Accepted(w) => assert_eq!(w.id(), "17"),
            ValidationOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_workout_object_type_rejected() {
        let record = with(workout_record(), "type", json!({ "name": "run" }));
        assert!(matches!(
            workout_reason(&record),
            RejectReason::InvalidValue { .. }
        ));
    }

    // ── dispatch and batches ─────────────────────────────────────────────────

    #[test]
    fn test_rejection_display_includes_kind_and_index() {
        let record = with(workout_record(), "calories", json!(-1));
        match RecordValidator::validate_workout(&record, 7) {
            ValidationOutcome::Rejected(r) => {
                assert_eq!(r.index, 7);
                assert_eq!(r.kind, RecordKind::Workout);
                assert!(r.to_string().starts_with("workout record 7: "));
            }
            ValidationOutcome::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_batch_keeps_indices_and_reconciles() {
        let records = vec![
            workout_record(),
            with(workout_record(), "tz", json!("Bad/Timezone")),
            workout_record(),
            json!("not a record"),
        ];
        let report = RecordValidator::validate_workout_batch(&records);

        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.total(), records.len());
        let indices: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_sleep_batch_empty() {
        let report = RecordValidator::validate_sleep_batch(&[]);
        assert_eq!(report.total(), 0);
        assert!(!report.has_rejections());
    }
}
