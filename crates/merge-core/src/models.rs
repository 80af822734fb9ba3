use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time_utils::NormalizedInstant;

/// Which input document a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Sleep,
    Workout,
}

impl RecordKind {
    /// Top-level key that holds this kind's records in its input document.
    pub fn document_key(self) -> &'static str {
        match self {
            RecordKind::Sleep => "records",
            RecordKind::Workout => "workout_log",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Sleep => f.write_str("sleep"),
            RecordKind::Workout => f.write_str("workout"),
        }
    }
}

// ── SleepSession ──────────────────────────────────────────────────────────────

/// A validated sleep session. Both instants are already UTC.
///
/// The session counts against the UTC date of its end instant (the wake-up
/// day); the constructor derives that date so it can never drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepSession {
    attribution_date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_hours: f64,
    quality_score: u8,
}

impl SleepSession {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_hours: f64,
        quality_score: u8,
    ) -> Self {
        Self {
            attribution_date: end.date_naive(),
            start,
            end,
            duration_hours,
            quality_score,
        }
    }

    pub fn attribution_date(&self) -> NaiveDate {
        self.attribution_date
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn quality_score(&self) -> u8 {
        self.quality_score
    }

    /// The per-day view of this session.
    pub fn summary(&self) -> SleepSummary {
        SleepSummary {
            hours: self.duration_hours,
            quality: self.quality_score,
        }
    }
}

// ── WorkoutEvent ──────────────────────────────────────────────────────────────

/// A validated workout, normalized to UTC.
///
/// The original local timestamp and zone identifier are kept verbatim for
/// auditing; `id` is preserved but its uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutEvent {
    id: String,
    utc_instant: DateTime<Utc>,
    attribution_date: NaiveDate,
    original_timestamp: String,
    original_zone: String,
    kind: String,
    duration_minutes: u32,
    calories: u64,
    crossed_day_boundary: bool,
}

impl WorkoutEvent {
    pub fn new(
        id: impl Into<String>,
        normalized: NormalizedInstant,
        original_timestamp: impl Into<String>,
        original_zone: impl Into<String>,
        kind: impl Into<String>,
        duration_minutes: u32,
        calories: u64,
    ) -> Self {
        Self {
            id: id.into(),
            utc_instant: normalized.utc,
            attribution_date: normalized.attribution_date,
            original_timestamp: original_timestamp.into(),
            original_zone: original_zone.into(),
            kind: kind.into(),
            duration_minutes,
            calories,
            crossed_day_boundary: normalized.crossed_day_boundary,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn utc_instant(&self) -> DateTime<Utc> {
        self.utc_instant
    }

    pub fn attribution_date(&self) -> NaiveDate {
        self.attribution_date
    }

    pub fn original_timestamp(&self) -> &str {
        &self.original_timestamp
    }

    pub fn original_zone(&self) -> &str {
        &self.original_zone
    }

    /// Free-form workout label (the input's `type` field).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn calories(&self) -> u64 {
        self.calories
    }

    /// `true` when the local civil date differs from the UTC attribution date.
    pub fn crossed_day_boundary(&self) -> bool {
        self.crossed_day_boundary
    }
}

// ── DailyAggregate ────────────────────────────────────────────────────────────

/// Sleep figures attributed to a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepSummary {
    pub hours: f64,
    pub quality: u8,
}

/// Everything attributed to one UTC civil date.
///
/// Totals are only ever changed through [`DailyAggregate::add_workout`], so
/// they always equal the sums over `workouts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    date: NaiveDate,
    sleep: Option<SleepSummary>,
    workouts: Vec<WorkoutEvent>,
    total_calories: u64,
    total_workout_minutes: u64,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sleep: None,
            workouts: Vec::new(),
            total_calories: 0,
            total_workout_minutes: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sleep(&self) -> Option<SleepSummary> {
        self.sleep
    }

    pub fn sleep_hours(&self) -> Option<f64> {
        self.sleep.map(|s| s.hours)
    }

    pub fn sleep_quality(&self) -> Option<u8> {
        self.sleep.map(|s| s.quality)
    }

    /// Workouts in input order.
    pub fn workouts(&self) -> &[WorkoutEvent] {
        &self.workouts
    }

    pub fn total_calories(&self) -> u64 {
        self.total_calories
    }

    pub fn total_workout_minutes(&self) -> u64 {
        self.total_workout_minutes
    }

    pub fn has_workouts(&self) -> bool {
        !self.workouts.is_empty()
    }

    /// Record the day's sleep, returning whatever it replaced.
    pub fn set_sleep(&mut self, sleep: SleepSummary) -> Option<SleepSummary> {
        self.sleep.replace(sleep)
    }

    /// Append a workout and bump both totals.
    pub fn add_workout(&mut self, workout: WorkoutEvent) {
        self.total_calories += workout.calories();
        self.total_workout_minutes += u64::from(workout.duration_minutes());
        self.workouts.push(workout);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
