//! Grouping of validated sleep and workout records by UTC attribution date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use merge_core::models::{DailyAggregate, SleepSession, WorkoutEvent};
use merge_core::time_utils::format_instant;
use tracing::{debug, warn};

// ── MergeTotals ───────────────────────────────────────────────────────────────

/// Dataset-wide totals across every daily aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeTotals {
    pub days: usize,
    pub days_with_sleep: usize,
    pub workouts: usize,
    pub total_calories: u64,
    pub total_workout_minutes: u64,
}

// ── DailyMerge ────────────────────────────────────────────────────────────────

/// One [`DailyAggregate`] per attribution date, kept in ascending date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMerge {
    days: BTreeMap<NaiveDate, DailyAggregate>,
    sleep_overwrites: Vec<NaiveDate>,
}

impl DailyMerge {
    /// Aggregates in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = &DailyAggregate> {
        self.days.values()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyAggregate> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last attribution dates, or `None` when there are no days.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (first, _) = self.days.first_key_value()?;
        let (last, _) = self.days.last_key_value()?;
        Some((*first, *last))
    }

    /// Dates where a later sleep session replaced an earlier one, once per
    /// replacement, in processing order.
    pub fn sleep_overwrites(&self) -> &[NaiveDate] {
        &self.sleep_overwrites
    }

    /// Number of workouts whose local date differs from their UTC date.
    pub fn boundary_crossings(&self) -> usize {
        self.days()
            .flat_map(|d| d.workouts())
            .filter(|w| w.crossed_day_boundary())
            .count()
    }

    pub fn totals(&self) -> MergeTotals {
        let mut totals = MergeTotals::default();
        for day in self.days() {
            totals.days += 1;
            if day.sleep().is_some() {
                totals.days_with_sleep += 1;
            }
            totals.workouts += day.workouts().len();
            totals.total_calories += day.total_calories();
            totals.total_workout_minutes += day.total_workout_minutes();
        }
        totals
    }

    fn day_mut(&mut self, date: NaiveDate) -> &mut DailyAggregate {
        self.days
            .entry(date)
            .or_insert_with(|| DailyAggregate::new(date))
    }
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that folds validated records into a [`DailyMerge`].
pub struct DailyAggregator;

impl DailyAggregator {
    /// Group `sleep` and `workouts` by attribution date.
    ///
    /// A date holds at most one sleep value: when several sessions attribute
    /// to the same date, the one later in `sleep` wins and the date is listed
    /// in [`DailyMerge::sleep_overwrites`]. Workouts always append.
    pub fn aggregate(sleep: &[SleepSession], workouts: &[WorkoutEvent]) -> DailyMerge {
        let mut merge = DailyMerge::default();

        for session in sleep {
            let date = session.attribution_date();
            let replaced = merge.day_mut(date).set_sleep(session.summary());
            if let Some(previous) = replaced {
                warn!(
                    "Multiple sleep sessions attribute to {}; keeping the later one (started {}, {:.2}h, quality {}) over ({:.2}h, quality {})",
                    date,
                    format_instant(&session.start()),
                    session.duration_hours(),
                    session.quality_score(),
                    previous.hours,
                    previous.quality
                );
                merge.sleep_overwrites.push(date);
            }
        }

        for workout in workouts {
            merge
                .day_mut(workout.attribution_date())
                .add_workout(workout.clone());
        }

        debug!(
            "Aggregated {} sleep sessions and {} workouts into {} days",
            sleep.len(),
            workouts.len(),
            merge.len()
        );

        merge
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
