//! Descriptive sleep/exercise comparison over the merged days.
//!
//! Days are split by sleep duration into low, good and neutral buckets and
//! plain population means are reported for the low and good buckets. Nothing
//! here tests significance.

use merge_core::models::DailyAggregate;
use merge_core::settings::SleepThresholds;

use crate::aggregator::DailyMerge;

// ── Public types ──────────────────────────────────────────────────────────────

/// Which bucket a day falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepBucket {
    /// Sleep present and below the low threshold.
    Low,
    /// Sleep present and at or above the good threshold.
    Good,
    /// Sleep present and between the two thresholds.
    Neutral,
    /// No sleep attributed to the day.
    NoSleep,
}

impl SleepBucket {
    pub fn classify(day: &DailyAggregate, thresholds: &SleepThresholds) -> Self {
        match day.sleep_hours() {
            None => SleepBucket::NoSleep,
            Some(h) if h < thresholds.low_below => SleepBucket::Low,
            Some(h) if h >= thresholds.good_at_least => SleepBucket::Good,
            Some(_) => SleepBucket::Neutral,
        }
    }
}

/// Means over the days in one bucket. Every mean is `0.0` when `count` is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketStats {
    pub count: usize,
    pub avg_calories_burned: f64,
    pub avg_workout_minutes: f64,
    /// Fraction of the bucket's days with at least one workout.
    pub workout_rate: f64,
}

impl BucketStats {
    pub fn from_days(days: &[&DailyAggregate]) -> Self {
        if days.is_empty() {
            return Self::default();
        }

        let n = days.len() as f64;
        let calories: u64 = days.iter().map(|d| d.total_calories()).sum();
        let minutes: u64 = days.iter().map(|d| d.total_workout_minutes()).sum();
        let active = days.iter().filter(|d| d.has_workouts()).count();

        Self {
            count: days.len(),
            avg_calories_burned: calories as f64 / n,
            avg_workout_minutes: minutes as f64 / n,
            workout_rate: active as f64 / n,
        }
    }
}

/// The complete output of [`CorrelationAnalyzer::analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrelationReport {
    pub low: BucketStats,
    pub good: BucketStats,
    /// Days with sleep that fell in neither reported bucket.
    pub neutral_count: usize,
    pub days_without_sleep: usize,
    /// Workouts across the whole dataset flagged as crossing a day boundary.
    pub boundary_crossing_count: usize,
}

impl CorrelationReport {
    /// Days that had sleep data, across all three buckets.
    pub fn days_with_sleep(&self) -> usize {
        self.low.count + self.good.count + self.neutral_count
    }

    /// Mean calories on good-sleep days minus mean calories on low-sleep
    /// days. `None` unless both buckets have at least one day.
    pub fn calorie_difference(&self) -> Option<f64> {
        (self.low.count > 0 && self.good.count > 0)
            .then(|| self.good.avg_calories_burned - self.low.avg_calories_burned)
    }
}

// ── CorrelationAnalyzer ───────────────────────────────────────────────────────

pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    pub fn analyze(merge: &DailyMerge, thresholds: &SleepThresholds) -> CorrelationReport {
        let mut low: Vec<&DailyAggregate> = Vec::new();
        let mut good: Vec<&DailyAggregate> = Vec::new();
        let mut neutral_count = 0usize;
        let mut days_without_sleep = 0usize;

        for day in merge.days() {
            match SleepBucket::classify(day, thresholds) {
                SleepBucket::Low => low.push(day),
                SleepBucket::Good => good.push(day),
                SleepBucket::Neutral => neutral_count += 1,
                SleepBucket::NoSleep => days_without_sleep += 1,
            }
        }

        CorrelationReport {
            low: BucketStats::from_days(&low),
            good: BucketStats::from_days(&good),
            neutral_count,
            days_without_sleep,
            boundary_crossing_count: merge.boundary_crossings(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
