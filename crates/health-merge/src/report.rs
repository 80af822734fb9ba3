//! Plain-text console reports. Every builder returns a `String`; printing is
//! left to `main`.

use merge_core::formatting::{format_hours, format_minutes, format_rate, group_thousands};
use merge_core::models::WorkoutEvent;
use merge_core::settings::SleepThresholds;
use merge_core::time_utils::format_instant;
use merge_core::validation::Rejection;
use merge_data::aggregator::DailyMerge;
use merge_data::analysis::{BucketStats, CorrelationReport};

fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(title.len()))
}

// ── Day-boundary analysis ─────────────────────────────────────────────────────

/// One line per workout showing how its local time maps onto UTC.
pub fn format_boundary_analysis(workouts: &[WorkoutEvent]) -> String {
    let mut out = heading("Day-boundary analysis");

    if workouts.is_empty() {
        out.push_str("No workouts to analyse\n");
        return out;
    }

    for w in workouts {
        out.push_str(&format!(
            "{:<10} {} {:<22} -> {}",
            w.id(),
            w.original_timestamp(),
            w.original_zone(),
            format_instant(&w.utc_instant())
        ));
        if w.crossed_day_boundary() {
            out.push_str(&format!("  [crossed into {}]", w.attribution_date()));
        }
        out.push('\n');
    }

    let crossed = workouts.iter().filter(|w| w.crossed_day_boundary()).count();
    out.push_str(&format!(
        "{} of {} workouts crossed a day boundary\n",
        crossed,
        workouts.len()
    ));
    out
}

// ── Merged summary ────────────────────────────────────────────────────────────

/// One block per attribution date followed by dataset totals.
pub fn format_merged_summary(merge: &DailyMerge) -> String {
    let mut out = heading("Merged daily summary");

    if merge.is_empty() {
        out.push_str("No days to summarise\n");
        return out;
    }

    for day in merge.days() {
        out.push_str(&format!("{}\n", day.date()));
        match day.sleep() {
            Some(sleep) => out.push_str(&format!(
                "  sleep: {} (quality {})\n",
                format_hours(sleep.hours),
                sleep.quality
            )),
            None => out.push_str("  no sleep data\n"),
        }

        if !day.has_workouts() {
            out.push_str("  no workouts\n");
            continue;
        }
        for w in day.workouts() {
            out.push_str(&format!(
                "  {} {} at {}: {}, {} kcal\n",
                w.kind(),
                w.id(),
                format_instant(&w.utc_instant()),
                format_minutes(u64::from(w.duration_minutes())),
                group_thousands(w.calories())
            ));
        }
        out.push_str(&format!(
            "  total: {}, {} kcal\n",
            format_minutes(day.total_workout_minutes()),
            group_thousands(day.total_calories())
        ));
    }

    let totals = merge.totals();
    out.push_str(&format!(
        "{} days ({} with sleep), {} workouts, {}, {} kcal\n",
        totals.days,
        totals.days_with_sleep,
        totals.workouts,
        format_minutes(totals.total_workout_minutes),
        group_thousands(totals.total_calories)
    ));
    out
}

// ── Correlations ──────────────────────────────────────────────────────────────

fn format_bucket(label: &str, stats: &BucketStats) -> String {
    format!(
        "{}: {} days\n  avg calories burned: {:.2}\n  avg workout minutes: {:.2}\n  workout rate: {}\n",
        label,
        stats.count,
        stats.avg_calories_burned,
        stats.avg_workout_minutes,
        format_rate(stats.workout_rate)
    )
}

/// Low and good sleep buckets side by side, plus the uncounted days.
///
/// When both buckets have days an insight line compares their mean calories.
pub fn format_correlations(report: &CorrelationReport, thresholds: &SleepThresholds) -> String {
    let mut out = heading("Sleep vs. exercise");

    out.push_str(&format_bucket(
        &format!("Low sleep (< {})", format_hours(thresholds.low_below)),
        &report.low,
    ));
    out.push_str(&format_bucket(
        &format!("Good sleep (>= {})", format_hours(thresholds.good_at_least)),
        &report.good,
    ));
    out.push_str(&format!(
        "Neutral sleep: {} days, no sleep data: {} days\n",
        report.neutral_count, report.days_without_sleep
    ));
    out.push_str(&format!(
        "Day-boundary crossings: {}\n",
        report.boundary_crossing_count
    ));

    if let Some(diff) = report.calorie_difference() {
        let direction = if diff > 0.0 { "more" } else { "fewer" };
        out.push_str(&format!(
            "Insight: {:.0} {} calories burned on well-rested days\n",
            diff.abs(),
            direction
        ));
    }
    out
}

// ── Rejections ────────────────────────────────────────────────────────────────

/// Every rejected record with its reason. Empty when nothing was rejected.
pub fn format_rejections(sleep: &[Rejection], workouts: &[Rejection]) -> String {
    if sleep.is_empty() && workouts.is_empty() {
        return String::new();
    }

    let mut out = format!(
        "Rejected records: {} sleep, {} workout\n",
        sleep.len(),
        workouts.len()
    );
    for rejection in sleep.iter().chain(workouts) {
        out.push_str(&format!("  {}\n", rejection));
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
