//! Dashboard metrics derived from plans and habit checkins.
//!
//! Everything here is recomputed from scratch on each call. Output maps are
//! ordered so identical input always serializes identically.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::blocks::{percentage, round2};
use crate::types::{Category, RoutineBlock};

/// Minimum plan completion rate for a day to extend the streak.
pub const STREAK_THRESHOLD: f64 = 70.0;

/// Upper bound on how far back a streak walk goes.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Default trailing window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Largest trailing window a caller may ask for.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Plan data needed for analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub date: NaiveDate,
    pub completion_rate: f64,
    pub blocks: Vec<RoutineBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinSnapshot {
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitSnapshot {
    pub id: String,
    pub name: String,
    pub checkins: Vec<CheckinSnapshot>,
}

/// Per-habit metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub habit_name: String,
    pub current_streak: u32,
    /// Completed checkins in the window.
    pub total_checkins: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_plans: usize,
    pub average_completion: f64,
    pub current_streak: u32,
    pub category_stats: BTreeMap<Category, usize>,
    pub habit_stats: Vec<HabitStats>,
}

/// First date inside a trailing window of `days` calendar days ending at
/// `today` (inclusive). A window of 0 or 1 day is just `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.saturating_sub(1)))
}

/// Count consecutive qualifying days walking back from `today`.
fn walk_streak(today: NaiveDate, qualifies: impl Fn(NaiveDate) -> bool) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while streak < MAX_STREAK_DAYS && qualifies(day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

/// Consecutive days, ending today, whose plan reached [`STREAK_THRESHOLD`].
///
/// A day without a plan ends the streak.
pub fn plan_streak(plans: &[PlanSnapshot], today: NaiveDate) -> u32 {
    let mut rates: HashMap<NaiveDate, f64> = HashMap::with_capacity(plans.len());
    for plan in plans {
        rates.entry(plan.date).or_insert(plan.completion_rate);
    }

    walk_streak(today, |day| {
        rates
            .get(&day)
            .is_some_and(|rate| *rate >= STREAK_THRESHOLD)
    })
}

/// Consecutive days, ending today, with a completed checkin.
pub fn habit_streak(checkins: &[CheckinSnapshot], today: NaiveDate) -> u32 {
    let completed: BTreeSet<NaiveDate> = checkins
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.date)
        .collect();

    walk_streak(today, |day| completed.contains(&day))
}

/// Completed blocks per category across all plans. Categories with no
/// completed block are absent.
pub fn category_distribution(plans: &[PlanSnapshot]) -> BTreeMap<Category, usize> {
    let mut stats = BTreeMap::new();
    for block in plans.iter().flat_map(|p| &p.blocks).filter(|b| b.completed) {
        *stats.entry(block.category).or_insert(0) += 1;
    }
    stats
}

/// Completed share of checkins, 0 when there are none.
pub fn habit_completion_rate(checkins: &[CheckinSnapshot]) -> f64 {
    let completed = checkins.iter().filter(|c| c.completed).count();
    percentage(completed, checkins.len())
}

/// Mean plan completion rate rounded to two decimals, 0 with no plans.
pub fn average_completion(plans: &[PlanSnapshot]) -> f64 {
    if plans.is_empty() {
        return 0.0;
    }
    let total: f64 = plans.iter().map(|p| p.completion_rate).sum();
    round2(total / plans.len() as f64)
}

/// Build the dashboard summary for the trailing `window_days` ending `today`.
pub fn compute_analytics(
    plans: &[PlanSnapshot],
    habits: &[HabitSnapshot],
    today: NaiveDate,
    window_days: u32,
) -> AnalyticsSummary {
    let start = window_start(today, window_days);

    let plans: Vec<PlanSnapshot> = plans
        .iter()
        .filter(|p| p.date >= start)
        .cloned()
        .collect();

    let habit_stats = habits
        .iter()
        .map(|habit| {
            let checkins: Vec<CheckinSnapshot> = habit
                .checkins
                .iter()
                .filter(|c| c.date >= start)
                .copied()
                .collect();

            HabitStats {
                habit_id: habit.id.clone(),
                habit_name: habit.name.clone(),
                current_streak: habit_streak(&checkins, today),
                total_checkins: checkins.iter().filter(|c| c.completed).count(),
                completion_rate: habit_completion_rate(&checkins),
            }
        })
        .collect();

    AnalyticsSummary {
        total_plans: plans.len(),
        average_completion: average_completion(&plans),
        current_streak: plan_streak(&plans, today),
        category_stats: category_distribution(&plans),
        habit_stats,
    }
}
