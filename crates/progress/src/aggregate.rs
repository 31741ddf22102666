//! Roll-ups over goals and check-ins.

use chrono::NaiveDate;
use goalpace_core::{Category, DailyCheckin, Goal, GoalId, PaceStatus};
use serde::{Deserialize, Serialize};
use crate::pace::{days_until, PaceClock};
use crate::percent::percent_complete;

/// Average completion of the goals in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRollup {
    /// Category label
    pub category: Category,
    /// Unweighted mean percent-complete
    pub average_percent: f64,
    /// Number of goals in the category
    pub goal_count: usize,
    /// No goal in the category is behind pace
    pub on_pace: bool,
}

/// Unweighted mean of percents; an empty set averages to 0.
pub fn average_percent(percents: &[f64]) -> f64 {
    if percents.is_empty() {
        return 0.0;
    }
    percents.iter().sum::<f64>() / percents.len() as f64
}

/// Group goals by category in first-seen order.
pub fn group_by_category(goals: &[Goal]) -> Vec<(Category, Vec<&Goal>)> {
    let mut groups: Vec<(Category, Vec<&Goal>)> = Vec::new();
    for goal in goals {
        match groups.iter_mut().find(|(category, _)| *category == goal.category) {
            Some((_, members)) => members.push(goal),
            None => groups.push((goal.category.clone(), vec![goal])),
        }
    }
    groups
}

/// Per-category roll-ups. `status_of` supplies each goal's pace status.
pub fn category_rollups<F>(goals: &[Goal], mut status_of: F) -> Vec<CategoryRollup>
where
    F: FnMut(&Goal) -> PaceStatus,
{
    group_by_category(goals)
        .into_iter()
        .map(|(category, members)| {
            let percents: Vec<f64> = members
                .iter()
                .map(|g| percent_complete(g.current_value, g.target_value, g.initial_value))
                .collect();
            let on_pace = members.iter().copied().all(|g| status_of(g) != PaceStatus::Behind);
            CategoryRollup {
                category,
                average_percent: average_percent(&percents),
                goal_count: members.len(),
                on_pace,
            }
        })
        .collect()
}

/// Which upcoming deadlines to surface and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineWindow {
    /// Only deadlines strictly fewer than this many days away
    pub max_days: i64,
    /// At most this many goals
    pub limit: usize,
}

impl DeadlineWindow {
    /// Window used by the daily summary.
    pub const SUMMARY: DeadlineWindow = DeadlineWindow { max_days: 60, limit: 5 };

    /// Window used by the morning briefing.
    pub const BRIEFING: DeadlineWindow = DeadlineWindow { max_days: 30, limit: 3 };
}

/// A goal with a deadline coming up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingDeadline {
    /// Goal identifier
    pub goal_id: GoalId,
    /// Goal name
    pub name: String,
    /// Days remaining
    pub days_left: i64,
}

/// Goals whose deadline is between 1 and `max_days - 1` days away, soonest first.
pub fn upcoming_deadlines(goals: &[Goal], clock: &PaceClock, window: DeadlineWindow) -> Vec<UpcomingDeadline> {
    let mut upcoming: Vec<UpcomingDeadline> = goals
        .iter()
        .filter_map(|goal| {
            let days_left = days_until(goal.deadline_date(), clock)?;
            (days_left > 0 && days_left < window.max_days).then(|| UpcomingDeadline {
                goal_id: goal.id,
                name: goal.name.clone(),
                days_left,
            })
        })
        .collect();
    // stable sort keeps store order for ties
    upcoming.sort_by_key(|u| u.days_left);
    upcoming.truncate(window.limit);
    upcoming
}

/// Totals over a window of daily check-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    /// Days with a workout
    pub workout_days: usize,
    /// Sum of income
    pub total_income: f64,
    /// Sum of new connections
    pub new_connections: u32,
    /// Check-ins present in the window
    pub days_logged: usize,
    /// Most recent recorded weight
    pub latest_weight: Option<f64>,
}

impl WeeklyAggregate {
    /// Sum the given check-ins. Order does not matter and gaps are fine.
    pub fn from_checkins(checkins: &[DailyCheckin]) -> Self {
        let latest_weight = checkins
            .iter()
            .filter_map(|c| c.weight.map(|w| (c.date, w)))
            .max_by_key(|(date, _)| *date)
            .map(|(_, w)| w);

        Self {
            workout_days: checkins.iter().filter(|c| c.workout).count(),
            total_income: checkins.iter().map(|c| c.income).sum(),
            new_connections: checkins.iter().map(|c| c.new_connections).sum(),
            days_logged: checkins.len(),
            latest_weight,
        }
    }
}

/// First day of a trailing window of `days` days ending on `today`.
///
/// Windows reaching past the earliest representable date start there.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    let span = i64::from(days.max(1)) - 1;
    today
        .checked_sub_signed(chrono::Duration::days(span))
        .unwrap_or(NaiveDate::MIN)
}
