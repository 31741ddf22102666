//! Time progress, deadline distance and pace classification.

use chrono::{Datelike, NaiveDate};
use goalpace_core::{Goal, PaceStatus};
use serde::{Deserialize, Serialize};
use crate::percent::{clamp_percent, percent_complete};

/// Percentage points value progress may lead or trail time progress and
/// still count as on track.
pub const PACE_TOLERANCE: f64 = 10.0;

/// Percent at which an undated goal counts as on track.
pub const ON_TRACK_THRESHOLD: f64 = 80.0;

/// Percent at which a goal counts as completed.
pub const COMPLETE_PERCENT: f64 = 100.0;

/// The "now" every pace computation is measured against.
///
/// `epoch` is the start of the tracked period; time progress is the share of
/// epoch→deadline that epoch→today covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceClock {
    /// Current calendar day
    pub today: NaiveDate,
    /// Start of the tracked period
    pub epoch: NaiveDate,
}

impl PaceClock {
    /// Clock for `today`, with the epoch on January 1 of the same year.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            epoch: start_of_year(today),
        }
    }

    /// Clock with an explicit epoch.
    pub fn with_epoch(today: NaiveDate, epoch: NaiveDate) -> Self {
        Self { today, epoch }
    }

    /// 1-based day of the year for `today`.
    pub fn day_of_year(&self) -> u32 {
        self.today.ordinal()
    }

    /// Number of days in `today`'s year.
    pub fn days_in_year(&self) -> u32 {
        if self.today.leap_year() { 366 } else { 365 }
    }

    /// Share of the calendar year elapsed, in percent.
    pub fn year_elapsed_percent(&self) -> f64 {
        self.day_of_year() as f64 / self.days_in_year() as f64 * 100.0
    }
}

fn start_of_year(day: NaiveDate) -> NaiveDate {
    day.with_ordinal(1).unwrap_or(day)
}

/// How far away a deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "days", rename_all = "snake_case")]
pub enum DeadlineState {
    /// No deadline, or one that could not be parsed
    NoDeadline,
    /// Deadline today or later; days remaining
    Upcoming(i64),
    /// Deadline has passed; days since
    Overdue(i64),
}

impl DeadlineState {
    /// Classify a deadline relative to the clock.
    pub fn of(deadline: Option<NaiveDate>, clock: &PaceClock) -> Self {
        match deadline {
            None => DeadlineState::NoDeadline,
            Some(deadline) => {
                let days = (deadline - clock.today).num_days();
                if days >= 0 {
                    DeadlineState::Upcoming(days)
                } else {
                    DeadlineState::Overdue(-days)
                }
            }
        }
    }
}

/// Days left until the deadline. Past deadlines report `None`.
pub fn days_until(deadline: Option<NaiveDate>, clock: &PaceClock) -> Option<i64> {
    match DeadlineState::of(deadline, clock) {
        DeadlineState::Upcoming(days) => Some(days),
        DeadlineState::NoDeadline | DeadlineState::Overdue(_) => None,
    }
}

/// Percent of the epoch→deadline span that has elapsed, in `[0, 100]`.
///
/// `None` without a deadline or when the deadline is on or before the epoch.
pub fn time_progress(deadline: Option<NaiveDate>, clock: &PaceClock) -> Option<f64> {
    let deadline = deadline?;
    let total_days = (deadline - clock.epoch).num_days();
    if total_days <= 0 {
        return None;
    }
    let passed_days = (clock.today - clock.epoch).num_days();
    Some(clamp_percent(passed_days as f64 / total_days as f64 * 100.0))
}

/// How the classifier treats completed goals that also have a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionRule {
    /// A goal at 100% is `completed` whether or not it has a deadline.
    #[default]
    Always,
    /// Dated goals are only ever compared against pace.
    UndatedOnly,
}

/// Classify an already computed percent against the deadline.
pub fn classify(
    value_progress: f64,
    deadline: Option<NaiveDate>,
    clock: &PaceClock,
    rule: CompletionRule,
) -> PaceStatus {
    let Some(deadline) = deadline else {
        return if value_progress >= COMPLETE_PERCENT {
            PaceStatus::Completed
        } else if value_progress >= ON_TRACK_THRESHOLD {
            PaceStatus::OnTrack
        } else {
            PaceStatus::Behind
        };
    };

    if rule == CompletionRule::Always && value_progress >= COMPLETE_PERCENT {
        return PaceStatus::Completed;
    }

    let Some(time_progress) = time_progress(Some(deadline), clock) else {
        return PaceStatus::OnTrack;
    };

    if value_progress > time_progress + PACE_TOLERANCE {
        PaceStatus::Ahead
    } else if value_progress < time_progress - PACE_TOLERANCE {
        PaceStatus::Behind
    } else {
        PaceStatus::OnTrack
    }
}

/// Pace status of a goal.
pub fn goal_status(goal: &Goal, clock: &PaceClock, rule: CompletionRule) -> PaceStatus {
    let value_progress = percent_complete(goal.current_value, goal.target_value, goal.initial_value);
    classify(value_progress, goal.deadline_date(), clock, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalpace_core::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock(today: NaiveDate) -> PaceClock {
        PaceClock::new(today)
    }

    #[test]
    fn test_clock_epoch_is_start_of_year() {
        let c = clock(date(2026, 10, 18));
        assert_eq!(c.epoch, date(2026, 1, 1));
        assert_eq!(c.day_of_year(), 291);
        assert_eq!(c.days_in_year(), 365);
        assert_eq!(clock(date(2028, 12, 31)).days_in_year(), 366);
    }

    #[test]
    fn test_days_until() {
        let c = clock(date(2026, 3, 10));
        assert_eq!(days_until(Some(date(2026, 3, 20)), &c), Some(10));
        assert_eq!(days_until(Some(date(2026, 3, 10)), &c), Some(0));
        assert_eq!(days_until(Some(date(2026, 2, 28)), &c), None);
        assert_eq!(days_until(None, &c), None);
    }

    #[test]
    fn test_deadline_state_reports_overdue() {
        let c = clock(date(2026, 3, 10));
        assert_eq!(DeadlineState::of(Some(date(2026, 2, 28)), &c), DeadlineState::Overdue(10));
        assert_eq!(DeadlineState::of(Some(date(2026, 3, 12)), &c), DeadlineState::Upcoming(2));
        assert_eq!(DeadlineState::of(None, &c), DeadlineState::NoDeadline);
    }

    #[test]
    fn test_time_progress() {
        let epoch = date(2026, 1, 1);
        let deadline = epoch + chrono::Duration::days(90);
        let halfway = PaceClock::with_epoch(epoch + chrono::Duration::days(45), epoch);
        assert_eq!(time_progress(Some(deadline), &halfway), Some(50.0));

        let before = PaceClock::with_epoch(date(2025, 12, 1), epoch);
        assert_eq!(time_progress(Some(deadline), &before), Some(0.0));

        let after = PaceClock::with_epoch(date(2026, 6, 1), epoch);
        assert_eq!(time_progress(Some(deadline), &after), Some(100.0));
    }

    #[test]
    fn test_time_progress_absent() {
        let c = clock(date(2026, 5, 1));
        assert_eq!(time_progress(None, &c), None);
        assert_eq!(time_progress(Some(date(2026, 1, 1)), &c), None);
        assert_eq!(time_progress(Some(date(2025, 12, 31)), &c), None);
    }

    #[test]
    fn test_classify_without_deadline() {
        let c = clock(date(2026, 5, 1));
        let rule = CompletionRule::UndatedOnly;
        assert_eq!(classify(100.0, None, &c, rule), PaceStatus::Completed);
        assert_eq!(classify(80.0, None, &c, rule), PaceStatus::OnTrack);
        assert_eq!(classify(79.9, None, &c, rule), PaceStatus::Behind);
    }

    #[test]
    fn test_classify_band_edges() {
        let epoch = date(2026, 1, 1);
        let deadline = Some(epoch + chrono::Duration::days(100));
        let c = PaceClock::with_epoch(epoch + chrono::Duration::days(50), epoch);
        let rule = CompletionRule::Always;

        assert_eq!(classify(60.0, deadline, &c, rule), PaceStatus::OnTrack);
        assert_eq!(classify(60.5, deadline, &c, rule), PaceStatus::Ahead);
        assert_eq!(classify(40.0, deadline, &c, rule), PaceStatus::OnTrack);
        assert_eq!(classify(39.5, deadline, &c, rule), PaceStatus::Behind);
    }

    #[test]
    fn test_classify_completion_rule() {
        let epoch = date(2026, 1, 1);
        let deadline = Some(date(2026, 12, 31));
        let c = PaceClock::with_epoch(date(2026, 2, 1), epoch);

        assert_eq!(classify(100.0, deadline, &c, CompletionRule::Always), PaceStatus::Completed);
        assert_eq!(classify(100.0, deadline, &c, CompletionRule::UndatedOnly), PaceStatus::Ahead);
    }

    #[test]
    fn test_unusable_deadline_is_on_track() {
        // deadline before the epoch has no time axis
        let c = clock(date(2026, 5, 1));
        assert_eq!(
            classify(5.0, Some(date(2025, 6, 1)), &c, CompletionRule::Always),
            PaceStatus::OnTrack
        );
    }

    #[test]
    fn test_weight_loss_goal_without_deadline_is_behind() {
        let goal = Goal::new(Category::fitness(), "Weight", 80.0)
            .with_current(87.0)
            .with_initial(105.0);
        let c = clock(date(2026, 5, 1));
        assert_eq!(goal_status(&goal, &c, CompletionRule::Always), PaceStatus::Behind);
    }

    #[test]
    fn test_income_goal_halfway_is_on_track() {
        let epoch = date(2026, 1, 1);
        let goal = Goal::new(Category::finance(), "Income", 1_000_000.0)
            .with_current(500_000.0)
            .with_deadline(epoch + chrono::Duration::days(90));
        let c = PaceClock::with_epoch(epoch + chrono::Duration::days(45), epoch);
        assert_eq!(goal_status(&goal, &c, CompletionRule::Always), PaceStatus::OnTrack);
    }

    #[test]
    fn test_malformed_deadline_falls_back_to_percent_rules() {
        let mut goal = Goal::new(Category::travel(), "Countries", 10.0).with_current(10.0);
        goal.deadline = Some("someday".to_string());
        let c = clock(date(2026, 5, 1));
        assert_eq!(goal_status(&goal, &c, CompletionRule::UndatedOnly), PaceStatus::Completed);
    }
}
