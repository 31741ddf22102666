//! Progress tracking service.
//!
//! Loads snapshots from an injected [`GoalStore`], hands them to the pure
//! calculators and renders the results.

use std::str::FromStr;
use chrono::{Datelike, NaiveDate};
use goalpace_core::{
    Category, DailyCheckin, Goal, GoalFilter, GoalId, ProgressEntry, NOTIFICATIONS_SETTING,
};
use goalpace_storage::GoalStore;
use tracing::{debug, info};
use crate::aggregate::{category_rollups, upcoming_deadlines, window_start, CategoryRollup, WeeklyAggregate};
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::evaluation::{evaluate_goal, GoalEvaluation};
use crate::format;
use crate::pace::{goal_status, PaceClock};
use crate::percent::percent_complete;
use crate::resolver::GoalResolver;

/// How a goal's value should change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueChange {
    /// Replace the current value
    Set(f64),
    /// Add to the current value (negative to subtract)
    Adjust(f64),
}

impl ValueChange {
    /// Value after applying this change to `current`.
    pub fn apply(self, current: f64) -> f64 {
        match self {
            ValueChange::Set(value) => value,
            ValueChange::Adjust(delta) => current + delta,
        }
    }
}

impl FromStr for ValueChange {
    type Err = TrackerError;

    /// `+N` and `-N` adjust; a bare number sets.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse = |raw: &str| -> Result<f64> {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TrackerError::InvalidValue(s.to_string()))
        };
        if s.starts_with('+') || s.starts_with('-') {
            Ok(ValueChange::Adjust(parse(s)?))
        } else {
            Ok(ValueChange::Set(parse(s)?))
        }
    }
}

/// Result of a value update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Goal after the update
    pub goal: Goal,
    /// Value before the update
    pub previous_value: f64,
    /// Value after the update
    pub new_value: f64,
    /// History entry written by the store
    pub entry: ProgressEntry,
}

/// Progress tracker bound to one user's store.
pub struct ProgressTracker<S: GoalStore> {
    storage: S,
    config: TrackerConfig,
    aliases: Vec<(String, Category, String)>,
    today: Option<NaiveDate>,
}

impl<S: GoalStore> ProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: TrackerConfig::default(),
            aliases: Vec::new(),
            today: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a lookup alias for the goal `category/name`.
    pub fn with_alias(mut self, alias: impl Into<String>, category: impl Into<Category>, name: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), category.into(), name.into()));
        self
    }

    /// Pin "today" instead of reading the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Underlying store, for writes the tracker does not wrap.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Clock for the current request.
    pub fn clock(&self) -> PaceClock {
        let today = self.today.unwrap_or_else(|| chrono::Local::now().date_naive());
        self.config.clock(today)
    }

    /// Evaluate every goal matching the filter.
    pub async fn evaluate_goals(&self, filter: &GoalFilter) -> Result<Vec<GoalEvaluation>> {
        let goals = self.storage.list_goals(filter).await?;
        let clock = self.clock();
        let rule = self.config.completion_rule();
        Ok(goals.iter().map(|g| evaluate_goal(g, &clock, rule)).collect())
    }

    /// Average completion per category.
    pub async fn category_rollups(&self, filter: &GoalFilter) -> Result<Vec<CategoryRollup>> {
        let goals = self.storage.list_goals(filter).await?;
        Ok(self.rollups(&goals))
    }

    fn rollups(&self, goals: &[Goal]) -> Vec<CategoryRollup> {
        let clock = self.clock();
        let rule = self.config.completion_rule();
        category_rollups(goals, |g| goal_status(g, &clock, rule))
    }

    /// Daily summary text.
    pub async fn today_summary(&self) -> Result<String> {
        let goals = self.storage.list_goals(&GoalFilter::all()).await?;
        let clock = self.clock();
        let upcoming = upcoming_deadlines(&goals, &clock, self.config.summary_window);
        debug!("Today summary: {} goals, {} upcoming deadlines", goals.len(), upcoming.len());
        Ok(format::today_summary(&clock, &upcoming, &self.rollups(&goals)))
    }

    /// Goal list text, grouped by category.
    pub async fn goals_list(&self, filter: &GoalFilter) -> Result<String> {
        let goals = self.storage.list_goals(filter).await?;
        let clock = self.clock();
        let rule = self.config.completion_rule();
        let evaluations: Vec<GoalEvaluation> = goals.iter().map(|g| evaluate_goal(g, &clock, rule)).collect();
        Ok(format::goals_list(clock.today.year(), &goals, &evaluations))
    }

    /// Check-in totals over the trailing window.
    pub async fn weekly_aggregate(&self) -> Result<WeeklyAggregate> {
        let clock = self.clock();
        let since = window_start(clock.today, self.config.weekly_window_days);
        let checkins: Vec<DailyCheckin> = self
            .storage
            .list_checkins_since(since)
            .await?
            .into_iter()
            .filter(|c| c.date <= clock.today)
            .collect();
        Ok(WeeklyAggregate::from_checkins(&checkins))
    }

    /// Weekly report text.
    pub async fn weekly_report(&self) -> Result<String> {
        let week = self.weekly_aggregate().await?;
        let goals = self.storage.list_goals(&GoalFilter::all()).await?;
        let progress: Vec<(String, f64)> = goals
            .iter()
            .take(self.config.report_goal_limit)
            .map(|g| (g.name.clone(), percent_complete(g.current_value, g.target_value, g.initial_value)))
            .collect();
        Ok(format::weekly_report(
            &week,
            self.config.weekly_window_days,
            &progress,
            self.config.bar_length,
        ))
    }

    /// Whether scheduled summaries are switched on. Defaults to on.
    pub async fn notifications_enabled(&self) -> Result<bool> {
        let value = self.storage.get_setting(NOTIFICATIONS_SETTING).await?;
        Ok(value.map_or(true, |v| v.trim() == "on"))
    }

    /// Switch scheduled summaries on or off.
    pub async fn set_notifications(&mut self, enabled: bool) -> Result<()> {
        let value = if enabled { "on" } else { "off" };
        self.storage.set_setting(NOTIFICATIONS_SETTING, value).await?;
        info!("Notifications turned {}", value);
        Ok(())
    }

    /// Morning briefing text, or `None` when notifications are off.
    pub async fn morning_briefing(&self) -> Result<Option<String>> {
        if !self.notifications_enabled().await? {
            info!("Notifications disabled, skipping morning briefing");
            return Ok(None);
        }
        let goals = self.storage.list_goals(&GoalFilter::all()).await?;
        let clock = self.clock();
        let upcoming = upcoming_deadlines(&goals, &clock, self.config.briefing_window);
        Ok(Some(format::morning_briefing(&clock, &upcoming, &self.rollups(&goals))))
    }

    /// Evening check-in prompt, or `None` when notifications are off.
    pub async fn evening_prompt(&self) -> Result<Option<String>> {
        if !self.notifications_enabled().await? {
            info!("Notifications disabled, skipping evening prompt");
            return Ok(None);
        }
        let today = self.clock().today;
        let logged = self
            .storage
            .list_checkins_since(today)
            .await?
            .into_iter()
            .find(|c| c.date == today);
        Ok(Some(format::evening_prompt(logged.as_ref())))
    }

    /// Lookup table for the current goal set, including registered aliases.
    pub async fn resolver(&self) -> Result<GoalResolver> {
        let goals = self.storage.list_goals(&GoalFilter::all()).await?;
        Ok(self.build_resolver(&goals))
    }

    fn build_resolver(&self, goals: &[Goal]) -> GoalResolver {
        self.aliases
            .iter()
            .fold(GoalResolver::from_goals(goals), |resolver, (alias, category, name)| {
                resolver.with_alias(alias, category, name)
            })
    }

    async fn find_goal(&self, key: &str) -> Result<Goal> {
        let goals = self.storage.list_goals(&GoalFilter::all()).await?;
        let resolver = self.build_resolver(&goals);
        let id: GoalId = match resolver.resolve(key) {
            Some(id) => id,
            None if resolver.is_ambiguous(key) => return Err(TrackerError::AmbiguousGoal(key.to_string())),
            None => return Err(TrackerError::GoalNotFound(key.to_string())),
        };
        goals
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| TrackerError::GoalNotFound(key.to_string()))
    }

    /// Change a goal's value and record it in the goal's history.
    pub async fn update_goal(
        &mut self,
        key: &str,
        change: ValueChange,
        note: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let goal = self.find_goal(key).await?;
        let previous_value = goal.current_value;
        let new_value = change.apply(previous_value);
        if !new_value.is_finite() {
            return Err(TrackerError::InvalidValue(new_value.to_string()));
        }

        let entry = self.storage.update_goal_value(goal.id, new_value, note).await?;
        let goal = self
            .storage
            .load_goal(goal.id)
            .await?
            .ok_or_else(|| TrackerError::GoalNotFound(key.to_string()))?;

        info!("Goal {} updated: {} -> {}", goal.name, previous_value, new_value);
        Ok(UpdateOutcome {
            goal,
            previous_value,
            new_value,
            entry,
        })
    }

    /// A goal with its progress history.
    pub async fn goal_history(&self, key: &str) -> Result<(Goal, Vec<ProgressEntry>)> {
        let goal = self.find_goal(key).await?;
        let history = self.storage.list_progress(goal.id).await?;
        Ok((goal, history))
    }

    /// Store a daily check-in.
    pub async fn record_checkin(&mut self, checkin: &DailyCheckin) -> Result<()> {
        self.storage.save_checkin(checkin).await?;
        info!("Recorded check-in for {}", checkin.date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalpace_core::PaceStatus;
    use goalpace_storage::MemoryStorage;
    use crate::pace::DeadlineState;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> ProgressTracker<MemoryStorage> {
        let goals = vec![
            Goal::new(Category::finance(), "Income 1M", 1_000_000.0)
                .with_current(500_000.0)
                .with_deadline(date(2026, 3, 31)),
            Goal::new(Category::finance(), "Income sources", 4.0).with_current(1.0),
            Goal::new(Category::fitness(), "Weight", 80.0)
                .with_current(87.0)
                .with_initial(105.0)
                .with_unit("kg"),
            Goal::new(Category::travel(), "New countries", 12.0)
                .with_current(3.0)
                .with_deadline(date(2026, 12, 31)),
        ];
        ProgressTracker::new(MemoryStorage::with_goals(goals)).with_today(date(2026, 2, 14))
    }

    #[tokio::test]
    async fn test_evaluate_goals() {
        let tracker = seeded();
        let evals = tracker.evaluate_goals(&GoalFilter::all()).await.unwrap();
        assert_eq!(evals.len(), 4);

        let income = evals.iter().find(|e| e.name == "Income 1M").unwrap();
        assert_eq!(income.percent_complete, 50.0);
        assert_eq!(income.days_until_deadline, Some(45));
        assert_eq!(income.deadline_state, DeadlineState::Upcoming(45));
        // 44 of 89 days elapsed
        assert_eq!(income.status, PaceStatus::OnTrack);

        let weight = evals.iter().find(|e| e.name == "Weight").unwrap();
        assert_eq!(weight.status, PaceStatus::Behind);
        assert_eq!(weight.days_until_deadline, None);
    }

    #[tokio::test]
    async fn test_category_rollups_with_filter() {
        let tracker = seeded();
        let rollups = tracker.category_rollups(&GoalFilter::category("finance")).await.unwrap();
        assert_eq!(rollups.len(), 1);
        // (50 + 25) / 2
        assert_eq!(rollups[0].average_percent, 37.5);
        assert!(!rollups[0].on_pace);
    }

    #[tokio::test]
    async fn test_update_goal_set_and_adjust() {
        let mut tracker = seeded();

        let outcome = tracker
            .update_goal("fitness/weight", ValueChange::Set(85.0), Some("morning"))
            .await
            .unwrap();
        assert_eq!(outcome.previous_value, 87.0);
        assert_eq!(outcome.goal.current_value, 85.0);
        assert_eq!(outcome.entry.note.as_deref(), Some("morning"));

        let outcome = tracker.update_goal("New countries", ValueChange::Adjust(1.0), None).await.unwrap();
        assert_eq!(outcome.new_value, 4.0);

        let (goal, history) = tracker.goal_history("weight").await.unwrap();
        assert_eq!(goal.current_value, 85.0);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_update_through_alias() {
        let mut tracker = seeded().with_alias("countries", "travel", "New countries");
        let outcome = tracker.update_goal("countries", ValueChange::Adjust(2.0), None).await.unwrap();
        assert_eq!(outcome.goal.name, "New countries");
        assert_eq!(outcome.new_value, 5.0);
    }

    #[tokio::test]
    async fn test_update_unknown_goal() {
        let mut tracker = seeded();
        let err = tracker.update_goal("income", ValueChange::Set(1.0), None).await.unwrap_err();
        assert!(matches!(err, TrackerError::GoalNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_ambiguous_goal() {
        let goals = vec![
            Goal::new(Category::finance(), "Target", 1.0),
            Goal::new(Category::travel(), "Target", 2.0),
        ];
        let mut tracker = ProgressTracker::new(MemoryStorage::with_goals(goals));
        let err = tracker.update_goal("target", ValueChange::Set(1.0), None).await.unwrap_err();
        assert!(matches!(err, TrackerError::AmbiguousGoal(_)));
    }

    #[test]
    fn test_value_change_parsing() {
        assert_eq!("85".parse::<ValueChange>().unwrap(), ValueChange::Set(85.0));
        assert_eq!("+1".parse::<ValueChange>().unwrap(), ValueChange::Adjust(1.0));
        assert_eq!("-2.5".parse::<ValueChange>().unwrap(), ValueChange::Adjust(-2.5));
        assert!("lots".parse::<ValueChange>().is_err());
        assert!("inf".parse::<ValueChange>().is_err());
        assert_eq!(ValueChange::Adjust(-2.0).apply(10.0), 8.0);
    }

    #[tokio::test]
    async fn test_weekly_aggregate_uses_trailing_window() {
        let mut tracker = seeded();
        for (day, income, workout) in [(1, 500.0, true), (8, 1000.0, true), (12, 2000.0, false), (14, 0.0, true)] {
            let checkin = DailyCheckin::new(date(2026, 2, day)).with_income(income).with_workout(workout);
            tracker.record_checkin(&checkin).await.unwrap();
        }
        // after "today" is ignored
        tracker.record_checkin(&DailyCheckin::new(date(2026, 2, 20)).with_income(9.0)).await.unwrap();

        let week = tracker.weekly_aggregate().await.unwrap();
        assert_eq!(week.total_income, 3000.0);
        assert_eq!(week.workout_days, 2);
        assert_eq!(week.days_logged, 3);

        let report = tracker.weekly_report().await.unwrap();
        assert!(report.contains("🏃 Workouts: 2/7 days"));
        assert!(report.contains("💰 Income this week: 3,000"));
        assert_eq!(report.matches("• ").count(), 4);
    }

    #[tokio::test]
    async fn test_today_summary() {
        let tracker = seeded();
        let summary = tracker.today_summary().await.unwrap();
        assert!(summary.starts_with("📅 Day 45/365"));
        assert!(summary.contains("• Income 1M: 45 days\n"));
        assert!(!summary.contains("New countries:"));
        assert!(summary.contains("💰 Finance: 38%\n"));
    }

    #[tokio::test]
    async fn test_goals_list() {
        let tracker = seeded();
        let list = tracker.goals_list(&GoalFilter::category(Category::fitness())).await.unwrap();
        assert!(list.contains("🏃 FITNESS\n├─ Weight: 105 → 87 → 80 kg (72%)\n"));
        assert!(!list.contains("FINANCE"));
    }

    #[tokio::test]
    async fn test_morning_briefing_respects_setting() {
        let mut tracker = seeded();
        let briefing = tracker.morning_briefing().await.unwrap().unwrap();
        assert!(briefing.contains("💪 On pace: ✈️\n"));
        assert!(briefing.contains("⚠️ Needs a push: 💰, 🏃\n"));

        tracker.set_notifications(false).await.unwrap();
        assert!(!tracker.notifications_enabled().await.unwrap());
        assert!(tracker.morning_briefing().await.unwrap().is_none());

        tracker.set_notifications(true).await.unwrap();
        assert!(tracker.morning_briefing().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_briefing_window_is_independent() {
        // 45 days out: inside the summary window, outside the default briefing window
        let briefing = seeded().morning_briefing().await.unwrap().unwrap();
        assert!(!briefing.contains("Income 1M"));

        let config = TrackerConfig {
            briefing_window: crate::aggregate::DeadlineWindow { max_days: 50, limit: 3 },
            ..TrackerConfig::default()
        };
        let briefing = seeded().with_config(config).morning_briefing().await.unwrap().unwrap();
        assert!(briefing.contains("• \"Income 1M\" is due in 45 days\n"));
    }

    #[tokio::test]
    async fn test_evening_prompt_respects_setting() {
        let mut tracker = seeded();
        let prompt = tracker.evening_prompt().await.unwrap().unwrap();
        assert!(prompt.ends_with("Or just skip today."));

        tracker.record_checkin(&DailyCheckin::new(date(2026, 2, 13)).with_income(50.0)).await.unwrap();
        tracker
            .record_checkin(&DailyCheckin::new(date(2026, 2, 14)).with_workout(true).with_connections(1))
            .await
            .unwrap();
        let prompt = tracker.evening_prompt().await.unwrap().unwrap();
        assert!(prompt.contains("Already logged: workout yes, income 0, connections 1\n"));

        tracker.set_notifications(false).await.unwrap();
        assert!(tracker.evening_prompt().await.unwrap().is_none());
        assert!(tracker.morning_briefing().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_huge_weekly_window_does_not_overflow() {
        let config = TrackerConfig { weekly_window_days: u32::MAX, ..TrackerConfig::default() };
        let mut tracker = seeded().with_config(config);
        tracker.record_checkin(&DailyCheckin::new(date(1990, 1, 1)).with_income(10.0)).await.unwrap();

        let week = tracker.weekly_aggregate().await.unwrap();
        assert_eq!(week.days_logged, 1);
        assert_eq!(week.total_income, 10.0);
    }
}
