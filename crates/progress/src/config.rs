//! Tracker configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::aggregate::DeadlineWindow;
use crate::pace::{CompletionRule, PaceClock};

/// Configuration for the progress tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Start of the tracked period (None = January 1 of the current year)
    pub epoch: Option<NaiveDate>,
    /// Upcoming deadlines shown in the daily summary
    pub summary_window: DeadlineWindow,
    /// Upcoming deadlines shown in the morning briefing
    pub briefing_window: DeadlineWindow,
    /// Length of rendered progress bars
    pub bar_length: usize,
    /// Goals with progress bars in the weekly report
    pub report_goal_limit: usize,
    /// Length of the trailing check-in window, in days
    pub weekly_window_days: u32,
    /// Report reached dated goals as completed instead of comparing pace
    pub completion_overrides_pace: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            epoch: None,
            summary_window: DeadlineWindow::SUMMARY,
            briefing_window: DeadlineWindow::BRIEFING,
            bar_length: 10,
            report_goal_limit: 5,
            weekly_window_days: 7,
            completion_overrides_pace: true,
        }
    }
}

impl TrackerConfig {
    /// Clock for `today` honoring the configured epoch.
    pub fn clock(&self, today: NaiveDate) -> PaceClock {
        match self.epoch {
            Some(epoch) => PaceClock::with_epoch(today, epoch),
            None => PaceClock::new(today),
        }
    }

    /// Completion rule selected by this config.
    pub fn completion_rule(&self) -> CompletionRule {
        if self.completion_overrides_pace {
            CompletionRule::Always
        } else {
            CompletionRule::UndatedOnly
        }
    }
}
