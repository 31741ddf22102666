//! Progress & pace engine.
//!
//! Percent-complete, time progress, pace classification and the roll-ups and
//! summaries built on them. The calculators are pure; [`ProgressTracker`]
//! connects them to an injected store.

#![warn(missing_docs)]

pub mod percent;
pub mod pace;
pub mod evaluation;
pub mod aggregate;
pub mod format;
pub mod resolver;
pub mod config;
pub mod error;
pub mod tracker;

pub use percent::percent_complete;
pub use pace::{
    classify, days_until, goal_status, time_progress, CompletionRule, DeadlineState, PaceClock,
    COMPLETE_PERCENT, ON_TRACK_THRESHOLD, PACE_TOLERANCE,
};
pub use evaluation::{evaluate_goal, GoalEvaluation};
pub use aggregate::{
    average_percent, category_rollups, upcoming_deadlines, CategoryRollup, DeadlineWindow,
    UpcomingDeadline, WeeklyAggregate,
};
pub use format::{evening_prompt, progress_bar};
pub use resolver::GoalResolver;
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use tracker::{ProgressTracker, UpdateOutcome, ValueChange};
