//! goalpace core data models.
//!
//! This crate defines the goal, progress and check-in records shared by the
//! storage layer and the pace engine.

#![warn(missing_docs)]

// Core identities
mod id;

// Goals and their history
mod goal;

// Daily habits
mod checkin;

// Re-exports
pub use id::*;

pub use goal::{Category, Goal, GoalFilter, PaceStatus, ProgressEntry, DEADLINE_FORMAT};
pub use checkin::DailyCheckin;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Settings key controlling scheduled summaries.
pub const NOTIFICATIONS_SETTING: &str = "notifications_enabled";
