//! Storage trait abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use goalpace_core::{DailyCheckin, Goal, GoalFilter, GoalId, ProgressEntry};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for goals, their history, check-ins and settings.
///
/// The pace engine only reads snapshots and writes values back through this
/// trait, so any backend can be plugged in.
#[async_trait]
pub trait GoalStore: Send + Sync {
    // === Goal operations ===

    /// List goals matching the filter, ordered by category then deadline.
    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>>;

    /// Load a goal by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>>;

    /// Save a goal (create or replace).
    async fn save_goal(&mut self, goal: &Goal) -> Result<()>;

    /// Set a goal's current value and append the change to its history.
    async fn update_goal_value(
        &mut self,
        id: GoalId,
        value: f64,
        note: Option<&str>,
    ) -> Result<ProgressEntry>;

    /// Progress history of a goal, oldest first.
    async fn list_progress(&self, goal_id: GoalId) -> Result<Vec<ProgressEntry>>;

    // === Check-in operations ===

    /// Save a check-in, replacing any existing one for the same date.
    async fn save_checkin(&mut self, checkin: &DailyCheckin) -> Result<()>;

    /// Check-ins dated on or after `since`, newest first.
    async fn list_checkins_since(&self, since: NaiveDate) -> Result<Vec<DailyCheckin>>;

    // === Settings ===

    /// Read a setting.
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;

    /// Write a setting.
    async fn set_setting(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reject a value JSON cannot carry (NaN and infinities serialize as `null`).
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StorageError::Other(format!("{} must be a finite number, got {}", field, value)))
    }
}

pub(crate) fn ensure_finite_goal(goal: &Goal) -> Result<()> {
    ensure_finite("target_value", goal.target_value)?;
    ensure_finite("current_value", goal.current_value)?;
    if let Some(initial) = goal.initial_value {
        ensure_finite("initial_value", initial)?;
    }
    Ok(())
}

pub(crate) fn ensure_finite_checkin(checkin: &DailyCheckin) -> Result<()> {
    ensure_finite("income", checkin.income)?;
    if let Some(weight) = checkin.weight {
        ensure_finite("weight", weight)?;
    }
    Ok(())
}

/// Sort goals by category, then by deadline with undated goals last.
pub(crate) fn order_goals(goals: &mut [Goal]) {
    goals.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| match (a.deadline_date(), b.deadline_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Newest-first ordering of check-ins on or after `since`.
pub(crate) fn recent_checkins<'a>(
    checkins: impl IntoIterator<Item = &'a DailyCheckin>,
    since: NaiveDate,
) -> Vec<DailyCheckin> {
    let mut recent: Vec<DailyCheckin> = checkins
        .into_iter()
        .filter(|c| c.date >= since)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent
}
