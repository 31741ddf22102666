//! Tracker errors.

use goalpace_storage::StorageError;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors surfaced by the progress tracker.
///
/// Pure calculations never fail; only store access and goal lookup do.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Underlying store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No goal registered under the key
    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    /// Bare name shared by several categories
    #[error("Goal name '{0}' is used in several categories; use category/name")]
    AmbiguousGoal(String),

    /// Value is not a finite number
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
