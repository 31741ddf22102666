//! Goal model - a dated numeric target with progress history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{EntryId, GoalId};
use crate::Time;

/// Date format used for goal deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// A goal tracks a numeric value toward a target, optionally by a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Grouping label for aggregate reporting
    pub category: Category,

    /// Display name, unique within its category
    pub name: String,

    /// Value the goal aims for
    pub target_value: f64,

    /// Latest recorded value
    pub current_value: f64,

    /// Baseline for goals that move downward (e.g. body weight)
    #[serde(default)]
    pub initial_value: Option<f64>,

    /// Raw deadline as stored (`YYYY-MM-DD`)
    #[serde(default)]
    pub deadline: Option<String>,

    /// Display unit
    #[serde(default)]
    pub unit: Option<String>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Goal {
    /// Create a new goal starting from zero.
    pub fn new(category: impl Into<Category>, name: impl Into<String>, target_value: f64) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: GoalId::new(),
            category: category.into(),
            name: name.into(),
            target_value,
            current_value: 0.0,
            initial_value: None,
            deadline: None,
            unit: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the starting value. For downward goals this also becomes the baseline.
    pub fn with_current(mut self, value: f64) -> Self {
        self.current_value = value;
        self
    }

    /// Set the baseline used by downward goals.
    pub fn with_initial(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Set the deadline.
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline.format(DEADLINE_FORMAT).to_string());
        self
    }

    /// Set the display unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Parsed deadline. Missing or malformed deadlines yield `None`.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        let raw = self.deadline.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, DEADLINE_FORMAT).ok()
    }
}

/// Goal category. An open set; the well-known ones have constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    /// Create a category from any label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Income and savings
    pub fn finance() -> Self {
        Self("finance".to_string())
    }

    /// Sport and health
    pub fn fitness() -> Self {
        Self("fitness".to_string())
    }

    /// Large purchases
    pub fn purchases() -> Self {
        Self("purchases".to_string())
    }

    /// Trips and countries
    pub fn travel() -> Self {
        Self("travel".to_string())
    }

    /// Label as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derived pace classification of a goal. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    /// Target reached
    Completed,
    /// Value progress outpaces elapsed time
    Ahead,
    /// Within tolerance of the expected pace
    OnTrack,
    /// Lagging the expected pace
    Behind,
}

impl PaceStatus {
    /// Stable label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Completed => "completed",
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on_track",
            PaceStatus::Behind => "behind",
        }
    }
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only record in a goal's progress history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Unique identifier
    pub id: EntryId,

    /// Goal this entry belongs to
    pub goal_id: GoalId,

    /// Value recorded
    pub value: f64,

    /// Optional note
    #[serde(default)]
    pub note: Option<String>,

    /// When recorded
    pub logged_at: Time,
}

impl ProgressEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(goal_id: GoalId, value: f64, note: Option<String>) -> Self {
        Self {
            id: EntryId::new(),
            goal_id,
            value,
            note,
            logged_at: chrono::Utc::now(),
        }
    }
}

/// Filter for listing goals.
#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    /// Restrict to a single category
    pub category: Option<Category>,
}

impl GoalFilter {
    /// Match every goal.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match goals in one category.
    pub fn category(category: impl Into<Category>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    /// Whether the goal passes this filter.
    pub fn matches(&self, goal: &Goal) -> bool {
        match &self.category {
            Some(category) => &goal.category == category,
            None => true,
        }
    }
}
