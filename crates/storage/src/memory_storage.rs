//! In-memory storage, used by tests and short-lived sessions.

use std::collections::{BTreeMap, HashMap};
use chrono::NaiveDate;
use goalpace_core::{DailyCheckin, Goal, GoalFilter, GoalId, ProgressEntry};
use super::trait_::{ensure_finite, ensure_finite_checkin, ensure_finite_goal, order_goals, recent_checkins};
use super::{GoalStore, StorageError, Result};

/// Storage backend that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    goals: HashMap<GoalId, Goal>,
    progress: Vec<ProgressEntry>,
    checkins: BTreeMap<NaiveDate, DailyCheckin>,
    settings: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with goals.
    pub fn with_goals(goals: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            goals: goals.into_iter().map(|g| (g.id, g)).collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl GoalStore for MemoryStorage {
    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self.goals.values().filter(|g| filter.matches(g)).cloned().collect();
        order_goals(&mut goals);
        Ok(goals)
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        Ok(self.goals.get(&id).cloned())
    }

    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        ensure_finite_goal(goal)?;
        self.goals.insert(goal.id, goal.clone());
        Ok(())
    }

    async fn update_goal_value(
        &mut self,
        id: GoalId,
        value: f64,
        note: Option<&str>,
    ) -> Result<ProgressEntry> {
        ensure_finite("value", value)?;
        let goal = self
            .goals
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("goal {}", id)))?;
        goal.current_value = value;
        goal.updated_at = chrono::Utc::now();

        let entry = ProgressEntry::new(id, value, note.map(str::to_string));
        self.progress.push(entry.clone());
        Ok(entry)
    }

    async fn list_progress(&self, goal_id: GoalId) -> Result<Vec<ProgressEntry>> {
        Ok(self.progress.iter().filter(|e| e.goal_id == goal_id).cloned().collect())
    }

    async fn save_checkin(&mut self, checkin: &DailyCheckin) -> Result<()> {
        ensure_finite_checkin(checkin)?;
        self.checkins.insert(checkin.date, checkin.clone());
        Ok(())
    }

    async fn list_checkins_since(&self, since: NaiveDate) -> Result<Vec<DailyCheckin>> {
        Ok(recent_checkins(self.checkins.values(), since))
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.settings.get(key).cloned())
    }

    async fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
