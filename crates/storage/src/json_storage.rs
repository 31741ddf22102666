//! JSON file storage implementation.
//!
//! Stores data as JSON files under a root directory and keeps small per-goal
//! meta markers (version + updated_at). Progress entries are written once and
//! never rewritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use goalpace_core::{DailyCheckin, Goal, GoalFilter, GoalId, ProgressEntry};
use super::trait_::{ensure_finite, ensure_finite_checkin, ensure_finite_goal, order_goals, recent_checkins};
use super::{GoalStore, StorageError, Result};
use tokio::fs;
use tracing::{debug, info, warn};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Open storage rooted at `root`, creating the directory layout if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("goals")).await?;
        fs::create_dir_all(root.join("progress")).await?;
        fs::create_dir_all(root.join("checkins")).await?;
        fs::create_dir_all(root.join("meta").join("goals")).await?;

        debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }

    fn progress_dir(&self, goal_id: GoalId) -> PathBuf {
        self.root.join("progress").join(goal_id.to_string())
    }

    fn checkin_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join("checkins").join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    async fn write_goal(&self, goal: &Goal) -> Result<u64> {
        ensure_finite_goal(goal)?;
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(self.goal_path(goal.id), json.as_bytes()).await?;
        self.bump_version("goals", &goal.id.to_string()).await
    }

    async fn load_settings(&self) -> Result<BTreeMap<String, String>> {
        Ok(read_json(&self.settings_path()).await?.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl GoalStore for JsonStorage {
    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = list_dir(&self.root.join("goals"))
            .await?
            .into_iter()
            .filter(|g: &Goal| filter.matches(g))
            .collect();
        order_goals(&mut goals);
        Ok(goals)
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        read_json(&self.goal_path(id)).await
    }

    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        let version = self.write_goal(goal).await?;
        debug!("Saved goal {} ({}) v{}", goal.id, goal.name, version);
        Ok(())
    }

    async fn update_goal_value(
        &mut self,
        id: GoalId,
        value: f64,
        note: Option<&str>,
    ) -> Result<ProgressEntry> {
        ensure_finite("value", value)?;
        let mut goal = self
            .load_goal(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("goal {}", id)))?;

        goal.current_value = value;
        goal.updated_at = chrono::Utc::now();
        self.write_goal(&goal).await?;

        let entry = ProgressEntry::new(id, value, note.map(str::to_string));
        let dir = self.progress_dir(id);
        fs::create_dir_all(&dir).await?;
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(dir.join(format!("{}.json", entry.id)), json.as_bytes()).await?;

        info!("Updated goal {}: new value {}", goal.name, value);
        Ok(entry)
    }

    async fn list_progress(&self, goal_id: GoalId) -> Result<Vec<ProgressEntry>> {
        let dir = self.progress_dir(goal_id);
        if fs::metadata(&dir).await.is_err() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<ProgressEntry> = list_dir(&dir).await?;
        entries.sort_by(|a, b| {
            a.logged_at.cmp(&b.logged_at).then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn save_checkin(&mut self, checkin: &DailyCheckin) -> Result<()> {
        ensure_finite_checkin(checkin)?;
        let json = serde_json::to_string_pretty(checkin)?;
        fs::write(self.checkin_path(checkin.date), json.as_bytes()).await?;
        info!("Saved check-in for {}", checkin.date);
        Ok(())
    }

    async fn list_checkins_since(&self, since: NaiveDate) -> Result<Vec<DailyCheckin>> {
        let all: Vec<DailyCheckin> = list_dir(&self.root.join("checkins")).await?;
        Ok(recent_checkins(&all, since))
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_settings().await?.remove(key))
    }

    async fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load_settings().await?;
        settings.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&settings)?;
        fs::write(self.settings_path(), json.as_bytes()).await?;
        debug!("Setting {} = {}", key, value);
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable file {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}
