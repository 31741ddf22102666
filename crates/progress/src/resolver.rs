//! Exact-key goal lookup.

use std::collections::HashMap;
use goalpace_core::{Category, Goal, GoalId};

/// Maps lookup keys to goals.
///
/// Built once per request from a goal snapshot. Keys are matched exactly
/// after trimming and lowercasing; there is no partial matching.
#[derive(Debug, Clone, Default)]
pub struct GoalResolver {
    by_key: HashMap<String, GoalId>,
    ambiguous: Vec<String>,
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

impl GoalResolver {
    /// Register `category/name` for every goal, plus bare `name` where unique.
    pub fn from_goals(goals: &[Goal]) -> Self {
        let mut resolver = Self::default();
        let mut bare: HashMap<String, Option<GoalId>> = HashMap::new();

        for goal in goals {
            resolver
                .by_key
                .insert(normalize(&format!("{}/{}", goal.category, goal.name)), goal.id);
            bare.entry(normalize(&goal.name))
                .and_modify(|slot| *slot = None)
                .or_insert(Some(goal.id));
        }

        for (name, id) in bare {
            match id {
                Some(id) => {
                    resolver.by_key.entry(name).or_insert(id);
                }
                None => resolver.ambiguous.push(name),
            }
        }
        resolver.ambiguous.sort();
        resolver
    }

    /// Add an alias pointing at the goal registered as `category/name`.
    ///
    /// Unknown targets are ignored so a fixed alias table can be applied to
    /// any user's goals.
    pub fn with_alias(mut self, alias: &str, category: &Category, name: &str) -> Self {
        let target = normalize(&format!("{}/{}", category, name));
        if let Some(id) = self.by_key.get(&target).copied() {
            self.by_key.insert(normalize(alias), id);
        }
        self
    }

    /// Look up a key.
    pub fn resolve(&self, key: &str) -> Option<GoalId> {
        self.by_key.get(&normalize(key)).copied()
    }

    /// Whether `key` names more than one goal and needs a category prefix.
    pub fn is_ambiguous(&self, key: &str) -> bool {
        self.ambiguous.binary_search(&normalize(key)).is_ok()
    }
}
