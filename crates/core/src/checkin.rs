//! Daily check-in model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::Time;

/// A once-per-day record of habits and income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCheckin {
    /// Calendar day this check-in covers
    pub date: NaiveDate,

    /// Whether a workout happened
    #[serde(default)]
    pub workout: bool,

    /// Income earned that day
    #[serde(default)]
    pub income: f64,

    /// New people met
    #[serde(default)]
    pub new_connections: u32,

    /// Body weight, if measured
    #[serde(default)]
    pub weight: Option<f64>,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,

    /// When recorded
    pub created_at: Time,
}

impl DailyCheckin {
    /// Create an empty check-in for a day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            workout: false,
            income: 0.0,
            new_connections: 0,
            weight: None,
            notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Mark whether a workout happened.
    pub fn with_workout(mut self, workout: bool) -> Self {
        self.workout = workout;
        self
    }

    /// Set the day's income.
    pub fn with_income(mut self, income: f64) -> Self {
        self.income = income;
        self
    }

    /// Set the number of new connections.
    pub fn with_connections(mut self, count: u32) -> Self {
        self.new_connections = count;
        self
    }

    /// Set the measured weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
