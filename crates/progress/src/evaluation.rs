//! Per-goal evaluation snapshot.

use goalpace_core::{Category, Goal, GoalId, PaceStatus};
use serde::Serialize;
use crate::pace::{classify, days_until, CompletionRule, DeadlineState, PaceClock};
use crate::percent::percent_complete;

/// Everything derived about one goal at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalEvaluation {
    /// Goal identifier
    pub goal_id: GoalId,
    /// Goal name
    pub name: String,
    /// Goal category
    pub category: Category,
    /// Percent complete, 0-100
    pub percent_complete: f64,
    /// Pace classification
    pub status: PaceStatus,
    /// Days left; absent when undated or past due
    pub days_until_deadline: Option<i64>,
    /// Deadline distance including overdue goals
    pub deadline_state: DeadlineState,
}

/// Evaluate a single goal.
pub fn evaluate_goal(goal: &Goal, clock: &PaceClock, rule: CompletionRule) -> GoalEvaluation {
    let percent = percent_complete(goal.current_value, goal.target_value, goal.initial_value);
    let deadline = goal.deadline_date();
    GoalEvaluation {
        goal_id: goal.id,
        name: goal.name.clone(),
        category: goal.category.clone(),
        percent_complete: percent,
        status: classify(percent, deadline, clock, rule),
        days_until_deadline: days_until(deadline, clock),
        deadline_state: DeadlineState::of(deadline, clock),
    }
}
