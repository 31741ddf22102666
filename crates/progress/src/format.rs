//! Plain-text rendering of summaries and reports.
//!
//! Everything here is deterministic string building over already computed
//! values; the chat or terminal layer forwards the output unchanged.

use std::fmt::Write as _;
use goalpace_core::{Category, DailyCheckin, Goal, PaceStatus};
use crate::aggregate::{CategoryRollup, UpcomingDeadline, WeeklyAggregate};
use crate::evaluation::GoalEvaluation;
use crate::pace::{DeadlineState, PaceClock};

const FILLED: char = '▓';
const EMPTY: char = '░';

/// Two-glyph bar of `length` cells followed by the rounded percent.
pub fn progress_bar(percent: f64, length: usize) -> String {
    let filled = filled_cells(percent, length);
    let mut bar = String::with_capacity(length * 3 + 6);
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(length - filled));
    let _ = write!(bar, " {:.0}%", percent);
    bar
}

fn filled_cells(percent: f64, length: usize) -> usize {
    let cells = (percent / 100.0 * length as f64).floor();
    if cells.is_nan() || cells <= 0.0 {
        0
    } else {
        (cells as usize).min(length)
    }
}

/// Icon for a well-known category.
pub fn category_emoji(category: &Category) -> Option<&'static str> {
    match category.as_str() {
        "finance" => Some("💰"),
        "fitness" => Some("🏃"),
        "purchases" => Some("🛒"),
        "travel" => Some("✈️"),
        _ => None,
    }
}

/// Icon for a pace status.
pub fn status_icon(status: PaceStatus) -> &'static str {
    match status {
        PaceStatus::OnTrack => "✅",
        PaceStatus::Ahead => "🚀",
        PaceStatus::Behind => "⚠️",
        PaceStatus::Completed => "🎉",
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn days_label(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Format a number with no decimals and comma thousands separators.
pub fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let digits = rounded.as_bytes();
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    if value < 0.0 && rounded != "0" {
        out.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*digit as char);
    }
    out
}

/// Daily summary: year progress, upcoming deadlines, category averages.
pub fn today_summary(
    clock: &PaceClock,
    upcoming: &[UpcomingDeadline],
    rollups: &[CategoryRollup],
) -> String {
    let mut msg = format!(
        "📅 Day {}/{} ({:.1}% of the year passed)\n\n",
        clock.day_of_year(),
        clock.days_in_year(),
        clock.year_elapsed_percent()
    );

    if !upcoming.is_empty() {
        msg.push_str("⏰ Upcoming deadlines:\n");
        for item in upcoming {
            let _ = writeln!(msg, "• {}: {}", item.name, days_label(item.days_left));
        }
        msg.push('\n');
    }

    msg.push_str("📊 Progress by category:\n");
    for rollup in rollups {
        let _ = writeln!(
            msg,
            "{} {}: {:.0}%",
            category_emoji(&rollup.category).unwrap_or("📌"),
            capitalize(rollup.category.as_str()),
            rollup.average_percent
        );
    }
    msg
}

fn value_line(goal: &Goal) -> String {
    let unit = goal.unit.as_deref().filter(|u| !u.is_empty());
    match goal.initial_value {
        Some(initial) if initial > goal.target_value => format!(
            "{:.0} → {:.0} → {:.0}{}",
            initial,
            goal.current_value,
            goal.target_value,
            unit.map(|u| format!(" {}", u)).unwrap_or_default()
        ),
        _ => match unit {
            Some(unit) => format!("{:.0}/{:.0} {}", goal.current_value, goal.target_value, unit),
            None => format!("{:.0}/{:.0}", goal.current_value, goal.target_value),
        },
    }
}

/// All goals grouped by category with values, status and deadline distance.
///
/// `evaluations` must be parallel to `goals`.
pub fn goals_list(title_year: i32, goals: &[Goal], evaluations: &[GoalEvaluation]) -> String {
    let mut msg = format!("📊 MY GOALS {}\n\n", title_year);

    let mut categories: Vec<&Category> = Vec::new();
    for goal in goals {
        if !categories.contains(&&goal.category) {
            categories.push(&goal.category);
        }
    }

    for category in categories {
        let _ = writeln!(
            msg,
            "{} {}",
            category_emoji(category).unwrap_or("📌"),
            category.as_str().to_uppercase()
        );

        for (goal, eval) in goals.iter().zip(evaluations).filter(|(g, _)| &g.category == category) {
            let _ = write!(msg, "├─ {}: {}", goal.name, value_line(goal));
            match eval.deadline_state {
                DeadlineState::Upcoming(days) => {
                    let _ = write!(msg, " → {} {} left", status_icon(eval.status), days_label(days));
                }
                DeadlineState::Overdue(days) => {
                    let _ = write!(msg, " → {} overdue by {}", status_icon(eval.status), days_label(days));
                }
                DeadlineState::NoDeadline => {}
            }
            let _ = writeln!(msg, " ({:.0}%)", eval.percent_complete);
        }
        msg.push('\n');
    }
    msg
}

/// Weekly report: check-in totals and progress bars.
pub fn weekly_report(
    week: &WeeklyAggregate,
    window_days: u32,
    goal_progress: &[(String, f64)],
    bar_length: usize,
) -> String {
    let mut msg = String::from("📈 WEEKLY REPORT\n\n");
    let _ = writeln!(msg, "🏃 Workouts: {}/{} days", week.workout_days, window_days);
    let _ = writeln!(msg, "💰 Income this week: {}", group_thousands(week.total_income));
    if week.new_connections > 0 {
        let _ = writeln!(msg, "🤝 New connections: {}", week.new_connections);
    }
    if let Some(weight) = week.latest_weight {
        let _ = writeln!(msg, "⚖️ Latest weight: {:.1}", weight);
    }
    msg.push('\n');

    msg.push_str("📊 Goal progress:\n");
    for (name, percent) in goal_progress {
        let _ = writeln!(msg, "• {}: {}", name, progress_bar(*percent, bar_length));
    }
    msg
}

fn category_list(categories: &[&Category]) -> String {
    categories
        .iter()
        .map(|c| category_emoji(c).unwrap_or(c.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Morning briefing: nearest deadlines and which categories need a push.
pub fn morning_briefing(
    clock: &PaceClock,
    upcoming: &[UpcomingDeadline],
    rollups: &[CategoryRollup],
) -> String {
    let mut msg = format!(
        "☀️ Good morning! Day {}/{}\n\n🎯 Focus for today:\n",
        clock.day_of_year(),
        clock.days_in_year()
    );

    for item in upcoming {
        let _ = writeln!(msg, "• \"{}\" is due in {}", item.name, days_label(item.days_left));
    }

    let on_pace: Vec<&Category> = rollups.iter().filter(|r| r.on_pace).map(|r| &r.category).collect();
    let need_speed: Vec<&Category> = rollups.iter().filter(|r| !r.on_pace).map(|r| &r.category).collect();

    if !on_pace.is_empty() {
        let _ = writeln!(msg, "\n💪 On pace: {}", category_list(&on_pace));
    }
    if !need_speed.is_empty() {
        let _ = writeln!(msg, "⚠️ Needs a push: {}", category_list(&need_speed));
    }

    msg.push_str("\nHave a great day! 💪");
    msg
}

/// Evening prompt asking for the day's check-in.
///
/// When a check-in for the day already exists its values are echoed, since
/// recording again replaces it.
pub fn evening_prompt(logged: Option<&DailyCheckin>) -> String {
    let mut msg = String::from("🌙 How did the day go?\n\nAnswer with `goalpace checkin`:\n");
    msg.push_str("1. Did you work out? (--workout)\n");
    msg.push_str("2. How much did you earn today? (--income N)\n");
    msg.push_str("3. Any new connections? (--connections N)\n");

    match logged {
        Some(checkin) => {
            let _ = writeln!(
                msg,
                "\n📝 Already logged: workout {}, income {}, connections {}",
                if checkin.workout { "yes" } else { "no" },
                group_thousands(checkin.income),
                checkin.new_connections
            );
            msg.push_str("Checking in again replaces it.");
        }
        None => msg.push_str("\nOr just skip today."),
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use goalpace_core::GoalId;
    use crate::pace::CompletionRule;
    use crate::evaluation::evaluate_goal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 10), "░░░░░░░░░░ 0%");
        assert_eq!(progress_bar(50.0, 10), "▓▓▓▓▓░░░░░ 50%");
        assert_eq!(progress_bar(72.0, 10), "▓▓▓▓▓▓▓░░░ 72%");
        assert_eq!(progress_bar(100.0, 10), "▓▓▓▓▓▓▓▓▓▓ 100%");
        assert_eq!(progress_bar(39.9, 5), "▓░░░░ 40%");
    }

    #[test]
    fn test_progress_bar_out_of_range() {
        assert_eq!(progress_bar(150.0, 4), "▓▓▓▓ 150%");
        assert_eq!(progress_bar(-20.0, 4), "░░░░ -20%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(3000.0), "3,000");
        assert_eq!(group_thousands(1_234_567.4), "1,234,567");
        assert_eq!(group_thousands(-25_000.0), "-25,000");
    }

    #[test]
    fn test_today_summary() {
        let clock = PaceClock::new(date(2026, 2, 1));
        let upcoming = vec![UpcomingDeadline { goal_id: GoalId::new(), name: "Income 1M".into(), days_left: 27 }];
        let rollups = vec![
            CategoryRollup { category: Category::finance(), average_percent: 12.4, goal_count: 4, on_pace: true },
            CategoryRollup { category: Category::new("reading"), average_percent: 50.0, goal_count: 1, on_pace: false },
        ];

        let msg = today_summary(&clock, &upcoming, &rollups);
        assert!(msg.starts_with("📅 Day 32/365 (8.8% of the year passed)\n\n"));
        assert!(msg.contains("⏰ Upcoming deadlines:\n• Income 1M: 27 days\n"));
        assert!(msg.contains("💰 Finance: 12%\n"));
        assert!(msg.contains("📌 Reading: 50%\n"));
    }

    #[test]
    fn test_today_summary_without_deadlines() {
        let clock = PaceClock::new(date(2026, 2, 1));
        let msg = today_summary(&clock, &[], &[]);
        assert!(!msg.contains("Upcoming"));
        assert!(msg.ends_with("📊 Progress by category:\n"));
    }

    #[test]
    fn test_goals_list() {
        let clock = PaceClock::new(date(2026, 6, 20));
        let goals = vec![
            Goal::new(Category::fitness(), "Weight", 80.0)
                .with_current(87.0)
                .with_initial(105.0)
                .with_unit("kg")
                .with_deadline(date(2026, 6, 30)),
            Goal::new(Category::fitness(), "Workouts", 4.0).with_current(2.0),
            Goal::new(Category::purchases(), "Car", 1.0).with_deadline(date(2026, 6, 1)),
        ];
        let evals: Vec<_> = goals.iter().map(|g| evaluate_goal(g, &clock, CompletionRule::Always)).collect();

        let msg = goals_list(2026, &goals, &evals);
        assert!(msg.starts_with("📊 MY GOALS 2026\n\n🏃 FITNESS\n"));
        assert!(msg.contains("├─ Weight: 105 → 87 → 80 kg → ⚠️ 10 days left (72%)\n"));
        assert!(msg.contains("├─ Workouts: 2/4 (50%)\n"));
        assert!(msg.contains("🛒 PURCHASES\n├─ Car: 0/1 → ⚠️ overdue by 19 days (0%)\n"));
    }

    #[test]
    fn test_weekly_report() {
        let week = WeeklyAggregate { workout_days: 3, total_income: 3000.0, ..Default::default() };
        let progress = vec![("Countries".to_string(), 25.0)];

        let msg = weekly_report(&week, 7, &progress, 4);
        assert!(msg.contains("🏃 Workouts: 3/7 days\n"));
        assert!(msg.contains("💰 Income this week: 3,000\n"));
        assert!(!msg.contains("connections"));
        assert!(msg.ends_with("• Countries: ▓░░░ 25%\n"));
    }

    #[test]
    fn test_morning_briefing() {
        let clock = PaceClock::new(date(2026, 1, 10));
        let upcoming = vec![UpcomingDeadline { goal_id: GoalId::new(), name: "Marathon".into(), days_left: 1 }];
        let rollups = vec![
            CategoryRollup { category: Category::finance(), average_percent: 5.0, goal_count: 2, on_pace: false },
            CategoryRollup { category: Category::travel(), average_percent: 20.0, goal_count: 1, on_pace: true },
            CategoryRollup { category: Category::new("books"), average_percent: 20.0, goal_count: 1, on_pace: true },
        ];

        let msg = morning_briefing(&clock, &upcoming, &rollups);
        assert!(msg.starts_with("☀️ Good morning! Day 10/365\n\n🎯 Focus for today:\n"));
        assert!(msg.contains("• \"Marathon\" is due in 1 day\n"));
        assert!(msg.contains("💪 On pace: ✈️, books\n"));
        assert!(msg.contains("⚠️ Needs a push: 💰\n"));
        assert!(msg.ends_with("Have a great day! 💪"));
    }

    #[test]
    fn test_evening_prompt() {
        let msg = evening_prompt(None);
        assert!(msg.starts_with("🌙 How did the day go?\n\n"));
        assert!(msg.contains("1. Did you work out? (--workout)\n"));
        assert!(msg.contains("3. Any new connections? (--connections N)\n"));
        assert!(msg.ends_with("Or just skip today."));
    }

    #[test]
    fn test_evening_prompt_echoes_logged_checkin() {
        let checkin = DailyCheckin::new(date(2026, 2, 14))
            .with_workout(true)
            .with_income(12_500.0)
            .with_connections(2);

        let msg = evening_prompt(Some(&checkin));
        assert!(msg.contains("📝 Already logged: workout yes, income 12,500, connections 2\n"));
        assert!(msg.ends_with("Checking in again replaces it."));
    }
}
