//! goalpace CLI - track dated goals and the pace needed to hit them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use goalpace_core::{Category, DailyCheckin, Goal, GoalFilter};
use goalpace_progress::{ProgressTracker, TrackerConfig, ValueChange};
use goalpace_storage::{GoalStore, JsonStorage};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goalpace")]
#[command(about = "Track progress toward dated goals", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, env = "GOALPACE_DIR", default_value = ".goalpace")]
    data_dir: PathBuf,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily summary
    Today,
    /// List goals with status
    Goals {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Per-goal evaluation as JSON
    Status {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Weekly report
    Report,
    /// Morning briefing (empty when reminders are off)
    Briefing,
    /// Evening check-in prompt (empty when reminders are off)
    Evening,
    /// Update a goal's value
    Update {
        /// Goal key: `category/name`, a unique name, or an alias
        key: String,
        /// New value, or +N / -N to adjust
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Note stored with the change
        #[arg(long)]
        note: Option<String>,
    },
    /// Show a goal's history
    History {
        /// Goal key
        key: String,
    },
    /// Record today's check-in
    Checkin {
        /// A workout happened
        #[arg(long)]
        workout: bool,
        /// Income earned
        #[arg(long, default_value = "0", value_parser = finite_number)]
        income: f64,
        /// New connections made
        #[arg(long, default_value = "0")]
        connections: u32,
        /// Body weight
        #[arg(long, value_parser = finite_number)]
        weight: Option<f64>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Turn scheduled summaries on or off, or show whether they are on
    Remind {
        /// on or off
        state: Option<Toggle>,
    },
    /// Add a goal
    Add {
        /// Category label
        category: String,
        /// Goal name
        name: String,
        /// Target value
        #[arg(value_parser = finite_number)]
        target: f64,
        /// Starting value
        #[arg(long, default_value = "0", value_parser = finite_number)]
        current: f64,
        /// Baseline for goals that go down
        #[arg(long, value_parser = finite_number)]
        initial: Option<f64>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Display unit
        #[arg(long)]
        unit: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

/// Contents of `<data-dir>/config.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(flatten)]
    tracker: TrackerConfig,
    /// alias -> "category/name"
    aliases: BTreeMap<String, String>,
}

fn load_config(dir: &Path) -> Result<FileConfig> {
    let path = dir.join("config.json");
    match std::fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
    }
}

fn finite_number(raw: &str) -> std::result::Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("{} is not a finite number", raw)),
        Err(e) => Err(e.to_string()),
    }
}

fn split_alias_target(target: &str) -> Option<(&str, &str)> {
    let (category, name) = target.split_once('/')?;
    let (category, name) = (category.trim(), name.trim());
    (!category.is_empty() && !name.is_empty()).then_some((category, name))
}

fn category_filter(category: Option<String>) -> GoalFilter {
    category.map(GoalFilter::category).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.data_dir)?;
    let storage = JsonStorage::new(&cli.data_dir).await?;
    debug!("Using data directory {}", cli.data_dir.display());

    let mut tracker = ProgressTracker::new(storage).with_config(config.tracker);
    for (alias, target) in &config.aliases {
        match split_alias_target(target) {
            Some((category, name)) => tracker = tracker.with_alias(alias.as_str(), category, name),
            None => tracing::warn!("Ignoring alias {}: expected category/name, got {}", alias, target),
        }
    }
    if let Some(today) = cli.today {
        tracker = tracker.with_today(today);
    }

    match cli.command {
        Commands::Today => {
            println!("{}", tracker.today_summary().await?);
        }
        Commands::Goals { category } => {
            println!("{}", tracker.goals_list(&category_filter(category)).await?);
        }
        Commands::Status { category } => {
            let evaluations = tracker.evaluate_goals(&category_filter(category)).await?;
            println!("{}", serde_json::to_string_pretty(&evaluations)?);
        }
        Commands::Report => {
            println!("{}", tracker.weekly_report().await?);
        }
        Commands::Briefing => {
            if let Some(briefing) = tracker.morning_briefing().await? {
                println!("{}", briefing);
            }
        }
        Commands::Evening => {
            if let Some(prompt) = tracker.evening_prompt().await? {
                println!("{}", prompt);
            }
        }
        Commands::Update { key, value, note } => {
            let change: ValueChange = value.parse()?;
            let outcome = tracker.update_goal(&key, change, note.as_deref()).await?;
            println!("Updated: {}", outcome.goal.name);
            println!("  Was: {:.0}", outcome.previous_value);
            println!("  Now: {:.0}", outcome.new_value);
        }
        Commands::History { key } => {
            let (goal, history) = tracker.goal_history(&key).await?;
            println!("{} ({}) - {} entries", goal.name, goal.category, history.len());
            for entry in history {
                match entry.note {
                    Some(note) => println!("  {} | {} | {}", entry.logged_at.format("%Y-%m-%d %H:%M"), entry.value, note),
                    None => println!("  {} | {}", entry.logged_at.format("%Y-%m-%d %H:%M"), entry.value),
                }
            }
        }
        Commands::Checkin { workout, income, connections, weight, notes } => {
            let mut checkin = DailyCheckin::new(tracker.clock().today)
                .with_workout(workout)
                .with_income(income)
                .with_connections(connections);
            if let Some(weight) = weight {
                checkin = checkin.with_weight(weight);
            }
            if let Some(notes) = notes {
                checkin = checkin.with_notes(notes);
            }
            tracker.record_checkin(&checkin).await?;
            println!("Check-in saved for {}", checkin.date);
        }
        Commands::Remind { state: Some(state) } => {
            let enabled = matches!(state, Toggle::On);
            tracker.set_notifications(enabled).await?;
            println!("Reminders {}", if enabled { "on" } else { "off" });
        }
        Commands::Remind { state: None } => {
            let enabled = tracker.notifications_enabled().await?;
            println!("Reminders are {}", if enabled { "on" } else { "off" });
            println!("Use `goalpace remind on` or `goalpace remind off` to change it.");
        }
        Commands::Add { category, name, target, current, initial, deadline, unit } => {
            let mut goal = Goal::new(Category::new(category), name, target).with_current(current);
            if let Some(initial) = initial {
                goal = goal.with_initial(initial);
            }
            if let Some(unit) = unit {
                goal = goal.with_unit(unit);
            }
            if let Some(deadline) = deadline {
                goal = goal.with_deadline(deadline);
            }
            tracker.storage_mut().save_goal(&goal).await?;
            info!("Added goal {} ({})", goal.name, goal.id);
            println!("Added goal: {} - {}/{}", goal.id, goal.category, goal.name);
        }
    }

    Ok(())
}
