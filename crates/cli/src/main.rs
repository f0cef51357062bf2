//! goaltrack CLI - goal progress and milestone tracking.

mod config;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use goaltrack_core::{
    ActionId, Frequency, Goal, GoalCategory, GoalId, GoalPatch, GoalStatus, MetricId, NewDailyAction,
    NewGoal, NewMetric, Time, UserId,
};
use goaltrack_progress::{GoalProgressService, Timeframe};
use goaltrack_storage::{GoalStore, JsonStorage};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "goaltrack")]
#[command(about = "Track goals, streaks and milestones", long_about = None)]
struct Cli {
    /// Config file (defaults to ./goaltrack.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a goal
    Create {
        /// Goal title
        title: String,
        /// Description
        #[arg(long)]
        description: String,
        /// fitness, career, personal, health or other
        #[arg(long, default_value = "other")]
        category: String,
        /// Deadline (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        target_date: String,
    },
    /// List goals
    List,
    /// Show a goal as JSON
    Show {
        /// Goal ID
        goal: String,
    },
    /// Add a metric to a goal
    AddMetric {
        /// Goal ID
        goal: String,
        /// Metric name
        #[arg(long)]
        name: String,
        /// Target value (> 0)
        #[arg(long)]
        target: f64,
        /// Unit of measure
        #[arg(long)]
        unit: String,
        /// Starting value
        #[arg(long, default_value = "0")]
        current: f64,
    },
    /// Add a daily action to a goal
    AddAction {
        /// Goal ID
        goal: String,
        /// Action title
        #[arg(long)]
        title: String,
        /// daily, weekly or custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Days of week, 0 = Sunday (e.g. 1,3,5)
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: Option<String>,
    },
    /// Set a metric's current value
    UpdateMetric {
        /// Goal ID
        goal: String,
        /// Metric ID
        metric: String,
        /// New value
        value: f64,
    },
    /// Mark an action completed
    Complete {
        /// Goal ID
        goal: String,
        /// Action ID
        action: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Modify goal fields
    Modify {
        /// Goal ID
        goal: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New deadline
        #[arg(long)]
        target_date: Option<String>,
        /// Note stored with the change
        #[arg(long)]
        note: Option<String>,
    },
    /// Change goal status
    Status {
        /// Goal ID
        goal: String,
        /// active, completed, failed or paused
        status: String,
        /// Reason stored with the change
        #[arg(long)]
        reason: Option<String>,
    },
    /// Recompute progress and milestones
    Refresh {
        /// Goal ID
        goal: String,
    },
    /// Show trend statistics
    Trends {
        /// Goal ID
        goal: String,
        /// week, month or all
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Show chart data for a goal
    Viz {
        /// Goal ID
        goal: String,
    },
    /// Summarize all goals
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let owner = UserId::new(cli.user.clone().unwrap_or_else(|| config.user.clone()));
    let storage = JsonStorage::new(&config.data_dir).await?;
    info!("Using store at {}", storage.root().display());
    let service = GoalProgressService::new(storage).with_config(config.tracker.clone());

    match cli.command {
        Commands::Create { title, description, category, target_date } => {
            let goal = service
                .create_goal(
                    &owner,
                    NewGoal {
                        title,
                        description,
                        category: category.parse()?,
                        target_date: parse_date(&target_date)?,
                    },
                )
                .await?;
            println!("Created goal: {} - {}", goal.id, goal.title);
        }
        Commands::List => {
            let goals = service.store().list_by_owner(&owner).await?;
            println!("Goals ({})", goals.len());
            for goal in goals {
                println!(
                    "  {} | {} | {:>3}% | streak {} - {}",
                    goal.id,
                    format_status(goal.status),
                    goal.progress.overall_progress,
                    goal.progress.streak,
                    goal.title,
                );
            }
        }
        Commands::Show { goal } => {
            let goal = service.goal(parse_id(&goal)?, &owner).await?;
            print_json(&goal)?;
        }
        Commands::AddMetric { goal, name, target, unit, current } => {
            let goal = service
                .add_metric(
                    parse_id(&goal)?,
                    &owner,
                    NewMetric { name, target, unit, current_value: current },
                )
                .await?;
            if let Some(metric) = goal.metrics.last() {
                println!("Added metric: {} - {}", metric.id, metric.name);
            }
            print_progress(&goal);
        }
        Commands::AddAction { goal, title, frequency, days, time } => {
            let frequency: Frequency = frequency.parse()?;
            let goal = service
                .add_daily_action(
                    parse_id(&goal)?,
                    &owner,
                    NewDailyAction {
                        title,
                        frequency,
                        scheduled_days: days,
                        scheduled_time: time,
                        ..Default::default()
                    },
                )
                .await?;
            if let Some(action) = goal.daily_actions.last() {
                println!("Added action: {} - {}", action.id, action.title);
            }
        }
        Commands::UpdateMetric { goal, metric, value } => {
            let metric: MetricId = metric.parse().map_err(|_| anyhow!("Invalid metric ID"))?;
            let goal = service
                .record_metric_update(parse_id(&goal)?, &owner, metric, value)
                .await?;
            print_progress(&goal);
        }
        Commands::Complete { goal, action, undo } => {
            let action: ActionId = action.parse().map_err(|_| anyhow!("Invalid action ID"))?;
            let goal = service
                .record_action_completion(parse_id(&goal)?, &owner, action, !undo)
                .await?;
            if let Some(action) = goal.action(action) {
                let state = if action.is_completed() { "done" } else { "open" };
                println!("Action {} - {} [{}]", action.id, action.title, state);
            }
            print_progress(&goal);
        }
        Commands::Modify { goal, title, description, category, target_date, note } => {
            let patch = GoalPatch {
                title,
                description,
                category: category.map(|c| c.parse::<GoalCategory>()).transpose()?,
                target_date: target_date.map(|d| parse_date(&d)).transpose()?,
            };
            if patch.is_empty() && note.is_none() {
                return Err(anyhow!("Nothing to modify"));
            }
            let goal = service
                .apply_modification(parse_id(&goal)?, &owner, patch, note)
                .await?;
            println!("Updated goal: {} - {}", goal.id, goal.title);
        }
        Commands::Status { goal, status, reason } => {
            let status: GoalStatus = status.parse()?;
            let goal = service
                .change_status(parse_id(&goal)?, &owner, status, reason)
                .await?;
            println!("Goal {} is now {}", goal.id, format_status(goal.status));
        }
        Commands::Refresh { goal } => {
            let goal = service.update_progress(parse_id(&goal)?, &owner).await?;
            print_progress(&goal);
        }
        Commands::Trends { goal, timeframe } => {
            let timeframe = timeframe.map(|t| t.parse::<Timeframe>()).transpose()?;
            let report = service.trends(parse_id(&goal)?, &owner, timeframe).await?;
            print_json(&report)?;
        }
        Commands::Viz { goal } => {
            let data = service.visualization(parse_id(&goal)?, &owner).await?;
            print_json(&data)?;
        }
        Commands::Summary => {
            let summary = service.summary(&owner).await?;
            print_json(&summary)?;
        }
    }

    Ok(())
}

fn parse_id(s: &str) -> Result<GoalId> {
    s.parse().map_err(|_| anyhow!("Invalid goal ID"))
}

/// Accept `YYYY-MM-DD` (end of that day, UTC) or a full RFC 3339 timestamp.
fn parse_date(s: &str) -> Result<Time> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| anyhow!("Invalid date: {}", s));
    }
    let parsed = chrono::DateTime::parse_from_rfc3339(s).map_err(|_| anyhow!("Invalid date: {}", s))?;
    Ok(parsed.with_timezone(&Utc))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_progress(goal: &Goal) {
    println!("Goal {}: {}% (streak {})", goal.id, goal.progress.overall_progress, goal.progress.streak);
    for milestone in &goal.progress.milestones {
        println!("  * {} ({})", milestone.name, milestone.achieved_at.format("%Y-%m-%d"));
    }
}

fn format_status(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "ACTIVE",
        GoalStatus::Completed => "COMPLETED",
        GoalStatus::Failed => "FAILED",
        GoalStatus::Paused => "PAUSED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_date_is_end_of_day() {
        assert_eq!(
            parse_date("2030-01-15").unwrap(),
            Utc.with_ymd_and_hms(2030, 1, 15, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        assert_eq!(
            parse_date("2030-01-15T10:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2030, 1, 15, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("next tuesday").is_err());
    }

    #[test]
    fn test_cli_parses_days_list() {
        let cli = Cli::try_parse_from([
            "goaltrack", "add-action", "01ARZ3NDEKTSV4RRFFQ69G5FAV", "--title", "Swim", "--days", "1,3,5",
        ])
        .unwrap();
        match cli.command {
            Commands::AddAction { days, .. } => assert_eq!(days, vec![1, 3, 5]),
            _ => panic!("expected add-action"),
        }
    }
}
