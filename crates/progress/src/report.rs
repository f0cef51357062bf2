//! Read models for dashboards: per-goal chart data and per-user summary.

use goaltrack_core::{ActionId, Goal, GoalId, GoalStatus, MetricId, Milestone, Time};
use serde::{Deserialize, Serialize};

/// One metric in the progress chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    /// Metric id
    pub id: MetricId,
    /// Metric name
    pub name: String,
    /// Current value
    pub current: f64,
    /// Target value
    pub target: f64,
    /// Progress percentage
    pub progress: f64,
}

/// One action in the completion chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPoint {
    /// Action id
    pub id: ActionId,
    /// Action title
    pub title: String,
    /// Completion state
    pub completed: bool,
    /// When completed
    pub completed_at: Option<Time>,
}

/// Chart-ready snapshot of a single goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationData {
    /// Per-metric progress
    pub metric_progress: Vec<MetricPoint>,
    /// Per-action completion
    pub action_completion: Vec<ActionPoint>,
    /// Achieved milestones, oldest first
    pub milestone_timeline: Vec<Milestone>,
    /// Overall progress
    pub overall_progress: u8,
    /// Current streak
    pub streak: u32,
    /// Seconds until the target date, negative once overdue
    pub time_remaining_secs: i64,
}

impl VisualizationData {
    /// Build chart data from a goal at `now`.
    pub fn from_goal(goal: &Goal, now: Time) -> Self {
        Self {
            metric_progress: goal
                .metrics
                .iter()
                .map(|m| MetricPoint {
                    id: m.id,
                    name: m.name.clone(),
                    current: m.current_value(),
                    target: m.target(),
                    progress: m.progress(),
                })
                .collect(),
            action_completion: goal
                .daily_actions
                .iter()
                .map(|a| ActionPoint {
                    id: a.id,
                    title: a.title.clone(),
                    completed: a.is_completed(),
                    completed_at: a.completed_at(),
                })
                .collect(),
            milestone_timeline: goal.progress.milestones.clone(),
            overall_progress: goal.progress.overall_progress,
            streak: goal.progress.streak,
            time_remaining_secs: goal.time_remaining(now).num_seconds(),
        }
    }
}

/// A milestone tagged with the goal it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMilestone {
    /// Owning goal
    pub goal_id: GoalId,
    /// Owning goal's title
    pub goal_title: String,
    /// The milestone
    #[serde(flatten)]
    pub milestone: Milestone,
}

/// Aggregate view over all of a user's goals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Number of goals
    pub total_goals: usize,
    /// Goals with status active
    pub active_goals: usize,
    /// Goals with status completed
    pub completed_goals: usize,
    /// Mean overall progress, 0 without goals
    pub average_progress: f64,
    /// Sum of every goal's streak
    pub total_streak: u32,
    /// Newest first
    pub recent_milestones: Vec<RecentMilestone>,
}

impl ProgressSummary {
    /// Fan out over `goals`, keeping the `limit` newest milestones.
    pub fn from_goals(goals: &[Goal], limit: usize) -> Self {
        if goals.is_empty() {
            return Self::default();
        }

        let count_status = |status: GoalStatus| goals.iter().filter(|g| g.status == status).count();
        let progress_sum: f64 = goals.iter().map(|g| f64::from(g.progress.overall_progress)).sum();

        let mut recent_milestones: Vec<RecentMilestone> = goals
            .iter()
            .flat_map(|g| {
                g.progress.milestones.iter().map(move |m| RecentMilestone {
                    goal_id: g.id,
                    goal_title: g.title.clone(),
                    milestone: m.clone(),
                })
            })
            .collect();
        recent_milestones.sort_by(|a, b| b.milestone.achieved_at.cmp(&a.milestone.achieved_at));
        recent_milestones.truncate(limit);

        Self {
            total_goals: goals.len(),
            active_goals: count_status(GoalStatus::Active),
            completed_goals: count_status(GoalStatus::Completed),
            average_progress: progress_sum / goals.len() as f64,
            total_streak: goals.iter().map(|g| g.progress.streak).fold(0, u32::saturating_add),
            recent_milestones,
        }
    }
}
