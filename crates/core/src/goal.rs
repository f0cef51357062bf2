//! Goal model - top-level objective with metrics, actions and progress.

use serde::{Deserialize, Serialize};
use crate::action::DailyAction;
use crate::history::{HistoryEntryType, HistoryLog, Metadata};
use crate::id::{ActionId, GoalId, MetricId, UserId};
use crate::metric::Metric;
use crate::validation::{required_text, ValidationError};
use crate::Time;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 1000;

/// A user-defined objective with measurable metrics and scheduled actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Owning user
    pub owner_id: UserId,

    /// Goal title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Category
    pub category: GoalCategory,

    /// When created
    pub created_at: Time,

    /// Deadline, strictly after `created_at`
    pub target_date: Time,

    /// Lifecycle status
    pub status: GoalStatus,

    /// Measurable sub-targets
    pub metrics: Vec<Metric>,

    /// Scheduled actions
    pub daily_actions: Vec<DailyAction>,

    /// Derived progress snapshot
    pub progress: GoalProgress,

    /// Event log
    history: HistoryLog,

    /// Store-managed revision used for optimistic concurrency
    #[serde(default)]
    pub version: u64,
}

/// Goal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    /// Physical fitness
    Fitness,
    /// Career and work
    Career,
    /// Personal development
    Personal,
    /// Health
    Health,
    /// Anything else
    Other,
}

impl GoalCategory {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::Fitness => "fitness",
            GoalCategory::Career => "career",
            GoalCategory::Personal => "personal",
            GoalCategory::Health => "health",
            GoalCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for GoalCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fitness" => Ok(GoalCategory::Fitness),
            "career" => Ok(GoalCategory::Career),
            "personal" => Ok(GoalCategory::Personal),
            "health" => Ok(GoalCategory::Health),
            "other" => Ok(GoalCategory::Other),
            other => Err(ValidationError::UnknownVariant {
                kind: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// Goal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Goal is being worked on
    #[default]
    Active,
    /// Goal reached
    Completed,
    /// Goal abandoned or missed
    Failed,
    /// Temporarily on hold
    Paused,
}

impl GoalStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Failed => "failed",
            GoalStatus::Paused => "paused",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "failed" => Ok(GoalStatus::Failed),
            "paused" => Ok(GoalStatus::Paused),
            other => Err(ValidationError::UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Materialized progress snapshot, recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Average metric progress (0-100)
    pub overall_progress: u8,

    /// When the snapshot was last recomputed
    pub last_updated: Time,

    /// Consecutive-day completion streak
    pub streak: u32,

    /// Most recent action completion
    pub last_action_completed: Option<Time>,

    /// Achieved milestones, names unique
    pub milestones: Vec<Milestone>,
}

impl GoalProgress {
    /// Empty snapshot taken at `now`.
    pub fn new(now: Time) -> Self {
        Self {
            overall_progress: 0,
            last_updated: now,
            streak: 0,
            last_action_completed: None,
            milestones: Vec::new(),
        }
    }

    /// Whether a milestone with this name was already achieved.
    pub fn has_milestone(&self, name: &str) -> bool {
        self.milestones.iter().any(|m| m.name == name)
    }
}

/// A one-time achievement fired when progress crosses a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique milestone name
    pub name: String,

    /// Description
    pub description: String,

    /// Threshold percentage that triggered it
    pub threshold: u8,

    /// When it was achieved
    pub achieved_at: Time,
}

/// Input for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// Goal title
    pub title: String,
    /// Description
    pub description: String,
    /// Category
    pub category: GoalCategory,
    /// Deadline
    pub target_date: Time,
}

impl Goal {
    /// Validate input and create a goal with a single `created` entry.
    pub fn new(owner_id: UserId, input: NewGoal, now: Time) -> Result<Self, ValidationError> {
        let title = required_text("title", &input.title, TITLE_MAX)?;
        let description = required_text("description", &input.description, DESCRIPTION_MAX)?;
        if input.target_date <= now {
            return Err(ValidationError::TargetDateNotInFuture);
        }

        let mut history = HistoryLog::new();
        history.append(HistoryEntryType::Created, "Goal created", Metadata::new(), now);

        Ok(Self {
            id: GoalId::new(),
            owner_id,
            title,
            description,
            category: input.category,
            created_at: now,
            target_date: input.target_date,
            status: GoalStatus::Active,
            metrics: Vec::new(),
            daily_actions: Vec::new(),
            progress: GoalProgress::new(now),
            history,
            version: 0,
        })
    }

    /// The goal's event log.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Append an event to the history log.
    pub fn record(
        &mut self,
        entry_type: HistoryEntryType,
        description: impl Into<String>,
        metadata: Metadata,
        now: Time,
    ) {
        self.history.append(entry_type, description, metadata, now);
    }

    /// Look up a metric for mutation.
    pub fn metric_mut(&mut self, id: MetricId) -> Option<&mut Metric> {
        self.metrics.iter_mut().find(|m| m.id == id)
    }

    /// Look up a daily action.
    pub fn action(&self, id: ActionId) -> Option<&DailyAction> {
        self.daily_actions.iter().find(|a| a.id == id)
    }

    /// Look up a daily action for mutation.
    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut DailyAction> {
        self.daily_actions.iter_mut().find(|a| a.id == id)
    }

    /// Time left until the target date; negative once overdue.
    pub fn time_remaining(&self, now: Time) -> chrono::Duration {
        self.target_date - now
    }

    /// Whether progress keeps pace with elapsed time.
    ///
    /// Expected progress is the elapsed share of `created_at..target_date`.
    pub fn is_on_track(&self, now: Time) -> Result<bool, ValidationError> {
        let total = (self.target_date - self.created_at).num_milliseconds();
        if total <= 0 {
            return Err(ValidationError::InvalidSchedule);
        }
        let elapsed = (now - self.created_at).num_milliseconds();
        let expected = elapsed as f64 / total as f64 * 100.0;
        Ok(f64::from(self.progress.overall_progress) >= expected)
    }
}
