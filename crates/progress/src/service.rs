//! Goal progress service - orchestrates every goal mutation.
//!
//! Each public operation is one read-modify-write cycle:
//! ```text
//! load goal → validate + mutate in memory → append history → refresh snapshot → save
//! ```
//! Validation failures return before `save`, so a goal is never persisted
//! half-updated. Isolation between concurrent writers of the same goal comes
//! from the store's optimistic versioning.

use std::sync::Arc;

use goaltrack_core::{
    metadata, ActionId, DailyAction, Goal, GoalId, GoalPatch, GoalStatus, HistoryEntryType,
    Metadata, Metric, MetricId, Milestone, NewDailyAction, NewGoal, NewMetric, Time, UserId,
};
use goaltrack_storage::GoalStore;
use serde_json::json;
use tracing::{debug, info};

use crate::aggregator::ProgressAggregator;
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::error::{ProgressError, Result};
use crate::milestone::MilestoneDetector;
use crate::report::{ProgressSummary, VisualizationData};
use crate::streak::StreakTracker;
use crate::trend::{Timeframe, TrendAnalyzer, TrendReport};

/// Orchestrates aggregation, streaks, milestones and persistence.
pub struct GoalProgressService<S: GoalStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: TrackerConfig,
    aggregator: ProgressAggregator,
    streaks: StreakTracker,
    milestones: MilestoneDetector,
    trends: TrendAnalyzer,
}

impl<S: GoalStore> GoalProgressService<S> {
    /// Create a service over `store` using wall-clock time.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Create a service sharing an existing store.
    pub fn from_arc(store: Arc<S>) -> Self {
        let config = TrackerConfig::default();
        Self {
            store,
            clock: Arc::new(SystemClock),
            streaks: StreakTracker::new(config.streak_timezone),
            config,
            aggregator: ProgressAggregator,
            milestones: MilestoneDetector,
            trends: TrendAnalyzer,
        }
    }

    /// Set the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.streaks = StreakTracker::new(config.streak_timezone);
        self.config = config;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // === Write path ===

    /// Create a goal with empty metrics and actions and a `created` entry.
    pub async fn create_goal(&self, owner: &UserId, input: NewGoal) -> Result<Goal> {
        let now = self.clock.now();
        let goal = Goal::new(owner.clone(), input, now)?;
        let saved = self.store.save(&goal).await?;
        info!("Created goal {} for {}", saved.id, owner);
        Ok(saved)
    }

    /// Add a metric and refresh progress.
    pub async fn add_metric(&self, goal_id: GoalId, owner: &UserId, input: NewMetric) -> Result<Goal> {
        let metric = Metric::new(input)?;
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;

        let details = json!({
            "id": metric.id,
            "name": metric.name,
            "target": metric.target(),
            "unit": metric.unit,
            "currentValue": metric.current_value(),
        });
        goal.metrics.push(metric);
        goal.record(
            HistoryEntryType::Modified,
            "New metric added",
            metadata([("metric", details)]),
            now,
        );

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Add a daily action.
    pub async fn add_daily_action(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        input: NewDailyAction,
    ) -> Result<Goal> {
        let action = DailyAction::new(input)?;
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;

        let details = json!({
            "id": action.id,
            "title": action.title,
            "frequency": action.frequency,
            "scheduledDays": action.scheduled_days,
            "scheduledTime": action.scheduled_time,
        });
        goal.daily_actions.push(action);
        goal.record(
            HistoryEntryType::Modified,
            "New daily action added",
            metadata([("action", details)]),
            now,
        );

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Set a metric's current value.
    ///
    /// Appends one `modified` entry plus one `milestone` entry per milestone
    /// crossed.
    pub async fn record_metric_update(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        metric_id: MetricId,
        new_value: f64,
    ) -> Result<Goal> {
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;

        let metric = goal
            .metric_mut(metric_id)
            .ok_or(ProgressError::MetricNotFound(metric_id))?;
        metric.set_current_value(new_value)?;
        let progress = metric.progress();

        goal.record(
            HistoryEntryType::Modified,
            "Metric progress updated",
            metadata([
                ("metricId", json!(metric_id)),
                ("newValue", json!(new_value)),
                ("progress", json!(progress)),
            ]),
            now,
        );

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Mark an action completed or not.
    ///
    /// Completing an action advances the streak from the previous completion
    /// and stamps `last_action_completed` with now.
    pub async fn record_action_completion(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        action_id: ActionId,
        completed: bool,
    ) -> Result<Goal> {
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;

        let action = goal
            .action_mut(action_id)
            .ok_or(ProgressError::ActionNotFound(action_id))?;
        let newly_completed = action.set_completed(completed, now);

        if completed {
            let previous = goal.progress.last_action_completed;
            let streak = self.streaks.next_streak(goal.progress.streak, previous, now);
            debug!(
                "Goal {} streak {} -> {} (newly completed: {})",
                goal.id, goal.progress.streak, streak, newly_completed
            );
            goal.progress.streak = streak;
            goal.progress.last_action_completed = Some(now);
        }

        goal.record(
            HistoryEntryType::Modified,
            "Daily action status updated",
            metadata([("actionId", json!(action_id)), ("completed", json!(completed))]),
            now,
        );

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Merge validated field changes into a goal.
    ///
    /// The `modified` entry carries the per-field diff and the optional note.
    pub async fn apply_modification(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        patch: GoalPatch,
        note: Option<String>,
    ) -> Result<Goal> {
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;

        let changes = patch.apply(&mut goal, now)?;
        let mut meta = metadata([("changes", serde_json::Value::Object(changes))]);
        if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
            meta.insert("note".into(), json!(note));
        }
        goal.record(HistoryEntryType::Modified, "Goal updated", meta, now);

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Move a goal to a new status.
    ///
    /// Setting the status it already has is a no-op and writes nothing.
    pub async fn change_status(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        status: GoalStatus,
        reason: Option<String>,
    ) -> Result<Goal> {
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;
        if goal.status == status {
            return Ok(goal);
        }

        let mut meta: Metadata = metadata([
            ("from", json!(goal.status)),
            ("to", json!(status)),
        ]);
        if let Some(reason) = reason {
            meta.insert("reason".into(), json!(reason));
        }
        let description = format!("Status changed from {} to {}", goal.status.as_str(), status.as_str());
        goal.status = status;
        goal.record(HistoryEntryType::StatusChange, description, meta, now);

        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    /// Recompute the snapshot and milestones without a `modified` entry.
    pub async fn update_progress(&self, goal_id: GoalId, owner: &UserId) -> Result<Goal> {
        let now = self.clock.now();
        let mut goal = self.load(goal_id, owner).await?;
        self.refresh(&mut goal, now);
        self.persist(goal).await
    }

    // === Read path ===

    /// Load a goal.
    pub async fn goal(&self, goal_id: GoalId, owner: &UserId) -> Result<Goal> {
        self.load(goal_id, owner).await
    }

    /// Trend statistics over `timeframe`, or the configured default window.
    pub async fn trends(
        &self,
        goal_id: GoalId,
        owner: &UserId,
        timeframe: Option<Timeframe>,
    ) -> Result<TrendReport> {
        let goal = self.load(goal_id, owner).await?;
        let timeframe = timeframe.unwrap_or(self.config.default_timeframe);
        self.trends.analyze(&goal, timeframe, self.clock.now())
    }

    /// Chart data for a goal.
    pub async fn visualization(&self, goal_id: GoalId, owner: &UserId) -> Result<VisualizationData> {
        let goal = self.load(goal_id, owner).await?;
        Ok(VisualizationData::from_goal(&goal, self.clock.now()))
    }

    /// Summary over all of a user's goals.
    pub async fn summary(&self, owner: &UserId) -> Result<ProgressSummary> {
        let goals = self.store.list_by_owner(owner).await?;
        Ok(ProgressSummary::from_goals(&goals, self.config.recent_milestone_limit))
    }

    // === Internals ===

    async fn load(&self, goal_id: GoalId, owner: &UserId) -> Result<Goal> {
        self.store
            .find_by_id(goal_id, owner)
            .await?
            .ok_or(ProgressError::GoalNotFound(goal_id))
    }

    async fn persist(&self, goal: Goal) -> Result<Goal> {
        let saved = self.store.save(&goal).await?;
        debug!(
            "Persisted goal {} (version {}, progress {}%, {} history entries)",
            saved.id,
            saved.version,
            saved.progress.overall_progress,
            saved.history().len()
        );
        Ok(saved)
    }

    /// Recompute the derived snapshot in place and return new milestones.
    fn refresh(&self, goal: &mut Goal, now: Time) -> Vec<Milestone> {
        goal.progress.overall_progress = self.aggregator.overall_progress(&goal.metrics);
        goal.progress.streak =
            self.streaks
                .decayed(goal.progress.streak, goal.progress.last_action_completed, now);
        goal.progress.last_updated = now;

        let achieved = self.milestones.record(goal, now);
        for milestone in &achieved {
            info!("Goal {} achieved milestone: {}", goal.id, milestone.name);
        }
        achieved
    }
}
