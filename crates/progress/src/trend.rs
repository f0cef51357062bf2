//! Windowed trend analytics.
//!
//! Read-only: every statistic is derived from the goal snapshot, its
//! actions and its history log over a caller-selected window.

use chrono::{Duration, Months};
use goaltrack_core::{DailyAction, Goal, HistoryEntry, HistoryEntryType, Time};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Last 7 days
    #[default]
    Week,
    /// Last calendar month
    Month,
    /// Since the goal was created
    All,
}

impl Timeframe {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::All => "all",
        }
    }

    /// First instant of the window ending at `now`.
    pub fn start_date(&self, goal: &Goal, now: Time) -> Time {
        match self {
            Timeframe::Week => now - Duration::days(7),
            Timeframe::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(now - Duration::days(30)),
            Timeframe::All => goal.created_at,
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = goaltrack_core::ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "all" => Ok(Timeframe::All),
            other => Err(goaltrack_core::ValidationError::UnknownVariant {
                kind: "timeframe",
                value: other.to_string(),
            }),
        }
    }
}

/// Rate statistics over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTrends {
    /// Overall progress points per day
    pub progress_rate: f64,
    /// Share of actions completed in the window (0-100)
    pub consistency_score: f64,
    /// Share of actions completed in the window (0-100)
    pub action_completion_rate: f64,
    /// Milestones achieved per week
    pub milestone_frequency: f64,
}

/// Result of [`TrendAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// Window analyzed
    pub timeframe: Timeframe,
    /// Window start
    pub start_date: Time,
    /// Rate statistics
    pub trends: ProgressTrends,
    /// `modified` and `milestone` entries inside the window
    pub history: Vec<HistoryEntry>,
    /// Current overall progress
    pub current_progress: u8,
    /// Whether progress keeps pace with the schedule
    pub is_on_track: bool,
}

/// `numerator / denominator`, or 0 when the denominator is not a positive number.
///
/// Guards windows of zero length, e.g. a goal created and queried in the
/// same instant.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_finite() && denominator > 0.0 {
        numerator / denominator
    } else {
        tracing::debug!("Zero-length window, reporting 0 for {}/{}", numerator, denominator);
        0.0
    }
}

/// Computes trend statistics for a goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Analyze `goal` over `timeframe` ending at `now`.
    ///
    /// Fails only if the goal's schedule is inverted (target date not after
    /// creation), which creation-time validation normally rules out.
    pub fn analyze(&self, goal: &Goal, timeframe: Timeframe, now: Time) -> Result<TrendReport> {
        let start_date = timeframe.start_date(goal, now);
        let is_on_track = goal.is_on_track(now)?;

        let types = [HistoryEntryType::Modified, HistoryEntryType::Milestone];
        let history = goal.history().since(start_date, &types).cloned().collect();

        Ok(TrendReport {
            timeframe,
            start_date,
            trends: ProgressTrends {
                progress_rate: self.progress_rate(goal, start_date, now),
                consistency_score: self.consistency_score(&goal.daily_actions, start_date),
                action_completion_rate: self.action_completion_rate(&goal.daily_actions, start_date),
                milestone_frequency: self.milestone_frequency(goal, start_date, now),
            },
            history,
            current_progress: goal.progress.overall_progress,
            is_on_track,
        })
    }

    /// Overall progress divided by days in the window.
    pub fn progress_rate(&self, goal: &Goal, start_date: Time, now: Time) -> f64 {
        guarded_ratio(f64::from(goal.progress.overall_progress), days_between(start_date, now))
    }

    /// Percentage of actions completed at or after `start_date`.
    pub fn consistency_score(&self, actions: &[DailyAction], start_date: Time) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        let completed = completed_since(actions, start_date);
        completed as f64 / actions.len() as f64 * 100.0
    }

    /// Percentage of actions completed at or after `start_date`.
    ///
    /// Currently the same measure as [`Self::consistency_score`].
    pub fn action_completion_rate(&self, actions: &[DailyAction], start_date: Time) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        let completed = completed_since(actions, start_date);
        completed as f64 / actions.len() as f64 * 100.0
    }

    /// Milestones achieved in the window per elapsed week.
    pub fn milestone_frequency(&self, goal: &Goal, start_date: Time, now: Time) -> f64 {
        let achieved = goal
            .progress
            .milestones
            .iter()
            .filter(|m| m.achieved_at >= start_date)
            .count();
        guarded_ratio(achieved as f64, days_between(start_date, now) / 7.0)
    }
}

fn completed_since(actions: &[DailyAction], start_date: Time) -> usize {
    actions
        .iter()
        .filter(|a| a.completed_at().is_some_and(|at| at >= start_date))
        .count()
}

fn days_between(start: Time, end: Time) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use goaltrack_core::{GoalCategory, Metadata, NewDailyAction, NewGoal, UserId};

    fn created() -> Time {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn goal() -> Goal {
        Goal::new(
            UserId::new("u1"),
            NewGoal {
                title: "Meditate".to_string(),
                description: "Ten minutes a day".to_string(),
                category: GoalCategory::Health,
                target_date: created() + Duration::days(100),
            },
            created(),
        )
        .unwrap()
    }

    fn action(title: &str) -> DailyAction {
        DailyAction::new(NewDailyAction {
            title: title.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_fresh_goal_reports_zeros() {
        let goal = goal();
        for timeframe in [Timeframe::Week, Timeframe::Month, Timeframe::All] {
            let report = TrendAnalyzer.analyze(&goal, timeframe, created()).unwrap();
            assert_eq!(report.trends.progress_rate, 0.0);
            assert_eq!(report.trends.consistency_score, 0.0);
            assert_eq!(report.trends.action_completion_rate, 0.0);
            assert_eq!(report.trends.milestone_frequency, 0.0);
            assert!(report.history.is_empty());
        }
    }

    #[test]
    fn test_all_window_same_instant_is_guarded() {
        let mut goal = goal();
        goal.progress.overall_progress = 40;
        goal.progress.milestones.push(goaltrack_core::Milestone {
            name: "Quarter Complete".to_string(),
            description: "Reached 25% of goal".to_string(),
            threshold: 25,
            achieved_at: created(),
        });
        let report = TrendAnalyzer.analyze(&goal, Timeframe::All, created()).unwrap();
        assert_eq!(report.trends.progress_rate, 0.0);
        assert_eq!(report.trends.milestone_frequency, 0.0);
    }

    #[test]
    fn test_week_progress_rate() {
        let mut goal = goal();
        goal.progress.overall_progress = 70;
        let now = created() + Duration::days(20);
        let report = TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap();
        assert_eq!(report.start_date, now - Duration::days(7));
        assert!((report.trends.progress_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_window_uses_calendar_month() {
        let goal = goal();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap();
        let start = Timeframe::Month.start_date(&goal, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_completion_rates_count_window_only() {
        let mut goal = goal();
        let now = created() + Duration::days(30);
        let mut old = action("old");
        old.set_completed(true, now - Duration::days(10));
        let mut recent = action("recent");
        recent.set_completed(true, now - Duration::days(2));
        goal.daily_actions = vec![old, recent, action("pending"), action("pending too")];

        let report = TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap();
        assert_eq!(report.trends.consistency_score, 25.0);
        assert_eq!(report.trends.action_completion_rate, 25.0);

        let report = TrendAnalyzer.analyze(&goal, Timeframe::All, now).unwrap();
        assert_eq!(report.trends.consistency_score, 50.0);
    }

    #[test]
    fn test_milestone_frequency_per_week() {
        let mut goal = goal();
        let now = created() + Duration::days(14);
        for (name, days_ago) in [("Quarter Complete", 10), ("Halfway There", 3)] {
            goal.progress.milestones.push(goaltrack_core::Milestone {
                name: name.to_string(),
                description: String::new(),
                threshold: 0,
                achieved_at: now - Duration::days(days_ago),
            });
        }
        let report = TrendAnalyzer.analyze(&goal, Timeframe::All, now).unwrap();
        // 2 milestones over 2 weeks
        assert!((report.trends.milestone_frequency - 1.0).abs() < 1e-9);

        let report = TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap();
        assert!((report.trends.milestone_frequency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let mut goal = goal();
        let now = created() + Duration::days(30);
        let start = now - Duration::days(7);

        let mut on_boundary = action("boundary");
        on_boundary.set_completed(true, start);
        let mut just_before = action("before");
        just_before.set_completed(true, start - Duration::milliseconds(1));
        goal.daily_actions = vec![on_boundary, just_before];
        goal.progress.milestones.push(goaltrack_core::Milestone {
            name: "Quarter Complete".to_string(),
            description: String::new(),
            threshold: 25,
            achieved_at: start,
        });

        let report = TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap();
        assert_eq!(report.start_date, start);
        assert_eq!(report.trends.consistency_score, 50.0);
        assert_eq!(report.trends.action_completion_rate, 50.0);
        // 1 milestone over exactly 1 week
        assert!((report.trends.milestone_frequency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_slice_excludes_other_types() {
        let mut goal = goal();
        let now = created() + Duration::days(3);
        goal.record(HistoryEntryType::Modified, "Metric progress updated", Metadata::new(), now);
        goal.record(HistoryEntryType::StatusChange, "paused", Metadata::new(), now);
        goal.record(HistoryEntryType::Milestone, "Achieved milestone: Quarter Complete", Metadata::new(), now);

        let report = TrendAnalyzer.analyze(&goal, Timeframe::All, now).unwrap();
        let types: Vec<_> = report.history.iter().map(|e| e.entry_type).collect();
        assert_eq!(types, vec![HistoryEntryType::Modified, HistoryEntryType::Milestone]);
    }

    #[test]
    fn test_on_track_flag() {
        let mut goal = goal();
        let now = created() + Duration::days(50);
        goal.progress.overall_progress = 50;
        assert!(TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap().is_on_track);
        goal.progress.overall_progress = 30;
        assert!(!TrendAnalyzer.analyze(&goal, Timeframe::Week, now).unwrap().is_on_track);
    }

    #[test]
    fn test_inverted_schedule_is_validation_error() {
        let mut goal = goal();
        goal.target_date = goal.created_at - Duration::days(1);
        let err = TrendAnalyzer.analyze(&goal, Timeframe::Week, created()).unwrap_err();
        assert!(matches!(err, crate::ProgressError::Validation(_)));
    }

    #[test]
    fn test_guarded_ratio() {
        assert_eq!(guarded_ratio(5.0, 0.0), 0.0);
        assert_eq!(guarded_ratio(5.0, -1.0), 0.0);
        assert_eq!(guarded_ratio(5.0, f64::NAN), 0.0);
        assert_eq!(guarded_ratio(6.0, 2.0), 3.0);
    }
}
