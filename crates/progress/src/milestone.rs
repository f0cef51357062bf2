//! Exactly-once milestone detection.

use goaltrack_core::{metadata, Goal, GoalProgress, HistoryEntryType, HistoryLog, Milestone, Time};
use serde_json::json;

/// A rung of the milestone ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    /// Overall progress needed
    pub percent: u8,
    /// Unique milestone name
    pub name: &'static str,
}

/// Fixed ladder, ascending.
pub const MILESTONE_LADDER: [Threshold; 5] = [
    Threshold { percent: 25, name: "Quarter Complete" },
    Threshold { percent: 50, name: "Halfway There" },
    Threshold { percent: 75, name: "Three Quarters Complete" },
    Threshold { percent: 90, name: "Almost There" },
    Threshold { percent: 100, name: "Goal Achieved" },
];

/// Compares progress against the ladder and the milestones already achieved.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneDetector;

impl MilestoneDetector {
    /// Milestones newly crossed at `overall_progress`, ascending.
    ///
    /// A rung fires only if its name is not yet in `progress.milestones`, so
    /// oscillating progress never re-emits it.
    pub fn detect(&self, overall_progress: u8, progress: &GoalProgress, now: Time) -> Vec<Milestone> {
        MILESTONE_LADDER
            .iter()
            .filter(|t| overall_progress >= t.percent && !progress.has_milestone(t.name))
            .map(|t| Milestone {
                name: t.name.to_string(),
                description: format!("Reached {}% of goal", t.percent),
                threshold: t.percent,
                achieved_at: now,
            })
            .collect()
    }

    /// Detect against the goal's current snapshot, record each new milestone
    /// and append one `milestone` history entry per milestone.
    pub fn record(&self, goal: &mut Goal, now: Time) -> Vec<Milestone> {
        let achieved = self.detect(goal.progress.overall_progress, &goal.progress, now);
        for milestone in &achieved {
            goal.progress.milestones.push(milestone.clone());
            goal.record(
                HistoryEntryType::Milestone,
                format!("Achieved milestone: {}", milestone.name),
                metadata([
                    ("name", json!(milestone.name)),
                    ("threshold", json!(milestone.threshold)),
                ]),
                now,
            );
        }
        achieved
    }

    /// Rebuild the achieved milestones from the history log alone.
    pub fn replay(&self, history: &HistoryLog) -> Vec<Milestone> {
        history
            .entries()
            .iter()
            .filter(|e| e.entry_type == HistoryEntryType::Milestone)
            .filter_map(|e| {
                let name = e.metadata.get("name")?.as_str()?;
                let rung = MILESTONE_LADDER.iter().find(|t| t.name == name)?;
                Some(Milestone {
                    name: rung.name.to_string(),
                    description: format!("Reached {}% of goal", rung.percent),
                    threshold: rung.percent,
                    achieved_at: e.timestamp,
                })
            })
            .collect()
    }
}
